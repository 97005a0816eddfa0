//! Product lookups and registration.
//!
//! The catalog itself is maintained elsewhere; the tracker only needs to register
//! products it sees and read their dimensions back.

use crate::{
    entities::{Product, Unit, product},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{Set, prelude::*};

/// Attributes of a product to register.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    /// Display name
    pub name: String,
    /// Length in millimeters
    pub length: Decimal,
    /// Width in millimeters
    pub width: Decimal,
    /// Height in millimeters
    pub height: Decimal,
    /// Pieces per package
    pub quantity_in_package: Decimal,
    /// Unit the product is normally sold in
    pub primary_unit: Unit,
}

/// Registers a product.
///
/// Zero dimensions are accepted: products sold by weight have none and simply do not
/// convert into pieces or packages.
///
/// # Errors
/// Returns an error if:
/// - The name is empty or whitespace-only
/// - Any dimension or the package size is negative
/// - The database insert fails
pub async fn create_product(db: &DatabaseConnection, new: NewProduct) -> Result<product::Model> {
    if new.name.trim().is_empty() {
        return Err(Error::Config {
            message: "Product name cannot be empty".to_string(),
        });
    }

    for value in [new.length, new.width, new.height, new.quantity_in_package] {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(Error::InvalidQuantity {
                value: value.to_string(),
            });
        }
    }

    let product = product::ActiveModel {
        name: Set(new.name.trim().to_string()),
        length: Set(new.length),
        width: Set(new.width),
        height: Set(new.height),
        quantity_in_package: Set(new.quantity_in_package),
        primary_unit: Set(new.primary_unit),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    };
    product.insert(db).await.map_err(Into::into)
}

/// Retrieves a product by id.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_product_by_id(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<Option<product::Model>> {
    Product::find_by_id(product_id)
        .one(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn sample(name: &str) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            length: dec!(1000),
            width: dec!(600),
            height: dec!(50),
            quantity_in_package: dec!(8),
            primary_unit: Unit::CubicMeter,
        }
    }

    #[tokio::test]
    async fn test_create_product_validation() {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = create_product(&db, sample("   ")).await;
        assert!(matches!(result, Err(Error::Config { .. })));

        let mut negative = sample("Board");
        negative.height = dec!(-5);
        let result = create_product(&db, negative).await;
        assert!(matches!(result, Err(Error::InvalidQuantity { .. })));
    }

    #[tokio::test]
    async fn test_create_and_get_product() -> Result<()> {
        let db = setup_test_db().await?;
        let created = create_product(&db, sample("  Board 50mm ")).await?;
        assert_eq!(created.name, "Board 50mm");

        let found = get_product_by_id(&db, created.id).await?.unwrap();
        assert_eq!(found.primary_unit, Unit::CubicMeter);
        assert_eq!(found.quantity_in_package, dec!(8));
        assert!(get_product_by_id(&db, 999).await?.is_none());
        Ok(())
    }
}
