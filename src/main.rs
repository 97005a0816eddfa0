use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use wz_tracker::{
    config::{database, settings},
    core::{
        conversion::{Dimensions, convert, parse_quantity},
        draft::load_draft,
        product::get_product_by_id,
        report::{format_line_fulfillment, order_fulfillment},
    },
    entities::Unit,
    errors::{Error, Result},
};

#[derive(Parser)]
#[command(name = "wz-tracker", about = "WZ delivery note fulfillment tracker", version)]
struct Cli {
    /// Settings file
    #[arg(long, global = true, default_value = settings::DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create missing tables
    Init,
    /// Convert a quantity of a product between units
    Convert {
        /// Quantity, a decimal comma is accepted
        quantity: String,
        /// Source unit code, e.g. m3
        from: Unit,
        /// Target unit code, e.g. opak
        to: Unit,
        /// Product whose dimensions are used
        #[arg(long)]
        product: i64,
    },
    /// List the lines of an order that can go on the next WZ document
    Draft {
        /// Order id
        order_id: i64,
    },
    /// Show delivered and outstanding quantities of an order
    Status {
        /// Order id
        order_id: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, non-fatal since variables can be set externally
    dotenv().ok();

    // 3. Load settings and open the database
    let settings = settings::load_settings(&cli.config)?;
    let url = database::get_database_url(&settings);
    let db = database::create_connection(&url)
        .await
        .inspect_err(|e| error!("Failed to open database: {}", e))?;
    database::create_tables(&db).await?;

    match cli.command {
        Commands::Init => info!(%url, "Database initialized"),
        Commands::Convert {
            quantity,
            from,
            to,
            product,
        } => {
            let quantity = parse_quantity(&quantity)?;
            let product = get_product_by_id(&db, product)
                .await?
                .ok_or(Error::ProductNotFound {
                    product_id: product,
                })?;
            let converted = convert(quantity, from, to, &Dimensions::from(&product));
            if cli.json {
                print_json(&serde_json::json!({
                    "product": product.name,
                    "quantity": quantity,
                    "from": from,
                    "converted": converted,
                    "to": to,
                }))?;
            } else {
                println!("{quantity} {from} = {converted} {to} ({})", product.name);
            }
        }
        Commands::Draft { order_id } => {
            let draft = load_draft(&db, order_id).await?;
            if cli.json {
                print_json(&draft)?;
            } else if draft.is_empty() {
                println!("Nothing left to ship on order {order_id}");
            } else {
                for line in &draft {
                    let helper = match (line.wz.helper_quantity, line.wz.helper_unit) {
                        (Some(quantity), Some(unit)) => format!(" ({quantity} {unit})"),
                        _ => String::new(),
                    };
                    println!(
                        "#{} {}: {} {}{} [{:?}]",
                        line.line.line_id,
                        line.line.product_name,
                        line.wz.quantity,
                        line.wz.unit,
                        helper,
                        line.state()
                    );
                }
            }
        }
        Commands::Status { order_id } => {
            let report = order_fulfillment(&db, order_id).await?;
            if cli.json {
                print_json(&report)?;
            } else {
                for line in &report {
                    println!("{}", format_line_fulfillment(line));
                }
            }
        }
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
