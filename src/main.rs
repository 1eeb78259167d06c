use clap::{Args, Parser, Subcommand};
use miette::{IntoDiagnostic, Result, miette};
use moneris_checkout::application::gateway::{
    Collaborators, MonerisCheckout, PaymentGateway, RequestContext,
};
use moneris_checkout::domain::order::{Order, PendingPayment};
use moneris_checkout::domain::ports::{
    CheckoutGateway, OrderStore, OrderStoreBox, PaymentStoreBox,
};
use moneris_checkout::infrastructure::http::HttpGatewayClient;
use moneris_checkout::infrastructure::in_memory::{
    BroadcastEventBus, InMemoryMessenger, InMemoryOrderStore, InMemoryPaymentStore,
};
use moneris_checkout::infrastructure::settings;
use moneris_checkout::interfaces::callback::CallbackParams;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Gateway configuration file (TOML, JSON or YAML). `MCO__*` variables override it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Obtain (or reuse) a checkout ticket and print the checkout page settings.
    Preload {
        /// Order JSON file. Stored first unless the order already exists.
        #[arg(long)]
        order: PathBuf,
        #[arg(long)]
        return_url: Url,
        #[arg(long)]
        cancel_url: Url,
        /// Interface language; only `en` and `fr` are forwarded.
        #[arg(long)]
        language: Option<String>,
    },
    /// Fetch and print the receipt for a ticket.
    Receipt {
        #[arg(long)]
        ticket: String,
    },
    /// Reconcile a return callback and print the recorded payment.
    Return {
        #[command(flatten)]
        target: CallbackTarget,
        /// Callback query string, e.g. `ticket=..&response_code=001&response_state=complete`.
        #[arg(long)]
        query: String,
    },
    /// Process a cancel callback and print the resulting notices.
    Cancel {
        #[command(flatten)]
        target: CallbackTarget,
        #[arg(long)]
        query: String,
    },
}

/// The order a callback is for: an id already in the store, or an order
/// JSON file (carrying its cached checkout data) that is stored first.
#[derive(Args)]
#[group(required = true, multiple = false)]
struct CallbackTarget {
    /// Id of an order kept in the `--db-path` store.
    #[arg(long)]
    order_id: Option<String>,
    /// Order JSON file. Stored first unless the order already exists.
    #[arg(long)]
    order: Option<PathBuf>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("moneris_checkout=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn open_stores(db_path: Option<PathBuf>) -> Result<(OrderStoreBox, PaymentStoreBox)> {
    if let Some(db_path) = db_path {
        #[cfg(feature = "storage-rocksdb")]
        {
            let store = moneris_checkout::infrastructure::rocksdb::RocksDBStore::open(db_path)
                .into_diagnostic()?;
            return Ok((Box::new(store.clone()), Box::new(store)));
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        tracing::warn!(
            path = %db_path.display(),
            "persistent storage requested via --db-path, but the 'storage-rocksdb' feature is not enabled; falling back to in-memory storage"
        );
    }
    Ok((
        Box::new(InMemoryOrderStore::new()),
        Box::new(InMemoryPaymentStore::new()),
    ))
}

fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value).into_diagnostic()?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = Arc::new(settings::load(cli.config.as_deref()).into_diagnostic()?);
    let client = HttpGatewayClient::new(config.clone());

    if let Command::Receipt { ticket } = &cli.command {
        let receipt = client.receipt(ticket).await.into_diagnostic()?;
        return print_json(&receipt);
    }

    let (orders, payments) = open_stores(cli.db_path)?;
    let messenger = InMemoryMessenger::new();
    let gateway = MonerisCheckout::configure(
        config.as_ref().clone(),
        Collaborators {
            orders,
            payments,
            gateway: Box::new(client),
            messenger: Box::new(messenger.clone()),
            events: Box::new(BroadcastEventBus::default()),
            numbers: None,
        },
    )
    .into_diagnostic()?;

    match cli.command {
        Command::Preload {
            order,
            return_url,
            cancel_url,
            language,
        } => {
            let order = read_order(&order)?;
            let payment = PendingPayment {
                order_id: order.id.clone(),
                amount: order.balance,
            };
            seed_order(gateway.orders(), order).await?;

            let context = RequestContext {
                request_time: now(),
                language,
                return_url,
                cancel_url,
            };
            let settings = gateway
                .build_checkout(&payment, &context)
                .await
                .into_diagnostic()?;
            print_json(&settings)
        }
        Command::Return { target, query } => {
            let order_id = resolve_order(gateway.orders(), target).await?;
            let params = CallbackParams::from_query(&query);
            let payment = gateway
                .on_return(&order_id, &params)
                .await
                .into_diagnostic()?;
            print_json(&payment)
        }
        Command::Cancel { target, query } => {
            let order_id = resolve_order(gateway.orders(), target).await?;
            let params = CallbackParams::from_query(&query);
            gateway
                .on_cancel(&order_id, &params)
                .await
                .into_diagnostic()?;
            for message in messenger.drain().await {
                println!("{:?}: {}", message.level, message.text);
            }
            Ok(())
        }
        Command::Receipt { .. } => Ok(()),
    }
}

async fn seed_order(orders: &dyn OrderStore, order: Order) -> Result<()> {
    if orders.get(&order.id).await.into_diagnostic()?.is_none() {
        orders.store(order).await.into_diagnostic()?;
    }
    Ok(())
}

fn read_order(path: &Path) -> Result<Order> {
    let raw = std::fs::read_to_string(path).into_diagnostic()?;
    serde_json::from_str(&raw).into_diagnostic()
}

async fn resolve_order(orders: &dyn OrderStore, target: CallbackTarget) -> Result<String> {
    match (target.order_id, target.order) {
        (_, Some(path)) => {
            let order = read_order(&path)?;
            let id = order.id.clone();
            seed_order(orders, order).await?;
            Ok(id)
        }
        (Some(id), None) => Ok(id),
        (None, None) => Err(miette!("either --order-id or --order is required")),
    }
}
