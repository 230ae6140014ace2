use clap::{Args, Parser, Subcommand};
use drs_payments::application::engine::{
    EngineOptions, EnginePorts, Operation, Outcome, PaymentEngine,
};
use drs_payments::config::Settings;
use drs_payments::domain::criteria::{AuctionReference, RequestCriteria};
use drs_payments::domain::identity::SecurityContext;
use drs_payments::domain::participant::ParticipantType;
use drs_payments::domain::payment::PaymentStatus;
use drs_payments::domain::ports::{
    CallbackDeliveryHandle, PaymentRecordStore, PaymentRecordStoreHandle, PaymentViewSourceHandle,
};
use drs_payments::infrastructure::in_memory::InMemoryPaymentStore;
use drs_payments::interfaces::csv::payment_reader::PaymentRecordReader;
use drs_payments::interfaces::csv::status_update_reader::StatusUpdateReader;
use drs_payments::interfaces::report::ResultWriter;
use drs_payments::logging;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input payment records CSV file
    payments: PathBuf,

    /// Settings JSON file (schemes, participants, payment types, transitions)
    #[arg(long)]
    config: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Principal the request runs on behalf of
    #[arg(long, default_value = "cli")]
    principal: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute payments for the selected participants
    Compute(CriteriaArgs),
    /// Generate invoices for the selected payments
    Invoice(CriteriaArgs),
    /// Move the selected payments to a new status
    Transition {
        #[arg(long)]
        status: PaymentStatus,
        #[command(flatten)]
        criteria: CriteriaArgs,
    },
    /// Apply explicit `record_id, status` updates from a CSV file
    UpdateStatus { updates: PathBuf },
}

#[derive(Args)]
struct CriteriaArgs {
    #[arg(long)]
    participant_type: ParticipantType,

    /// Comma separated participant ids, or ALL
    #[arg(long, value_delimiter = ',')]
    ids: Vec<String>,

    /// Treat `--ids` as an exclusion list
    #[arg(long)]
    exclude: bool,

    #[arg(long)]
    scheme: Option<String>,

    /// Auction lot; takes precedence over `--scheme`
    #[arg(long)]
    lot: Option<String>,

    #[arg(long, requires = "lot")]
    auction_type: Option<String>,

    /// Comma separated payment types, or ALL
    #[arg(long, value_delimiter = ',')]
    payment_types: Vec<String>,

    /// Run in the background and post one result per scheme to this URL
    #[arg(long)]
    callback_url: Option<String>,
}

impl From<CriteriaArgs> for RequestCriteria {
    fn from(args: CriteriaArgs) -> Self {
        let mut criteria = RequestCriteria::new(args.participant_type);
        if !args.ids.is_empty() {
            criteria = criteria.with_participant_ids(args.ids, !args.exclude);
        }
        if !args.payment_types.is_empty() {
            criteria = criteria.with_payment_types(args.payment_types);
        }
        if let Some(scheme) = args.scheme {
            criteria = criteria.with_scheme(scheme);
        }
        if let Some(lot_id) = args.lot {
            criteria = criteria.with_auction(AuctionReference {
                lot_id,
                auction_type: args.auction_type,
            });
        }
        if let Some(url) = args.callback_url {
            criteria = criteria.with_callback(url);
        }
        criteria
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    let settings = Settings::from_path(&cli.config).into_diagnostic()?;
    let (records, views) = open_store(cli.db_path)?;

    // Load payment records; ones already in the store keep their status
    let file = File::open(&cli.payments).into_diagnostic()?;
    let mut loaded = 0usize;
    for record in PaymentRecordReader::new(file).records() {
        match record {
            Ok(record) => match records.get(&record.record_id).await {
                Ok(Some(_)) => {}
                Ok(None) => {
                    let record_id = record.record_id.clone();
                    match records.store(record).await {
                        Ok(()) => loaded += 1,
                        Err(e) => warn!(%record_id, error = %e, "Error storing payment record"),
                    }
                }
                Err(e) => warn!(record_id = %record.record_id, error = %e, "Error reading store"),
            },
            Err(e) => warn!(error = %e, "Error reading payment record"),
        }
    }
    info!(loaded, "Payment records loaded");

    let engine = PaymentEngine::new(
        EnginePorts {
            schemes: Arc::new(settings.scheme_registry()),
            roster: Arc::new(settings.participant_roster().await),
            views,
            records,
            delivery: callback_delivery(&settings)?,
        },
        EngineOptions {
            known_payment_types: settings.payment_types.clone(),
            transitions: settings.transitions.clone(),
            max_background_tasks: settings.max_background_tasks,
        },
    );

    let ctx = SecurityContext::new(cli.principal);
    let stdout = io::stdout();
    let mut writer = ResultWriter::new(stdout.lock());

    let (operation, criteria) = match cli.command {
        Command::Compute(args) => (Operation::Compute, RequestCriteria::from(args)),
        Command::Invoice(args) => (Operation::Invoice, RequestCriteria::from(args)),
        Command::Transition { status, criteria } => {
            (Operation::Transition(status), RequestCriteria::from(criteria))
        }
        Command::UpdateStatus { updates } => {
            let file = File::open(updates).into_diagnostic()?;
            let mut batch = Vec::new();
            for update in StatusUpdateReader::new(file).updates() {
                match update {
                    Ok(update) => batch.push(update),
                    Err(e) => warn!(error = %e, "Error reading status update"),
                }
            }
            let summary = engine.update_statuses(&batch, &ctx).await;
            writer.write_all([&summary]).into_diagnostic()?;
            return Ok(());
        }
    };

    match engine.handle(operation, criteria, ctx).await.into_diagnostic()? {
        Outcome::Completed(results) => writer.write_all(&results).into_diagnostic()?,
        Outcome::Submitted(submission) => {
            writer
                .write_all([&serde_json::json!({
                    "batchId": submission.batch_id,
                    "status": "SUBMITTED",
                })])
                .into_diagnostic()?;
            // Deliveries finish before the process exits
            submission.handle.await.into_diagnostic()?;
        }
    }

    Ok(())
}

#[cfg(feature = "storage-rocksdb")]
fn open_store(
    db_path: Option<PathBuf>,
) -> Result<(PaymentRecordStoreHandle, PaymentViewSourceHandle)> {
    use drs_payments::infrastructure::rocksdb::RocksDBStore;

    if let Some(db_path) = db_path {
        let store = RocksDBStore::open(db_path).into_diagnostic()?;
        let records: PaymentRecordStoreHandle = Arc::new(store.clone());
        let views: PaymentViewSourceHandle = Arc::new(store);
        return Ok((records, views));
    }
    Ok(in_memory_store())
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_store(
    db_path: Option<PathBuf>,
) -> Result<(PaymentRecordStoreHandle, PaymentViewSourceHandle)> {
    if db_path.is_some() {
        warn!(
            "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
        );
    }
    Ok(in_memory_store())
}

fn in_memory_store() -> (PaymentRecordStoreHandle, PaymentViewSourceHandle) {
    let store = InMemoryPaymentStore::new();
    let records: PaymentRecordStoreHandle = Arc::new(store.clone());
    let views: PaymentViewSourceHandle = Arc::new(store);
    (records, views)
}

#[cfg(feature = "callback-http")]
fn callback_delivery(settings: &Settings) -> Result<CallbackDeliveryHandle> {
    use drs_payments::infrastructure::http_callback::HttpCallbackDelivery;

    let delivery = HttpCallbackDelivery::new(settings.callback_timeout()).into_diagnostic()?;
    Ok(Arc::new(delivery))
}

#[cfg(not(feature = "callback-http"))]
fn callback_delivery(_settings: &Settings) -> Result<CallbackDeliveryHandle> {
    use drs_payments::infrastructure::logging_callback::LoggingCallbackDelivery;

    Ok(Arc::new(LoggingCallbackDelivery))
}
