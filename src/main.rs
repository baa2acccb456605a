use clap::{Parser, ValueEnum};
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tripsplit::application::engine::BalanceEngine;
use tripsplit::application::ledger::TripLedger;
use tripsplit::domain::money::SplitRule;
use tripsplit::domain::participant::ParticipantId;
use tripsplit::domain::ports::TripStoreBox;
use tripsplit::domain::trip::TripId;
use tripsplit::infrastructure::in_memory::InMemoryTripStore;
use tripsplit::interfaces::csv::balance_writer::BalanceWriter;
use tripsplit::interfaces::csv::expense_reader::ExpenseReader;
use tripsplit::interfaces::json::balance_report::write_balance_report;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input expenses CSV file
    input: PathBuf,

    /// Trip members (repeat the flag or separate with commas)
    #[arg(short, long = "member", value_delimiter = ',')]
    members: Vec<String>,

    /// Trip identifier
    #[arg(long, default_value = "trip")]
    trip: String,

    /// Display name used when the trip is created
    #[arg(long)]
    name: Option<String>,

    /// Only show balances if this participant is a trip member
    #[arg(long)]
    requester: Option<String>,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, env = "TRIPSPLIT_DB_PATH")]
    db_path: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// Round displayed amounts to this many decimal places
    #[arg(long)]
    scale: Option<u32>,

    /// Truncate shares to this many decimal places; the payer absorbs the remainder
    #[arg(long)]
    minor_units: Option<u32>,

    /// Log filter, e.g. `info` or `tripsplit=debug`
    #[arg(long, env = "TRIPSPLIT_LOG", default_value = "warn")]
    log_level: String,
}

fn open_store(db_path: Option<PathBuf>) -> Result<TripStoreBox> {
    match db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(path) => {
            tracing::info!(path = %path.display(), "using RocksDB storage");
            let store = tripsplit::infrastructure::rocksdb::RocksDBStore::open(path)
                .into_diagnostic()?;
            Ok(Box::new(store))
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => {
            eprintln!(
                "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
            );
            Ok(Box::new(InMemoryTripStore::new()))
        }
        None => Ok(Box::new(InMemoryTripStore::new())),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cli.log_level))
        .with_writer(io::stderr)
        .init();

    let split = cli
        .minor_units
        .map_or(SplitRule::Precise, SplitRule::MinorUnits);
    let ledger = TripLedger::new(open_store(cli.db_path)?).with_engine(BalanceEngine::new(split));

    let trip_id = TripId::new(cli.trip);
    let name = cli.name.unwrap_or_else(|| trip_id.to_string());
    let members = cli.members.into_iter().map(ParticipantId::from);
    ledger
        .ensure_trip(trip_id.clone(), &name, members)
        .await
        .into_diagnostic()?;

    // Read expenses
    let file = File::open(cli.input).into_diagnostic()?;
    let reader = ExpenseReader::new(file);
    let mut expenses = Vec::new();
    for expense in reader.expenses() {
        match expense {
            Ok(expense) => expenses.push(expense),
            Err(e) => eprintln!("Error reading expense: {}", e),
        }
    }

    // Record them against the trip
    let rejected = ledger
        .record_expenses(&trip_id, expenses)
        .await
        .into_diagnostic()?;
    for e in rejected {
        eprintln!("Error recording expense: {}", e);
    }

    let balances = match cli.requester {
        Some(requester) => ledger
            .balances_for(&trip_id, &ParticipantId::from(requester))
            .await
            .into_diagnostic()?,
        None => ledger.balances(&trip_id).await.into_diagnostic()?,
    };
    let balances = match cli.scale {
        Some(scale) => balances.rounded(scale),
        None => balances,
    };

    // Output final balances
    let stdout = io::stdout();
    match cli.format {
        OutputFormat::Csv => BalanceWriter::new(stdout.lock())
            .write_balances(&balances)
            .into_diagnostic()?,
        OutputFormat::Json => write_balance_report(stdout.lock(), &balances).into_diagnostic()?,
    }

    Ok(())
}
