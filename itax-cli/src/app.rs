use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result, bail};
use itax_core::db::{DeductionStore, MemoryStoreFactory, StoreRegistry};
use itax_core::{CalculationError, IncomeRequest, TaxService};
use itax_data::{DataError, open_csv};
use itax_db_sqlite::SqliteStoreFactory;
use tracing::debug;

use crate::cli::{CalculateArgs, Cli, Command, DeductionAction};
use crate::config;
use crate::logging;
use crate::output::{self, DeductionsView, KReceiptView, PersonalDeductionView, Report};

/// Exit status for input the caller can fix.
pub const EXIT_INPUT_ERROR: u8 = 2;
/// Exit status for store and I/O failures.
pub const EXIT_FAILURE: u8 = 1;

/// Registers every available backend.
pub fn build_registry() -> StoreRegistry {
    let mut registry = StoreRegistry::new();
    registry.register(Box::new(SqliteStoreFactory));
    registry.register(Box::new(MemoryStoreFactory));
    registry
}

/// Resolves settings, opens the store, runs the command and prints its
/// result.
pub async fn run(cli: Cli) -> Result<()> {
    let settings = config::load(&cli)?;
    logging::init_logging(settings.log_level.as_deref(), settings.log_file.as_deref())?;

    debug!(backend = %settings.db.backend, "connecting to deduction store");
    let store = build_registry()
        .create(&settings.db)
        .await
        .with_context(|| format!("Failed to open '{}' store", settings.db.backend))?;

    let report = execute(&cli.command, store.as_ref()).await?;
    println!("{}", output::render(&report, cli.round_cents)?);

    Ok(())
}

/// Runs one command against `store`.
pub async fn execute(
    command: &Command,
    store: &dyn DeductionStore,
) -> Result<Report> {
    let service = TaxService::new(store);

    let report = match command {
        Command::Calculate(args) => {
            let request = calculation_request(args)?;
            Report::Tax(service.calculate(&request).await?)
        }
        Command::Batch { file } => {
            let mut source = open_csv(file)?;
            Report::Batch(service.calculate_batch(&mut source).await?)
        }
        Command::Deductions { action } => match action {
            DeductionAction::Show => {
                Report::Deductions(DeductionsView::from(service.deductions().await?))
            }
            DeductionAction::Personal { amount } => {
                Report::PersonalDeduction(PersonalDeductionView {
                    personal_deduction: service.set_personal_deduction(*amount).await?,
                })
            }
            DeductionAction::KReceipt { amount } => Report::KReceipt(KReceiptView {
                k_receipt: service.set_k_receipt_deduction(*amount).await?,
            }),
        },
    };

    Ok(report)
}

fn calculation_request(args: &CalculateArgs) -> Result<IncomeRequest> {
    if let Some(request) = args.flag_request() {
        return Ok(request);
    }

    match &args.input {
        Some(path) => read_request(path),
        None => bail!("either --input or --income is required"),
    }
}

/// Reads a JSON request from `path`, or from stdin when `path` is `-`.
pub fn read_request(path: &Path) -> Result<IncomeRequest> {
    if path.as_os_str() == "-" {
        let mut buffer = Vec::new();
        io::stdin().lock().read_to_end(&mut buffer)?;
        if buffer.is_empty() {
            bail!("No input received. Provide a file or pipe a request to stdin.");
        }
        return parse_request(&buffer);
    }

    let file =
        File::open(path).with_context(|| format!("Failed to open: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse request: {}", path.display()))
}

fn parse_request(bytes: &[u8]) -> Result<IncomeRequest> {
    serde_json::from_slice(bytes).context("Failed to parse request from stdin")
}

/// Maps a failure to the process exit status.
pub fn exit_status(err: &anyhow::Error) -> u8 {
    if let Some(calc) = err.downcast_ref::<CalculationError>() {
        return if calc.is_input_error() {
            EXIT_INPUT_ERROR
        } else {
            EXIT_FAILURE
        };
    }

    match err.downcast_ref::<DataError>() {
        Some(DataError::NotCsv(_)) => EXIT_INPUT_ERROR,
        Some(DataError::Open { .. }) => EXIT_FAILURE,
        None if err.downcast_ref::<serde_json::Error>().is_some() => EXIT_INPUT_ERROR,
        None => EXIT_FAILURE,
    }
}
