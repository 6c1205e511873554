use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use itax_core::{AllowanceInput, AllowanceKind, IncomeRequest};

/// Progressive personal income tax calculator.
///
/// Reads deduction settings from the configured store, calculates tax for a
/// single taxpayer or a CSV batch, and prints the result as JSON.
#[derive(Debug, Parser)]
#[command(name = "itax", version, about, long_about = None)]
pub struct Cli {
    /// TOML configuration file. Defaults to `./itax.toml` when present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Deduction store backend (`sqlite` or `memory`).
    #[arg(long, global = true)]
    pub backend: Option<String>,

    /// Store connection string.
    /// For SQLite this is a file path (e.g. `itax.db`), a `sqlite:` URL or `:memory:`.
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Append log output to this file as well as stderr.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Round monetary amounts in the output to two decimal places.
    #[arg(long, global = true, default_value_t = false)]
    pub round_cents: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Calculate tax for one taxpayer.
    Calculate(CalculateArgs),

    /// Calculate tax for every row of a CSV file.
    Batch {
        /// CSV file with a `totalIncome,wht,donation` header.
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Show or change the administrator deduction settings.
    Deductions {
        #[command(subcommand)]
        action: DeductionAction,
    },
}

#[derive(Debug, Args)]
pub struct CalculateArgs {
    /// JSON request file, or `-` to read stdin.
    #[arg(short, long, conflicts_with_all = ["income", "wht", "donation", "k_receipt"])]
    pub input: Option<PathBuf>,

    /// Total income for the year.
    #[arg(long, allow_negative_numbers = true, required_unless_present = "input")]
    pub income: Option<f64>,

    /// Withholding tax already paid.
    #[arg(long, allow_negative_numbers = true)]
    pub wht: Option<f64>,

    /// Donation amount; may be given more than once.
    #[arg(long, allow_negative_numbers = true)]
    pub donation: Vec<f64>,

    /// K-receipt amount; may be given more than once.
    #[arg(long = "k-receipt", allow_negative_numbers = true)]
    pub k_receipt: Vec<f64>,
}

impl CalculateArgs {
    /// Builds a request from the amount flags. `None` when `--input` is used
    /// instead.
    pub fn flag_request(&self) -> Option<IncomeRequest> {
        let total_income = self.income?;

        let allowances = self
            .donation
            .iter()
            .map(|amount| AllowanceInput::new(AllowanceKind::Donation.as_str(), *amount))
            .chain(
                self.k_receipt
                    .iter()
                    .map(|amount| AllowanceInput::new(AllowanceKind::KReceipt.as_str(), *amount)),
            )
            .collect();

        Some(IncomeRequest {
            total_income,
            wht: self.wht.unwrap_or(0.0),
            allowances,
        })
    }
}

#[derive(Debug, Subcommand)]
pub enum DeductionAction {
    /// Print the current settings.
    Show,

    /// Set the personal deduction (10,000 to 100,000).
    Personal {
        #[arg(allow_negative_numbers = true)]
        amount: f64,
    },

    /// Set the k-receipt ceiling (0 to 100,000).
    KReceipt {
        #[arg(allow_negative_numbers = true)]
        amount: f64,
    },
}
