// deckcheck CLI - reconcile presentation charts and tables against the
// spreadsheet they were built from

mod blocks;
mod exit_codes;
mod run;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use deckcheck_recon::{ReconConfig, ReconError};

use exit_codes::{recon_error_exit_code, EXIT_READ_ERROR, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "deckcheck")]
#[command(about = "Check presentation charts and tables against their source spreadsheet")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Log extraction and matching detail to stderr (RUST_LOG takes precedence)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile a presentation dump against a workbook
    #[command(after_help = "\
Examples:
  deckcheck run deck.json data.xlsx
  deckcheck run deck.json data.xlsx --layout marker_blocks --csv diff.csv
  deckcheck run deck.json data.xlsx --config quarterly.deckcheck.toml --json
  deckcheck run deck.json ventas.csv --xlsx diff.xlsx --quiet

Exit codes:
  0  every block matched
  3  discrepancies found
  4  unmatched, failed or malformed blocks (no discrepancies)
  5  a document yielded no blocks
  6  invalid config
  7  a document could not be read")]
    Run(run::RunArgs),

    /// Print the blocks extracted from one document as JSON
    #[command(after_help = "\
Examples:
  deckcheck blocks deck.json
  deckcheck blocks data.xlsx --layout marker_blocks --marker '## Diapositiva'")]
    Blocks {
        /// A presentation dump (.json) or a workbook (.xlsx, .xls, .ods, .csv)
        file: PathBuf,

        #[command(flatten)]
        extract: ExtractArgs,
    },

    /// Validate a config file without running
    #[command(after_help = "\
Examples:
  deckcheck validate quarterly.deckcheck.toml")]
    Validate {
        /// Path to the .deckcheck.toml config file
        config: PathBuf,
    },
}

/// Options shared by every command that extracts blocks.
#[derive(Args, Debug, Default)]
pub struct ExtractArgs {
    /// Path to a .deckcheck.toml config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Prefix that marks a block title (overrides the config)
    #[arg(long)]
    pub marker: Option<String>,

    /// Spreadsheet layout: whole_sheet or marker_blocks (overrides the config)
    #[arg(long)]
    pub layout: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run(args) => run::cmd_run(args),
        Commands::Blocks { file, extract } => blocks::cmd_blocks(file, &extract),
        Commands::Validate { config } => cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            "\nengine:  deckcheck-recon ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   debug",
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            "\nengine:  deckcheck-recon ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   release",
        )
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn usage(msg: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, msg)
    }

    pub fn read(msg: impl Into<String>) -> Self {
        Self::new(EXIT_READ_ERROR, msg)
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<ReconError> for CliError {
    fn from(err: ReconError) -> Self {
        let hint = match &err {
            ReconError::EmptySource { .. } => Some(
                "check the marker prefix (--marker) and the sheet layout (--layout)".to_string(),
            ),
            ReconError::ConfigParse(_) => {
                Some("run `deckcheck validate <CONFIG>` for details".to_string())
            }
            _ => None,
        };
        Self { code: recon_error_exit_code(&err), message: err.to_string(), hint }
    }
}

// ============================================================================
// Config
// ============================================================================

/// Config file (or defaults) with command-line overrides applied, validated.
pub fn load_config(args: &ExtractArgs) -> Result<ReconConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|e| {
                CliError::read(format!("cannot read config {}: {e}", path.display()))
            })?;
            ReconConfig::from_toml(&text)?
        }
        None => ReconConfig::default(),
    };

    if let Some(marker) = &args.marker {
        config.marker_prefix = marker.clone();
    }
    if let Some(layout) = &args.layout {
        config.sheet_layout = layout
            .parse()
            .map_err(|e: ReconError| CliError::usage(format!("--layout: {e}")))?;
    }

    config.validate()?;
    log::debug!(
        "config '{}': marker '{}', layout {}",
        config.name,
        config.marker_prefix,
        config.sheet_layout
    );
    Ok(config)
}

// ============================================================================
// validate
// ============================================================================

fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let text = std::fs::read_to_string(&config_path)
        .map_err(|e| CliError::read(format!("cannot read config: {e}")))?;
    let config = ReconConfig::from_toml(&text)?;
    eprintln!(
        "valid: '{}' (marker '{}', layout {}, identifier '{}')",
        config.name, config.marker_prefix, config.sheet_layout, config.identifier_label,
    );
    Ok(())
}
