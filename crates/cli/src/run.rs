//! `deckcheck run`: reconcile a deck against a workbook.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use clap::Args;

use deckcheck_io::export::write_report_xlsx;
use deckcheck_io::{open_spreadsheet, JsonDeck};
use deckcheck_recon::model::OutcomeStatus;
use deckcheck_recon::report::write_csv;
use deckcheck_recon::{PresentationReader, ReconConfig, ReconResult, SpreadsheetReader};

use crate::exit_codes::{summary_exit_code, EXIT_ERROR, EXIT_SUCCESS};
use crate::{load_config, CliError, ExtractArgs};

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Presentation dump (.json)
    pub deck: PathBuf,

    /// Workbook (.xlsx, .xls, .xlsb, .ods) or a single .csv sheet
    pub workbook: PathBuf,

    #[command(flatten)]
    pub extract: ExtractArgs,

    /// Print the full result as JSON to stdout instead of the CSV report
    #[arg(long)]
    pub json: bool,

    /// Write the discrepancy report as CSV
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Write the discrepancy report as xlsx
    #[arg(long)]
    pub xlsx: Option<PathBuf>,

    /// Write the full result as JSON to a file
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Suppress per-block lines on stderr
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

/// Export targets after merging flags over the config's `[output]` table.
struct Outputs {
    csv: Option<PathBuf>,
    xlsx: Option<PathBuf>,
    json: Option<PathBuf>,
}

impl Outputs {
    /// Flags win. Config paths are relative to the config file.
    fn resolve(args: &RunArgs, config: &ReconConfig) -> Self {
        let base = args
            .extract
            .config
            .as_deref()
            .and_then(Path::parent)
            .unwrap_or_else(|| Path::new("."));
        let from_config = |p: &Option<String>| p.as_ref().map(|p| base.join(p));
        Self {
            csv: args.csv.clone().or_else(|| from_config(&config.output.csv)),
            xlsx: args.xlsx.clone().or_else(|| from_config(&config.output.xlsx)),
            json: args.output.clone().or_else(|| from_config(&config.output.json)),
        }
    }
}

pub fn cmd_run(args: RunArgs) -> Result<(), CliError> {
    let config = load_config(&args.extract)?;

    let slides = JsonDeck::open(&args.deck)?.slides()?;
    let sheets = open_spreadsheet(&args.workbook)?.sheets()?;
    let result = deckcheck_recon::run(&config, &slides, &sheets)?;

    if !args.quiet {
        print_outcomes(&result);
    }

    write_outputs(&result, &Outputs::resolve(&args, &config), args.quiet)?;

    if args.json {
        println!("{}", to_json(&result)?);
    } else {
        write_csv(&result.records, io::stdout().lock())?;
    }

    let s = &result.summary;
    match summary_exit_code(s) {
        EXIT_SUCCESS => Ok(()),
        code if s.discrepancies > 0 => Err(CliError::new(
            code,
            format!("{} discrepancies in {} block(s)", s.discrepancies, s.mismatched),
        )),
        code => Err(CliError::new(
            code,
            format!(
                "{} unmatched, {} failed, {} malformed block(s)",
                s.unmatched, s.normalization_failures, s.malformed
            ),
        )
        .with_hint("run with --verbose to see how blocks were labelled and paired")),
    }
}

fn write_outputs(result: &ReconResult, outputs: &Outputs, quiet: bool) -> Result<(), CliError> {
    if let Some(path) = &outputs.csv {
        let file = File::create(path).map_err(|e| write_err(path, e))?;
        write_csv(&result.records, BufWriter::new(file))?;
        announce(path, quiet);
    }
    if let Some(path) = &outputs.xlsx {
        write_report_xlsx(&result.records, path)?;
        announce(path, quiet);
    }
    if let Some(path) = &outputs.json {
        std::fs::write(path, to_json(result)?).map_err(|e| write_err(path, e))?;
        announce(path, quiet);
    }
    Ok(())
}

fn print_outcomes(result: &ReconResult) {
    for o in &result.outcomes {
        let reference = o.reference_label.as_deref().unwrap_or("");
        match o.status {
            OutcomeStatus::Match => eprintln!("match      {} -> {}", o.label, reference),
            OutcomeStatus::Mismatch => eprintln!(
                "mismatch   {} -> {} ({} discrepanc{})",
                o.label,
                reference,
                o.discrepancies,
                if o.discrepancies == 1 { "y" } else { "ies" }
            ),
            OutcomeStatus::Unmatched => eprintln!("unmatched  {}", o.label),
            OutcomeStatus::NormalizationFailed => eprintln!(
                "failed     {} -> {}: {}",
                o.label,
                reference,
                o.reason.as_deref().unwrap_or("")
            ),
        }
    }
    for d in &result.defects {
        eprintln!("malformed  {} {}: '{}': {}", d.side, d.location, d.label, d.reason);
    }

    let s = &result.summary;
    eprintln!(
        "{} slide block(s) vs {} sheet block(s): {} matched, {} mismatched, {} unmatched, {} failed, {} malformed",
        s.source_blocks,
        s.reference_blocks,
        s.matched,
        s.mismatched,
        s.unmatched,
        s.normalization_failures,
        s.malformed,
    );
}

fn announce(path: &Path, quiet: bool) {
    if !quiet {
        eprintln!("wrote {}", path.display());
    }
}

fn to_json(result: &ReconResult) -> Result<String, CliError> {
    serde_json::to_string_pretty(result)
        .map_err(|e| CliError::new(EXIT_ERROR, format!("JSON serialization error: {e}")))
}

fn write_err(path: &Path, err: io::Error) -> CliError {
    CliError::new(EXIT_ERROR, format!("cannot write {}: {err}", path.display()))
}
