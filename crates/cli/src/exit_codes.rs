//! CLI Exit Code Registry
//!
//! Single source of truth for `deckcheck` exit codes. Scripts and CI jobs
//! gate on these, so existing values never change meaning.
//!
//! | Code | Meaning                                               |
//! |------|-------------------------------------------------------|
//! | 0    | Every presentation block matched its spreadsheet block |
//! | 1    | General error (unspecified)                           |
//! | 2    | Usage error (bad args, bad flag value)                |
//! | 3    | Discrepancies found                                   |
//! | 4    | No discrepancies, but blocks were unmatched or failed |
//! | 5    | A document yielded no blocks                          |
//! | 6    | Invalid config                                        |
//! | 7    | A document could not be read                          |

use deckcheck_recon::model::ReconSummary;
use deckcheck_recon::ReconError;

pub const EXIT_SUCCESS: u8 = 0;

/// Avoid where a specific code applies.
pub const EXIT_ERROR: u8 = 1;

/// clap also exits with 2 on argument errors.
pub const EXIT_USAGE: u8 = 2;

/// At least one cell differs between a matched pair.
pub const EXIT_DISCREPANCIES: u8 = 3;

/// Unmatched slides, pairs that failed to normalize, or malformed blocks,
/// with no cell-level discrepancies.
pub const EXIT_INCOMPLETE: u8 = 4;

pub const EXIT_EMPTY_SOURCE: u8 = 5;

pub const EXIT_INVALID_CONFIG: u8 = 6;

pub const EXIT_READ_ERROR: u8 = 7;

/// Exit code for an engine or reader error.
pub fn recon_error_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_INVALID_CONFIG,
        ReconError::EmptySource { .. } => EXIT_EMPTY_SOURCE,
        ReconError::Read { .. } => EXIT_READ_ERROR,
        ReconError::MalformedBlock { .. }
        | ReconError::Normalization { .. }
        | ReconError::Io(_) => EXIT_ERROR,
    }
}

/// Exit code for a completed run. Discrepancies outrank incomplete coverage.
pub fn summary_exit_code(summary: &ReconSummary) -> u8 {
    if summary.is_clean() {
        EXIT_SUCCESS
    } else if summary.discrepancies > 0 {
        EXIT_DISCREPANCIES
    } else {
        EXIT_INCOMPLETE
    }
}
