use std::fmt;

use serde::ser::Serializer;
use serde::Serialize;

use crate::error::SourceSide;
use crate::table::{Key, Value};

// ---------------------------------------------------------------------------
// Discrepancies
// ---------------------------------------------------------------------------

/// A cell value as reported in a discrepancy, or the reason it is absent.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportValue {
    Value(Value),
    /// The column does not exist on this side.
    NotFound,
    /// The identifier row does not exist in the reference table.
    IdentifierNotFound,
}

impl ReportValue {
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for ReportValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{v}"),
            Self::NotFound => write!(f, "not found"),
            Self::IdentifierNotFound => write!(f, "identifier not found"),
        }
    }
}

impl Serialize for ReportValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(v) => v.serialize(serializer),
            Self::NotFound => serializer.serialize_str("not found"),
            Self::IdentifierNotFound => serializer.serialize_str("identifier not found"),
        }
    }
}

impl From<Value> for ReportValue {
    fn from(v: Value) -> Self {
        Self::Value(v)
    }
}

/// One cell-level finding. Built by the differ, never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscrepancyRecord {
    identifier: Key,
    category: Key,
    source_value: ReportValue,
    reference_value: ReportValue,
    source_block: String,
    reference_block: String,
}

impl DiscrepancyRecord {
    pub(crate) fn new(
        identifier: Key,
        category: Key,
        source_value: ReportValue,
        reference_value: ReportValue,
        source_block: &str,
        reference_block: &str,
    ) -> Self {
        Self {
            identifier,
            category,
            source_value,
            reference_value,
            source_block: source_block.to_string(),
            reference_block: reference_block.to_string(),
        }
    }

    pub fn identifier(&self) -> &Key {
        &self.identifier
    }

    pub fn category(&self) -> &Key {
        &self.category
    }

    pub fn source_value(&self) -> &ReportValue {
        &self.source_value
    }

    pub fn reference_value(&self) -> &ReportValue {
        &self.reference_value
    }

    pub fn source_block(&self) -> &str {
        &self.source_block
    }

    pub fn reference_block(&self) -> &str {
        &self.reference_block
    }
}

// ---------------------------------------------------------------------------
// Per-block outcomes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Match,
    Mismatch,
    Unmatched,
    NormalizationFailed,
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Match => write!(f, "match"),
            Self::Mismatch => write!(f, "mismatch"),
            Self::Unmatched => write!(f, "unmatched"),
            Self::NormalizationFailed => write!(f, "normalization_failed"),
        }
    }
}

/// Verdict for one presentation block.
#[derive(Debug, Clone, Serialize)]
pub struct BlockOutcome {
    pub label: String,
    pub status: OutcomeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_label: Option<String>,
    pub discrepancies: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// A block dropped during extraction.
#[derive(Debug, Clone, Serialize)]
pub struct BlockDefect {
    pub side: SourceSide,
    /// `slide 3` or `sheet Datos`.
    pub location: String,
    pub label: String,
    pub reason: String,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconSummary {
    pub source_blocks: usize,
    pub reference_blocks: usize,
    pub matched: usize,
    pub mismatched: usize,
    pub unmatched: usize,
    pub malformed: usize,
    pub normalization_failures: usize,
    pub discrepancies: usize,
}

impl ReconSummary {
    /// Every presentation block found its sheet block and agreed with it.
    pub fn is_clean(&self) -> bool {
        self.mismatched == 0
            && self.unmatched == 0
            && self.normalization_failures == 0
            && self.malformed == 0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub outcomes: Vec<BlockOutcome>,
    pub defects: Vec<BlockDefect>,
    pub records: Vec<DiscrepancyRecord>,
}
