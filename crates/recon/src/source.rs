//! Document shapes handed to the engine by reader collaborators.
//!
//! Readers own the container formats; the engine only ever sees these
//! already-materialized slides and cell grids.

use serde::{Deserialize, Serialize};

use crate::error::ReconError;
use crate::model::BlockDefect;
use crate::table::{TableModel, Value};

// ---------------------------------------------------------------------------
// Presentation side
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Slide {
    /// Zero-based position in the deck.
    pub index: usize,
    #[serde(default)]
    pub elements: Vec<SlideElement>,
}

/// One shape on a slide. Any combination of the three may be present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlideElement {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub chart: Option<ChartData>,
    #[serde(default)]
    pub table: Option<Vec<Vec<String>>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChartData {
    pub categories: Vec<String>,
    pub series: Vec<ChartSeries>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChartSeries {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

pub trait PresentationReader {
    fn slides(&mut self) -> Result<Vec<Slide>, ReconError>;
}

// ---------------------------------------------------------------------------
// Spreadsheet side
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<Value>>,
}

pub trait SpreadsheetReader {
    fn sheets(&mut self) -> Result<Vec<Sheet>, ReconError>;
}

// ---------------------------------------------------------------------------
// Extraction output
// ---------------------------------------------------------------------------

/// Blocks pulled from one document plus the ones that had to be dropped.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub blocks: Vec<TableModel>,
    pub defects: Vec<BlockDefect>,
}

/// Case-insensitive `starts_with`.
pub(crate) fn has_marker(text: &str, marker_prefix: &str) -> bool {
    text.to_lowercase()
        .starts_with(&marker_prefix.trim().to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_is_case_insensitive() {
        assert!(has_marker("INDICADOR Ventas", "Indicador"));
        assert!(has_marker("## diapositiva 3", "## Diapositiva"));
        assert!(!has_marker("Ventas indicador", "Indicador"));
    }

    #[test]
    fn slide_json_defaults_missing_fields() {
        let slide: Slide = serde_json::from_str(
            r#"{"index": 2, "elements": [{"text": "Indicador Ventas"}, {"chart": {"categories": ["Q1"], "series": [{"name": "A", "values": [1.5]}]}}]}"#,
        )
        .unwrap();
        assert_eq!(slide.index, 2);
        assert!(slide.elements[0].chart.is_none());
        let chart = slide.elements[1].chart.as_ref().unwrap();
        assert_eq!(chart.series[0].values, vec![Some(1.5)]);
    }
}
