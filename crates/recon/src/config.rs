use serde::Deserialize;

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReconConfig {
    #[serde(default = "default_name")]
    pub name: String,
    /// Prefix that marks a block title, on slides and in sheet rows alike.
    /// Compared case-insensitively.
    #[serde(default = "default_marker_prefix")]
    pub marker_prefix: String,
    /// Slides without a marker title are labelled `"{fallback_label} {n}"`.
    #[serde(default = "default_fallback_label")]
    pub fallback_label: String,
    /// Identifier header given to chart blocks and to normalized tables.
    #[serde(default = "default_identifier_label")]
    pub identifier_label: String,
    /// First-column headers that mean "rows are identifiers".
    #[serde(default = "default_identifier_aliases")]
    pub identifier_aliases: Vec<String>,
    #[serde(default)]
    pub sheet_layout: SheetLayout,
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_name() -> String {
    "deckcheck".into()
}

fn default_marker_prefix() -> String {
    "Indicador".into()
}

fn default_fallback_label() -> String {
    "Diapositiva".into()
}

fn default_identifier_label() -> String {
    "Marca".into()
}

fn default_identifier_aliases() -> Vec<String> {
    vec!["Marca".into(), "Identificador".into()]
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            marker_prefix: default_marker_prefix(),
            fallback_label: default_fallback_label(),
            identifier_label: default_identifier_label(),
            identifier_aliases: default_identifier_aliases(),
            sheet_layout: SheetLayout::default(),
            output: OutputConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Sheet layout
// ---------------------------------------------------------------------------

/// How a spreadsheet is cut into blocks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetLayout {
    /// Each sheet is one block labelled by the sheet name.
    #[default]
    WholeSheet,
    /// Blocks start at marker rows and end at blank rows.
    MarkerBlocks,
}

impl std::fmt::Display for SheetLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WholeSheet => write!(f, "whole_sheet"),
            Self::MarkerBlocks => write!(f, "marker_blocks"),
        }
    }
}

impl std::str::FromStr for SheetLayout {
    type Err = ReconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "whole_sheet" => Ok(Self::WholeSheet),
            "marker_blocks" => Ok(Self::MarkerBlocks),
            other => Err(ReconError::ConfigValidation(format!(
                "unknown sheet_layout '{other}' (expected whole_sheet or marker_blocks)"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default)]
    pub csv: Option<String>,
    #[serde(default)]
    pub xlsx: Option<String>,
    #[serde(default)]
    pub json: Option<String>,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.marker_prefix.trim().is_empty() {
            return Err(ReconError::ConfigValidation(
                "marker_prefix must not be empty".into(),
            ));
        }

        if self.identifier_aliases.is_empty() {
            return Err(ReconError::ConfigValidation(
                "identifier_aliases must list at least one header".into(),
            ));
        }

        // Normalized tables carry identifier_label as their first header, so it
        // has to be recognized as row-major on a second pass.
        if !self.is_identifier_alias(&self.identifier_label) {
            return Err(ReconError::ConfigValidation(format!(
                "identifier_label '{}' is not one of identifier_aliases",
                self.identifier_label
            )));
        }

        Ok(())
    }

    /// Case-insensitive membership in `identifier_aliases`.
    pub fn is_identifier_alias(&self, header: &str) -> bool {
        let header = header.trim().to_lowercase();
        self.identifier_aliases
            .iter()
            .any(|alias| alias.trim().to_lowercase() == header)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
