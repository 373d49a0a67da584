//! Presentation dumps in JSON.
//!
//! An upstream exporter walks the deck and writes each slide's text
//! frames, chart caches and tables as
//! `{"slides": [{"index": 0, "elements": [...]}, ...]}`.
//! A bare array of slides is accepted too.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use deckcheck_recon::{PresentationReader, ReconError, Slide};

use crate::read_error;

#[derive(Deserialize)]
#[serde(untagged)]
enum DeckFile {
    Wrapped { slides: Vec<Slide> },
    Bare(Vec<Slide>),
}

#[derive(Debug, Clone)]
pub struct JsonDeck {
    path: PathBuf,
    content: String,
}

impl JsonDeck {
    pub fn open(path: &Path) -> Result<Self, ReconError> {
        let content = std::fs::read_to_string(path).map_err(|e| read_error(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            content,
        })
    }

    /// In-memory deck; `name` is only used in error messages.
    pub fn from_json(name: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: name.into(),
            content: content.into(),
        }
    }
}

impl PresentationReader for JsonDeck {
    fn slides(&mut self) -> Result<Vec<Slide>, ReconError> {
        let deck: DeckFile =
            serde_json::from_str(&self.content).map_err(|e| read_error(&self.path, e))?;
        let mut slides = match deck {
            DeckFile::Wrapped { slides } | DeckFile::Bare(slides) => slides,
        };
        slides.sort_by_key(|s| s.index);
        log::debug!("{}: {} slide(s)", self.path.display(), slides.len());
        Ok(slides)
    }
}
