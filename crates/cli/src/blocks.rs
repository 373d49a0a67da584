//! `deckcheck blocks`: show what the extractors see in one document.

use std::path::PathBuf;

use serde::Serialize;

use deckcheck_io::{open_spreadsheet, JsonDeck};
use deckcheck_recon::blocks::extract_sheets;
use deckcheck_recon::model::BlockDefect;
use deckcheck_recon::slides::extract_slides;
use deckcheck_recon::source::Extraction;
use deckcheck_recon::{
    PresentationReader, ReconError, SourceSide, SpreadsheetReader, TableModel,
};

use crate::exit_codes::EXIT_ERROR;
use crate::{load_config, CliError, ExtractArgs};

#[derive(Serialize)]
struct BlocksView<'a> {
    side: SourceSide,
    blocks: &'a [TableModel],
    defects: &'a [BlockDefect],
}

pub fn cmd_blocks(file: PathBuf, extract: &ExtractArgs) -> Result<(), CliError> {
    let config = load_config(extract)?;

    let is_deck = file
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let (side, Extraction { blocks, defects }) = if is_deck {
        let slides = JsonDeck::open(&file)?.slides()?;
        (SourceSide::Presentation, extract_slides(&slides, &config))
    } else {
        let sheets = open_spreadsheet(&file)?.sheets()?;
        (SourceSide::Spreadsheet, extract_sheets(&sheets, &config))
    };

    let view = BlocksView {
        side,
        blocks: &blocks,
        defects: &defects,
    };
    let json = serde_json::to_string_pretty(&view)
        .map_err(|e| CliError::new(EXIT_ERROR, format!("JSON serialization error: {e}")))?;
    println!("{json}");

    eprintln!("{} block(s), {} malformed", blocks.len(), defects.len());
    if blocks.is_empty() {
        return Err(ReconError::EmptySource { side }.into());
    }
    Ok(())
}
