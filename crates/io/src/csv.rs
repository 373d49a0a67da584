// CSV/TSV workbook reader

use std::path::{Path, PathBuf};

use deckcheck_recon::{ReconError, Sheet, SpreadsheetReader, Value};

use crate::read_error;

/// A delimited text file read as a workbook with one sheet, named after the
/// file stem.
#[derive(Debug, Clone)]
pub struct CsvSheet {
    path: PathBuf,
    name: String,
    content: String,
    delimiter: Option<u8>,
}

impl CsvSheet {
    pub fn open(path: &Path) -> Result<Self, ReconError> {
        let bytes = std::fs::read(path).map_err(|e| read_error(path, e))?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let tsv = path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("tsv"));
        Ok(Self {
            path: path.to_path_buf(),
            name,
            content: decode(bytes),
            delimiter: tsv.then_some(b'\t'),
        })
    }

    pub fn from_text(name: impl Into<String>, content: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            path: PathBuf::from(&name),
            name,
            content: content.into(),
            delimiter: None,
        }
    }
}

impl SpreadsheetReader for CsvSheet {
    fn sheets(&mut self) -> Result<Vec<Sheet>, ReconError> {
        let delimiter = self
            .delimiter
            .unwrap_or_else(|| sniff_delimiter(&self.content));
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(self.content.as_bytes());

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| read_error(&self.path, e))?;
            rows.push(record.iter().map(Value::parse_text).collect());
        }
        log::debug!(
            "{}: {} row(s), delimiter {:?}",
            self.path.display(),
            rows.len(),
            delimiter as char
        );

        Ok(vec![Sheet {
            name: self.name.clone(),
            rows,
        }])
    }
}

/// Pick the delimiter that gives the most consistent field count (>1) over
/// the first lines. Ties go to the wider split.
fn sniff_delimiter(content: &str) -> u8 {
    let sample: Vec<&str> = content.lines().take(10).collect();
    let mut best = b',';
    let mut best_score = 0usize;

    for &delim in &[b'\t', b';', b',', b'|'] {
        let counts: Vec<usize> = sample
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map_or(1, |r| r.len())
            })
            .collect();

        let Some(&target) = counts.first() else {
            return best;
        };
        if target <= 1 {
            continue;
        }
        let score = counts.iter().filter(|&&c| c == target).count() * target;
        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

/// UTF-8, falling back to Windows-1252 (Excel's usual CSV encoding).
fn decode(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(e.as_bytes());
            decoded.into_owned()
        }
    }
}
