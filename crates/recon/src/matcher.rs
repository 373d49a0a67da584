use crate::table::TableModel;

/// A presentation block and the sheet block it was paired with, by index
/// into the respective extraction lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockPair {
    pub source: usize,
    pub reference: Option<usize>,
}

/// Case-insensitive containment in either direction.
pub fn labels_match(label: &str, candidate: &str) -> bool {
    let label = label.trim().to_lowercase();
    let candidate = candidate.trim().to_lowercase();
    label.contains(&candidate) || candidate.contains(&label)
}

/// Index of the first candidate whose label matches `label`. Later candidates
/// are never considered once one matches.
pub fn match_label<S: AsRef<str>>(label: &str, candidates: &[S]) -> Option<usize> {
    candidates
        .iter()
        .position(|candidate| labels_match(label, candidate.as_ref()))
}

/// Pair every presentation block with at most one sheet block.
///
/// Sheet blocks are not exclusive: two slides may resolve to the same sheet
/// block. Sheet blocks nobody asks for are ignored.
pub fn pair_blocks(source: &[TableModel], reference: &[TableModel]) -> Vec<BlockPair> {
    let labels: Vec<&str> = reference.iter().map(|t| t.label.as_str()).collect();

    source
        .iter()
        .enumerate()
        .map(|(i, block)| {
            let found = match_label(&block.label, &labels);
            match found {
                Some(r) => log::debug!("'{}' paired with '{}'", block.label, labels[r]),
                None => log::debug!("'{}' has no matching sheet block", block.label),
            }
            BlockPair {
                source: i,
                reference: found,
            }
        })
        .collect()
}
