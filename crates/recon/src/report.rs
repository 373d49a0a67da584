use std::io::Write;

use crate::error::ReconError;
use crate::model::{BlockDefect, BlockOutcome, DiscrepancyRecord, OutcomeStatus, ReconSummary};

/// Column headers of the exported discrepancy table.
pub const REPORT_HEADERS: [&str; 6] = [
    "Identifier",
    "Category",
    "Source Value",
    "Reference Value",
    "Source Block",
    "Reference Block",
];

/// Collects per-pair diffs, in matching order, into one flat report.
#[derive(Debug, Default)]
pub struct ReportAssembler {
    records: Vec<DiscrepancyRecord>,
    outcomes: Vec<BlockOutcome>,
}

impl ReportAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// A matched pair and its diff; an empty diff is a full match.
    pub fn add_pair(
        &mut self,
        source_label: &str,
        reference_label: &str,
        records: Vec<DiscrepancyRecord>,
    ) {
        let status = if records.is_empty() {
            OutcomeStatus::Match
        } else {
            OutcomeStatus::Mismatch
        };
        self.outcomes.push(BlockOutcome {
            label: source_label.to_string(),
            status,
            reference_label: Some(reference_label.to_string()),
            discrepancies: records.len(),
            reason: None,
        });
        self.records.extend(records);
    }

    pub fn add_unmatched(&mut self, source_label: &str) {
        self.outcomes.push(BlockOutcome {
            label: source_label.to_string(),
            status: OutcomeStatus::Unmatched,
            reference_label: None,
            discrepancies: 0,
            reason: None,
        });
    }

    pub fn add_failure(&mut self, source_label: &str, reference_label: &str, err: &ReconError) {
        self.outcomes.push(BlockOutcome {
            label: source_label.to_string(),
            status: OutcomeStatus::NormalizationFailed,
            reference_label: Some(reference_label.to_string()),
            discrepancies: 0,
            reason: Some(err.to_string()),
        });
    }

    pub fn records(&self) -> &[DiscrepancyRecord] {
        &self.records
    }

    pub fn outcomes(&self) -> &[BlockOutcome] {
        &self.outcomes
    }

    pub fn into_parts(self) -> (Vec<BlockOutcome>, Vec<DiscrepancyRecord>) {
        (self.outcomes, self.records)
    }
}

/// Summary counts over outcomes and defects.
pub fn compute_summary(
    outcomes: &[BlockOutcome],
    defects: &[BlockDefect],
    source_blocks: usize,
    reference_blocks: usize,
) -> ReconSummary {
    let mut summary = ReconSummary {
        source_blocks,
        reference_blocks,
        malformed: defects.len(),
        ..Default::default()
    };

    for outcome in outcomes {
        summary.discrepancies += outcome.discrepancies;
        match outcome.status {
            OutcomeStatus::Match => summary.matched += 1,
            OutcomeStatus::Mismatch => summary.mismatched += 1,
            OutcomeStatus::Unmatched => summary.unmatched += 1,
            OutcomeStatus::NormalizationFailed => summary.normalization_failures += 1,
        }
    }

    summary
}

/// Write records as CSV with [`REPORT_HEADERS`]. Nothing but the header is
/// written when there are no records.
pub fn write_csv<W: Write>(records: &[DiscrepancyRecord], writer: W) -> Result<(), ReconError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(REPORT_HEADERS)?;
    for r in records {
        wtr.write_record([
            r.identifier().to_string(),
            r.category().to_string(),
            r.source_value().to_string(),
            r.reference_value().to_string(),
            r.source_block().to_string(),
            r.reference_block().to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceSide;
    use crate::model::ReportValue;
    use crate::table::{Key, Value};

    fn record(id: &str, src: f64, refv: ReportValue) -> DiscrepancyRecord {
        DiscrepancyRecord::new(
            Key::from(id),
            Key::from("Q2"),
            ReportValue::Value(Value::Number(src)),
            refv,
            "Indicador Ventas",
            "Ventas",
        )
    }

    #[test]
    fn assembles_in_pair_order() {
        let mut asm = ReportAssembler::new();
        asm.add_pair("first", "r1", vec![record("B", 40.0, ReportValue::NotFound)]);
        asm.add_unmatched("second");
        asm.add_pair("third", "r3", vec![]);
        asm.add_pair(
            "fourth",
            "r4",
            vec![
                record("C", 1.0, ReportValue::IdentifierNotFound),
                record("D", 2.0, ReportValue::IdentifierNotFound),
            ],
        );

        assert_eq!(asm.records().len(), 3);
        assert_eq!(asm.records()[0].identifier(), &Key::from("B"));
        assert_eq!(asm.records()[2].identifier(), &Key::from("D"));

        let statuses: Vec<_> = asm.outcomes().iter().map(|o| o.status).collect();
        assert_eq!(
            statuses,
            vec![
                OutcomeStatus::Mismatch,
                OutcomeStatus::Unmatched,
                OutcomeStatus::Match,
                OutcomeStatus::Mismatch,
            ]
        );
    }

    #[test]
    fn unmatched_contributes_no_records() {
        let mut asm = ReportAssembler::new();
        asm.add_unmatched("Indicador Ventas");
        assert!(asm.records().is_empty());
        assert_eq!(asm.outcomes()[0].reference_label, None);
    }

    #[test]
    fn summary_counts() {
        let mut asm = ReportAssembler::new();
        asm.add_pair("a", "ra", vec![record("B", 40.0, ReportValue::NotFound)]);
        asm.add_pair("b", "rb", vec![]);
        asm.add_unmatched("c");
        asm.add_failure(
            "d",
            "rd",
            &ReconError::Normalization {
                label: "d".into(),
                reason: "empty".into(),
            },
        );
        let defects = vec![BlockDefect {
            side: SourceSide::Spreadsheet,
            location: "sheet X".into(),
            label: "x".into(),
            reason: "bad".into(),
        }];
        let summary = compute_summary(asm.outcomes(), &defects, 4, 3);
        assert_eq!(summary.source_blocks, 4);
        assert_eq!(summary.reference_blocks, 3);
        assert_eq!(summary.matched, 1);
        assert_eq!(summary.mismatched, 1);
        assert_eq!(summary.unmatched, 1);
        assert_eq!(summary.normalization_failures, 1);
        assert_eq!(summary.malformed, 1);
        assert_eq!(summary.discrepancies, 1);
    }

    #[test]
    fn csv_layout() {
        let records = vec![
            record("BrandB", 40.0, ReportValue::Value(Value::Number(41.0))),
            record("BrandC", 2.5, ReportValue::IdentifierNotFound),
        ];
        let mut buf = Vec::new();
        write_csv(&records, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "Identifier,Category,Source Value,Reference Value,Source Block,Reference Block"
        );
        assert_eq!(lines[1], "BrandB,Q2,40,41,Indicador Ventas,Ventas");
        assert_eq!(lines[2], "BrandC,Q2,2.5,identifier not found,Indicador Ventas,Ventas");
    }
}
