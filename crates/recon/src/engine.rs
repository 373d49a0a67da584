use crate::blocks::extract_sheets;
use crate::config::ReconConfig;
use crate::differ::diff_tables;
use crate::error::{ReconError, SourceSide};
use crate::matcher::pair_blocks;
use crate::model::{ReconMeta, ReconResult};
use crate::normalize::normalize;
use crate::report::{compute_summary, ReportAssembler};
use crate::source::{Slide, Sheet};
use crate::table::TableModel;

/// Run reconciliation over an already-read deck and workbook.
///
/// Only an empty document is fatal. Malformed blocks, unmatched slides and
/// pairs that fail to normalize are reported per block in the result.
pub fn run(
    config: &ReconConfig,
    slides: &[Slide],
    sheets: &[Sheet],
) -> Result<ReconResult, ReconError> {
    let source = crate::slides::extract_slides(slides, config);
    if source.blocks.is_empty() {
        return Err(ReconError::EmptySource {
            side: SourceSide::Presentation,
        });
    }

    let reference = extract_sheets(sheets, config);
    if reference.blocks.is_empty() {
        return Err(ReconError::EmptySource {
            side: SourceSide::Spreadsheet,
        });
    }

    let mut report = ReportAssembler::new();
    for pair in pair_blocks(&source.blocks, &reference.blocks) {
        let src = &source.blocks[pair.source];
        let Some(ref_idx) = pair.reference else {
            report.add_unmatched(&src.label);
            continue;
        };
        let reference_block = &reference.blocks[ref_idx];

        match compare_pair(src, reference_block, config) {
            Ok(records) => report.add_pair(&src.label, &reference_block.label, records),
            Err(err) => {
                log::warn!("{err}");
                report.add_failure(&src.label, &reference_block.label, &err);
            }
        }
    }

    let mut defects = source.defects;
    defects.extend(reference.defects);

    let (outcomes, records) = report.into_parts();
    let summary = compute_summary(
        &outcomes,
        &defects,
        source.blocks.len(),
        reference.blocks.len(),
    );

    Ok(ReconResult {
        meta: ReconMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        outcomes,
        defects,
        records,
    })
}

/// Normalize both sides of a pair and diff them.
pub fn compare_pair(
    source: &TableModel,
    reference: &TableModel,
    config: &ReconConfig,
) -> Result<Vec<crate::model::DiscrepancyRecord>, ReconError> {
    let source = normalize(source, config)?;
    let reference = normalize(reference, config)?;
    Ok(diff_tables(&source, &reference))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SheetLayout;
    use crate::model::{OutcomeStatus, ReportValue};
    use crate::source::{ChartData, ChartSeries, SlideElement};
    use crate::table::{Key, Value};

    fn chart_slide(index: usize, title: &str, q2_b: f64) -> Slide {
        Slide {
            index,
            elements: vec![
                SlideElement {
                    text: Some(title.into()),
                    ..Default::default()
                },
                SlideElement {
                    chart: Some(ChartData {
                        categories: vec!["Q1".into(), "Q2".into()],
                        series: vec![
                            ChartSeries {
                                name: "BrandA".into(),
                                values: vec![Some(10.0), Some(20.0)],
                            },
                            ChartSeries {
                                name: "BrandB".into(),
                                values: vec![Some(30.0), Some(q2_b)],
                            },
                        ],
                    }),
                    ..Default::default()
                },
            ],
        }
    }

    fn sheet(name: &str) -> Sheet {
        let t = |s: &str| Value::text(s);
        let n = Value::Number;
        Sheet {
            name: name.into(),
            rows: vec![
                vec![t("Marca"), t("Q1"), t("Q2")],
                vec![t("BrandA"), n(10.0), n(20.0)],
                vec![t("BrandB"), n(30.0), n(41.0)],
            ],
        }
    }

    #[test]
    fn end_to_end_single_discrepancy() {
        let slides = vec![chart_slide(0, "Indicador Ventas", 40.0)];
        let sheets = vec![sheet("Indicador Ventas")];
        let result = run(&ReconConfig::default(), &slides, &sheets).unwrap();

        assert_eq!(result.summary.mismatched, 1);
        assert_eq!(result.records.len(), 1);
        let r = &result.records[0];
        assert_eq!(r.identifier(), &Key::from("BrandB"));
        assert_eq!(r.category(), &Key::from("Q2"));
        assert_eq!(r.source_value(), &ReportValue::Value(Value::Number(40.0)));
        assert_eq!(r.reference_value(), &ReportValue::Value(Value::Number(41.0)));
    }

    #[test]
    fn unmatched_slide_is_reported_not_fatal() {
        let slides = vec![
            chart_slide(0, "Indicador Ventas", 41.0),
            chart_slide(1, "Indicador Costos", 41.0),
        ];
        let sheets = vec![sheet("Ventas")];
        let result = run(&ReconConfig::default(), &slides, &sheets).unwrap();
        assert_eq!(result.outcomes[0].status, OutcomeStatus::Match);
        assert_eq!(result.outcomes[1].status, OutcomeStatus::Unmatched);
        assert!(result.records.is_empty());
        assert_eq!(result.summary.unmatched, 1);
    }

    #[test]
    fn empty_presentation_is_fatal() {
        let err = run(&ReconConfig::default(), &[], &[sheet("x")]).unwrap_err();
        assert!(matches!(
            err,
            ReconError::EmptySource {
                side: SourceSide::Presentation
            }
        ));
    }

    #[test]
    fn empty_spreadsheet_is_fatal() {
        let slides = vec![chart_slide(0, "Indicador Ventas", 40.0)];
        let config = ReconConfig {
            sheet_layout: SheetLayout::MarkerBlocks,
            ..Default::default()
        };
        // No marker rows, so marker layout finds nothing.
        let err = run(&config, &slides, &[sheet("Ventas")]).unwrap_err();
        assert!(err.to_string().contains("spreadsheet"));
    }

    #[test]
    fn normalization_failure_is_scoped_to_pair() {
        let slides = vec![
            chart_slide(0, "Indicador Ventas", 41.0),
            chart_slide(1, "Indicador Vacio", 41.0),
        ];
        let t = |s: &str| Value::text(s);
        let empty = Sheet {
            name: "Indicador Vacio".into(),
            rows: vec![vec![t("Marca")], vec![t("BrandA")]],
        };
        let result = run(&ReconConfig::default(), &slides, &[sheet("Ventas"), empty]).unwrap();
        assert_eq!(result.outcomes[0].status, OutcomeStatus::Match);
        assert_eq!(result.outcomes[1].status, OutcomeStatus::NormalizationFailed);
        assert!(result.outcomes[1].reason.is_some());
    }
}
