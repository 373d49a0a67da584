use crate::config::ReconConfig;
use crate::error::{ReconError, SourceSide};
use crate::model::BlockDefect;
use crate::source::{has_marker, ChartData, Extraction, Slide};
use crate::table::{TableModel, Value};

/// Pull every chart and table out of a deck.
///
/// Blocks on one slide share the slide's label. Malformed blocks are dropped
/// into `defects`; nothing here fails the whole deck.
pub fn extract_slides(slides: &[Slide], config: &ReconConfig) -> Extraction {
    let mut out = Extraction::default();

    for slide in slides {
        let label = slide_label(slide, config);
        let location = format!("slide {}", slide.index + 1);

        for element in &slide.elements {
            if let Some(ref chart) = element.chart {
                push_block(
                    &mut out,
                    chart_table(&label, chart, &config.identifier_label),
                    &label,
                    &location,
                );
            }
            if let Some(ref grid) = element.table {
                if grid.is_empty() {
                    continue;
                }
                push_block(&mut out, plain_table(&label, grid), &label, &location);
            }
        }
    }

    out
}

/// Title of a slide: the first text element that starts with the marker
/// prefix, else `"{fallback_label} {n}"` with a 1-based slide number.
pub fn slide_label(slide: &Slide, config: &ReconConfig) -> String {
    slide
        .elements
        .iter()
        .filter_map(|e| e.text.as_deref())
        .map(str::trim)
        .find(|text| has_marker(text, &config.marker_prefix))
        .map(str::to_string)
        .unwrap_or_else(|| format!("{} {}", config.fallback_label, slide.index + 1))
}

/// Chart → table: series are rows, categories are columns.
fn chart_table(
    label: &str,
    chart: &ChartData,
    identifier_label: &str,
) -> Result<TableModel, ReconError> {
    let width = chart.categories.len() + 1;

    let mut header = Vec::with_capacity(width);
    header.push(Value::text(identifier_label));
    header.extend(chart.categories.iter().map(|c| Value::parse_text(c)));

    let mut data = Vec::with_capacity(chart.series.len());
    for (i, series) in chart.series.iter().enumerate() {
        if series.values.len() + 1 != width {
            return Err(ReconError::MalformedBlock {
                label: label.to_string(),
                row: i + 2,
                expected: width,
                found: series.values.len() + 1,
            });
        }
        let mut row = Vec::with_capacity(width);
        row.push(Value::parse_text(&series.name));
        row.extend(
            series
                .values
                .iter()
                .map(|v| v.map(Value::number).unwrap_or_default()),
        );
        data.push(row);
    }

    TableModel::from_grid(label, &header, &data)
}

/// Plain table → table: first row is the header, first column the row key.
fn plain_table(label: &str, grid: &[Vec<String>]) -> Result<TableModel, ReconError> {
    let rows: Vec<Vec<Value>> = grid
        .iter()
        .map(|row| row.iter().map(|cell| Value::parse_text(cell)).collect())
        .collect();
    TableModel::from_grid(label, &rows[0], &rows[1..])
}

fn push_block(
    out: &mut Extraction,
    block: Result<TableModel, ReconError>,
    label: &str,
    location: &str,
) {
    match block {
        Ok(table) => {
            log::debug!(
                "{location}: block '{label}' with {} row(s), {} column(s)",
                table.rows().len(),
                table.columns().len()
            );
            out.blocks.push(table);
        }
        Err(err) => {
            log::warn!("{location}: dropping block '{label}': {err}");
            out.defects.push(BlockDefect {
                side: SourceSide::Presentation,
                location: location.to_string(),
                label: label.to_string(),
                reason: err.to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{ChartSeries, SlideElement};
    use crate::table::Key;

    fn text(s: &str) -> SlideElement {
        SlideElement {
            text: Some(s.into()),
            ..Default::default()
        }
    }

    fn chart(categories: &[&str], series: &[(&str, &[f64])]) -> SlideElement {
        SlideElement {
            chart: Some(ChartData {
                categories: categories.iter().map(|c| c.to_string()).collect(),
                series: series
                    .iter()
                    .map(|(name, values)| ChartSeries {
                        name: name.to_string(),
                        values: values.iter().map(|v| Some(*v)).collect(),
                    })
                    .collect(),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn first_marker_text_labels_slide() {
        let slide = Slide {
            index: 0,
            elements: vec![
                text("Resumen"),
                text("  Indicador Ventas "),
                text("indicador Otro"),
            ],
        };
        assert_eq!(slide_label(&slide, &ReconConfig::default()), "Indicador Ventas");
    }

    #[test]
    fn fallback_label_is_positional() {
        let slide = Slide {
            index: 4,
            elements: vec![text("Resumen")],
        };
        assert_eq!(slide_label(&slide, &ReconConfig::default()), "Diapositiva 5");
    }

    #[test]
    fn chart_becomes_series_by_category_table() {
        let slides = vec![Slide {
            index: 0,
            elements: vec![
                text("Indicador Ventas"),
                chart(&["Q1", "Q2"], &[("BrandA", &[10.0, 20.0]), ("BrandB", &[30.0, 40.0])]),
            ],
        }];
        let out = extract_slides(&slides, &ReconConfig::default());
        assert!(out.defects.is_empty());
        assert_eq!(out.blocks.len(), 1);
        let table = &out.blocks[0];
        assert_eq!(table.label, "Indicador Ventas");
        assert_eq!(table.index_name, "Marca");
        assert_eq!(table.rows(), &[Key::from("BrandA"), Key::from("BrandB")]);
        assert_eq!(
            table.get(&Key::from("BrandB"), &Key::from("Q2")),
            Some(&Value::Number(40.0))
        );
    }

    #[test]
    fn marker_after_chart_still_labels_chart() {
        let slides = vec![Slide {
            index: 1,
            elements: vec![chart(&["Q1"], &[("A", &[1.0])]), text("Indicador Marca")],
        }];
        let out = extract_slides(&slides, &ReconConfig::default());
        assert_eq!(out.blocks[0].label, "Indicador Marca");
    }

    #[test]
    fn missing_series_value_is_null() {
        let element = SlideElement {
            chart: Some(ChartData {
                categories: vec!["Q1".into(), "Q2".into()],
                series: vec![ChartSeries {
                    name: "A".into(),
                    values: vec![Some(1.0), None],
                }],
            }),
            ..Default::default()
        };
        let slides = vec![Slide { index: 0, elements: vec![element] }];
        let out = extract_slides(&slides, &ReconConfig::default());
        assert_eq!(out.blocks[0].get(&Key::from("A"), &Key::from("Q2")), Some(&Value::Null));
    }

    #[test]
    fn ragged_series_is_a_defect() {
        let slides = vec![Slide {
            index: 2,
            elements: vec![chart(&["Q1", "Q2"], &[("A", &[1.0])])],
        }];
        let out = extract_slides(&slides, &ReconConfig::default());
        assert!(out.blocks.is_empty());
        assert_eq!(out.defects.len(), 1);
        assert_eq!(out.defects[0].location, "slide 3");
        assert_eq!(out.defects[0].label, "Diapositiva 3");
        assert_eq!(out.defects[0].side, SourceSide::Presentation);
    }

    #[test]
    fn plain_table_parses_numbers() {
        let element = SlideElement {
            table: Some(vec![
                vec!["Marca".into(), "Q1".into()],
                vec!["BrandA".into(), " 12.5 ".into()],
            ]),
            ..Default::default()
        };
        let slides = vec![Slide { index: 0, elements: vec![element] }];
        let out = extract_slides(&slides, &ReconConfig::default());
        assert_eq!(
            out.blocks[0].get(&Key::from("BrandA"), &Key::from("Q1")),
            Some(&Value::Number(12.5))
        );
    }

    #[test]
    fn slide_without_visuals_contributes_nothing() {
        let slides = vec![Slide {
            index: 0,
            elements: vec![text("Indicador Ventas")],
        }];
        let out = extract_slides(&slides, &ReconConfig::default());
        assert!(out.blocks.is_empty());
        assert!(out.defects.is_empty());
    }
}
