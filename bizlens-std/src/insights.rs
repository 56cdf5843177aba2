use bizlens_core::{correlation_matrix, CorrelationMatrix, DataSource};
use bizlens_view::{parse_params, Result, View, ViewError, ViewOutput};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

const MIN_ROWS: usize = 50;
const MAX_ROWS: usize = 500;
const ROW_STEP: usize = 50;

/// Correlation heatmap over generated sales data.
pub struct InsightsView {
    source: Arc<dyn DataSource>,
    default_rows: usize,
}

#[derive(Debug, Deserialize)]
struct InsightParams {
    rows: Option<usize>,
}

impl InsightsView {
    pub fn new(source: Arc<dyn DataSource>, default_rows: usize) -> Self {
        Self {
            source,
            default_rows,
        }
    }
}

impl View for InsightsView {
    fn name(&self) -> &str {
        "insights"
    }

    fn title(&self) -> &str {
        "Insights"
    }

    fn description(&self) -> &str {
        "Interactive correlation heatmap of sales drivers"
    }

    fn parameter_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "rows": {
                    "type": "integer",
                    "description": "Number of generated records",
                    "minimum": MIN_ROWS,
                    "maximum": MAX_ROWS,
                    "multipleOf": ROW_STEP,
                    "default": self.default_rows
                }
            }
        })
    }

    fn render(&self, params: Value) -> Result<ViewOutput> {
        let params: InsightParams = parse_params(params)?;
        let rows = params.rows.unwrap_or(self.default_rows);
        if !(MIN_ROWS..=MAX_ROWS).contains(&rows) || rows % ROW_STEP != 0 {
            return Err(ViewError::InvalidInput(format!(
                "rows must be a multiple of {} between {} and {}",
                ROW_STEP, MIN_ROWS, MAX_ROWS
            )));
        }

        let table = self.source.sales(rows)?;
        let matrix = correlation_matrix(&table)?;

        let data = serde_json::json!({
            "heatmap": {
                "label": "Correlation",
                "x": matrix.columns,
                "y": matrix.columns,
                "z": matrix.values,
                "zmin": -1.0,
                "zmax": 1.0,
                "color_scale": "RdBu_r",
            },
            "table": table,
        });

        Ok(ViewOutput::new(summary(&matrix, rows)).with_data(data))
    }
}

/// Names the strongest off-diagonal correlation.
fn summary(matrix: &CorrelationMatrix, rows: usize) -> String {
    let n = matrix.columns.len();
    let strongest = (0..n)
        .flat_map(|a| ((a + 1)..n).map(move |b| (a, b)))
        .max_by(|&(a1, b1), &(a2, b2)| {
            matrix.values[a1][b1]
                .abs()
                .total_cmp(&matrix.values[a2][b2].abs())
        });

    match strongest {
        Some((a, b)) => format!(
            "Correlation over {} records. Strongest relationship: {} / {} ({:.2})",
            rows, matrix.columns[a], matrix.columns[b], matrix.values[a][b]
        ),
        None => format!("Correlation over {} records.", rows),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizlens_core::MockDataSource;

    fn view() -> InsightsView {
        InsightsView::new(Arc::new(MockDataSource::default()), 200)
    }

    #[test]
    fn test_default_rows() {
        let output = view().render(Value::Null).unwrap();
        let data = output.data.unwrap();

        assert_eq!(data["heatmap"]["x"].as_array().unwrap().len(), 7);
        assert_eq!(data["table"]["rows"].as_array().unwrap().len(), 200);
        assert!(output.content.contains("200 records"));
    }

    #[test]
    fn test_buyers_follow_visitors() {
        let output = view().render(serde_json::json!({ "rows": 500 })).unwrap();
        assert!(output.content.contains("Store Visitors / Buyers"));
    }

    #[test]
    fn test_rows_validation() {
        for rows in [0, 40, 75, 550] {
            let err = view()
                .render(serde_json::json!({ "rows": rows }))
                .unwrap_err();
            assert!(matches!(err, ViewError::InvalidInput(_)));
        }
    }
}
