//! Pearson correlation between the columns of a numeric table.

use crate::data::{DataError, NumericTable};
use serde::Serialize;
use tracing::{debug, warn};

/// Square, symmetric column x column correlation, rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let a = self.columns.iter().position(|c| c == a)?;
        let b = self.columns.iter().position(|c| c == b)?;
        Some(self.values[a][b])
    }
}

/// Pearson correlation of two equal-length samples.
///
/// Returns `None` when either sample has zero variance.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Correlation between every pair of columns in `table`.
///
/// A zero-variance column correlates `0.0` with every other column and `1.0`
/// with itself.
pub fn correlation_matrix(table: &NumericTable) -> Result<CorrelationMatrix, DataError> {
    if table.len() < 2 {
        return Err(DataError::NotEnoughRows {
            required: 2,
            found: table.len(),
        });
    }

    let columns = table.columns().to_vec();
    let n = columns.len();
    let data: Vec<Vec<f64>> = (0..n).map(|c| table.column(c)).collect();

    let mut values = vec![vec![0.0; n]; n];
    for a in 0..n {
        values[a][a] = 1.0;
        for b in (a + 1)..n {
            let r = match pearson(&data[a], &data[b]) {
                Some(r) => round2(r),
                None => {
                    warn!(a = %columns[a], b = %columns[b], "Zero variance column, correlation set to 0");
                    0.0
                }
            };
            values[a][b] = r;
            values[b][a] = r;
        }
    }

    debug!(columns = n, rows = table.len(), "Computed correlation matrix");
    Ok(CorrelationMatrix { columns, values })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DataSource, MockDataSource};

    fn table(columns: Vec<(&str, Vec<f64>)>) -> NumericTable {
        NumericTable::from_columns(
            columns
                .into_iter()
                .map(|(n, c)| (n.to_string(), c))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_perfect_correlations() {
        let t = table(vec![
            ("x", vec![1.0, 2.0, 3.0, 4.0]),
            ("double", vec![2.0, 4.0, 6.0, 8.0]),
            ("neg", vec![4.0, 3.0, 2.0, 1.0]),
        ]);
        let m = correlation_matrix(&t).unwrap();
        assert_eq!(m.get("x", "double"), Some(1.0));
        assert_eq!(m.get("x", "neg"), Some(-1.0));
        assert_eq!(m.get("neg", "neg"), Some(1.0));
    }

    #[test]
    fn test_rounded_to_two_decimals() {
        let t = table(vec![
            ("a", vec![1.0, 2.0, 3.0, 4.0, 5.0]),
            ("b", vec![2.0, 1.0, 4.0, 3.0, 5.0]),
        ]);
        // r = 0.8 exactly for this pair
        let m = correlation_matrix(&t).unwrap();
        assert_eq!(m.get("a", "b"), Some(0.8));
    }

    #[test]
    fn test_constant_column() {
        let t = table(vec![("a", vec![1.0, 2.0, 3.0]), ("c", vec![5.0, 5.0, 5.0])]);
        let m = correlation_matrix(&t).unwrap();
        assert_eq!(m.get("a", "c"), Some(0.0));
        assert_eq!(m.get("c", "c"), Some(1.0));
    }

    #[test]
    fn test_symmetric() {
        let t = MockDataSource::default()
            .sales(100)
            .map(|t| correlation_matrix(&t).unwrap())
            .unwrap();
        for a in 0..t.columns.len() {
            for b in 0..t.columns.len() {
                assert_eq!(t.values[a][b], t.values[b][a]);
                assert!((-1.0..=1.0).contains(&t.values[a][b]));
            }
        }
    }

    #[test]
    fn test_too_few_rows() {
        let t = table(vec![("a", vec![1.0])]);
        assert!(matches!(
            correlation_matrix(&t),
            Err(DataError::NotEnoughRows { .. })
        ));
    }
}
