use super::{DataError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A table of named numeric columns, stored row by row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericTable {
    columns: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl NumericTable {
    pub fn new<C>(columns: C) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Builds a table from whole columns of equal length.
    pub fn from_columns(columns: Vec<(String, Vec<f64>)>) -> Result<Self> {
        let len = columns.first().map(|(_, c)| c.len()).unwrap_or(0);
        if let Some((_, bad)) = columns.iter().find(|(_, c)| c.len() != len) {
            return Err(DataError::WidthMismatch {
                expected: len,
                found: bad.len(),
            });
        }

        let rows = (0..len)
            .map(|r| columns.iter().map(|(_, c)| c[r]).collect())
            .collect();
        Ok(Self {
            columns: columns.into_iter().map(|(name, _)| name).collect(),
            rows,
        })
    }

    pub fn push_row(&mut self, row: Vec<f64>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(DataError::WidthMismatch {
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Copies out one column.
    pub fn column(&self, idx: usize) -> Vec<f64> {
        self.rows.iter().map(|row| row[idx]).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A customer profile used for segmentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: u32,
    pub age: u32,
    pub income: u32,
    pub avg_spend: u32,
    /// Purchases per month
    pub purchase_frequency: u32,
}

impl Customer {
    /// Feature vector fed to clustering: age, income, average spend, frequency.
    pub fn features(&self) -> Vec<f64> {
        vec![
            f64::from(self.age),
            f64::from(self.income),
            f64::from(self.avg_spend),
            f64::from(self.purchase_frequency),
        ]
    }
}

/// Feature names matching [`Customer::features`].
pub const CUSTOMER_FEATURES: [&str; 4] = ["age", "income", "avg_spend", "purchase_frequency"];

/// Monthly output of one mineral.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionRecord {
    pub date: NaiveDate,
    pub mineral: String,
    pub tonnes: u64,
    pub cost: u64,
    pub profit: u64,
}
