//! Production reporting: filters, KPIs and chart datasets.
//!
//! Aggregations group by mineral and return groups in alphabetical order.

mod export;
mod format;

pub use export::{to_csv, CSV_HEADER};
pub use format::{format_money, format_thousands, format_tonnes};

use crate::data::ProductionRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Invalid date range: {from} is after {to}")]
    InvalidRange { from: NaiveDate, to: NaiveDate },

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV export failed: {0}")]
    Export(String),
}

pub type Result<T> = std::result::Result<T, ReportError>;

/// Record filter. `None` fields do not filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub minerals: Option<Vec<String>>,
}

impl ReportFilter {
    /// Keeps records inside the inclusive date range whose mineral is selected.
    pub fn apply(&self, records: &[ProductionRecord]) -> Result<Vec<ProductionRecord>> {
        if let (Some(from), Some(to)) = (self.from, self.to) {
            if from > to {
                return Err(ReportError::InvalidRange { from, to });
            }
        }

        let kept: Vec<ProductionRecord> = records
            .iter()
            .filter(|r| self.from.map_or(true, |from| r.date >= from))
            .filter(|r| self.to.map_or(true, |to| r.date <= to))
            .filter(|r| {
                self.minerals
                    .as_ref()
                    .map_or(true, |m| m.iter().any(|name| *name == r.mineral))
            })
            .cloned()
            .collect();

        debug!(total = records.len(), kept = kept.len(), "Filtered production records");
        Ok(kept)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Kpis {
    pub total_tonnes: u64,
    pub total_cost: u64,
    pub total_profit: u64,
}

pub fn kpis(records: &[ProductionRecord]) -> Kpis {
    records.iter().fold(Kpis::default(), |acc, r| Kpis {
        total_tonnes: acc.total_tonnes + r.tonnes,
        total_cost: acc.total_cost + r.cost,
        total_profit: acc.total_profit + r.profit,
    })
}

/// Monthly tonnes of one mineral, in date order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MineralSeries {
    pub mineral: String,
    pub points: Vec<(NaiveDate, u64)>,
}

pub fn monthly_series(records: &[ProductionRecord]) -> Vec<MineralSeries> {
    let mut grouped: BTreeMap<&str, Vec<(NaiveDate, u64)>> = BTreeMap::new();
    for r in records {
        grouped
            .entry(r.mineral.as_str())
            .or_default()
            .push((r.date, r.tonnes));
    }

    grouped
        .into_iter()
        .map(|(mineral, mut points)| {
            points.sort_by_key(|(date, _)| *date);
            MineralSeries {
                mineral: mineral.to_string(),
                points,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CostProfit {
    pub mineral: String,
    pub cost: u64,
    pub profit: u64,
}

pub fn cost_vs_profit(records: &[ProductionRecord]) -> Vec<CostProfit> {
    let mut grouped: BTreeMap<&str, (u64, u64)> = BTreeMap::new();
    for r in records {
        let entry = grouped.entry(r.mineral.as_str()).or_default();
        entry.0 += r.cost;
        entry.1 += r.profit;
    }

    grouped
        .into_iter()
        .map(|(mineral, (cost, profit))| CostProfit {
            mineral: mineral.to_string(),
            cost,
            profit,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductionShare {
    pub mineral: String,
    pub tonnes: u64,
    /// Fraction of all tonnes, `0.0` when nothing was produced.
    pub share: f64,
}

pub fn production_share(records: &[ProductionRecord]) -> Vec<ProductionShare> {
    let total: u64 = records.iter().map(|r| r.tonnes).sum();

    let mut grouped: BTreeMap<&str, u64> = BTreeMap::new();
    for r in records {
        *grouped.entry(r.mineral.as_str()).or_default() += r.tonnes;
    }

    grouped
        .into_iter()
        .map(|(mineral, tonnes)| ProductionShare {
            mineral: mineral.to_string(),
            tonnes,
            share: if total == 0 {
                0.0
            } else {
                tonnes as f64 / total as f64
            },
        })
        .collect()
}

/// Profit against its target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfitGauge {
    pub value: u64,
    pub target: u64,
    pub ratio: f64,
}

pub fn profit_gauge(total_profit: u64, target: u64) -> ProfitGauge {
    ProfitGauge {
        value: total_profit,
        target,
        ratio: if target == 0 {
            0.0
        } else {
            total_profit as f64 / target as f64
        },
    }
}
