//! Input datasets for the dashboard views.
//!
//! Views never generate data themselves. They ask a [`DataSource`], so the
//! built-in [`MockDataSource`] can be swapped for a real backend without
//! touching the analytics.

mod mock;
mod types;

pub use mock::{MockDataSource, MINERALS, SALES_COLUMNS};
pub use types::{Customer, NumericTable, ProductionRecord, CUSTOMER_FEATURES};

use crate::recommend::{RatingsMatrix, RecommendError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("Need at least {required} rows, found {found}")]
    NotEnoughRows { required: usize, found: usize },

    #[error("Row width mismatch: expected {expected}, found {found}")]
    WidthMismatch { expected: usize, found: usize },

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid distribution: {0}")]
    Distribution(String),

    #[error("Ratings error: {0}")]
    Ratings(#[from] RecommendError),
}

pub type Result<T> = std::result::Result<T, DataError>;

/// Supplies the datasets each view analyses.
pub trait DataSource: Send + Sync {
    /// Users x items ratings for the recommender.
    fn ratings(&self) -> Result<RatingsMatrix>;

    /// Sales table for the correlation view. `rows` must be at least 2.
    fn sales(&self, rows: usize) -> Result<NumericTable>;

    /// Customer profiles for segmentation.
    fn customers(&self, count: usize) -> Result<Vec<Customer>>;

    /// Monthly production per mineral for reporting.
    fn production(&self) -> Result<Vec<ProductionRecord>>;
}
