//! Customer segmentation.
//!
//! Customers are clustered with K-Means on age, income, average spend and
//! purchase frequency. Features are used unscaled, so income dominates the
//! distance.

mod kmeans;

pub use kmeans::{KMeans, KMeansFit};

use crate::config::SegmentationConfig;
use crate::data::{Customer, CUSTOMER_FEATURES};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum SegmentationError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Need at least {clusters} points for {clusters} clusters, found {points}")]
    NotEnoughPoints { clusters: usize, points: usize },

    #[error("Dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
}

pub type Result<T> = std::result::Result<T, SegmentationError>;

/// A customer with its assigned segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentedCustomer {
    #[serde(flatten)]
    pub customer: Customer,
    pub segment: usize,
}

/// Size and feature means of one segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentSummary {
    pub segment: usize,
    pub count: usize,
    /// Means in [`CUSTOMER_FEATURES`] order.
    pub means: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segmentation {
    pub features: Vec<String>,
    pub customers: Vec<SegmentedCustomer>,
    pub segments: Vec<SegmentSummary>,
    pub inertia: f64,
}

/// Clusters `customers` with the configured K-Means parameters.
pub fn segment_customers(
    customers: &[Customer],
    config: &SegmentationConfig,
    seed: u64,
) -> Result<Segmentation> {
    let points: Vec<Vec<f64>> = customers.iter().map(Customer::features).collect();

    let fit = KMeans::new(config.clusters)
        .with_n_init(config.n_init)
        .with_max_iter(config.max_iter)
        .with_tolerance(config.tolerance)
        .with_random_state(seed)
        .fit(&points)?;

    let segments = (0..config.clusters)
        .map(|segment| {
            let members: Vec<&Vec<f64>> = points
                .iter()
                .zip(&fit.labels)
                .filter(|(_, l)| **l == segment)
                .map(|(p, _)| p)
                .collect();
            let count = members.len();
            let means = (0..CUSTOMER_FEATURES.len())
                .map(|f| {
                    if count == 0 {
                        0.0
                    } else {
                        members.iter().map(|p| p[f]).sum::<f64>() / count as f64
                    }
                })
                .collect();
            SegmentSummary {
                segment,
                count,
                means,
            }
        })
        .collect();

    let customers = customers
        .iter()
        .cloned()
        .zip(&fit.labels)
        .map(|(customer, &segment)| SegmentedCustomer { customer, segment })
        .collect();

    info!(
        customers = points.len(),
        clusters = config.clusters,
        inertia = fit.inertia,
        "Segmented customers"
    );

    Ok(Segmentation {
        features: CUSTOMER_FEATURES.iter().map(|f| f.to_string()).collect(),
        customers,
        segments,
        inertia: fit.inertia,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DataSource, MockDataSource};

    #[test]
    fn test_segment_mock_customers() {
        let customers = MockDataSource::default().customers(200).unwrap();
        let result = segment_customers(&customers, &SegmentationConfig::default(), 42).unwrap();

        assert_eq!(result.customers.len(), 200);
        assert_eq!(result.segments.len(), 4);
        assert_eq!(result.segments.iter().map(|s| s.count).sum::<usize>(), 200);
        assert!(result.customers.iter().all(|c| c.segment < 4));
        assert_eq!(result.features.len(), 4);
    }

    #[test]
    fn test_too_few_customers() {
        let customers = MockDataSource::default().customers(2).unwrap();
        assert!(matches!(
            segment_customers(&customers, &SegmentationConfig::default(), 42),
            Err(SegmentationError::NotEnoughPoints { .. })
        ));
    }
}
