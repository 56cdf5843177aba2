//! bizlens-core - Analytics behind the bizlens dashboard
//!
//! Provides the computations each dashboard view displays:
//! - Item-based collaborative filtering (recommendations)
//! - Column correlation (insights)
//! - K-Means customer segmentation
//! - Production reporting KPIs and CSV export
//! - A swappable data source with a seeded mock implementation
//! - Configuration management
//!
//! Everything here is synchronous and stateless; each call recomputes its
//! result from the inputs it is given.

pub mod config;
pub mod correlation;
pub mod data;
pub mod recommend;
pub mod reporting;
pub mod segmentation;

pub use config::{Config, ConfigError};
pub use correlation::{correlation_matrix, CorrelationMatrix};
pub use data::{DataError, DataSource, MockDataSource};
pub use recommend::{
    compute_item_similarity, recommend, RatingsMatrix, Recommendation, RecommendationResult,
    RecommendError, Recommender, SimilarityMatrix,
};
pub use reporting::{ReportError, ReportFilter};
pub use segmentation::{segment_customers, KMeans, SegmentationError};
