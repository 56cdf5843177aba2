//! Standard views for bizlens
//!
//! The built-in dashboard tabs, each backed by a [`DataSource`]:
//! - Recommendations (item-based collaborative filtering)
//! - Reporting (production KPIs, charts and CSV export)
//! - Segmentation (K-Means customer clusters)
//! - Insights (sales correlation heatmap)

mod insights;
mod recommendations;
mod reporting;
mod segmentation;

pub use insights::InsightsView;
pub use recommendations::RecommendationsView;
pub use reporting::ReportingView;
pub use segmentation::SegmentationView;

use bizlens_core::{Config, DataSource, MockDataSource};
use bizlens_view::ViewRegistry;
use std::sync::Arc;

/// Registers the standard views over `source`, with reporting as the
/// default tab.
pub fn registry_with_source(config: &Config, source: Arc<dyn DataSource>) -> ViewRegistry {
    let mut registry = ViewRegistry::new();

    registry.register(Arc::new(RecommendationsView::new(
        source.clone(),
        config.recommend.clone(),
    )));
    registry.register(Arc::new(ReportingView::new(
        source.clone(),
        config.reporting.clone(),
    )));
    registry.register(Arc::new(SegmentationView::new(
        source.clone(),
        config.segmentation.clone(),
        config.data.customers,
        config.data.seed,
    )));
    registry.register(Arc::new(InsightsView::new(source, config.data.insight_rows)));

    registry.set_default("reporting");
    registry
}

/// The standard views over seeded mock data.
pub fn standard_registry(config: &Config) -> ViewRegistry {
    registry_with_source(config, Arc::new(MockDataSource::new(config.data.seed)))
}
