use bizlens_core::config::SegmentationConfig;
use bizlens_core::segmentation::Segmentation;
use bizlens_core::{segment_customers, DataSource};
use bizlens_view::{Result, View, ViewOutput};
use serde_json::Value;
use std::sync::Arc;

/// K-Means customer segmentation.
pub struct SegmentationView {
    source: Arc<dyn DataSource>,
    config: SegmentationConfig,
    customers: usize,
    seed: u64,
}

impl SegmentationView {
    pub fn new(
        source: Arc<dyn DataSource>,
        config: SegmentationConfig,
        customers: usize,
        seed: u64,
    ) -> Self {
        Self {
            source,
            config,
            customers,
            seed,
        }
    }
}

impl View for SegmentationView {
    fn name(&self) -> &str {
        "segmentation"
    }

    fn title(&self) -> &str {
        "Segmentation"
    }

    fn description(&self) -> &str {
        "Groups customers by age, annual income, average spend and monthly purchase frequency using K-Means"
    }

    fn parameter_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {}
        })
    }

    fn render(&self, _params: Value) -> Result<ViewOutput> {
        let customers = self.source.customers(self.customers)?;
        let segmentation = segment_customers(&customers, &self.config, self.seed)?;

        let data = serde_json::json!({
            "scatter_3d": {
                "x": "age",
                "y": "income",
                "z": "avg_spend",
                "color": "segment",
                "size": "purchase_frequency",
            },
            "scatter_2d": {
                "x": "age",
                "y": "income",
                "color": "segment",
                "size": "avg_spend",
            },
            "customers": segmentation.customers,
            "segments": segmentation.segments,
            "features": segmentation.features,
            "inertia": segmentation.inertia,
        });

        Ok(ViewOutput::new(summary(&segmentation)).with_data(data))
    }
}

fn summary(segmentation: &Segmentation) -> String {
    let mut content = format!(
        "{} customers in {} segments:\n",
        segmentation.customers.len(),
        segmentation.segments.len()
    );
    for s in &segmentation.segments {
        let means: Vec<String> = segmentation
            .features
            .iter()
            .zip(&s.means)
            .map(|(name, mean)| format!("{}={:.0}", name, mean))
            .collect();
        content.push_str(&format!(
            "\nSegment {}: {} customers ({})",
            s.segment,
            s.count,
            means.join(", ")
        ));
    }
    content
}
