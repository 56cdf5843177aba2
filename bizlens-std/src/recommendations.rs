use bizlens_core::config::RecommendConfig;
use bizlens_core::{DataSource, RatingsMatrix, RecommendationResult, Recommender};
use bizlens_view::{parse_params, Result, View, ViewError, ViewOutput};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Interactive item recommender with a similarity heatmap.
pub struct RecommendationsView {
    source: Arc<dyn DataSource>,
    config: RecommendConfig,
}

#[derive(Debug, Deserialize)]
struct RecommendationParams {
    user: Option<String>,
    top_n: Option<usize>,
}

impl RecommendationsView {
    pub fn new(source: Arc<dyn DataSource>, config: RecommendConfig) -> Self {
        Self { source, config }
    }

    fn check_top_n(&self, top_n: usize) -> Result<usize> {
        if top_n == 0 || top_n > self.config.max_top_n {
            return Err(ViewError::InvalidInput(format!(
                "top_n must be between 1 and {}",
                self.config.max_top_n
            )));
        }
        Ok(top_n)
    }
}

impl View for RecommendationsView {
    fn name(&self) -> &str {
        "recommendations"
    }

    fn title(&self) -> &str {
        "Recommendations"
    }

    fn description(&self) -> &str {
        "Item-based collaborative filtering: finds patterns in how users rated items and predicts what each user is likely to enjoy next"
    }

    fn parameter_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "user": {
                    "type": "string",
                    "description": "User to recommend for (defaults to the first user)"
                },
                "top_n": {
                    "type": "integer",
                    "description": "Number of recommendations",
                    "minimum": 1,
                    "maximum": self.config.max_top_n,
                    "default": self.config.top_n
                }
            }
        })
    }

    fn render(&self, params: Value) -> Result<ViewOutput> {
        let params: RecommendationParams = parse_params(params)?;
        let top_n = self.check_top_n(params.top_n.unwrap_or(self.config.top_n))?;

        let ratings = self.source.ratings()?;
        let user = match params.user {
            Some(user) => user,
            None => ratings
                .users()
                .first()
                .cloned()
                .ok_or_else(|| ViewError::ExecutionFailed("No users in ratings".into()))?,
        };
        debug!(user = %user, top_n, "Rendering recommendations");

        let result = Recommender::from_config(&self.config).recommend(&user, &ratings, top_n)?;

        Ok(ViewOutput::new(summary(&result)).with_data(chart_data(&result, &ratings)))
    }
}

fn summary(result: &RecommendationResult) -> String {
    if result.is_empty() {
        return "Not enough data to generate recommendations.".to_string();
    }

    let mut content = format!("Recommended for {}:\n", result.user);
    for (i, rec) in result.recommendations.iter().enumerate() {
        content.push_str(&format!("\n[{}] {} ({:.2})", i + 1, rec.item, rec.score));
    }
    content
}

fn chart_data(result: &RecommendationResult, ratings: &RatingsMatrix) -> Value {
    let ranking: Vec<Value> = result
        .recommendations
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            serde_json::json!({
                "item": rec.item,
                "score": rec.score,
                "highlight": i == 0,
            })
        })
        .collect();

    let rows: Vec<Vec<Option<f64>>> = (0..ratings.users().len())
        .map(|u| ratings.row(u).to_vec())
        .collect();

    serde_json::json!({
        "user": result.user,
        "boost": result.boost,
        "heatmap": {
            "label": "Similarity",
            "x": result.similarity.items(),
            "y": result.similarity.items(),
            "z": result.similarity.values(),
            "color_scale": "RdBu_r",
        },
        "ranking": ranking,
        "ratings": {
            "users": ratings.users(),
            "items": ratings.items(),
            "rows": rows,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizlens_core::data::{self, Customer, NumericTable, ProductionRecord};
    use bizlens_core::MockDataSource;

    fn view() -> RecommendationsView {
        RecommendationsView::new(
            Arc::new(MockDataSource::default()),
            RecommendConfig::default(),
        )
    }

    fn sparse_view() -> RecommendationsView {
        struct Sparse;
        impl DataSource for Sparse {
            fn ratings(&self) -> data::Result<RatingsMatrix> {
                let mut m = RatingsMatrix::new(["new", "old"], ["a", "b", "c"])?;
                m.set("old", "a", 4.0)?;
                m.set("old", "b", 2.0)?;
                Ok(m)
            }
            fn sales(&self, rows: usize) -> data::Result<NumericTable> {
                MockDataSource::default().sales(rows)
            }
            fn customers(&self, count: usize) -> data::Result<Vec<Customer>> {
                MockDataSource::default().customers(count)
            }
            fn production(&self) -> data::Result<Vec<ProductionRecord>> {
                MockDataSource::default().production()
            }
        }
        RecommendationsView::new(Arc::new(Sparse), RecommendConfig::default())
    }

    #[test]
    fn test_default_params() {
        let output = view().render(Value::Null).unwrap();
        let data = output.data.unwrap();

        assert_eq!(data["user"], "User 1");
        assert_eq!(data["boost"], 1.4);
        assert_eq!(data["heatmap"]["z"].as_array().unwrap().len(), 5);
        assert_eq!(data["ratings"]["rows"].as_array().unwrap().len(), 5);

        let ranking = data["ranking"].as_array().unwrap();
        assert!(ranking.len() <= 3);
        if ranking.is_empty() {
            assert!(output.content.contains("Not enough data"));
        } else {
            assert_eq!(ranking[0]["highlight"], true);
        }
    }

    #[test]
    fn test_user_without_ratings() {
        let output = sparse_view()
            .render(serde_json::json!({ "user": "new" }))
            .unwrap();
        assert!(output.content.contains("Not enough data"));
    }

    #[test]
    fn test_ranking_highlights_first() {
        let output = sparse_view()
            .render(serde_json::json!({ "user": "old", "top_n": 5 }))
            .unwrap();
        let data = output.data.unwrap();
        let ranking = data["ranking"].as_array().unwrap();

        assert_eq!(ranking.len(), 1);
        assert_eq!(ranking[0]["item"], "c");
        assert_eq!(ranking[0]["highlight"], true);
        assert!(output.content.contains("[1] c"));
    }

    #[test]
    fn test_top_n_bounds() {
        let err = view().render(serde_json::json!({ "top_n": 6 })).unwrap_err();
        assert!(matches!(err, ViewError::InvalidInput(_)));

        let err = view().render(serde_json::json!({ "top_n": 0 })).unwrap_err();
        assert!(matches!(err, ViewError::InvalidInput(_)));
    }

    #[test]
    fn test_unknown_user() {
        let err = view()
            .render(serde_json::json!({ "user": "nobody" }))
            .unwrap_err();
        assert!(matches!(err, ViewError::InvalidInput(_)));
    }
}
