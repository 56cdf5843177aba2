//! Item-based collaborative filtering.
//!
//! Candidate items are scored by their similarity to the items a user has
//! already rated, weighted by those ratings.
//!
//! # How It Works
//!
//! 1. Item-item cosine similarity is computed over the full ratings matrix
//!    (unrated cells count as zero).
//! 2. For every item the user rated and every item the user has not rated,
//!    `score[candidate] += similarity(rated, candidate) * rating`.
//! 3. Candidates are sorted by score, descending. Ties keep the item order of
//!    the ratings matrix.
//! 4. The list is truncated to `top_n` and the first entry's score is
//!    multiplied by the configured boost.
//!
//! # Example
//!
//! ```
//! use bizlens_core::recommend::{recommend, RatingsMatrix};
//!
//! let ratings = RatingsMatrix::from_rows(
//!     ["alice", "bob"],
//!     ["item1", "item2", "item3"],
//!     vec![
//!         vec![Some(5.0), Some(3.0), None],
//!         vec![Some(4.0), Some(1.0), Some(2.0)],
//!     ],
//! ).unwrap();
//!
//! let result = recommend("alice", &ratings, 1).unwrap();
//! assert_eq!(result.items(), vec!["item3"]);
//! ```

mod similarity;
mod types;

pub use similarity::{compute_item_similarity, cosine_similarity};
pub use types::{RatingsMatrix, Recommendation, RecommendationResult, SimilarityMatrix};

use crate::config::RecommendConfig;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("Unknown user: {0}")]
    UnknownUser(String),

    #[error("Unknown item: {0}")]
    UnknownItem(String),

    #[error("top_n must be at least 1")]
    InvalidTopN,

    #[error("Rating must be finite, got {0}")]
    InvalidRating(f64),

    #[error("Duplicate identifier: {0}")]
    DuplicateId(String),

    #[error("Dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
}

impl RecommendError {
    /// True for errors caused by the caller's arguments rather than the data.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::UnknownUser(_) | Self::InvalidTopN)
    }
}

pub type Result<T> = std::result::Result<T, RecommendError>;

/// Default factor applied to the top recommendation's score.
pub const DEFAULT_BOOST: f64 = 1.4;

/// Item-based recommender with a configurable top-entry boost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Recommender {
    boost: f64,
}

impl Default for Recommender {
    fn default() -> Self {
        Self {
            boost: DEFAULT_BOOST,
        }
    }
}

impl Recommender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &RecommendConfig) -> Self {
        Self::default().with_boost(config.boost)
    }

    /// Sets the factor applied to the first recommendation. `1.0` disables it.
    ///
    /// The boost must be at least `1.0` so the list stays in descending
    /// order; smaller or non-finite values are raised to `1.0`.
    pub fn with_boost(mut self, boost: f64) -> Self {
        self.boost = if boost.is_finite() { boost.max(1.0) } else { 1.0 };
        self
    }

    pub fn boost(&self) -> f64 {
        self.boost
    }

    /// Ranks the items `user` has not rated.
    ///
    /// # Errors
    ///
    /// - [`RecommendError::InvalidTopN`] if `top_n` is 0 (never clamped)
    /// - [`RecommendError::UnknownUser`] if `user` is not a row of `ratings`
    ///
    /// A user without ratings, or with nothing left to rate, gets an empty
    /// list rather than an error.
    pub fn recommend(
        &self,
        user: &str,
        ratings: &RatingsMatrix,
        top_n: usize,
    ) -> Result<RecommendationResult> {
        if top_n == 0 {
            return Err(RecommendError::InvalidTopN);
        }
        let user_idx = ratings
            .user_index(user)
            .ok_or_else(|| RecommendError::UnknownUser(user.to_string()))?;

        let similarity = compute_item_similarity(ratings);
        let row = ratings.row(user_idx);

        let rated: Vec<(usize, f64)> = row
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.map(|rating| (i, rating)))
            .collect();

        let mut ranked: Vec<(usize, f64)> = if rated.is_empty() {
            Vec::new()
        } else {
            row.iter()
                .enumerate()
                .filter(|(_, r)| r.is_none())
                .map(|(candidate, _)| {
                    let score = rated
                        .iter()
                        .map(|&(item, rating)| similarity.at(item, candidate) * rating)
                        .sum();
                    (candidate, score)
                })
                .collect()
        };
        debug!(user, rated = rated.len(), candidates = ranked.len(), "Scored candidates");

        // Stable sort: equal scores keep column order.
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(top_n);

        let mut recommendations: Vec<Recommendation> = ranked
            .into_iter()
            .map(|(idx, score)| Recommendation {
                item: ratings.items()[idx].clone(),
                score,
            })
            .collect();

        if let Some(top) = recommendations.first_mut() {
            top.score *= self.boost;
        }

        info!(user, count = recommendations.len(), "Generated recommendations");
        Ok(RecommendationResult {
            user: user.to_string(),
            recommendations,
            similarity,
            boost: self.boost,
        })
    }
}

/// [`Recommender::recommend`] with the default boost.
pub fn recommend(user: &str, ratings: &RatingsMatrix, top_n: usize) -> Result<RecommendationResult> {
    Recommender::default().recommend(user, ratings, top_n)
}
