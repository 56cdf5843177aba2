use super::{RecommendError, Result};
use serde::Serialize;

/// A users x items table of optional ratings.
///
/// Rows are users and columns are items, both kept in insertion order. A
/// missing entry means "unrated" and is distinct from a rating of `0.0`.
///
/// # Example
///
/// ```
/// use bizlens_core::recommend::RatingsMatrix;
///
/// let mut ratings = RatingsMatrix::new(["alice", "bob"], ["item1", "item2"]).unwrap();
/// ratings.set("alice", "item1", 5.0).unwrap();
///
/// assert_eq!(ratings.get("alice", "item1"), Some(5.0));
/// assert_eq!(ratings.get("alice", "item2"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingsMatrix {
    users: Vec<String>,
    items: Vec<String>,
    /// Row-major, `users.len() * items.len()` cells.
    cells: Vec<Option<f64>>,
}

impl RatingsMatrix {
    /// Creates an empty (fully unrated) matrix.
    ///
    /// # Errors
    ///
    /// Returns [`RecommendError::DuplicateId`] if a user or item id repeats.
    pub fn new<U, I>(users: U, items: I) -> Result<Self>
    where
        U: IntoIterator,
        U::Item: Into<String>,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let users: Vec<String> = users.into_iter().map(Into::into).collect();
        let items: Vec<String> = items.into_iter().map(Into::into).collect();
        check_unique(&users)?;
        check_unique(&items)?;

        let cells = vec![None; users.len() * items.len()];
        Ok(Self { users, items, cells })
    }

    /// Builds a matrix from one row of optional ratings per user.
    ///
    /// # Errors
    ///
    /// Fails on duplicate ids, on a row count or row width that does not match
    /// the id lists, or on a non-finite rating.
    pub fn from_rows<U, I>(users: U, items: I, rows: Vec<Vec<Option<f64>>>) -> Result<Self>
    where
        U: IntoIterator,
        U::Item: Into<String>,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut matrix = Self::new(users, items)?;

        if rows.len() != matrix.users.len() {
            return Err(RecommendError::DimensionMismatch {
                expected: matrix.users.len(),
                found: rows.len(),
            });
        }

        let width = matrix.items.len();
        for (u, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(RecommendError::DimensionMismatch {
                    expected: width,
                    found: row.len(),
                });
            }
            for (i, cell) in row.into_iter().enumerate() {
                if let Some(rating) = cell {
                    check_finite(rating)?;
                }
                matrix.cells[u * width + i] = cell;
            }
        }

        Ok(matrix)
    }

    /// Sets a rating.
    pub fn set(&mut self, user: &str, item: &str, rating: f64) -> Result<()> {
        check_finite(rating)?;
        let idx = self.cell_index(user, item)?;
        self.cells[idx] = Some(rating);
        Ok(())
    }

    /// Marks a cell as unrated.
    pub fn clear(&mut self, user: &str, item: &str) -> Result<()> {
        let idx = self.cell_index(user, item)?;
        self.cells[idx] = None;
        Ok(())
    }

    /// Returns the rating, or `None` if unrated or either id is unknown.
    pub fn get(&self, user: &str, item: &str) -> Option<f64> {
        let idx = self.cell_index(user, item).ok()?;
        self.cells[idx]
    }

    pub fn users(&self) -> &[String] {
        &self.users
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn user_index(&self, user: &str) -> Option<usize> {
        self.users.iter().position(|u| u == user)
    }

    pub fn item_index(&self, item: &str) -> Option<usize> {
        self.items.iter().position(|i| i == item)
    }

    /// The ratings row of the user at `user_idx`, in item order.
    pub fn row(&self, user_idx: usize) -> &[Option<f64>] {
        let width = self.items.len();
        &self.cells[user_idx * width..(user_idx + 1) * width]
    }

    /// The column of the item at `item_idx` with missing ratings as `0.0`.
    pub fn item_vector(&self, item_idx: usize) -> Vec<f64> {
        let width = self.items.len();
        (0..self.users.len())
            .map(|u| self.cells[u * width + item_idx].unwrap_or(0.0))
            .collect()
    }

    /// Number of filled cells.
    pub fn rated_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    fn cell_index(&self, user: &str, item: &str) -> Result<usize> {
        let u = self
            .user_index(user)
            .ok_or_else(|| RecommendError::UnknownUser(user.to_string()))?;
        let i = self
            .item_index(item)
            .ok_or_else(|| RecommendError::UnknownItem(item.to_string()))?;
        Ok(u * self.items.len() + i)
    }
}

fn check_unique(ids: &[String]) -> Result<()> {
    for (idx, id) in ids.iter().enumerate() {
        if ids[..idx].contains(id) {
            return Err(RecommendError::DuplicateId(id.clone()));
        }
    }
    Ok(())
}

fn check_finite(rating: f64) -> Result<()> {
    if rating.is_finite() {
        Ok(())
    } else {
        Err(RecommendError::InvalidRating(rating))
    }
}

/// Square, symmetric item x item cosine similarity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityMatrix {
    items: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl SimilarityMatrix {
    pub(crate) fn new(items: Vec<String>, values: Vec<Vec<f64>>) -> Self {
        Self { items, values }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Rows of the matrix, in item order on both axes.
    pub fn values(&self) -> &[Vec<f64>] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Similarity by position.
    pub fn at(&self, a: usize, b: usize) -> f64 {
        self.values[a][b]
    }

    /// Similarity by item id, `None` if either id is unknown.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let a = self.items.iter().position(|i| i == a)?;
        let b = self.items.iter().position(|i| i == b)?;
        Some(self.values[a][b])
    }
}

/// One ranked recommendation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub item: String,
    pub score: f64,
}

/// Ranked recommendations for one user plus the similarity they were
/// derived from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationResult {
    pub user: String,
    /// Descending by score; the first entry carries the boost.
    pub recommendations: Vec<Recommendation>,
    pub similarity: SimilarityMatrix,
    /// Factor applied to the first entry's score.
    pub boost: f64,
}

impl RecommendationResult {
    pub fn is_empty(&self) -> bool {
        self.recommendations.is_empty()
    }

    /// Recommended item ids in rank order.
    pub fn items(&self) -> Vec<&str> {
        self.recommendations.iter().map(|r| r.item.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_is_not_zero() {
        let mut m = RatingsMatrix::new(["u"], ["a", "b"]).unwrap();
        m.set("u", "a", 0.0).unwrap();

        assert_eq!(m.get("u", "a"), Some(0.0));
        assert_eq!(m.get("u", "b"), None);
        assert_eq!(m.rated_count(), 1);
    }

    #[test]
    fn test_item_vector_fills_missing_with_zero() {
        let m = RatingsMatrix::from_rows(
            ["u1", "u2"],
            ["a"],
            vec![vec![Some(2.0)], vec![None]],
        )
        .unwrap();
        assert_eq!(m.item_vector(0), vec![2.0, 0.0]);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let err = RatingsMatrix::new(["u", "u"], ["a"]).unwrap_err();
        assert!(matches!(err, RecommendError::DuplicateId(id) if id == "u"));
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = RatingsMatrix::from_rows(["u"], ["a", "b"], vec![vec![Some(1.0)]]).unwrap_err();
        assert!(matches!(
            err,
            RecommendError::DimensionMismatch { expected: 2, found: 1 }
        ));
    }

    #[test]
    fn test_non_finite_rating_rejected() {
        let mut m = RatingsMatrix::new(["u"], ["a"]).unwrap();
        assert!(matches!(
            m.set("u", "a", f64::NAN),
            Err(RecommendError::InvalidRating(_))
        ));
    }

    #[test]
    fn test_clear_unrates() {
        let mut m = RatingsMatrix::new(["u"], ["a"]).unwrap();
        m.set("u", "a", 3.0).unwrap();
        m.clear("u", "a").unwrap();
        assert_eq!(m.get("u", "a"), None);
    }

    #[test]
    fn test_unknown_ids() {
        let mut m = RatingsMatrix::new(["u"], ["a"]).unwrap();
        assert!(matches!(
            m.set("x", "a", 1.0),
            Err(RecommendError::UnknownUser(_))
        ));
        assert!(matches!(
            m.set("u", "x", 1.0),
            Err(RecommendError::UnknownItem(_))
        ));
    }
}
