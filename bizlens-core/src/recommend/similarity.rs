//! Item-item cosine similarity.

use super::types::{RatingsMatrix, SimilarityMatrix};
use tracing::{debug, warn};

/// Cosine similarity of two equal-length vectors.
///
/// Defined as `0.0` when either vector has zero norm. Each vector is scaled
/// by its largest magnitude first, so very large finite ratings cannot
/// overflow the sums. The result is clamped to `[-1, 1]`.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());

    let scale_a = max_abs(a);
    let scale_b = max_abs(b);
    if scale_a == 0.0 || scale_b == 0.0 {
        return 0.0;
    }

    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (x / scale_a, y / scale_b);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0)
}

fn max_abs(v: &[f64]) -> f64 {
    v.iter().fold(0.0, |m, x| m.max(x.abs()))
}

/// Pairwise cosine similarity between the item columns of `ratings`.
///
/// Unrated cells count as `0.0`. The matrix always covers every item, is
/// exactly symmetric (only the upper triangle is computed), and never fails:
/// an all-zero column simply yields a row of zeros.
pub fn compute_item_similarity(ratings: &RatingsMatrix) -> SimilarityMatrix {
    let items = ratings.items().to_vec();
    let n = items.len();

    let vectors: Vec<Vec<f64>> = (0..n).map(|i| ratings.item_vector(i)).collect();
    for (item, vector) in items.iter().zip(&vectors) {
        if vector.iter().all(|v| *v == 0.0) {
            warn!(item = %item, "Item has no non-zero ratings, similarity row is all zeros");
        }
    }

    let mut values = vec![vec![0.0; n]; n];
    for a in 0..n {
        for b in a..n {
            let sim = cosine_similarity(&vectors[a], &vectors[b]);
            values[a][b] = sim;
            values[b][a] = sim;
        }
    }

    debug!(items = n, users = ratings.users().len(), "Computed item similarity");
    SimilarityMatrix::new(items, values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_identical_vectors() {
        let v = [1.0, 2.0, 3.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_orthogonal_vectors() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn test_cosine_opposite_vectors() {
        assert!((cosine_similarity(&[1.0, 2.0], &[-1.0, -2.0]) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_zero_norm_is_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0], &[0.0]), 0.0);
    }

    #[test]
    fn test_similarity_is_square_and_symmetric() {
        let ratings = RatingsMatrix::from_rows(
            ["u1", "u2", "u3"],
            ["a", "b", "c"],
            vec![
                vec![Some(5.0), Some(3.0), None],
                vec![Some(4.0), None, Some(2.0)],
                vec![None, Some(1.0), Some(5.0)],
            ],
        )
        .unwrap();

        let sim = compute_item_similarity(&ratings);
        assert_eq!(sim.len(), 3);
        for a in 0..3 {
            assert_eq!(sim.values()[a].len(), 3);
            for b in 0..3 {
                assert_eq!(sim.at(a, b), sim.at(b, a));
            }
        }
        assert!((sim.at(0, 0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_similarity_known_value() {
        // a = [1, 0], b = [1, 1] -> 1 / sqrt(2)
        let ratings = RatingsMatrix::from_rows(
            ["u1", "u2"],
            ["a", "b"],
            vec![vec![Some(1.0), Some(1.0)], vec![None, Some(1.0)]],
        )
        .unwrap();

        let sim = compute_item_similarity(&ratings);
        let expected = 1.0 / 2f64.sqrt();
        assert!((sim.get("a", "b").unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_single_item_single_entry() {
        let ratings =
            RatingsMatrix::from_rows(["u"], ["only"], vec![vec![Some(4.0)]]).unwrap();
        let sim = compute_item_similarity(&ratings);
        assert_eq!(sim.values(), &[vec![1.0]]);
    }

    #[test]
    fn test_all_unrated_yields_zeros() {
        let ratings = RatingsMatrix::new(["u1", "u2"], ["a", "b"]).unwrap();
        let sim = compute_item_similarity(&ratings);
        assert!(sim.values().iter().flatten().all(|v| *v == 0.0));
    }

    #[test]
    fn test_huge_ratings_stay_in_range() {
        let ratings = RatingsMatrix::from_rows(
            ["u1", "u2"],
            ["a", "b", "c"],
            vec![
                vec![Some(1e200), None, None],
                vec![Some(1e200), Some(1.0), Some(2.0)],
            ],
        )
        .unwrap();

        let sim = compute_item_similarity(&ratings);
        for v in sim.values().iter().flatten() {
            assert!((-1.0..=1.0).contains(v), "{} out of range", v);
        }
        let expected = 1.0 / 2f64.sqrt();
        assert!((sim.at(0, 0) - 1.0).abs() < 1e-12);
        assert!((sim.get("a", "b").unwrap() - expected).abs() < 1e-12);
        assert!((sim.get("a", "c").unwrap() - expected).abs() < 1e-12);
        assert!((sim.get("b", "c").unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_matrix() {
        let ratings = RatingsMatrix::new(Vec::<String>::new(), Vec::<String>::new()).unwrap();
        assert!(compute_item_similarity(&ratings).is_empty());
    }
}
