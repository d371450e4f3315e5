//! Top-K selection over classifier score vectors.
//!
//! Indices are ordered by descending score with ascending original index as
//! the tie-break, so equal scores never collapse into one slot and repeated
//! runs always agree.

use std::cmp::Ordering;

/// Return up to `k` indices of `scores`, highest score first
///
/// - `k == 0` or empty `scores` → empty result
/// - `k >= scores.len()` → full descending permutation
/// - NaN ranks below every real score
pub fn top_k(scores: &[f64], k: usize) -> Vec<usize> {
    if k == 0 || scores.is_empty() {
        return Vec::new();
    }

    let mut indices: Vec<usize> = (0..scores.len()).collect();
    indices.sort_by(|&a, &b| compare_desc(scores[a], scores[b]).then(a.cmp(&b)));
    indices.truncate(k);
    indices
}

fn compare_desc(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        // -0.0 and 0.0 tie, so `total_cmp` would split them
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ties_keep_both_indices() {
        assert_eq!(top_k(&[0.3, 0.9, 0.9, 0.1], 2), vec![1, 2]);
    }

    #[test]
    fn test_k_larger_than_input() {
        assert_eq!(top_k(&[0.1, 0.5, 0.3], 10), vec![1, 2, 0]);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(top_k(&[], 3).is_empty());
        assert!(top_k(&[1.0, 2.0], 0).is_empty());
    }

    #[test]
    fn test_all_equal_scores_keep_index_order() {
        assert_eq!(top_k(&[0.5; 5], 5), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_nan_sorts_last() {
        assert_eq!(top_k(&[f64::NAN, -3.0, 2.0], 3), vec![2, 1, 0]);
    }

    #[test]
    fn test_signed_zeros_tie_by_index() {
        assert_eq!(top_k(&[-0.0, 0.0, 0.0], 3), vec![0, 1, 2]);
        assert_eq!(top_k(&[0.0, -0.0, 1.0], 3), vec![2, 0, 1]);
    }

    #[test]
    fn test_negative_log_scores() {
        // Log-probabilities are always negative; closer to zero wins
        assert_eq!(top_k(&[-12.5, -3.25, -7.0], 2), vec![1, 2]);
    }
}
