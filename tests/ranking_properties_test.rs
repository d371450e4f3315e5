//! Property tests for top-K selection and profile building

use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use triage_core::models::{build_profiles, top_k};
use triage_core::HistoricalRecord;

#[test]
fn test_tied_scores_keep_index_order() {
    assert_eq!(top_k(&[0.3, 0.9, 0.9, 0.1], 2), vec![1, 2]);
}

#[test]
fn test_signed_zeros_are_a_tie() {
    assert_eq!(top_k(&[-0.0, 0.0, 0.0], 3), vec![0, 1, 2]);
}

#[test]
fn test_nan_scores_rank_last() {
    assert_eq!(top_k(&[f64::NAN, 0.2, 0.5], 3), vec![2, 1, 0]);
}

fn score() -> impl Strategy<Value = f64> {
    // Small grid so ties show up often, including a signed zero
    prop_oneof![
        Just(-0.0),
        (0u8..6).prop_map(|v| f64::from(v) / 2.0),
    ]
}

proptest! {
    #[test]
    fn prop_top_k_length_and_uniqueness(
        scores in prop::collection::vec(score(), 0..40),
        k in 0usize..50,
    ) {
        let ranked = top_k(&scores, k);
        prop_assert_eq!(ranked.len(), k.min(scores.len()));

        let unique: BTreeSet<usize> = ranked.iter().copied().collect();
        prop_assert_eq!(unique.len(), ranked.len());
        prop_assert!(ranked.iter().all(|&i| i < scores.len()));
    }

    #[test]
    fn prop_top_k_orders_by_score_then_index(
        scores in prop::collection::vec(score(), 1..40),
        k in 1usize..50,
    ) {
        let ranked = top_k(&scores, k);
        for pair in ranked.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            prop_assert!(scores[a] >= scores[b]);
            if scores[a] == scores[b] {
                prop_assert!(a < b);
            }
        }

        // Nothing left out beats the last selected index
        if let Some(&last) = ranked.last() {
            for i in (0..scores.len()).filter(|i| !ranked.contains(i)) {
                prop_assert!(
                    scores[i] < scores[last] || (scores[i] == scores[last] && i > last)
                );
            }
        }
    }

    #[test]
    fn prop_top_k_is_deterministic(
        scores in prop::collection::vec(any::<f64>(), 0..30),
        k in 0usize..30,
    ) {
        prop_assert_eq!(top_k(&scores, k), top_k(&scores, k));
    }

    #[test]
    fn prop_profiles_count_contributions(
        history in prop::collection::vec(
            (0usize..4, prop::collection::vec(0usize..5, 0..4)),
            0..30,
        ),
    ) {
        let names = ["ana", "bo", "cy", "di"];
        let tags = ["bug", "ui", "perf", "docs", "crash"];
        let records: Vec<HistoricalRecord> = history
            .iter()
            .map(|(who, labels)| {
                HistoricalRecord::new("", vec![names[*who].to_string()])
                    .with_labels(labels.iter().map(|l| tags[*l]))
            })
            .collect();

        let profiles = build_profiles(&records);

        let mut expected: BTreeMap<&str, u32> = BTreeMap::new();
        for (who, _) in &history {
            *expected.entry(names[*who]).or_default() += 1;
        }
        prop_assert_eq!(profiles.len(), expected.len());

        for (name, profile) in &profiles {
            prop_assert_eq!(&profile.name, name);
            prop_assert_eq!(Some(&profile.contributions), expected.get(name.as_str()));

            let distinct: BTreeSet<&String> = profile.labels.iter().collect();
            prop_assert_eq!(distinct.len(), profile.labels.len());
        }
    }
}
