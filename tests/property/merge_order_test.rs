//! Property-based tests for the saved-order merge rule.
//!
//! **Validates: Requirements 4.2, 8 (stale ids dropped, unknown ids appended in tree order)**

use bookmark_board::services::board_renderer::merge_order;
use proptest::prelude::*;
use std::collections::HashSet;

/// Distinct tree ids plus a saved order drawn from tree ids and stale ids.
fn arb_case() -> impl Strategy<Value = (Vec<String>, Vec<String>)> {
    proptest::collection::hash_set("[a-z]{1,4}", 0..12).prop_flat_map(|set| {
        let items: Vec<String> = set.into_iter().collect();
        let pool: Vec<String> = items
            .iter()
            .cloned()
            .chain((0..4).map(|i| format!("stale-{}", i)))
            .collect();
        let saved = proptest::sample::subsequence(pool.clone(), 0..=pool.len()).prop_shuffle();
        (Just(items), saved)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    // **Property: the merge is a permutation of the tree ids**
    #[test]
    fn merge_keeps_exactly_the_tree_ids((items, saved) in arb_case()) {
        let merged = merge_order(items.clone(), &saved, |s| s.as_str());
        prop_assert_eq!(merged.len(), items.len());
        let merged_set: HashSet<&String> = merged.iter().collect();
        let item_set: HashSet<&String> = items.iter().collect();
        prop_assert_eq!(merged_set, item_set);
    }

    // **Property: known ids lead in saved sequence, unknown ids follow in tree order**
    #[test]
    fn merge_puts_known_first_then_tree_order((items, saved) in arb_case()) {
        let merged = merge_order(items.clone(), &saved, |s| s.as_str());
        let item_set: HashSet<&String> = items.iter().collect();
        let known: Vec<&String> = saved.iter().filter(|id| item_set.contains(id)).collect();
        let saved_set: HashSet<&String> = saved.iter().collect();
        let unknown: Vec<&String> = items.iter().filter(|id| !saved_set.contains(id)).collect();

        let expected: Vec<&String> = known.into_iter().chain(unknown).collect();
        let actual: Vec<&String> = merged.iter().collect();
        prop_assert_eq!(actual, expected);
    }

    // **Property: merging with an empty saved order is the identity**
    #[test]
    fn merge_without_saved_order_is_tree_order((items, _saved) in arb_case()) {
        let merged = merge_order(items.clone(), &[], |s| s.as_str());
        prop_assert_eq!(merged, items);
    }
}
