use std::collections::HashSet;

use itertools::Itertools;

use crate::types::ItemId;

/// Joins k-itemsets sharing their first k-1 items into (k+1)-itemsets.
///
/// Items within each itemset must be sorted ascending. Every pair of
/// itemsets in a prefix group yields one candidate, so the output is sorted
/// as well.
pub fn join_step(mut itemsets: Vec<Vec<ItemId>>) -> Vec<Vec<ItemId>> {
    itemsets.retain(|itemset| !itemset.is_empty());
    itemsets.sort_unstable();
    itemsets.dedup();

    let mut joined = Vec::new();

    let mut start = 0;
    while start < itemsets.len() {
        let head = prefix(&itemsets[start]);
        let end = itemsets[start..]
            .iter()
            .position(|itemset| prefix(itemset) != head)
            .map_or(itemsets.len(), |offset| start + offset);

        for (a, b) in itemsets[start..end]
            .iter()
            .filter_map(|itemset| itemset.last())
            .tuple_combinations()
        {
            let mut candidate = Vec::with_capacity(head.len() + 2);
            candidate.extend_from_slice(head);
            candidate.push(*a);
            candidate.push(*b);
            joined.push(candidate);
        }

        start = end;
    }

    joined
}

fn prefix(itemset: &[ItemId]) -> &[ItemId] {
    &itemset[..itemset.len() - 1]
}

/// Keeps the candidates whose every subset one item smaller is in `frequent`.
/// Candidates with fewer than two items have no such subsets and are dropped.
pub fn prune_step(
    candidates: Vec<Vec<ItemId>>,
    frequent: &HashSet<Vec<ItemId>>,
) -> Vec<Vec<ItemId>> {
    candidates
        .into_iter()
        .filter(|candidate| {
            candidate.len() >= 2
                && candidate
                    .iter()
                    .copied()
                    .combinations(candidate.len() - 1)
                    .all(|subset| frequent.contains(&subset))
        })
        .collect()
}
