#![allow(non_snake_case)]

use std::collections::HashSet;

use rayon::prelude::*;
use tracing::info;

use crate::{
    combi::{join_step, prune_step},
    config::MiningConfig,
    database::TransactionDatabase,
    error::Result,
    itemset::Itemset,
    types::{ItemId, ItemsetLength, Support},
};

/// Level-wise frequent itemsets of `transactions`.
///
/// Every itemset with relative support of at least `min_support` and at most
/// `max_len` items is returned with its absolute support, level by level,
/// each level in canonical order.
pub fn generate_frequent_itemsets(
    transactions: &TransactionDatabase,
    min_support: f32,
    max_len: ItemsetLength,
) -> Result<Vec<Itemset>> {
    MiningConfig {
        min_support,
        max_len,
    }
    .validate()?;

    let N = transactions.len() as f32;
    let min_support_count = ((min_support * N).ceil() as Support).max(1);

    // 1-itemset
    let mut level = generate_frequent_1_itemsets(transactions, min_support_count);
    info!(size = 1, frequent = level.len(), "frequent itemsets");

    let mut all_frequent_itemsets = Vec::new();

    // k-itemset, k >= 2
    for size in 2..=max_len {
        if level.is_empty() {
            break;
        }

        let previous: HashSet<Vec<ItemId>> =
            level.iter().map(|itemset| itemset.items().to_vec()).collect();
        let candidates = prune_step(join_step(previous.iter().cloned().collect()), &previous);
        let candidate_count = candidates.len();

        all_frequent_itemsets.append(&mut level);
        level = generate_frequent_k_itemsets(candidates, transactions, min_support_count);
        info!(
            size,
            candidates = candidate_count,
            frequent = level.len(),
            "frequent itemsets"
        );
    }

    all_frequent_itemsets.append(&mut level);
    Ok(all_frequent_itemsets)
}

fn generate_frequent_1_itemsets(
    transactions: &TransactionDatabase,
    min_support_count: Support,
) -> Vec<Itemset> {
    transactions
        .vocabulary()
        .filter_map(|item| {
            let support = transactions.item_support(item);
            if support >= min_support_count {
                Some(Itemset::with_support(vec![item], support))
            } else {
                None
            }
        })
        .collect()
}

fn generate_frequent_k_itemsets(
    candidates: Vec<Vec<ItemId>>,
    transactions: &TransactionDatabase,
    min_support_count: Support,
) -> Vec<Itemset> {
    candidates
        .into_par_iter()
        .filter_map(|candidate| {
            let mut itemset = Itemset::new(candidate);
            let candidate_count = transactions.support(&itemset);
            if candidate_count >= min_support_count {
                itemset.set_support(candidate_count);
                Some(itemset)
            } else {
                None
            }
        })
        .collect()
}
