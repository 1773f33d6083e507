//! Built-in candidate generation.

mod count;

pub use count::generate_frequent_itemsets;

use crate::{
    config::MiningConfig, database::TransactionDatabase, error::Result, itemset::Itemset,
};

/// `generate_frequent_itemsets` with the parameters of `config`.
pub fn mine(transactions: &TransactionDatabase, config: &MiningConfig) -> Result<Vec<Itemset>> {
    generate_frequent_itemsets(transactions, config.min_support, config.max_len)
}
