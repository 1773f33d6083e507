#![allow(non_snake_case)]

use std::{iter::FromIterator, ops::Index, sync::Arc};

use crate::{
    bits::{self, Bits},
    itemset::Itemset,
    types::{ItemId, Support, TransactionId},
};

/// An ordered collection of transactions, the dataset `D`.
///
/// Built in one pass: for every item the set of transactions containing it
/// (`item_support_bits`), and the vocabulary of items present anywhere.
#[derive(Clone, Debug, Default)]
pub struct TransactionDatabase {
    transactions: Vec<Itemset>,
    item_supports: Vec<Option<Arc<Bits>>>,
    vocabulary: Bits,
}

impl TransactionDatabase {
    pub fn new(transactions: Vec<Itemset>) -> Self {
        let N = transactions.len();
        let universe = transactions
            .iter()
            .filter_map(|transaction| transaction.items().last())
            .max()
            .map_or(0, |&max| max + 1);

        let mut item_supports: Vec<Option<Bits>> = vec![None; universe];
        let mut vocabulary = bits::with_len(universe);

        for (id, transaction) in transactions.iter().enumerate() {
            for &item in transaction.items() {
                item_supports[item]
                    .get_or_insert_with(|| bits::with_len(N))
                    .set(id, true);
                vocabulary.set(item, true);
            }
        }

        Self {
            transactions,
            item_supports: item_supports
                .into_iter()
                .map(|bits| bits.map(Arc::new))
                .collect(),
            vocabulary,
        }
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn get(&self, id: TransactionId) -> Option<&Itemset> {
        self.transactions.get(id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Itemset> {
        self.transactions.iter()
    }

    pub fn transactions(&self) -> &[Itemset] {
        &self.transactions
    }

    /// One past the largest item id present.
    pub fn universe(&self) -> usize {
        self.vocabulary.len()
    }

    /// Distinct items, ascending.
    pub fn vocabulary(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.vocabulary.iter_ones()
    }

    pub fn contains_item(&self, item: ItemId) -> bool {
        self.vocabulary.get(item).map_or(false, |bit| *bit)
    }

    pub fn item_support_bits(&self, item: ItemId) -> Option<&Arc<Bits>> {
        self.item_supports.get(item).and_then(Option::as_ref)
    }

    pub fn item_support(&self, item: ItemId) -> Support {
        self.item_support_bits(item)
            .map_or(0, |bits| bits.count_ones() as Support)
    }

    /// Transactions containing every item of `itemset`.
    ///
    /// Empty when an item is unknown to the database, full for the empty
    /// itemset.
    pub fn support_bits(&self, itemset: &Itemset) -> Bits {
        let mut items = itemset.items().iter();

        let first = match items.next() {
            Some(&item) => item,
            None => return bits::from_indices(0..self.len(), self.len()),
        };
        let mut acc = match self.item_support_bits(first) {
            Some(bits) => (**bits).clone(),
            None => return bits::with_len(self.len()),
        };

        for &item in items {
            match self.item_support_bits(item) {
                Some(bits) => bits::and_assign(&mut acc, bits),
                None => return bits::with_len(self.len()),
            }
        }
        acc
    }

    pub fn support(&self, itemset: &Itemset) -> Support {
        self.support_bits(itemset).count_ones() as Support
    }

    /// Mean transaction size.
    pub fn average_size(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.total_size() as f64 / self.len() as f64
    }

    /// Share of the `|D| x |vocabulary|` matrix that is filled.
    pub fn density(&self) -> f64 {
        let distinct = self.vocabulary.count_ones();
        if self.is_empty() || distinct == 0 {
            return 0.0;
        }
        self.total_size() as f64 / (self.len() as f64 * distinct as f64)
    }

    fn total_size(&self) -> usize {
        self.transactions.iter().map(Itemset::len).sum()
    }
}

impl Index<TransactionId> for TransactionDatabase {
    type Output = Itemset;

    fn index(&self, id: TransactionId) -> &Itemset {
        &self.transactions[id]
    }
}

impl FromIterator<Itemset> for TransactionDatabase {
    fn from_iter<I: IntoIterator<Item = Itemset>>(iter: I) -> Self {
        TransactionDatabase::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a TransactionDatabase {
    type Item = &'a Itemset;
    type IntoIter = std::slice::Iter<'a, Itemset>;

    fn into_iter(self) -> Self::IntoIter {
        self.transactions.iter()
    }
}
