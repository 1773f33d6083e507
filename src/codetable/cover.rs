//! Disjoint covers of transactions.
//!
//! The codes of a table are scanned in standard cover order. A code is a
//! cover candidate for a transaction when all of its items occur in it; the
//! first candidate that does not touch an already-claimed item becomes the
//! next piece of the cover. A target code is part of the cover iff it is
//! reached that way before any other piece claims one of its items.

use std::sync::Arc;

use rayon::prelude::*;
use tracing::trace;

use super::CodeEntry;
use crate::{
    bits::{self, Bits},
    database::TransactionDatabase,
    itemset::Itemset,
    types::{TransactionId, Usage},
};

/// How cover membership is decided. Both give the same covers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CoverStrategy {
    /// Support vectors for candidacy, an item mask for claimed items.
    #[default]
    Vectorized,
    /// Subset tests against the not yet covered part of the transaction.
    /// Slow; kept as a cross-check for tests and benchmarks.
    #[doc(hidden)]
    Naive,
}

/// One cover query at a time over a fixed, ordered code list.
pub struct CoverScan<'a> {
    codes: &'a [Arc<CodeEntry>],
    transactions: &'a TransactionDatabase,
    strategy: CoverStrategy,
    steps: usize,
}

impl<'a> CoverScan<'a> {
    pub fn new(
        codes: &'a [Arc<CodeEntry>],
        transactions: &'a TransactionDatabase,
        strategy: CoverStrategy,
    ) -> Self {
        Self {
            codes,
            transactions,
            strategy,
            steps: 0,
        }
    }

    /// Codes inspected since construction.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Whether `codes[target]` is part of the cover of `transaction`.
    pub fn is_cover(&mut self, transaction: TransactionId, target: usize) -> bool {
        let target = match self.codes.get(target) {
            Some(entry) if entry.supports(transaction) => &entry.code,
            _ => return false,
        };

        match self.strategy {
            CoverStrategy::Vectorized => self.scan(transaction, target, 0, bits::with_len(0)),
            CoverStrategy::Naive => self.scan_items(transaction, target),
        }
    }

    /// Resumes at `cursor` with the items claimed so far in `covered`. Every
    /// call starts strictly past the code it accepted, so the cursor only
    /// moves forward.
    fn scan(
        &mut self,
        transaction: TransactionId,
        target: &Itemset,
        cursor: usize,
        covered: Bits,
    ) -> bool {
        let codes = self.codes;

        for (offset, entry) in codes[cursor..].iter().enumerate() {
            self.steps += 1;

            if !entry.supports(transaction) || bits::intersects(entry.code.bits(), &covered) {
                continue;
            }
            if entry.code == *target {
                return true;
            }
            if entry.code.intersects(target) {
                return false;
            }

            let mut covered = covered;
            bits::or_assign(&mut covered, entry.code.bits());
            return self.scan(transaction, target, cursor + offset + 1, covered);
        }

        false
    }

    fn scan_items(&mut self, transaction: TransactionId, target: &Itemset) -> bool {
        let codes = self.codes;
        let mut remaining = self.transactions[transaction].clone();

        for entry in codes {
            self.steps += 1;

            if !remaining.contains_all(&entry.code) {
                continue;
            }
            if entry.code == *target {
                return true;
            }
            if entry.code.intersects(target) {
                return false;
            }
            remaining = remaining.subtract(&entry.code);
        }

        false
    }
}

/// Usage and usage vector of every code of `codes`, in the same order.
///
/// Only transactions in a code's support vector are tested. Codes are
/// independent of each other once the order is fixed, so they are counted
/// in parallel.
pub fn count_usages(
    codes: &[Arc<CodeEntry>],
    transactions: &TransactionDatabase,
    strategy: CoverStrategy,
) -> Vec<(Usage, Bits)> {
    trace!(
        codes = codes.len(),
        transactions = transactions.len(),
        "counting usages"
    );

    (0..codes.len())
        .into_par_iter()
        .map(|target| {
            let mut scan = CoverScan::new(codes, transactions, strategy);
            let mut usage_bits = bits::with_len(transactions.len());
            let mut usage = 0;

            for transaction in codes[target].support_bits.iter_ones() {
                if scan.is_cover(transaction, target) {
                    usage_bits.set(transaction, true);
                    usage += 1;
                }
            }

            (usage, usage_bits)
        })
        .collect()
}
