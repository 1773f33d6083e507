//! Greedy code-table search.
//!
//! Starting from the standard code table, candidates are consumed once each
//! in standard candidate order. A candidate is kept iff adding it strictly
//! lowers `L(D, CT)`; a rejected trial is dropped whole.

mod prune;

use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    codetable::CodeTable,
    config::KrimpConfig,
    database::TransactionDatabase,
    error::Result,
    itemset::{standard_candidate_order, Itemset},
    report::CompressionReport,
    types::Nats,
};

#[derive(Clone, Debug, Default)]
pub struct Krimp {
    config: KrimpConfig,
}

/// Result of one search.
#[derive(Clone, Debug)]
pub struct KrimpOutcome {
    pub code_table: CodeTable,
    pub standard_size: Nats,
    pub compressed_size: Nats,
    pub accepted: usize,
    pub rejected: usize,
    pub pruned: usize,
    /// Size of the accepted table after every consumed candidate, starting
    /// with the standard size.
    pub size_history: Vec<Nats>,
}

impl KrimpOutcome {
    pub fn report(&self) -> CompressionReport {
        CompressionReport {
            standard_size: self.standard_size,
            compressed_size: self.compressed_size,
        }
    }
}

impl Krimp {
    pub fn new(config: KrimpConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &KrimpConfig {
        &self.config
    }

    /// Runs the search over `candidates`. Singletons among them are ignored,
    /// as are candidates the table already holds. With a candidate limit,
    /// only that many multi-item candidates are consumed.
    pub fn run(
        &self,
        transactions: Arc<TransactionDatabase>,
        mut candidates: Vec<Itemset>,
    ) -> Result<KrimpOutcome> {
        candidates.retain(|candidate| candidate.len() > 1);
        candidates.sort_by(standard_candidate_order);
        if let Some(limit) = self.config.candidate_limit {
            candidates.truncate(limit);
        }

        info!(
            transactions = transactions.len(),
            candidates = candidates.len(),
            prune = self.config.prune,
            "starting search"
        );

        let mut result = CodeTable::standard(transactions);
        let standard_size = result.total_compressed_size()?;
        let mut result_size = standard_size;

        let mut size_history = Vec::with_capacity(candidates.len() + 1);
        size_history.push(standard_size);
        let (mut accepted, mut rejected, mut pruned) = (0, 0, 0);

        for candidate in &candidates {
            if result.contains(candidate) {
                rejected += 1;
                size_history.push(result_size);
                continue;
            }

            let trial = result.with_code(candidate);
            let trial_size = trial.total_compressed_size()?;

            if trial_size < result_size {
                debug!(
                    candidate = %candidate,
                    support = candidate.support(),
                    gain = result_size - trial_size,
                    "accepted"
                );
                let before = std::mem::replace(&mut result, trial);
                result_size = trial_size;
                accepted += 1;

                if self.config.prune {
                    pruned += prune::prune(&before, &mut result, &mut result_size)?;
                }
            } else {
                rejected += 1;
            }

            size_history.push(result_size);
        }

        info!(
            accepted,
            rejected,
            pruned,
            standard_size,
            compressed_size = result_size,
            "search finished"
        );

        Ok(KrimpOutcome {
            code_table: result,
            standard_size,
            compressed_size: result_size,
            accepted,
            rejected,
            pruned,
            size_history,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn database(transactions: Vec<Vec<usize>>) -> Arc<TransactionDatabase> {
        Arc::new(transactions.into_iter().map(Itemset::new).collect())
    }

    fn repeated() -> Arc<TransactionDatabase> {
        let mut transactions = vec![vec![1, 2, 3]; 20];
        transactions.extend(vec![vec![4]; 5]);
        database(transactions)
    }

    #[test]
    fn no_candidates_returns_standard_table() {
        let db = database(vec![vec![1, 2], vec![1, 2], vec![1, 3]]);
        let outcome = Krimp::default().run(db, vec![]).unwrap();

        assert!(outcome.code_table.is_standard());
        assert_eq!(outcome.standard_size, outcome.compressed_size);
        assert_eq!(outcome.size_history, vec![outcome.standard_size]);
        assert_eq!((outcome.accepted, outcome.rejected), (0, 0));
    }

    #[test]
    fn accepts_strongly_correlated_itemset() {
        let candidates = vec![
            Itemset::with_support(vec![1, 2, 3], 20),
            Itemset::with_support(vec![1, 2], 20),
            Itemset::with_support(vec![1], 20),
        ];
        let outcome = Krimp::default().run(repeated(), candidates).unwrap();

        assert_eq!(outcome.accepted, 1);
        assert_eq!(outcome.rejected, 1);
        assert_eq!(
            outcome.code_table.multi_item_codes(),
            vec![Itemset::new(vec![1, 2, 3])]
        );
        assert_eq!(outcome.code_table.usage(&Itemset::new(vec![1, 2, 3])), 20);
        assert!(outcome.compressed_size < outcome.standard_size);
        assert_eq!(outcome.size_history.len(), 3);
    }

    #[test]
    fn candidate_limit_stops_early() {
        let candidates = vec![
            Itemset::with_support(vec![1, 2], 20),
            Itemset::with_support(vec![1, 2, 3], 20),
        ];
        let config = KrimpConfig::default().with_candidate_limit(Some(1));
        let outcome = Krimp::new(config).run(repeated(), candidates).unwrap();

        // support ties are broken by size, so only [1 2 3] is consumed
        assert_eq!(outcome.accepted + outcome.rejected, 1);
        assert!(outcome.code_table.contains(&Itemset::new(vec![1, 2, 3])));
        assert!(!outcome.code_table.contains(&Itemset::new(vec![1, 2])));
    }

    #[test]
    fn duplicate_candidate_is_rejected() {
        let candidates = vec![
            Itemset::with_support(vec![1, 2, 3], 20),
            Itemset::with_support(vec![3, 2, 1], 20),
        ];
        let outcome = Krimp::default().run(repeated(), candidates).unwrap();

        assert_eq!((outcome.accepted, outcome.rejected), (1, 1));
        assert_eq!(outcome.size_history[1], outcome.size_history[2]);
    }
}
