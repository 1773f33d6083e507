//! MDL code tables for transaction databases (KRIMP).
//!
//! A [`CodeTable`] compresses a [`TransactionDatabase`] by covering every
//! transaction with disjoint itemsets. [`Krimp`] searches for the candidate
//! itemsets that make the description of the data, table included, as short
//! as possible.
//!
//! ```no_run
//! use std::sync::Arc;
//! use krimp::{itemsets, Krimp, KrimpConfig, TransactionDatabase};
//!
//! let db: Arc<TransactionDatabase> = Arc::new(krimp::io::read_database_file("data.dat")?);
//! let candidates = itemsets::generate_frequent_itemsets(&db, 0.05, 4)?;
//! let outcome = Krimp::new(KrimpConfig::default()).run(db, candidates)?;
//! println!("{}", outcome.report());
//! # Ok::<(), krimp::KrimpError>(())
//! ```

pub mod bits;
pub mod codetable;
pub mod combi;
pub mod config;
pub mod database;
pub mod error;
pub mod io;
pub mod itemset;
pub mod itemsets;
pub mod krimp;
pub mod report;
pub mod types;

pub use codetable::{Code, CodeTable, CoverStrategy, Rebind};
pub use config::{KrimpConfig, MiningConfig};
pub use database::TransactionDatabase;
pub use error::{KrimpError, Result};
pub use itemset::{standard_candidate_order, standard_cover_order, Itemset};
pub use krimp::{Krimp, KrimpOutcome};
pub use report::CompressionReport;

/// Builds an [`Itemset`] from item ids, optionally with a support after `;`.
///
/// ```
/// let code = krimp::itemset![3, 1, 2; 5];
/// assert_eq!(code.items(), &[1, 2, 3]);
/// assert_eq!(code.support(), 5);
/// ```
#[macro_export]
macro_rules! itemset {
    ($($item:expr),+ ; $support:expr) => {
        $crate::itemset::Itemset::with_support(vec![$($item),+], $support)
    };
    ($($item:expr),* $(,)?) => {
        $crate::itemset::Itemset::new(vec![$($item),*])
    };
}
