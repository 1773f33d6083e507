//! Code tables and their MDL encoded lengths.
//!
//! A code table holds every singleton of its database plus any number of
//! multi-item codes, kept in standard cover order. Usages come from the
//! disjoint cover of each transaction (see [`cover`]) and define the code
//! lengths `L(X) = -ln(usage(X) / usage_total)`.
//!
//! A *standard* table holds singletons only and prices itself by its code
//! lengths alone. Every other table is bound to a standard table, which
//! prices the items of each code it uses:
//!
//! - `L(D | CT) = Σ_t Σ_{X ∈ cover(t)} L(X)`
//! - `L(CT | D) = Σ_{X : usage(X) > 0} L(X) + L_ST(X)`
//! - `L(D, CT) = L(CT | D) + L(D | CT)`

mod cover;
mod ids;

pub use cover::{count_usages, CoverScan, CoverStrategy};
pub use ids::CodeIdAllocator;

use std::{
    cmp::Ordering,
    fmt::{self, Display, Formatter},
    sync::Arc,
};

use crate::{
    bits::{self, Bits},
    database::TransactionDatabase,
    error::{KrimpError, Result},
    itemset::Itemset,
    types::{CodeId, ItemId, Nats, Support, TransactionId, Usage},
};

/// The database-dependent, immutable part of a code: its items (support set
/// to the support in the bound database), identity and support vector.
///
/// Entries are shared between a table and the trials cloned from it.
#[derive(Debug)]
pub struct CodeEntry {
    pub(crate) code: Itemset,
    pub(crate) id: CodeId,
    pub(crate) support_bits: Arc<Bits>,
    /// Support that places the code in cover order. Equal to the code's
    /// support unless the table was moved with a learned cover order.
    pub(crate) rank: Support,
}

impl CodeEntry {
    pub(crate) fn supports(&self, transaction: TransactionId) -> bool {
        bits::get(&self.support_bits, transaction)
    }

    /// Standard cover order, with `rank` in place of the support.
    pub(crate) fn cover_order(&self, other: &CodeEntry) -> Ordering {
        other
            .code
            .len()
            .cmp(&self.code.len())
            .then_with(|| other.rank.cmp(&self.rank))
            .then_with(|| self.code.cmp(&other.code))
    }
}

/// A code of a table, as seen from outside.
#[derive(Clone, Copy, Debug)]
pub struct Code<'a> {
    pub itemset: &'a Itemset,
    pub id: CodeId,
    pub usage: Usage,
    pub support: Support,
}

/// How a code table is moved to another database.
///
/// Support vectors and usages are always derived from the new database. The
/// modes differ in the cover order the usages are counted with and in the
/// standard table that prices code items.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rebind {
    /// Cover order and standard table come from the new database. Identical
    /// to building a fresh table from the new database and the same codes.
    Fresh,
    /// Multi-item codes keep the cover order they had before the move, so
    /// the learned covers are transplanted onto the new data. The standard
    /// table is rebuilt from the new database.
    KeepCoverOrder,
    /// Like `KeepCoverOrder`, and code items are still priced with the
    /// standard table of the database the table was built on. An item that
    /// table does not know makes the size functions fail.
    KeepReference,
}

#[derive(Clone, Debug)]
pub struct CodeTable {
    transactions: Arc<TransactionDatabase>,
    entries: Vec<Arc<CodeEntry>>,
    usages: Vec<Usage>,
    usage_bits: Vec<Arc<Bits>>,
    usage_total: u64,
    // item -> position of its singleton in `entries`
    singletons: Vec<Option<usize>>,
    standard: Option<Arc<CodeTable>>,
    ids: CodeIdAllocator,
    strategy: CoverStrategy,
}

impl CodeTable {
    /// Singletons only; each usage equals the support of its item.
    pub fn standard(transactions: Arc<TransactionDatabase>) -> Self {
        let mut table = Self::empty(transactions, None, CoverStrategy::default());
        table.entries = singleton_entries(&table.transactions);
        table.reorder();
        table.count_singletons();
        table
    }

    /// Singletons plus the multi-item `codes`, bound to the standard table
    /// of `transactions`. Singletons among `codes` are ignored.
    ///
    /// With no multi-item codes the usages equal those of
    /// [`CodeTable::standard`], but the table is still bound: each used code
    /// is also priced with the standard table, so its size is larger than
    /// the standard table's by `Σ L_ST(X)`. Use [`CodeTable::standard`] for
    /// the baseline.
    pub fn new(transactions: Arc<TransactionDatabase>, codes: &[Itemset]) -> Self {
        Self::with_strategy(transactions, codes, CoverStrategy::default())
    }

    pub fn with_strategy(
        transactions: Arc<TransactionDatabase>,
        codes: &[Itemset],
        strategy: CoverStrategy,
    ) -> Self {
        let standard = Arc::new(Self::standard(transactions.clone()));
        let mut table = Self::empty(transactions, Some(standard), strategy);

        table.entries = singleton_entries(&table.transactions);
        for code in codes {
            table.push_code(code, None, None);
        }
        table.reorder();
        table.recount();
        table
    }

    fn empty(
        transactions: Arc<TransactionDatabase>,
        standard: Option<Arc<CodeTable>>,
        strategy: CoverStrategy,
    ) -> Self {
        Self {
            ids: CodeIdAllocator::starting_at(transactions.universe()),
            transactions,
            entries: vec![],
            usages: vec![],
            usage_bits: vec![],
            usage_total: 0,
            singletons: vec![],
            standard,
            strategy,
        }
    }

    /// Appends a multi-item code with its support derived from the bound
    /// database. Order and usages are left stale.
    fn push_code(&mut self, code: &Itemset, id: Option<CodeId>, rank: Option<Support>) -> bool {
        if code.len() < 2 || self.position(code).is_some() {
            return false;
        }

        let support_bits = self.transactions.support_bits(code);
        let support = support_bits.count_ones() as Support;
        let id = match id {
            Some(id) if id >= self.transactions.universe() => id,
            _ => self.ids.allocate(),
        };

        self.entries.push(Arc::new(CodeEntry {
            code: Itemset::with_support(code.items().iter().copied(), support),
            id,
            support_bits: Arc::new(support_bits),
            rank: rank.unwrap_or(support),
        }));
        true
    }

    fn reorder(&mut self) {
        self.entries.sort_by(|a, b| a.cover_order(b));

        self.singletons = vec![None; self.transactions.universe()];
        for (position, entry) in self.entries.iter().enumerate() {
            if let [item] = entry.code.items() {
                self.singletons[*item] = Some(position);
            }
        }
    }

    /// Singleton-only tables cover every transaction by its own items.
    fn count_singletons(&mut self) {
        self.usages = self
            .entries
            .iter()
            .map(|entry| entry.support_bits.count_ones() as Usage)
            .collect();
        self.usage_bits = self
            .entries
            .iter()
            .map(|entry| entry.support_bits.clone())
            .collect();
        self.usage_total = self.usages.iter().map(|&usage| usage as u64).sum();
    }

    fn recount(&mut self) {
        let (usages, usage_bits): (Vec<Usage>, Vec<Arc<Bits>>) =
            count_usages(&self.entries, &self.transactions, self.strategy)
                .into_iter()
                .map(|(usage, bits)| (usage, Arc::new(bits)))
                .unzip();

        self.usages = usages;
        self.usage_bits = usage_bits;
        self.usage_total = self.usages.iter().map(|&usage| usage as u64).sum();
    }

    /// Adds a multi-item code and recounts. Returns `false`, leaving the
    /// table untouched, for singletons and codes already present.
    ///
    /// A standard table becomes bound to a copy of itself.
    pub fn add_code(&mut self, code: &Itemset) -> bool {
        if code.len() < 2 || self.contains(code) {
            return false;
        }
        if self.standard.is_none() {
            self.standard = Some(Arc::new(self.clone()));
        }

        self.push_code(code, None, None);
        self.reorder();
        self.recount();
        true
    }

    /// This table with `code` added. Shares every unchanged entry.
    pub fn with_code(&self, code: &Itemset) -> CodeTable {
        let mut trial = self.clone();
        trial.add_code(code);
        trial
    }

    /// Removes a multi-item code and recounts. Singletons stay.
    pub fn remove_code(&mut self, code: &Itemset) -> bool {
        if code.len() < 2 {
            return false;
        }
        let position = match self.position(code) {
            Some(position) => position,
            None => return false,
        };

        self.entries.remove(position);
        self.reorder();
        self.recount();
        true
    }

    pub fn without_code(&self, code: &Itemset) -> CodeTable {
        let mut trial = self.clone();
        trial.remove_code(code);
        trial
    }

    /// Moves the table to another database: singletons are rebuilt from it,
    /// multi-item codes keep their identities, every support vector and
    /// usage is derived again. `mode` decides the cover order and the
    /// standard table, see [`Rebind`].
    pub fn set_transactions(&mut self, transactions: Arc<TransactionDatabase>, mode: Rebind) {
        let keep_order = mode != Rebind::Fresh;
        let kept: Vec<(Itemset, CodeId, Option<Support>)> = self
            .entries
            .iter()
            .filter(|entry| !entry.code.is_singleton())
            .map(|entry| (entry.code.clone(), entry.id, keep_order.then_some(entry.rank)))
            .collect();

        if let Some(last) = transactions.universe().checked_sub(1) {
            self.ids.reserve(last);
        }
        for (_, id, _) in &kept {
            if *id >= transactions.universe() {
                self.ids.reserve(*id);
            }
        }
        self.transactions = transactions;
        self.standard = match (self.standard.take(), mode) {
            (None, _) => None,
            (Some(reference), Rebind::KeepReference) => Some(reference),
            (Some(_), _) => Some(Arc::new(Self::standard(self.transactions.clone()))),
        };

        self.entries = singleton_entries(&self.transactions);
        for (code, id, rank) in &kept {
            self.push_code(code, Some(*id), *rank);
        }
        self.reorder();

        if self.is_standard() {
            self.count_singletons();
        } else {
            self.recount();
        }
    }

    /// A copy of this table moved to `transactions`.
    pub fn rebound(&self, transactions: Arc<TransactionDatabase>, mode: Rebind) -> CodeTable {
        let mut table = self.clone();
        table.set_transactions(transactions, mode);
        table
    }

    pub fn is_standard(&self) -> bool {
        self.standard.is_none()
    }

    /// The standard table that prices code items; `None` on a standard table.
    pub fn standard_table(&self) -> Option<&CodeTable> {
        self.standard.as_deref()
    }

    pub fn transactions(&self) -> &Arc<TransactionDatabase> {
        &self.transactions
    }

    pub fn strategy(&self) -> CoverStrategy {
        self.strategy
    }

    /// Number of codes, singletons included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All codes in standard cover order.
    pub fn codes(&self) -> impl Iterator<Item = Code<'_>> + '_ {
        (0..self.entries.len()).map(move |position| self.code_at(position))
    }

    /// The multi-item codes in standard cover order, with their support in
    /// the bound database.
    pub fn multi_item_codes(&self) -> Vec<Itemset> {
        self.entries
            .iter()
            .filter(|entry| !entry.code.is_singleton())
            .map(|entry| entry.code.clone())
            .collect()
    }

    fn code_at(&self, position: usize) -> Code<'_> {
        let entry = &self.entries[position];
        Code {
            itemset: &entry.code,
            id: entry.id,
            usage: self.usages[position],
            support: entry.code.support(),
        }
    }

    fn position(&self, code: &Itemset) -> Option<usize> {
        match code.items() {
            [item] => self.singletons.get(*item).copied().flatten(),
            _ => self.entries.iter().position(|entry| entry.code == *code),
        }
    }

    pub fn contains(&self, code: &Itemset) -> bool {
        self.position(code).is_some()
    }

    pub fn get(&self, code: &Itemset) -> Option<Code<'_>> {
        self.position(code).map(|position| self.code_at(position))
    }

    /// 0 for codes not in the table.
    pub fn usage(&self, code: &Itemset) -> Usage {
        self.position(code)
            .map_or(0, |position| self.usages[position])
    }

    /// Support in the bound database; 0 for codes not in the table.
    pub fn support(&self, code: &Itemset) -> Support {
        self.position(code)
            .map_or(0, |position| self.entries[position].code.support())
    }

    pub fn code_id(&self, code: &Itemset) -> Option<CodeId> {
        self.position(code)
            .map(|position| self.entries[position].id)
    }

    pub fn support_bits(&self, code: &Itemset) -> Option<&Bits> {
        self.position(code)
            .map(|position| &*self.entries[position].support_bits)
    }

    pub fn usage_bits(&self, code: &Itemset) -> Option<&Bits> {
        self.position(code)
            .map(|position| &*self.usage_bits[position])
    }

    pub fn usage_total(&self) -> u64 {
        self.usage_total
    }

    /// The codes covering `transaction`, in cover order.
    pub fn cover(&self, transaction: TransactionId) -> Vec<&Itemset> {
        self.usage_bits
            .iter()
            .zip(&self.entries)
            .filter(|(usage_bits, _)| bits::get(usage_bits, transaction))
            .map(|(_, entry)| &entry.code)
            .collect()
    }

    /// Runs the cover engine for one transaction and code, independently of
    /// the stored usage vectors.
    pub fn is_cover(&self, transaction: TransactionId, code: &Itemset) -> bool {
        match self.position(code) {
            Some(position) => CoverScan::new(&self.entries, &self.transactions, self.strategy)
                .is_cover(transaction, position),
            None => false,
        }
    }

    fn degenerate(&self, code: String, usage: Usage) -> KrimpError {
        KrimpError::DegenerateEncoding {
            code,
            usage,
            usage_total: self.usage_total,
        }
    }

    pub fn probability(&self, code: &Itemset) -> Result<f64> {
        if self.usage_total == 0 {
            return Err(self.degenerate(code.to_string(), self.usage(code)));
        }
        Ok(self.usage(code) as f64 / self.usage_total as f64)
    }

    /// `-ln(usage / usage_total)`; an error for unused codes.
    pub fn code_length(&self, code: &Itemset) -> Result<Nats> {
        match self.position(code) {
            Some(position) => self.code_length_at(position),
            None => Err(self.degenerate(code.to_string(), 0)),
        }
    }

    fn code_length_at(&self, position: usize) -> Result<Nats> {
        let usage = self.usages[position];
        if usage == 0 || self.usage_total == 0 {
            return Err(self.degenerate(self.entries[position].code.to_string(), usage));
        }
        Ok(-(usage as f64 / self.usage_total as f64).ln())
    }

    fn singleton_length(&self, item: ItemId) -> Result<Nats> {
        match self.singletons.get(item).copied().flatten() {
            Some(position) => self.code_length_at(position),
            None => Err(self.degenerate(item.to_string(), 0)),
        }
    }

    /// Cost of spelling out the items of `code` with the bound standard
    /// table. A standard table does not describe itself: 0.
    pub fn code_length_according_st(&self, code: &Itemset) -> Result<Nats> {
        match &self.standard {
            None => Ok(0.0),
            Some(standard) => code
                .items()
                .iter()
                .map(|&item| standard.singleton_length(item))
                .sum(),
        }
    }

    /// `L(t | CT)`
    pub fn transaction_encoded_length(&self, transaction: TransactionId) -> Result<Nats> {
        if transaction >= self.transactions.len() {
            return Err(KrimpError::TransactionOutOfRange {
                index: transaction,
                len: self.transactions.len(),
            });
        }

        self.usage_bits
            .iter()
            .enumerate()
            .filter(|(_, usage_bits)| bits::get(usage_bits, transaction))
            .map(|(position, _)| self.code_length_at(position))
            .sum()
    }

    /// `L(D | CT)`, summed per code as `usage · L(X)`.
    pub fn dataset_encoded_length(&self) -> Result<Nats> {
        self.usages
            .iter()
            .enumerate()
            .filter(|(_, &usage)| usage > 0)
            .map(|(position, &usage)| {
                self.code_length_at(position)
                    .map(|length| usage as f64 * length)
            })
            .sum()
    }

    /// `L(CT | D)`
    pub fn code_table_encoded_length(&self) -> Result<Nats> {
        self.usages
            .iter()
            .enumerate()
            .filter(|(_, &usage)| usage > 0)
            .map(|(position, _)| {
                let code = &self.entries[position].code;
                let length = self.code_length_at(position)?;
                Ok::<Nats, KrimpError>(length + self.code_length_according_st(code)?)
            })
            .sum()
    }

    /// `L(D, CT)`, the quantity the search minimizes.
    pub fn total_compressed_size(&self) -> Result<Nats> {
        Ok(self.code_table_encoded_length()? + self.dataset_encoded_length()?)
    }
}

fn singleton_entries(transactions: &TransactionDatabase) -> Vec<Arc<CodeEntry>> {
    transactions
        .vocabulary()
        .filter_map(|item| {
            transactions.item_support_bits(item).map(|support_bits| {
                let support = support_bits.count_ones() as Support;
                Arc::new(CodeEntry {
                    code: Itemset::with_support(vec![item], support),
                    id: item,
                    support_bits: support_bits.clone(),
                    rank: support,
                })
            })
        })
        .collect()
}

impl Display for CodeTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total usages: {}", self.usage_total)?;
        for (position, code) in self.codes().enumerate() {
            write!(
                f,
                "[{}] id:{} u:{} s:{}",
                code.itemset, code.id, code.usage, code.support
            )?;
            match self.code_length_at(position) {
                Ok(length) => writeln!(f, " L:{:.4}", length)?,
                Err(_) => writeln!(f, " L:-")?,
            }
        }
        Ok(())
    }
}
