use std::{
    cmp::Ordering,
    fmt::{Display, Formatter, Result},
    hash::{Hash, Hasher},
    iter::FromIterator,
};

use crate::{
    bits::{self, Bits},
    types::{ItemId, Support},
};

/// A set of items with a support count.
///
/// Items are kept sorted and unique; equality, hashing and ordering only look
/// at the items, never at the support. The bit view (`bits()[j]` set iff item
/// `j` is a member) is derived once at construction.
#[derive(Clone, Debug)]
pub struct Itemset {
    items: Vec<ItemId>,
    bits: Bits,
    support: Support,
}

impl Itemset {
    pub fn new<I>(items: I) -> Self
    where
        I: IntoIterator<Item = ItemId>,
    {
        Self::with_support(items, 0)
    }

    pub fn with_support<I>(items: I, support: Support) -> Self
    where
        I: IntoIterator<Item = ItemId>,
    {
        let mut items: Vec<ItemId> = items.into_iter().collect();
        items.sort_unstable();
        items.dedup();

        let len = items.last().map_or(0, |&max| max + 1);
        let bits = bits::from_indices(items.iter().copied(), len);

        Self {
            items,
            bits,
            support,
        }
    }

    pub fn singleton(item: ItemId) -> Self {
        Self::new(vec![item])
    }

    pub fn items(&self) -> &[ItemId] {
        &self.items
    }

    pub fn bits(&self) -> &Bits {
        &self.bits
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_singleton(&self) -> bool {
        self.items.len() == 1
    }

    pub fn support(&self) -> Support {
        self.support
    }

    pub fn set_support(&mut self, support: Support) {
        self.support = support;
    }

    pub fn contains(&self, item: ItemId) -> bool {
        self.bits.get(item).map_or(false, |bit| *bit)
    }

    /// `other ⊆ self`
    pub fn contains_all(&self, other: &Itemset) -> bool {
        bits::is_subset(&other.bits, &self.bits)
    }

    pub fn intersects(&self, other: &Itemset) -> bool {
        bits::intersects(&self.bits, &other.bits)
    }

    pub fn intersection(&self, other: &Itemset) -> Itemset {
        Itemset::new(
            self.items
                .iter()
                .copied()
                .filter(|&item| other.contains(item)),
        )
    }

    /// Items of `self` not in `other`. Keeps the support of `self`.
    pub fn subtract(&self, other: &Itemset) -> Itemset {
        Itemset::with_support(
            self.items
                .iter()
                .copied()
                .filter(|&item| !other.contains(item)),
            self.support,
        )
    }

    /// Items of either side. Keeps the support of `self`.
    pub fn union(&self, other: &Itemset) -> Itemset {
        Itemset::with_support(
            self.items.iter().chain(other.items.iter()).copied(),
            self.support,
        )
    }
}

impl PartialEq for Itemset {
    fn eq(&self, other: &Itemset) -> bool {
        self.items == other.items
    }
}

impl Eq for Itemset {}

impl Hash for Itemset {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.items.hash(state);
    }
}

/// Canonical order: ascending item ids, compared lexicographically.
impl Ord for Itemset {
    fn cmp(&self, other: &Self) -> Ordering {
        self.items.cmp(&other.items)
    }
}

impl PartialOrd for Itemset {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromIterator<ItemId> for Itemset {
    fn from_iter<I: IntoIterator<Item = ItemId>>(iter: I) -> Self {
        Itemset::new(iter)
    }
}

impl Display for Itemset {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let mut items = self.items.iter();
        if let Some(first) = items.next() {
            write!(f, "{}", first)?;
            for item in items {
                write!(f, " {}", item)?;
            }
        }
        Ok(())
    }
}

/// Scan order of the cover: larger codes first, then higher support, then
/// canonical item order.
pub fn standard_cover_order(a: &Itemset, b: &Itemset) -> Ordering {
    b.len()
        .cmp(&a.len())
        .then_with(|| b.support.cmp(&a.support))
        .then_with(|| a.cmp(b))
}

/// Order in which the search consumes candidates: higher support first, then
/// larger codes, then canonical item order.
pub fn standard_candidate_order(a: &Itemset, b: &Itemset) -> Ordering {
    b.support
        .cmp(&a.support)
        .then_with(|| b.len().cmp(&a.len()))
        .then_with(|| a.cmp(b))
}
