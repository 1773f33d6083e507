//! Word-wise helpers over `bitvec` vectors.
//!
//! Item sets and transaction sets are both stored as `Bits`. Vectors of
//! different lengths are allowed everywhere: missing positions read as zero.
//! Every vector is created zeroed and only mutated through `set` or the
//! helpers below, so the unused tail of the last word always stays zero and
//! whole words can be compared directly.

use bitvec::prelude::*;

pub type Bits = BitVec<usize, Lsb0>;

/// All-zero vector of `len` bits.
pub fn with_len(len: usize) -> Bits {
    bitvec![usize, Lsb0; 0; len]
}

/// Vector of `len` bits with the given positions set.
///
/// Positions `>= len` are ignored.
pub fn from_indices<I>(indices: I, len: usize) -> Bits
where
    I: IntoIterator<Item = usize>,
{
    let mut bits = with_len(len);
    for index in indices {
        if index < len {
            bits.set(index, true);
        }
    }
    bits
}

/// Bit at `index`, `false` past the end.
pub fn get(bits: &Bits, index: usize) -> bool {
    bits.get(index).map_or(false, |bit| *bit)
}

/// `a ∩ b ≠ ∅`
pub fn intersects(a: &Bits, b: &Bits) -> bool {
    a.as_raw_slice()
        .iter()
        .zip(b.as_raw_slice())
        .any(|(x, y)| x & y != 0)
}

/// `a ⊆ b`, i.e. `a & !b == 0`.
pub fn is_subset(a: &Bits, b: &Bits) -> bool {
    let a = a.as_raw_slice();
    let b = b.as_raw_slice();

    a.iter()
        .enumerate()
        .all(|(i, x)| x & !b.get(i).copied().unwrap_or(0) == 0)
}

/// `acc &= other`; positions beyond `other` are cleared.
pub fn and_assign(acc: &mut Bits, other: &Bits) {
    let other = other.as_raw_slice();
    for (i, word) in acc.as_raw_mut_slice().iter_mut().enumerate() {
        *word &= other.get(i).copied().unwrap_or(0);
    }
}

/// `acc |= other`; `acc` grows to cover `other`.
pub fn or_assign(acc: &mut Bits, other: &Bits) {
    if acc.len() < other.len() {
        acc.resize(other.len(), false);
    }
    for (word, x) in acc.as_raw_mut_slice().iter_mut().zip(other.as_raw_slice()) {
        *word |= x;
    }
}
