use tracing::debug;

use crate::{
    codetable::CodeTable,
    error::Result,
    itemset::{standard_cover_order, Itemset},
    types::Nats,
};

/// Multi-item codes of `after` used less than in `before`.
fn dropped_usages(before: &CodeTable, after: &CodeTable) -> Vec<Itemset> {
    after
        .multi_item_codes()
        .into_iter()
        .filter(|code| after.usage(code) < before.usage(code))
        .collect()
}

/// Position of the code with the lowest usage in `table`; ties go to the
/// code that comes first in cover order.
fn least_used(table: &CodeTable, codes: &[Itemset]) -> Option<usize> {
    codes
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            table
                .usage(a)
                .cmp(&table.usage(b))
                .then_with(|| standard_cover_order(a, b))
        })
        .map(|(position, _)| position)
}

/// Tries to remove the codes that lost usage when `result` was derived from
/// `before`, least used first. A removal is kept only if it strictly lowers
/// the size, and then the codes it in turn weakened are tried as well.
///
/// Returns the number of removed codes.
pub(super) fn prune(
    before: &CodeTable,
    result: &mut CodeTable,
    result_size: &mut Nats,
) -> Result<usize> {
    let mut candidates = dropped_usages(before, result);
    let mut pruned = 0;

    while let Some(position) = least_used(result, &candidates) {
        let code = candidates.swap_remove(position);

        let trial = result.without_code(&code);
        let trial_size = trial.total_compressed_size()?;
        if trial_size >= *result_size {
            continue;
        }

        debug!(code = %code, gain = *result_size - trial_size, "pruned");
        for weakened in dropped_usages(result, &trial) {
            if !candidates.contains(&weakened) {
                candidates.push(weakened);
            }
        }
        *result = trial;
        *result_size = trial_size;
        pruned += 1;
    }

    Ok(pruned)
}
