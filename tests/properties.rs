use std::{collections::BTreeSet, sync::Arc};

use krimp::{
    CodeTable, CoverStrategy, Itemset, Krimp, KrimpConfig, Rebind, TransactionDatabase,
};
use proptest::{collection, prelude::*};

fn transactions() -> impl Strategy<Value = Vec<BTreeSet<usize>>> {
    collection::vec(collection::btree_set(0usize..8, 1..6), 1..16)
}

fn codes() -> impl Strategy<Value = Vec<BTreeSet<usize>>> {
    collection::vec(collection::btree_set(0usize..9, 2..5), 0..6)
}

fn database(transactions: &[BTreeSet<usize>]) -> Arc<TransactionDatabase> {
    Arc::new(
        transactions
            .iter()
            .map(|items| Itemset::new(items.iter().copied()))
            .collect(),
    )
}

fn itemsets(codes: &[BTreeSet<usize>]) -> Vec<Itemset> {
    codes
        .iter()
        .map(|items| Itemset::new(items.iter().copied()))
        .collect()
}

fn usages(table: &CodeTable) -> Vec<(Vec<usize>, u32)> {
    table
        .codes()
        .map(|code| (code.itemset.items().to_vec(), code.usage))
        .collect()
}

proptest! {
    #[test]
    fn standard_table_usage_equals_support(raw in transactions()) {
        let db = database(&raw);
        let table = CodeTable::standard(db.clone());

        prop_assert_eq!(table.len(), db.vocabulary().count());
        for item in db.vocabulary() {
            prop_assert_eq!(table.usage(&Itemset::singleton(item)), db.item_support(item));
        }
    }

    #[test]
    fn covers_partition_every_transaction(raw in transactions(), raw_codes in codes()) {
        let db = database(&raw);
        let table = CodeTable::new(db.clone(), &itemsets(&raw_codes));

        for (id, transaction) in db.iter().enumerate() {
            let cover = table.cover(id);
            let covered: usize = cover.iter().map(|code| code.len()).sum();
            let union: BTreeSet<usize> = cover
                .iter()
                .flat_map(|code| code.items().iter().copied())
                .collect();

            prop_assert_eq!(covered, transaction.len());
            prop_assert_eq!(union.into_iter().collect::<Vec<_>>(), transaction.items().to_vec());
        }
    }

    #[test]
    fn usage_bits_are_consistent(raw in transactions(), raw_codes in codes()) {
        let db = database(&raw);
        let table = CodeTable::new(db, &itemsets(&raw_codes));

        let mut total = 0u64;
        for code in table.codes() {
            let usage_bits = table.usage_bits(code.itemset).unwrap();
            let support_bits = table.support_bits(code.itemset).unwrap();
            prop_assert!(krimp::bits::is_subset(usage_bits, support_bits));
            prop_assert_eq!(usage_bits.count_ones() as u32, code.usage);
            total += code.usage as u64;
        }
        prop_assert_eq!(total, table.usage_total());
    }

    #[test]
    fn rebuild_is_deterministic(raw in transactions(), raw_codes in codes()) {
        let db = database(&raw);
        let codes = itemsets(&raw_codes);
        let first = CodeTable::new(db.clone(), &codes);
        let second = CodeTable::new(db, &codes);

        prop_assert_eq!(usages(&first), usages(&second));
        prop_assert_eq!(
            first.total_compressed_size().unwrap(),
            second.total_compressed_size().unwrap()
        );
    }

    #[test]
    fn strategies_agree(raw in transactions(), raw_codes in codes()) {
        let db = database(&raw);
        let codes = itemsets(&raw_codes);
        let vectorized = CodeTable::with_strategy(db.clone(), &codes, CoverStrategy::Vectorized);
        let naive = CodeTable::with_strategy(db, &codes, CoverStrategy::Naive);

        prop_assert_eq!(usages(&vectorized), usages(&naive));
    }

    #[test]
    fn search_never_grows(raw in transactions(), raw_codes in codes(), prune in any::<bool>()) {
        let db = database(&raw);
        let config = KrimpConfig::default().with_pruning(prune);
        let outcome = Krimp::new(config).run(db, itemsets(&raw_codes)).unwrap();

        prop_assert!(outcome.size_history.windows(2).all(|pair| pair[1] <= pair[0]));
        prop_assert!(outcome.compressed_size <= outcome.standard_size);
        prop_assert_eq!(
            outcome.code_table.total_compressed_size().unwrap(),
            outcome.compressed_size
        );
    }

    #[test]
    fn rebind_equals_fresh_table(
        first in transactions(),
        second in transactions(),
        raw_codes in codes(),
    ) {
        let codes = itemsets(&raw_codes);
        let table = CodeTable::new(database(&first), &codes);

        let rebound = table.rebound(database(&second), Rebind::Fresh);
        let fresh = CodeTable::new(database(&second), &codes);

        prop_assert_eq!(usages(&rebound), usages(&fresh));
        prop_assert_eq!(
            rebound.total_compressed_size().unwrap(),
            fresh.total_compressed_size().unwrap()
        );
    }

    #[test]
    fn transplanted_covers_partition_every_transaction(
        first in transactions(),
        second in transactions(),
        raw_codes in codes(),
    ) {
        let table = CodeTable::new(database(&first), &itemsets(&raw_codes));
        let db = database(&second);
        let transplanted = table.rebound(db.clone(), Rebind::KeepCoverOrder);

        let mut total = 0u64;
        for (id, transaction) in db.iter().enumerate() {
            let covered: usize = transplanted.cover(id).iter().map(|code| code.len()).sum();
            prop_assert_eq!(covered, transaction.len());
            total += transaction.len() as u64;
        }
        prop_assert!(transplanted.usage_total() <= total);
    }
}
