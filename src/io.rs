//! Line-oriented itemset files.
//!
//! One itemset per line as whitespace separated item ids, optionally
//! followed by `#SUP: n` and `#USG: n` annotations. Blank lines and lines
//! starting with `%` or `@` are skipped. Usages are written for code tables
//! but never read back.

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use tracing::debug;

use crate::{
    codetable::CodeTable,
    database::TransactionDatabase,
    error::{KrimpError, Result},
    itemset::Itemset,
    types::{ItemId, Support},
};

pub fn read_itemsets<R: BufRead>(reader: R) -> Result<Vec<Itemset>> {
    let mut itemsets = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if let Some(itemset) = parse_line(&line).map_err(|reason| KrimpError::Parse {
            line: index + 1,
            reason,
        })? {
            itemsets.push(itemset);
        }
    }

    Ok(itemsets)
}

fn parse_line(line: &str) -> std::result::Result<Option<Itemset>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('%') || line.starts_with('@') {
        return Ok(None);
    }

    let mut parts = line.split('#');
    let items = parts
        .next()
        .unwrap_or_default()
        .split_whitespace()
        .map(|token| {
            token
                .parse::<ItemId>()
                .map_err(|_| format!("invalid item `{}`", token))
        })
        .collect::<std::result::Result<Vec<ItemId>, String>>()?;

    let mut support: Support = 0;
    for annotation in parts {
        let (key, value) = annotation
            .split_once(':')
            .ok_or_else(|| format!("malformed annotation `#{}`", annotation.trim()))?;
        let value = value
            .trim()
            .parse::<u32>()
            .map_err(|_| format!("invalid count `{}`", value.trim()))?;

        match key.trim() {
            "SUP" => support = value,
            "USG" => {}
            other => return Err(format!("unknown annotation `#{}`", other)),
        }
    }

    Ok(Some(Itemset::with_support(items, support)))
}

pub fn read_itemsets_file<P: AsRef<Path>>(path: P) -> Result<Vec<Itemset>> {
    let path = path.as_ref();
    let itemsets = read_itemsets(BufReader::new(File::open(path)?))?;
    debug!(path = %path.display(), itemsets = itemsets.len(), "read itemsets");
    Ok(itemsets)
}

/// Transactions from a file; annotations are ignored.
pub fn read_database_file<P: AsRef<Path>>(path: P) -> Result<TransactionDatabase> {
    Ok(TransactionDatabase::new(read_itemsets_file(path)?))
}

/// `1 2 3 #SUP: 4` per itemset.
pub fn write_itemsets<W: Write>(mut writer: W, itemsets: &[Itemset]) -> Result<()> {
    for itemset in itemsets {
        writeln!(writer, "{} #SUP: {}", itemset, itemset.support())?;
    }
    writer.flush()?;
    Ok(())
}

/// Every code in cover order with its support and usage.
pub fn write_code_table<W: Write>(mut writer: W, table: &CodeTable) -> Result<()> {
    for code in table.codes() {
        writeln!(
            writer,
            "{} #SUP: {} #USG: {}",
            code.itemset, code.support, code.usage
        )?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_code_table_file<P: AsRef<Path>>(path: P, table: &CodeTable) -> Result<()> {
    let path = path.as_ref();
    write_code_table(BufWriter::new(File::create(path)?), table)?;
    debug!(path = %path.display(), codes = table.len(), "wrote code table");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    #[test]
    fn reads_items_and_annotations() {
        let text = "% comment\n@attribute\n1 2 3\n\n  4 2 #SUP: 7\n5 #SUP: 2 #USG: 1\n";
        let itemsets = read_itemsets(text.as_bytes()).unwrap();

        let read: Vec<(Vec<ItemId>, Support)> = itemsets
            .iter()
            .map(|itemset| (itemset.items().to_vec(), itemset.support()))
            .collect();
        assert_eq!(
            read,
            vec![(vec![1, 2, 3], 0), (vec![2, 4], 7), (vec![5], 2)]
        );
    }

    #[test]
    fn parse_errors_carry_line_numbers() {
        let error = read_itemsets("1 2\n% skipped\n3 x\n".as_bytes()).unwrap_err();
        assert!(matches!(error, KrimpError::Parse { line: 3, .. }));

        let error = read_itemsets("1 #SUP 2\n".as_bytes()).unwrap_err();
        assert!(matches!(error, KrimpError::Parse { line: 1, .. }));

        let error = read_itemsets("1 #FOO: 2\n".as_bytes()).unwrap_err();
        assert_eq!(error.to_string(), "line 1: unknown annotation `#FOO`");

        assert!(read_itemsets("-1\n".as_bytes()).is_err());
    }

    #[test]
    fn writes_itemsets() {
        let mut out = Vec::new();
        write_itemsets(
            &mut out,
            &[
                Itemset::with_support(vec![3, 1, 2], 4),
                Itemset::with_support(vec![9], 1),
            ],
        )
        .unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "1 2 3 #SUP: 4\n9 #SUP: 1\n");
    }

    #[test]
    fn code_table_is_written_in_cover_order() {
        let db: TransactionDatabase = vec![
            Itemset::new(vec![1, 2]),
            Itemset::new(vec![1, 2]),
            Itemset::new(vec![1, 3]),
        ]
        .into_iter()
        .collect();
        let table = CodeTable::new(Arc::new(db), &[Itemset::new(vec![1, 2])]);

        let mut out = Vec::new();
        write_code_table(&mut out, &table).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(
            text,
            "1 2 #SUP: 2 #USG: 2\n1 #SUP: 3 #USG: 1\n2 #SUP: 2 #USG: 0\n3 #SUP: 1 #USG: 1\n"
        );

        let codes = read_itemsets(text.as_bytes()).unwrap();
        assert_eq!(codes.len(), table.len());
        assert_eq!(codes[0].support(), 2);
    }
}
