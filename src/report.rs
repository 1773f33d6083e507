use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::{codetable::CodeTable, error::Result, types::Nats};

/// Standard size against compressed size of one database.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompressionReport {
    pub standard_size: Nats,
    pub compressed_size: Nats,
}

impl CompressionReport {
    /// Prices `table` against a fresh standard table of the database it is
    /// bound to.
    pub fn measure(table: &CodeTable) -> Result<Self> {
        let standard = CodeTable::standard(table.transactions().clone());

        Ok(Self {
            standard_size: standard.total_compressed_size()?,
            compressed_size: table.total_compressed_size()?,
        })
    }

    /// `compressed / standard`, in percent. 100 for an empty database.
    pub fn ratio(&self) -> f64 {
        if self.standard_size == 0.0 {
            return 100.0;
        }
        100.0 * self.compressed_size / self.standard_size
    }
}

impl Display for CompressionReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "L(D, ST) = {:.3}, L(D, CT) = {:.3}, ratio {:.2}%",
            self.standard_size,
            self.compressed_size,
            self.ratio()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{database::TransactionDatabase, itemset::Itemset};
    use std::sync::Arc;

    #[test]
    fn standard_table_has_full_ratio() {
        let db: TransactionDatabase = vec![Itemset::new(vec![1, 2]), Itemset::new(vec![2])]
            .into_iter()
            .collect();
        let report = CompressionReport::measure(&CodeTable::standard(Arc::new(db))).unwrap();

        assert_eq!(report.standard_size, report.compressed_size);
        assert!((report.ratio() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn ratio_and_display() {
        let report = CompressionReport {
            standard_size: 200.0,
            compressed_size: 50.0,
        };
        assert!((report.ratio() - 25.0).abs() < 1e-12);
        assert_eq!(
            report.to_string(),
            "L(D, ST) = 200.000, L(D, CT) = 50.000, ratio 25.00%"
        );

        let empty = CompressionReport {
            standard_size: 0.0,
            compressed_size: 0.0,
        };
        assert_eq!(empty.ratio(), 100.0);
    }
}
