//! krimp command line: learn a code table for a transaction file and report
//! how well it compresses.

use std::{
    io,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use krimp::{
    io::{read_database_file, read_itemsets_file, write_code_table_file},
    itemsets, CodeTable, CompressionReport, Krimp, KrimpConfig, MiningConfig, Rebind,
    TransactionDatabase,
};

#[derive(Parser)]
#[command(name = "krimp", version)]
#[command(about = "Select the itemsets that compress a transaction database best")]
struct Args {
    /// Transaction file, one transaction of item ids per line
    transactions: PathBuf,

    /// Candidate itemsets file; mined from the transactions when absent
    #[arg(short, long, conflicts_with_all = ["min_support", "max_len"])]
    candidates: Option<PathBuf>,

    /// Relative support threshold of mined candidates
    #[arg(long, default_value_t = 0.05)]
    min_support: f32,

    /// Maximum size of mined candidates
    #[arg(long, default_value_t = 4)]
    max_len: usize,

    /// Build the table from these codes instead of searching
    #[arg(long, conflicts_with_all = ["candidates", "prune", "limit"])]
    code_table: Option<PathBuf>,

    /// Try to remove codes that lost usage after each acceptance
    #[arg(long)]
    prune: bool,

    /// Consume at most this many candidates
    #[arg(long)]
    limit: Option<usize>,

    /// Second transaction file to compress with the learned table
    #[arg(long)]
    compare: Option<PathBuf>,

    /// Cover the compared file in the learned cover order
    #[arg(long, requires = "compare")]
    keep_cover_order: bool,

    /// Write the code table here
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Logging level
    #[arg(long, default_value = "info")]
    log_level: tracing::Level,
}

fn load(path: &Path) -> Result<Arc<TransactionDatabase>> {
    let transactions = read_database_file(path)
        .with_context(|| format!("failed to read transactions from {}", path.display()))?;

    info!(
        path = %path.display(),
        transactions = transactions.len(),
        items = transactions.vocabulary().count(),
        average_size = transactions.average_size(),
        density = transactions.density(),
        "loaded database"
    );
    Ok(Arc::new(transactions))
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(io::stderr)
        .init();

    let transactions = load(&args.transactions)?;

    let table = match &args.code_table {
        Some(path) => {
            let codes = read_itemsets_file(path)
                .with_context(|| format!("failed to read code table from {}", path.display()))?;
            let table = CodeTable::new(transactions, &codes);
            println!("{}", CompressionReport::measure(&table)?);
            table
        }
        None => {
            let candidates = match &args.candidates {
                Some(path) => read_itemsets_file(path).with_context(|| {
                    format!("failed to read candidates from {}", path.display())
                })?,
                None => {
                    let config = MiningConfig {
                        min_support: args.min_support,
                        max_len: args.max_len,
                    };
                    itemsets::mine(&transactions, &config)
                        .context("failed to generate candidates")?
                }
            };

            let config = KrimpConfig::default()
                .with_pruning(args.prune)
                .with_candidate_limit(args.limit);
            let outcome = Krimp::new(config).run(transactions, candidates)?;

            println!(
                "{} codes accepted, {} rejected, {} pruned",
                outcome.accepted, outcome.rejected, outcome.pruned
            );
            println!("{}", outcome.report());
            outcome.code_table
        }
    };

    if let Some(path) = &args.compare {
        let other = load(path)?;
        let mode = if args.keep_cover_order {
            Rebind::KeepCoverOrder
        } else {
            Rebind::Fresh
        };
        let rebound = table.rebound(other, mode);
        println!("{}: {}", path.display(), CompressionReport::measure(&rebound)?);
    }

    if let Some(path) = &args.output {
        write_code_table_file(path, &table)
            .with_context(|| format!("failed to write code table to {}", path.display()))?;
    }

    Ok(())
}
