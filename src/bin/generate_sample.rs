use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use topic_trends::data::generator::{generate, DEMO_TOPICS};
use topic_trends::data::loader::{save_snapshots, save_trends};
use topic_trends::data::model::SnapshotTable;

/// Write random topic distributions in the dashboard's CSV shapes.
#[derive(Debug, Parser)]
#[command(name = "generate_sample")]
struct Args {
    /// Topic name (repeatable).  Defaults to a small demo set.
    #[arg(long = "topic")]
    topics: Vec<String>,

    /// Number of weeks.
    #[arg(long, default_value_t = 20)]
    weeks: usize,

    /// Date of the first week.
    #[arg(long, default_value = "2021-01-04")]
    start: NaiveDate,

    /// Seed for reproducible output; random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Long-format output (`topic,date,distribution`).
    #[arg(long, default_value = "data.csv")]
    out: PathBuf,

    /// Optional wide-format output (`week,<topic>...`).
    #[arg(long)]
    weekly_out: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let topics: Vec<String> = if args.topics.is_empty() {
        DEMO_TOPICS.iter().map(|t| t.to_string()).collect()
    } else {
        args.topics
    };

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let records = generate(&topics, args.weeks, args.start, &mut rng)
        .with_context(|| format!("generating {} weeks from {}", args.weeks, args.start))?;

    save_trends(&args.out, &records)
        .with_context(|| format!("writing {}", args.out.display()))?;

    if let Some(path) = &args.weekly_out {
        save_snapshots(path, &SnapshotTable::from_trends(&records))
            .with_context(|| format!("writing {}", path.display()))?;
    }

    let weeks_written = records.iter().map(|r| r.date).collect::<BTreeSet<_>>().len();
    println!(
        "Wrote {} weeks x {} topics to {}",
        weeks_written,
        topics.len(),
        args.out.display()
    );
    Ok(())
}
