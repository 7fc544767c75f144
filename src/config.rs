use std::path::PathBuf;

use clap::Parser;

use topic_trends::data::filter::TrendSelection;
use topic_trends::data::snapshot::DEFAULT_DISPLAY_THRESHOLD;

/// Startup configuration of the viewer.
#[derive(Debug, Clone, Parser)]
#[command(name = "topic-trends", about = "Topic distribution over time")]
pub struct Args {
    /// Long-format CSV (`topic,date,distribution`).
    #[arg(long, default_value = "resources/data/data.csv")]
    pub trends: PathBuf,

    /// Wide-format CSV (`week,<topic>...`).  Derived from the trend file when absent.
    #[arg(long, default_value = "resources/data/raw_data.csv")]
    pub weekly: PathBuf,

    /// Topic preselected and highlighted in the trend chart.
    #[arg(long, default_value = "Vacunación")]
    pub highlight: String,

    /// Initial minimum weight for the trend chart.
    #[arg(long, default_value_t = TrendSelection::DEFAULT_MIN_DISTRIBUTION)]
    pub min_distribution: f64,

    /// Initial minimum weight for a topic to get a pie slice.
    #[arg(long, default_value_t = DEFAULT_DISPLAY_THRESHOLD)]
    pub display_threshold: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_resources_dir() {
        let args = Args::parse_from(["topic-trends"]);
        assert_eq!(args.trends, PathBuf::from("resources/data/data.csv"));
        assert_eq!(args.weekly, PathBuf::from("resources/data/raw_data.csv"));
        assert_eq!(args.highlight, "Vacunación");
        assert_eq!(args.min_distribution, 0.0);
        assert_eq!(args.display_threshold, 0.05);
    }

    #[test]
    fn overrides_parse() {
        let args = Args::parse_from([
            "topic-trends",
            "--trends",
            "a.csv",
            "--display-threshold",
            "0.1",
            "--highlight",
            "pemex",
        ]);
        assert_eq!(args.trends, PathBuf::from("a.csv"));
        assert_eq!(args.display_threshold, 0.1);
        assert_eq!(args.highlight, "pemex");
    }
}
