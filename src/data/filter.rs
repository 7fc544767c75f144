use std::collections::BTreeSet;

use chrono::{Local, NaiveDate};

use super::model::{TrendDataset, TrendRecord};

// ---------------------------------------------------------------------------
// Individual predicates
// ---------------------------------------------------------------------------

/// The record's topic is one of the selected ones.
pub fn topic_selected(record: &TrendRecord, selected: &BTreeSet<String>) -> bool {
    selected.contains(&record.topic)
}

/// The record's weight is at least `min_distribution`.
pub fn meets_min_distribution(record: &TrendRecord, min_distribution: f64) -> bool {
    record.distribution >= min_distribution
}

/// The record falls inside `[start, end]`, both bounds inclusive.
pub fn within_dates(record: &TrendRecord, start: NaiveDate, end: NaiveDate) -> bool {
    start <= record.date && record.date <= end
}

// ---------------------------------------------------------------------------
// Combined filter
// ---------------------------------------------------------------------------

/// Keep the records that pass every criterion, preserving input order.
///
/// * empty `selected_topics` → empty result
/// * `start > end` → empty result
pub fn filter_trends(
    records: &[TrendRecord],
    selected_topics: &BTreeSet<String>,
    min_distribution: f64,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<TrendRecord> {
    let kept: Vec<TrendRecord> = records
        .iter()
        .filter(|r| topic_selected(r, selected_topics))
        .filter(|r| meets_min_distribution(r, min_distribution))
        .filter(|r| within_dates(r, start, end))
        .cloned()
        .collect();
    log::debug!(
        "filter: {} of {} records kept ({} topics, min {min_distribution}, {start}..={end})",
        kept.len(),
        records.len(),
        selected_topics.len()
    );
    kept
}

// ---------------------------------------------------------------------------
// Selection state for the trend view
// ---------------------------------------------------------------------------

/// What the user picked for the trend chart.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendSelection {
    pub topics: BTreeSet<String>,
    pub min_distribution: f64,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TrendSelection {
    /// Default trend-view threshold.
    pub const DEFAULT_MIN_DISTRIBUTION: f64 = 0.0;

    /// Everything in the dataset: all topics, full date range.
    ///
    /// An empty dataset gets a one-day interval on today's date so date
    /// widgets stay within a sensible calendar range.
    pub fn everything(dataset: &TrendDataset) -> Self {
        let today = Local::now().date_naive();
        let start = dataset.first_date().unwrap_or(today);
        let end = dataset.last_date().unwrap_or(today);
        Self {
            topics: dataset.topics.clone(),
            min_distribution: Self::DEFAULT_MIN_DISTRIBUTION,
            start,
            end,
        }
    }

    pub fn apply(&self, records: &[TrendRecord]) -> Vec<TrendRecord> {
        filter_trends(
            records,
            &self.topics,
            self.min_distribution,
            self.start,
            self.end,
        )
    }

    pub fn toggle_topic(&mut self, topic: &str) {
        if !self.topics.remove(topic) {
            self.topics.insert(topic.to_string());
        }
    }
}
