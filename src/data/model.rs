use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Canonical text form of every date-like key.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ---------------------------------------------------------------------------
// TrendRecord – one row of the long-format table
// ---------------------------------------------------------------------------

/// Weight of a single topic in a single week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendRecord {
    pub topic: String,
    pub date: NaiveDate,
    pub distribution: f64,
}

impl TrendRecord {
    pub fn new(topic: impl Into<String>, date: NaiveDate, distribution: f64) -> Self {
        Self {
            topic: topic.into(),
            date,
            distribution,
        }
    }
}

// ---------------------------------------------------------------------------
// TrendDataset – loaded records plus the indices the dashboard needs
// ---------------------------------------------------------------------------

/// Loaded trend records with pre-computed topic and date indices.
#[derive(Debug, Clone, Default)]
pub struct TrendDataset {
    /// All records, in file order.
    pub records: Vec<TrendRecord>,
    /// Distinct topic names, sorted.
    pub topics: BTreeSet<String>,
    /// Distinct dates, ascending.
    pub dates: Vec<NaiveDate>,
}

impl TrendDataset {
    pub fn from_records(records: Vec<TrendRecord>) -> Self {
        let topics: BTreeSet<String> = records.iter().map(|r| r.topic.clone()).collect();
        let dates: BTreeSet<NaiveDate> = records.iter().map(|r| r.date).collect();
        TrendDataset {
            records,
            topics,
            dates: dates.into_iter().collect(),
        }
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// WeekKey – normalized identifier of an aggregation period
// ---------------------------------------------------------------------------

/// Identifier of one week in the wide table.
///
/// Date-like text is rewritten to `YYYY-MM-DD` so that `2021-1-8`,
/// `2021/01/08` and `2021-01-08 00:00:00` all compare equal.  Anything else is
/// kept verbatim (trimmed).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct WeekKey(String);

impl WeekKey {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match parse_date_like(raw) {
            Some(date) => WeekKey::from(date),
            None => WeekKey(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The key as a calendar date, if it is one.
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.0, DATE_FORMAT).ok()
    }
}

impl From<NaiveDate> for WeekKey {
    fn from(date: NaiveDate) -> Self {
        WeekKey(date.format(DATE_FORMAT).to_string())
    }
}

impl From<&str> for WeekKey {
    fn from(raw: &str) -> Self {
        WeekKey::parse(raw)
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn parse_date_like(s: &str) -> Option<NaiveDate> {
    for layout in [DATE_FORMAT, "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, layout) {
            return Some(d);
        }
    }
    for layout in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, layout) {
            return Some(dt.date());
        }
    }
    None
}

// ---------------------------------------------------------------------------
// SnapshotTable – the wide-format table
// ---------------------------------------------------------------------------

/// One row of the wide table.  `values` is aligned with
/// [`SnapshotTable::topics`].
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotRow {
    pub week: WeekKey,
    pub values: Vec<f64>,
}

/// Wide table: one row per week, one column per topic.
///
/// The topic set is not fixed ahead of time, so columns are kept as an
/// ordered list of names with each row holding the aligned weights.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotTable {
    topics: Vec<String>,
    rows: Vec<SnapshotRow>,
}

impl SnapshotTable {
    pub(crate) fn new(topics: Vec<String>) -> Self {
        Self {
            topics,
            rows: Vec::new(),
        }
    }

    pub(crate) fn push_row(&mut self, week: WeekKey, values: Vec<f64>) {
        debug_assert_eq!(values.len(), self.topics.len());
        self.rows.push(SnapshotRow { week, values });
    }

    /// Pivot long-format records into the wide shape.
    ///
    /// Rows are ordered by date, topic columns by first appearance.  A topic
    /// absent from a given date gets weight 0.0.
    pub fn from_trends(records: &[TrendRecord]) -> Self {
        let mut topics: Vec<String> = Vec::new();
        for r in records {
            if !topics.contains(&r.topic) {
                topics.push(r.topic.clone());
            }
        }

        let mut by_date: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
        for r in records {
            let col = topics
                .iter()
                .position(|t| *t == r.topic)
                .unwrap_or_default();
            let row = by_date
                .entry(r.date)
                .or_insert_with(|| vec![0.0; topics.len()]);
            row[col] = r.distribution;
        }

        let mut table = SnapshotTable::new(topics);
        for (date, values) in by_date {
            table.push_row(WeekKey::from(date), values);
        }
        table
    }

    /// Topic column names, in file order.
    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    pub fn rows(&self) -> &[SnapshotRow] {
        &self.rows
    }

    /// First row whose key equals `week`.
    pub fn find(&self, week: &WeekKey) -> Option<&SnapshotRow> {
        self.rows.iter().find(|row| row.week == *week)
    }

    /// `(topic, weight)` pairs of a row in column order.
    pub fn weights<'a>(&'a self, row: &'a SnapshotRow) -> impl Iterator<Item = (&'a str, f64)> {
        self.topics
            .iter()
            .map(String::as_str)
            .zip(row.values.iter().copied())
    }

    /// Weight of `topic` in the first row keyed `week`.
    pub fn weight(&self, week: &WeekKey, topic: &str) -> Option<f64> {
        let col = self.topics.iter().position(|t| t == topic)?;
        self.find(week).map(|row| row.values[col])
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// PieSlice – one category of the weekly breakdown
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieSlice {
    pub category: String,
    pub value: f64,
}
