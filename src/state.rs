use std::collections::BTreeSet;
use std::path::Path;

use topic_trends::data::filter::TrendSelection;
use topic_trends::data::loader;
use topic_trends::data::model::{PieSlice, SnapshotTable, TrendDataset, TrendRecord, WeekKey};
use topic_trends::data::snapshot::extract_snapshot;

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct DashboardState {
    /// Long-format data (None until a trend file is loaded).
    pub trends: Option<TrendDataset>,

    /// Wide-format data, either loaded or pivoted from `trends`.
    pub snapshots: Option<SnapshotTable>,

    /// Whether `snapshots` was pivoted from the trend file.
    pub snapshots_derived: bool,

    /// Trend chart selection.
    pub selection: TrendSelection,

    /// Records passing the current selection (cached).
    pub visible: Vec<TrendRecord>,

    /// Weeks the week slider steps through.
    pub weeks: Vec<WeekKey>,

    /// Position of the week slider.
    pub week_index: usize,

    /// Minimum weight for a pie slice.
    pub display_threshold: f64,

    /// Pie slices for the selected week (cached).
    pub slices: Vec<PieSlice>,

    /// Topic preselected and drawn emphasised.
    pub highlight: String,

    pub color_map: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl DashboardState {
    pub fn new(highlight: String, min_distribution: f64, display_threshold: f64) -> Self {
        let mut selection = TrendSelection::everything(&TrendDataset::default());
        selection.min_distribution = min_distribution;
        Self {
            trends: None,
            snapshots: None,
            snapshots_derived: false,
            selection,
            visible: Vec::new(),
            weeks: Vec::new(),
            week_index: 0,
            display_threshold,
            slices: Vec::new(),
            highlight,
            color_map: ColorMap::new(std::iter::empty()),
            status_message: None,
        }
    }

    /// Ingest a trend dataset: reset the interval, preselect the highlighted
    /// topic, and derive the weekly table if none was loaded.
    pub fn set_trends(&mut self, dataset: TrendDataset) {
        let min_distribution = self.selection.min_distribution;
        self.selection = TrendSelection::everything(&dataset);
        self.selection.min_distribution = min_distribution;
        self.selection.topics = default_topics(&dataset.topics, &self.highlight);

        if self.snapshots.is_none() || self.snapshots_derived {
            log::info!("No weekly table loaded, deriving it from the trend records");
            self.snapshots = Some(SnapshotTable::from_trends(&dataset.records));
            self.snapshots_derived = true;
        }

        self.trends = Some(dataset);
        self.status_message = None;
        self.recolor();
        self.rebuild_weeks();
        self.refilter();
    }

    pub fn set_snapshots(&mut self, table: SnapshotTable) {
        self.snapshots = Some(table);
        self.snapshots_derived = false;
        self.status_message = None;
        self.recolor();
        self.rebuild_weeks();
    }

    /// Load the long-format file, reporting failures in the status line.
    pub fn open_trends(&mut self, path: &Path) {
        match loader::load_trends(path) {
            Ok(records) => self.set_trends(TrendDataset::from_records(records)),
            Err(e) => {
                log::error!("Failed to load trends: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Load the wide-format file, reporting failures in the status line.
    pub fn open_snapshots(&mut self, path: &Path) {
        match loader::load_snapshots(path) {
            Ok(table) => self.set_snapshots(table),
            Err(e) => {
                log::error!("Failed to load weekly table: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Recompute `visible` after a selection change.
    pub fn refilter(&mut self) {
        self.visible = match &self.trends {
            Some(ds) => self.selection.apply(&ds.records),
            None => Vec::new(),
        };
    }

    /// Recompute `slices` after a week or threshold change.
    pub fn refresh_snapshot(&mut self) {
        self.slices = match (&self.snapshots, self.selected_week()) {
            (Some(table), Some(week)) => extract_snapshot(table, week, self.display_threshold),
            _ => Vec::new(),
        };
    }

    pub fn selected_week(&self) -> Option<&WeekKey> {
        self.weeks.get(self.week_index)
    }

    pub fn set_week(&mut self, index: usize) {
        self.week_index = index.min(self.weeks.len().saturating_sub(1));
        self.refresh_snapshot();
    }

    pub fn set_display_threshold(&mut self, threshold: f64) {
        self.display_threshold = threshold;
        self.refresh_snapshot();
    }

    pub fn toggle_topic(&mut self, topic: &str) {
        self.selection.toggle_topic(topic);
        self.refilter();
    }

    pub fn select_all_topics(&mut self) {
        if let Some(ds) = &self.trends {
            self.selection.topics = ds.topics.clone();
            self.refilter();
        }
    }

    pub fn select_no_topics(&mut self) {
        self.selection.topics.clear();
        self.refilter();
    }

    /// Slider domain: the trend dates when available, else the weekly rows.
    fn rebuild_weeks(&mut self) {
        self.weeks = match (&self.trends, &self.snapshots) {
            (Some(ds), _) => ds.dates.iter().copied().map(WeekKey::from).collect(),
            (None, Some(table)) => {
                let mut seen = BTreeSet::new();
                table
                    .rows()
                    .iter()
                    .filter(|row| seen.insert(row.week.clone()))
                    .map(|row| row.week.clone())
                    .collect()
            }
            (None, None) => Vec::new(),
        };
        self.set_week(0);
    }

    fn recolor(&mut self) {
        let trend_topics = self.trends.iter().flat_map(|ds| ds.topics.iter());
        let weekly_topics = self.snapshots.iter().flat_map(|t| t.topics().iter());
        self.color_map = ColorMap::new(trend_topics.chain(weekly_topics));
    }
}

fn default_topics(available: &BTreeSet<String>, highlight: &str) -> BTreeSet<String> {
    if available.contains(highlight) {
        return BTreeSet::from([highlight.to_string()]);
    }
    available.iter().take(1).cloned().collect()
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, NaiveDate};
    use topic_trends::data::loader::read_snapshots;

    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dataset() -> TrendDataset {
        TrendDataset::from_records(vec![
            TrendRecord::new("vaccine", day(2021, 1, 1), 0.6),
            TrendRecord::new("economy", day(2021, 1, 1), 0.4),
            TrendRecord::new("vaccine", day(2021, 1, 8), 0.3),
            TrendRecord::new("economy", day(2021, 1, 8), 0.7),
        ])
    }

    #[test]
    fn highlight_is_preselected() {
        let mut state = DashboardState::new("vaccine".into(), 0.0, 0.05);
        state.set_trends(dataset());
        assert_eq!(state.selection.topics, BTreeSet::from(["vaccine".to_string()]));
        assert_eq!(state.visible.len(), 2);
        assert!(state.visible.iter().all(|r| r.topic == "vaccine"));
    }

    #[test]
    fn unknown_highlight_falls_back_to_first_topic() {
        let mut state = DashboardState::new("Vacunación".into(), 0.0, 0.05);
        state.set_trends(dataset());
        assert_eq!(state.selection.topics, BTreeSet::from(["economy".to_string()]));
    }

    #[test]
    fn weekly_table_is_derived_until_loaded() {
        let mut state = DashboardState::new("vaccine".into(), 0.0, 0.05);
        state.set_trends(dataset());
        assert!(state.snapshots_derived);
        assert_eq!(state.weeks.len(), 2);
        assert_eq!(state.slices.len(), 2);

        let table = read_snapshots("week,pemex,covid\n2021-01-01,0.97,0.03\n".as_bytes()).unwrap();
        state.set_snapshots(table);
        assert!(!state.snapshots_derived);
        assert_eq!(
            state.slices,
            vec![PieSlice {
                category: "pemex".into(),
                value: 0.97,
            }]
        );

        // No weekly row for the second trend week.
        state.set_week(1);
        assert!(state.slices.is_empty());
    }

    #[test]
    fn threshold_and_topic_changes_refresh_caches() {
        let mut state = DashboardState::new("vaccine".into(), 0.0, 0.05);
        state.set_trends(dataset());

        state.set_display_threshold(0.5);
        assert_eq!(state.slices.len(), 1);

        state.select_all_topics();
        assert_eq!(state.visible.len(), 4);
        state.toggle_topic("vaccine");
        assert_eq!(state.visible.len(), 2);
        state.select_no_topics();
        assert!(state.visible.is_empty());
    }

    #[test]
    fn week_index_is_clamped() {
        let mut state = DashboardState::new("vaccine".into(), 0.0, 0.05);
        state.set_trends(dataset());
        state.set_week(99);
        assert_eq!(state.week_index, 1);
        assert_eq!(state.selected_week().map(WeekKey::as_str), Some("2021-01-08"));
    }

    #[test]
    fn failed_load_sets_status() {
        let mut state = DashboardState::new("vaccine".into(), 0.0, 0.05);
        state.open_trends(Path::new("no/such/file.csv"));
        assert!(state.trends.is_none());
        assert!(state.status_message.as_deref().unwrap_or("").starts_with("Error"));
    }

    #[test]
    fn header_only_trend_file_keeps_interval_near_today() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(&path, "topic,date,distribution\n").unwrap();

        let mut state = DashboardState::new("vaccine".into(), 0.0, 0.05);
        state.open_trends(&path);

        assert!(state.trends.as_ref().is_some_and(|ds| ds.is_empty()));
        assert_eq!(state.selection.start, state.selection.end);
        assert!(state.selection.start.year().abs() < 10_000);
        assert!(state.visible.is_empty());
        assert!(state.weeks.is_empty());
    }
}
