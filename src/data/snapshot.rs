use super::model::{PieSlice, SnapshotTable, WeekKey};

/// Default cut-off for the weekly breakdown.
pub const DEFAULT_DISPLAY_THRESHOLD: f64 = 0.05;

/// Slices of the pie chart for one week.
///
/// Uses the first row keyed `week` and emits every topic whose weight is at
/// least `min_display_threshold`, in column order.  Lighter topics are left
/// out to keep the chart readable, so the returned values need not sum to
/// 1.0.  An unknown week yields no slices.
pub fn extract_snapshot(
    table: &SnapshotTable,
    week: &WeekKey,
    min_display_threshold: f64,
) -> Vec<PieSlice> {
    let Some(row) = table.find(week) else {
        log::warn!("no weekly row for {week}");
        return Vec::new();
    };

    table
        .weights(row)
        .filter(|(_, value)| *value >= min_display_threshold)
        .map(|(topic, value)| PieSlice {
            category: topic.to_string(),
            value,
        })
        .collect()
}
