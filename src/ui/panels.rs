use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;
use serde_json::Value;

use topic_trends::chart::{snapshot_chart_spec, trend_chart_spec};
use topic_trends::data::model::WeekKey;

use crate::state::DashboardState;

// ---------------------------------------------------------------------------
// Left side panel – selection widgets
// ---------------------------------------------------------------------------

/// Render the left selection panel.
pub fn side_panel(ui: &mut Ui, state: &mut DashboardState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            trend_controls(ui, state);
            ui.add_space(8.0);
            week_controls(ui, state);
        });
}

fn trend_controls(ui: &mut Ui, state: &mut DashboardState) {
    ui.heading("Trends");
    ui.separator();

    let topics: Vec<String> = match &state.trends {
        Some(ds) => ds.topics.iter().cloned().collect(),
        None => {
            ui.label("No trend data loaded.");
            return;
        }
    };

    ui.horizontal(|ui: &mut Ui| {
        ui.strong(format!(
            "Topics  ({}/{})",
            state.selection.topics.len(),
            topics.len()
        ));
        if ui.small_button("All").clicked() {
            state.select_all_topics();
        }
        if ui.small_button("None").clicked() {
            state.select_no_topics();
        }
    });

    for topic in &topics {
        let mut checked = state.selection.topics.contains(topic);
        let text = RichText::new(topic).color(state.color_map.color_for(topic));
        if ui.checkbox(&mut checked, text).changed() {
            state.toggle_topic(topic);
        }
    }

    ui.separator();

    let mut min = state.selection.min_distribution;
    if ui
        .add(egui::Slider::new(&mut min, 0.0..=1.0).text("min distribution"))
        .changed()
    {
        state.selection.min_distribution = min;
        state.refilter();
    }

    if state.trends.as_ref().is_some_and(|ds| ds.is_empty()) {
        return;
    }

    let mut start = state.selection.start;
    let mut end = state.selection.end;
    ui.horizontal(|ui: &mut Ui| {
        ui.label("From");
        ui.add(DatePickerButton::new(&mut start).id_salt("interval_start"));
    });
    ui.horizontal(|ui: &mut Ui| {
        ui.label("To");
        ui.add(DatePickerButton::new(&mut end).id_salt("interval_end"));
    });
    if start != state.selection.start || end != state.selection.end {
        state.selection.start = start;
        state.selection.end = end;
        state.refilter();
    }
}

fn week_controls(ui: &mut Ui, state: &mut DashboardState) {
    ui.heading("Weekly breakdown");
    ui.separator();

    if state.weeks.is_empty() {
        ui.label("No weekly data loaded.");
        return;
    }
    if state.snapshots_derived {
        ui.label(RichText::new("derived from the trend file").weak());
    }

    let mut index = state.week_index;
    let last = state.weeks.len() - 1;
    if ui
        .add(egui::Slider::new(&mut index, 0..=last).show_value(false).text("week"))
        .changed()
    {
        state.set_week(index);
    }
    if let Some(week) = state.selected_week() {
        ui.label(RichText::new(week_label(week)).strong());
    }

    let mut threshold = state.display_threshold;
    if ui
        .add(egui::Slider::new(&mut threshold, 0.0..=0.5).text("min share"))
        .changed()
    {
        state.set_display_threshold(threshold);
    }
}

/// `03 May, 2021` for date keys, the raw key otherwise.
pub fn week_label(week: &WeekKey) -> String {
    match week.date() {
        Some(date) => date.format("%d %B, %Y").to_string(),
        None => week.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut DashboardState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open trends…").clicked() {
                if let Some(path) = pick_csv("Open trend data") {
                    state.open_trends(&path);
                }
                ui.close_menu();
            }
            if ui.button("Open weekly table…").clicked() {
                if let Some(path) = pick_csv("Open weekly table") {
                    state.open_snapshots(&path);
                }
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Export trend chart…").clicked() {
                let highlight = state
                    .selection
                    .topics
                    .contains(&state.highlight)
                    .then_some(state.highlight.as_str());
                let spec = trend_chart_spec(&state.visible, highlight);
                export_spec(state, &spec, "trends.vl.json");
                ui.close_menu();
            }
            if ui.button("Export weekly chart…").clicked() {
                let spec = snapshot_chart_spec(&state.slices);
                export_spec(state, &spec, "week.vl.json");
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.trends {
            ui.label(format!(
                "{} records loaded, {} shown",
                ds.len(),
                state.visible.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

fn pick_csv(title: &str) -> Option<std::path::PathBuf> {
    rfd::FileDialog::new()
        .set_title(title)
        .add_filter("CSV", &["csv"])
        .pick_file()
}

fn export_spec(state: &mut DashboardState, spec: &Value, file_name: &str) {
    let Some(path) = rfd::FileDialog::new()
        .set_title("Export Vega-Lite chart")
        .add_filter("JSON", &["json"])
        .set_file_name(file_name)
        .save_file()
    else {
        return;
    };

    match write_spec(&path, spec) {
        Ok(()) => log::info!("Exported chart to {}", path.display()),
        Err(e) => {
            log::error!("Failed to export chart: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

fn write_spec(path: &Path, spec: &Value) -> Result<()> {
    let text = serde_json::to_string_pretty(spec).context("serializing chart")?;
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn week_label_formats_dates() {
        assert_eq!(week_label(&WeekKey::parse("2021-05-03")), "03 May, 2021");
        assert_eq!(week_label(&WeekKey::parse("w17")), "w17");
    }

    #[test]
    fn write_spec_creates_pretty_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.json");
        write_spec(&path, &snapshot_chart_spec(&[])).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let back: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(back["mark"]["type"], "arc");
        assert!(text.contains('\n'));
    }
}
