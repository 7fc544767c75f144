use std::collections::BTreeMap;
use std::f32::consts::{FRAC_PI_2, TAU};

use chrono::{Datelike, NaiveDate};
use eframe::egui::{self, Align2, Pos2, RichText, Sense, Shape, Stroke, Ui, Vec2};
use egui_plot::{Legend, Line, Plot, PlotPoint, PlotPoints, Points, Text};

use crate::state::DashboardState;

// ---------------------------------------------------------------------------
// Trend line plot
// ---------------------------------------------------------------------------

/// One line per visible topic, x = days since the common era.
pub fn trend_plot(ui: &mut Ui, state: &DashboardState, height: f32) {
    if state.trends.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a trend file to view topics  (File → Open trends…)");
        });
        return;
    }

    let mut series: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
    for r in &state.visible {
        series
            .entry(r.topic.as_str())
            .or_default()
            .push([day_number(r.date), r.distribution]);
    }

    Plot::new("trend_plot")
        .height(height)
        .legend(Legend::default())
        .x_axis_label("Week")
        .y_axis_label("Distribution")
        .x_axis_formatter(|mark, _range| format_day(mark.value))
        .label_formatter(|name, point: &PlotPoint| {
            format!("{name}\n{}\n{:.3}", format_day(point.x), point.y)
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (topic, mut points) in series {
                points.sort_by(|a, b| a[0].total_cmp(&b[0]));
                let color = state.color_map.color_for(topic);
                let width = if topic == state.highlight { 3.0 } else { 1.5 };

                // End-of-line marker labelled with the topic.
                if let Some(&[x, y]) = points.last() {
                    plot_ui.points(Points::new(vec![[x, y]]).radius(3.5).color(color));
                    plot_ui.text(
                        Text::new(PlotPoint::new(x, y), format!("  {topic}"))
                            .color(color)
                            .anchor(Align2::LEFT_CENTER),
                    );
                }

                let line = Line::new(PlotPoints::from(points))
                    .name(topic)
                    .color(color)
                    .width(width);
                plot_ui.line(line);
            }
        });
}

fn day_number(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

fn format_day(value: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(value.round() as i32)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Weekly pie chart
// ---------------------------------------------------------------------------

/// Pie of the selected week.  Shares are relative to the shown slices.
pub fn pie_chart(ui: &mut Ui, state: &DashboardState) {
    if state.slices.is_empty() {
        ui.label("No data for this week.");
        return;
    }

    let total: f64 = state.slices.iter().map(|s| s.value).sum();
    if total <= 0.0 {
        ui.label("No data for this week.");
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        let size = ui.available_height().clamp(120.0, 280.0);
        let (rect, response) = ui.allocate_exact_size(Vec2::splat(size), Sense::hover());
        let painter = ui.painter_at(rect);
        let center = rect.center();
        let radius = size * 0.45;
        let separator = Stroke::new(1.0, ui.visuals().panel_fill);

        let mut start = -FRAC_PI_2;
        let mut hovered = None;
        for (i, slice) in state.slices.iter().enumerate() {
            let sweep = (slice.value / total) as f32 * TAU;
            let color = state.color_map.color_for(&slice.category);
            paint_wedge(&painter, center, radius, start, sweep, color);
            painter.line_segment([center, polar(center, radius, start)], separator);

            if let Some(pos) = response.hover_pos() {
                if wedge_contains(center, radius, start, sweep, pos) {
                    hovered = Some(i);
                }
            }
            start += sweep;
        }

        ui.vertical(|ui: &mut Ui| {
            for slice in &state.slices {
                let share = slice.value / total * 100.0;
                let color = state.color_map.color_for(&slice.category);
                ui.label(
                    RichText::new(format!("■ {}  {share:.1}%", slice.category)).color(color),
                );
            }
        });

        if let Some(slice) = hovered.map(|i| &state.slices[i]) {
            response.on_hover_text(format!(
                "{}: {:.3} ({:.1}%)",
                slice.category,
                slice.value,
                slice.value / total * 100.0
            ));
        }
    });
}

fn polar(center: Pos2, radius: f32, angle: f32) -> Pos2 {
    center + Vec2::angled(angle) * radius
}

/// Fill a wedge as a fan of thin triangles, each trivially convex.
fn paint_wedge(
    painter: &egui::Painter,
    center: Pos2,
    radius: f32,
    start: f32,
    sweep: f32,
    color: egui::Color32,
) {
    let steps = ((sweep / TAU) * 96.0).ceil().max(1.0) as usize;
    let step = sweep / steps as f32;
    for k in 0..steps {
        let a0 = start + step * k as f32;
        let a1 = a0 + step;
        painter.add(Shape::convex_polygon(
            vec![center, polar(center, radius, a0), polar(center, radius, a1)],
            color,
            Stroke::NONE,
        ));
    }
}

fn wedge_contains(center: Pos2, radius: f32, start: f32, sweep: f32, pos: Pos2) -> bool {
    let d = pos - center;
    if d.length() > radius {
        return false;
    }
    let relative = (d.angle() - start).rem_euclid(TAU);
    relative <= sweep
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_numbers_round_trip_to_labels() {
        let date = NaiveDate::from_ymd_opt(2021, 5, 17).unwrap();
        assert_eq!(format_day(day_number(date)), "2021-05-17");
        assert_eq!(format_day(day_number(date) + 0.4), "2021-05-17");
    }

    #[test]
    fn wedge_hit_test() {
        let c = Pos2::new(0.0, 0.0);
        // Screen y grows downwards: angle 0 points right, FRAC_PI_2 points down.
        assert!(wedge_contains(c, 10.0, 0.0, FRAC_PI_2, Pos2::new(3.0, 3.0)));
        assert!(!wedge_contains(c, 10.0, 0.0, FRAC_PI_2, Pos2::new(-3.0, 3.0)));
        assert!(!wedge_contains(c, 10.0, 0.0, TAU, Pos2::new(30.0, 0.0)));
        assert!(wedge_contains(c, 10.0, -FRAC_PI_2, TAU, Pos2::new(-3.0, -3.0)));
    }
}
