use eframe::egui;

use crate::state::DashboardState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct TopicTrendsApp {
    pub state: DashboardState,
}

impl TopicTrendsApp {
    pub fn new(state: DashboardState) -> Self {
        Self { state }
    }
}

impl eframe::App for TopicTrendsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: selection ----
        egui::SidePanel::left("selection_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: trend lines above, weekly pie below ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Topic trends");
            let plot_height = ui.available_height() * 0.55;
            plot::trend_plot(ui, &self.state, plot_height);

            ui.separator();
            ui.heading("Topic distribution per week");
            plot::pie_chart(ui, &self.state);
        });
    }
}
