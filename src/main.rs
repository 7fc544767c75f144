mod app;
mod color;
mod config;
mod state;
mod ui;

use app::TopicTrendsApp;
use clap::Parser;
use eframe::egui;
use state::DashboardState;

fn main() -> eframe::Result {
    env_logger::init();
    let args = config::Args::parse();

    let mut state = DashboardState::new(
        args.highlight.clone(),
        args.min_distribution,
        args.display_threshold,
    );

    // Weekly table first so the trend load does not replace it with a pivot.
    if args.weekly.exists() {
        state.open_snapshots(&args.weekly);
    } else {
        log::info!(
            "{} not found, weekly view will use the trend file",
            args.weekly.display()
        );
    }
    if args.trends.exists() {
        state.open_trends(&args.trends);
    } else {
        log::warn!(
            "{} not found, open a trend file from the File menu",
            args.trends.display()
        );
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Topic Trends",
        options,
        Box::new(move |_cc| Ok(Box::new(TopicTrendsApp::new(state)))),
    )
}
