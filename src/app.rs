use eframe::egui;

use crate::state::AppState;
use crate::ui::panels;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct PerfplotApp {
    pub state: AppState,
}

impl PerfplotApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for PerfplotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: source summary and statistics ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Central panel: the two plots ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::figure(ui, &self.state);
        });
    }
}
