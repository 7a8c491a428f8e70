use eframe::egui::{self, RichText};

use super::super::PlaytoApp;

pub fn render_leaderboard(app: &PlaytoApp, ui: &mut egui::Ui) {
    ui.heading("Top 5 (24h Karma)");
    if app.leaderboard.is_empty() {
        ui.weak("No karma yet.");
        return;
    }
    for (index, entry) in app.leaderboard.iter().enumerate() {
        ui.horizontal(|ui| {
            ui.label(format!("{}. {}", index + 1, entry.username));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(RichText::new(format!("{} karma", entry.karma)).strong());
            });
        });
    }
}
