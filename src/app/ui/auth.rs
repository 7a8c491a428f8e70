use eframe::egui::{self, Color32, Context, RichText, TextEdit};

use super::super::state::AuthMode;
use super::super::PlaytoApp;

/// Full-screen login/signup form shown while no identity is active.
pub fn render_auth_screen(app: &mut PlaytoApp, ctx: &Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(80.0);
            ui.heading("Playto Community Feed");
            ui.label(match app.auth.mode {
                AuthMode::Login => "Log in to continue.",
                AuthMode::Signup => "Create your account to join the discussion.",
            });
            ui.add_space(12.0);

            ui.horizontal(|ui| {
                let mut switched = None;
                if ui
                    .selectable_label(app.auth.mode == AuthMode::Login, "Login")
                    .clicked()
                {
                    switched = Some(AuthMode::Login);
                }
                if ui
                    .selectable_label(app.auth.mode == AuthMode::Signup, "Sign up")
                    .clicked()
                {
                    switched = Some(AuthMode::Signup);
                }
                if let Some(mode) = switched {
                    app.auth.mode = mode;
                    app.error = None;
                }
            });
            ui.add_space(8.0);

            ui.add(
                TextEdit::singleline(&mut app.auth.username)
                    .hint_text("Username")
                    .desired_width(240.0),
            );
            ui.add(
                TextEdit::singleline(&mut app.auth.password)
                    .hint_text("Password")
                    .password(true)
                    .desired_width(240.0),
            );
            if app.auth.mode == AuthMode::Signup {
                ui.add(
                    TextEdit::singleline(&mut app.auth.confirm)
                        .hint_text("Re-enter password")
                        .password(true)
                        .desired_width(240.0),
                );
            }
            ui.add_space(8.0);

            if app.auth.submitting {
                ui.spinner();
            } else {
                let label = match app.auth.mode {
                    AuthMode::Login => "Login",
                    AuthMode::Signup => "Create account",
                };
                if ui.button(label).clicked() {
                    app.submit_auth();
                }
            }

            if let Some(message) = &app.error {
                ui.add_space(8.0);
                ui.colored_label(Color32::LIGHT_RED, message);
            }

            ui.add_space(24.0);
            ui.label(RichText::new("API Base URL").small());
            api_url_editor(app, ui);
        });
    });
}

fn api_url_editor(app: &mut PlaytoApp, ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        ui.add_space(ui.available_width() / 2.0 - 160.0);
        ui.add(
            TextEdit::singleline(&mut app.base_url_input).desired_width(240.0),
        );
        if ui.button("Apply").clicked() {
            match app.api.set_base_url(app.base_url_input.clone()) {
                Ok(()) => {
                    app.error = None;
                    app.spawn_load_leaderboard();
                    app.spawn_reset_posts();
                }
                Err(err) => {
                    app.error = Some(format!("Failed to update URL: {err}"));
                }
            }
        }
    });
}
