use eframe::egui::{self, Context, RichText};

use super::super::{format_timestamp, PlaytoApp};

enum NotificationAction {
    OpenProfile(i64),
    OpenPost(i64),
    Close,
}

/// Anchored panel listing the latest notifications, newest first. Unread
/// items are emphasised until the next mark-read round trip clears them.
pub fn render_notifications_panel(app: &mut PlaytoApp, ctx: &Context) {
    if !app.show_notifications {
        return;
    }

    let notifications = app.notifications.clone();
    let mut actions: Vec<NotificationAction> = Vec::new();

    egui::Window::new("Notifications")
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-10.0, 40.0))
        .default_width(320.0)
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("Close").clicked() {
                        actions.push(NotificationAction::Close);
                    }
                });
            });
            if notifications.is_empty() {
                ui.weak("No notifications yet.");
                return;
            }
            egui::ScrollArea::vertical()
                .id_salt("notification-list")
                .max_height(360.0)
                .show(ui, |ui| {
                    for notification in &notifications {
                        egui::Frame::group(ui.style())
                            .fill(ui.visuals().extreme_bg_color)
                            .show(ui, |ui| {
                                ui.horizontal_wrapped(|ui| {
                                    if ui.link(&notification.actor.username).clicked() {
                                        actions.push(NotificationAction::OpenProfile(
                                            notification.actor.id,
                                        ));
                                    }
                                    let label = notification.verb.label();
                                    if notification.is_read {
                                        ui.weak(label);
                                    } else {
                                        ui.label(RichText::new(label).strong());
                                    }
                                });
                                ui.horizontal(|ui| {
                                    ui.weak(format_timestamp(&notification.created_at));
                                    if let Some(post_id) = notification.post_id {
                                        ui.with_layout(
                                            egui::Layout::right_to_left(egui::Align::Center),
                                            |ui| {
                                                if ui.link("View").clicked() {
                                                    actions.push(NotificationAction::OpenPost(
                                                        post_id,
                                                    ));
                                                }
                                            },
                                        );
                                    }
                                });
                            });
                        ui.add_space(4.0);
                    }
                });
        });

    for action in actions {
        match action {
            NotificationAction::OpenProfile(user_id) => app.open_profile(user_id),
            NotificationAction::OpenPost(post_id) => app.open_post(post_id),
            NotificationAction::Close => app.show_notifications = false,
        }
    }
}
