use eframe::egui::{self, Context, RichText};

use super::super::{format_timestamp, PlaytoApp};

/// Profile drawer: stats grid plus bounded recent activity. The payload is a
/// full snapshot fetched on open and discarded on close.
pub fn render_profile_drawer(app: &mut PlaytoApp, ctx: &Context) {
    let Some(profile) = app.profile.clone() else {
        return;
    };

    let mut is_open = true;
    egui::Window::new(format!("Profile: {}", profile.username))
        .id(egui::Id::new("profile-drawer"))
        .open(&mut is_open)
        .default_width(360.0)
        .show(ctx, |ui| {
            egui::Grid::new("profile-stats")
                .num_columns(2)
                .spacing(egui::vec2(24.0, 4.0))
                .show(ui, |ui| {
                    ui.weak("Posts");
                    ui.label(RichText::new(profile.stats.posts.to_string()).strong());
                    ui.end_row();
                    ui.weak("Comments");
                    ui.label(RichText::new(profile.stats.comments.to_string()).strong());
                    ui.end_row();
                    ui.weak("Post Likes");
                    ui.label(RichText::new(profile.stats.post_likes.to_string()).strong());
                    ui.end_row();
                    ui.weak("Comment Likes");
                    ui.label(RichText::new(profile.stats.comment_likes.to_string()).strong());
                    ui.end_row();
                    ui.weak("Karma (24h)");
                    ui.label(RichText::new(profile.stats.karma_last_24h.to_string()).strong());
                    ui.end_row();
                });

            ui.separator();
            ui.label(RichText::new("Recent Posts").strong());
            if profile.recent_posts.is_empty() {
                ui.weak("No posts yet.");
            }
            for post in &profile.recent_posts {
                egui::Frame::group(ui.style()).show(ui, |ui| {
                    ui.weak(format_timestamp(&post.created_at));
                    ui.label(&post.content);
                });
            }

            ui.separator();
            ui.label(RichText::new("Recent Comments").strong());
            if profile.recent_comments.is_empty() {
                ui.weak("No comments yet.");
            }
            for comment in &profile.recent_comments {
                egui::Frame::group(ui.style()).show(ui, |ui| {
                    ui.weak(format_timestamp(&comment.created_at));
                    ui.label(&comment.content);
                    ui.weak(format!("Post #{}", comment.post_id));
                });
            }
        });

    if !is_open {
        app.profile = None;
    }
}
