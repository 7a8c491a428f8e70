use eframe::egui::{self, TextEdit};

use crate::models::{Post, SortMode};

use super::super::{format_timestamp, PlaytoApp};
use super::richtext;

enum FeedAction {
    Select(i64),
    Like(i64),
    OpenProfile(i64),
    OpenMention(String),
    LoadMore,
}

/// Post composer, browse controls, and the incrementally loaded feed.
pub fn render_feed(app: &mut PlaytoApp, ui: &mut egui::Ui) {
    ui.heading("Create a post");
    let edited = ui
        .add(
            TextEdit::multiline(&mut app.new_post_draft)
                .desired_rows(3)
                .desired_width(f32::INFINITY)
                .hint_text("Share something with the community..."),
        )
        .changed();
    if edited {
        app.moderate_new_post_draft();
    }
    if app.creating_post {
        ui.spinner();
    } else if ui.button("Post").clicked() {
        app.submit_new_post();
    }

    ui.add_space(8.0);
    ui.separator();

    ui.heading("Browse");
    let mut refresh = false;
    ui.horizontal(|ui| {
        let search_edited = ui
            .add(
                TextEdit::singleline(&mut app.search_input)
                    .hint_text("Search posts or authors...")
                    .desired_width(220.0),
            )
            .changed();
        if search_edited {
            app.note_filter_edited();
        }

        let mut sort_edited = false;
        egui::ComboBox::from_id_salt("sort-mode")
            .selected_text(app.sort_mode.label())
            .show_ui(ui, |ui| {
                for mode in SortMode::ALL {
                    if ui
                        .selectable_value(&mut app.sort_mode, mode, mode.label())
                        .changed()
                    {
                        sort_edited = true;
                    }
                }
            });
        if sort_edited {
            app.note_filter_edited();
        }

        if ui.button("Refresh").clicked() {
            refresh = true;
        }
    });
    if refresh {
        app.spawn_reset_posts();
    }

    ui.add_space(8.0);

    let posts: Vec<Post> = app.posts.items().to_vec();
    let selected_id = app.selected_post.as_ref().map(|p| p.id);
    let is_loading = app.posts.is_loading();
    let has_more = app.posts.has_more();
    let mut actions: Vec<FeedAction> = Vec::new();

    egui::ScrollArea::vertical()
        .id_salt("post-feed")
        .auto_shrink([false; 2])
        .show(ui, |ui| {
            if posts.is_empty() && !is_loading {
                ui.weak("No posts yet.");
            }
            for post in &posts {
                render_post_card(ui, post, selected_id == Some(post.id), &mut actions);
                ui.add_space(6.0);
            }
            // Trailing sentinel: continuing is a no-op while a load is in
            // flight or the list is exhausted.
            let sentinel =
                ui.allocate_response(egui::vec2(ui.available_width(), 4.0), egui::Sense::hover());
            if has_more && ui.is_rect_visible(sentinel.rect) {
                actions.push(FeedAction::LoadMore);
            }
            if is_loading {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.weak("Loading more posts...");
                });
            } else if !has_more && !posts.is_empty() {
                ui.weak("You reached the end.");
            }
        });

    for action in actions {
        match action {
            FeedAction::Select(post_id) => app.open_post(post_id),
            FeedAction::Like(post_id) => app.like_post_action(post_id),
            FeedAction::OpenProfile(user_id) => app.open_profile(user_id),
            FeedAction::OpenMention(handle) => app.open_profile_by_username(handle),
            FeedAction::LoadMore => app.spawn_load_more_posts(),
        }
    }
}

fn render_post_card(
    ui: &mut egui::Ui,
    post: &Post,
    is_selected: bool,
    actions: &mut Vec<FeedAction>,
) {
    egui::Frame::group(ui.style())
        .fill(ui.visuals().extreme_bg_color)
        .inner_margin(egui::vec2(12.0, 8.0))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label("Posted by");
                if ui.link(&post.author.username).clicked() {
                    actions.push(FeedAction::OpenProfile(post.author.id));
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let view_label = if is_selected { "Viewing" } else { "View" };
                    if ui.selectable_label(is_selected, view_label).clicked() {
                        actions.push(FeedAction::Select(post.id));
                    }
                    ui.weak(format_timestamp(&post.created_at));
                });
            });
            if let Some(handle) = richtext::render_rich_text(ui, &post.content) {
                actions.push(FeedAction::OpenMention(handle));
            }
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.weak(format!(
                    "{} likes · {} comments",
                    post.like_count, post.comment_count
                ));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Like").clicked() {
                        actions.push(FeedAction::Like(post.id));
                    }
                });
            });
        });
}
