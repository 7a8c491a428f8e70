use eframe::egui::{self, TextEdit};

use crate::models::Comment;

use super::super::state::ReplyState;
use super::super::{format_timestamp, PlaytoApp};
use super::richtext;

enum ThreadAction {
    Like(i64),
    OpenReply(i64),
    CancelReply,
    SubmitReply,
    ReplyDraftEdited,
    OpenProfile(i64),
    OpenMention(String),
    LoadMore,
}

/// Selected-post header, top-level comment composer, and the recursive
/// comment forest with its single reply editor.
pub fn render_discussion(app: &mut PlaytoApp, ui: &mut egui::Ui) {
    ui.heading("Threaded Discussion");
    let Some(post) = app.selected_post.clone() else {
        ui.weak("Select a post to view its comment thread.");
        return;
    };

    let mut actions: Vec<ThreadAction> = Vec::new();

    ui.horizontal(|ui| {
        if ui.link(&post.author.username).clicked() {
            actions.push(ThreadAction::OpenProfile(post.author.id));
        }
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.weak(format_timestamp(&post.created_at));
        });
    });
    if let Some(handle) = richtext::render_rich_text(ui, &post.content) {
        actions.push(ThreadAction::OpenMention(handle));
    }
    ui.weak(format!(
        "{} likes · {} comments",
        post.like_count, post.comment_count
    ));
    ui.add_space(6.0);

    let edited = ui
        .add(
            TextEdit::multiline(&mut app.new_comment_draft)
                .desired_rows(2)
                .desired_width(f32::INFINITY)
                .hint_text("Write a comment..."),
        )
        .changed();
    if edited {
        app.moderate_new_comment_draft();
    }
    if app.adding_comment {
        ui.spinner();
    } else if ui.button("Comment").clicked() {
        app.submit_top_level_comment();
    }
    ui.separator();

    let comments: Vec<Comment> = app.comments.items().to_vec();
    let is_loading = app.comments.is_loading();
    let has_more = app.comments.has_more();

    let mut scroll = egui::ScrollArea::vertical()
        .id_salt("discussion-comments")
        .auto_shrink([false; 2]);
    if app.scroll_discussion_to_top {
        app.scroll_discussion_to_top = false;
        scroll = scroll.vertical_scroll_offset(0.0);
    }

    let reply = &mut app.reply;
    scroll.show(ui, |ui| {
        if comments.is_empty() && !is_loading {
            ui.weak("No comments yet.");
        }
        for comment in &comments {
            render_comment_node(ui, comment, reply, &mut actions);
            ui.add_space(4.0);
        }
        let sentinel =
            ui.allocate_response(egui::vec2(ui.available_width(), 4.0), egui::Sense::hover());
        if has_more && ui.is_rect_visible(sentinel.rect) {
            actions.push(ThreadAction::LoadMore);
        }
        if is_loading {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.weak("Loading comments...");
            });
        } else if !has_more && !comments.is_empty() {
            ui.weak("No more comments.");
        }
    });

    for action in actions {
        match action {
            ThreadAction::Like(comment_id) => app.like_comment_action(comment_id),
            ThreadAction::OpenReply(comment_id) => app.open_reply(comment_id),
            ThreadAction::CancelReply => app.reply.close(),
            ThreadAction::SubmitReply => app.submit_reply(),
            ThreadAction::ReplyDraftEdited => app.moderate_reply_draft(),
            ThreadAction::OpenProfile(user_id) => app.open_profile(user_id),
            ThreadAction::OpenMention(handle) => app.open_profile_by_username(handle),
            ThreadAction::LoadMore => app.spawn_load_more_comments(),
        }
    }
}

fn render_comment_node(
    ui: &mut egui::Ui,
    comment: &Comment,
    reply: &mut ReplyState,
    actions: &mut Vec<ThreadAction>,
) {
    egui::Frame::group(ui.style())
        .fill(ui.visuals().extreme_bg_color)
        .inner_margin(egui::vec2(8.0, 6.0))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                if ui.link(&comment.author.username).clicked() {
                    actions.push(ThreadAction::OpenProfile(comment.author.id));
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.weak(format_timestamp(&comment.created_at));
                });
            });
            if let Some(handle) = richtext::render_rich_text(ui, &comment.content) {
                actions.push(ThreadAction::OpenMention(handle));
            }
            ui.horizontal(|ui| {
                ui.weak(format!("{} likes", comment.like_count));
                if ui.small_button("Like").clicked() {
                    actions.push(ThreadAction::Like(comment.id));
                }
                let is_open = reply.is_open_for(comment.id);
                let toggle_label = if is_open { "Close" } else { "Reply" };
                if ui.small_button(toggle_label).clicked() {
                    if is_open {
                        actions.push(ThreadAction::CancelReply);
                    } else {
                        actions.push(ThreadAction::OpenReply(comment.id));
                    }
                }
            });

            if reply.is_open_for(comment.id) {
                ui.weak(format!("Replying to @{}", comment.author.username));
                let edited = ui
                    .add(
                        TextEdit::multiline(&mut reply.draft)
                            .desired_rows(2)
                            .desired_width(f32::INFINITY)
                            .hint_text("Type here..."),
                    )
                    .changed();
                if edited {
                    actions.push(ThreadAction::ReplyDraftEdited);
                }
                ui.horizontal(|ui| {
                    if reply.submitting {
                        ui.spinner();
                        ui.weak("Posting...");
                    } else {
                        if ui.small_button("Reply").clicked() {
                            actions.push(ThreadAction::SubmitReply);
                        }
                        if ui.small_button("Cancel").clicked() {
                            actions.push(ThreadAction::CancelReply);
                        }
                    }
                });
            }

            if !comment.replies.is_empty() {
                ui.indent(("replies", comment.id), |ui| {
                    for child in &comment.replies {
                        render_comment_node(ui, child, reply, actions);
                        ui.add_space(4.0);
                    }
                });
            }
        });
}
