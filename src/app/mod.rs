use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use eframe::egui::{self, Context};

use crate::api::ApiClient;
use crate::models::{LeaderboardEntry, Notification, Post, SortMode};
use crate::moderation;
use crate::session::{self, ActiveUser};

mod messages;
pub mod pagination;
pub mod state;
mod tasks;
mod ui;

use messages::AppMessage;
use pagination::Pagination;
use state::{AuthState, PostFilter, ReplyState};

use crate::models::{Comment, Profile};

pub const POSTS_PAGE_SIZE: usize = 6;
pub const COMMENTS_PAGE_SIZE: usize = 5;
const NOTIFICATIONS_LIMIT: usize = 20;

const FILTER_DEBOUNCE: Duration = Duration::from_millis(300);
const NOTIFICATION_POLL_INTERVAL: Duration = Duration::from_secs(30);
const ADVISORY_DURATION: Duration = Duration::from_secs(3);

pub struct PlaytoApp {
    api: ApiClient,
    tx: Sender<AppMessage>,
    rx: Receiver<AppMessage>,

    base_url_input: String,

    session: Option<ActiveUser>,
    auth: AuthState,

    posts: Pagination<Post>,
    search_input: String,
    sort_mode: SortMode,
    /// Filter the feed was last (re)loaded under.
    active_filter: PostFilter,
    /// Set on every search/sort edit; the reset fires once input settles.
    filter_dirty_at: Option<Instant>,

    selected_post: Option<Post>,
    comments: Pagination<Comment>,
    reply: ReplyState,
    new_post_draft: String,
    new_comment_draft: String,
    creating_post: bool,
    adding_comment: bool,
    scroll_discussion_to_top: bool,

    leaderboard: Vec<LeaderboardEntry>,

    notifications: Vec<Notification>,
    show_notifications: bool,
    last_notification_poll: Option<Instant>,

    profile: Option<Profile>,

    /// Single user-visible error slot, overwritten by the next outcome.
    error: Option<String>,
    abuse_warning: Option<String>,
    abuse_warning_deadline: Option<Instant>,
}

impl PlaytoApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> anyhow::Result<Self> {
        let default_url = std::env::var("PLAYTO_API_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8000/api".to_string());
        let api = ApiClient::new(default_url.clone())?;
        let (tx, rx) = mpsc::channel();

        let mut app = Self {
            api,
            tx,
            rx,
            base_url_input: default_url,
            session: session::load(),
            auth: AuthState::default(),
            posts: Pagination::new(POSTS_PAGE_SIZE),
            search_input: String::new(),
            sort_mode: SortMode::New,
            active_filter: PostFilter::default(),
            filter_dirty_at: None,
            selected_post: None,
            comments: Pagination::new(COMMENTS_PAGE_SIZE),
            reply: ReplyState::default(),
            new_post_draft: String::new(),
            new_comment_draft: String::new(),
            creating_post: false,
            adding_comment: false,
            scroll_discussion_to_top: false,
            leaderboard: Vec::new(),
            notifications: Vec::new(),
            show_notifications: false,
            last_notification_poll: None,
            profile: None,
            error: None,
            abuse_warning: None,
            abuse_warning_deadline: None,
        };
        app.spawn_load_leaderboard();
        app.spawn_reset_posts();
        if app.session.is_some() {
            app.start_notifications();
        }
        Ok(app)
    }

    // ----- feed pagination -----

    fn spawn_reset_posts(&mut self) {
        self.active_filter = PostFilter::new(&self.search_input, self.sort_mode);
        let request = self.posts.begin_reset();
        tasks::load_posts_page(
            self.api.clone(),
            self.tx.clone(),
            request,
            self.active_filter.clone(),
        );
    }

    fn spawn_load_more_posts(&mut self) {
        if let Some(request) = self.posts.begin_load_more() {
            tasks::load_posts_page(
                self.api.clone(),
                self.tx.clone(),
                request,
                self.active_filter.clone(),
            );
        }
    }

    fn note_filter_edited(&mut self) {
        self.filter_dirty_at = Some(Instant::now());
    }

    // ----- selection and comments -----

    /// Navigation primitive: every "view post" affordance funnels through
    /// here (post card, notification link).
    pub(crate) fn open_post(&mut self, post_id: i64) {
        self.show_notifications = false;
        self.error = None;
        tasks::load_post_detail(self.api.clone(), self.tx.clone(), post_id, true);
    }

    fn select_post(&mut self, post: Post) {
        self.selected_post = Some(post);
        self.reply.close();
        self.new_comment_draft.clear();
        self.scroll_discussion_to_top = true;
        self.spawn_reset_comments();
    }

    fn spawn_refresh_post_detail(&mut self, post_id: i64) {
        tasks::load_post_detail(self.api.clone(), self.tx.clone(), post_id, false);
    }

    fn spawn_reset_comments(&mut self) {
        let Some(post_id) = self.selected_post.as_ref().map(|p| p.id) else {
            return;
        };
        let request = self.comments.begin_reset();
        tasks::load_comments_page(self.api.clone(), self.tx.clone(), request, post_id);
    }

    fn spawn_load_more_comments(&mut self) {
        let Some(post_id) = self.selected_post.as_ref().map(|p| p.id) else {
            return;
        };
        if let Some(request) = self.comments.begin_load_more() {
            tasks::load_comments_page(self.api.clone(), self.tx.clone(), request, post_id);
        }
    }

    // ----- profiles -----

    /// Navigation primitive: author names, notification actors, and resolved
    /// mentions all land here.
    pub(crate) fn open_profile(&mut self, user_id: i64) {
        tasks::load_profile(self.api.clone(), self.tx.clone(), user_id);
    }

    pub(crate) fn open_profile_by_username(&mut self, username: String) {
        tasks::load_profile_by_username(self.api.clone(), self.tx.clone(), username);
    }

    // ----- moderation -----

    fn trigger_abuse_warning(&mut self, found: &[String]) {
        if found.is_empty() {
            return;
        }
        self.abuse_warning = Some(moderation::advisory_message(found));
        // A fresh advisory restarts the clock on any pending clear.
        self.abuse_warning_deadline = Some(Instant::now() + ADVISORY_DURATION);
    }

    /// Runs the sanitizer over an edited draft, surfacing the advisory when
    /// anything was stripped.
    fn moderate(&mut self, value: String) -> String {
        let result = moderation::sanitize(&value);
        if result.found.is_empty() {
            value
        } else {
            self.trigger_abuse_warning(&result.found);
            result.cleaned
        }
    }

    fn moderate_new_post_draft(&mut self) {
        let value = std::mem::take(&mut self.new_post_draft);
        self.new_post_draft = self.moderate(value);
    }

    fn moderate_new_comment_draft(&mut self) {
        let value = std::mem::take(&mut self.new_comment_draft);
        self.new_comment_draft = self.moderate(value);
    }

    fn moderate_reply_draft(&mut self) {
        let value = std::mem::take(&mut self.reply.draft);
        self.reply.draft = self.moderate(value);
    }

    // ----- auth -----

    fn submit_auth(&mut self) {
        if self.auth.submitting {
            return;
        }
        if self.auth.mode == state::AuthMode::Signup && self.auth.password != self.auth.confirm {
            self.error = Some("Passwords do not match.".to_string());
            return;
        }
        self.error = None;
        self.auth.submitting = true;
        tasks::authenticate(
            self.api.clone(),
            self.tx.clone(),
            self.auth.mode,
            self.auth.username.clone(),
            self.auth.password.clone(),
        );
    }

    /// Runs after a login or signup succeeds.
    fn on_identity_present(&mut self) {
        self.spawn_load_leaderboard();
        self.spawn_reset_posts();
        self.start_notifications();
    }

    fn logout(&mut self) {
        session::clear();
        self.session = None;
        self.selected_post = None;
        self.comments.clear();
        self.reply.close();
        self.new_comment_draft.clear();
        self.notifications.clear();
        self.last_notification_poll = None;
        self.show_notifications = false;
        self.profile = None;
        self.error = None;
    }

    // ----- posting, commenting, liking -----

    fn submit_new_post(&mut self) {
        let Some(user) = self.session.clone() else {
            self.error = Some("Log in before posting.".to_string());
            return;
        };
        self.moderate_new_post_draft();
        if self.new_post_draft.trim().is_empty() {
            return;
        }
        self.error = None;
        self.creating_post = true;
        tasks::create_post(
            self.api.clone(),
            self.tx.clone(),
            user.id,
            self.new_post_draft.clone(),
        );
    }

    fn submit_top_level_comment(&mut self) {
        let (Some(user), Some(post)) = (self.session.clone(), self.selected_post.clone()) else {
            self.error = Some("Select a post and log in.".to_string());
            return;
        };
        self.moderate_new_comment_draft();
        if self.new_comment_draft.trim().is_empty() {
            return;
        }
        self.error = None;
        self.adding_comment = true;
        tasks::submit_comment(
            self.api.clone(),
            self.tx.clone(),
            tasks::CommentSubmission {
                post_id: post.id,
                author_id: user.id,
                content: self.new_comment_draft.clone(),
                parent_id: None,
                filter: self.active_filter.clone(),
                comment_limit: COMMENTS_PAGE_SIZE,
                post_limit: POSTS_PAGE_SIZE,
            },
        );
    }

    fn open_reply(&mut self, comment_id: i64) {
        if self.session.is_none() {
            self.error = Some("Log in before replying.".to_string());
            return;
        }
        self.reply.open(comment_id);
    }

    fn submit_reply(&mut self) {
        let Some(target_id) = self.reply.target_id else {
            return;
        };
        if self.reply.submitting {
            return;
        }
        self.moderate_reply_draft();
        let ready = match state::reply_guard(
            self.session.as_ref(),
            self.selected_post.as_ref().map(|p| p.id),
            &self.reply.draft,
        ) {
            Ok(ready) => ready,
            Err(message) => {
                self.error = Some(message.to_string());
                return;
            }
        };
        self.error = None;
        self.reply.submitting = true;
        tasks::submit_comment(
            self.api.clone(),
            self.tx.clone(),
            tasks::CommentSubmission {
                post_id: ready.post_id,
                author_id: ready.author_id,
                content: ready.content,
                parent_id: Some(target_id),
                filter: self.active_filter.clone(),
                comment_limit: COMMENTS_PAGE_SIZE,
                post_limit: POSTS_PAGE_SIZE,
            },
        );
    }

    fn like_post_action(&mut self, post_id: i64) {
        let user_id = match state::like_guard(self.session.as_ref()) {
            Ok(user) => user.id,
            Err(message) => {
                self.error = Some(message.to_string());
                return;
            }
        };
        self.error = None;
        tasks::like_post(self.api.clone(), self.tx.clone(), post_id, user_id);
    }

    fn like_comment_action(&mut self, comment_id: i64) {
        if self.selected_post.is_none() {
            return;
        }
        let user_id = match state::like_guard(self.session.as_ref()) {
            Ok(user) => user.id,
            Err(message) => {
                self.error = Some(message.to_string());
                return;
            }
        };
        self.error = None;
        tasks::like_comment(self.api.clone(), self.tx.clone(), comment_id, user_id);
    }

    // ----- leaderboard and notifications -----

    fn spawn_load_leaderboard(&mut self) {
        tasks::load_leaderboard(self.api.clone(), self.tx.clone());
    }

    fn start_notifications(&mut self) {
        let Some(user_id) = self.session.as_ref().map(|u| u.id) else {
            return;
        };
        self.last_notification_poll = Some(Instant::now());
        tasks::load_notifications(
            self.api.clone(),
            self.tx.clone(),
            user_id,
            NOTIFICATIONS_LIMIT,
            false,
        );
    }

    fn toggle_notifications(&mut self) {
        self.show_notifications = !self.show_notifications;
        if !self.show_notifications {
            return;
        }
        // Opening the panel marks everything read, then re-fetches so the
        // flags reflect the server's view.
        if let Some(user_id) = self.session.as_ref().map(|u| u.id) {
            tasks::mark_read_and_refresh(
                self.api.clone(),
                self.tx.clone(),
                user_id,
                None,
                NOTIFICATIONS_LIMIT,
            );
        }
    }

    fn unread_count(&self) -> usize {
        state::unread_count(&self.notifications)
    }

    // ----- timers -----

    fn tick(&mut self) {
        let now = Instant::now();

        if state::debounce_fired(self.filter_dirty_at, now, FILTER_DEBOUNCE) {
            self.filter_dirty_at = None;
            self.spawn_reset_posts();
        }

        if let Some(deadline) = self.abuse_warning_deadline {
            if now >= deadline {
                self.abuse_warning = None;
                self.abuse_warning_deadline = None;
            }
        }

        if let Some(user_id) = self.session.as_ref().map(|u| u.id) {
            let due = self
                .last_notification_poll
                .map_or(true, |last| now.duration_since(last) >= NOTIFICATION_POLL_INTERVAL);
            if due {
                self.last_notification_poll = Some(now);
                tasks::load_notifications(
                    self.api.clone(),
                    self.tx.clone(),
                    user_id,
                    NOTIFICATIONS_LIMIT,
                    true,
                );
            }
        }
    }

    fn render_header(&mut self, ctx: &Context) {
        let username = self
            .session
            .as_ref()
            .map(|u| u.username.clone())
            .unwrap_or_default();
        let user_id = self.session.as_ref().map(|u| u.id);
        let unread = self.unread_count();

        let mut toggle_notifications = false;
        let mut open_own_profile = false;
        let mut do_logout = false;

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Playto Community Feed");
                ui.separator();
                ui.label("Active user:");
                if ui.link(&username).clicked() {
                    open_own_profile = true;
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Logout").clicked() {
                        do_logout = true;
                    }
                    if ui.button("My Profile").clicked() {
                        open_own_profile = true;
                    }
                    let notifications_label = if unread > 0 {
                        format!("Notifications ({unread})")
                    } else {
                        "Notifications".to_string()
                    };
                    if ui
                        .selectable_label(self.show_notifications, notifications_label)
                        .clicked()
                    {
                        toggle_notifications = true;
                    }
                });
            });
            if let Some(warning) = &self.abuse_warning {
                ui.colored_label(egui::Color32::GOLD, warning);
            }
        });

        if toggle_notifications {
            self.toggle_notifications();
        }
        if open_own_profile {
            if let Some(id) = user_id {
                self.open_profile(id);
            }
        }
        if do_logout {
            self.logout();
        }
    }

    fn render_error_bar(&mut self, ctx: &Context) {
        if self.error.is_none() {
            return;
        }
        let mut dismiss = false;
        egui::TopBottomPanel::bottom("error_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(message) = &self.error {
                    ui.colored_label(egui::Color32::LIGHT_RED, message);
                }
                if ui.button("Dismiss").clicked() {
                    dismiss = true;
                }
            });
        });
        if dismiss {
            self.error = None;
        }
    }
}

impl eframe::App for PlaytoApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        messages::process_messages(self);
        self.tick();

        if self.session.is_none() {
            ui::auth::render_auth_screen(self, ctx);
        } else {
            self.render_header(ctx);
            self.render_error_bar(ctx);

            egui::SidePanel::right("discussion_panel")
                .resizable(true)
                .default_width(380.0)
                .show(ctx, |ui| {
                    ui::leaderboard::render_leaderboard(self, ui);
                    ui.separator();
                    ui::thread::render_discussion(self, ui);
                });

            egui::CentralPanel::default().show(ctx, |ui| {
                ui::feed::render_feed(self, ui);
            });

            ui::notifications::render_notifications_panel(self, ctx);
            ui::drawer::render_profile_drawer(self, ctx);
        }

        // Keep the loop ticking: fine-grained while a debounce or advisory
        // timer is pending, coarse otherwise so worker results and the
        // notification poll are still picked up without input events.
        if self.filter_dirty_at.is_some() || self.abuse_warning_deadline.is_some() {
            ctx.request_repaint_after(Duration::from_millis(100));
        } else {
            ctx.request_repaint_after(Duration::from_millis(500));
        }
    }
}

pub(crate) fn format_timestamp(ts: &str) -> String {
    DateTime::parse_from_rfc3339(ts)
        .map(|dt| {
            dt.with_timezone(&Utc)
                .format("%Y-%m-%d %H:%M UTC")
                .to_string()
        })
        .unwrap_or_else(|_| ts.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn timestamps_render_in_utc() {
        assert_eq!(
            format_timestamp("2024-05-01T10:30:00+02:00"),
            "2024-05-01 08:30 UTC"
        );
    }

    #[test]
    fn unparseable_timestamps_pass_through() {
        assert_eq!(format_timestamp("yesterday"), "yesterday");
    }
}
