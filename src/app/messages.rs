use log::debug;

use crate::models::{Comment, LeaderboardEntry, Notification, Page, Post, Profile, UserRef};
use crate::session::{self, ActiveUser};

use super::pagination::PageRequest;
use super::state::PostFilter;
use super::PlaytoApp;

/// Bundle produced by a successful comment submit: the post detail, the
/// rewound comment page, and the rewound post feed, all fetched before the
/// submit reports itself settled.
pub struct CommentRefresh {
    pub post: Post,
    pub comments: Page<Comment>,
    pub posts: Page<Post>,
    /// Feed filter the refresh was fetched under; dropped if the user has
    /// since changed it.
    pub filter: PostFilter,
}

pub enum AppMessage {
    PostsPageLoaded {
        request: PageRequest,
        result: Result<Page<Post>, anyhow::Error>,
    },
    CommentsPageLoaded {
        request: PageRequest,
        post_id: i64,
        result: Result<Page<Comment>, anyhow::Error>,
    },
    PostDetailLoaded {
        post_id: i64,
        /// True when the user navigated to this post, false for an in-place
        /// refresh of an already selected post.
        select: bool,
        result: Result<Post, anyhow::Error>,
    },
    LeaderboardLoaded(Result<Vec<LeaderboardEntry>, anyhow::Error>),
    AuthCompleted(Result<UserRef, anyhow::Error>),
    PostCreated(Result<Post, anyhow::Error>),
    CommentCommitted {
        parent_id: Option<i64>,
        result: Result<CommentRefresh, anyhow::Error>,
    },
    PostLiked {
        post_id: i64,
        result: Result<(), anyhow::Error>,
    },
    CommentLiked {
        result: Result<(), anyhow::Error>,
    },
    NotificationsLoaded {
        user_id: i64,
        /// Background polls swallow failures instead of surfacing them.
        silent: bool,
        result: Result<Page<Notification>, anyhow::Error>,
    },
    ProfileLoaded(Result<Profile, anyhow::Error>),
}

pub(super) fn process_messages(app: &mut PlaytoApp) {
    while let Ok(message) = app.rx.try_recv() {
        match message {
            AppMessage::PostsPageLoaded { request, result } => match result {
                Ok(page) => {
                    app.posts.apply(request, page.results, page.has_more);
                }
                Err(err) => {
                    if app.posts.fail(request) {
                        app.error = Some(err.to_string());
                    }
                }
            },
            AppMessage::CommentsPageLoaded {
                request,
                post_id,
                result,
            } => {
                // The page belongs to whichever post was selected when the
                // fetch started; a selection change makes it stale.
                if app.selected_post.as_ref().map(|p| p.id) != Some(post_id) {
                    continue;
                }
                match result {
                    Ok(page) => {
                        app.comments.apply(request, page.results, page.has_more);
                    }
                    Err(err) => {
                        if app.comments.fail(request) {
                            app.error = Some(err.to_string());
                        }
                    }
                }
            }
            AppMessage::PostDetailLoaded {
                post_id,
                select,
                result,
            } => match result {
                Ok(post) => {
                    if select {
                        app.select_post(post);
                    } else if app.selected_post.as_ref().map(|p| p.id) == Some(post_id) {
                        app.selected_post = Some(post);
                    }
                }
                Err(err) => {
                    app.error = Some(err.to_string());
                }
            },
            AppMessage::LeaderboardLoaded(result) => match result {
                Ok(entries) => {
                    app.leaderboard = entries;
                }
                Err(err) => {
                    app.error = Some(err.to_string());
                }
            },
            AppMessage::AuthCompleted(result) => {
                app.auth.submitting = false;
                match result {
                    Ok(user) => {
                        let user = ActiveUser {
                            id: user.id,
                            username: user.username,
                        };
                        session::store(&user);
                        app.session = Some(user);
                        app.auth.clear_inputs();
                        app.error = None;
                        app.on_identity_present();
                    }
                    Err(err) => {
                        app.error = Some(err.to_string());
                    }
                }
            }
            AppMessage::PostCreated(result) => {
                app.creating_post = false;
                match result {
                    Ok(_) => {
                        app.new_post_draft.clear();
                        app.spawn_reset_posts();
                    }
                    Err(err) => {
                        app.error = Some(err.to_string());
                    }
                }
            }
            AppMessage::CommentCommitted { parent_id, result } => {
                match result {
                    Ok(refresh) => {
                        if parent_id.is_some() {
                            app.reply.close();
                        } else {
                            app.new_comment_draft.clear();
                            app.adding_comment = false;
                        }
                        let selected_id = app.selected_post.as_ref().map(|p| p.id);
                        if selected_id == Some(refresh.post.id) {
                            app.selected_post = Some(refresh.post);
                            app.comments
                                .replace_first_page(refresh.comments.results, refresh.comments.has_more);
                        }
                        if refresh.filter == app.active_filter {
                            app.posts
                                .replace_first_page(refresh.posts.results, refresh.posts.has_more);
                        }
                    }
                    Err(err) => {
                        // Keep the draft and target so the user can retry.
                        app.reply.submitting = false;
                        app.adding_comment = false;
                        app.error = Some(err.to_string());
                    }
                }
            }
            AppMessage::PostLiked { post_id, result } => match result {
                Ok(()) => {
                    app.spawn_reset_posts();
                    if app.selected_post.as_ref().map(|p| p.id) == Some(post_id) {
                        app.spawn_refresh_post_detail(post_id);
                    }
                    app.spawn_load_leaderboard();
                }
                Err(err) => {
                    app.error = Some(err.to_string());
                }
            },
            AppMessage::CommentLiked { result } => match result {
                Ok(()) => {
                    app.spawn_reset_comments();
                    app.spawn_load_leaderboard();
                }
                Err(err) => {
                    app.error = Some(err.to_string());
                }
            },
            AppMessage::NotificationsLoaded {
                user_id,
                silent,
                result,
            } => {
                // Identity may have changed (or cleared) while in flight.
                if app.session.as_ref().map(|u| u.id) != Some(user_id) {
                    continue;
                }
                match result {
                    Ok(page) => {
                        app.notifications = page.results;
                    }
                    Err(err) if silent => {
                        debug!("background notification poll failed: {err}");
                    }
                    Err(err) => {
                        app.error = Some(err.to_string());
                    }
                }
            }
            AppMessage::ProfileLoaded(result) => match result {
                Ok(profile) => {
                    app.profile = Some(profile);
                }
                Err(err) => {
                    app.error = Some(err.to_string());
                }
            },
        }
    }
}
