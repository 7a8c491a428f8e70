use std::sync::mpsc::Sender;
use std::thread;

use log::error;

use crate::api::ApiClient;

use super::messages::{AppMessage, CommentRefresh};
use super::pagination::PageRequest;
use super::state::{AuthMode, PostFilter};

fn send(tx: &Sender<AppMessage>, message: AppMessage) {
    if tx.send(message).is_err() {
        error!("app channel closed, dropping worker result");
    }
}

pub fn load_posts_page(
    client: ApiClient,
    tx: Sender<AppMessage>,
    request: PageRequest,
    filter: PostFilter,
) {
    thread::spawn(move || {
        let result = client.list_posts(&filter.search, filter.sort, request.limit, request.offset);
        send(&tx, AppMessage::PostsPageLoaded { request, result });
    });
}

pub fn load_comments_page(
    client: ApiClient,
    tx: Sender<AppMessage>,
    request: PageRequest,
    post_id: i64,
) {
    thread::spawn(move || {
        let result = client.list_comments(post_id, request.limit, request.offset);
        send(
            &tx,
            AppMessage::CommentsPageLoaded {
                request,
                post_id,
                result,
            },
        );
    });
}

pub fn load_post_detail(client: ApiClient, tx: Sender<AppMessage>, post_id: i64, select: bool) {
    thread::spawn(move || {
        let result = client.get_post(post_id);
        send(
            &tx,
            AppMessage::PostDetailLoaded {
                post_id,
                select,
                result,
            },
        );
    });
}

pub fn load_leaderboard(client: ApiClient, tx: Sender<AppMessage>) {
    thread::spawn(move || {
        let result = client.get_leaderboard();
        send(&tx, AppMessage::LeaderboardLoaded(result));
    });
}

pub fn authenticate(
    client: ApiClient,
    tx: Sender<AppMessage>,
    mode: AuthMode,
    username: String,
    password: String,
) {
    thread::spawn(move || {
        let result = match mode {
            AuthMode::Login => client.login(&username, &password),
            AuthMode::Signup => client.signup(&username, &password),
        };
        send(&tx, AppMessage::AuthCompleted(result));
    });
}

pub fn create_post(client: ApiClient, tx: Sender<AppMessage>, author_id: i64, content: String) {
    thread::spawn(move || {
        let result = client.create_post(author_id, &content);
        send(&tx, AppMessage::PostCreated(result));
    });
}

/// Everything a comment submit needs, snapshotted at spawn time so the worker
/// fetches the refreshes under the state the user saw.
pub struct CommentSubmission {
    pub post_id: i64,
    pub author_id: i64,
    pub content: String,
    pub parent_id: Option<i64>,
    pub filter: PostFilter,
    pub comment_limit: usize,
    pub post_limit: usize,
}

/// Creates the comment, then performs the three follow-up refreshes (post
/// detail, first comment page, first feed page) before reporting the submit
/// as settled. Any failure along the way fails the whole submit.
pub fn submit_comment(client: ApiClient, tx: Sender<AppMessage>, submission: CommentSubmission) {
    thread::spawn(move || {
        let parent_id = submission.parent_id;
        let result = (|| {
            client.create_comment(
                submission.post_id,
                submission.author_id,
                &submission.content,
                submission.parent_id,
            )?;
            let post = client.get_post(submission.post_id)?;
            let comments = client.list_comments(submission.post_id, submission.comment_limit, 0)?;
            let posts = client.list_posts(
                &submission.filter.search,
                submission.filter.sort,
                submission.post_limit,
                0,
            )?;
            Ok(CommentRefresh {
                post,
                comments,
                posts,
                filter: submission.filter,
            })
        })();
        send(&tx, AppMessage::CommentCommitted { parent_id, result });
    });
}

pub fn like_post(client: ApiClient, tx: Sender<AppMessage>, post_id: i64, user_id: i64) {
    thread::spawn(move || {
        let result = client.like_post(post_id, user_id);
        send(&tx, AppMessage::PostLiked { post_id, result });
    });
}

pub fn like_comment(client: ApiClient, tx: Sender<AppMessage>, comment_id: i64, user_id: i64) {
    thread::spawn(move || {
        let result = client.like_comment(comment_id, user_id);
        send(&tx, AppMessage::CommentLiked { result });
    });
}

pub fn load_notifications(
    client: ApiClient,
    tx: Sender<AppMessage>,
    user_id: i64,
    limit: usize,
    silent: bool,
) {
    thread::spawn(move || {
        let result = client.list_notifications(user_id, limit);
        send(
            &tx,
            AppMessage::NotificationsLoaded {
                user_id,
                silent,
                result,
            },
        );
    });
}

/// Marks notifications read (all of them when no id is given), then re-fetches
/// the list so the read flags reflect the server's view.
pub fn mark_read_and_refresh(
    client: ApiClient,
    tx: Sender<AppMessage>,
    user_id: i64,
    notification_id: Option<i64>,
    limit: usize,
) {
    thread::spawn(move || {
        let result = client
            .mark_notifications_read(user_id, notification_id)
            .and_then(|()| client.list_notifications(user_id, limit));
        send(
            &tx,
            AppMessage::NotificationsLoaded {
                user_id,
                silent: false,
                result,
            },
        );
    });
}

pub fn load_profile(client: ApiClient, tx: Sender<AppMessage>, user_id: i64) {
    thread::spawn(move || {
        let result = client.get_profile(user_id);
        send(&tx, AppMessage::ProfileLoaded(result));
    });
}

/// Mention clicks only carry a handle; resolve it to an id first, then fetch
/// the same full profile as an id click.
pub fn load_profile_by_username(client: ApiClient, tx: Sender<AppMessage>, username: String) {
    thread::spawn(move || {
        let result = client
            .lookup_user(&username)
            .and_then(|lookup| client.get_profile(lookup.id));
        send(&tx, AppMessage::ProfileLoaded(result));
    });
}
