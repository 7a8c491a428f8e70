use std::time::{Duration, Instant};

use crate::models::{Notification, SortMode};
use crate::session::ActiveUser;

#[derive(Default, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    Login,
    Signup,
}

/// Login/signup form state shown while no identity is active.
#[derive(Default)]
pub struct AuthState {
    pub mode: AuthMode,
    pub username: String,
    pub password: String,
    pub confirm: String,
    pub submitting: bool,
}

impl AuthState {
    pub fn clear_inputs(&mut self) {
        self.username.clear();
        self.password.clear();
        self.confirm.clear();
    }
}

/// The post-feed filter criteria. Snapshots of this are echoed back with
/// fetches so that out-of-date responses can be recognised and dropped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PostFilter {
    pub search: String,
    pub sort: SortMode,
}

impl PostFilter {
    pub fn new(search_input: &str, sort: SortMode) -> Self {
        Self {
            search: search_input.trim().to_string(),
            sort,
        }
    }
}

/// Tree-wide reply singleton: at most one comment node has an open reply
/// editor, and switching targets discards the previous draft.
#[derive(Default)]
pub struct ReplyState {
    pub target_id: Option<i64>,
    pub draft: String,
    pub submitting: bool,
}

impl ReplyState {
    pub fn is_open_for(&self, comment_id: i64) -> bool {
        self.target_id == Some(comment_id)
    }

    /// Opens the reply editor on `comment_id`, implicitly closing any other
    /// open editor and discarding its draft.
    pub fn open(&mut self, comment_id: i64) {
        if self.target_id != Some(comment_id) {
            self.target_id = Some(comment_id);
            self.draft.clear();
            self.submitting = false;
        }
    }

    pub fn close(&mut self) {
        self.target_id = None;
        self.draft.clear();
        self.submitting = false;
    }
}

/// Unread badge value, always derived from the fetched list.
pub fn unread_count(notifications: &[Notification]) -> usize {
    notifications.iter().filter(|n| !n.is_read).count()
}

/// True once a pending edit has settled for at least `window`. An edit inside
/// the window moves `edited_at` forward, so the fetch fires once per burst.
pub fn debounce_fired(edited_at: Option<Instant>, now: Instant, window: Duration) -> bool {
    edited_at.is_some_and(|at| now.duration_since(at) >= window)
}

/// Local guard for like actions; rejects before any network call is made.
pub fn like_guard(session: Option<&ActiveUser>) -> Result<&ActiveUser, &'static str> {
    session.ok_or("Log in before liking.")
}

/// A reply that passed every local submit check.
#[derive(Debug, PartialEq, Eq)]
pub struct ReadyReply {
    pub author_id: i64,
    pub post_id: i64,
    pub content: String,
}

/// Local submit checks for a reply, in precedence order. A failure surfaces
/// its message and issues no network call.
pub fn reply_guard(
    session: Option<&ActiveUser>,
    selected_post_id: Option<i64>,
    draft: &str,
) -> Result<ReadyReply, &'static str> {
    let user = session.ok_or("Log in before replying.")?;
    let post_id = selected_post_id.ok_or("Select a post and log in.")?;
    let content = draft.trim();
    if content.is_empty() {
        return Err("Reply cannot be empty.");
    }
    Ok(ReadyReply {
        author_id: user.id,
        post_id,
        content: content.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NotificationVerb, UserRef};
    use pretty_assertions::assert_eq;

    #[test]
    fn opening_a_second_reply_discards_the_first_draft() {
        let mut reply = ReplyState::default();
        reply.open(1);
        reply.draft = "half-typed answer".into();
        reply.open(2);
        assert_eq!(reply.target_id, Some(2));
        assert_eq!(reply.draft, "");
        assert!(!reply.is_open_for(1));
        assert!(reply.is_open_for(2));
    }

    #[test]
    fn reopening_the_same_target_keeps_the_draft() {
        let mut reply = ReplyState::default();
        reply.open(1);
        reply.draft = "keep me".into();
        reply.open(1);
        assert_eq!(reply.draft, "keep me");
    }

    #[test]
    fn close_discards_draft_and_target() {
        let mut reply = ReplyState::default();
        reply.open(5);
        reply.draft = "gone".into();
        reply.close();
        assert_eq!(reply.target_id, None);
        assert_eq!(reply.draft, "");
    }

    fn notification(id: i64, is_read: bool) -> Notification {
        Notification {
            id,
            actor: UserRef {
                id: 1,
                username: "alice".into(),
            },
            verb: NotificationVerb::Reply,
            post_id: Some(1),
            comment_id: None,
            created_at: "2024-05-01T10:00:00Z".into(),
            is_read,
        }
    }

    #[test]
    fn unread_count_counts_unread_items_only() {
        let items = vec![
            notification(1, false),
            notification(2, true),
            notification(3, false),
        ];
        assert_eq!(unread_count(&items), 2);
        assert_eq!(unread_count(&[]), 0);
        let all_read: Vec<_> = items
            .into_iter()
            .map(|mut n| {
                n.is_read = true;
                n
            })
            .collect();
        assert_eq!(unread_count(&all_read), 0);
    }

    #[test]
    fn edits_inside_the_debounce_window_do_not_fire() {
        let window = Duration::from_millis(300);
        let start = Instant::now();
        assert!(!debounce_fired(None, start, window));
        assert!(!debounce_fired(
            Some(start),
            start + Duration::from_millis(120),
            window
        ));
    }

    #[test]
    fn a_settled_edit_fires_once_the_window_elapses() {
        let window = Duration::from_millis(300);
        let start = Instant::now();
        assert!(debounce_fired(Some(start), start + window, window));
        assert!(debounce_fired(
            Some(start),
            start + Duration::from_millis(450),
            window
        ));
    }

    fn active_user() -> ActiveUser {
        ActiveUser {
            id: 7,
            username: "alice".into(),
        }
    }

    #[test]
    fn likes_require_an_identity() {
        assert_eq!(like_guard(None), Err("Log in before liking."));
        let user = active_user();
        assert_eq!(like_guard(Some(&user)).map(|u| u.id), Ok(7));
    }

    #[test]
    fn reply_guard_checks_identity_then_post_then_content() {
        let user = active_user();
        assert_eq!(
            reply_guard(None, Some(1), "hi").unwrap_err(),
            "Log in before replying."
        );
        assert_eq!(
            reply_guard(Some(&user), None, "hi").unwrap_err(),
            "Select a post and log in."
        );
        assert_eq!(
            reply_guard(Some(&user), Some(1), "   ").unwrap_err(),
            "Reply cannot be empty."
        );
        let ready = reply_guard(Some(&user), Some(9), "  fine  ").unwrap();
        assert_eq!(
            ready,
            ReadyReply {
                author_id: 7,
                post_id: 9,
                content: "fine".into(),
            }
        );
    }

    #[test]
    fn filter_trims_search_input() {
        let filter = PostFilter::new("  alice  ", SortMode::Top);
        assert_eq!(filter.search, "alice");
        assert_eq!(filter.sort, SortMode::Top);
    }
}
