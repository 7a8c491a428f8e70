use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRef {
    pub id: i64,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub author: UserRef,
    pub content: String,
    pub created_at: String,
    #[serde(default)]
    pub like_count: i64,
    #[serde(default)]
    pub comment_count: i64,
}

/// A comment node. `replies` is the server-built subtree; the client renders
/// it as delivered and never reorders or flattens it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub author: UserRef,
    pub content: String,
    pub created_at: String,
    #[serde(default)]
    pub like_count: i64,
    #[serde(default)]
    pub parent_id: Option<i64>,
    #[serde(default)]
    pub replies: Vec<Comment>,
}

/// Offset-paginated response envelope shared by the post, comment, and
/// notification listings.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeaderboardEntry {
    pub id: i64,
    pub username: String,
    pub karma: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileStats {
    pub posts: i64,
    pub comments: i64,
    pub post_likes: i64,
    pub comment_likes: i64,
    pub karma_last_24h: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    pub username: String,
    pub stats: ProfileStats,
    #[serde(default)]
    pub recent_posts: Vec<Post>,
    #[serde(default)]
    pub recent_comments: Vec<Comment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationVerb {
    LikePost,
    LikeComment,
    Reply,
    Comment,
    MentionPost,
    MentionComment,
    #[serde(other)]
    Other,
}

impl NotificationVerb {
    pub fn label(self) -> &'static str {
        match self {
            NotificationVerb::LikePost => "liked your post",
            NotificationVerb::LikeComment => "liked your comment",
            NotificationVerb::Reply => "replied to your comment",
            NotificationVerb::Comment => "commented on your post",
            NotificationVerb::MentionPost => "mentioned you in a post",
            NotificationVerb::MentionComment => "mentioned you in a comment",
            NotificationVerb::Other => "sent an update",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub actor: UserRef,
    pub verb: NotificationVerb,
    #[serde(default)]
    pub post_id: Option<i64>,
    #[serde(default)]
    pub comment_id: Option<i64>,
    pub created_at: String,
    #[serde(default)]
    pub is_read: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Copy, Default)]
pub enum SortMode {
    #[default]
    New,
    Top,
    Discussed,
}

impl SortMode {
    pub fn query_value(self) -> &'static str {
        match self {
            SortMode::New => "new",
            SortMode::Top => "top",
            SortMode::Discussed => "discussed",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortMode::New => "Newest",
            SortMode::Top => "Top liked",
            SortMode::Discussed => "Most discussed",
        }
    }

    pub const ALL: [SortMode; 3] = [SortMode::New, SortMode::Top, SortMode::Discussed];
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn notification_verb_deserializes_snake_case() {
        let n: Notification = serde_json::from_str(
            r#"{
                "id": 4,
                "actor": {"id": 2, "username": "bob"},
                "verb": "mention_comment",
                "post_id": 9,
                "comment_id": null,
                "created_at": "2024-05-01T10:00:00Z",
                "is_read": false
            }"#,
        )
        .unwrap();
        assert_eq!(n.verb, NotificationVerb::MentionComment);
        assert_eq!(n.verb.label(), "mentioned you in a comment");
    }

    #[test]
    fn unknown_verb_falls_back() {
        let verb: NotificationVerb = serde_json::from_str("\"wave\"").unwrap();
        assert_eq!(verb, NotificationVerb::Other);
        assert_eq!(verb.label(), "sent an update");
    }

    #[test]
    fn comment_tree_deserializes_nested_replies() {
        let comment: Comment = serde_json::from_str(
            r#"{
                "id": 1,
                "post_id": 7,
                "author": {"id": 1, "username": "alice"},
                "content": "top",
                "created_at": "2024-05-01T10:00:00Z",
                "like_count": 2,
                "parent_id": null,
                "replies": [
                    {
                        "id": 2,
                        "post_id": 7,
                        "author": {"id": 2, "username": "bob"},
                        "content": "nested",
                        "created_at": "2024-05-01T10:05:00Z",
                        "parent_id": 1
                    }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(comment.replies.len(), 1);
        assert_eq!(comment.replies[0].parent_id, Some(1));
        assert!(comment.replies[0].replies.is_empty());
    }
}
