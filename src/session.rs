use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};

/// The logged-in identity held by the app for the lifetime of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveUser {
    pub id: i64,
    pub username: String,
}

/// On-disk shape: exactly two string fields, matching what the hosted web
/// client keeps in browser storage.
#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    user_id: String,
    username: String,
}

fn session_file_path() -> PathBuf {
    let base = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join(".playto").join("session.json")
}

/// Reads the persisted identity, if any. Unreadable or malformed files are
/// treated as logged out.
pub fn load() -> Option<ActiveUser> {
    load_from(&session_file_path())
}

pub fn load_from(path: &Path) -> Option<ActiveUser> {
    let raw = fs::read_to_string(path).ok()?;
    let stored: StoredSession = serde_json::from_str(&raw).ok()?;
    let id = stored.user_id.parse().ok()?;
    Some(ActiveUser {
        id,
        username: stored.username,
    })
}

pub fn store(user: &ActiveUser) {
    if let Err(err) = store_to(&session_file_path(), user) {
        warn!("failed to persist session: {err}");
    }
}

pub fn store_to(path: &Path, user: &ActiveUser) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let stored = StoredSession {
        user_id: user.id.to_string(),
        username: user.username.clone(),
    };
    let raw = serde_json::to_string_pretty(&stored)?;
    fs::write(path, raw).with_context(|| format!("failed to write {}", path.display()))
}

pub fn clear() {
    clear_at(&session_file_path());
}

pub fn clear_at(path: &Path) {
    if path.exists() {
        if let Err(err) = fs::remove_file(path) {
            warn!("failed to clear session: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn temp_session_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("playto-session-test-{}-{name}", std::process::id()))
            .join("session.json")
    }

    #[test]
    fn session_round_trips_through_disk() {
        let path = temp_session_path("roundtrip");
        let user = ActiveUser {
            id: 42,
            username: "alice".into(),
        };
        store_to(&path, &user).unwrap();
        assert_eq!(load_from(&path), Some(user));
        clear_at(&path);
        assert_eq!(load_from(&path), None);
    }

    #[test]
    fn malformed_session_reads_as_logged_out() {
        let path = temp_session_path("malformed");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{\"user_id\": \"not-a-number\", \"username\": \"x\"}").unwrap();
        assert_eq!(load_from(&path), None);
        fs::write(&path, "not json").unwrap();
        assert_eq!(load_from(&path), None);
        clear_at(&path);
    }

    #[test]
    fn missing_file_reads_as_logged_out() {
        assert_eq!(load_from(Path::new("/definitely/missing/session.json")), None);
    }
}
