use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::models::{Comment, LeaderboardEntry, Notification, Page, Post, Profile, SortMode, UserRef};

/// Uniform failure for every collaborator call. The message is the server's
/// human-readable `detail` field when one is present and is surfaced to the
/// user verbatim.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserLookup {
    pub id: i64,
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base = sanitize_base_url(base_url.into())?;
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            base_url: base,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_base_url(&mut self, base_url: impl Into<String>) -> Result<()> {
        self.base_url = sanitize_base_url(base_url.into())?;
        Ok(())
    }

    pub fn list_posts(
        &self,
        search: &str,
        sort: SortMode,
        limit: usize,
        offset: usize,
    ) -> Result<Page<Post>> {
        let mut request = self.client.get(self.url("/posts/"));
        if !search.is_empty() {
            request = request.query(&[("search", search)]);
        }
        request = request.query(&[("sort", sort.query_value())]);
        request = request.query(&[("limit", limit), ("offset", offset)]);
        self.fetch_json(request)
    }

    pub fn get_post(&self, post_id: i64) -> Result<Post> {
        self.fetch_json(self.client.get(self.url(&format!("/posts/{post_id}/"))))
    }

    pub fn list_comments(&self, post_id: i64, limit: usize, offset: usize) -> Result<Page<Comment>> {
        let request = self
            .client
            .get(self.url(&format!("/posts/{post_id}/comments/")))
            .query(&[("limit", limit), ("offset", offset)]);
        self.fetch_json(request)
    }

    pub fn create_post(&self, author_id: i64, content: &str) -> Result<Post> {
        let request = self
            .client
            .post(self.url("/posts/"))
            .json(&json!({ "author_id": author_id, "content": content }));
        self.fetch_json(request)
    }

    pub fn create_comment(
        &self,
        post_id: i64,
        author_id: i64,
        content: &str,
        parent_id: Option<i64>,
    ) -> Result<Comment> {
        let request = self
            .client
            .post(self.url(&format!("/posts/{post_id}/comments/")))
            .json(&json!({
                "author_id": author_id,
                "content": content,
                "parent_id": parent_id,
            }));
        self.fetch_json(request)
    }

    pub fn like_post(&self, post_id: i64, user_id: i64) -> Result<()> {
        let request = self
            .client
            .post(self.url(&format!("/posts/{post_id}/like/")))
            .json(&json!({ "user_id": user_id }));
        self.fetch_ok(request)
    }

    pub fn like_comment(&self, comment_id: i64, user_id: i64) -> Result<()> {
        let request = self
            .client
            .post(self.url(&format!("/comments/{comment_id}/like/")))
            .json(&json!({ "user_id": user_id }));
        self.fetch_ok(request)
    }

    pub fn get_leaderboard(&self) -> Result<Vec<LeaderboardEntry>> {
        self.fetch_json(self.client.get(self.url("/leaderboard/")))
    }

    pub fn get_profile(&self, user_id: i64) -> Result<Profile> {
        self.fetch_json(self.client.get(self.url(&format!("/users/{user_id}/profile/"))))
    }

    pub fn lookup_user(&self, username: &str) -> Result<UserLookup> {
        let request = self
            .client
            .get(self.url("/users/lookup/"))
            .query(&[("username", username)]);
        self.fetch_json(request)
    }

    pub fn list_notifications(&self, user_id: i64, limit: usize) -> Result<Page<Notification>> {
        let request = self
            .client
            .get(self.url("/notifications/"))
            .query(&[("user_id", user_id)])
            .query(&[("limit", limit), ("offset", 0)]);
        self.fetch_json(request)
    }

    pub fn mark_notifications_read(&self, user_id: i64, notification_id: Option<i64>) -> Result<()> {
        let request = self
            .client
            .post(self.url("/notifications/mark-read/"))
            .json(&json!({
                "user_id": user_id,
                "notification_id": notification_id,
            }));
        self.fetch_ok(request)
    }

    pub fn signup(&self, username: &str, password: &str) -> Result<UserRef> {
        let request = self
            .client
            .post(self.url("/auth/signup/"))
            .json(&json!({ "username": username, "password": password }));
        self.fetch_json(request)
    }

    pub fn login(&self, username: &str, password: &str) -> Result<UserRef> {
        let request = self
            .client
            .post(self.url("/auth/login/"))
            .json(&json!({ "username": username, "password": password }));
        self.fetch_json(request)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn fetch_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = check_status(request.send()?)?;
        Ok(response.json()?)
    }

    fn fetch_ok(&self, request: RequestBuilder) -> Result<()> {
        check_status(request.send()?)?;
        Ok(())
    }
}

fn check_status(response: Response) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let message = response
        .json::<serde_json::Value>()
        .ok()
        .and_then(|body| {
            body.get("detail")
                .and_then(|detail| detail.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| "Request failed".to_string());
    Err(ApiError { message }.into())
}

fn sanitize_base_url(mut base: String) -> Result<String> {
    if !base.starts_with("http://") && !base.starts_with("https://") {
        base = format!("http://{base}");
    }
    // Remove trailing slash for consistency
    while base.ends_with('/') {
        base.pop();
    }
    // Validate once
    let _ = Url::parse(&base).context("invalid base URL")?;
    Ok(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn base_url_gains_scheme_and_loses_trailing_slash() {
        assert_eq!(
            sanitize_base_url("localhost:8000/api/".into()).unwrap(),
            "http://localhost:8000/api"
        );
        assert_eq!(
            sanitize_base_url("https://feed.example/api".into()).unwrap(),
            "https://feed.example/api"
        );
    }

    #[test]
    fn unparseable_base_url_fails_client_construction() {
        assert!(ApiClient::new("http://[bad").is_err());
    }

    #[test]
    fn api_error_displays_its_message() {
        let err = ApiError {
            message: "author not found.".into(),
        };
        assert_eq!(err.to_string(), "author not found.");
    }
}
