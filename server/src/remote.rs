//! Client for the remote post collection.
//!
//! The remote side is a public mock REST service. Posts are read as quotes
//! (`title` becomes the text) and local edits are echoed back as posts.
//! Write responses carry no meaning beyond their status code.

use std::time::Duration;

use quotebook_engine::{Quote, Timestamp};
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Errors talking to the remote endpoint.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP error! status: {0}")]
    Status(u16),

    #[error("undecodable response: {0}")]
    Decode(String),
}

/// A post as served by the remote collection.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemotePost {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub user_id: Option<u64>,
}

/// Body sent on create and update.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PostBody<'a> {
    title: &'a str,
    body: &'a str,
    user_id: u64,
}

impl<'a> From<&'a Quote> for PostBody<'a> {
    fn from(quote: &'a Quote) -> Self {
        Self {
            title: &quote.text,
            body: &quote.category,
            user_id: 1,
        }
    }
}

/// HTTP client for the remote collection.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    client: Client,
    base_url: String,
}

impl RemoteClient {
    /// Create a client with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RemoteError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(base_url, client))
    }

    /// Create a client around a preconfigured `reqwest::Client`.
    pub fn with_client(base_url: &str, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// The collection URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch every post and map it to a quote stamped with `fetched_at`.
    pub async fn fetch_quotes(&self, fetched_at: Timestamp) -> Result<Vec<Quote>, RemoteError> {
        let response = self.client.get(&self.base_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status(status.as_u16()));
        }

        let posts: Vec<RemotePost> = response
            .json()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))?;

        tracing::debug!(count = posts.len(), url = %self.base_url, "Fetched remote posts");

        Ok(posts
            .into_iter()
            .map(|post| Quote::from_server(post.id, post.title, fetched_at))
            .collect())
    }

    /// POST a quote as a new post.
    pub async fn create(&self, quote: &Quote) -> Result<(), RemoteError> {
        let response = self
            .client
            .post(&self.base_url)
            .json(&PostBody::from(quote))
            .send()
            .await?;
        check_status(response.status())
    }

    /// PUT a quote over remote post `remote_id`.
    pub async fn update(&self, remote_id: u64, quote: &Quote) -> Result<(), RemoteError> {
        let response = self
            .client
            .put(self.item_url(remote_id))
            .json(&PostBody::from(quote))
            .send()
            .await?;
        check_status(response.status())
    }

    /// DELETE remote post `remote_id`.
    pub async fn delete(&self, remote_id: u64) -> Result<(), RemoteError> {
        let response = self.client.delete(self.item_url(remote_id)).send().await?;
        check_status(response.status())
    }

    fn item_url(&self, remote_id: u64) -> String {
        format!("{}/{}", self.base_url, remote_id)
    }
}

fn check_status(status: reqwest::StatusCode) -> Result<(), RemoteError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(RemoteError::Status(status.as_u16()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_deserialization() {
        let json = r#"{"userId": 1, "id": 3, "title": "ea molestias", "body": "et iusto"}"#;
        let post: RemotePost = serde_json::from_str(json).unwrap();
        assert_eq!(post.id, 3);
        assert_eq!(post.title, "ea molestias");
        assert_eq!(post.user_id, Some(1));
    }

    #[test]
    fn post_body_format() {
        let quote = Quote::new("local-1", "Never give up", "Motivational", 1);
        let json = serde_json::to_value(PostBody::from(&quote)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"title": "Never give up", "body": "Motivational", "userId": 1})
        );
    }

    #[test]
    fn item_url_strips_trailing_slash() {
        let client = RemoteClient::with_client("http://example.test/posts/", Client::new());
        assert_eq!(client.base_url(), "http://example.test/posts");
        assert_eq!(client.item_url(7), "http://example.test/posts/7");
    }
}
