//! Web3Forms relay client.
//!
//! Posts feedback submissions as JSON and reads back the relay's
//! `{ "success": bool, ... }` verdict.

use crate::AiError;
use caption_core::config::DEFAULT_RELAY_URL;
use caption_core::{CaptionError, FeedbackSubmission, RelayClient, RelayResponse, Result};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use tracing::{debug, instrument};

/// Form relay backed by Web3Forms.
#[derive(Debug, Clone)]
pub struct Web3FormsRelay {
    client: Client,
    url: String,
}

impl Web3FormsRelay {
    /// Relay posting to the public Web3Forms endpoint.
    pub fn new() -> Result<Self> {
        Self::with_url(DEFAULT_RELAY_URL)
    }

    /// Relay posting to a custom endpoint.
    pub fn with_url(url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| CaptionError::NetworkError(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn post(&self, submission: &FeedbackSubmission) -> std::result::Result<RelayResponse, AiError> {
        let response = self
            .client
            .post(&self.url)
            .header(ACCEPT, "application/json")
            .json(submission)
            .send()
            .await?;

        let status = response.status();
        debug!(%status, "Relay responded");

        // The verdict lives in the body, whatever the status code.
        response
            .json::<RelayResponse>()
            .await
            .map_err(|e| AiError::ParseError(format!("{} (status {})", e, status)))
    }
}

#[async_trait]
impl RelayClient for Web3FormsRelay {
    #[instrument(skip(self, submission), fields(url = %self.url))]
    async fn submit(&self, submission: &FeedbackSubmission) -> Result<RelayResponse> {
        self.post(submission)
            .await
            .map_err(|e| CaptionError::RelayError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn submission() -> FeedbackSubmission {
        FeedbackSubmission {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            message: "Great tool".into(),
            access_key: "key-123".into(),
        }
    }

    fn relay_for(server: &MockServer) -> Web3FormsRelay {
        Web3FormsRelay::with_url(format!("{}/submit", server.uri())).unwrap()
    }

    #[tokio::test]
    async fn test_posts_json_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/submit"))
            .and(header("content-type", "application/json"))
            .and(header("accept", "application/json"))
            .and(body_json(json!({
                "name": "Ada",
                "email": "ada@example.com",
                "message": "Great tool",
                "access_key": "key-123"
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"success": true, "message": "Email sent successfully!"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let response = relay_for(&server).submit(&submission()).await.unwrap();
        assert!(response.success);
        assert_eq!(response.message.as_deref(), Some("Email sent successfully!"));
    }

    #[tokio::test]
    async fn test_rejection_body_is_read_despite_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({"success": false, "message": "Invalid access key"})),
            )
            .mount(&server)
            .await;

        let response = relay_for(&server).submit(&submission()).await.unwrap();
        assert!(!response.success);
    }

    #[tokio::test]
    async fn test_undecodable_reply_is_relay_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
            .mount(&server)
            .await;

        let err = relay_for(&server).submit(&submission()).await.unwrap_err();
        assert!(matches!(err, CaptionError::RelayError(_)));
    }

    #[tokio::test]
    async fn test_each_submit_is_one_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(2)
            .mount(&server)
            .await;

        let relay = relay_for(&server);
        relay.submit(&submission()).await.unwrap();
        relay.submit(&submission()).await.unwrap();
    }
}
