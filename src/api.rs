use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("status API returned {status}: {body}")]
    UnexpectedStatusCode { status: StatusCode, body: String },
    #[error("failed to reach status API: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Outbound side of the status API, mockable in tests.
#[async_trait]
pub trait StatusApi: Send + Sync {
    /// Fetch homework records updated at or after `from_date` (unix seconds).
    /// Returns the decoded payload as-is; shape checking is the validator's job.
    async fn fetch(&self, from_date: i64) -> Result<Value, FetchError>;
}

#[derive(Clone)]
pub struct StatusClient {
    http: Client,
    endpoint: Url,
    token: String,
}

impl fmt::Debug for StatusClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl StatusClient {
    pub fn new(endpoint: Url, token: String, timeout: Duration) -> Self {
        let http = Client::builder()
            .user_agent("hw-watchbot/0.1")
            .timeout(timeout)
            .build()
            .expect("reqwest client");
        Self {
            http,
            endpoint,
            token,
        }
    }

    pub fn build_request(&self, from_date: i64) -> Result<reqwest::Request, FetchError> {
        Ok(self
            .http
            .get(self.endpoint.clone())
            .header("Authorization", format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .build()?)
    }
}

#[async_trait]
impl StatusApi for StatusClient {
    async fn fetch(&self, from_date: i64) -> Result<Value, FetchError> {
        let request = self.build_request(from_date)?;
        let res = self.http.execute(request).await?;

        if res.status() != StatusCode::OK {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(FetchError::UnexpectedStatusCode { status, body });
        }

        let payload = res.json::<Value>().await?;
        info!(from_date, "fetched homework statuses");
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> StatusClient {
        StatusClient::new(
            Url::parse("https://statuses.example/api/").unwrap(),
            "token".into(),
            Duration::from_secs(30),
        )
    }

    #[test]
    fn build_request_sets_auth_header() {
        let request = client().build_request(1_700_000_000).unwrap();
        assert_eq!(request.method(), reqwest::Method::GET);
        assert_eq!(
            request
                .headers()
                .get("Authorization")
                .and_then(|h| h.to_str().ok())
                .unwrap(),
            "OAuth token"
        );
    }

    #[test]
    fn build_request_sets_window_query() {
        let request = client().build_request(1_700_000_000).unwrap();
        assert_eq!(request.url().path(), "/api/");
        assert_eq!(
            request.url().query().unwrap(),
            "from_date=1700000000"
        );
    }
}
