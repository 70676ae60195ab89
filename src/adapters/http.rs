use crate::domain::model::{Opportunity, SearchResponse, SearchWindow};
use crate::utils::error::{AlertError, Result};
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the opportunity search endpoint.
pub struct SamClient {
    client: Client,
    endpoint: String,
    api_key: String,
    limit: usize,
    timeout: Duration,
}

impl SamClient {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>, limit: usize) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            limit,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Bound on the whole request, connect through body.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// One request for the whole window. No paging: anything beyond
    /// `limit` is not fetched.
    pub async fn search(&self, window: &SearchWindow) -> Result<Vec<Opportunity>> {
        // 不要把 api_key 寫進日誌
        tracing::debug!("Making API request to: {} ({})", self.endpoint, window);

        let response = self
            .client
            .get(&self.endpoint)
            .timeout(self.timeout)
            .query(&[
                ("api_key", self.api_key.clone()),
                ("postedFrom", window.posted_from_param()),
                ("postedTo", window.posted_to_param()),
                ("limit", self.limit.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);

        let body = response.text().await?;
        if !status.is_success() {
            return Err(AlertError::ApiStatusError {
                status: status.as_u16(),
                body: truncate(&body, 512),
            });
        }

        let parsed: SearchResponse = serde_json::from_str(&body)?;
        if let Some(total) = parsed.total_records {
            if total as usize > parsed.opportunities.len() {
                tracing::warn!(
                    "⚠️ API reports {} records but returned {} (limit {})",
                    total,
                    parsed.opportunities.len(),
                    self.limit
                );
            }
        }

        Ok(parsed.opportunities)
    }
}

fn truncate(body: &str, max_chars: usize) -> String {
    match body.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use httpmock::prelude::*;

    fn window() -> SearchWindow {
        SearchWindow {
            posted_from: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            posted_to: NaiveDate::from_ymd_opt(2025, 6, 3).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_search_sends_window_and_parses_records() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/opportunities/v2/search")
                .query_param("api_key", "test-key")
                .query_param("postedFrom", "04/01/2025")
                .query_param("postedTo", "06/03/2025")
                .query_param("limit", "1000");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "totalRecords": 2,
                    "opportunitiesData": [
                        {"noticeId": "a1", "title": "Sedan left-hand drive"},
                        {"noticeId": "b2", "title": "Forklift", "departmentName": "GSA"}
                    ]
                }));
        });

        let client = SamClient::new(server.url("/opportunities/v2/search"), "test-key", 1000);
        let records = client.search(&window()).await.unwrap();

        api_mock.assert();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].notice_id, "a1");
        assert_eq!(records[1].agency, "GSA");
    }

    #[tokio::test]
    async fn test_search_missing_data_field_is_empty() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/search");
            then.status(200).json_body(serde_json::json!({"totalRecords": 0}));
        });

        let client = SamClient::new(server.url("/search"), "k", 10);
        assert!(client.search(&window()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_error_status_is_fatal() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/search");
            then.status(403).body("API_KEY_INVALID");
        });

        let client = SamClient::new(server.url("/search"), "bad", 10);
        match client.search(&window()).await {
            Err(AlertError::ApiStatusError { status, body }) => {
                assert_eq!(status, 403);
                assert_eq!(body, "API_KEY_INVALID");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_search_malformed_body_is_fatal() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/search");
            then.status(200).body("<html>maintenance</html>");
        });

        let client = SamClient::new(server.url("/search"), "k", 10);
        assert!(matches!(
            client.search(&window()).await,
            Err(AlertError::SerializationError(_))
        ));
    }

    #[tokio::test]
    async fn test_search_wrong_shape_is_fatal() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/search");
            then.status(200)
                .json_body(serde_json::json!({"opportunitiesData": "not a list"}));
        });

        let client = SamClient::new(server.url("/search"), "k", 10);
        assert!(client.search(&window()).await.is_err());
    }

    #[tokio::test]
    async fn test_search_times_out_on_stalled_server() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/search");
            then.status(200)
                .delay(Duration::from_millis(500))
                .json_body(serde_json::json!({"opportunitiesData": []}));
        });

        let client = SamClient::new(server.url("/search"), "k", 10)
            .with_timeout(Duration::from_millis(100));
        match client.search(&window()).await {
            Err(AlertError::ApiError(e)) => assert!(e.is_timeout()),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_truncate_long_body() {
        assert_eq!(truncate("abcdef", 3), "abc...");
        assert_eq!(truncate("abc", 3), "abc");
    }
}
