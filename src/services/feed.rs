// src/services/feed.rs

//! Upstream feed client.
//!
//! Fetches organization and task listings for a contest year from the
//! upstream source of record. The feed is untrusted and may be slow or
//! failing; nothing here retries.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::{FeedConfig, FeedOrganization, FeedTask, parse_rows};
use crate::utils::{http, parse_feed_url};

/// Source of organization and task listings.
#[async_trait]
pub trait UpstreamFeed: Send + Sync {
    /// Organizations registered for a year.
    async fn fetch_organizations(&self, year: i32) -> Result<Vec<FeedOrganization>>;

    /// Completed tasks of one organization in a year.
    async fn fetch_tasks(&self, org: &str, year: i32) -> Result<Vec<FeedTask>>;
}

/// HTTP client for the Melange JSON listings.
pub struct MelangeFeed {
    config: FeedConfig,
    client: Client,
}

impl MelangeFeed {
    /// Create a feed client with the given configuration.
    pub fn new(config: FeedConfig) -> Result<Self> {
        let client = http::create_client(&config)?;
        Ok(Self { config, client })
    }

    async fn fetch_rows<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<Vec<T>> {
        let url = parse_feed_url(url)?;
        log::debug!("Fetching {url}");

        let body = http::fetch_bytes(&self.client, url.as_str()).await;

        let delay = Duration::from_millis(self.config.request_delay_ms);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        parse_rows(&body?).map_err(|e| AppError::feed(url.as_str(), e))
    }
}

#[async_trait]
impl UpstreamFeed for MelangeFeed {
    async fn fetch_organizations(&self, year: i32) -> Result<Vec<FeedOrganization>> {
        self.fetch_rows(&self.config.organizations_url(year)).await
    }

    async fn fetch_tasks(&self, org: &str, year: i32) -> Result<Vec<FeedTask>> {
        self.fetch_rows(&self.config.tasks_url(org, year)).await
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response and return the feed base URL.
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        format!("http://{addr}")
    }

    fn config_for(base: &str) -> FeedConfig {
        FeedConfig {
            organizations_url: format!("{base}/gci{{year}}/orgs"),
            tasks_url: format!("{base}/gci{{year}}/{{org}}"),
            request_delay_ms: 0,
            ..FeedConfig::default()
        }
    }

    #[tokio::test]
    async fn test_fetch_organizations() {
        let base = serve_once(
            "200 OK",
            r#"{"data":{"":[{"columns":{"org_id":"brlcad","name":"BRL-CAD"}}]}}"#,
        )
        .await;
        let feed = MelangeFeed::new(config_for(&base)).unwrap();

        let orgs = feed.fetch_organizations(2013).await.unwrap();
        assert_eq!(orgs.len(), 1);
        assert_eq!(orgs[0].org_id, "brlcad");
        assert_eq!(orgs[0].name, "BRL-CAD");
    }

    #[tokio::test]
    async fn test_fetch_tasks() {
        let base = serve_once(
            "200 OK",
            r#"{"data":{"":[{"columns":{"key":5,"student":"A","title":"T","types":"Code, Outreach"}}]}}"#,
        )
        .await;
        let feed = MelangeFeed::new(config_for(&base)).unwrap();

        let tasks = feed.fetch_tasks("brlcad", 2013).await.unwrap();
        assert_eq!(tasks[0].key, 5);
        assert_eq!(tasks[0].categories(), vec!["Code", "Outreach"]);
    }

    #[tokio::test]
    async fn test_server_error_is_http_error() {
        let base = serve_once("500 Internal Server Error", "{}").await;
        let feed = MelangeFeed::new(config_for(&base)).unwrap();

        let err = feed.fetch_organizations(2013).await.unwrap_err();
        assert!(matches!(err, AppError::Http(_)));
    }

    #[tokio::test]
    async fn test_bad_envelope_is_feed_error() {
        let base = serve_once("200 OK", r#"{"rows":[]}"#).await;
        let feed = MelangeFeed::new(config_for(&base)).unwrap();

        let err = feed.fetch_organizations(2013).await.unwrap_err();
        assert!(matches!(err, AppError::Feed { .. }));
    }
}
