// src/services/feeds.rs

//! Feed fetching.
//!
//! Each feed lives at `data/<name>.json` under a base URL or a base
//! directory. Fetch failures (network, HTTP status, missing file) and
//! parse failures surface as errors; the router owns the retry policy.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{FeedData, FeedKind, HttpConfig};

/// Source of raw feed documents.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch the raw JSON document for a feed name.
    async fn fetch(&self, fragment: &str) -> Result<Vec<u8>>;
}

/// Fetch and parse a feed in one step.
pub async fn load_feed(source: &dyn FeedSource, fragment: &str) -> Result<FeedData> {
    validate_fragment(fragment)?;
    let raw = source.fetch(fragment).await?;
    FeedData::parse(FeedKind::from_fragment(fragment), fragment, &raw)
}

/// Reject fragments that could escape the data path.
fn validate_fragment(fragment: &str) -> Result<()> {
    let ok = !fragment.is_empty()
        && fragment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if ok {
        Ok(())
    } else {
        Err(AppError::feed(fragment, "invalid feed name"))
    }
}

/// HTTP-backed feed source.
pub struct HttpFeedSource {
    client: Client,
    base: Url,
}

impl HttpFeedSource {
    /// Create a source rooted at a base URL.
    pub fn new(base: &str, config: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base: Url::parse(base)?,
        })
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch(&self, fragment: &str) -> Result<Vec<u8>> {
        let url = self.base.join(&format!("data/{fragment}.json"))?;
        log::debug!("Fetching feed from {url}");

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(AppError::feed(
                fragment,
                format!("status {}", response.status()),
            ));
        }
        Ok(response.bytes().await?.to_vec())
    }
}

/// Directory-backed feed source for offline use and tests.
pub struct DirFeedSource {
    root_dir: PathBuf,
}

impl DirFeedSource {
    /// Create a source rooted at a directory containing `data/`.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }
}

#[async_trait]
impl FeedSource for DirFeedSource {
    async fn fetch(&self, fragment: &str) -> Result<Vec<u8>> {
        let path = self.root_dir.join("data").join(format!("{fragment}.json"));
        log::debug!("Reading feed from {}", path.display());

        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::feed(fragment, "feed file not found"))
            }
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_feed(root: &std::path::Path, name: &str, content: &str) {
        let dir = root.join("data");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(format!("{name}.json")), content).unwrap();
    }

    #[tokio::test]
    async fn test_dir_source_reads_and_parses() {
        let tmp = TempDir::new().unwrap();
        write_feed(
            tmp.path(),
            "facts",
            r#"[{"headline": "H", "text": "T"}]"#,
        );

        let source = DirFeedSource::new(tmp.path());
        let data = load_feed(&source, "facts").await.unwrap();
        match data {
            FeedData::Facts(facts) => assert_eq!(facts.len(), 1),
            other => panic!("unexpected feed data: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_dir_source_missing_feed_is_feed_error() {
        let tmp = TempDir::new().unwrap();
        let source = DirFeedSource::new(tmp.path());
        let err = load_feed(&source, "holiday").await.unwrap_err();
        assert!(matches!(err, AppError::Feed { .. }));
    }

    #[tokio::test]
    async fn test_unknown_fragment_parses_generically() {
        let tmp = TempDir::new().unwrap();
        write_feed(tmp.path(), "misc", r#"{"content": "hello"}"#);

        let source = DirFeedSource::new(tmp.path());
        let data = load_feed(&source, "misc").await.unwrap();
        assert!(matches!(data, FeedData::Other(_)));
    }

    #[tokio::test]
    async fn test_path_escaping_fragment_rejected() {
        let tmp = TempDir::new().unwrap();
        let source = DirFeedSource::new(tmp.path());
        assert!(load_feed(&source, "../secrets").await.is_err());
        assert!(load_feed(&source, "").await.is_err());
    }
}
