// src/scrape/types.rs
use anyhow::Result;

/// One scraped announcement. Produced fresh on every poll; only its
/// `identity()` outlives the cycle.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub attachment_link: Option<String>,
    pub external_link: Option<String>,
}

impl Notice {
    /// Deduplication key: `title|external|attachment`, with an absent link as
    /// an empty component. Persisted state keys off this exact shape, so it
    /// must stay stable across releases.
    pub fn identity(&self) -> String {
        format!(
            "{}|{}|{}",
            self.title,
            self.external_link.as_deref().unwrap_or_default(),
            self.attachment_link.as_deref().unwrap_or_default()
        )
    }
}

#[async_trait::async_trait]
pub trait NoticeSource: Send + Sync {
    async fn fetch_latest(&self) -> Result<Vec<Notice>>;
    fn name(&self) -> &'static str;
}
