use anyhow::{Context, Result};
use async_trait::async_trait;
use url::Url;

use crate::scrape::extract_notices;
use crate::scrape::types::{Notice, NoticeSource};

/// Live notice-board page. Fetches the listing and runs the extraction policy
/// over it; any network or HTTP failure surfaces as an error and the watch
/// loop treats that cycle as "no new notices".
pub struct NoticeBoardSource {
    url: Url,
    keyword: String,
    limit: usize,
    client: reqwest::Client,
}

impl NoticeBoardSource {
    pub fn new(url: Url, keyword: impl Into<String>, limit: usize) -> Self {
        Self {
            url,
            keyword: keyword.into(),
            limit,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl NoticeSource for NoticeBoardSource {
    async fn fetch_latest(&self) -> Result<Vec<Notice>> {
        let resp = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .context("fetching notice board")?;
        let body = resp
            .error_for_status()
            .context("notice board returned an error status")?
            .text()
            .await
            .context("reading notice board body")?;
        Ok(extract_notices(&body, &self.url, &self.keyword, self.limit))
    }

    fn name(&self) -> &'static str {
        "notice-board"
    }
}
