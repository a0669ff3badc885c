//! BookStack wiki search
//!
//! Thin client for the `/search` endpoint and page fetches, plus the preview
//! clean-up that turns BookStack's highlight HTML into chat markdown.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::WikiConfig;

#[derive(Debug, Error)]
pub enum WikiError {
    #[error("wiki request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("wiki returned {0}")]
    Status(StatusCode),
}

/// One search hit, ready to render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub name: String,
    pub url: String,
    /// Cleaned preview text; may be empty
    pub preview: String,
}

/// A page of search hits plus the total match count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResults {
    pub total: u64,
    pub hits: Vec<SearchHit>,
}

impl SearchResults {
    /// Hint shown when more matches exist than were returned
    pub fn summary(&self, page_size: u32) -> String {
        if self.total > u64::from(page_size) {
            let shown = self.hits.len().min(page_size as usize);
            format!(
                "Showing {} of {} wiki results. Consider a more specific search!",
                shown, self.total
            )
        } else {
            String::new()
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    total: u64,
    data: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    name: String,
    url: String,
    #[serde(default)]
    preview_html: Option<PreviewHtml>,
}

#[derive(Debug, Deserialize)]
struct PreviewHtml {
    #[serde(default)]
    content: String,
}

/// BookStack API client
#[derive(Debug, Clone)]
pub struct WikiClient {
    client: Client,
    base_url: String,
    auth_header: String,
    page_size: u32,
}

impl WikiClient {
    pub fn new(config: &WikiConfig) -> Result<Self, WikiError> {
        let client = Client::builder().timeout(Duration::from_secs(15)).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth_header: format!("Token {}:{}", config.api_id, config.api_key),
            page_size: config.page_size,
        })
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Search the wiki, first page only
    pub async fn search(&self, query: &str) -> Result<SearchResults, WikiError> {
        debug!("Searching wiki for {:?}", query);

        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .header("Authorization", &self.auth_header)
            .query(&[
                ("query", query.to_string()),
                ("page", "1".to_string()),
                ("count", self.page_size.to_string()),
            ])
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            warn!("Wiki search failed: {}", response.status());
            return Err(WikiError::Status(response.status()));
        }

        let body: SearchResponse = response.json().await?;
        let hits = body
            .data
            .into_iter()
            .take(self.page_size as usize)
            .map(|item| SearchHit {
                preview: item
                    .preview_html
                    .map(|p| clean_preview(&p.content))
                    .unwrap_or_default(),
                name: item.name,
                url: item.url,
            })
            .collect();

        Ok(SearchResults {
            total: body.total,
            hits,
        })
    }

    /// Fetch the raw HTML of a page by its URL
    pub async fn page_html(&self, url: &str) -> Result<String, WikiError> {
        debug!("Fetching wiki page {}", url);

        let response = self
            .client
            .get(url)
            .header("Authorization", &self.auth_header)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            warn!("Wiki page fetch failed for {}: {}", url, response.status());
            return Err(WikiError::Status(response.status()));
        }

        Ok(response.text().await?)
    }
}

static IMG_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<img[^>]*>").unwrap());
static NEWLINE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{2,}").unwrap());
static BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*\n\s*\n\s*").unwrap());

/// Convert BookStack preview HTML into chat markdown
pub fn clean_preview(html: &str) -> String {
    let text = html
        .replace("<strong>", "**")
        .replace("</strong>", "**")
        .replace("<u>", "__")
        .replace("</u>", "__");
    let text = IMG_TAG.replace_all(&text, "");
    let text = NEWLINE_RUN.replace_all(&text, "\n");
    BLANK_LINES.replace_all(&text, "\n").into_owned()
}
