//! `/search` command

use tracing::{info, warn};

use super::{Embed, Reply};
use crate::wiki::{SearchResults, WikiClient};

pub const NO_RESULTS_MESSAGE: &str = "No results found.";
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch results.";

/// Embed accent colour (teal)
pub const EMBED_COLOR: u32 = 0x008080;

pub async fn search_reply(wiki: &WikiClient, query: &str) -> Reply {
    match wiki.search(query).await {
        Ok(results) => {
            info!("/search {:?} => {} results", query, results.total);
            results_reply(&results, wiki.page_size())
        }
        Err(err) => {
            warn!("/search {:?} failed: {}", query, err);
            Reply::text(FETCH_FAILED_MESSAGE)
        }
    }
}

/// Render search results as embeds
pub fn results_reply(results: &SearchResults, page_size: u32) -> Reply {
    if results.total == 0 || results.hits.is_empty() {
        return Reply::text(NO_RESULTS_MESSAGE);
    }

    let embeds = results
        .hits
        .iter()
        .take(page_size as usize)
        .map(|hit| Embed {
            title: hit.name.clone(),
            url: hit.url.clone(),
            description: hit.preview.clone(),
            color: EMBED_COLOR,
        })
        .collect();

    Reply {
        content: results.summary(page_size),
        embeds,
        followups: Vec::new(),
        ephemeral: false,
    }
}
