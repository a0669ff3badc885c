//! `/ask` command: answer a question from wiki pages
//!
//! Searches the wiki, fetches each hit's page, and hands the pages to the
//! chat model as numbered documents. Long answers are split into several
//! messages on paragraph boundaries.

use tracing::{info, warn};

use super::Reply;
use crate::chat::{ChatClient, ChatError};
use crate::wiki::{SearchHit, WikiClient};

pub const NO_ANSWER_MESSAGE: &str = "AI couldn't form an answer from docs.";
pub const ASK_FAILED_MESSAGE: &str = "Unexpected error processing /ask.";

/// Longest message the chat platform accepts from us
pub const MAX_MESSAGE_LEN: usize = 1900;

/// Characters of search preview kept per document
pub const PREVIEW_LIMIT: usize = 400;

/// Characters of page body kept per document
pub const BODY_LIMIT: usize = 2500;

pub fn no_knowledge_message(question: &str) -> String {
    format!("No knowledge base results for '{}'.", question)
}

pub async fn ask_reply(wiki: &WikiClient, chat: &ChatClient, question: &str) -> Reply {
    let results = match wiki.search(question).await {
        Ok(results) if !results.hits.is_empty() => results,
        Ok(_) => {
            info!("/ask {:?} => no results", question);
            return Reply::text(no_knowledge_message(question));
        }
        Err(err) => {
            warn!("/ask {:?} search failed: {}", question, err);
            return Reply::text(no_knowledge_message(question));
        }
    };

    let mut documents = Vec::with_capacity(results.hits.len());
    for hit in &results.hits {
        match wiki.page_html(&hit.url).await {
            Ok(html) => documents.push(build_document(hit, &html)),
            Err(err) => warn!("/ask skipping {}: {}", hit.url, err),
        }
    }

    match chat.ask_with_documents(question, &documents).await {
        Ok(answer) if !answer.trim().is_empty() => {
            info!(
                "/ask {:?} => answered from {} documents",
                question,
                documents.len()
            );
            Reply::chunked(split_message(&answer))
        }
        Ok(_) | Err(ChatError::EmptyResponse) => {
            info!("/ask {:?} => no AI answer", question);
            Reply::text(NO_ANSWER_MESSAGE)
        }
        Err(err) => {
            warn!("/ask {:?} failed: {}", question, err);
            Reply::text(ASK_FAILED_MESSAGE)
        }
    }
}

/// One context document: title, link, optional preview, then the page body
pub fn build_document(hit: &SearchHit, html: &str) -> String {
    let mut document = format!("Title: {}\nURL: {}", hit.name, hit.url);
    if !hit.preview.trim().is_empty() {
        document.push_str("\nPreview: ");
        document.push_str(&truncate(&hit.preview, PREVIEW_LIMIT));
    }
    document.push_str("\n\n");
    document.push_str(&truncate(html, BODY_LIMIT));
    document
}

/// Cut `text` to `limit` characters, marking the cut with an ellipsis
fn truncate(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((end, _)) => format!("{}…", &text[..end]),
        None => text.to_string(),
    }
}

/// Split an answer into messages of at most [`MAX_MESSAGE_LEN`] characters
///
/// Paragraphs are packed together while they fit; a paragraph that is too
/// long on its own is cut into fixed-size slices. Blank paragraphs are
/// dropped.
pub fn split_message(text: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for paragraph in text.split("\n\n") {
        let block = paragraph.trim_end();
        let block_len = block.chars().count();
        if block_len == 0 {
            continue;
        }

        if current_len > 0 && current_len + block_len + 2 > MAX_MESSAGE_LEN {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if block_len > MAX_MESSAGE_LEN {
            let chars: Vec<char> = block.chars().collect();
            chunks.extend(
                chars
                    .chunks(MAX_MESSAGE_LEN)
                    .map(|slice| slice.iter().collect::<String>()),
            );
        } else {
            if current_len > 0 {
                current.push_str("\n\n");
                current_len += 2;
            }
            current.push_str(block);
            current_len += block_len;
        }
    }

    if current_len > 0 {
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(preview: &str) -> SearchHit {
        SearchHit {
            name: "Sasha".to_string(),
            url: "https://wiki.example/page/sasha".to_string(),
            preview: preview.to_string(),
        }
    }

    #[test]
    fn test_document_with_preview() {
        assert_eq!(
            build_document(&hit("A **bard**"), "<p>Sings</p>"),
            "Title: Sasha\nURL: https://wiki.example/page/sasha\nPreview: A **bard**\n\n<p>Sings</p>"
        );
    }

    #[test]
    fn test_document_without_preview() {
        assert_eq!(
            build_document(&hit("  "), "body"),
            "Title: Sasha\nURL: https://wiki.example/page/sasha\n\nbody"
        );
    }

    #[test]
    fn test_document_truncation() {
        let preview = "p".repeat(PREVIEW_LIMIT + 10);
        let body = "é".repeat(BODY_LIMIT + 1);
        let document = build_document(&hit(&preview), &body);

        let expected_preview = format!("Preview: {}…\n", "p".repeat(PREVIEW_LIMIT));
        assert!(document.contains(&expected_preview));
        assert!(document.ends_with(&format!("\n\n{}…", "é".repeat(BODY_LIMIT))));

        let exact = build_document(&hit(""), &"b".repeat(BODY_LIMIT));
        assert!(!exact.ends_with('…'));
    }

    #[test]
    fn test_split_short_answer() {
        assert_eq!(
            split_message("First.\n\nSecond.  \n\n\n\nThird."),
            vec!["First.\n\nSecond.\n\nThird.".to_string()]
        );
        assert!(split_message("").is_empty());
    }

    #[test]
    fn test_split_on_paragraphs() {
        let a = "a".repeat(1000);
        let b = "b".repeat(1000);
        let c = "c".repeat(800);
        let chunks = split_message(&format!("{}\n\n{}\n\n{}", a, b, c));

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], a);
        assert_eq!(chunks[1], format!("{}\n\n{}", b, c));
        assert!(chunks
            .iter()
            .all(|chunk| chunk.chars().count() <= MAX_MESSAGE_LEN));
    }

    #[test]
    fn test_split_oversized_paragraph() {
        let long = "x".repeat(MAX_MESSAGE_LEN * 2 + 5);
        let chunks = split_message(&format!("intro\n\n{}\n\noutro", long));

        assert_eq!(chunks.len(), 5);
        assert_eq!(chunks[0], "intro");
        assert_eq!(chunks[1].len(), MAX_MESSAGE_LEN);
        assert_eq!(chunks[2].len(), MAX_MESSAGE_LEN);
        assert_eq!(chunks[3], "xxxxx");
        assert_eq!(chunks[4], "outro");
    }
}
