//! Page metadata fetching
//!
//! Fetches title and description from URLs when adding bookmarks.

use anyhow::Result;
use scraper::{Html, Selector};
use std::time::Duration;

/// Metadata extracted from a page
#[derive(Debug, Clone, Default)]
pub struct PageMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Fetch timeout in seconds
const FETCH_TIMEOUT: u64 = 10;

/// Fetch metadata from a URL (async)
///
/// Returns empty metadata on any failure (graceful degradation).
pub async fn fetch_metadata(url: &str) -> PageMetadata {
    fetch_metadata_inner(url).await.unwrap_or_default()
}

/// Inner fetch function that can fail
async fn fetch_metadata_inner(url: &str) -> Result<PageMetadata> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(FETCH_TIMEOUT))
        .user_agent("Mozilla/5.0 (compatible; marks/1.0)")
        .build()?;

    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        return Ok(PageMetadata::default());
    }

    let html = response.text().await?;
    Ok(parse_metadata(&html))
}

/// Parse metadata from HTML content
fn parse_metadata(html: &str) -> PageMetadata {
    let document = Html::parse_document(html);

    PageMetadata {
        title: extract_title(&document),
        description: extract_description(&document),
    }
}

/// Extract title from HTML
fn extract_title(document: &Html) -> Option<String> {
    // Try og:title first
    if let Some(og_title) = extract_meta_content(document, "og:title") {
        return Some(og_title);
    }

    // Fall back to <title> tag
    let selector = Selector::parse("title").ok()?;
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extract description from HTML
fn extract_description(document: &Html) -> Option<String> {
    // Try og:description first
    if let Some(og_desc) = extract_meta_content(document, "og:description") {
        return Some(og_desc);
    }

    // Fall back to meta description
    let selector = Selector::parse(r#"meta[name="description"]"#).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extract content from a meta tag by property or name
fn extract_meta_content(document: &Html, property: &str) -> Option<String> {
    // Try property attribute (for Open Graph)
    let property_selector = format!(r#"meta[property="{}"]"#, property);
    if let Ok(selector) = Selector::parse(&property_selector) {
        if let Some(el) = document.select(&selector).next() {
            if let Some(content) = el.value().attr("content") {
                let content = content.trim();
                if !content.is_empty() {
                    return Some(content.to_string());
                }
            }
        }
    }

    // Try name attribute
    let name_selector = format!(r#"meta[name="{}"]"#, property);
    if let Ok(selector) = Selector::parse(&name_selector) {
        if let Some(el) = document.select(&selector).next() {
            if let Some(content) = el.value().attr("content") {
                let content = content.trim();
                if !content.is_empty() {
                    return Some(content.to_string());
                }
            }
        }
    }

    None
}
