//! Video search by scraping the public results page.
//!
//! The results page embeds its data as a JavaScript assignment:
//!
//! ```text
//! var ytInitialData = {...};</script>
//! ```
//!
//! The JSON is walked along
//! `contents.twoColumnSearchResultsRenderer.primaryContents.sectionListRenderer.contents[]
//! .itemSectionRenderer.contents[].videoRenderer`.  When the blob is missing
//! or the walk yields nothing, the raw page is scanned for `"videoId"` values
//! instead, which keeps working across most markup changes but loses the
//! title and channel.

use std::collections::HashSet;
use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;
use tracing::debug;
use tvremote_core::VideoResult;

use crate::application::smart_search::VideoSearch;

const RESULTS_URL: &str = "https://www.youtube.com/results";
const INITIAL_DATA_MARKERS: &[&str] = &["var ytInitialData = ", "window[\"ytInitialData\"] = "];

/// [`VideoSearch`] over `reqwest`.
#[derive(Debug, Clone)]
pub struct VideoSearchClient {
    client: reqwest::Client,
    user_agent: String,
    limit: usize,
}

impl VideoSearchClient {
    /// # Errors
    ///
    /// Fails only if the HTTP client cannot be built.
    pub fn new(
        user_agent: impl Into<String>,
        limit: usize,
        request_timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(request_timeout).build()?;
        Ok(Self {
            client,
            user_agent: user_agent.into(),
            limit,
        })
    }

    async fn fetch_page(&self, term: &str) -> Result<String, reqwest::Error> {
        self.client
            .get(RESULTS_URL)
            .query(&[("search_query", term)])
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US")
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }
}

#[async_trait]
impl VideoSearch for VideoSearchClient {
    async fn search(&self, term: &str) -> Vec<VideoResult> {
        match self.fetch_page(term).await {
            Ok(html) => {
                let results = parse_results_page(&html, self.limit);
                debug!("video search {term:?}: {} result(s)", results.len());
                results
            }
            Err(e) => {
                debug!("video search {term:?} failed: {e}");
                Vec::new()
            }
        }
    }
}

/// Extracts up to `limit` results from a results page, in page order.
pub fn parse_results_page(html: &str, limit: usize) -> Vec<VideoResult> {
    let from_blob = extract_initial_data(html)
        .map(|data| walk_video_renderers(&data, limit))
        .unwrap_or_default();
    if !from_blob.is_empty() {
        return from_blob;
    }
    scan_video_ids(html, limit)
}

/// Parses the `ytInitialData` JSON object out of the page.
pub fn extract_initial_data(html: &str) -> Option<Value> {
    let start = INITIAL_DATA_MARKERS
        .iter()
        .find_map(|marker| html.find(marker).map(|at| at + marker.len()))?;
    let rest = &html[start..];
    // The object is followed by `;</script>`; a streaming parse stops at the
    // end of the first complete value regardless.
    let mut stream = serde_json::Deserializer::from_str(rest).into_iter::<Value>();
    match stream.next() {
        Some(Ok(value)) if value.is_object() => Some(value),
        _ => None,
    }
}

fn walk_video_renderers(data: &Value, limit: usize) -> Vec<VideoResult> {
    let sections = data
        .pointer("/contents/twoColumnSearchResultsRenderer/primaryContents/sectionListRenderer/contents")
        .and_then(Value::as_array);

    sections
        .into_iter()
        .flatten()
        .filter_map(|section| {
            section
                .pointer("/itemSectionRenderer/contents")
                .and_then(Value::as_array)
        })
        .flatten()
        .filter_map(|item| item.get("videoRenderer"))
        .filter_map(video_from_renderer)
        .take(limit)
        .collect()
}

fn video_from_renderer(renderer: &Value) -> Option<VideoResult> {
    let first_run = |key: &str| {
        renderer
            .pointer(&format!("/{key}/runs/0/text"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    Some(VideoResult {
        id: renderer.get("videoId")?.as_str()?.to_string(),
        title: first_run("title"),
        channel: first_run("ownerText"),
    })
}

fn video_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#""videoId":"([A-Za-z0-9_-]{11})""#).expect("video id pattern is valid")
    })
}

/// Fallback: every distinct `"videoId":"…"` in page order, without metadata.
pub fn scan_video_ids(html: &str, limit: usize) -> Vec<VideoResult> {
    let mut seen = HashSet::new();
    video_id_pattern()
        .captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|id| seen.insert(*id))
        .take(limit)
        .map(|id| VideoResult {
            id: id.to_string(),
            title: String::new(),
            channel: String::new(),
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
