use async_trait::async_trait;
use scraper::{ElementRef, Html, Node, Selector};
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::normalize::normalize_lyrics;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

// --- HTML Fetching ---

/// Fetches the markup of a lyrics page.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

pub struct HttpPageFetcher {
    client: reqwest::Client,
}

impl HttpPageFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        info!("Fetching lyrics from URL: {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Upstream(format!(
                "Lyrics page request failed: {} ({})",
                status, url
            )));
        }
        let html = response.text().await?;
        debug!("HTML fetched, length: {}", html.len());
        Ok(html)
    }
}

// --- HTML Parsing ---

// Tried in order; the first selector that matches anything wins.
static CONTAINER_SELECTORS: LazyLock<[Selector; 2]> = LazyLock::new(|| {
    [
        Selector::parse(r#"[data-lyrics-container="true"]"#).unwrap(),
        // Older page layout
        Selector::parse("div.lyrics").unwrap(),
    ]
});

/// Pulls the lyric text out of a lyrics page.
///
/// Every `<br>` inside a container becomes `\n`, text of nested elements is
/// kept in document order, and multiple containers are joined with `\n`.
/// Returns an empty string when no container is found.
pub fn extract_lyrics(html: &str) -> String {
    let html_doc = Html::parse_document(html);

    let containers = CONTAINER_SELECTORS
        .iter()
        .map(|selector| html_doc.select(selector).collect::<Vec<_>>())
        .find(|matched| !matched.is_empty())
        .unwrap_or_default();

    debug!("Lyrics containers found: {}", containers.len());

    containers
        .into_iter()
        .map(container_text)
        .collect::<Vec<_>>()
        .join("\n")
}

fn container_text(container: ElementRef<'_>) -> String {
    let mut text = String::new();
    for node in container.descendants() {
        match node.value() {
            Node::Text(t) => text.push_str(t),
            Node::Element(element) if element.name() == "br" => text.push('\n'),
            _ => {}
        }
    }
    text
}

/// Extracts and cleans the lyrics of a page in one go.
pub fn lyrics_from_html(html: &str) -> String {
    let raw_lyrics = extract_lyrics(html);
    normalize_lyrics(&raw_lyrics)
}
