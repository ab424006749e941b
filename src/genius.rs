use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::error::{Error, Result};
use crate::models::{SongMetadata, SongSummary};

pub const DEFAULT_API_URL: &str = "https://api.genius.com";

/// Song catalog lookups.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Free-text search, results in catalog order.
    async fn search(&self, query: &str) -> Result<Vec<SongSummary>>;

    async fn song(&self, id: &str) -> Result<SongMetadata>;
}

// --- Genius API payloads ---

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    response: T,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: Vec<SearchHitPayload>,
}

#[derive(Debug, Deserialize)]
struct SearchHitPayload {
    result: SongPayload,
}

#[derive(Debug, Deserialize)]
struct SongResponse {
    song: SongPayload,
}

#[derive(Debug, Deserialize)]
struct ArtistPayload {
    name: String,
}

#[derive(Debug, Deserialize)]
struct SongPayload {
    id: u64,
    title: String,
    primary_artist: ArtistPayload,
    url: String,
    #[serde(default)]
    song_art_image_url: Option<String>,
    #[serde(default)]
    song_art_image_thumbnail_url: Option<String>,
    #[serde(default)]
    lyrics_state: Option<String>,
}

impl From<SongPayload> for SongSummary {
    fn from(song: SongPayload) -> Self {
        Self {
            id: song.id,
            title: song.title,
            artist: song.primary_artist.name,
            artwork_url: song.song_art_image_thumbnail_url,
            page_url: song.url,
            lyrics_complete: song.lyrics_state.as_deref() == Some("complete"),
        }
    }
}

impl From<SongPayload> for SongMetadata {
    fn from(song: SongPayload) -> Self {
        Self {
            id: song.id,
            title: song.title,
            artist: song.primary_artist.name,
            artwork_url: song.song_art_image_url,
            page_url: song.url,
        }
    }
}

// --- Client ---

pub struct GeniusClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl GeniusClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    fn token(&self) -> Result<&str> {
        self.token
            .as_deref()
            .ok_or_else(|| Error::Upstream("GENIUS_API_KEY is not configured".to_string()))
    }

    async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<reqwest::Response> {
        let token = self.token()?;
        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await?;
        Ok(response)
    }
}

#[async_trait]
impl CatalogClient for GeniusClient {
    async fn search(&self, query: &str) -> Result<Vec<SongSummary>> {
        let url = format!("{}/search", self.base_url);
        let response = self.get(&url, &[("q", query)]).await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Genius API Error Status: {}", status);
            error!("Genius API Error Body: {}", body);
            return Err(Error::Upstream(format!("Genius search failed: {}", status)));
        }

        let envelope: Envelope<SearchResponse> = response.json().await?;
        let songs: Vec<SongSummary> = envelope
            .response
            .hits
            .into_iter()
            .map(|hit| hit.result.into())
            .collect();
        info!("Genius search for {:?} returned {} hits", query, songs.len());
        Ok(songs)
    }

    async fn song(&self, id: &str) -> Result<SongMetadata> {
        let url = format!("{}/songs/{}", self.base_url, urlencoding::encode(id));
        let response = self.get(&url, &[]).await?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::NOT_FOUND => {
                return Err(Error::NotFound(format!("Song {} not found", id)));
            }
            status => {
                return Err(Error::Upstream(format!(
                    "Failed to fetch song info: {}",
                    status
                )));
            }
        }

        let envelope: Envelope<SongResponse> = response.json().await?;
        debug!("Genius song {} resolved to {}", id, envelope.response.song.url);
        Ok(envelope.response.song.into())
    }
}
