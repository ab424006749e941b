use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

// --- Catalog ---

/// One candidate from a catalog search.
#[derive(Clone, Debug, PartialEq)]
pub struct SongSummary {
    pub id: u64,
    pub title: String,
    pub artist: String,
    pub artwork_url: Option<String>,
    pub page_url: String,
    pub lyrics_complete: bool,
}

/// Song lookup result, before lyrics are attached.
#[derive(Clone, Debug, PartialEq)]
pub struct SongMetadata {
    pub id: u64,
    pub title: String,
    pub artist: String,
    pub artwork_url: Option<String>,
    pub page_url: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SongDetail {
    pub metadata: SongMetadata,
    pub lyrics: String,
}

// --- HTTP responses ---

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SearchHit {
    pub id: u64,
    pub title: String,
    pub artist: String,
    pub image: Option<String>,
    pub url: String,
    pub snippet: String,
}

impl From<SongSummary> for SearchHit {
    fn from(song: SongSummary) -> Self {
        let snippet = if song.lyrics_complete {
            "Lyrics available on Genius"
        } else {
            "Lyrics may be incomplete"
        };
        Self {
            id: song.id,
            title: song.title,
            artist: song.artist,
            image: song.artwork_url,
            url: song.page_url,
            snippet: snippet.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SongResponse {
    pub id: u64,
    pub title: String,
    pub artist: String,
    pub album_art: Option<String>,
    pub url: String,
    pub lyrics: String,
}

impl From<SongDetail> for SongResponse {
    fn from(song: SongDetail) -> Self {
        Self {
            id: song.metadata.id,
            title: song.metadata.title,
            artist: song.metadata.artist,
            album_art: song.metadata.artwork_url,
            url: song.metadata.page_url,
            lyrics: song.lyrics,
        }
    }
}

// --- Analysis ---

/// Emotions the model is asked to score, in display order.
pub const EMOTIONS: [&str; 7] = [
    "Alegría",
    "Tristeza",
    "Energía",
    "Nostalgia",
    "Amor",
    "Esperanza",
    "Soledad",
];

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AnalysisResult {
    pub sentiment: String,
    #[serde(rename = "temas", alias = "themes", default)]
    pub themes: Vec<String>,
    #[serde(rename = "estilo", alias = "style", default)]
    pub style: String,
    #[serde(deserialize_with = "emotion_scores", default)]
    pub emotions: BTreeMap<String, u8>,
}

// Models answer with floats, out-of-range numbers and extra names now and then.
fn emotion_scores<'de, D>(deserializer: D) -> Result<BTreeMap<String, u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, f64>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter(|(name, _)| EMOTIONS.contains(&name.as_str()))
        .map(|(name, score)| (name, score.round().clamp(0.0, 100.0) as u8))
        .collect())
}
