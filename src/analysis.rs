//! Lyric analysis through a generative language model.
//!
//! [`Analyzer`] owns the prompt and the reply parsing; the model itself sits
//! behind [`LanguageModel`] so it can be swapped for Gemini or a test double.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{AnalysisResult, EMOTIONS};

pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_MAX_CHARS: usize = 3000;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// A model that answers one prompt with free text.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    fn name(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<String>;
}

// --- Gemini ---

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

impl GenerateResponse {
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        Some(content.parts.into_iter().map(|p| p.text).collect())
    }
}

/// Google Gemini `generateContent` client.
pub struct GeminiModel {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiModel {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
        })
    }
}

#[async_trait]
impl LanguageModel for GeminiModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Upstream("GEMINI_API_KEY is not configured".to_string()))?;

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        debug!(model = %self.model, prompt_len = prompt.len(), "Sending generateContent request");

        // Key goes in a header so it never shows up in a request URL
        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, api_key)
            .json(&request)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Upstream(format!(
                "Gemini request failed ({}): {}",
                status, body
            )));
        }

        let reply: GenerateResponse = response
            .json()
            .await
            .map_err(reqwest::Error::without_url)?;
        reply
            .into_text()
            .ok_or_else(|| Error::Upstream("Gemini returned no candidates".to_string()))
    }
}

// --- Analyzer ---

pub struct Analyzer {
    model: Arc<dyn LanguageModel>,
    max_chars: usize,
}

impl Analyzer {
    pub fn new(model: Arc<dyn LanguageModel>, max_chars: usize) -> Self {
        Self { model, max_chars }
    }

    /// Sends the first `max_chars` characters of `lyrics` to the model and
    /// parses its reply.
    pub async fn analyze(&self, lyrics: &str) -> Result<AnalysisResult> {
        let prompt = build_prompt(truncate_chars(lyrics, self.max_chars));
        let reply = self.model.generate(&prompt).await?;
        debug!(model = self.model.name(), reply_len = reply.len(), "Model replied");
        parse_reply(&reply)
    }
}

pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

fn build_prompt(lyrics: &str) -> String {
    let emotions = EMOTIONS
        .iter()
        .map(|name| format!("    \"{}\": número (0-100)", name))
        .collect::<Vec<_>>()
        .join(",\n");

    format!(
        r#"Analiza el contenido emocional de la siguiente letra de canción.
Devuelve SOLO un objeto JSON VÁLIDO con esta estructura (no añadas markdown, solo el JSON):
{{
  "sentiment": "Una frase corta describiendo la vibra principal (en español)",
  "temas": ["Tema 1", "Tema 2", "Tema 3"],
  "estilo": "Breve análisis (1 frase) sobre el estilo lingüístico (rimas, metáforas, complejidad)",
  "emotions": {{
{emotions}
  }}
}}

Letra:
{lyrics}
"#
    )
}

/// Removes markdown code fences some models wrap their JSON in.
pub fn strip_code_fences(reply: &str) -> String {
    reply.replace("```json", "").replace("```", "").trim().to_string()
}

pub fn parse_reply(reply: &str) -> Result<AnalysisResult> {
    let json = strip_code_fences(reply);
    Ok(serde_json::from_str(&json)?)
}
