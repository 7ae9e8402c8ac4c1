use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, instrument};

use crate::{ExtractionResult, ExtractionStatus, Heading};

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const GENERATION_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("generation request timed out")]
    Timeout,

    #[error("generation API returned {status}: {body}")]
    Api { status: StatusCode, body: String },

    #[error("generation API returned no candidates")]
    EmptyResponse,

    #[error("generation request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl AssistantError {
    /// What the chat user sees. Causes stay in the logs.
    pub fn user_message(&self) -> &'static str {
        match self {
            AssistantError::Timeout => "Request timeout. Please try again.",
            AssistantError::Api { .. } => {
                "Sorry, I encountered an API error. Please try again later."
            }
            AssistantError::EmptyResponse => {
                "Sorry, I couldn't generate a response. Please try again."
            }
            AssistantError::Request(_) => {
                "Sorry, I encountered an unexpected error. Please try again."
            }
        }
    }
}

/// Answers a question about an extracted page.
#[async_trait]
pub trait ReplyGenerator: Send + Sync {
    async fn reply(&self, page: &ExtractionResult, message: &str)
        -> Result<String, AssistantError>;
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: GENERATION_TIMEOUT,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    top_k: u32,
    top_p: f64,
    max_output_tokens: u32,
}

const GENERATION_CONFIG: GenerationConfig = GenerationConfig {
    temperature: 0.7,
    top_k: 40,
    top_p: 0.95,
    max_output_tokens: 1024,
};

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

/// Single-turn client for the Gemini `generateContent` endpoint. No retry.
pub struct GeminiAssistant {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiAssistant {
    pub fn new(config: GeminiConfig) -> Result<Self, AssistantError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl ReplyGenerator for GeminiAssistant {
    #[instrument(skip(self, page, message), fields(url = %page.url, model = %self.config.model))]
    async fn reply(
        &self,
        page: &ExtractionResult,
        message: &str,
    ) -> Result<String, AssistantError> {
        let payload = json!({
            "contents": [{ "parts": [{ "text": build_prompt(page, message) }] }],
            "generationConfig": GENERATION_CONFIG,
        });

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", &self.config.api_key)])
            .json(&payload)
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            error!(%status, %body, "Gemini API error");
            return Err(AssistantError::Api { status, body });
        }

        let parsed: GenerateResponse = response.json().await.map_err(classify_transport)?;
        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or(AssistantError::EmptyResponse)?;

        debug!(chars = text.len(), "received reply");
        Ok(text)
    }
}

fn classify_transport(err: reqwest::Error) -> AssistantError {
    if err.is_timeout() {
        AssistantError::Timeout
    } else {
        error!(error = %err, "Chat error");
        AssistantError::Request(err)
    }
}

/// Renders headings as a markdown-style outline.
pub fn format_headings(headings: &[Heading]) -> String {
    if headings.is_empty() {
        return "No headings found.".to_string();
    }
    headings
        .iter()
        .map(|h| format!("{} {}", "#".repeat(h.level as usize), h.text))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_prompt(page: &ExtractionResult, message: &str) -> String {
    let status = match page.status {
        ExtractionStatus::Success => "success",
        ExtractionStatus::Error => "error",
    };
    format!(
        "\nYou are an AI assistant specialized in webpage analysis. You have analyzed the following webpage:\n\
         \n\
         **Webpage Information:**\n\
         - Title: {title}\n\
         - URL: {url}\n\
         - Description: {description}\n\
         - Keywords: {keywords}\n\
         - Word Count: {word_count}\n\
         - Status: {status}\n\
         \n\
         **Content Structure:**\n\
         {headings}\n\
         \n\
         **Main Content:**\n\
         {content}\n\
         \n\
         **User Question:** {message}\n\
         \n\
         Please provide a helpful, accurate, and detailed response based on the webpage content above. \
         If the question is about SEO, performance, content quality, or technical aspects, \
         provide specific insights and recommendations.\n",
        title = page.title,
        url = page.url,
        description = page.description,
        keywords = page.keywords,
        word_count = page.word_count,
        headings = format_headings(&page.headings),
        content = page.content,
    )
}
