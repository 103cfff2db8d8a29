use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::DescriptionError;

pub const MISSING_KEY_MESSAGE: &str =
    "Please configure your Gemini API Key to generate descriptions automatically.";
pub const FAILURE_MESSAGE: &str =
    "Error connecting to AI service. Please write a description manually.";
pub const EMPTY_MESSAGE: &str = "Could not generate description.";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// What the copywriter is told about a listing.
#[derive(Debug, Clone)]
pub struct ListingBrief<'a> {
    pub title: &'a str,
    pub property_type: &'a str,
    pub features: &'a [String],
    pub location: &'a str,
}

/// Writes promotional listing descriptions with Gemini.
///
/// [`generate`](Self::generate) always yields text: a fixed placeholder when
/// no API key is configured and a "write it manually" message when the call
/// fails.
#[derive(Clone)]
pub struct DescriptionGenerator {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl DescriptionGenerator {
    pub fn new(
        api_key: Option<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, DescriptionError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent("jamii-store")
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            model: model.into(),
            base_url: base_url.into(),
        })
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }

    pub async fn generate(&self, brief: &ListingBrief<'_>) -> String {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!("no Gemini API key configured");
            return MISSING_KEY_MESSAGE.to_string();
        };

        match self.request(api_key, &prompt(brief)).await {
            Ok(text) => text,
            Err(DescriptionError::EmptyResponse) => EMPTY_MESSAGE.to_string(),
            Err(err) => {
                warn!(error = %err, "description generation failed");
                FAILURE_MESSAGE.to_string()
            }
        }
    }

    async fn request(&self, api_key: &str, prompt: &str) -> Result<String, DescriptionError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );
        debug!(%url, "requesting listing description");

        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response: GenerateResponse = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let text = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<String>()
            })
            .unwrap_or_default();

        let text = text.trim();
        if text.is_empty() {
            Err(DescriptionError::EmptyResponse)
        } else {
            Ok(text.to_string())
        }
    }
}

fn prompt(brief: &ListingBrief<'_>) -> String {
    format!(
        "Write a catchy, professional, and appealing description for a rental property listing.\n\
         Maximize the appeal for potential tenants. Keep it under 100 words.\n\
         \n\
         Details:\n\
         Title: {}\n\
         Type: {}\n\
         Location: {}\n\
         Key Features: {}\n",
        brief.title,
        brief.property_type,
        brief.location,
        brief.features.join(", "),
    )
}

// ── Gemini wire types ──

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}
