//! # Narrative Collaborator
//!
//! AI-written consultant prose for a finished estimate. The generator sits
//! behind a trait so report assembly never knows whether it is talking to the
//! Gemini OpenAI-compatible endpoint or a test double. Failures never reach
//! the caller's output: report assembly swaps in [`ANALYSIS_FALLBACK`].

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::NarrativeConfig;
use crate::domain::{EstimationConfig, EstimationResult, RoofGeometry};

/// Shown in place of the analysis when the generator fails outright.
pub const ANALYSIS_FALLBACK: &str = "The expert analysis is currently unavailable.";

/// Shown when the generator answers successfully but with no text.
pub const EMPTY_ANALYSIS: &str = "Unable to generate analysis at this time.";

/// Produces the consultant analysis paragraph(s) for an estimate.
#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    async fn analysis(
        &self,
        roof: &RoofGeometry,
        config: &EstimationConfig,
        result: &EstimationResult,
    ) -> Result<String>;
}

/// The consultation prompt sent to the model. The estimate must already be
/// computed; nothing in here re-derives a figure.
pub fn consultation_prompt(
    roof: &RoofGeometry,
    config: &EstimationConfig,
    result: &EstimationResult,
) -> String {
    format!(
        "Act as a professional solar energy consultant. Based on the following data for a \
         residential property, provide a concise, encouraging 3-paragraph summary of the \
         project's potential.\n\
         \n\
         Property Details:\n\
         - Roof Area: {:.1} m²\n\
         - Suggested System Size: {:.1} kW\n\
         - Panel Count: {}\n\
         - Orientation: {}\n\
         \n\
         Financial Outlook:\n\
         - Estimated ROI: {} years\n\
         - Monthly Savings: ${:.2}\n\
         - Local Electricity Rate: ${}/kWh\n\
         \n\
         In your response:\n\
         1. Comment on the system size appropriateness for the roof area.\n\
         2. Give advice on best placement (e.g., if South-facing is better, etc).\n\
         3. Provide a concluding thought on the long-term environmental impact.\n\
         \n\
         Keep it professional and readable. Use markdown.",
        roof.area_m2,
        result.system_size_kw,
        result.panel_count,
        roof.orientation,
        result.roi_years,
        result.monthly_savings,
        config.electricity_rate,
    )
}

/// Gemini-backed generator speaking the OpenAI-compatible chat-completions
/// dialect.
#[derive(Clone)]
pub struct GeminiNarrativeGenerator {
    config: NarrativeConfig,
    client: reqwest::Client,
}

impl GeminiNarrativeGenerator {
    pub fn new(config: NarrativeConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("solar-quote-engine/0.1"));
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_seconds))
            .default_headers(headers)
            .build()?;
        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl NarrativeGenerator for GeminiNarrativeGenerator {
    async fn analysis(
        &self,
        roof: &RoofGeometry,
        config: &EstimationConfig,
        result: &EstimationResult,
    ) -> Result<String> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: consultation_prompt(roof, config, result),
            }],
            temperature: self.config.temperature,
        };

        let mut builder = self.client.post(self.completions_url()).json(&request);
        if !self.config.api_key.is_empty() {
            builder = builder
                .header("Authorization", format!("Bearer {}", self.config.api_key))
                .header("x-goog-api-key", &self.config.api_key);
        }

        let resp = builder.send().await.context("narrative POST failed")?;
        let status = resp.status();
        let body = resp.text().await.context("narrative read failed")?;
        if !status.is_success() {
            anyhow::bail!("narrative API error: HTTP {status}: {body}");
        }

        let parsed: ChatResponse =
            serde_json::from_str(&body).context("narrative JSON parse failed")?;
        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Ok(EMPTY_ANALYSIS.to_string());
        }
        Ok(text)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}
