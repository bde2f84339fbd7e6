//! HTTP text-generation client.
//!
//! Talks to hosted inference endpoints that accept
//! `{"inputs": ..., "parameters": {...}}` and answer with a JSON array whose
//! first element carries `summary_text` or `generated_text`.

use deck_core::{EnrichmentService, Error, ExpandParams, Result, SummarizeParams};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default time allowed for one generation request.
pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(60);

/// Endpoints and credentials for [`HttpEnricher`].
#[derive(Debug, Clone)]
pub struct EnricherConfig {
    /// Summarization endpoint. Summaries are unavailable when unset.
    pub summarize_url: Option<String>,

    /// Text-to-text endpoint used for expansion. Unavailable when unset.
    pub expand_url: Option<String>,

    /// Bearer token sent with every request.
    pub api_token: Option<String>,

    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for EnricherConfig {
    fn default() -> Self {
        Self {
            summarize_url: None,
            expand_url: None,
            api_token: None,
            timeout: DEFAULT_GENERATION_TIMEOUT,
        }
    }
}

impl EnricherConfig {
    /// Whether at least one endpoint is configured.
    pub fn is_configured(&self) -> bool {
        self.summarize_url.is_some() || self.expand_url.is_some()
    }
}

#[derive(Serialize)]
struct GenerationRequest<'a, P: Serialize> {
    inputs: &'a str,
    parameters: &'a P,
}

#[derive(Debug, Deserialize)]
struct GenerationOutput {
    #[serde(default)]
    summary_text: Option<String>,
    #[serde(default)]
    generated_text: Option<String>,
}

/// Enrichment service backed by HTTP inference endpoints.
pub struct HttpEnricher {
    client: Client,
    config: EnricherConfig,
}

impl HttpEnricher {
    /// Create a client for `config`.
    pub fn new(config: EnricherConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::HttpError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn generate<P: Serialize>(&self, url: &str, inputs: &str, parameters: &P) -> Result<String> {
        let mut request = self.client.post(url).json(&GenerationRequest { inputs, parameters });
        if let Some(token) = &self.config.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .map_err(|e| Error::EnrichmentFailed(format!("{}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(Error::EnrichmentFailed(format!(
                "{}: HTTP {}: {}",
                url,
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let body = response
            .text()
            .map_err(|e| Error::EnrichmentFailed(format!("{}: {}", url, e)))?;
        parse_generation(&body)
    }
}

impl EnrichmentService for HttpEnricher {
    fn summarize(&self, text: &str, params: &SummarizeParams) -> Result<String> {
        let url = self
            .config
            .summarize_url
            .as_deref()
            .ok_or(Error::EnrichmentUnavailable)?;
        self.generate(url, text, params)
    }

    fn expand(&self, prompt: &str, params: &ExpandParams) -> Result<String> {
        let url = self
            .config
            .expand_url
            .as_deref()
            .ok_or(Error::EnrichmentUnavailable)?;
        self.generate(url, prompt, params)
    }
}

/// Extract the generated text from an inference response body.
fn parse_generation(body: &str) -> Result<String> {
    let outputs: Vec<GenerationOutput> = serde_json::from_str(body)
        .map_err(|e| Error::EnrichmentFailed(format!("Unexpected response: {}", e)))?;

    outputs
        .into_iter()
        .next()
        .and_then(|o| o.summary_text.or(o.generated_text))
        .ok_or_else(|| Error::EnrichmentFailed("Response carried no text".to_string()))
}
