//! Content enrichment policy.
//!
//! Short content is expanded, long content is summarized, and content in
//! between is used as-is. The text-generation backend sits behind the
//! [`EnrichmentService`] trait; any failure falls back to the scrubbed input.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::scrub::scrub;

/// Returned for missing content.
pub const CONTENT_NOT_AVAILABLE: &str = "Content not available.";

/// Prepended to short content before it is sent for expansion.
pub const EXPAND_INSTRUCTION: &str = "Provide a more detailed explanation: ";

/// Content shorter than this (in characters) is expanded.
pub const EXPAND_BELOW: usize = 80;

/// Content longer than this (in characters) is summarized.
pub const SUMMARIZE_ABOVE: usize = 100;

/// An expansion must be more than this many characters longer than its input.
pub const MIN_EXPANSION_GAIN: usize = 8;

/// Generation parameters for summarization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummarizeParams {
    pub max_length: u32,
    pub min_length: u32,
    pub length_penalty: f64,
    pub no_repeat_ngram_size: u32,
    pub do_sample: bool,
}

impl Default for SummarizeParams {
    fn default() -> Self {
        Self {
            max_length: 300,
            min_length: 100,
            length_penalty: 0.9,
            no_repeat_ngram_size: 3,
            do_sample: false,
        }
    }
}

/// Generation parameters for expansion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpandParams {
    pub max_new_tokens: u32,
    pub do_sample: bool,
}

impl Default for ExpandParams {
    fn default() -> Self {
        Self {
            max_new_tokens: 120,
            do_sample: false,
        }
    }
}

/// A text-generation backend.
///
/// Implementations are shared across rows and must tolerate concurrent
/// calls; wrap a non-reentrant backend in a mutex.
pub trait EnrichmentService: Send + Sync {
    /// Summarize `text`.
    fn summarize(&self, text: &str, params: &SummarizeParams) -> Result<String>;

    /// Generate text from an instruction `prompt`.
    fn expand(&self, prompt: &str, params: &ExpandParams) -> Result<String>;
}

/// A service that is never available. Every row falls back to its
/// scrubbed text.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEnrichment;

impl EnrichmentService for NoEnrichment {
    fn summarize(&self, _text: &str, _params: &SummarizeParams) -> Result<String> {
        Err(Error::EnrichmentUnavailable)
    }

    fn expand(&self, _prompt: &str, _params: &ExpandParams) -> Result<String> {
        Err(Error::EnrichmentUnavailable)
    }
}

/// Which branch the policy took for one content cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "branch")]
pub enum EnrichmentDecision {
    /// Content was missing; the sentinel was used.
    Unavailable,
    /// Short content, expansion accepted.
    Expanded { length: usize },
    /// Short content, expansion failed or was rejected.
    ExpandRejected { length: usize },
    /// Long content, summary accepted.
    Summarized { length: usize },
    /// Long content, summarization failed or was rejected.
    SummarizeRejected { length: usize },
    /// Length within the dead band; used verbatim.
    PassThrough { length: usize },
}

/// The text chosen for a slide, plus how it was chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrichment {
    pub text: String,
    pub decision: EnrichmentDecision,
}

/// Decides whether content is expanded, summarized or kept.
#[derive(Clone)]
pub struct EnrichmentPolicy<'a> {
    service: &'a dyn EnrichmentService,
    summarize_params: SummarizeParams,
    expand_params: ExpandParams,
}

impl<'a> EnrichmentPolicy<'a> {
    /// Create a policy backed by `service`, using the default generation
    /// parameters.
    pub fn new(service: &'a dyn EnrichmentService) -> Self {
        Self {
            service,
            summarize_params: SummarizeParams::default(),
            expand_params: ExpandParams::default(),
        }
    }

    /// Override the summarization parameters.
    pub fn with_summarize_params(mut self, params: SummarizeParams) -> Self {
        self.summarize_params = params;
        self
    }

    /// Override the expansion parameters.
    pub fn with_expand_params(mut self, params: ExpandParams) -> Self {
        self.expand_params = params;
        self
    }

    /// Choose the text to show for `raw` content.
    pub fn decide(&self, title: &str, raw: Option<&str>) -> String {
        self.decide_detailed(title, raw).text
    }

    /// Like [`decide`](Self::decide), also reporting the branch taken.
    pub fn decide_detailed(&self, title: &str, raw: Option<&str>) -> Enrichment {
        let raw = match raw {
            Some(raw) if !is_missing(raw) => raw,
            _ => {
                log::info!("[{}] No content, using placeholder.", title);
                return Enrichment {
                    text: CONTENT_NOT_AVAILABLE.to_string(),
                    decision: EnrichmentDecision::Unavailable,
                };
            }
        };

        let cleaned = scrub(raw);
        let length = cleaned.chars().count();

        if length < EXPAND_BELOW {
            log::info!("[{}] Expanding short content ({} chars).", title, length);
            return self.expand(title, cleaned, length);
        }

        if length > SUMMARIZE_ABOVE {
            log::info!("[{}] Summarizing long content ({} chars).", title, length);
            return self.summarize(title, cleaned, length);
        }

        log::info!("[{}] Using as-is ({} chars).", title, length);
        Enrichment {
            text: cleaned,
            decision: EnrichmentDecision::PassThrough { length },
        }
    }

    fn expand(&self, title: &str, cleaned: String, length: usize) -> Enrichment {
        let prompt = format!("{}{}", EXPAND_INSTRUCTION, cleaned);

        let accepted = match self.service.expand(&prompt, &self.expand_params) {
            Ok(generated) => {
                let generated = generated.trim();
                if starts_with_ignore_case(generated, EXPAND_INSTRUCTION) {
                    log::warn!("[{}] Expansion echoed the prompt, keeping original.", title);
                    None
                } else if generated.chars().count() <= length + MIN_EXPANSION_GAIN {
                    log::warn!("[{}] Expansion added too little, keeping original.", title);
                    None
                } else {
                    Some(generated.to_string())
                }
            }
            Err(Error::EnrichmentUnavailable) => None,
            Err(e) => {
                log::warn!("[{}] Expansion failed: {}", title, e);
                None
            }
        };

        match accepted {
            Some(text) => Enrichment {
                text: scrub(&text),
                decision: EnrichmentDecision::Expanded { length },
            },
            None => Enrichment {
                text: cleaned,
                decision: EnrichmentDecision::ExpandRejected { length },
            },
        }
    }

    fn summarize(&self, title: &str, cleaned: String, length: usize) -> Enrichment {
        let accepted = match self.service.summarize(&cleaned, &self.summarize_params) {
            Ok(summary) if summary.trim().is_empty() => {
                log::warn!("[{}] Summarization returned nothing, keeping original.", title);
                None
            }
            Ok(summary) => Some(summary.trim().to_string()),
            Err(Error::EnrichmentUnavailable) => None,
            Err(e) => {
                log::warn!("[{}] Summarization failed: {}", title, e);
                None
            }
        };

        match accepted {
            Some(text) => Enrichment {
                text: scrub(&text),
                decision: EnrichmentDecision::Summarized { length },
            },
            None => Enrichment {
                text: cleaned,
                decision: EnrichmentDecision::SummarizeRejected { length },
            },
        }
    }
}

/// Empty, whitespace-only, or the spreadsheet "nan" marker.
fn is_missing(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan")
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.to_lowercase().starts_with(&prefix.to_lowercase())
}
