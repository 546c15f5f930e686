//! Upstream text generation: the collaborator that turns (title, topic) into
//! raw article text.
//!
//! The core never talks to a network; it consumes the generator through the
//! [`ArticleGenerator`] trait so tests inject a canned implementation and
//! embedders can swap providers without touching the pipeline. The one
//! concrete implementation here speaks the Gemini `generateContent` API.
//!
//! ## Retry Strategy
//!
//! 429/5xx responses from generation APIs are transient and frequent.
//! Exponential backoff (`retry_backoff_ms * 2^attempt`) avoids hammering a
//! recovering endpoint: with the 500 ms default and 3 retries the wait
//! sequence is 500 ms → 1 s → 2 s.

use crate::config::ArticleConfig;
use crate::error::ArticleError;
use crate::prompts::article_prompt;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::time::{sleep, Duration};
use tracing::{debug, warn};

/// The upstream text generator: `(title, topic) -> raw article text`.
///
/// Implementations must be `Send + Sync`; the pipeline shares one instance
/// across retries and, in embedding scenarios, across requests.
#[async_trait]
pub trait ArticleGenerator: Send + Sync {
    async fn generate(&self, title: &str, topic: &str) -> Result<String, ArticleError>;
}

/// Call the generator with retry and exponential backoff.
///
/// Empty responses count as failures and are retried; a configuration error
/// ([`ArticleError::GeneratorNotConfigured`]) aborts immediately since no
/// retry can fix a missing key.
pub async fn generate_with_retry(
    generator: &Arc<dyn ArticleGenerator>,
    title: &str,
    topic: &str,
    config: &ArticleConfig,
) -> Result<String, ArticleError> {
    let mut last_err: Option<ArticleError> = None;

    for attempt in 0..=config.max_retries {
        if attempt > 0 {
            let backoff = config.retry_backoff_ms * 2u64.pow(attempt - 1);
            warn!(
                "Generator retry {}/{} after {}ms",
                attempt, config.max_retries, backoff
            );
            sleep(Duration::from_millis(backoff)).await;
        }

        match generator.generate(title, topic).await {
            Ok(text) if !text.trim().is_empty() => {
                debug!("Generator returned {} bytes", text.len());
                return Ok(text);
            }
            Ok(_) => {
                warn!("Generator attempt {} returned empty text", attempt + 1);
                last_err = Some(ArticleError::GeneratorEmpty {
                    retries: config.max_retries,
                });
            }
            Err(e @ ArticleError::GeneratorNotConfigured { .. }) => return Err(e),
            Err(e) => {
                warn!("Generator attempt {} failed — {}", attempt + 1, e);
                last_err = Some(e);
            }
        }
    }

    Err(last_err.unwrap_or_else(|| ArticleError::Internal("generator retry loop".into())))
}

// ── Gemini implementation ────────────────────────────────────────────────

const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Generator backed by the Gemini `generateContent` REST API.
pub struct GeminiGenerator {
    client: reqwest::Client,
    model: String,
    api_key: String,
    timeout_secs: u64,
}

impl GeminiGenerator {
    /// Build a generator for `model` with an explicit API key.
    pub fn new(
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, ArticleError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ArticleError::Internal(format!("http client: {e}")))?;
        Ok(Self {
            client,
            model: model.into(),
            api_key: api_key.into(),
            timeout_secs,
        })
    }

    /// Build a generator reading the key from `GEMINI_API_KEY` (or the
    /// legacy `API_KEY`).
    pub fn from_env(model: impl Into<String>, timeout_secs: u64) -> Result<Self, ArticleError> {
        let key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ArticleError::GeneratorNotConfigured {
                hint: "Set GEMINI_API_KEY (or API_KEY), or inject a generator via \
                       ArticleConfig::builder().generator(...)."
                    .to_string(),
            })?;
        Self::new(model, key, timeout_secs)
    }
}

#[async_trait]
impl ArticleGenerator for GeminiGenerator {
    async fn generate(&self, title: &str, topic: &str) -> Result<String, ArticleError> {
        let url = format!(
            "{GEMINI_ENDPOINT}/{}:generateContent?key={}",
            self.model, self.api_key
        );
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: article_prompt(title, topic),
                }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ArticleError::GeneratorTimeout {
                        secs: self.timeout_secs,
                    }
                } else {
                    ArticleError::GeneratorApi {
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ArticleError::GeneratorApi {
                message: format!("HTTP {status}: {}", truncate(&detail, 300)),
            });
        }

        let parsed: GenerateResponse = response.json().await.map_err(|e| {
            ArticleError::GeneratorApi {
                message: format!("malformed response: {e}"),
            }
        })?;

        Ok(parsed.first_text().unwrap_or_default())
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateResponse {
    fn first_text(&self) -> Option<String> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|content| content.parts.first())
            .map(|part| part.text.clone())
    }
}
