//! Configuration for article generation and rendering.
//!
//! All behaviour is controlled through [`ArticleConfig`], built via its
//! [`ArticleConfigBuilder`]. The struct is created once at process start and
//! passed by reference to every component — the pipeline itself holds no
//! global state.
//!
//! # Design choice: builder over constructor
//! Most callers only care about one or two knobs (output directory, model).
//! The builder lets them set exactly those and rely on documented defaults
//! for the rest, and gives `build()` one place to validate the combination.

use crate::error::ArticleError;
use crate::pipeline::layout::{LayoutOptions, TitlePlacement};
use crate::pipeline::llm::ArticleGenerator;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Configuration for one article pipeline.
///
/// Built via [`ArticleConfig::builder()`] or [`ArticleConfig::default()`].
///
/// # Example
/// ```rust
/// use abntgen::ArticleConfig;
///
/// let config = ArticleConfig::builder()
///     .output_dir("artigos")
///     .model("gemini-2.0-flash")
///     .surname_first(true)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ArticleConfig {
    /// Directory artifacts are written into, created on first use.
    /// Default: `output_files`.
    pub output_dir: PathBuf,

    /// Generator model identifier. Default: `gemini-2.0-flash`.
    pub model: String,

    /// Generator API key. If `None`, read from `GEMINI_API_KEY` (or the
    /// legacy `API_KEY`) at generator-resolution time.
    pub api_key: Option<String>,

    /// Pre-constructed generator. Takes precedence over `model`/`api_key`;
    /// the way tests and embedders inject a stub or custom upstream.
    pub generator: Option<Arc<dyn ArticleGenerator>>,

    /// Maximum retry attempts on a transient generator failure. Default: 3.
    ///
    /// 5xx and overload errors from generation APIs are usually transient.
    /// Configuration errors (no key) are not retried — they surface
    /// immediately.
    pub max_retries: u32,

    /// Initial retry delay in milliseconds (exponential backoff). Default: 500.
    ///
    /// Doubles after each attempt: 500 ms → 1 s → 2 s.
    pub retry_backoff_ms: u64,

    /// Per-call generator timeout in seconds. Default: 120.
    ///
    /// A full article is thousands of output tokens; short chat-style
    /// timeouts produce spurious failures.
    pub api_timeout_secs: u64,

    /// Artifact database path. `None` (default) disables recording.
    pub db_path: Option<PathBuf>,

    /// Presentation options shared by the layout stage and both back-ends.
    pub layout: LayoutOptions,
}

impl Default for ArticleConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output_files"),
            model: "gemini-2.0-flash".to_string(),
            api_key: None,
            generator: None,
            max_retries: 3,
            retry_backoff_ms: 500,
            api_timeout_secs: 120,
            db_path: None,
            layout: LayoutOptions::default(),
        }
    }
}

impl fmt::Debug for ArticleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArticleConfig")
            .field("output_dir", &self.output_dir)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("generator", &self.generator.as_ref().map(|_| "<dyn ArticleGenerator>"))
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_ms", &self.retry_backoff_ms)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("db_path", &self.db_path)
            .field("layout", &self.layout)
            .finish()
    }
}

impl ArticleConfig {
    /// Create a new builder for `ArticleConfig`.
    pub fn builder() -> ArticleConfigBuilder {
        ArticleConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ArticleConfig`].
#[derive(Debug)]
pub struct ArticleConfigBuilder {
    config: ArticleConfig,
}

impl ArticleConfigBuilder {
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn generator(mut self, generator: Arc<dyn ArticleGenerator>) -> Self {
        self.config.generator = Some(generator);
        self
    }

    pub fn max_retries(mut self, n: u32) -> Self {
        self.config.max_retries = n;
        self
    }

    pub fn retry_backoff_ms(mut self, ms: u64) -> Self {
        self.config.retry_backoff_ms = ms;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs.max(1);
        self
    }

    pub fn db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.db_path = Some(path.into());
        self
    }

    pub fn title_pt(mut self, pt: u8) -> Self {
        self.config.layout.title_pt = pt;
        self
    }

    pub fn heading_pt(mut self, pt: u8) -> Self {
        self.config.layout.heading_pt = pt;
        self
    }

    pub fn title_placement(mut self, placement: TitlePlacement) -> Self {
        self.config.layout.title_placement = placement;
        self
    }

    pub fn surname_first(mut self, v: bool) -> Self {
        self.config.layout.surname_first = v;
        self
    }

    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.config.layout.placeholder = text.into();
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ArticleConfig, ArticleError> {
        let c = &self.config;
        for (name, pt) in [("title_pt", c.layout.title_pt), ("heading_pt", c.layout.heading_pt)] {
            if !(6..=72).contains(&pt) {
                return Err(ArticleError::InvalidConfig(format!(
                    "{name} must be 6–72 points, got {pt}"
                )));
            }
        }
        if c.model.trim().is_empty() {
            return Err(ArticleError::InvalidConfig("model must be non-empty".into()));
        }
        if c.layout.placeholder.trim().is_empty() {
            return Err(ArticleError::InvalidConfig(
                "placeholder text must be non-empty".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_build() {
        let config = ArticleConfig::builder().build().unwrap();
        assert_eq!(config.output_dir, PathBuf::from("output_files"));
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.layout.title_pt, 12);
        assert!(config.db_path.is_none());
    }

    #[test]
    fn rejects_absurd_font_sizes() {
        let err = ArticleConfig::builder().title_pt(200).build().unwrap_err();
        assert!(err.to_string().contains("title_pt"));
    }

    #[test]
    fn rejects_empty_placeholder() {
        assert!(ArticleConfig::builder().placeholder("  ").build().is_err());
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = ArticleConfig::builder().api_key("secret-key").build().unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("<redacted>"));
    }
}
