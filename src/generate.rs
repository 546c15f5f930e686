//! Top-level entry points: generate a new article, or re-render existing
//! text.
//!
//! [`generate`] drives the whole pipeline — generator call, best-effort
//! recording, assembly, layout, and both artifact writers. [`compose`]
//! starts from caller-supplied text (typically a hand-edited preview of an
//! earlier run) and performs only the deterministic second half; it never
//! touches the generator or the artifact store.
//!
//! The assemble/layout core is pure and synchronous; everything async here
//! is collaborator I/O. Artifact writing and SQLite are blocking and run in
//! `spawn_blocking` so the caller's executor is never stalled.

use crate::backend::{self, docx, pdf};
use crate::config::ArticleConfig;
use crate::error::ArticleError;
use crate::output::{ArticleOutput, ArtifactRecord, GenerationStats};
use crate::persist::ArtifactStore;
use crate::pipeline::layout::{self, RenderInstruction};
use crate::pipeline::llm::{self, ArticleGenerator, GeminiGenerator};
use crate::pipeline::segment;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Which artifacts one run should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// PDF and DOCX (default).
    #[default]
    Both,
    Pdf,
    Docx,
}

impl OutputFormat {
    pub fn wants_pdf(self) -> bool {
        matches!(self, OutputFormat::Both | OutputFormat::Pdf)
    }

    pub fn wants_docx(self) -> bool {
        matches!(self, OutputFormat::Both | OutputFormat::Docx)
    }
}

/// One article request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleRequest {
    /// Article title; title-cased before generation and rendering.
    pub title: String,
    /// Topic handed to the generator.
    pub topic: String,
    /// Author byline (may be empty).
    pub author: String,
    /// Artifacts to produce.
    pub format: OutputFormat,
}

/// Generate an article and write its artifacts.
///
/// # Errors
/// Returns `Err(ArticleError)` only for operation-level failures — blank
/// request fields, generator misconfiguration or exhaustion, artifact write
/// failures. Parsing degradation (missing sections) is not an error: the
/// documents are produced with placeholder paragraphs and
/// `stats.sections_found` tells the caller how much structure was recognised.
/// A failed database record is logged and reported via `stats.recorded`.
pub async fn generate(
    request: &ArticleRequest,
    config: &ArticleConfig,
) -> Result<ArticleOutput, ArticleError> {
    let total_start = Instant::now();

    if request.title.trim().is_empty() {
        return Err(ArticleError::InvalidRequest { field: "title" });
    }
    if request.topic.trim().is_empty() {
        return Err(ArticleError::InvalidRequest { field: "topic" });
    }

    let title = title_case(&request.title);
    info!("Generating article: {title}");

    // ── Step 1: resolve the generator ────────────────────────────────────
    let generator = resolve_generator(config)?;

    // ── Step 2: call it, with retry ──────────────────────────────────────
    let generator_start = Instant::now();
    let raw_text = llm::generate_with_retry(&generator, &title, &request.topic, config).await?;
    let generator_duration_ms = generator_start.elapsed().as_millis() as u64;
    info!(
        "Generator returned {} bytes in {}ms",
        raw_text.len(),
        generator_duration_ms
    );

    // ── Step 3: record the run (best-effort) ─────────────────────────────
    let recorded = record_run(request, &title, &raw_text, config).await;

    // ── Step 4: assemble + layout ────────────────────────────────────────
    let sections = segment::assemble(&raw_text);
    debug!("Recognised {} canonical sections", sections.len());
    let instructions = layout::render(&sections, &title, &request.author, &config.layout);

    // ── Step 5: write artifacts ──────────────────────────────────────────
    let emit_start = Instant::now();
    let (pdf_path, docx_path) =
        emit_blocking(instructions, title.clone(), request.format, config).await?;
    let emit_duration_ms = emit_start.elapsed().as_millis() as u64;

    let stats = GenerationStats {
        generator_duration_ms,
        emit_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
        sections_found: sections.len(),
        paragraphs: sections.values().map(Vec::len).sum(),
        recorded,
    };
    info!(
        "Article complete: {}/{} sections, {}ms total",
        stats.sections_found,
        crate::sections::CanonicalSection::ALL.len(),
        stats.total_duration_ms
    );

    Ok(ArticleOutput {
        title,
        author: request.author.clone(),
        raw_text,
        sections,
        pdf_path,
        docx_path,
        stats,
    })
}

/// Re-render caller-supplied article text into artifacts.
///
/// The deterministic half of [`generate`]: no generator call, no database
/// record. Used for hand-edited text and for offline re-rendering of stored
/// runs.
pub fn compose(
    raw_text: &str,
    title: &str,
    author: &str,
    format: OutputFormat,
    config: &ArticleConfig,
) -> Result<ArticleOutput, ArticleError> {
    let total_start = Instant::now();

    if title.trim().is_empty() {
        return Err(ArticleError::InvalidRequest { field: "title" });
    }

    let title = title_case(title);
    let sections = segment::assemble(raw_text);
    let instructions = layout::render(&sections, &title, author, &config.layout);

    let emit_start = Instant::now();
    let (pdf_path, docx_path) = emit_artifacts(&instructions, &title, format, config)?;
    let emit_duration_ms = emit_start.elapsed().as_millis() as u64;

    let stats = GenerationStats {
        generator_duration_ms: 0,
        emit_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
        sections_found: sections.len(),
        paragraphs: sections.values().map(Vec::len).sum(),
        recorded: false,
    };

    Ok(ArticleOutput {
        title,
        author: author.to_string(),
        raw_text: raw_text.to_string(),
        sections,
        pdf_path,
        docx_path,
        stats,
    })
}

/// Synchronous wrapper around [`generate`].
///
/// Creates a temporary tokio runtime internally.
pub fn generate_sync(
    request: &ArticleRequest,
    config: &ArticleConfig,
) -> Result<ArticleOutput, ArticleError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ArticleError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(generate(request, config))
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Resolve the generator, from most-specific to least-specific:
///
/// 1. **Injected generator** (`config.generator`) — tests and embedders
///    construct their own; used as-is.
/// 2. **Explicit API key** (`config.api_key`) — build a [`GeminiGenerator`]
///    for the configured model.
/// 3. **Environment** — `GEMINI_API_KEY` (or legacy `API_KEY`).
fn resolve_generator(config: &ArticleConfig) -> Result<Arc<dyn ArticleGenerator>, ArticleError> {
    if let Some(ref generator) = config.generator {
        return Ok(Arc::clone(generator));
    }

    if let Some(ref key) = config.api_key {
        let gemini = GeminiGenerator::new(&config.model, key, config.api_timeout_secs)?;
        return Ok(Arc::new(gemini));
    }

    let gemini = GeminiGenerator::from_env(&config.model, config.api_timeout_secs)?;
    Ok(Arc::new(gemini))
}

/// Record the run in the artifact store, if one is configured.
///
/// Failures are logged and reported as `false`, never propagated: a missing
/// database row must not cost the caller their documents.
async fn record_run(
    request: &ArticleRequest,
    title: &str,
    raw_text: &str,
    config: &ArticleConfig,
) -> bool {
    let Some(ref db_path) = config.db_path else {
        return false;
    };

    let store = ArtifactStore::new(db_path.clone());
    let record = ArtifactRecord {
        title: title.to_string(),
        topic: request.topic.clone(),
        author: request.author.clone(),
        body: raw_text.to_string(),
        produced_pdf: request.format.wants_pdf(),
        produced_docx: request.format.wants_docx(),
    };

    let result = tokio::task::spawn_blocking(move || store.record(&record)).await;
    match result {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            warn!("Failed to record artifact: {e}");
            false
        }
        Err(e) => {
            warn!("Artifact-store task panicked: {e}");
            false
        }
    }
}

/// Run both writers off the async executor.
async fn emit_blocking(
    instructions: Vec<RenderInstruction>,
    title: String,
    format: OutputFormat,
    config: &ArticleConfig,
) -> Result<(Option<PathBuf>, Option<PathBuf>), ArticleError> {
    let config = config.clone();
    tokio::task::spawn_blocking(move || emit_artifacts(&instructions, &title, format, &config))
        .await
        .map_err(|e| ArticleError::Internal(format!("artifact task panicked: {e}")))?
}

/// Write the requested artifacts; the output directory is created on first
/// use.
fn emit_artifacts(
    instructions: &[RenderInstruction],
    title: &str,
    format: OutputFormat,
    config: &ArticleConfig,
) -> Result<(Option<PathBuf>, Option<PathBuf>), ArticleError> {
    backend::ensure_output_dir(&config.output_dir)?;

    let pdf_path = if format.wants_pdf() {
        let path = pdf::write_pdf(instructions, &config.layout, title, &config.output_dir)?;
        info!("Wrote {}", path.display());
        Some(path)
    } else {
        None
    };

    let docx_path = if format.wants_docx() {
        let path = docx::write_docx(instructions, &config.layout, title, &config.output_dir)?;
        info!("Wrote {}", path.display());
        Some(path)
    } else {
        None
    };

    Ok((pdf_path, docx_path))
}

/// First letter of each word uppercased, rest lowered ("energia SOLAR" →
/// "Energia Solar").
fn title_case(input: &str) -> String {
    input
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_case_capitalises_each_word() {
        assert_eq!(title_case("energia solar no brasil"), "Energia Solar No Brasil");
        assert_eq!(title_case("EDUCAÇÃO híbrida"), "Educação Híbrida");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn format_selection() {
        assert!(OutputFormat::Both.wants_pdf() && OutputFormat::Both.wants_docx());
        assert!(OutputFormat::Pdf.wants_pdf() && !OutputFormat::Pdf.wants_docx());
        assert!(!OutputFormat::Docx.wants_pdf() && OutputFormat::Docx.wants_docx());
    }

    #[test]
    fn compose_rejects_blank_title() {
        let config = ArticleConfig::default();
        let err = compose("texto", "  ", "A", OutputFormat::Docx, &config).unwrap_err();
        assert!(matches!(err, ArticleError::InvalidRequest { field: "title" }));
    }

    #[tokio::test]
    async fn generate_rejects_blank_topic() {
        let request = ArticleRequest {
            title: "T".into(),
            topic: "   ".into(),
            author: String::new(),
            format: OutputFormat::Both,
        };
        let err = generate(&request, &ArticleConfig::default()).await.unwrap_err();
        assert!(matches!(err, ArticleError::InvalidRequest { field: "topic" }));
    }
}
