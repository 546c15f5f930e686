//! # abntgen
//!
//! Generate ABNT-formatted academic articles as PDF and DOCX from LLM text.
//!
//! ## Why this crate?
//!
//! Text generators produce loosely structured article text: heading spelling
//! drifts ("Resumo", "**2. Resumo:**", "RESUMO"), sections arrive out of
//! order, emphasis markers wrap arbitrary words. Rendering that directly
//! gives unusable documents. This crate recognises section boundaries,
//! re-assembles the content into the ten canonical ABNT sections, and emits
//! them in fixed order with the right typography — deterministically, so the
//! same text always produces the same documents.
//!
//! ## Pipeline Overview
//!
//! ```text
//! (title, topic)
//!  │
//!  ├─ 1. Generate  Gemini generateContent (retry + backoff)
//!  ├─ 2. Record    SQLite artifact store (best-effort)
//!  ├─ 3. Segment   heading recognition → section → paragraphs map
//!  ├─ 4. Layout    canonical order → renderer-agnostic instructions
//!  └─ 5. Emit      PDF (printpdf) + DOCX (docx-rs) artifacts
//! ```
//!
//! Steps 3–4 are the pure core: no I/O, no shared state, safe to run
//! concurrently on different inputs. Steps 1, 2, and 5 are collaborators;
//! their failures are operation-level errors (or, for the store, logged
//! degradation) and never conflate with parsing behaviour.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use abntgen::{generate, ArticleConfig, ArticleRequest, OutputFormat};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // API key auto-detected from GEMINI_API_KEY
//!     let config = ArticleConfig::default();
//!     let request = ArticleRequest {
//!         title: "energia solar no brasil".into(),
//!         topic: "energia renovável".into(),
//!         author: "Maria Silva Santos".into(),
//!         format: OutputFormat::Both,
//!     };
//!     let output = generate(&request, &config).await?;
//!     println!("{:?} / {:?}", output.pdf_path, output.docx_path);
//!     eprintln!("{} sections recognised", output.stats.sections_found);
//!     Ok(())
//! }
//! ```
//!
//! Re-rendering edited text needs no generator and no key:
//!
//! ```rust,no_run
//! use abntgen::{compose, ArticleConfig, OutputFormat};
//!
//! let config = ArticleConfig::default();
//! let edited = std::fs::read_to_string("artigo.txt")?;
//! let output = compose(&edited, "Energia Solar", "Maria Silva Santos",
//!     OutputFormat::Docx, &config)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `abntgen` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! abntgen = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod backend;
pub mod config;
pub mod error;
pub mod generate;
pub mod output;
pub mod persist;
pub mod pipeline;
pub mod prompts;
pub mod sections;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ArticleConfig, ArticleConfigBuilder};
pub use error::{ArticleError, PersistError};
pub use generate::{compose, generate, generate_sync, ArticleRequest, OutputFormat};
pub use output::{ArticleOutput, ArtifactRecord, GenerationStats};
pub use persist::{ArtifactStore, StoredArticle};
pub use pipeline::layout::{render, LayoutOptions, RenderInstruction, TitlePlacement};
pub use pipeline::llm::{ArticleGenerator, GeminiGenerator};
pub use pipeline::segment::{assemble, match_heading, SectionMap};
pub use sections::CanonicalSection;
