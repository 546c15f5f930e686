//! Result types returned by the top-level entry points.

use crate::pipeline::segment::SectionMap;
use serde::Serialize;
use std::path::PathBuf;

/// Everything one `generate`/`compose` run produced.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleOutput {
    /// Title after title-case normalisation, as rendered.
    pub title: String,
    /// Author as supplied (the surname-first transform is a rendering rule
    /// and does not rewrite the record).
    pub author: String,
    /// Raw generator text, unmodified.
    pub raw_text: String,
    /// Assembled sections; empty when no heading was recognised.
    pub sections: SectionMap,
    /// Written PDF artifact, if requested.
    pub pdf_path: Option<PathBuf>,
    /// Written DOCX artifact, if requested.
    pub docx_path: Option<PathBuf>,
    /// Timing and bookkeeping.
    pub stats: GenerationStats,
}

/// Timing and bookkeeping for one run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationStats {
    /// Wall-clock time spent waiting on the upstream generator (0 for
    /// `compose`).
    pub generator_duration_ms: u64,
    /// Wall-clock time spent writing artifacts.
    pub emit_duration_ms: u64,
    /// Total wall-clock time of the run.
    pub total_duration_ms: u64,
    /// Distinct canonical sections recognised in the input.
    pub sections_found: usize,
    /// Total paragraphs across all sections.
    pub paragraphs: usize,
    /// Whether the artifact store accepted the record (false when recording
    /// is disabled or failed — failure is logged, never fatal).
    pub recorded: bool,
}

/// The row handed to the artifact store after a generation run.
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactRecord {
    pub title: String,
    pub topic: String,
    pub author: String,
    /// The raw generated text, so a run can be re-rendered later.
    pub body: String,
    pub produced_pdf: bool,
    pub produced_docx: bool,
}
