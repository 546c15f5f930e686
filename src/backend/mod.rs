//! Document back-ends: turn the instruction stream into artifact files.
//!
//! Both writers consume the same [`crate::pipeline::layout::RenderInstruction`]
//! slice and share nothing else — no state, no ordering constraints between
//! them. The helpers here own the pieces that must agree across formats:
//! artifact file naming and the output directory.

pub mod docx;
pub mod pdf;

use crate::error::ArticleError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

static RE_UNSAFE_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s-]").unwrap());

/// Derive the artifact file name from the article title.
///
/// Characters outside `[\w\s-]` are dropped and interior whitespace runs
/// become `_`, so "Energia Solar: Hoje!" → `Energia_Solar_Hoje.pdf`.
pub fn artifact_file_name(title: &str, extension: &str) -> String {
    let cleaned = RE_UNSAFE_CHARS.replace_all(title, "");
    let stem: Vec<&str> = cleaned.split_whitespace().collect();
    if stem.is_empty() {
        format!("artigo.{extension}")
    } else {
        format!("{}.{extension}", stem.join("_"))
    }
}

/// Create the output directory if it does not exist yet.
pub fn ensure_output_dir(dir: &Path) -> Result<(), ArticleError> {
    fs::create_dir_all(dir).map_err(|source| ArticleError::OutputWriteFailed {
        path: dir.to_path_buf(),
        source,
    })
}

/// Write artifact bytes atomically (temp file + rename) so a crash never
/// leaves a half-written document behind.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), ArticleError> {
    // Keep the real extension in the temp name ("X.pdf" → "X.pdf.tmp") so the
    // two back-ends writing the same stem can never collide.
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("out");
    let tmp_path = path.with_extension(format!("{extension}.tmp"));
    let wrap = |source: std::io::Error| ArticleError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };
    fs::write(&tmp_path, bytes).map_err(wrap)?;
    fs::rename(&tmp_path, path).map_err(wrap)
}
