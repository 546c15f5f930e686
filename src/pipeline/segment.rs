//! Section segmentation: turn generated free-form article text into a
//! per-section paragraph map.
//!
//! ## Why a recognition table?
//!
//! The generator labels sections loosely — `"**2. Resumo:** texto"`,
//! `"RESUMO"`, `"1 Introdução"` all occur in real output. Rather than
//! scattering per-call-site regexes, a single ordered
//! `(CanonicalSection, Regex)` table drives recognition everywhere:
//! the assembler here and both document back-ends see exactly the same
//! section boundaries.
//!
//! ## Matching rules
//!
//! A heading line is an optional 0–2 digit ordinal, an optional period,
//! the section name (documented spelling/accent variants), an optional
//! colon, and an optional inline remainder — matched case-insensitively
//! against the whole line. Rules are tried in canonical priority order and
//! the first full match wins; there is no substring fallback.
//!
//! Emphasis markers (`*` runs) are stripped from the entire line before
//! matching, not just at the edges: the generator wraps headings and
//! individual words in them and they carry no meaning.

use crate::sections::CanonicalSection;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

/// Canonical section → paragraphs, in input order.
///
/// Keys are present only when at least one heading for that section was
/// recognised. `BTreeMap` keeps iteration in canonical order for free.
pub type SectionMap = BTreeMap<CanonicalSection, Vec<String>>;

static RE_EMPHASIS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*+").unwrap());

static HEADING_RULES: Lazy<Vec<(CanonicalSection, Regex)>> = Lazy::new(|| {
    CanonicalSection::ALL
        .iter()
        .map(|&section| {
            let pattern = format!(
                r"(?i)^\s*\d{{0,2}}\.?\s*{}\s*:?\s*(.*)$",
                section.heading_pattern()
            );
            (section, Regex::new(&pattern).unwrap())
        })
        .collect()
});

/// Trim the line and strip every run of emphasis markers.
pub fn normalize_line(line: &str) -> String {
    RE_EMPHASIS.replace_all(line.trim(), "").into_owned()
}

/// Decide whether a line opens a canonical section.
///
/// The line is normalised first (idempotent, so pre-normalised input is
/// fine). Returns the section and the inline remainder (trimmed, possibly
/// empty). A non-empty remainder is the section's first paragraph fragment;
/// an empty one means the following lines hold the section's opening
/// content.
pub fn match_heading(line: &str) -> Option<(CanonicalSection, String)> {
    let line = normalize_line(line);
    for (section, rule) in HEADING_RULES.iter() {
        if let Some(caps) = rule.captures(&line) {
            let remainder = caps.get(1).map_or("", |m| m.as_str().trim());
            return Some((*section, remainder.to_string()));
        }
    }
    None
}

/// Assemble the raw generated text into a [`SectionMap`].
///
/// Line-by-line over the input:
/// - empty lines (after normalisation) are skipped entirely — a blank line
///   never closes a section nor ends awaiting-inline mode;
/// - a heading match opens (or re-opens) its section; inline remainder is
///   appended immediately, a bare heading arms awaiting-inline mode;
/// - any other line is appended to the section awaiting content, or else to
///   the currently open section;
/// - lines before the first recognised heading are dropped. Once a section
///   is open no content is ever discarded: unrecognised or misspelled
///   headings become ordinary body text.
///
/// Never fails; completely unstructured input yields an empty map.
pub fn assemble(raw_text: &str) -> SectionMap {
    let mut sections = SectionMap::new();
    let mut current: Option<CanonicalSection> = None;
    let mut awaiting_inline = false;
    let mut last_opened: Option<CanonicalSection> = None;

    for raw_line in raw_text.lines() {
        let line = normalize_line(raw_line);
        if line.is_empty() {
            continue;
        }

        if let Some((section, remainder)) = match_heading(&line) {
            current = Some(section);
            let paragraphs = sections.entry(section).or_default();
            if remainder.is_empty() {
                awaiting_inline = true;
                last_opened = Some(section);
            } else {
                paragraphs.push(remainder);
                awaiting_inline = false;
            }
            continue;
        }

        if awaiting_inline {
            if let Some(section) = last_opened {
                sections.entry(section).or_default().push(line);
                // Cleared here on purpose: the opened section is also the
                // current one, so later body lines land in the same list
                // either way, and clearing removes the double-merge hazard
                // around a heading that follows a bare heading.
                awaiting_inline = false;
                continue;
            }
        }

        if let Some(section) = current {
            sections.entry(section).or_default().push(line);
        }
    }

    sections
}
