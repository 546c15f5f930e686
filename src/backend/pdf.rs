//! PDF back-end.
//!
//! The instruction stream is lowered to a small, controlled HTML string and
//! handed to printpdf's HTML renderer. This keeps text layout (wrapping,
//! justification, indents) in the renderer where it belongs; the only
//! thing drawn by hand is the page-number footer, stamped onto every page
//! after layout because the page count is unknown until then.
//!
//! Page geometry is A4 with ABNT margins (3 cm left/top, 2 cm right/bottom),
//! Times at 12 pt, 1.5 line height.

use crate::backend::{artifact_file_name, write_atomic};
use crate::error::ArticleError;
use crate::pipeline::layout::{LayoutOptions, RenderInstruction};
use printpdf::{BuiltinFont, GeneratePdfOptions, Mm, Op, PdfDocument, Point, Pt, TextItem};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Render the instruction stream into `<dir>/<title>.pdf`.
pub fn write_pdf(
    instructions: &[RenderInstruction],
    options: &LayoutOptions,
    title: &str,
    output_dir: &Path,
) -> Result<PathBuf, ArticleError> {
    let html = instructions_to_html(instructions, options);

    let mut warnings = Vec::new();
    let mut doc = PdfDocument::from_html(
        &html,
        &BTreeMap::new(), // images
        &BTreeMap::new(), // fonts — the generated HTML only uses generic families
        &GeneratePdfOptions::default(),
        &mut warnings,
    )
    .map_err(|e| ArticleError::PdfRenderFailed {
        detail: e.to_string(),
    })?;
    if !warnings.is_empty() {
        debug!("PDF layout produced {} warnings", warnings.len());
    }

    stamp_page_numbers(&mut doc);

    let bytes = doc.save(&Default::default(), &mut warnings);

    let path = output_dir.join(artifact_file_name(title, "pdf"));
    write_atomic(&path, &bytes)?;
    Ok(path)
}

/// Lower the instruction stream to the HTML subset printpdf lays out.
fn instructions_to_html(instructions: &[RenderInstruction], options: &LayoutOptions) -> String {
    let mut html = String::with_capacity(4096);
    html.push_str(
        "<!DOCTYPE html><html><head><style>\
         body { font-family: serif; font-size: 12pt; margin: 3cm 2cm 2cm 3cm; } \
         p { line-height: 1.5; margin: 0 0 10pt 0; }\
         </style></head><body>",
    );

    for instruction in instructions {
        match instruction {
            RenderInstruction::Title { text } => {
                html.push_str(&format!(
                    "<p style=\"text-align: center; font-size: {}pt; margin-bottom: 18pt\"><b>{}</b></p>",
                    options.title_pt,
                    escape(text)
                ));
            }
            RenderInstruction::Author { text } => {
                // Non-breaking spaces keep the author on one line, matching
                // the right-aligned byline convention.
                html.push_str(&format!(
                    "<p style=\"text-align: right; margin-bottom: 24pt\">{}</p>",
                    escape(text).replace(' ', "\u{00A0}")
                ));
            }
            RenderInstruction::Heading { text } => {
                html.push_str(&format!(
                    "<p style=\"font-size: {}pt; margin: 12pt 0\"><b>{}</b></p>",
                    options.heading_pt,
                    escape(text)
                ));
            }
            RenderInstruction::Paragraph {
                text,
                indented,
                justified,
                bold_prefix,
            } => {
                let align = if *justified { "justify" } else { "left" };
                let indent = if *indented { "1.25cm" } else { "0" };
                html.push_str(&format!(
                    "<p style=\"text-align: {align}; text-indent: {indent}\">"
                ));
                if let Some(prefix) = bold_prefix {
                    html.push_str(&format!("<b>{}</b>", escape(prefix)));
                }
                html.push_str(&escape(text));
                html.push_str("</p>");
            }
        }
    }

    html.push_str("</body></html>");
    html
}

/// Draw the page number at the top-right of every page, Times 12 pt.
fn stamp_page_numbers(doc: &mut PdfDocument) {
    for (index, page) in doc.pages.iter_mut().enumerate() {
        page.ops.extend([
            Op::StartTextSection,
            Op::SetTextCursor {
                pos: Point {
                    x: Mm(190.0).into(),
                    y: Mm(282.0).into(),
                },
            },
            Op::SetFontSizeBuiltinFont {
                size: Pt(12.0),
                font: BuiltinFont::TimesRoman,
            },
            Op::WriteTextBuiltinFont {
                items: vec![TextItem::Text((index + 1).to_string())],
                font: BuiltinFont::TimesRoman,
            },
            Op::EndTextSection,
        ]);
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
