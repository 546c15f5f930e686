//! DOCX back-end.
//!
//! Maps the instruction stream onto docx-rs paragraph primitives: Times New
//! Roman 12 pt runs, 1.5 line spacing, full justification for body text, a
//! 1.25 cm first-line indent on numbered-section paragraphs, and a PAGE
//! field in a right-aligned header.

use crate::backend::{artifact_file_name, write_atomic};
use crate::error::ArticleError;
use crate::pipeline::layout::{LayoutOptions, RenderInstruction};
use docx_rs::{
    AlignmentType, Docx, Header, LineSpacing, LineSpacingType, PageNum, Paragraph, Run, RunFonts,
    SpecialIndentType,
};
use std::path::{Path, PathBuf};

const FONT: &str = "Times New Roman";
/// 1.25 cm in twips (567 twips/cm).
const FIRST_LINE_INDENT: i32 = 709;

/// Render the instruction stream into `<dir>/<title>.docx`.
pub fn write_docx(
    instructions: &[RenderInstruction],
    options: &LayoutOptions,
    title: &str,
    output_dir: &Path,
) -> Result<PathBuf, ArticleError> {
    let mut docx = Docx::new().header(page_number_header());

    for instruction in instructions {
        docx = docx.add_paragraph(build_paragraph(instruction, options));
    }

    let mut buffer = std::io::Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buffer)
        .map_err(|e| ArticleError::DocxRenderFailed {
            detail: e.to_string(),
        })?;

    let path = output_dir.join(artifact_file_name(title, "docx"));
    write_atomic(&path, buffer.get_ref())?;
    Ok(path)
}

fn page_number_header() -> Header {
    Header::new().add_paragraph(
        Paragraph::new()
            .add_page_num(PageNum::new())
            .align(AlignmentType::Right),
    )
}

fn styled_run(text: &str, size_pt: u8, bold: bool) -> Run {
    let mut run = Run::new()
        .add_text(text)
        .fonts(RunFonts::new().ascii(FONT))
        .size(usize::from(size_pt) * 2) // half-points
        .color("000000");
    if bold {
        run = run.bold();
    }
    run
}

fn build_paragraph(instruction: &RenderInstruction, options: &LayoutOptions) -> Paragraph {
    match instruction {
        RenderInstruction::Title { text } => Paragraph::new()
            .add_run(styled_run(text, options.title_pt, true))
            .align(AlignmentType::Center),
        RenderInstruction::Author { text } => Paragraph::new()
            .add_run(styled_run(text, 12, false))
            .align(AlignmentType::Right)
            .line_spacing(LineSpacing::new().before(480).after(400)),
        RenderInstruction::Heading { text } => Paragraph::new()
            .add_run(styled_run(text, options.heading_pt, true))
            .line_spacing(LineSpacing::new().after(240)),
        RenderInstruction::Paragraph {
            text,
            indented,
            justified,
            bold_prefix,
        } => {
            let mut paragraph = Paragraph::new();
            if let Some(prefix) = bold_prefix {
                paragraph = paragraph.add_run(styled_run(prefix, 12, true));
            }
            paragraph = paragraph
                .add_run(styled_run(text, 12, false))
                // w:jc="both" is OOXML's full justification.
                .align(if *justified {
                    AlignmentType::Both
                } else {
                    AlignmentType::Left
                })
                .line_spacing(
                    // 1.5 line spacing: 360 in 240ths of a line.
                    LineSpacing::new().line_rule(LineSpacingType::Auto).line(360),
                );
            if *indented {
                paragraph = paragraph.indent(
                    None,
                    Some(SpecialIndentType::FirstLine(FIRST_LINE_INDENT)),
                    None,
                    None,
                );
            }
            paragraph
        }
    }
}
