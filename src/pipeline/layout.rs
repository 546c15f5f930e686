//! Canonical layout: walk the fixed section order and emit renderer-agnostic
//! formatting instructions.
//!
//! Both document back-ends consume the same [`RenderInstruction`] stream, so
//! every formatting decision that is not a concrete drawing primitive is made
//! exactly once, here: section order, heading numbering, inline front-matter
//! labels, indentation and justification flags, and the placeholder for
//! sections the generator never produced.
//!
//! The layout is a pure function of its inputs — no I/O, no shared state —
//! which is what makes `assemble` + `render` idempotent and safe to call
//! concurrently from multiple requests.

use crate::pipeline::segment::SectionMap;
use crate::sections::CanonicalSection;
use serde::{Deserialize, Serialize};

/// One renderer-agnostic drawing instruction.
///
/// Back-ends map these onto their primitive paragraph APIs; they own no
/// formatting policy of their own beyond fonts and page geometry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderInstruction {
    /// The article title, centred and bold.
    Title { text: String },
    /// The author line, right-aligned.
    Author { text: String },
    /// A bold section heading.
    Heading { text: String },
    /// A body paragraph.
    Paragraph {
        text: String,
        /// 1.25 cm first-line indent.
        indented: bool,
        /// Full justification (otherwise left-aligned).
        justified: bool,
        /// Bold inline label prefixed to the text (front-matter first
        /// paragraphs, e.g. `"RESUMO: "`).
        bold_prefix: Option<String>,
    },
}

/// Where the title sits relative to the author line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TitlePlacement {
    /// Title first, then author (default).
    #[default]
    BeforeAuthor,
    /// Author first, then title.
    AfterAuthor,
}

/// Presentation knobs that used to be hard-coded per output variant.
///
/// The generated instruction *stream* is identical for every variant; these
/// options only steer the few details that genuinely differed between the
/// historical 12 pt and 16 pt renderings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutOptions {
    /// Title font size in points (12 classic, 16 large).
    pub title_pt: u8,
    /// Section heading font size in points.
    pub heading_pt: u8,
    /// Title before or after the author line.
    pub title_placement: TitlePlacement,
    /// Render the author as "SURNAME, Given Names".
    pub surname_first: bool,
    /// Paragraph substituted for sections missing from the input.
    pub placeholder: String,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            title_pt: 12,
            heading_pt: 12,
            title_placement: TitlePlacement::default(),
            surname_first: false,
            placeholder: "Conteúdo não disponível.".to_string(),
        }
    }
}

/// Render the assembled sections into an ordered instruction stream.
///
/// Emits title and author first (order per
/// [`LayoutOptions::title_placement`]), then every canonical section in
/// canonical order:
///
/// - front-matter sections carry no heading; their first paragraph gets a
///   bold `"LABEL: "` prefix and no indent, later paragraphs no indent;
/// - numbered body sections get a `"«n» «LABEL»"` heading and indented,
///   justified paragraphs;
/// - References renders last with its literal label, unindented and
///   left-aligned, one paragraph per reference entry;
/// - a section absent from the map renders the placeholder paragraph in the
///   section's own body style instead of failing.
///
/// Performs no text normalisation — the assembler already did that.
pub fn render(
    sections: &SectionMap,
    title: &str,
    author: &str,
    options: &LayoutOptions,
) -> Vec<RenderInstruction> {
    let mut out = Vec::with_capacity(sections.values().map(Vec::len).sum::<usize>() + 16);

    let title_instruction = RenderInstruction::Title {
        text: title.to_uppercase(),
    };
    let author_text = if options.surname_first {
        surname_first(author)
    } else {
        author.to_string()
    };
    let author_instruction = RenderInstruction::Author { text: author_text };

    match options.title_placement {
        TitlePlacement::BeforeAuthor => {
            out.push(title_instruction);
            out.push(author_instruction);
        }
        TitlePlacement::AfterAuthor => {
            out.push(author_instruction);
            out.push(title_instruction);
        }
    }

    for section in CanonicalSection::ALL {
        if let Some(number) = section.number() {
            out.push(RenderInstruction::Heading {
                text: format!("{} {}", number, section.label()),
            });
        } else if section == CanonicalSection::References {
            out.push(RenderInstruction::Heading {
                text: section.label().to_string(),
            });
        }

        match sections.get(&section) {
            Some(paragraphs) if !paragraphs.is_empty() => {
                for (index, paragraph) in paragraphs.iter().enumerate() {
                    out.push(section_paragraph(section, paragraph.clone(), index));
                }
            }
            _ => {
                out.push(section_paragraph(section, options.placeholder.clone(), 1));
            }
        }
    }

    out
}

/// Build one body paragraph with the section's formatting flags.
///
/// `index` only matters for front-matter: index 0 carries the inline label.
fn section_paragraph(section: CanonicalSection, text: String, index: usize) -> RenderInstruction {
    if section.is_front_matter() {
        RenderInstruction::Paragraph {
            text,
            indented: false,
            justified: true,
            bold_prefix: (index == 0).then(|| format!("{}: ", section.label())),
        }
    } else if section == CanonicalSection::References {
        RenderInstruction::Paragraph {
            text,
            indented: false,
            justified: false,
            bold_prefix: None,
        }
    } else {
        RenderInstruction::Paragraph {
            text,
            indented: true,
            justified: true,
            bold_prefix: None,
        }
    }
}

/// "Maria Silva Santos" → "SANTOS, Maria Silva"; single tokens pass through.
fn surname_first(name: &str) -> String {
    let parts: Vec<&str> = name.split_whitespace().collect();
    if parts.len() < 2 {
        return name.to_string();
    }
    let (surname, given) = parts.split_last().expect("len checked above");
    format!("{}, {}", surname.to_uppercase(), given.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::segment::assemble;
    use crate::sections::CanonicalSection::*;

    fn opts() -> LayoutOptions {
        LayoutOptions::default()
    }

    #[test]
    fn title_and_author_come_first() {
        let stream = render(&SectionMap::new(), "Um Título", "Fulano de Tal", &opts());
        assert_eq!(
            stream[0],
            RenderInstruction::Title {
                text: "UM TÍTULO".to_string()
            }
        );
        assert_eq!(
            stream[1],
            RenderInstruction::Author {
                text: "Fulano de Tal".to_string()
            }
        );
    }

    #[test]
    fn title_placement_after_author() {
        let options = LayoutOptions {
            title_placement: TitlePlacement::AfterAuthor,
            ..opts()
        };
        let stream = render(&SectionMap::new(), "T", "A", &options);
        assert!(matches!(stream[0], RenderInstruction::Author { .. }));
        assert!(matches!(stream[1], RenderInstruction::Title { .. }));
    }

    #[test]
    fn surname_first_transform() {
        assert_eq!(surname_first("Maria Silva Santos"), "SANTOS, Maria Silva");
        assert_eq!(surname_first("Plato"), "Plato");
    }

    #[test]
    fn surname_first_option_rewrites_the_byline() {
        let options = LayoutOptions {
            surname_first: true,
            ..opts()
        };
        let stream = render(&SectionMap::new(), "T", "Maria Silva Santos", &options);
        assert!(stream.contains(&RenderInstruction::Author {
            text: "SANTOS, Maria Silva".to_string()
        }));

        let stream = render(&SectionMap::new(), "T", "Plato", &options);
        assert!(stream.contains(&RenderInstruction::Author {
            text: "Plato".to_string()
        }));
    }

    #[test]
    fn empty_map_renders_ten_placeholders_in_canonical_order() {
        let stream = render(&SectionMap::new(), "T", "A", &opts());
        let placeholders: Vec<&RenderInstruction> = stream
            .iter()
            .filter(|i| {
                matches!(i, RenderInstruction::Paragraph { text, .. }
                    if text == "Conteúdo não disponível.")
            })
            .collect();
        assert_eq!(placeholders.len(), 10);
    }

    #[test]
    fn numbered_headings_always_present() {
        let stream = render(&SectionMap::new(), "T", "A", &opts());
        let headings: Vec<String> = stream
            .iter()
            .filter_map(|i| match i {
                RenderInstruction::Heading { text } => Some(text.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(
            headings,
            vec![
                "1 INTRODUÇÃO",
                "2 REVISÃO DE LITERATURA",
                "3 METODOLOGIA",
                "4 RESULTADOS E DISCUSSÃO",
                "5 CONCLUSÃO",
                "REFERÊNCIAS",
            ]
        );
    }

    #[test]
    fn front_matter_first_paragraph_gets_bold_label_and_no_indent() {
        let mut sections = SectionMap::new();
        sections.insert(Summary, vec!["síntese".to_string(), "continuação".to_string()]);
        let stream = render(&sections, "T", "A", &opts());

        let summary: Vec<&RenderInstruction> = stream
            .iter()
            .filter(|i| {
                matches!(i, RenderInstruction::Paragraph { text, .. }
                    if text == "síntese" || text == "continuação")
            })
            .collect();
        assert_eq!(
            summary[0],
            &RenderInstruction::Paragraph {
                text: "síntese".to_string(),
                indented: false,
                justified: true,
                bold_prefix: Some("RESUMO: ".to_string()),
            }
        );
        assert_eq!(
            summary[1],
            &RenderInstruction::Paragraph {
                text: "continuação".to_string(),
                indented: false,
                justified: true,
                bold_prefix: None,
            }
        );
    }

    #[test]
    fn body_paragraphs_indented_and_justified() {
        let mut sections = SectionMap::new();
        sections.insert(Introduction, vec!["abre".to_string()]);
        let stream = render(&sections, "T", "A", &opts());
        assert!(stream.contains(&RenderInstruction::Paragraph {
            text: "abre".to_string(),
            indented: true,
            justified: true,
            bold_prefix: None,
        }));
    }

    #[test]
    fn references_unindented_and_unjustified() {
        let map = assemble("Referências\nSILVA, A. Um. 2020.\nSOUZA, B. Dois. 2021.\nLIMA, C. Três. 2022.");
        let stream = render(&map, "T", "A", &opts());
        let refs: Vec<&RenderInstruction> = stream
            .iter()
            .filter(|i| {
                matches!(i, RenderInstruction::Paragraph { text, .. } if text.ends_with("2020.") || text.ends_with("2021.") || text.ends_with("2022."))
            })
            .collect();
        assert_eq!(refs.len(), 3);
        for instruction in refs {
            match instruction {
                RenderInstruction::Paragraph {
                    indented,
                    justified,
                    bold_prefix,
                    ..
                } => {
                    assert!(!indented);
                    assert!(!justified);
                    assert!(bold_prefix.is_none());
                }
                _ => unreachable!(),
            }
        }
    }

    #[test]
    fn assemble_render_is_idempotent() {
        let text = "**Resumo:** síntese do artigo\n\n1. Introdução\nTexto de abertura.\nMais texto.\nReferências\nSILVA, A. Livro. 2020.";
        let first = render(&assemble(text), "Título", "Maria Silva Santos", &opts());
        let second = render(&assemble(text), "Título", "Maria Silva Santos", &opts());
        assert_eq!(first, second);
    }
}
