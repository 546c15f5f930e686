//! The ten canonical article sections and their fixed output order.
//!
//! The order of the enum variants IS the canonical document order: the
//! derive of `Ord` makes a `BTreeMap<CanonicalSection, _>` iterate in
//! exactly the order the rendered document uses, and [`CanonicalSection::ALL`]
//! is the single place that order is written down. Heading recognition,
//! assembly, and rendering all consult this module instead of carrying
//! their own copies of the section tables.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the ten fixed parts of an ABNT article.
///
/// Variant order is significant: it defines the output document order,
/// which is independent of the order sections appear in generated text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CanonicalSection {
    /// Resumo (Portuguese summary).
    Summary,
    /// Palavras-chave.
    Keywords,
    /// Abstract (English summary).
    Abstract,
    /// Keywords (English).
    EnglishKeywords,
    /// 1 Introdução.
    Introduction,
    /// 2 Revisão de Literatura.
    LiteratureReview,
    /// 3 Metodologia.
    Methodology,
    /// 4 Resultados e Discussão.
    ResultsAndDiscussion,
    /// 5 Conclusão.
    Conclusion,
    /// Referências.
    References,
}

impl CanonicalSection {
    /// Every section in canonical document order.
    pub const ALL: [CanonicalSection; 10] = [
        CanonicalSection::Summary,
        CanonicalSection::Keywords,
        CanonicalSection::Abstract,
        CanonicalSection::EnglishKeywords,
        CanonicalSection::Introduction,
        CanonicalSection::LiteratureReview,
        CanonicalSection::Methodology,
        CanonicalSection::ResultsAndDiscussion,
        CanonicalSection::Conclusion,
        CanonicalSection::References,
    ];

    /// The uppercase document label, as printed in headings and inline labels.
    pub fn label(self) -> &'static str {
        match self {
            CanonicalSection::Summary => "RESUMO",
            CanonicalSection::Keywords => "PALAVRAS-CHAVE",
            CanonicalSection::Abstract => "ABSTRACT",
            CanonicalSection::EnglishKeywords => "KEYWORDS",
            CanonicalSection::Introduction => "INTRODUÇÃO",
            CanonicalSection::LiteratureReview => "REVISÃO DE LITERATURA",
            CanonicalSection::Methodology => "METODOLOGIA",
            CanonicalSection::ResultsAndDiscussion => "RESULTADOS E DISCUSSÃO",
            CanonicalSection::Conclusion => "CONCLUSÃO",
            CanonicalSection::References => "REFERÊNCIAS",
        }
    }

    /// ABNT body-section number (Introdução = 1 … Conclusão = 5).
    ///
    /// Front-matter and References carry no number.
    pub fn number(self) -> Option<u8> {
        match self {
            CanonicalSection::Introduction => Some(1),
            CanonicalSection::LiteratureReview => Some(2),
            CanonicalSection::Methodology => Some(3),
            CanonicalSection::ResultsAndDiscussion => Some(4),
            CanonicalSection::Conclusion => Some(5),
            _ => None,
        }
    }

    /// Front-matter sections render without a heading; their first paragraph
    /// carries a bold inline label instead.
    pub fn is_front_matter(self) -> bool {
        matches!(
            self,
            CanonicalSection::Summary
                | CanonicalSection::Keywords
                | CanonicalSection::Abstract
                | CanonicalSection::EnglishKeywords
        )
    }

    /// Regex fragment recognising this section's heading token, including the
    /// documented Portuguese/English spelling and accent variants.
    pub(crate) fn heading_pattern(self) -> &'static str {
        match self {
            CanonicalSection::Summary => "resumo",
            CanonicalSection::Keywords => "palavras-chave",
            CanonicalSection::Abstract => "abstract",
            CanonicalSection::EnglishKeywords => "keywords",
            CanonicalSection::Introduction => "introdução",
            CanonicalSection::LiteratureReview => "revis[aã]o de literatura",
            CanonicalSection::Methodology => "metodologia",
            CanonicalSection::ResultsAndDiscussion => "resultados e discussão",
            CanonicalSection::Conclusion => "conclus[aã]o",
            CanonicalSection::References => "refer[eê]ncias",
        }
    }
}

impl fmt::Display for CanonicalSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
