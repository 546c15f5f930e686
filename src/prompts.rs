//! The article-generation prompt.
//!
//! Centralising the prompt here serves two purposes:
//!
//! 1. **Single source of truth** — the section names the prompt asks for and
//!    the section names the segmentation engine recognises must stay in sync;
//!    one module makes drift reviewable.
//!
//! 2. **Testability** — unit tests can inspect the interpolated prompt
//!    without calling a real generator.

/// Build the ABNT article prompt for the given (already title-cased) title
/// and topic.
pub fn article_prompt(title: &str, topic: &str) -> String {
    format!(
        r#"Gere um artigo acadêmico completo e bem estruturado sobre **"{topic}"** com o título **"{title}"**, seguindo rigorosamente as normas da ABNT. O artigo deve conter as seguintes seções obrigatórias, com seus respectivos conteúdos e tamanhos mínimos:

**1. Título**
- Deve aparecer centralizado no início.

**2. Resumo (em português)**
- Um parágrafo entre 150 a 250 palavras que sintetize os principais pontos do artigo.

**3. Palavras-chave (em português)**
- De 3 a 5 palavras separadas por ponto e vírgula (;).

**4. Abstract (em inglês)**
- Um parágrafo com a tradução do resumo, entre 150 a 250 palavras.
- Sintetize os principais pontos do artigo em inglês.

**5. Keywords (em inglês)**
- Tradução das palavras-chave, entre 3 e 5 termos separados por ponto e vírgula (;).

**6. Introdução**
- Apresente o tema, justificativa, problema e objetivo da pesquisa.
- Mínimo de 200 palavras.

**7. Revisão de Literatura**
- Discorra sobre conceitos teóricos importantes sobre o tema.
- Utilize ao menos 2 citações no estilo ABNT: (SOBRENOME, ano, p.xx).
- Mínimo de 300 palavras.

**8. Metodologia**
- Descreva os métodos e procedimentos adotados para desenvolver o trabalho.
- Pode incluir abordagem qualitativa/quantitativa, revisão bibliográfica, etc.
- Mínimo de 200 palavras.

**9. Resultados e Discussão**
- Apresente os principais resultados esperados ou obtidos.
- Relacione com a literatura citada.
- Mínimo de 300 palavras.

**10. Conclusão**
- Retome os objetivos, destaque as contribuições e proponha trabalhos futuros.
- Mínimo de 150 palavras.

**11. Referências**
- Liste pelo menos **3 referências no formato ABNT.**
- Exemplo: SOBRENOME, Nome. *Título do Livro ou Artigo*. Local: Editora, Ano.
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_title_and_topic() {
        let prompt = article_prompt("Energia Solar No Brasil", "energia renovável");
        assert!(prompt.contains(r#"**"Energia Solar No Brasil"**"#));
        assert!(prompt.contains(r#"**"energia renovável"**"#));
    }

    #[test]
    fn asks_for_every_recognised_section() {
        let prompt = article_prompt("T", "t");
        for name in [
            "Resumo",
            "Palavras-chave",
            "Abstract",
            "Keywords",
            "Introdução",
            "Revisão de Literatura",
            "Metodologia",
            "Resultados e Discussão",
            "Conclusão",
            "Referências",
        ] {
            assert!(prompt.contains(name), "prompt must request {name}");
        }
    }
}
