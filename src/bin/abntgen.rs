//! CLI binary for abntgen.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ArticleConfig` and prints results.

use abntgen::{
    compose, generate, ArticleConfig, ArticleRequest, ArtifactStore, OutputFormat, TitlePlacement,
};
use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Generate PDF + DOCX (key from GEMINI_API_KEY)
  abntgen "Energia Solar no Brasil" "energia renovável" --author "Maria Silva Santos"

  # DOCX only, ABNT surname-first byline, recorded in a local database
  abntgen "Educação Híbrida" "ensino a distância" -a "João Souza" \
      --format docx --surname-first --db artigos.db

  # Large-title variant (16 pt), title below the author line
  abntgen "Um Título" "um tema" --title-pt 16 --title-after-author

  # Re-render hand-edited text without calling the generator
  abntgen "Energia Solar no Brasil" --from-file artigo_editado.txt -a "Maria"

  # List recorded runs
  abntgen --list --db artigos.db

  # Machine-readable run summary
  abntgen "Um Título" "um tema" --json > run.json

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY        Gemini API key (legacy alias: API_KEY)
  ABNTGEN_MODEL         Override the generator model ID
  ABNTGEN_OUTPUT_DIR    Override the artifact output directory
  ABNTGEN_DB            Artifact database path

SETUP:
  1. Set API key:   export GEMINI_API_KEY=...
  2. Generate:      abntgen "Título do Artigo" "tema da pesquisa"

  Artifacts land in ./output_files/ (created on first use), named after the
  title with whitespace replaced by underscores.
"#;

/// Generate ABNT-formatted academic articles as PDF and DOCX.
#[derive(Parser, Debug)]
#[command(
    name = "abntgen",
    version,
    about = "Generate ABNT-formatted academic articles as PDF and DOCX",
    long_about = "Generate a complete ABNT-structured academic article from a title and topic \
using the Gemini API, then render it into PDF and DOCX with ABNT typography (canonical section \
order, numbered headings, 1.25 cm indents, justified body text).",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Article title.
    #[arg(required_unless_present = "list")]
    title: Option<String>,

    /// Research topic handed to the generator (not needed with --from-file).
    topic: Option<String>,

    /// Author byline.
    #[arg(short, long, default_value = "")]
    author: String,

    /// Artifact output directory.
    #[arg(short, long, env = "ABNTGEN_OUTPUT_DIR", default_value = "output_files")]
    output_dir: PathBuf,

    /// Artifacts to produce.
    #[arg(long, value_enum, default_value = "both")]
    format: FormatArg,

    /// Generator model ID.
    #[arg(long, env = "ABNTGEN_MODEL", default_value = "gemini-2.0-flash")]
    model: String,

    /// Gemini API key (defaults to GEMINI_API_KEY / API_KEY).
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Re-render article text from this file instead of calling the generator.
    #[arg(long)]
    from_file: Option<PathBuf>,

    /// Record runs in this SQLite database.
    #[arg(long, env = "ABNTGEN_DB")]
    db: Option<PathBuf>,

    /// List recorded runs and exit (requires --db).
    #[arg(long)]
    list: bool,

    /// Title font size in points (12 classic, 16 large).
    #[arg(long, default_value_t = 12, value_parser = clap::value_parser!(u8).range(6..=72))]
    title_pt: u8,

    /// Section heading font size in points.
    #[arg(long, default_value_t = 12, value_parser = clap::value_parser!(u8).range(6..=72))]
    heading_pt: u8,

    /// Place the title below the author line.
    #[arg(long)]
    title_after_author: bool,

    /// Render the author as "SURNAME, Given Names".
    #[arg(long)]
    surname_first: bool,

    /// Paragraph substituted for sections the generator did not produce.
    #[arg(long, default_value = "Conteúdo não disponível.")]
    placeholder: String,

    /// Retries on transient generator failures.
    #[arg(long, default_value_t = 3)]
    max_retries: u32,

    /// Per-call generator timeout in seconds.
    #[arg(long, default_value_t = 120)]
    api_timeout: u64,

    /// Print the run summary as JSON.
    #[arg(long)]
    json: bool,

    /// Disable the progress spinner.
    #[arg(long)]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Both,
    Pdf,
    Docx,
}

impl From<FormatArg> for OutputFormat {
    fn from(v: FormatArg) -> Self {
        match v {
            FormatArg::Both => OutputFormat::Both,
            FormatArg::Pdf => OutputFormat::Pdf,
            FormatArg::Docx => OutputFormat::Docx,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    // ── List mode ────────────────────────────────────────────────────────
    if cli.list {
        let db = cli
            .db
            .clone()
            .context("--list requires --db (or ABNTGEN_DB)")?;
        let rows = ArtifactStore::new(db).list().context("Failed to list runs")?;
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&rows)?);
        } else if rows.is_empty() {
            println!("No recorded runs.");
        } else {
            for row in rows {
                println!(
                    "{:>4}  {}  {:<40}  {}  pdf:{} docx:{}",
                    row.id,
                    row.created_at,
                    row.title,
                    row.author,
                    if row.produced_pdf { "✓" } else { "–" },
                    if row.produced_docx { "✓" } else { "–" },
                );
            }
        }
        return Ok(());
    }

    let title = cli.title.clone().expect("required unless --list");
    let config = build_config(&cli)?;

    // ── Compose mode: re-render existing text ────────────────────────────
    if let Some(ref from_file) = cli.from_file {
        let raw_text = std::fs::read_to_string(from_file)
            .with_context(|| format!("Failed to read {}", from_file.display()))?;
        let output = compose(&raw_text, &title, &cli.author, cli.format.into(), &config)
            .context("Rendering failed")?;
        print_summary(&cli, &output)?;
        return Ok(());
    }

    // ── Generate mode ────────────────────────────────────────────────────
    let topic = cli
        .topic
        .clone()
        .context("TOPIC is required unless --from-file is given")?;
    let request = ArticleRequest {
        title,
        topic,
        author: cli.author.clone(),
        format: cli.format.into(),
    };

    let spinner = if cli.quiet || cli.no_progress || cli.json {
        None
    } else {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(format!("Generating \"{}\"…", request.title));
        bar.enable_steady_tick(Duration::from_millis(80));
        Some(bar)
    };

    let result = generate(&request, &config).await;
    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }
    let output = result.context("Generation failed")?;

    print_summary(&cli, &output)?;
    Ok(())
}

/// Map CLI args to `ArticleConfig`.
fn build_config(cli: &Cli) -> Result<ArticleConfig> {
    let mut builder = ArticleConfig::builder()
        .output_dir(cli.output_dir.clone())
        .model(cli.model.clone())
        .max_retries(cli.max_retries)
        .api_timeout_secs(cli.api_timeout)
        .title_pt(cli.title_pt)
        .heading_pt(cli.heading_pt)
        .surname_first(cli.surname_first)
        .placeholder(cli.placeholder.clone());

    if cli.title_after_author {
        builder = builder.title_placement(TitlePlacement::AfterAuthor);
    }
    if let Some(ref key) = cli.api_key {
        builder = builder.api_key(key.clone());
    }
    if let Some(ref db) = cli.db {
        builder = builder.db_path(db.clone());
    }

    builder.build().context("Invalid configuration")
}

fn print_summary(cli: &Cli, output: &abntgen::ArticleOutput) -> Result<()> {
    if cli.json {
        println!("{}", serde_json::to_string_pretty(output)?);
        return Ok(());
    }
    if cli.quiet {
        return Ok(());
    }

    eprintln!(
        "{} {}  {}",
        green("✔"),
        bold(&output.title),
        dim(&format!(
            "{}/{} sections, {} paragraphs, {}ms",
            output.stats.sections_found,
            abntgen::CanonicalSection::ALL.len(),
            output.stats.paragraphs,
            output.stats.total_duration_ms
        )),
    );
    for path in [&output.pdf_path, &output.docx_path].into_iter().flatten() {
        eprintln!("   → {}", path.display());
    }
    if output.stats.recorded {
        eprintln!("   {}", dim("recorded in artifact database"));
    }
    Ok(())
}
