//! CLI binary for lawchunk.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `PipelineConfig`, runs the pipeline over one or more page files, and
//! prints the chunk list as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use lawchunk::{process_document, process_page, PageText, PipelineConfig, PipelineOutput, RuleTables};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Chunk a merged statute document (stdout, JSON)
  lawchunk --doc-id 인사규정 statute.md

  # Multiple page files, in reading order
  lawchunk --doc-id 인사규정 page1.md page2.md page3.md -o chunks.json

  # Chunk one page, stamping its page number into chunk ids
  lawchunk --doc-id 인사규정 --page 3 page3.md

  # Custom typo rule tables
  lawchunk --rules rules.json statute.md

  # Also write the normalized Markdown the chunks were cut from
  lawchunk statute.md --markdown-out normalized.md

  # Show quality stats and per-stage replacement counts
  lawchunk --stats statute.md

A document with zero detected articles is reported as "no chunks
generated" and exits successfully with an empty list — not every input
is a statute.
"#;

/// Normalize statute Markdown and chunk it into per-article units.
#[derive(Parser, Debug)]
#[command(
    name = "lawchunk",
    version,
    about = "Normalize statute Markdown and chunk it into per-article units for RAG",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Markdown input files, one per page, in reading order. A single file
    /// is treated as an already-merged document.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Document identifier used in chunk ids.
    #[arg(long, env = "LAWCHUNK_DOC_ID", default_value = "unknown")]
    doc_id: String,

    /// JSON rule-table file overriding the embedded typo tables.
    #[arg(long, env = "LAWCHUNK_RULES")]
    rules: Option<PathBuf>,

    /// Page number for single-page mode; stamped into chunk ids/metadata.
    #[arg(long)]
    page: Option<usize>,

    /// Write the chunk JSON to this file instead of stdout.
    #[arg(short, long, env = "LAWCHUNK_OUTPUT")]
    output: Option<PathBuf>,

    /// Also write the normalized document Markdown to this file.
    #[arg(long)]
    markdown_out: Option<PathBuf>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,

    /// Print chunk statistics and per-stage counts to stderr.
    #[arg(long)]
    stats: bool,

    /// Skip the RAG boilerplate cleaner (input is already clean).
    #[arg(long)]
    skip_markdown_clean: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "LAWCHUNK_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "LAWCHUNK_QUIET")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let rules = match &cli.rules {
        Some(path) => RuleTables::from_path(path)
            .with_context(|| format!("loading rule tables from {}", path.display()))?,
        None => RuleTables::default(),
    };
    let config = PipelineConfig::builder()
        .doc_id(&cli.doc_id)
        .rules(rules)
        .skip_markdown_clean(cli.skip_markdown_clean)
        .build()?;

    // ── Read pages ───────────────────────────────────────────────────────
    let pages: Vec<PageText> = cli
        .inputs
        .iter()
        .enumerate()
        .map(|(i, path)| {
            std::fs::read_to_string(path)
                .map(|text| PageText::new(i + 1, text))
                .with_context(|| format!("reading {}", path.display()))
        })
        .collect::<Result<_>>()?;

    // ── Run pipeline ─────────────────────────────────────────────────────
    let output = match (cli.page, pages.as_slice()) {
        (Some(page_num), [single]) => {
            let page = PageText::new(page_num, single.markdown.clone());
            process_page(&page, &config)?
        }
        (Some(_), _) => {
            anyhow::bail!("--page requires exactly one input file");
        }
        (None, _) => process_document(&pages, &config)?,
    };

    // ── Emit results ─────────────────────────────────────────────────────
    if let Some(path) = &cli.markdown_out {
        std::fs::write(path, &output.markdown)
            .with_context(|| format!("writing {}", path.display()))?;
    }

    let json = if cli.pretty {
        serde_json::to_string_pretty(&output.chunks)?
    } else {
        serde_json::to_string(&output.chunks)?
    };
    match &cli.output {
        Some(path) => std::fs::write(path, &json)
            .with_context(|| format!("writing {}", path.display()))?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }

    if !cli.quiet {
        report(&output, cli.stats);
    }

    Ok(())
}

/// Human summary on stderr; JSON on stdout stays machine-clean.
fn report(output: &PipelineOutput, detailed: bool) {
    if output.chunks.is_empty() {
        eprintln!("no chunks generated (no article headers detected)");
    } else {
        eprintln!(
            "{} chunks across {} chapters / {} sections",
            output.stats.chunks, output.stats.chapters, output.stats.sections
        );
    }
    if detailed {
        eprintln!(
            "typo replacements: {} critical, {} domain, {} ocr, {} safe",
            output.typo_report.critical,
            output.typo_report.domain,
            output.typo_report.ocr,
            output.typo_report.safe
        );
        eprintln!(
            "merge cleanup: {} page markers, {} revision dupes, {} fences, {} bytes delta",
            output.merge_report.page_markers_removed,
            output.merge_report.revisions_deduped,
            output.merge_report.fences_removed,
            output.merge_report.length_delta
        );
        eprintln!(
            "change events: {} deleted, {} created, {} amended",
            output.stats.deleted_events, output.stats.created_events, output.stats.amended_events
        );
    }
}
