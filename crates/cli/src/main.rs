//! CLI tool for composing slide decks from CSV tables and spreadsheets.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use deck_core::{
    Deck, DeckBuilder, EnrichmentService, NoEnrichment, OutlineFormatter, SlideComposer,
    SlideSize,
};
use deck_remote::{EnricherConfig, HttpEnricher, ImageResolver};
use deck_table::{Table, TableReader};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Records shown by --preview.
const PREVIEW_ROWS: usize = 10;

/// Output format of the composed deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Slide specifications as JSON, for a renderer.
    Json,
    /// Human-readable plain-text outline.
    Outline,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "deck.json",
            OutputFormat::Outline => "outline.txt",
        }
    }
}

/// Compose slide decks from CSV or Excel files with title, content and image columns.
#[derive(Parser, Debug)]
#[command(name = "deck-gen")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input CSV or spreadsheet file(s)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Output directory (default: same as input file)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print output to stdout instead of writing to file
    #[arg(short, long)]
    print: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Slide width in inches (default: 10)
    #[arg(long)]
    slide_width: Option<f64>,

    /// Slide height in inches (default: 7.5)
    #[arg(long)]
    slide_height: Option<f64>,

    /// Use a 16:9 slide
    #[arg(long, conflicts_with_all = ["slide_width", "slide_height"])]
    widescreen: bool,

    /// Directory relative image paths are resolved against
    #[arg(long)]
    image_dir: Option<PathBuf>,

    /// Seconds allowed for fetching one image
    #[arg(long, default_value = "10")]
    image_timeout: u64,

    /// Summarization endpoint
    #[arg(long, env = "DECK_SUMMARIZE_URL")]
    summarize_url: Option<String>,

    /// Text generation endpoint used to expand short content
    #[arg(long, env = "DECK_EXPAND_URL")]
    expand_url: Option<String>,

    /// Bearer token for the enrichment endpoints
    #[arg(long, env = "DECK_API_TOKEN", hide_env_values = true)]
    api_token: Option<String>,

    /// Seconds allowed for one enrichment request
    #[arg(long, default_value = "60")]
    enrich_timeout: u64,

    /// Show columns, row count and the first rows instead of composing
    #[arg(long)]
    preview: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn slide_size(&self) -> SlideSize {
        if self.widescreen {
            return SlideSize::WIDESCREEN;
        }
        let default = SlideSize::default();
        SlideSize::new(
            self.slide_width.unwrap_or(default.width),
            self.slide_height.unwrap_or(default.height),
        )
    }

    fn enricher_config(&self) -> EnricherConfig {
        EnricherConfig {
            summarize_url: self.summarize_url.clone(),
            expand_url: self.expand_url.clone(),
            api_token: self.api_token.clone(),
            timeout: Duration::from_secs(self.enrich_timeout),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let config = args.enricher_config();
    let service: Box<dyn EnrichmentService> = if config.is_configured() {
        Box::new(HttpEnricher::new(config).context("Failed to set up enrichment client")?)
    } else {
        log::info!("No enrichment endpoints configured, content is used as-is");
        Box::new(NoEnrichment)
    };

    let mut images = ImageResolver::with_timeout(Duration::from_secs(args.image_timeout))
        .context("Failed to set up image fetching")?;
    if let Some(dir) = &args.image_dir {
        images = images.with_base_dir(dir);
    }

    let builder = DeckBuilder::new(service.as_ref(), &images)
        .with_composer(SlideComposer::new().with_slide_size(args.slide_size()));

    for input_path in &args.input {
        if args.verbose {
            eprintln!("Processing: {}", input_path.display());
        }

        match process_file(input_path, &args, &builder) {
            Ok(output) => {
                if args.print || args.preview {
                    print!("{}", output);
                } else {
                    let output_path =
                        get_output_path(input_path, args.output.as_ref(), args.format)?;
                    write_output(&output_path, &output)?;
                    if args.verbose {
                        eprintln!("Written to: {}", output_path.display());
                    }
                }
            }
            Err(e) => {
                eprintln!("Error processing {}: {:#}", input_path.display(), e);
            }
        }
    }

    Ok(())
}

/// Process a single table file.
fn process_file(input_path: &Path, args: &Args, builder: &DeckBuilder<'_>) -> Result<String> {
    let table = TableReader::new()
        .read_path(input_path)
        .with_context(|| format!("Failed to read {}", input_path.display()))?;

    if args.preview {
        return Ok(format_preview(&table));
    }

    let source = input_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown");

    let deck = if table.has_slide_columns() {
        builder.build_deck(source, &table.rows())
    } else {
        log::warn!(
            "{} has no title/content columns, composing a single table slide",
            source
        );
        builder.build_table_deck(source, table.headers.clone(), table.records.clone())
    };

    if args.verbose {
        eprintln!("  Composed {} slides", deck.slide_count());
    }

    render(&deck, args.format)
}

/// Serialize a deck in the requested format.
fn render(deck: &Deck, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(deck).context("Failed to serialize deck")?;
            Ok(format!("{}\n", json))
        }
        OutputFormat::Outline => Ok(OutlineFormatter::new().format_with_newline(deck)),
    }
}

/// Column names, row count and the first few records.
fn format_preview(table: &Table) -> String {
    let mut lines = vec![
        format!("Columns: {}", table.headers.join(", ")),
        format!("Rows: {}", table.row_count()),
    ];
    lines.extend(table.preview(PREVIEW_ROWS).iter().map(|r| r.join(" | ")));
    format!("{}\n", lines.join("\n"))
}

/// Determine the output path for a processed file.
fn get_output_path(
    input_path: &Path,
    output_dir: Option<&PathBuf>,
    format: OutputFormat,
) -> Result<PathBuf> {
    let stem = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");

    let output_filename = format!("{}.{}", stem, format.extension());

    let output_path = match output_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
            dir.join(output_filename)
        }
        None => {
            if let Some(parent) = input_path.parent() {
                parent.join(output_filename)
            } else {
                PathBuf::from(output_filename)
            }
        }
    };

    Ok(output_path)
}

/// Write output to a file.
fn write_output(path: &Path, content: &str) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write to {}", path.display()))?;

    Ok(())
}
