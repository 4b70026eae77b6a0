//! pagetext CLI - reading-order text inspection tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;

use pagetext::render::{self, PageSnapshot};
use pagetext::{
    load_recording_with_options, JsonFormat, LayoutOptions, Rect, SearchOptions, TextDocument,
};

#[derive(Parser)]
#[command(name = "pagetext")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Rebuild reading-order text from recorded glyph events", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print reading-order text
    Text {
        /// Input recording (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Only this page (1-indexed)
        #[arg(long)]
        page: Option<u32>,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Print a JSON snapshot of the bands
    Json {
        /// Input recording (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Search reading-order text
    Search {
        /// Input recording (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Regex pattern
        #[arg(value_name = "PATTERN")]
        pattern: String,

        /// Case insensitive matching
        #[arg(short, long)]
        ignore_case: bool,

        /// Treat the pattern as literal text
        #[arg(short = 'F', long)]
        literal: bool,

        /// Match whole words only
        #[arg(short, long)]
        word: bool,

        /// Stop after this many hits (0 = unlimited)
        #[arg(short = 'm', long, default_value = "0")]
        max_results: usize,

        /// Print hits as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Select the text under a rectangle
    Select {
        /// Input recording (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Page (1-indexed)
        #[arg(long, default_value = "1")]
        page: u32,

        /// Selection rectangle as x,y,width,height
        #[arg(long, value_parser = parse_rect)]
        rect: Rect,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Show page and word statistics
    Info {
        /// Input recording (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Show version information
    Version,
}

/// Layout tuning shared by every subcommand.
#[derive(Args, Clone, Debug)]
struct LayoutArgs {
    /// Glyph height divisor for word-break detection
    #[arg(long, default_value_t = pagetext::parser::DEFAULT_SPACE_FRACTION)]
    space_fraction: f32,

    /// Cap on synthesized spaces per gap
    #[arg(long, default_value_t = pagetext::parser::DEFAULT_MAX_SYNTHETIC_SPACES)]
    max_spaces: usize,

    /// Sort bands strictly top to bottom instead of keeping columns
    #[arg(long)]
    top_to_bottom: bool,

    /// Drop words painted twice at the same place
    #[arg(long)]
    dedupe: bool,

    /// Disable parallel page processing
    #[arg(long)]
    sequential: bool,
}

impl From<&LayoutArgs> for LayoutOptions {
    fn from(args: &LayoutArgs) -> Self {
        LayoutOptions::new()
            .with_space_fraction(args.space_fraction)
            .with_max_synthetic_spaces(args.max_spaces)
            .with_preserve_columns(!args.top_to_bottom)
            .with_remove_duplicates(args.dedupe)
            .with_parallel(!args.sequential)
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Text {
            input,
            output,
            page,
            layout,
        }) => cmd_text(&input, output.as_deref(), page, &layout),
        Some(Commands::Json {
            input,
            output,
            compact,
            layout,
        }) => cmd_json(&input, output.as_deref(), compact, &layout),
        Some(Commands::Search {
            input,
            pattern,
            ignore_case,
            literal,
            word,
            max_results,
            json,
            layout,
        }) => {
            let options = SearchOptions::new()
                .with_case_insensitive(ignore_case)
                .with_literal(literal)
                .with_whole_word(word)
                .with_max_results(max_results);
            cmd_search(&input, &pattern, &options, json, &layout)
        }
        Some(Commands::Select {
            input,
            page,
            rect,
            layout,
        }) => cmd_select(&input, page, &rect, &layout),
        Some(Commands::Info { input, layout }) => cmd_info(&input, &layout),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!("{}", "Usage: pagetext <COMMAND> <FILE>".yellow());
            println!("       pagetext --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn load(input: &Path, layout: &LayoutArgs) -> pagetext::Result<TextDocument> {
    let options = LayoutOptions::from(layout);
    log::info!("loading {} with {:?}", input.display(), options);
    load_recording_with_options(input, options)
}

fn emit(output: Option<&Path>, content: &str) -> CliResult {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn parse_rect(value: &str) -> Result<Rect, String> {
    let parts: Vec<f32> = value
        .split(',')
        .map(|p| p.trim().parse::<f32>())
        .collect::<Result<_, _>>()
        .map_err(|e| format!("Invalid rectangle '{}': {}", value, e))?;
    match parts.as_slice() {
        [x, y, width, height] => Ok(Rect::new(*x, *y, *width, *height)),
        _ => Err(format!(
            "Invalid rectangle '{}': expected x,y,width,height",
            value
        )),
    }
}

fn cmd_text(input: &Path, output: Option<&Path>, page: Option<u32>, layout: &LayoutArgs) -> CliResult {
    let mut doc = load(input, layout)?;
    let text = match page {
        Some(number) => render::to_text(doc.page_mut(number)?),
        None => render::document_to_text(&mut doc),
    };
    emit(output, &text)
}

fn cmd_json(input: &Path, output: Option<&Path>, compact: bool, layout: &LayoutArgs) -> CliResult {
    let mut doc = load(input, layout)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = render::document_to_json(&mut doc, format)?;
    emit(output, &json)
}

fn cmd_search(
    input: &Path,
    pattern: &str,
    options: &SearchOptions,
    json: bool,
    layout: &LayoutArgs,
) -> CliResult {
    let mut doc = load(input, layout)?;
    let hits = doc.search(pattern, options)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&hits)?);
        return Ok(());
    }

    for hit in &hits {
        let bounds = hit.bounds();
        println!(
            "{} {} {} {}",
            format!("p{}", hit.page).cyan(),
            format!("band {}", hit.band).dimmed(),
            hit.text.bold(),
            format!(
                "[{:.1}, {:.1}, {:.1}, {:.1}]",
                bounds.x, bounds.y, bounds.width, bounds.height
            )
            .dimmed()
        );
    }
    println!("\n{} {} hits", "Done!".green().bold(), hits.len());

    Ok(())
}

fn cmd_select(input: &Path, page: u32, rect: &Rect, layout: &LayoutArgs) -> CliResult {
    let mut doc = load(input, layout)?;
    let page = doc.page_mut(page)?;
    let count = page.select_in_rect(rect);
    log::debug!("{} glyphs selected", count);
    println!("{}", page.selected_text());
    Ok(())
}

fn cmd_info(input: &Path, layout: &LayoutArgs) -> CliResult {
    let mut doc = load(input, layout)?;
    doc.sort_all();

    println!("{}", "Recording Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Pages".bold(), doc.page_count());

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    for number in 1..=doc.page_count() {
        let page = doc.page_mut(number)?;
        let snapshot = PageSnapshot::capture(page, number);
        let layers = page.layers().filter(|(_, visible)| !visible).count();
        println!(
            "{} {}: {} lines, {} words, {} glyphs, {} bands, {} hidden layers",
            "Page".bold(),
            number,
            page.lines().len(),
            page.word_count(),
            page.glyph_count(),
            snapshot.bands.len(),
            layers
        );
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pagetext".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Reading-order text inspection tool");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/pagetext".dimmed());
    println!("License: MIT");
}
