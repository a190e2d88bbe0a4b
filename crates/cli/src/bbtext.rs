//! bbtext - Print the text lines inside a rectangle of a laid-out page
//!
//! Reads a pdfminer-style XML layout dump (as written by `pdf2txt -t xml`)
//! and prints every text line of one page whose glyphs fall inside a
//! query rectangle, one JSON object per line.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use bbtext_core::high_level::query_page;
use bbtext_core::{
    CoverMode, MatchedLine, Query, QueryError, QueryRegion, XmlPageSource, open_layout_file,
};
use clap::{ArgAction, Parser, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Covering mode for glyphs against the query rectangle.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum Mode {
    /// Glyph lies entirely inside the rectangle (default)
    #[default]
    Contains,
    /// Glyph shares a non-empty area with the rectangle
    Overlaps,
}

impl From<Mode> for CoverMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Contains => CoverMode::Contains,
            Mode::Overlaps => CoverMode::Overlaps,
        }
    }
}

/// Print the text lines of a page that fall inside a rectangle, as
/// newline-delimited JSON.
///
/// By default A B C D are two opposite corners (x0 y0 x1 y1) in PDF page
/// space, origin bottom-left.
#[derive(Parser, Debug)]
#[command(name = "bbtext")]
#[command(author, version, about, long_about = None)]
#[command(allow_negative_numbers = true)]
struct Args {
    /// Page number (1-indexed)
    page: usize,

    /// x0, or x with --top-left
    a: f64,

    /// y0, or y with --top-left
    b: f64,

    /// x1, or width with --top-left
    c: f64,

    /// y1, or height with --top-left
    d: f64,

    /// Layout dump to read, or "-" for stdin
    file: PathBuf,

    /// Read A B C D as x y width height measured from the top-left corner
    /// of the page, y pointing down
    #[arg(long = "top-left", action = ArgAction::SetTrue)]
    top_left: bool,

    /// Covering mode
    #[arg(short = 'm', long, value_enum, ignore_case = true, default_value = "contains")]
    mode: Mode,

    /// Path to file where output is written, or "-" for stdout
    #[arg(short = 'o', long, default_value = "-")]
    outfile: String,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn build_query(args: &Args) -> anyhow::Result<Query> {
    let mode = CoverMode::from(args.mode);
    let query = if args.top_left {
        Query::top_left(args.a, args.b, args.c, args.d, mode)?
    } else {
        let region = QueryRegion::corners(args.a, args.b, args.c, args.d)?;
        Query::new(region, mode)
    };
    Ok(query)
}

fn run_query(args: &Args, query: &Query) -> anyhow::Result<Vec<MatchedLine>> {
    let lines = if args.file.as_os_str() == "-" {
        debug!("reading layout dump from stdin");
        let mut source = XmlPageSource::with_name(io::stdin().lock(), "-")?;
        query_page(&mut source, args.page, query)?
    } else {
        let mut source = open_layout_file(&args.file)?;
        query_page(&mut source, args.page, query)
            .with_context(|| format!("failed to query {}", args.file.display()))?
    };
    Ok(lines)
}

fn write_lines(output: &mut dyn Write, lines: &[MatchedLine]) -> anyhow::Result<()> {
    for line in lines {
        serde_json::to_writer(&mut *output, line)?;
        output.write_all(b"\n")?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    // Validate everything before touching the input.
    let query = build_query(&args)?;
    if args.page == 0 {
        return Err(QueryError::InvalidPageNumber(args.page).into());
    }

    let lines = run_query(&args, &query)?;
    debug!(matches = lines.len(), "query finished");

    let mut output: Box<dyn Write> = if args.outfile == "-" {
        Box::new(BufWriter::new(io::stdout()))
    } else {
        let file = File::create(&args.outfile)
            .with_context(|| format!("failed to create output file {}", args.outfile))?;
        Box::new(BufWriter::new(file))
    };
    write_lines(&mut output, &lines)?;
    output.flush()?;

    Ok(())
}
