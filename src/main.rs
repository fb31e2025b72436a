//! pagesim: replay a page reference string through an LRU-K cache and print
//! frame occupancy after every reference.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use paging::{clamp_k, Cache, CacheConfig, IndexKind, PageId, PolicyKind};
use pagesim_error::{errconfig, errinput, Error, Result};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pagesim")]
#[command(about = "Simulate LRU-K page replacement over a reference string")]
#[command(version)]
struct Cli {
    /// Number of physical frames
    #[arg(short, long)]
    frames: usize,

    /// LRU-K threshold; values below 1 are treated as 1
    #[arg(short, long, default_value_t = 2, allow_negative_numbers = true)]
    k: i64,

    /// Largest valid page id (defaults to the largest id referenced)
    #[arg(long)]
    max_page: Option<PageId>,

    /// Expected number of references; a mismatch is rejected
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// Page index representation
    #[arg(long, value_enum, default_value_t = IndexArg::Auto)]
    index: IndexArg,

    /// Replacement policy
    #[arg(long, value_enum, default_value_t = PolicyArg::Segmented)]
    policy: PolicyArg,

    /// Read references from a file, or "-" for stdin
    #[arg(long, conflicts_with = "references")]
    file: Option<PathBuf>,

    /// Print the final report as JSON instead of the text summary
    #[arg(long)]
    json: bool,

    /// Don't print per-step frame occupancy
    #[arg(short, long)]
    quiet: bool,

    /// Page references, separated by spaces or commas. Read from stdin when
    /// neither these nor --file are given.
    references: Vec<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum IndexArg {
    Dense,
    Sparse,
    Auto,
}

impl From<IndexArg> for IndexKind {
    fn from(arg: IndexArg) -> Self {
        match arg {
            IndexArg::Dense => IndexKind::Dense,
            IndexArg::Sparse => IndexKind::Sparse,
            IndexArg::Auto => IndexKind::Auto,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyArg {
    Segmented,
    Tail,
    Scan,
    Lru,
}

impl From<PolicyArg> for PolicyKind {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Segmented => PolicyKind::Segmented,
            PolicyArg::Tail => PolicyKind::Tail,
            PolicyArg::Scan => PolicyKind::Scan,
            PolicyArg::Lru => PolicyKind::Lru,
        }
    }
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = simulate(&cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn simulate(cli: &Cli) -> Result<()> {
    let references = match &cli.file {
        Some(path) => parse_references(&read_source(Some(path.as_path()))?)?,
        None if cli.references.is_empty() => parse_references(&read_source(None)?)?,
        None => parse_references(&cli.references.join(" "))?,
    };
    let config = build_config(cli, &references)?;
    tracing::debug!(?config, references = references.len(), "starting simulation");
    let mut cache = Cache::new(config)?;

    let mut out = std::io::stdout().lock();
    replay(&mut cache, &references, cli.quiet, &mut out)?;

    if cli.json {
        let report = serde_json::to_string_pretty(&cache.report())
            .map_err(|err| Error::IO(err.to_string()))?;
        writeln!(out, "{report}")?;
        return Ok(());
    }
    write_summary(&cache, &mut out)
}

/// Feeds every reference to the cache, writing the frame line as soon as it
/// is processed. Invalid pages are skipped and repeat the previous line; any
/// other error aborts the run.
fn replay<W: Write>(
    cache: &mut Cache,
    references: &[PageId],
    quiet: bool,
    out: &mut W,
) -> Result<()> {
    for &page_id in references {
        match cache.reference(page_id) {
            Ok(_) => {}
            Err(err) if err.is_recoverable() => {}
            Err(err) => return Err(err),
        }
        if !quiet {
            writeln!(out, "{}", format_frames(cache.occupancy()))?;
        }
    }
    Ok(())
}

fn write_summary<W: Write>(cache: &Cache, out: &mut W) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "Total Page Faults = {}", cache.faults())?;
    writeln!(out)?;
    writeln!(out, "LRU-{} using {}", cache.k(), describe(cache.config().policy))?;
    write!(out, "{}", cache.snapshot())?;
    writeln!(out, "Page Faults: {}", cache.faults())?;
    Ok(())
}

/// Validates driver input against the engine configuration before any
/// reference is processed.
fn build_config(cli: &Cli, references: &[PageId]) -> Result<CacheConfig> {
    if let Some(count) = cli.count {
        if count != references.len() {
            return errconfig!(
                "expected {count} page references, got {}",
                references.len()
            );
        }
    }
    let max_page_id = cli
        .max_page
        .unwrap_or_else(|| references.iter().copied().max().unwrap_or(0));

    let config = CacheConfig::new(cli.frames, clamp_k(cli.k), max_page_id)
        .with_index(cli.index.into())
        .with_policy(cli.policy.into());
    config.validate()?;
    Ok(config)
}

fn read_source(path: Option<&Path>) -> Result<String> {
    let mut text = String::new();
    match path {
        Some(path) if path != Path::new("-") => text = std::fs::read_to_string(path)?,
        _ => {
            std::io::stdin().read_to_string(&mut text)?;
        }
    }
    Ok(text)
}

fn parse_references(text: &str) -> Result<Vec<PageId>> {
    let mut references = Vec::new();
    for token in text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
    {
        match token.parse::<PageId>() {
            Ok(page_id) => references.push(page_id),
            Err(_) => return errinput!("page reference {token:?} is not a non-negative integer"),
        }
    }
    Ok(references)
}

/// One line of frame contents in slot order, `-1` for an empty frame.
fn format_frames(occupancy: &[Option<PageId>]) -> String {
    occupancy
        .iter()
        .map(|page| match page {
            Some(page_id) => page_id.to_string(),
            None => "-1".to_string(),
        })
        .collect::<Vec<_>>()
        .join("\t")
}

fn describe(policy: PolicyKind) -> &'static str {
    match policy {
        PolicyKind::Segmented => {
            "hashtable and doubly linked lists (oldest K-th reference evicted)"
        }
        PolicyKind::Tail => "hashtable and doubly linked lists",
        PolicyKind::Scan => "frame array and linear scan",
        PolicyKind::Lru => "plain LRU",
    }
}
