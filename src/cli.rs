use crate::config::{LayoutMode, load_config};
use crate::layout::compute_family_layout;
use crate::layout_dump::write_layout_dump;
use crate::person::parse_persons;
use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "famtree", version, about = "Family tree layout from a flat person list")]
pub struct Args {
    /// Person list JSON file, or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file for the nodes/edges JSON. Defaults to stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Config file (JSON or JSON5)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Use the compact (mobile) size preset
    #[arg(long, conflicts_with = "viewport_width")]
    pub compact: bool,

    /// Pick the size preset from a viewport width in pixels
    #[arg(long = "viewport-width")]
    pub viewport_width: Option<f32>,

    /// Pretty-print the output JSON
    #[arg(long)]
    pub pretty: bool,
}

pub fn run() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let mut config = load_config(args.config.as_deref())?;
    if let Some(mode) = requested_mode(&args) {
        config.layout.mode = mode;
    }

    let input = read_input(args.input.as_deref())?;
    let persons = parse_persons(&input)?;
    let layout = compute_family_layout(&persons, &config.layout);
    info!(
        nodes = layout.nodes.len(),
        edges = layout.edges.len(),
        mode = ?layout.mode,
        "layout computed"
    );
    write_layout_dump(args.output.as_deref(), &layout, &config.theme, args.pretty)
        .context("failed to write layout")?;
    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn requested_mode(args: &Args) -> Option<LayoutMode> {
    if args.compact {
        return Some(LayoutMode::Compact);
    }
    args.viewport_width.map(LayoutMode::for_viewport)
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()));
        }
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).expect("arguments should parse")
    }

    #[test]
    fn compact_flag_wins() {
        let args = parse(&["famtree", "--compact"]);
        assert_eq!(requested_mode(&args), Some(LayoutMode::Compact));
    }

    #[test]
    fn viewport_width_selects_preset() {
        let args = parse(&["famtree", "--viewport-width", "500"]);
        assert_eq!(requested_mode(&args), Some(LayoutMode::Compact));
        let args = parse(&["famtree", "--viewport-width", "1280"]);
        assert_eq!(requested_mode(&args), Some(LayoutMode::Regular));
        let args = parse(&["famtree"]);
        assert_eq!(requested_mode(&args), None);
    }

    #[test]
    fn compact_and_viewport_conflict() {
        assert!(Args::try_parse_from(["famtree", "--compact", "--viewport-width", "500"]).is_err());
    }

    #[test]
    fn parses_paths_and_pretty() {
        let args = parse(&["famtree", "-i", "tree.json", "-o", "out.json", "--pretty"]);
        assert_eq!(args.input.as_deref(), Some(Path::new("tree.json")));
        assert_eq!(args.output.as_deref(), Some(Path::new("out.json")));
        assert!(args.pretty);
    }
}
