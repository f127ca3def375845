//! rrview CLI: inspects FPGA routing-resource graphs and routing solutions.
//!
//! `rrview coords` prints floorplan positions of graph nodes, `rrview summary`
//! reports wirelength and deviation for every net, `rrview bbox` measures net
//! bounding boxes and `rrview congestion` reports wire and channel-slot load.

#![warn(missing_docs)]

mod bbox;
mod congestion;
mod coords;
mod pipeline;
mod summary;

use std::io::IsTerminal;
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// rrview: routing-resource graph viewer and metrics.
#[derive(Parser, Debug)]
#[command(name = "rrview", version, about = "FPGA routing-resource graph metrics")]
pub struct Cli {
    /// Show only errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Also show informational notes.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to an `rrview.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// HPWL and deviation summary over all nets.
    Summary(SummaryArgs),
    /// Floorplan coordinates of graph nodes.
    Coords(CoordsArgs),
    /// Bounding box of a net (default: the net with the largest box).
    Bbox(BboxArgs),
    /// Wire and channel-segment congestion.
    Congestion(CongestionArgs),
}

/// Input files shared by every command. Fall back to `[inputs]` in the
/// configuration file.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Routing-resource graph description (VPR `rr_graph` XML or JSON).
    #[arg(long)]
    pub rrg: Option<String>,

    /// Routing solution (`.route` text).
    #[arg(long)]
    pub route: Option<String>,
}

/// Arguments for `rrview summary`.
#[derive(Parser, Debug)]
pub struct SummaryArgs {
    /// Input files.
    #[command(flatten)]
    pub inputs: InputArgs,

    /// Number of nets in each ranking (default: `report.top_n`).
    #[arg(long)]
    pub top: Option<usize>,

    /// Only nets with exactly this many SINKs.
    #[arg(long)]
    pub fanout: Option<usize>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for `rrview coords`.
#[derive(Parser, Debug)]
pub struct CoordsArgs {
    /// Input files; the route is optional and only supplies the array size.
    #[command(flatten)]
    pub inputs: InputArgs,

    /// Node ids to map (default: every node).
    #[arg(long = "node")]
    pub nodes: Vec<u32>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for `rrview bbox`.
#[derive(Parser, Debug)]
pub struct BboxArgs {
    /// Input files.
    #[command(flatten)]
    pub inputs: InputArgs,

    /// Serial index of the net to measure.
    #[arg(long)]
    pub net: Option<u32>,

    /// Measure SOURCE and SINK nodes only.
    #[arg(long)]
    pub terminals: bool,

    /// Only consider nets with exactly this many SINKs.
    #[arg(long)]
    pub fanout: Option<usize>,

    /// Padding on every side (default: `report.bbox_padding`).
    #[arg(long)]
    pub padding: Option<f64>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for `rrview congestion`.
#[derive(Parser, Debug)]
pub struct CongestionArgs {
    /// Input files.
    #[command(flatten)]
    pub inputs: InputArgs,

    /// Report channel slots instead of individual wires.
    #[arg(long)]
    pub segments: bool,

    /// Report per-track peak load instead of distinct-net load.
    #[arg(long, conflicts_with = "segments")]
    pub peak: bool,

    /// Include wires nobody uses.
    #[arg(long)]
    pub all: bool,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Color when stderr is a terminal.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable tables.
    Text,
    /// Machine-readable JSON.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Show only errors.
    pub quiet: bool,
    /// Also show notes.
    pub verbose: bool,
    /// Use ANSI colors in diagnostics.
    pub color: bool,
    /// Optional path to a config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::io::stderr().is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Summary(ref args) => summary::run(args, &global),
        Command::Coords(ref args) => coords::run(args, &global),
        Command::Bbox(ref args) => bbox::run(args, &global),
        Command::Congestion(ref args) => congestion::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
