//! Command-line parsing for the game-tree chart tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the fitting and drawing code.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use crate::domain::{ChartId, FamilyKind, DEFAULT_CURVE_SAMPLES, DEFAULT_MAX_EVALUATIONS};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "charts",
    version,
    about = "Game-tree complexity charts with fitted growth curves"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit and draw a chart to an SVG file.
    Render(RenderArgs),
    /// Draw a chart in the terminal.
    Show(ChartArgs),
    /// Write a chart's render plan (points, curve samples, labels) as JSON.
    Plan(PlanArgs),
    /// List the available charts.
    List,
}

/// Family override on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FamilyArg {
    /// Let the selector choose from the series' growth shape.
    Auto,
    LogPower,
    LogRational,
    LogLinear,
}

impl FamilyArg {
    /// `None` for `auto`.
    pub fn kind(self) -> Option<FamilyKind> {
        match self {
            FamilyArg::Auto => None,
            FamilyArg::LogPower => Some(FamilyKind::LogPower),
            FamilyArg::LogRational => Some(FamilyKind::LogRational),
            FamilyArg::LogLinear => Some(FamilyKind::LogLinear),
        }
    }
}

/// Options shared by every chart command.
#[derive(Debug, Parser, Clone)]
pub struct ChartArgs {
    /// Chart to build.
    #[arg(value_enum)]
    pub chart: ChartId,

    /// Override the chart's model family.
    #[arg(long, value_enum)]
    pub family: Option<FamilyArg>,

    /// Initial parameter guess, comma separated (e.g. `20,1,0,0`).
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub guess: Option<Vec<f64>>,

    /// Optimizer budget in model evaluations.
    #[arg(long, default_value_t = DEFAULT_MAX_EVALUATIONS)]
    pub max_evaluations: usize,

    /// Number of points sampled along the fitted curve.
    #[arg(long, default_value_t = DEFAULT_CURVE_SAMPLES)]
    pub samples: usize,

    /// Extrapolate the fitted curve up to this x.
    #[arg(long)]
    pub x_max: Option<f64>,

    /// Displayed value of the depth-80 estimate.
    #[arg(long)]
    pub estimate: Option<f64>,

    /// Value of the depth-80 point the fit consumes.
    #[arg(long)]
    pub pad: Option<f64>,
}

/// Options for `render`.
#[derive(Debug, Parser, Clone)]
pub struct RenderArgs {
    #[command(flatten)]
    pub chart: ChartArgs,

    /// Output file (default: `<chart>.svg`).
    #[arg(short, long, value_name = "SVG")]
    pub out: Option<PathBuf>,

    /// Image width in pixels (default: the chart's own).
    #[arg(long)]
    pub width: Option<u32>,

    /// Image height in pixels (default: the chart's own).
    #[arg(long)]
    pub height: Option<u32>,
}

/// Options for `plan`.
#[derive(Debug, Parser, Clone)]
pub struct PlanArgs {
    #[command(flatten)]
    pub chart: ChartArgs,

    /// Output file (default: stdout).
    #[arg(short, long, value_name = "JSON")]
    pub out: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_flags_parse() {
        let cli = Cli::parse_from([
            "charts",
            "-vv",
            "render",
            "growth-rate",
            "--family",
            "log-rational",
            "--guess",
            "1,-1,1,0",
            "--out",
            "g.svg",
            "--width",
            "1200",
        ]);
        assert_eq!(cli.verbose, 2);
        let Command::Render(args) = cli.command else {
            panic!("expected render");
        };
        assert_eq!(args.chart.chart, ChartId::GrowthRate);
        assert_eq!(args.chart.family, Some(FamilyArg::LogRational));
        assert_eq!(args.chart.guess, Some(vec![1.0, -1.0, 1.0, 0.0]));
        assert_eq!(args.chart.max_evaluations, DEFAULT_MAX_EVALUATIONS);
        assert_eq!(args.out, Some(PathBuf::from("g.svg")));
        assert_eq!(args.width, Some(1200));
        assert_eq!(args.height, None);
    }

    #[test]
    fn auto_family_has_no_kind() {
        assert_eq!(FamilyArg::Auto.kind(), None);
        assert_eq!(FamilyArg::LogLinear.kind(), Some(FamilyKind::LogLinear));
    }

    #[test]
    fn unknown_chart_is_rejected() {
        assert!(Cli::try_parse_from(["charts", "show", "tic-tac-toe"]).is_err());
    }
}
