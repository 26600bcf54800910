//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - installs the log subscriber
//! - builds the requested chart
//! - hands it to a front-end (SVG file, terminal, plan JSON)

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::charts::{ChartOptions, FamilyChoice};
use crate::cli::{ChartArgs, Command, PlanArgs, RenderArgs};
use crate::domain::ChartId;
use crate::error::{AppError, EXIT_CONFIG};
use crate::render::Theme;
use crate::report::ChartSummary;

pub mod pipeline;

/// Entry point for the `charts` binary.
pub fn run() -> Result<(), AppError> {
    // `charts branching-factor` is shorthand for `charts show branching-factor`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);
    init_logging(cli.verbose);

    match cli.command {
        Command::Render(args) => handle_render(args),
        Command::Show(args) => handle_show(args),
        Command::Plan(args) => handle_plan(args),
        Command::List => {
            print!("{}", crate::report::format_chart_list());
            Ok(())
        }
    }
}

/// Logs go to stderr so `plan` output on stdout stays clean JSON.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_render(args: RenderArgs) -> Result<(), AppError> {
    let opts = chart_options_from_args(&args.chart)?;
    let built = pipeline::run_chart(args.chart.chart, &opts)?;

    let (default_w, default_h) = built.plan.size;
    let size = (
        args.width.unwrap_or(default_w),
        args.height.unwrap_or(default_h),
    );
    if size.0 == 0 || size.1 == 0 {
        return Err(AppError::new(
            EXIT_CONFIG,
            format!("Image size must be positive, got {}x{}.", size.0, size.1),
        ));
    }

    let path = args
        .out
        .unwrap_or_else(|| default_output(args.chart.chart));
    crate::render::render_to_svg(&built.plan, &path, size, &Theme::default())?;

    let summary = ChartSummary::from_build(&built, Some(path));
    println!("{}", crate::report::format_summary(&summary));
    Ok(())
}

fn handle_show(args: ChartArgs) -> Result<(), AppError> {
    let opts = chart_options_from_args(&args)?;
    let built = pipeline::run_chart(args.chart, &opts)?;
    let summary = crate::report::format_summary(&ChartSummary::from_build(&built, None));
    crate::tui::run(&built.plan, Some(summary), &Theme::default())
}

fn handle_plan(args: PlanArgs) -> Result<(), AppError> {
    let opts = chart_options_from_args(&args.chart)?;
    let built = pipeline::run_chart(args.chart.chart, &opts)?;
    crate::io::write_plan(&built.plan, args.out.as_deref())
}

fn default_output(id: ChartId) -> PathBuf {
    PathBuf::from(format!("{}.svg", id.slug()))
}

/// Map CLI flags onto [`ChartOptions`], rejecting values no chart can use.
pub fn chart_options_from_args(args: &ChartArgs) -> Result<ChartOptions, AppError> {
    if args.max_evaluations == 0 {
        return Err(AppError::new(
            EXIT_CONFIG,
            "--max-evaluations must be at least 1.",
        ));
    }
    if args.samples < 2 {
        return Err(AppError::new(
            EXIT_CONFIG,
            format!("--samples must be at least 2, got {}.", args.samples),
        ));
    }
    for (flag, value) in [
        ("--x-max", args.x_max),
        ("--estimate", args.estimate),
        ("--pad", args.pad),
    ] {
        if value.is_some_and(|v| !v.is_finite()) {
            return Err(AppError::new(
                EXIT_CONFIG,
                format!("{flag} must be a finite number."),
            ));
        }
    }

    if (args.estimate.is_some() || args.pad.is_some()) && !args.chart.has_estimate() {
        return Err(AppError::new(
            EXIT_CONFIG,
            format!(
                "--estimate and --pad do not apply to {}: it has no depth-80 estimate.",
                args.chart.slug()
            ),
        ));
    }

    let family = match args.family {
        None => FamilyChoice::Declared,
        Some(arg) => arg.kind().map_or(FamilyChoice::Auto, FamilyChoice::Fixed),
    };

    Ok(ChartOptions {
        family,
        initial_guess: args.guess.clone(),
        max_evaluations: args.max_evaluations,
        samples: args.samples,
        x_max: args.x_max,
        estimate: args.estimate,
        pad: args.pad,
    })
}

/// Rewrite argv so a bare chart name means `show <chart>`.
///
/// Rules:
/// - `charts <chart> ...`             -> `charts show <chart> ...`
/// - `charts -v <chart> ...`          -> `charts -v show <chart> ...`
/// - subcommands, help and version    -> unchanged
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    // Skip leading global flags (`-v`, `-vv`, `--verbose`).
    let first = argv
        .iter()
        .skip(1)
        .position(|a| !is_verbose_flag(a))
        .map(|i| i + 1);
    let Some(idx) = first else {
        return argv;
    };

    let is_chart = ChartId::ALL.iter().any(|id| id.slug() == argv[idx]);
    if is_chart {
        argv.insert(idx, "show".to_string());
    }
    argv
}

fn is_verbose_flag(arg: &str) -> bool {
    arg == "--verbose" || (arg.len() > 1 && arg.starts_with('-') && arg[1..].chars().all(|c| c == 'v'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use crate::domain::FamilyKind;

    fn args(extra: &[&str]) -> Vec<String> {
        std::iter::once("charts")
            .chain(extra.iter().copied())
            .map(String::from)
            .collect()
    }

    fn chart_args(extra: &[&str]) -> ChartArgs {
        show_args("branching-factor", extra)
    }

    fn show_args(chart: &str, extra: &[&str]) -> ChartArgs {
        let mut argv = vec!["charts", "show", chart];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Command::Show(args) => args,
            other => panic!("expected show, got {other:?}"),
        }
    }

    #[test]
    fn bare_chart_means_show() {
        assert_eq!(
            rewrite_args(args(&["growth-rate"])),
            args(&["show", "growth-rate"])
        );
        assert_eq!(
            rewrite_args(args(&["-vv", "rating-delta", "--samples", "50"])),
            args(&["-vv", "show", "rating-delta", "--samples", "50"])
        );
    }

    #[test]
    fn subcommands_and_help_are_untouched() {
        for argv in [
            args(&["render", "growth-rate"]),
            args(&["list"]),
            args(&["--help"]),
            args(&[]),
        ] {
            assert_eq!(rewrite_args(argv.clone()), argv);
        }
    }

    #[test]
    fn flags_map_onto_chart_options() {
        let opts = chart_options_from_args(&chart_args(&[
            "--family",
            "log-rational",
            "--estimate",
            "42.5",
            "--x-max",
            "60",
        ]))
        .unwrap();
        assert_eq!(opts.family, FamilyChoice::Fixed(FamilyKind::LogRational));
        assert_eq!(opts.estimate, Some(42.5));
        assert_eq!(opts.x_max, Some(60.0));
        assert_eq!(opts.pad, None);

        let auto = chart_options_from_args(&chart_args(&["--family", "auto"])).unwrap();
        assert_eq!(auto.family, FamilyChoice::Auto);
        let declared = chart_options_from_args(&chart_args(&[])).unwrap();
        assert_eq!(declared, ChartOptions::default());
    }

    #[test]
    fn unusable_flags_are_config_errors() {
        for extra in [
            ["--samples", "1"],
            ["--max-evaluations", "0"],
            ["--pad", "inf"],
        ] {
            let err = chart_options_from_args(&chart_args(&extra)).unwrap_err();
            assert_eq!(err.exit_code(), EXIT_CONFIG, "{extra:?}");
        }
    }

    #[test]
    fn estimate_flags_need_an_estimate_chart() {
        for chart in ["rating-delta", "rating-projection", "game-comparison"] {
            for flag in ["--estimate", "--pad"] {
                let err = chart_options_from_args(&show_args(chart, &[flag, "3"])).unwrap_err();
                assert_eq!(err.exit_code(), EXIT_CONFIG, "{chart} {flag}");
                assert!(err.to_string().contains(chart), "{err}");
            }
        }
        let growth = chart_options_from_args(&show_args("growth-rate", &["--pad", "0.9"])).unwrap();
        assert_eq!(growth.pad, Some(0.9));
        assert!(chart_options_from_args(&show_args("rating-delta", &["--x-max", "40"])).is_ok());
    }
}
