//! The six charts.

use tracing::info;

use crate::annotate::{
    classify, format_scientific, label_at, label_highlighted, points_with_role, HighlightPolicy,
};
use crate::charts::data::*;
use crate::charts::{
    Bar, BarPlan, ChartBuild, ChartOptions, ChartPlan, CurvePlan, FamilyChoice, PlanBody,
    PointGroup, ScatterPlan,
};
use crate::domain::{
    ChartId, DataSeries, FamilyKind, FitConfig, HighlightPoint, LabelAlign, LabelOffset,
    PointRole, SampleRange,
};
use crate::error::FitError;
use crate::fit::{fit, select_family, FittedCurve};

const ESTIMATE_LABEL: &str = "Allis Estimate";
const ESTIMATE_TONE: usize = 2;
const WIN_TONE: usize = 2;
const LOSS_TONE: usize = 3;

/// Build the plan for `id`.
pub fn build(id: ChartId, opts: &ChartOptions) -> Result<ChartBuild, FitError> {
    info!(chart = id.slug(), "building chart");
    match id {
        ChartId::BranchingFactor => branching_factor(opts),
        ChartId::PossibleGames => possible_games(opts),
        ChartId::GrowthRate => growth_rate(opts),
        ChartId::RatingDelta => rating_delta(opts),
        ChartId::RatingProjection => rating_projection(),
        ChartId::GameComparison => Ok(game_comparison()),
    }
}

/// What a chart declares about its fit.
struct FitSpec<'a> {
    family: FamilyKind,
    seed: Option<&'a [f64]>,
    lower: f64,
    upper: f64,
}

fn fit_chart(
    series: &DataSeries,
    declared: FitSpec<'_>,
    opts: &ChartOptions,
) -> Result<FittedCurve, FitError> {
    let family = match opts.family {
        FamilyChoice::Declared => declared.family,
        FamilyChoice::Auto => select_family(series),
        FamilyChoice::Fixed(kind) => kind,
    };
    // The chart's seed only makes sense for the family it was tuned for.
    let initial_guess = opts.initial_guess.clone().or_else(|| {
        declared.seed
            .filter(|_| family == declared.family)
            .map(<[f64]>::to_vec)
    });
    let config = FitConfig {
        family,
        initial_guess,
        max_evaluations: opts.max_evaluations,
        range: SampleRange::new(
            declared.lower,
            opts.x_max.unwrap_or(declared.upper),
            opts.samples,
        ),
    };

    let curve = fit(series, &config)?;
    info!(
        family = ?family,
        evaluations = curve.evaluations(),
        formula = %curve.family().formula(),
        "fit converged"
    );
    Ok(curve)
}

fn curve_plan(curve: &FittedCurve, tone: usize) -> CurvePlan {
    let family = curve.family().kind();
    CurvePlan {
        name: family.display_name().to_string(),
        tone,
        family,
        samples: curve.samples().to_vec(),
    }
}

/// Append the depth-80 estimate to `series`.
///
/// When the fit and display values agree the estimate is an ordinary tail point (to be
/// highlighted). Otherwise the fit gets a pad point and the displayed value comes back
/// as a separate highlight.
fn with_estimate(
    series: DataSeries,
    fit_value: f64,
    display_value: f64,
) -> Result<(DataSeries, HighlightPolicy, Option<HighlightPoint>), FitError> {
    if fit_value == display_value {
        let series = series.with_point(ESTIMATE_DEPTH, fit_value)?;
        return Ok((series, HighlightPolicy::Tail(1), None));
    }
    let series = series.with_pad(ESTIMATE_DEPTH, fit_value)?;
    let shown = HighlightPoint {
        x: ESTIMATE_DEPTH,
        y: display_value,
        label: ESTIMATE_LABEL.to_string(),
    };
    Ok((series, HighlightPolicy::None, Some(shown)))
}

/// A regular group plus the "Allis Estimate" group for an estimate chart.
fn estimate_groups(
    series: &DataSeries,
    policy: HighlightPolicy,
    shown: Option<&HighlightPoint>,
    name: &str,
) -> Vec<PointGroup> {
    let classified = classify(series, policy);
    let mut estimate = points_with_role(&classified, PointRole::Highlighted);
    estimate.extend(shown.map(|h| (h.x, h.y)));

    vec![
        PointGroup {
            name: name.to_string(),
            tone: 0,
            points: points_with_role(&classified, PointRole::Regular),
        },
        PointGroup {
            name: shown.map_or(ESTIMATE_LABEL, |h| h.label.as_str()).to_string(),
            tone: ESTIMATE_TONE,
            points: estimate,
        },
    ]
}

fn depths(range: std::ops::RangeInclusive<u32>) -> Vec<f64> {
    range.map(f64::from).collect()
}

fn branching_factor(opts: &ChartOptions) -> Result<ChartBuild, FitError> {
    let base = DataSeries::new(&depths(1..=15), &BRANCHING_FACTORS)?;
    let (series, policy, shown) = with_estimate(
        base,
        opts.pad.unwrap_or(BRANCHING_PAD),
        opts.estimate.unwrap_or(BRANCHING_ESTIMATE),
    )?;

    let curve = fit_chart(
        &series,
        FitSpec {
            family: FamilyKind::LogPower,
            seed: Some(&[20.0, 1.0, 0.0, 0.0]),
            lower: 1.0,
            upper: 100.0,
        },
        opts,
    )?;

    let plan = ChartPlan {
        id: ChartId::BranchingFactor,
        title: ChartId::BranchingFactor.title().to_string(),
        x_label: "Depth d".to_string(),
        y_label: "Branching Factor b(d)".to_string(),
        log_y: false,
        size: (800, 400),
        body: PlanBody::Scatter(ScatterPlan {
            groups: estimate_groups(&series, policy, shown.as_ref(), "Branching Factor"),
            curve: Some(curve_plan(&curve, 4)),
            labels: Vec::new(),
        }),
    };
    Ok(ChartBuild {
        plan,
        curve: Some(curve),
    })
}

fn possible_games(opts: &ChartOptions) -> Result<ChartBuild, FitError> {
    let base = DataSeries::new(&depths(0..=15), &PERFT)?;
    let display = opts.estimate.unwrap_or(POSSIBLE_GAMES_ESTIMATE);
    let (series, policy, shown) =
        with_estimate(base, opts.pad.unwrap_or(POSSIBLE_GAMES_ESTIMATE), display)?;

    let curve = fit_chart(
        &series,
        FitSpec {
            family: FamilyKind::LogLinear,
            seed: None,
            lower: 1.0,
            upper: 100.0,
        },
        opts,
    )?;

    // Callouts on the deepest perft value and on the estimate.
    let offset = LabelOffset::scaled(2.0, 1.5);
    let labels = [(15.0, PERFT[15]), (ESTIMATE_DEPTH, display)]
        .into_iter()
        .map(|(x, y)| label_at((x, y), format_scientific(y, 3), offset, LabelAlign::Left, None))
        .collect();

    let plan = ChartPlan {
        id: ChartId::PossibleGames,
        title: ChartId::PossibleGames.title().to_string(),
        x_label: "Depth d".to_string(),
        y_label: "Possible Games P(d)".to_string(),
        log_y: true,
        size: (640, 480),
        body: PlanBody::Scatter(ScatterPlan {
            groups: estimate_groups(&series, policy, shown.as_ref(), "Perft Value"),
            curve: Some(curve_plan(&curve, 1)),
            labels,
        }),
    };
    Ok(ChartBuild {
        plan,
        curve: Some(curve),
    })
}

fn growth_rate(opts: &ChartOptions) -> Result<ChartBuild, FitError> {
    let base = DataSeries::new(&depths(2..=15), &GROWTH_RATES)?;
    let (series, policy, shown) = with_estimate(
        base,
        opts.pad.unwrap_or(GROWTH_RATE_ESTIMATE),
        opts.estimate.unwrap_or(GROWTH_RATE_ESTIMATE),
    )?;

    let curve = fit_chart(
        &series,
        FitSpec {
            family: FamilyKind::LogRational,
            seed: Some(&[1.0, -1.0, 1.0, 0.0]),
            lower: 2.0,
            upper: 100.0,
        },
        opts,
    )?;

    let plan = ChartPlan {
        id: ChartId::GrowthRate,
        title: ChartId::GrowthRate.title().to_string(),
        x_label: "Depth d".to_string(),
        y_label: "Growth Rates g(d)".to_string(),
        log_y: false,
        size: (800, 400),
        body: PlanBody::Scatter(ScatterPlan {
            groups: estimate_groups(&series, policy, shown.as_ref(), "Growth Rate"),
            curve: Some(curve_plan(&curve, 3)),
            labels: Vec::new(),
        }),
    };
    Ok(ChartBuild {
        plan,
        curve: Some(curve),
    })
}

fn outcome_tone(index: usize) -> usize {
    match OUTCOMES.get(index) {
        Some(Outcome::Loss) => LOSS_TONE,
        _ => WIN_TONE,
    }
}

fn rating_delta(opts: &ChartOptions) -> Result<ChartBuild, FitError> {
    let series = DataSeries::new(&depths(1..=30), &RATING_DELTAS)?;
    let curve = fit_chart(
        &series,
        FitSpec {
            family: FamilyKind::LogPower,
            seed: Some(&[20.0, 1.0, 0.0, 0.0]),
            lower: 1.0,
            upper: 30.0,
        },
        opts,
    )?;

    let classified = classify(&series, HighlightPolicy::Periodic(5));
    let mut wins = Vec::new();
    let mut losses = Vec::new();
    for p in classified.iter().filter(|p| p.role != PointRole::Excluded) {
        if outcome_tone(p.index) == LOSS_TONE {
            losses.push((p.x, p.y));
        } else {
            wins.push((p.x, p.y));
        }
    }

    let labels = label_highlighted(
        &classified,
        LabelOffset::additive(-0.5, 2.0),
        LabelAlign::Left,
        |i| RATINGS.get(i).map_or_else(String::new, |r| format!("{r:.0}")),
        |i| Some(outcome_tone(i)),
    );

    let plan = ChartPlan {
        id: ChartId::RatingDelta,
        title: ChartId::RatingDelta.title().to_string(),
        x_label: "Game Number".to_string(),
        y_label: "Delta Rating".to_string(),
        log_y: false,
        size: (1000, 600),
        body: PlanBody::Scatter(ScatterPlan {
            groups: vec![
                PointGroup {
                    name: "Win".to_string(),
                    tone: WIN_TONE,
                    points: wins,
                },
                PointGroup {
                    name: "Loss".to_string(),
                    tone: LOSS_TONE,
                    points: losses,
                },
            ],
            curve: Some(curve_plan(&curve, 5)),
            labels,
        }),
    };
    Ok(ChartBuild {
        plan,
        curve: Some(curve),
    })
}

fn rating_projection() -> Result<ChartBuild, FitError> {
    let xs: Vec<f64> = depths(1..=30).into_iter().chain(MILESTONES).collect();
    let ys: Vec<f64> = RATINGS.into_iter().chain(MILESTONE_RATINGS).collect();
    let series = DataSeries::new(&xs, &ys)?;

    let classified = classify(&series, HighlightPolicy::Tail(MILESTONES.len()));
    let labels = label_highlighted(
        &classified,
        LabelOffset::additive(0.0, -100.0),
        LabelAlign::Center,
        |i| format!("{:.0}", ys[i]),
        |_| Some(4),
    );

    let plan = ChartPlan {
        id: ChartId::RatingProjection,
        title: ChartId::RatingProjection.title().to_string(),
        x_label: "Game Number".to_string(),
        y_label: "Rating".to_string(),
        log_y: false,
        size: (1000, 300),
        body: PlanBody::Scatter(ScatterPlan {
            groups: vec![
                PointGroup {
                    name: "Actual Rating".to_string(),
                    tone: 0,
                    points: points_with_role(&classified, PointRole::Regular),
                },
                PointGroup {
                    name: "Projected Rating".to_string(),
                    tone: 4,
                    points: points_with_role(&classified, PointRole::Highlighted),
                },
            ],
            curve: None,
            labels,
        }),
    };
    Ok(ChartBuild { plan, curve: None })
}

fn game_comparison() -> ChartBuild {
    let bars = GAMES
        .iter()
        .enumerate()
        .map(|(tone, &(name, value))| Bar {
            name: name.to_string(),
            value,
            tone,
            label: format_scientific(value, 2),
        })
        .collect();

    let plan = ChartPlan {
        id: ChartId::GameComparison,
        title: ChartId::GameComparison.title().to_string(),
        x_label: "Games".to_string(),
        y_label: "Estimated Branching Factors".to_string(),
        log_y: true,
        size: (1000, 600),
        body: PlanBody::Bar(BarPlan { bars }),
    };
    ChartBuild { plan, curve: None }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scatter(build: &ChartBuild) -> &ScatterPlan {
        match &build.plan.body {
            PlanBody::Scatter(s) => s,
            PlanBody::Bar(_) => panic!("expected a scatter plan"),
        }
    }

    #[test]
    fn branching_factor_shows_estimate_but_fits_pad() {
        let build = build(ChartId::BranchingFactor, &ChartOptions::default()).unwrap();
        let plan = scatter(&build);

        assert_eq!(plan.groups[0].points.len(), 15);
        assert!(plan.groups[0].points.iter().all(|&(x, _)| x <= 15.0));
        assert_eq!(plan.groups[1].name, "Allis Estimate");
        assert_eq!(plan.groups[1].points, vec![(80.0, 35.0)]);

        let curve = build.curve.as_ref().unwrap();
        assert_eq!(curve.family().kind(), FamilyKind::LogPower);
        // The fit is pulled toward the pad (42.5), not the displayed 35.
        assert!(curve.predict(80.0) > 38.0);
        assert_eq!(plan.curve.as_ref().unwrap().samples.len(), 1000);
    }

    #[test]
    fn matching_estimate_and_pad_highlight_the_series_point() {
        let opts = ChartOptions {
            estimate: Some(42.5),
            ..ChartOptions::default()
        };
        let build = build(ChartId::BranchingFactor, &opts).unwrap();
        assert_eq!(scatter(&build).groups[1].points, vec![(80.0, 42.5)]);
    }

    #[test]
    fn possible_games_labels_deepest_perft_and_estimate() {
        let build = build(ChartId::PossibleGames, &ChartOptions::default()).unwrap();
        assert!(build.plan.log_y);
        let plan = scatter(&build);
        assert_eq!(plan.groups[0].points.len(), 16);
        assert_eq!(plan.groups[1].points, vec![(80.0, 3.353e123)]);

        let texts: Vec<&str> = plan.labels.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["2.015 × 10^21", "3.353 × 10^123"]);
        assert_eq!(plan.labels[1].anchor.0, 82.0);
        assert_eq!(plan.curve.as_ref().unwrap().name, "Exponential Fit");
    }

    #[test]
    fn rating_delta_labels_every_fifth_game() {
        let build = build(ChartId::RatingDelta, &ChartOptions::default()).unwrap();
        let plan = scatter(&build);
        let texts: Vec<&str> = plan.labels.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["945", "1217", "1332", "1397", "1495", "1509"]);
        // Game 6 was a loss; its callout takes the loss color.
        assert_eq!(plan.labels[1].tone, Some(LOSS_TONE));
        assert_eq!(plan.labels[0].anchor, (0.5, 2.0));

        let markers: usize = plan.groups.iter().map(|g| g.points.len()).sum();
        assert_eq!(markers, 30);
        assert_eq!(plan.groups[1].points.len(), 7);
    }

    #[test]
    fn auto_family_picks_log_linear_for_perft() {
        let opts = ChartOptions {
            family: FamilyChoice::Auto,
            ..ChartOptions::default()
        };
        let build = build(ChartId::PossibleGames, &opts).unwrap();
        assert_eq!(
            build.curve.unwrap().family().kind(),
            FamilyKind::LogLinear
        );
    }

    #[test]
    fn possible_games_past_overflow_is_an_invalid_range() {
        let opts = ChartOptions {
            x_max: Some(250.0),
            ..ChartOptions::default()
        };
        assert!(matches!(
            build(ChartId::PossibleGames, &opts),
            Err(FitError::InvalidRange(_))
        ));
    }

    #[test]
    fn projection_has_no_fit_and_centered_milestone_labels() {
        let build = build(ChartId::RatingProjection, &ChartOptions::default()).unwrap();
        assert!(build.curve.is_none());
        let plan = scatter(&build);
        assert_eq!(plan.groups[1].points.len(), 7);
        assert_eq!(plan.labels.len(), 7);
        assert_eq!(plan.labels[0].text, "1575");
        assert_eq!(plan.labels[0].anchor, (50.0, 1475.0));
        assert!(plan.labels.iter().all(|l| l.align == LabelAlign::Center));
    }

    #[test]
    fn game_comparison_bars_carry_scientific_labels() {
        let build = build(ChartId::GameComparison, &ChartOptions::default()).unwrap();
        let PlanBody::Bar(bars) = &build.plan.body else {
            panic!("expected a bar plan");
        };
        assert_eq!(bars.bars.len(), 5);
        assert_eq!(bars.bars[0].label, "3.35 × 10^123");
        assert_eq!(bars.bars[1].label, "1.97 × 10^4");
    }

    #[test]
    fn bad_guess_aborts_the_chart() {
        let opts = ChartOptions {
            initial_guess: Some(vec![20.0, 1.0, 5.0, 0.0]),
            ..ChartOptions::default()
        };
        assert!(matches!(
            build(ChartId::BranchingFactor, &opts),
            Err(FitError::DomainViolation { .. })
        ));
    }
}
