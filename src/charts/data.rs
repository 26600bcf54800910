//! Literal data tables behind the charts.

/// Average branching factor b(d) at depths 1..=15.
pub const BRANCHING_FACTORS: [f64; 15] = [
    20.0, 20.0, 22.255, 22.161, 24.663, 24.470, 26.843, 26.596, 28.701, 28.429, 30.246, 29.964,
    31.518, 31.238, 32.562,
];

/// Depth of the long-horizon estimates.
pub const ESTIMATE_DEPTH: f64 = 80.0;

/// Value the branching-factor fit is anchored to at depth 80.
pub const BRANCHING_PAD: f64 = 42.5;
/// Branching factor shown for the depth-80 estimate.
pub const BRANCHING_ESTIMATE: f64 = 35.0;

/// Perft values P(d) at depths 0..=15.
pub const PERFT: [f64; 16] = [
    1.0,
    20.0,
    400.0,
    8_902.0,
    197_281.0,
    4_865_609.0,
    119_060_324.0,
    3_195_901_860.0,
    84_998_978_956.0,
    2_439_530_234_167.0,
    69_352_859_712_417.0,
    2_097_651_003_696_806.0,
    62_854_969_236_701_747.0,
    1_981_066_775_000_396_239.0,
    61_885_021_521_585_529_237.0,
    2_015_099_950_053_364_471_960.0,
];

/// Possible games at depth 80.
pub const POSSIBLE_GAMES_ESTIMATE: f64 = 3.353e123;

/// Growth rate g(d) at depths 2..=15.
pub const GROWTH_RATES: [f64; 14] = [
    4.322, 2.824, 2.235, 1.992, 1.785, 1.691, 1.578, 1.528, 1.454, 1.422, 1.368, 1.345, 1.304,
    1.286,
];

/// Growth rate at depth 80.
pub const GROWTH_RATE_ESTIMATE: f64 = 0.811;

/// Outcome of a rated game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Loss,
}

use Outcome::{Loss as L, Win as W};

/// Rating change after each of the first 30 games.
pub const RATING_DELTAS: [f64; 30] = [
    0.0, 112.0, 88.0, 53.0, 69.0, -50.0, 46.0, 37.0, 35.0, -26.0, 23.0, 26.0, 30.0, -30.0, 21.0,
    18.0, 24.0, 18.0, 16.0, 25.0, 15.0, -17.0, 12.0, 19.0, -15.0, 15.0, -8.0, 10.0, 17.0, -14.0,
];

/// Win/loss for each of the first 30 games.
pub const OUTCOMES: [Outcome; 30] = [
    W, W, W, W, W, L, W, W, W, L, W, W, W, L, W, W, W, W, W, W, W, L, W, W, L, W, L, W, W, L,
];

/// Rating after each of the first 30 games.
pub const RATINGS: [f64; 30] = [
    945.0, 1057.0, 1145.0, 1198.0, 1267.0, 1217.0, 1263.0, 1300.0, 1335.0, 1309.0, 1332.0,
    1358.0, 1388.0, 1358.0, 1379.0, 1397.0, 1421.0, 1439.0, 1455.0, 1480.0, 1495.0, 1478.0,
    1490.0, 1509.0, 1494.0, 1509.0, 1501.0, 1511.0, 1528.0, 1514.0,
];

/// Game counts with a projected rating.
pub const MILESTONES: [f64; 7] = [50.0, 75.0, 100.0, 150.0, 200.0, 250.0, 500.0];
/// Projected rating at each milestone.
pub const MILESTONE_RATINGS: [f64; 7] = [1575.0, 1622.0, 1660.0, 1730.0, 1810.0, 1910.0, 2050.0];

/// Estimated game-tree sizes of popular games.
pub const GAMES: [(&str, f64); 5] = [
    ("Chess", 3.353e123),
    ("Tic-tac-toe", 19683.0),
    ("Connect Four", 5.5e24),
    ("Checkers", 8.9e37),
    ("Scrabble", 5.82e75),
];
