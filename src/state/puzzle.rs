//! Procedural puzzle generation.
//!
//! A puzzle is a small grid of swatches derived from one random base color. The base color is
//! painted in exactly one cell (the answer); every other cell receives a perturbed copy whose
//! hue, saturation and value drift by an amount bounded by the difficulty level.

use rand::Rng;
use tracing::debug;
use uuid::{Builder, Uuid};

use crate::state::{
    color::{Color, Hsv},
    coordinate::Coordinate,
};

/// Highest reachable difficulty level.
pub const MAX_LEVEL: u8 = 9;

const LEVEL_COUNT: usize = MAX_LEVEL as usize + 1;
const WIDTHS: [usize; LEVEL_COUNT] = [2, 2, 2, 3, 3, 3, 3, 3, 3, 3];
const HEIGHTS: [usize; LEVEL_COUNT] = [2, 2, 2, 2, 2, 2, 2, 3, 3, 3];
const HUE_DELTAS: [f64; LEVEL_COUNT] = [
    300.0, 270.0, 240.0, 210.0, 180.0, 160.0, 140.0, 120.0, 100.0, 80.0,
];
const SATURATION_RANGES: [f64; LEVEL_COUNT] = [
    0.75, 0.7, 0.675, 0.65, 0.625, 0.6, 0.575, 0.55, 0.525, 0.5,
];
const VALUE_RANGES: [f64; LEVEL_COUNT] = [
    0.75, 0.7, 0.675, 0.65, 0.625, 0.6, 0.575, 0.55, 0.525, 0.5,
];

/// Difficulty index in `0..=MAX_LEVEL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Level(u8);

impl Level {
    /// Level every new session starts at.
    pub const FIRST: Level = Level(0);
    /// Last level; solving it wins the test.
    pub const MAX: Level = Level(MAX_LEVEL);

    /// Return the level for `value`, or `None` past [`MAX_LEVEL`].
    pub fn new(value: u8) -> Option<Self> {
        (value <= MAX_LEVEL).then_some(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// The following level, or `None` once [`Level::MAX`] is reached.
    pub fn next(self) -> Option<Self> {
        Self::new(self.0 + 1)
    }

    pub fn is_max(self) -> bool {
        self == Self::MAX
    }

    /// Number of grid columns.
    pub fn width(self) -> usize {
        WIDTHS[self.index()]
    }

    /// Number of grid rows.
    pub fn height(self) -> usize {
        HEIGHTS[self.index()]
    }

    /// Maximum hue drift in degrees.
    pub fn hue_delta(self) -> f64 {
        HUE_DELTAS[self.index()]
    }

    /// Maximum saturation drift.
    pub fn saturation_range(self) -> f64 {
        SATURATION_RANGES[self.index()]
    }

    /// Maximum value drift.
    pub fn value_range(self) -> f64 {
        VALUE_RANGES[self.index()]
    }

    fn index(self) -> usize {
        usize::from(self.0)
    }
}

/// One generated round.
#[derive(Debug, Clone, PartialEq)]
pub struct Puzzle {
    /// Random version 4 identifier drawn from the generator, so seeded runs repeat it.
    pub id: Uuid,
    pub level: Level,
    pub width: usize,
    pub height: usize,
    /// Cell painted with [`Puzzle::base_color`].
    pub answer: Coordinate,
    /// HSV triple the whole palette was derived from.
    pub base: Hsv,
    /// Target color shown to the player.
    pub base_color: Color,
    pub background: Color,
    pub foreground: Color,
    /// `height` rows of `width` colors.
    pub grid: Vec<Vec<Color>>,
}

impl Puzzle {
    /// Generate a puzzle for `level`, drawing every random value from `rng`.
    pub fn generate<R: Rng + ?Sized>(level: Level, rng: &mut R) -> Self {
        let base = Hsv {
            h: rng.random_range(0.0..360.0),
            s: rng.random_range(0.4..0.9),
            v: rng.random_range(0.4..0.9),
        };
        let base_color = base.to_color();

        let width = level.width();
        let height = level.height();
        let answer_row = rng.random_range(0..height);
        let answer_col = rng.random_range(0..width);

        let (background, foreground) = contrast_colors(base);

        let mut grid = Vec::with_capacity(height);
        for row in 0..height {
            let mut cells = Vec::with_capacity(width);
            for col in 0..width {
                if row == answer_row && col == answer_col {
                    debug!(h = base.h, s = base.s, v = base.v, "base color");
                    cells.push(base_color);
                    continue;
                }

                let biased = perturb(base, level, rng);
                debug!(h = biased.h, s = biased.s, v = biased.v, "biased color");
                cells.push(biased.to_color());
            }
            grid.push(cells);
        }

        let id = Builder::from_random_bytes(rng.random()).into_uuid();

        Self {
            id,
            level,
            width,
            height,
            answer: Coordinate::new(answer_row, answer_col),
            base,
            base_color,
            background,
            foreground,
            grid,
        }
    }

    /// Color at `coordinate`, if it lies inside the grid.
    pub fn cell(&self, coordinate: Coordinate) -> Option<Color> {
        let (row, col) = coordinate.indices()?;
        self.grid.get(row)?.get(col).copied()
    }

    pub fn is_answer(&self, coordinate: Coordinate) -> bool {
        self.answer == coordinate
    }
}

/// Background and foreground colors: near-white bases get a black background.
fn contrast_colors(base: Hsv) -> (Color, Color) {
    if base.s < 0.2 && base.v > 0.8 {
        (Color::BLACK, Color::WHITE)
    } else {
        (Color::WHITE, Color::BLACK)
    }
}

/// Derive a neighbour of `base` whose drift is bounded by the level ranges.
///
/// The drift budget is split between hue (30% to 70%) and the remainder shared by saturation
/// and value.
fn perturb<R: Rng + ?Sized>(base: Hsv, level: Level, rng: &mut R) -> Hsv {
    let factor_h: f64 = rng.random_range(0.3..0.7);
    let residue = 1.0 - factor_h;
    let factor_s = residue * rng.random_range(0.2..0.8);
    let factor_v = residue - factor_s;

    let delta_s = bounded_delta(factor_s * level.saturation_range(), base.s, rng);
    let delta_v = bounded_delta(factor_v * level.value_range(), base.v, rng);
    let delta_h = factor_h * level.hue_delta() * random_sign(rng);

    Hsv {
        h: wrap_hue(base.h + delta_h),
        s: base.s + delta_s,
        v: base.v + delta_v,
    }
}

/// Pick the direction of a non-negative `delta` applied to `current`.
///
/// Overflowing past 1 forces a decrease; when the delta fits below `current` either direction
/// is allowed; otherwise it only increases.
fn bounded_delta<R: Rng + ?Sized>(delta: f64, current: f64, rng: &mut R) -> f64 {
    if delta + current > 1.0 {
        -delta
    } else if delta <= current {
        delta * random_sign(rng)
    } else {
        delta
    }
}

fn random_sign<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    if rng.random_bool(0.5) { 1.0 } else { -1.0 }
}

fn wrap_hue(h: f64) -> f64 {
    let wrapped = h.rem_euclid(360.0);
    // rem_euclid may round tiny negatives up to exactly 360.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}
