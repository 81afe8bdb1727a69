//! Canonical slide: compact one line toward index 0, merging equal neighbours.

use std::fmt;
use std::ops::BitOrAssign;

use super::grid::{tile_magnitude, Line, Score, SIZE};

/// Result of sliding a line or a whole grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SlideOutcome {
    /// True iff any cell changed value or position.
    pub changed: bool,
    /// Points earned from merges.
    pub score: Score,
}

impl BitOrAssign for SlideOutcome {
    fn bitor_assign(&mut self, rhs: Self) {
        self.changed |= rhs.changed;
        self.score = self.score.saturating_add(rhs.score);
    }
}

/// Index the tile at `x` slides to, never crossing `stop`.
///
/// Cells before `stop` are already final for this pass (one of them absorbed a
/// merge), so an empty run ending at `stop` lands there.
fn find_target(line: &Line, x: usize, stop: usize) -> usize {
    if x == 0 {
        return x;
    }
    let mut t = x - 1;
    loop {
        if line[t] != 0 {
            return if line[t] != line[x] { t + 1 } else { t };
        }
        if t == stop || t == 0 {
            return t;
        }
        t -= 1;
    }
}

/// Slide `line` toward index 0 in place.
///
/// Tiles are processed left to right; after a merge at `t` the boundary moves
/// to `t + 1`, so each resulting tile absorbs at most one other tile.
///
/// Exponents and scores saturate instead of overflowing: two `255` tiles merge
/// into `255`, and any merge past `2^63` scores `u64::MAX`.
pub fn slide_line(line: &mut Line) -> SlideOutcome {
    let mut outcome = SlideOutcome::default();
    let mut stop = 0;

    for x in 0..SIZE {
        if line[x] == 0 {
            continue;
        }
        let t = find_target(line, x, stop);
        if t == x {
            continue;
        }
        if line[t] == 0 {
            line[t] = line[x];
        } else if line[t] == line[x] {
            line[t] = line[t].saturating_add(1);
            outcome.score = outcome.score.saturating_add(tile_magnitude(line[t]));
            stop = t + 1;
        }
        line[x] = 0;
        outcome.changed = true;
    }
    outcome
}

/// Regression table of `(input, expected)` slides, exponents toward index 0.
pub const SLIDE_CASES: [(Line, Line); 13] = [
    ([0, 0, 0, 1], [1, 0, 0, 0]),
    ([0, 0, 1, 1], [2, 0, 0, 0]),
    ([0, 1, 0, 1], [2, 0, 0, 0]),
    ([1, 0, 0, 1], [2, 0, 0, 0]),
    ([1, 0, 1, 0], [2, 0, 0, 0]),
    ([1, 1, 1, 0], [2, 1, 0, 0]),
    ([1, 0, 1, 1], [2, 1, 0, 0]),
    ([1, 1, 0, 1], [2, 1, 0, 0]),
    ([1, 1, 1, 1], [2, 2, 0, 0]),
    ([2, 2, 1, 1], [3, 2, 0, 0]),
    ([1, 1, 2, 2], [2, 3, 0, 0]),
    ([3, 0, 1, 1], [3, 2, 0, 0]),
    ([2, 0, 1, 1], [2, 2, 0, 0]),
];

/// First regression case whose slide disagreed with the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelfCheckFailure {
    pub input: Line,
    pub actual: Line,
    pub expected: Line,
}

impl fmt::Display for SelfCheckFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} => {:?} expected {:?} => {:?}",
            self.input, self.actual, self.input, self.expected
        )
    }
}

/// Run every case in [`SLIDE_CASES`]; returns the number of cases on success.
pub fn self_check() -> Result<usize, SelfCheckFailure> {
    for (input, expected) in SLIDE_CASES {
        let mut actual = input;
        slide_line(&mut actual);
        if actual != expected {
            return Err(SelfCheckFailure { input, actual, expected });
        }
    }
    Ok(SLIDE_CASES.len())
}
