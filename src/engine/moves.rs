use super::grid::{Direction, Grid};
use super::rotate::rotate_times;
use super::slide::{slide_line, SlideOutcome};

impl Direction {
    /// Quarter turns `(in, out)` that align this direction with the canonical
    /// upward slide and then restore the orientation. `in + out` is always a
    /// multiple of four.
    #[inline]
    pub fn rotations(self) -> (usize, usize) {
        match self {
            Direction::Up => (0, 0),
            Direction::Right => (3, 1),
            Direction::Down => (2, 2),
            Direction::Left => (1, 3),
        }
    }
}

/// Slide/merge every line of `grid` in `direction`. No randomness.
pub fn shift(grid: &mut Grid, direction: Direction) -> SlideOutcome {
    let (turn_in, turn_out) = direction.rotations();
    rotate_times(grid, turn_in);
    let mut outcome = SlideOutcome::default();
    for line in grid.lines.iter_mut() {
        outcome |= slide_line(line);
    }
    rotate_times(grid, turn_out);
    outcome
}

impl Grid {
    /// Slide/merge tiles in `direction`, reporting whether anything moved and
    /// the points earned.
    #[inline]
    pub fn shift(&mut self, direction: Direction) -> SlideOutcome {
        shift(self, direction)
    }

    /// Return the grid resulting from a shift without touching `self`.
    #[inline]
    pub fn shifted(mut self, direction: Direction) -> (Self, SlideOutcome) {
        let outcome = shift(&mut self, direction);
        (self, outcome)
    }
}
