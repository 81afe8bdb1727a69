use rand::Rng;

use super::grid::{Exponent, Grid};

/// Exponent of every spawned tile (a "2").
pub const SPAWN_EXPONENT: Exponent = 1;

/// Place a 2 on a uniformly chosen empty cell, using the provided RNG.
///
/// Returns the `(row, col)` filled, or `None` when the grid is full, in which
/// case nothing changes.
pub fn spawn_tile<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) -> Option<(usize, usize)> {
    let empty = grid.empty_cells();
    if empty.is_empty() {
        return None;
    }
    let (row, col) = empty[rng.gen_range(0..empty.len())];
    grid.set(row, col, SPAWN_EXPONENT);
    Some((row, col))
}

impl Grid {
    /// Like [`spawn_tile`] but by value, for chaining.
    ///
    /// ```
    /// use console_2048::engine::Grid;
    /// use rand::{rngs::StdRng, SeedableRng};
    /// let mut rng = StdRng::seed_from_u64(123);
    /// let g = Grid::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
    /// assert_eq!(g.count_empty(), 14);
    /// ```
    #[inline]
    pub fn with_random_tile<R: Rng + ?Sized>(mut self, rng: &mut R) -> Self {
        spawn_tile(&mut self, rng);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn fills_every_cell_then_stops() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut g = Grid::EMPTY;
        for filled in 1..=16 {
            assert!(spawn_tile(&mut g, &mut rng).is_some());
            assert_eq!(g.count_empty(), 16 - filled);
        }
        let full = g;
        assert_eq!(spawn_tile(&mut g, &mut rng), None);
        assert_eq!(g, full);
        assert!(g.rows().iter().flatten().all(|&e| e == SPAWN_EXPONENT));
    }

    #[test]
    fn touches_exactly_one_empty_cell() {
        let mut rng = StdRng::seed_from_u64(11);
        let before = Grid::from_rows([[3, 0, 2, 0], [0, 4, 0, 0], [0, 0, 0, 5], [1, 0, 0, 0]]);
        let mut g = before;
        let (r, c) = spawn_tile(&mut g, &mut rng).unwrap();
        assert_eq!(before.get(r, c), 0);
        assert_eq!(g.get(r, c), 1);
        let diffs = (0..4)
            .flat_map(|r| (0..4).map(move |c| (r, c)))
            .filter(|&(r, c)| g.get(r, c) != before.get(r, c))
            .count();
        assert_eq!(diffs, 1);
    }

    #[test]
    fn zero_rng_picks_first_empty_cell() {
        let mut rng = StepRng::new(0, 0);
        let mut g = Grid::from_rows([[1, 1, 0, 1], [0; 4], [0; 4], [0; 4]]);
        assert_eq!(spawn_tile(&mut g, &mut rng), Some((0, 2)));
        assert_eq!(spawn_tile(&mut g, &mut rng), Some((1, 0)));
    }
}
