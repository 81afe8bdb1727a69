use super::grid::{Grid, SIZE};

/// Rotate the grid a quarter turn clockwise in place.
///
/// Walks each concentric ring and cycles four cells at a time.
pub fn rotate(grid: &mut Grid) {
    let n = SIZE;
    let b = &mut grid.lines;
    for i in 0..n / 2 {
        for j in i..n - i - 1 {
            let tmp = b[i][j];
            b[i][j] = b[j][n - i - 1];
            b[j][n - i - 1] = b[n - i - 1][n - j - 1];
            b[n - i - 1][n - j - 1] = b[n - j - 1][i];
            b[n - j - 1][i] = tmp;
        }
    }
}

pub fn rotate_times(grid: &mut Grid, turns: usize) {
    for _ in 0..turns % 4 {
        rotate(grid);
    }
}

impl Grid {
    #[inline]
    pub fn rotate(&mut self) {
        rotate(self)
    }

    /// Copy of this grid turned a quarter clockwise.
    #[inline]
    pub fn rotated(mut self) -> Self {
        rotate(&mut self);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Grid {
        Grid::from_rows([[1, 2, 3, 4], [5, 6, 7, 8], [9, 10, 11, 12], [13, 14, 15, 16]])
    }

    #[test]
    fn quarter_turn_is_clockwise() {
        assert_eq!(
            sample().rotated().rows(),
            [[13, 9, 5, 1], [14, 10, 6, 2], [15, 11, 7, 3], [16, 12, 8, 4]]
        );
    }

    #[test]
    fn four_turns_restore_the_grid() {
        let mut g = sample();
        rotate_times(&mut g, 4);
        assert_eq!(g, sample());
        rotate_times(&mut g, 3);
        g.rotate();
        assert_eq!(g, sample());
    }

    #[test]
    fn half_turn_reverses_reading_order() {
        let mut g = sample();
        rotate_times(&mut g, 2);
        let mut bytes = sample().to_bytes();
        bytes.reverse();
        assert_eq!(g.to_bytes(), bytes);
    }
}
