use super::grid::Grid;

/// True if two neighbouring cells inside any stored line hold the same tile.
pub fn has_adjacent_pair(grid: &Grid) -> bool {
    grid.lines
        .iter()
        .any(|line| line.windows(2).any(|w| w[0] != 0 && w[0] == w[1]))
}

/// True if no move in any direction can change the board.
///
/// The second axis is checked on a rotated copy; `grid` keeps its orientation.
pub fn is_game_over(grid: &Grid) -> bool {
    if grid.count_empty() > 0 {
        return false;
    }
    if has_adjacent_pair(grid) {
        return false;
    }
    !has_adjacent_pair(&grid.rotated())
}

impl Grid {
    #[inline]
    pub fn is_game_over(&self) -> bool {
        is_game_over(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Direction;

    fn locked() -> Grid {
        Grid::from_rows([[1, 2, 1, 2], [2, 1, 2, 1], [1, 2, 1, 2], [2, 1, 2, 1]])
    }

    #[test]
    fn checkerboard_is_over() {
        let g = locked();
        assert!(is_game_over(&g));
        for d in Direction::ALL {
            assert!(!g.shifted(d).1.changed);
        }
    }

    #[test]
    fn horizontal_pair_keeps_game_alive() {
        let mut g = locked();
        g.set(2, 3, 1);
        assert!(!is_game_over(&g));
    }

    #[test]
    fn vertical_pair_keeps_game_alive() {
        let mut g = locked();
        g.set(3, 0, 1);
        assert!(!is_game_over(&g));
    }

    #[test]
    fn empty_cell_keeps_game_alive() {
        let mut g = locked();
        g.set(1, 1, 0);
        assert!(!is_game_over(&g));
        assert!(!is_game_over(&Grid::EMPTY));
    }

    #[test]
    fn check_leaves_orientation_alone() {
        let g = Grid::from_rows([[1, 2, 3, 4], [5, 6, 7, 8], [9, 10, 11, 12], [13, 14, 15, 16]]);
        let copy = g;
        assert!(g.is_game_over());
        assert_eq!(g, copy);
    }
}
