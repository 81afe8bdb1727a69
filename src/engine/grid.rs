use rand::distributions::{Distribution, Standard};
use rand::Rng;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Side length of the square board.
pub const SIZE: usize = 4;

/// Stored tile value: the tile shows `2^e`, and `0` marks an empty cell.
pub type Exponent = u8;
pub type Score = u64;

/// A single line of the board, ordered toward the canonical slide target.
pub type Line = [Exponent; SIZE];

/// A direction to move/merge tiles.
///
/// Discriminants are the stable wire codes used by run traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Right, Direction::Down, Direction::Left];

    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectionError {
    #[error("invalid direction code {0} (expected 0..=3)")]
    InvalidCode(u8),
    #[error("unknown direction '{0}'")]
    UnknownName(String),
}

impl TryFrom<u8> for Direction {
    type Error = DirectionError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Direction::Up),
            1 => Ok(Direction::Right),
            2 => Ok(Direction::Down),
            3 => Ok(Direction::Left),
            other => Err(DirectionError::InvalidCode(other)),
        }
    }
}

impl FromStr for Direction {
    type Err = DirectionError;

    /// Accepts full names plus the classic key bindings (wasd / hjkl).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "u" | "w" | "k" => Ok(Direction::Up),
            "right" | "r" | "d" | "l" => Ok(Direction::Right),
            "down" | "s" | "j" => Ok(Direction::Down),
            "left" | "a" | "h" => Ok(Direction::Left),
            _ => Err(DirectionError::UnknownName(s.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Right => "right",
            Direction::Down => "down",
            Direction::Left => "left",
        };
        f.write_str(name)
    }
}

impl Distribution<Direction> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Direction {
        Direction::ALL[rng.gen_range(0..Direction::ALL.len())]
    }
}

/// The 4x4 board of tile exponents.
///
/// Storage is column-major: `lines[x]` is column `x` read top to bottom, so the
/// canonical slide toward index 0 of every line is an upward slide. Accessors
/// take `(row, col)` and hide the layout.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Grid {
    pub(crate) lines: [Line; SIZE],
}

impl Grid {
    /// A constant empty board.
    pub const EMPTY: Grid = Grid { lines: [[0; SIZE]; SIZE] };

    /// Build a grid from a row-major matrix of exponents.
    pub fn from_rows(rows: [[Exponent; SIZE]; SIZE]) -> Self {
        let mut grid = Grid::EMPTY;
        for (r, row) in rows.iter().enumerate() {
            for (c, &e) in row.iter().enumerate() {
                grid.lines[c][r] = e;
            }
        }
        grid
    }

    /// Row-major snapshot of the exponents.
    pub fn rows(&self) -> [[Exponent; SIZE]; SIZE] {
        let mut rows = [[0; SIZE]; SIZE];
        for (c, line) in self.lines.iter().enumerate() {
            for (r, &e) in line.iter().enumerate() {
                rows[r][c] = e;
            }
        }
        rows
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Exponent {
        self.lines[col][row]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, exponent: Exponent) {
        self.lines[col][row] = exponent;
    }

    /// Displayed magnitude of a cell (0 if empty), e.g. 2, 4, 8, ...
    #[inline]
    pub fn tile_value(&self, row: usize, col: usize) -> u64 {
        tile_magnitude(self.get(row, col))
    }

    /// Empty cells in row-major order.
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        let mut cells = Vec::with_capacity(SIZE * SIZE);
        for r in 0..SIZE {
            for c in 0..SIZE {
                if self.get(r, c) == 0 {
                    cells.push((r, c));
                }
            }
        }
        cells
    }

    pub fn count_empty(&self) -> usize {
        self.lines.iter().flatten().filter(|&&e| e == 0).count()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.count_empty() == 0
    }

    pub fn highest_exponent(&self) -> Exponent {
        self.lines.iter().flatten().copied().max().unwrap_or(0)
    }

    /// Return the highest tile value (e.g., 2048) present on the board.
    pub fn highest_tile(&self) -> u64 {
        tile_magnitude(self.highest_exponent())
    }

    /// Row-major byte encoding, one exponent per byte.
    pub fn to_bytes(&self) -> [u8; SIZE * SIZE] {
        let mut out = [0; SIZE * SIZE];
        for (r, row) in self.rows().iter().enumerate() {
            out[r * SIZE..(r + 1) * SIZE].copy_from_slice(row);
        }
        out
    }

    pub fn from_bytes(bytes: [u8; SIZE * SIZE]) -> Self {
        let mut rows = [[0; SIZE]; SIZE];
        for (r, row) in rows.iter_mut().enumerate() {
            row.copy_from_slice(&bytes[r * SIZE..(r + 1) * SIZE]);
        }
        Grid::from_rows(rows)
    }
}

/// `2^exponent`, saturating at `u64::MAX` for exponents of 64 and up.
#[inline]
pub(crate) fn tile_magnitude(exponent: Exponent) -> u64 {
    if exponent == 0 {
        0
    } else {
        1u64.checked_shl(exponent.into()).unwrap_or(u64::MAX)
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Grid({:?})", self.rows())
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self.rows();
        for (r, row) in rows.iter().enumerate() {
            if r > 0 {
                writeln!(f, "{}", "-".repeat(SIZE * 8 - 1))?;
            }
            let cells: Vec<String> = row.iter().map(|&e| format_val(e)).collect();
            writeln!(f, "{}", cells.join("|"))?;
        }
        Ok(())
    }
}

fn format_val(exponent: Exponent) -> String {
    match exponent {
        0 => format!("{:^7}", "."),
        e => format!("{:^7}", tile_magnitude(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn rows_round_trip_through_column_storage() {
        let rows = [[1, 2, 3, 4], [5, 6, 7, 8], [0, 0, 0, 9], [10, 0, 0, 0]];
        let grid = Grid::from_rows(rows);
        assert_eq!(grid.rows(), rows);
        assert_eq!(grid.get(0, 3), 4);
        assert_eq!(grid.lines[3][0], 4);
        assert_eq!(Grid::from_bytes(grid.to_bytes()), grid);
    }

    #[test]
    fn counts_and_highest_tile() {
        let grid = Grid::from_rows([[1, 1, 0, 0], [0, 0, 0, 0], [0, 0, 11, 0], [0, 0, 0, 0]]);
        assert_eq!(grid.count_empty(), 13);
        assert_eq!(grid.highest_tile(), 2048);
        assert_eq!(grid.tile_value(0, 0), 2);
        assert_eq!(grid.tile_value(0, 2), 0);
        assert_eq!(grid.empty_cells()[0], (0, 2));
        assert_eq!(Grid::EMPTY.highest_tile(), 0);
    }

    #[test]
    fn oversized_exponents_saturate() {
        let grid = Grid::from_rows([[70, 63, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 255]]);
        assert_eq!(grid.highest_tile(), u64::MAX);
        assert_eq!(grid.tile_value(0, 0), u64::MAX);
        assert_eq!(grid.tile_value(0, 1), 1 << 63);
        assert_eq!(tile_magnitude(64), u64::MAX);
    }

    #[test]
    fn direction_codes_are_closed() {
        for d in Direction::ALL {
            assert_eq!(Direction::try_from(d.code()), Ok(d));
        }
        assert_eq!(Direction::try_from(4), Err(DirectionError::InvalidCode(4)));
        assert_eq!(Direction::try_from(255), Err(DirectionError::InvalidCode(255)));
    }

    #[test]
    fn direction_parses_names_and_keys() {
        assert_eq!("UP".parse::<Direction>(), Ok(Direction::Up));
        assert_eq!("h".parse::<Direction>(), Ok(Direction::Left));
        assert_eq!(" d ".parse::<Direction>(), Ok(Direction::Right));
        assert_eq!("j".parse::<Direction>(), Ok(Direction::Down));
        assert!(matches!("north".parse::<Direction>(), Err(DirectionError::UnknownName(_))));
    }

    #[test]
    fn random_directions_cover_all_four() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = [false; 4];
        for _ in 0..200 {
            let d: Direction = rng.gen();
            seen[d.code() as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn display_shows_magnitudes() {
        let grid = Grid::from_rows([[1, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 17]]);
        let text = grid.to_string();
        assert!(text.contains('2'));
        assert!(text.contains("131072"));
        assert_eq!(text.lines().count(), 2 * SIZE - 1);
    }
}
