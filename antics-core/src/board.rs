//! Board geometry on the 10x10 grid

use serde::{Deserialize, Serialize};

/// Board side length
pub const BOARD_SIZE: i8 = 10;

/// Last row (inclusive) of player one's territory
pub const PLAYER_ONE_LAST_ROW: i8 = 3;

/// First row (inclusive) of player two's territory
pub const PLAYER_TWO_FIRST_ROW: i8 = 6;

/// Board coordinates (x = column, y = row)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: i8,
    pub y: i8,
}

impl Coord {
    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    /// Check if this coordinate is on the board
    pub fn is_valid(&self) -> bool {
        (0..BOARD_SIZE).contains(&self.x) && (0..BOARD_SIZE).contains(&self.y)
    }

    /// Orthogonal neighbors that lie on the board
    pub fn neighbors(&self) -> impl Iterator<Item = Coord> + '_ {
        DIRECTIONS
            .iter()
            .map(move |&(dx, dy)| Coord::new(self.x + dx, self.y + dy))
            .filter(Coord::is_valid)
    }
}

/// Orthogonal step vectors (dx, dy): up, right, down, left
pub const DIRECTIONS: [(i8, i8); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// Board distance used by every heuristic term.
///
/// Manhattan distance: symmetric and zero only for equal coordinates.
pub fn approx_dist(a: Coord, b: Coord) -> i32 {
    (a.x as i32 - b.x as i32).abs() + (a.y as i32 - b.y as i32).abs()
}

/// On-board coordinates within `range` of `center`, excluding the center.
///
/// Enumeration order is column-major from the top-left corner of the
/// diamond; callers that engage "the first enemy in range" rely on it.
pub fn attackable(center: Coord, range: u8) -> Vec<Coord> {
    let range = range as i8;
    let mut coords = Vec::new();
    for dx in -range..=range {
        for dy in -range..=range {
            if (dx, dy) == (0, 0) || (dx.abs() + dy.abs()) > range {
                continue;
            }
            let c = Coord::new(center.x + dx, center.y + dy);
            if c.is_valid() {
                coords.push(c);
            }
        }
    }
    coords
}
