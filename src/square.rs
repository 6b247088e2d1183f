use serde::{Deserialize, Serialize};
use std::fmt;

/// Board coordinate: rank 0 is the row holding White's back pieces,
/// file 0 is the a-file. Both components stay in 0..=7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Square {
    rank: u8,
    file: u8,
}

impl Square {
    #[inline(always)]
    pub fn new(rank: u8, file: u8) -> Self {
        debug_assert!(rank < 8 && file < 8, "square out of range: ({rank},{file})");
        Square { rank, file }
    }

    #[inline(always)]
    pub fn rank(self) -> u8 {
        self.rank
    }

    #[inline(always)]
    pub fn file(self) -> u8 {
        self.file
    }

    /// Offset by (Δrank, Δfile), or None if the result leaves the board.
    #[inline(always)]
    pub fn offset(self, dr: i8, df: i8) -> Option<Square> {
        let r = self.rank as i8 + dr;
        let f = self.file as i8 + df;
        if (0..8).contains(&r) && (0..8).contains(&f) {
            Some(Square::new(r as u8, f as u8))
        } else {
            None
        }
    }

    #[inline(always)]
    pub fn step(self, dir: Direction) -> Option<Square> {
        let (dr, df) = dir.delta();
        self.offset(dr, df)
    }

    /// King-move (Chebyshev) distance.
    #[inline(always)]
    pub fn distance(self, other: Square) -> u8 {
        let dr = self.rank.abs_diff(other.rank);
        let df = self.file.abs_diff(other.file);
        dr.max(df)
    }

    #[inline(always)]
    pub fn same_rank(self, other: Square) -> bool {
        self.rank == other.rank
    }

    #[inline(always)]
    pub fn same_file(self, other: Square) -> bool {
        self.file == other.file
    }

    #[inline(always)]
    pub fn same_diagonal(self, other: Square) -> bool {
        self.rank.abs_diff(other.rank) == self.file.abs_diff(other.file)
    }

    /// Direction from `self` toward `other` if the two squares share a
    /// rank, file, or diagonal.
    pub fn direction_to(self, other: Square) -> Option<Direction> {
        if self == other {
            return None;
        }
        let dr = (other.rank as i8 - self.rank as i8).signum();
        let df = (other.file as i8 - self.file as i8).signum();
        if !(self.same_rank(other) || self.same_file(other) || self.same_diagonal(other)) {
            return None;
        }
        Direction::ALL.iter().copied().find(|d| d.delta() == (dr, df))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + self.file) as char;
        let rank = (b'1' + self.rank) as char;
        write!(f, "{file}{rank}")
    }
}

/// The eight compass directions, rank-major. North points toward Black's
/// back rank (increasing rank).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    pub const ORTHOGONAL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub const DIAGONAL: [Direction; 4] = [
        Direction::NorthEast,
        Direction::SouthEast,
        Direction::SouthWest,
        Direction::NorthWest,
    ];

    #[inline(always)]
    pub fn delta(self) -> (i8, i8) {
        match self {
            Direction::North => (1, 0),
            Direction::NorthEast => (1, 1),
            Direction::East => (0, 1),
            Direction::SouthEast => (-1, 1),
            Direction::South => (-1, 0),
            Direction::SouthWest => (-1, -1),
            Direction::West => (0, -1),
            Direction::NorthWest => (1, -1),
        }
    }

    #[inline(always)]
    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::NorthEast => Direction::SouthWest,
            Direction::East => Direction::West,
            Direction::SouthEast => Direction::NorthWest,
            Direction::South => Direction::North,
            Direction::SouthWest => Direction::NorthEast,
            Direction::West => Direction::East,
            Direction::NorthWest => Direction::SouthEast,
        }
    }

    #[inline(always)]
    pub fn is_diagonal(self) -> bool {
        let (dr, df) = self.delta();
        dr != 0 && df != 0
    }
}

/// Knight jump offsets as (Δrank, Δfile).
pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];
