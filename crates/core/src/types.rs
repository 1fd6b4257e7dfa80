use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub const ORIGIN: Pos = Pos { y: 0, x: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { y, x }
    }

    pub fn offset(self, by: Pos) -> Self {
        Self { y: self.y + by.y, x: self.x + by.x }
    }
}

/// Cardinal direction. The discriminant is the wall-mask bit index used by
/// the maze and by the snapshot hex encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dir {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl Dir {
    pub const ALL: [Dir; 4] = [Dir::Up, Dir::Right, Dir::Down, Dir::Left];

    pub fn bit(self) -> u8 {
        1 << (self as u8)
    }

    pub fn opposite(self) -> Dir {
        match self {
            Dir::Up => Dir::Down,
            Dir::Right => Dir::Left,
            Dir::Down => Dir::Up,
            Dir::Left => Dir::Right,
        }
    }

    pub fn offset(self) -> Pos {
        match self {
            Dir::Up => Pos { y: -1, x: 0 },
            Dir::Right => Pos { y: 0, x: 1 },
            Dir::Down => Pos { y: 1, x: 0 },
            Dir::Left => Pos { y: 0, x: -1 },
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Dir::Up => "up",
            Dir::Right => "right",
            Dir::Down => "down",
            Dir::Left => "left",
        }
    }
}

impl fmt::Display for Dir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown direction '{0}', expected one of up/right/down/left")]
pub struct ParseDirError(pub String);

impl FromStr for Dir {
    type Err = ParseDirError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Dir::ALL
            .into_iter()
            .find(|dir| dir.name().eq_ignore_ascii_case(raw))
            .ok_or_else(|| ParseDirError(raw.to_string()))
    }
}
