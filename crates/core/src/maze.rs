//! Wall-mask grid model shared by carving, placement, snapshots and renderers.
//!
//! Walls are stored twice, once on each side of an edge. The public mutators
//! always update both sides so the two copies never disagree.

use std::collections::VecDeque;

use thiserror::Error;

use crate::locations::LocationKind;
use crate::types::{Dir, Pos};

pub const ALL_WALLS: u8 = 0b1111;

/// Coordinates are `i32`, so neither side may exceed `i32::MAX`.
pub const MAX_SIDE: usize = i32::MAX as usize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub walls: u8,
    pub content: Option<LocationKind>,
}

impl Cell {
    pub fn has_wall(self, dir: Dir) -> bool {
        self.walls & dir.bit() != 0
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self { walls: ALL_WALLS, content: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MazeError {
    #[error("maze dimensions must be positive, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },
    #[error("maze dimensions {width}x{height} are too large")]
    TooLarge { width: usize, height: usize },
    #[error("edge {dir} of ({}, {}) leaves the grid", .pos.x, .pos.y)]
    EdgeOutOfBounds { pos: Pos, dir: Dir },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maze {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Maze {
    /// Fully walled grid.
    pub fn new(width: usize, height: usize) -> Result<Self, MazeError> {
        let count = Self::checked_cell_count(width, height)?;
        Ok(Self { width, height, cells: vec![Cell::default(); count] })
    }

    /// Validates a `width` x `height` grid without allocating it.
    pub fn checked_cell_count(width: usize, height: usize) -> Result<usize, MazeError> {
        if width == 0 || height == 0 {
            return Err(MazeError::EmptyGrid { width, height });
        }
        if width > MAX_SIDE || height > MAX_SIDE {
            return Err(MazeError::TooLarge { width, height });
        }
        width.checked_mul(height).ok_or(MazeError::TooLarge { width, height })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    pub fn at(&self, pos: Pos) -> Option<&Cell> {
        self.index(pos).map(|index| &self.cells[index])
    }

    /// Out-of-bounds cells read as fully walled.
    pub fn walls(&self, pos: Pos) -> u8 {
        self.at(pos).map_or(ALL_WALLS, |cell| cell.walls)
    }

    pub fn has_wall(&self, pos: Pos, dir: Dir) -> bool {
        self.walls(pos) & dir.bit() != 0
    }

    pub fn content(&self, pos: Pos) -> Option<LocationKind> {
        self.at(pos).and_then(|cell| cell.content)
    }

    /// Coordinate arithmetic only; pair with `in_bounds` or use `neighbor`.
    pub fn step(&self, pos: Pos, dir: Dir) -> Pos {
        pos.offset(dir.offset())
    }

    pub fn neighbor(&self, pos: Pos, dir: Dir) -> Option<Pos> {
        let next = self.step(pos, dir);
        self.in_bounds(next).then_some(next)
    }

    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.height).flat_map(move |y| {
            (0..self.width).map(move |x| Pos { y: y as i32, x: x as i32 })
        })
    }

    pub fn open_wall(&mut self, pos: Pos, dir: Dir) -> Result<(), MazeError> {
        self.set_edge(pos, dir, false)
    }

    pub fn close_wall(&mut self, pos: Pos, dir: Dir) -> Result<(), MazeError> {
        self.set_edge(pos, dir, true)
    }

    /// Number of open internal edges, each counted once.
    pub fn open_passage_count(&self) -> usize {
        self.positions()
            .map(|pos| {
                [Dir::Right, Dir::Down]
                    .into_iter()
                    .filter(|&dir| self.neighbor(pos, dir).is_some() && !self.has_wall(pos, dir))
                    .count()
            })
            .sum()
    }

    pub fn internal_edge_count(&self) -> usize {
        (self.width - 1) * self.height + self.width * (self.height - 1)
    }

    /// Every cell reachable from `start` through open walls.
    pub fn reachable_from(&self, start: Pos) -> Vec<bool> {
        let mut seen = vec![false; self.cells.len()];
        let Some(start_index) = self.index(start) else {
            return seen;
        };
        seen[start_index] = true;
        let mut open = VecDeque::from([start]);
        while let Some(pos) = open.pop_front() {
            for dir in Dir::ALL {
                if self.has_wall(pos, dir) {
                    continue;
                }
                let Some(next) = self.neighbor(pos, dir) else {
                    continue;
                };
                let Some(next_index) = self.index(next) else {
                    continue;
                };
                if !seen[next_index] {
                    seen[next_index] = true;
                    open.push_back(next);
                }
            }
        }
        seen
    }

    pub fn is_fully_connected(&self) -> bool {
        self.reachable_from(Pos::ORIGIN).iter().all(|&reached| reached)
    }

    pub(crate) fn set_walls_raw(&mut self, pos: Pos, walls: u8) {
        if let Some(index) = self.index(pos) {
            self.cells[index].walls = walls & ALL_WALLS;
        }
    }

    pub(crate) fn tag(&mut self, pos: Pos, kind: LocationKind) {
        if let Some(index) = self.index(pos) {
            self.cells[index].content = Some(kind);
        }
    }

    fn set_edge(&mut self, pos: Pos, dir: Dir, closed: bool) -> Result<(), MazeError> {
        let (Some(from), Some(to)) = (self.index(pos), self.index(self.step(pos, dir))) else {
            return Err(MazeError::EdgeOutOfBounds { pos, dir });
        };
        let mirrored = dir.opposite();
        if closed {
            self.cells[from].walls |= dir.bit();
            self.cells[to].walls |= mirrored.bit();
        } else {
            self.cells[from].walls &= !dir.bit();
            self.cells[to].walls &= !mirrored.bit();
        }
        Ok(())
    }

    fn index(&self, pos: Pos) -> Option<usize> {
        self.in_bounds(pos).then(|| (pos.y as usize) * self.width + (pos.x as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_maze_is_fully_walled_and_disconnected() {
        let maze = Maze::new(3, 2).unwrap();
        assert!(maze.positions().all(|pos| maze.walls(pos) == ALL_WALLS));
        assert_eq!(maze.open_passage_count(), 0);
        assert_eq!(maze.internal_edge_count(), 7);
        assert!(!maze.is_fully_connected());
    }

    #[test]
    fn zero_sized_grid_is_rejected() {
        assert_eq!(Maze::new(0, 4), Err(MazeError::EmptyGrid { width: 0, height: 4 }));
    }

    #[test]
    fn oversized_grids_are_rejected_without_allocating() {
        assert_eq!(
            Maze::new(usize::MAX, 2),
            Err(MazeError::TooLarge { width: usize::MAX, height: 2 })
        );
        assert_eq!(
            Maze::checked_cell_count(3_000_000_000, 1),
            Err(MazeError::TooLarge { width: 3_000_000_000, height: 1 })
        );
        assert_eq!(Maze::checked_cell_count(MAX_SIDE, 1), Ok(MAX_SIDE));
        assert_eq!(Maze::checked_cell_count(4, 3), Ok(12));
    }

    #[test]
    fn opening_and_closing_update_both_sides() {
        let mut maze = Maze::new(2, 2).unwrap();
        let origin = Pos::ORIGIN;
        maze.open_wall(origin, Dir::Right).unwrap();
        assert!(!maze.has_wall(origin, Dir::Right));
        assert!(!maze.has_wall(Pos::new(1, 0), Dir::Left));

        maze.close_wall(Pos::new(1, 0), Dir::Left).unwrap();
        assert!(maze.has_wall(origin, Dir::Right));
        assert!(maze.has_wall(Pos::new(1, 0), Dir::Left));
    }

    #[test]
    fn edges_leaving_the_grid_are_refused() {
        let mut maze = Maze::new(2, 2).unwrap();
        assert_eq!(
            maze.open_wall(Pos::ORIGIN, Dir::Up),
            Err(MazeError::EdgeOutOfBounds { pos: Pos::ORIGIN, dir: Dir::Up })
        );
        assert_eq!(maze.walls(Pos::ORIGIN), ALL_WALLS);
    }

    #[test]
    fn step_does_not_check_bounds_but_neighbor_does() {
        let maze = Maze::new(2, 2).unwrap();
        assert_eq!(maze.step(Pos::ORIGIN, Dir::Left), Pos::new(-1, 0));
        assert_eq!(maze.neighbor(Pos::ORIGIN, Dir::Left), None);
        assert_eq!(maze.neighbor(Pos::ORIGIN, Dir::Down), Some(Pos::new(0, 1)));
    }

    #[test]
    fn out_of_bounds_reads_as_walled() {
        let maze = Maze::new(1, 1).unwrap();
        assert!(maze.at(Pos::new(4, 4)).is_none());
        assert_eq!(maze.walls(Pos::new(-1, 0)), ALL_WALLS);
    }

    #[test]
    fn flood_fill_follows_open_walls_only() {
        let mut maze = Maze::new(3, 1).unwrap();
        maze.open_wall(Pos::ORIGIN, Dir::Right).unwrap();
        assert_eq!(maze.reachable_from(Pos::ORIGIN), vec![true, true, false]);

        maze.open_wall(Pos::new(1, 0), Dir::Right).unwrap();
        assert!(maze.is_fully_connected());
    }
}
