//! Randomized placement of one location: anchor search, bounds and overlap
//! checks, and the open-interior / enclose-with-one-exit wall plan.
//!
//! `propose` never touches the maze. `commit` re-checks the plan against the
//! current reservation and applies it on a scratch copy first, so a rejected
//! plan leaves no wall changed.

use std::collections::BTreeSet;
use std::iter;

use thiserror::Error;
use tracing::debug;

use crate::maze::{Maze, MazeError};
use crate::rng::RandomSource;
use crate::types::{Dir, Pos};

use super::catalog::{HookContext, LocationKind, LocationProfile};
use super::shapes::Shape;

/// Cells claimed by every location committed so far in a session.
pub type ReservedSet = BTreeSet<Pos>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location {
    kind: LocationKind,
    cells: Vec<Pos>,
}

impl Location {
    pub fn new(kind: LocationKind, cells: Vec<Pos>) -> Self {
        Self { kind, cells }
    }

    pub fn kind(&self) -> LocationKind {
        self.kind
    }

    pub fn cells(&self) -> &[Pos] {
        &self.cells
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.cells.contains(&pos)
    }
}

/// A fully built wall plan for one location, not yet applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Proposal {
    pub kind: LocationKind,
    pub cells: Vec<Pos>,
    /// One entry per pair of adjacent cells inside the footprint.
    pub interior_open: Vec<(Pos, Dir)>,
    /// Every boundary wall except the exit.
    pub boundary_close: Vec<(Pos, Dir)>,
    pub exit: (Pos, Dir),
    /// Openings added by the profile's passage hook.
    pub extra_open: Vec<(Pos, Dir)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("cell ({}, {}) is outside the maze", .0.x, .0.y)]
    OutOfBounds(Pos),
    #[error("cell ({}, {}) is already reserved", .0.x, .0.y)]
    Reserved(Pos),
    #[error("footprint has no free boundary wall for an exit")]
    NoExit,
    #[error("enclosing the footprint would split the maze")]
    Disconnects,
    #[error("the profile has no shapes to choose from")]
    NoShapes,
    #[error(transparent)]
    Maze(#[from] MazeError),
}

/// Runs up to the profile's attempt budget and returns the first plan that
/// fits, or `None` when every attempt was rejected.
pub fn propose(
    profile: &LocationProfile,
    maze: &Maze,
    rng: &mut RandomSource,
    reserved: &ReservedSet,
) -> Option<Proposal> {
    for attempt in 0..profile.policy.attempt_budget() {
        match attempt_once(profile, maze, rng, reserved) {
            Ok(proposal) => return Some(proposal),
            Err(rejection) => {
                debug!(kind = %profile.kind, attempt, %rejection, "placement attempt rejected");
            }
        }
    }
    None
}

/// Applies a proposal if it still fits the current reservation and keeps the
/// maze connected, then claims its cells.
pub fn commit(
    maze: &mut Maze,
    reserved: &mut ReservedSet,
    proposal: Proposal,
) -> Result<Location, Rejection> {
    check_footprint(maze, reserved, &proposal.cells)?;
    for &(pos, dir) in iter::once(&proposal.exit).chain(&proposal.extra_open) {
        let outside = maze.step(pos, dir);
        if reserved.contains(&outside) {
            return Err(Rejection::Reserved(outside));
        }
    }

    let mut scratch = maze.clone();
    for &(pos, dir) in &proposal.boundary_close {
        scratch.close_wall(pos, dir)?;
    }
    let openings =
        proposal.interior_open.iter().chain(iter::once(&proposal.exit)).chain(&proposal.extra_open);
    for &(pos, dir) in openings {
        scratch.open_wall(pos, dir)?;
    }
    if !scratch.is_fully_connected() {
        return Err(Rejection::Disconnects);
    }

    for &cell in &proposal.cells {
        scratch.tag(cell, proposal.kind);
        reserved.insert(cell);
    }
    *maze = scratch;
    Ok(Location::new(proposal.kind, proposal.cells))
}

fn attempt_once(
    profile: &LocationProfile,
    maze: &Maze,
    rng: &mut RandomSource,
    reserved: &ReservedSet,
) -> Result<Proposal, Rejection> {
    let shape = profile.policy.pick_shape(rng).ok_or(Rejection::NoShapes)?;
    let anchor = profile.policy.anchor.pick(maze, rng);
    let cells = translate(shape, anchor);
    check_footprint(maze, reserved, &cells)?;

    let interior_open = interior_edges(&cells);
    let boundary = boundary_edges(maze, &cells);
    let candidates: Vec<(Pos, Dir)> = boundary
        .iter()
        .copied()
        .filter(|&(pos, dir)| !reserved.contains(&maze.step(pos, dir)))
        .collect();
    let exit = *rng.pick(&candidates).ok_or(Rejection::NoExit)?;
    let boundary_close = boundary.into_iter().filter(|&edge| edge != exit).collect();

    let mut extra_open = Vec::new();
    if let Some(hook) = profile.policy.hook {
        let context = HookContext { maze, cells: &cells, candidates: &candidates, exit };
        hook(&context, rng, &mut extra_open);
    }

    Ok(Proposal { kind: profile.kind, cells, interior_open, boundary_close, exit, extra_open })
}

fn translate(shape: Shape, anchor: Pos) -> Vec<Pos> {
    shape.iter().map(|&offset| anchor.offset(offset)).collect()
}

fn check_footprint(maze: &Maze, reserved: &ReservedSet, cells: &[Pos]) -> Result<(), Rejection> {
    if let Some(&cell) = cells.iter().find(|&&cell| !maze.in_bounds(cell)) {
        return Err(Rejection::OutOfBounds(cell));
    }
    if let Some(&cell) = cells.iter().find(|&cell| reserved.contains(cell)) {
        return Err(Rejection::Reserved(cell));
    }
    Ok(())
}

/// Each adjacent pair once, from the cell on its left or top side.
fn interior_edges(cells: &[Pos]) -> Vec<(Pos, Dir)> {
    let mut edges = Vec::new();
    for &cell in cells {
        for dir in [Dir::Right, Dir::Down] {
            if cells.contains(&cell.offset(dir.offset())) {
                edges.push((cell, dir));
            }
        }
    }
    edges
}

/// Walls between a footprint cell and an in-bounds cell outside it. Sides on
/// the grid border are skipped.
fn boundary_edges(maze: &Maze, cells: &[Pos]) -> Vec<(Pos, Dir)> {
    let mut edges = Vec::new();
    for &cell in cells {
        for dir in Dir::ALL {
            let outside = maze.step(cell, dir);
            if maze.in_bounds(outside) && !cells.contains(&outside) {
                edges.push((cell, dir));
            }
        }
    }
    edges
}
