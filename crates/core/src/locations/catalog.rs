//! Location kinds and the per-kind placement, narration and render profile.
//!
//! A `LocationCatalog` is built once at startup and handed to generation and to
//! snapshot decoding. Registration order is placement order.

use std::fmt;

use crate::maze::Maze;
use crate::rng::RandomSource;
use crate::types::{Dir, Pos};

use super::shapes::{DEFAULT_SHAPES, Shape};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LocationKind {
    Hospital,
    Arsenal,
}

impl LocationKind {
    pub const ALL: [LocationKind; 2] = [LocationKind::Hospital, LocationKind::Arsenal];

    /// Persisted snapshot keyword.
    pub fn keyword(self) -> &'static str {
        match self {
            LocationKind::Hospital => "HOSPITAL",
            LocationKind::Arsenal => "ARSENAL",
        }
    }

    pub fn from_keyword(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.keyword() == raw)
    }
}

impl fmt::Display for LocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnchorRule {
    /// Uniform over every cell; x is drawn before y.
    AnyCell,
    /// Uniform over cells at least `margin` away from the border, falling back
    /// to the full axis when the grid is too narrow.
    Inset { margin: i32 },
}

impl AnchorRule {
    pub fn pick(self, maze: &Maze, rng: &mut RandomSource) -> Pos {
        let width = maze.width() as u64;
        let height = maze.height() as u64;
        match self {
            AnchorRule::AnyCell => {
                let x = rng.below(width) as i32;
                let y = rng.below(height) as i32;
                Pos { y, x }
            }
            AnchorRule::Inset { margin } => {
                let x = inset_draw(rng, width, margin);
                let y = inset_draw(rng, height, margin);
                Pos { y, x }
            }
        }
    }
}

fn inset_draw(rng: &mut RandomSource, extent: u64, margin: i32) -> i32 {
    let margin = margin.max(0) as u64;
    if extent > margin * 2 {
        (margin + rng.below(extent - margin * 2)) as i32
    } else {
        rng.below(extent) as i32
    }
}

/// What a passage hook may look at. `candidates` are the boundary walls the
/// exit was drawn from; `exit` is already among them.
pub struct HookContext<'a> {
    pub maze: &'a Maze,
    pub cells: &'a [Pos],
    pub candidates: &'a [(Pos, Dir)],
    pub exit: (Pos, Dir),
}

/// Extra openings appended after the base open/enclose plan. Hooks can only
/// open walls, never close them.
pub type PassageHook = fn(&HookContext<'_>, &mut RandomSource, &mut Vec<(Pos, Dir)>);

/// Opens one more boundary wall besides the exit, when there is one.
pub fn side_door(context: &HookContext<'_>, rng: &mut RandomSource, openings: &mut Vec<(Pos, Dir)>) {
    let others: Vec<(Pos, Dir)> =
        context.candidates.iter().copied().filter(|&edge| edge != context.exit).collect();
    if let Some(&door) = rng.pick(&others) {
        openings.push(door);
    }
}

#[derive(Clone, Copy, Debug)]
pub struct PlacementPolicy {
    /// Attempts per `propose` call; values below 1 count as 1.
    pub attempts: usize,
    pub shapes: &'static [Shape],
    pub anchor: AnchorRule,
    pub hook: Option<PassageHook>,
}

impl Default for PlacementPolicy {
    fn default() -> Self {
        Self { attempts: 1, shapes: DEFAULT_SHAPES, anchor: AnchorRule::AnyCell, hook: None }
    }
}

impl PlacementPolicy {
    pub fn attempt_budget(&self) -> usize {
        self.attempts.max(1)
    }

    pub fn pick_shape(&self, rng: &mut RandomSource) -> Option<Shape> {
        rng.pick(self.shapes).copied()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct LocationProfile {
    pub kind: LocationKind,
    /// Lower-case noun used in narration ("entered the hospital").
    pub noun: &'static str,
    pub fill_color: &'static str,
    pub policy: PlacementPolicy,
}

#[derive(Clone, Debug, Default)]
pub struct LocationCatalog {
    profiles: Vec<LocationProfile>,
}

impl LocationCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn standard() -> Self {
        let mut catalog = Self::empty();
        catalog.register(LocationProfile {
            kind: LocationKind::Hospital,
            noun: "hospital",
            fill_color: "#d62728",
            policy: PlacementPolicy::default(),
        });
        catalog.register(LocationProfile {
            kind: LocationKind::Arsenal,
            noun: "arsenal",
            fill_color: "#ffcc00",
            policy: PlacementPolicy::default(),
        });
        catalog
    }

    /// Adds a profile, replacing an earlier one of the same kind in place.
    pub fn register(&mut self, profile: LocationProfile) {
        match self.profiles.iter_mut().find(|existing| existing.kind == profile.kind) {
            Some(existing) => *existing = profile,
            None => self.profiles.push(profile),
        }
    }

    pub fn profiles(&self) -> &[LocationProfile] {
        &self.profiles
    }

    pub fn profile(&self, kind: LocationKind) -> Option<&LocationProfile> {
        self.profiles.iter().find(|profile| profile.kind == kind)
    }

    pub fn profile_mut(&mut self, kind: LocationKind) -> Option<&mut LocationProfile> {
        self.profiles.iter_mut().find(|profile| profile.kind == kind)
    }

    /// Resolves a snapshot keyword to a kind registered in this catalog.
    pub fn resolve(&self, keyword: &str) -> Option<LocationKind> {
        LocationKind::from_keyword(keyword).filter(|&kind| self.profile(kind).is_some())
    }
}
