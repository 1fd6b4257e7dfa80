use std::fmt;

use crate::locations::{LocationCatalog, LocationKind};
use crate::types::Dir;

/// Something a player action produced, in the order it happened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Entered { player: String, kind: LocationKind },
    Left { player: String, kind: LocationKind },
    Moved { player: String, dir: Dir },
    HitWall { player: String },
    HitOuterWall { player: String },
    SensedPresence { player: String },
}

impl Event {
    pub fn player(&self) -> &str {
        match self {
            Event::Entered { player, .. }
            | Event::Left { player, .. }
            | Event::Moved { player, .. }
            | Event::HitWall { player }
            | Event::HitOuterWall { player }
            | Event::SensedPresence { player } => player,
        }
    }

    /// One-line English description, using the catalog's noun for locations.
    pub fn narrate(&self, catalog: &LocationCatalog) -> String {
        match self {
            Event::Entered { player, kind } => {
                format!("{player} entered the {}", Noun(catalog, *kind))
            }
            Event::Left { player, kind } => format!("{player} left the {}", Noun(catalog, *kind)),
            Event::Moved { player, dir } => format!("{player} moved {}", dir.name()),
            Event::HitWall { player } => format!("{player} bumped into a wall"),
            Event::HitOuterWall { player } => format!("{player} bumped into the outer wall"),
            Event::SensedPresence { player } => format!("{player} sensed someone breathing nearby"),
        }
    }
}

struct Noun<'a>(&'a LocationCatalog, LocationKind);

impl fmt::Display for Noun<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.profile(self.1) {
            Some(profile) => f.write_str(profile.noun),
            None => f.write_str(&self.1.keyword().to_ascii_lowercase()),
        }
    }
}
