//! A generated world: the random stream, the maze, its locations and the
//! players walking it.

mod events;

use tracing::{debug, info};
use xxhash_rust::xxh3::xxh3_64;

pub use events::Event;

use crate::config::GenerationConfig;
use crate::error::{GenerationError, SessionError};
use crate::locations::{
    AnchorRule, Location, LocationCatalog, LocationProfile, ReservedSet, commit, propose,
};
use crate::mapgen::generate_maze;
use crate::maze::Maze;
use crate::rng::RandomSource;
use crate::snapshot;
use crate::types::{Dir, Pos};

/// Marker colours handed out in join order, wrapping around.
pub const PLAYER_PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub name: String,
    pub pos: Pos,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    rng: RandomSource,
    maze: Maze,
    players: Vec<Player>,
    locations: Vec<Location>,
}

impl Session {
    /// Carves a maze and places one location per catalog profile, in
    /// registration order, drawing everything from one stream.
    pub fn generate(
        config: &GenerationConfig,
        catalog: &LocationCatalog,
    ) -> Result<Self, GenerationError> {
        config.maze.validate()?;
        let catalog = config.apply_overrides(catalog)?;
        let mut rng = RandomSource::new(config.seed);
        let mut maze = generate_maze(&config.maze, &mut rng)?;

        let mut reserved = ReservedSet::new();
        let mut locations = Vec::with_capacity(catalog.profiles().len());
        for profile in catalog.profiles() {
            let location = place_one(
                profile,
                &mut maze,
                &mut rng,
                &mut reserved,
                config.max_placement_rounds,
            )?;
            info!(kind = %location.kind(), cells = ?location.cells(), "location placed");
            locations.push(location);
        }

        info!(
            seed = rng.seed(),
            counter = rng.counter(),
            locations = locations.len(),
            "generation finished"
        );
        Ok(Self { rng, maze, players: Vec::new(), locations })
    }

    /// Reassembles a session from already validated parts.
    pub(crate) fn from_parts(
        rng: RandomSource,
        maze: Maze,
        players: Vec<Player>,
        locations: Vec<Location>,
    ) -> Self {
        Self { rng, maze, players, locations }
    }

    pub fn rng(&self) -> &RandomSource {
        &self.rng
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|player| player.name == name)
    }

    pub fn location_at(&self, pos: Pos) -> Option<&Location> {
        self.locations.iter().find(|location| location.contains(pos))
    }

    /// Hash of the canonical snapshot text. Equal sessions hash equal.
    pub fn fingerprint(&self) -> u64 {
        xxh3_64(snapshot::encode(self).as_bytes())
    }

    /// Drops a new player on a random cell. Draws x then y from the stream.
    pub fn add_player(&mut self, name: &str) -> Result<Vec<Event>, SessionError> {
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(SessionError::InvalidPlayerName(name.to_string()));
        }
        if self.player(name).is_some() {
            return Err(SessionError::DuplicatePlayer(name.to_string()));
        }

        let pos = AnchorRule::AnyCell.pick(&self.maze, &mut self.rng);
        let color = PLAYER_PALETTE[self.players.len() % PLAYER_PALETTE.len()].to_string();
        self.players.push(Player { name: name.to_string(), pos, color });
        debug!(name, x = pos.x, y = pos.y, "player joined");

        let mut events = Vec::new();
        if self.has_adjacent_other(self.players.len() - 1) {
            events.push(Event::SensedPresence { player: name.to_string() });
        }
        for location in self.locations.iter().filter(|location| location.contains(pos)) {
            events.push(Event::Entered { player: name.to_string(), kind: location.kind() });
        }
        Ok(events)
    }

    /// Tries one step. Bumping into a wall still reports, and still checks
    /// for neighbours, but leaves the player where they were.
    pub fn move_player(&mut self, name: &str, dir: Dir) -> Result<Vec<Event>, SessionError> {
        let index = self
            .players
            .iter()
            .position(|player| player.name == name)
            .ok_or_else(|| SessionError::UnknownPlayer(name.to_string()))?;
        let player = name.to_string();
        let current = self.players[index].pos;
        let next = self.maze.step(current, dir);

        let mut events = Vec::new();
        if !self.maze.in_bounds(next) {
            events.push(Event::HitOuterWall { player: player.clone() });
        } else if self.maze.has_wall(current, dir) {
            events.push(Event::HitWall { player: player.clone() });
        } else {
            for location in &self.locations {
                match (location.contains(current), location.contains(next)) {
                    (true, false) => {
                        events.push(Event::Left { player: player.clone(), kind: location.kind() });
                    }
                    (false, true) => {
                        events.push(Event::Entered { player: player.clone(), kind: location.kind() });
                    }
                    _ => {}
                }
            }
            self.players[index].pos = next;
            events.push(Event::Moved { player: player.clone(), dir });
        }

        if self.has_adjacent_other(index) {
            events.push(Event::SensedPresence { player });
        }
        Ok(events)
    }

    /// Another player stands one open step away.
    fn has_adjacent_other(&self, index: usize) -> bool {
        let pos = self.players[index].pos;
        Dir::ALL
            .into_iter()
            .filter(|&dir| !self.maze.has_wall(pos, dir))
            .filter_map(|dir| self.maze.neighbor(pos, dir))
            .any(|next| {
                self.players
                    .iter()
                    .enumerate()
                    .any(|(other, player)| other != index && player.pos == next)
            })
    }
}

fn place_one(
    profile: &LocationProfile,
    maze: &mut Maze,
    rng: &mut RandomSource,
    reserved: &mut ReservedSet,
    max_rounds: usize,
) -> Result<Location, GenerationError> {
    let rounds = max_rounds.max(1);
    for round in 0..rounds {
        let Some(proposal) = propose(profile, maze, rng, reserved) else {
            continue;
        };
        match commit(maze, reserved, proposal) {
            Ok(location) => return Ok(location),
            Err(rejection) => {
                debug!(kind = %profile.kind, round, %rejection, "placement commit rejected");
            }
        }
    }
    Err(GenerationError::PlacementExhausted { kind: profile.kind, rounds })
}

#[cfg(test)]
mod tests;
