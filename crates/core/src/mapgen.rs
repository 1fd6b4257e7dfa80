//! Maze topology generation: a randomized spanning tree followed by a loop pass.

mod openness;
mod spanning_tree;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, GenerationError};
use crate::maze::Maze;
use crate::rng::RandomSource;

pub const DEFAULT_OPENNESS: i32 = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeConfig {
    pub width: i32,
    pub height: i32,
    /// Percentage in `[0, 100]`; values outside are clamped by the loop pass.
    pub openness: i32,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self { width: 10, height: 10, openness: DEFAULT_OPENNESS }
    }
}

impl MazeConfig {
    pub fn validate(&self) -> Result<(usize, usize), ConfigError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(ConfigError::NonPositiveDimensions {
                width: i64::from(self.width),
                height: i64::from(self.height),
            });
        }
        Ok((self.width as usize, self.height as usize))
    }
}

/// Builds a fully connected maze. Identical `(config, rng state)` inputs
/// always yield identical walls and leave the stream at the same counter.
pub fn generate_maze(config: &MazeConfig, rng: &mut RandomSource) -> Result<Maze, GenerationError> {
    let (width, height) = config.validate()?;
    let mut maze = Maze::new(width, height)?;

    let carved = spanning_tree::carve_spanning_tree(&mut maze, rng)?;
    let loops = openness::inject_loops(&mut maze, config.openness, rng)?;

    debug!(width, height, openness = config.openness, carved, loops, "maze carved");
    Ok(maze)
}
