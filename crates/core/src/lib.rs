pub mod config;
pub mod error;
pub mod locations;
pub mod mapgen;
pub mod maze;
pub mod rng;
pub mod session;
pub mod snapshot;
pub mod types;

pub use config::{GenerationConfig, LocationOverride};
pub use error::{ConfigError, GenerationError, SessionError};
pub use locations::{Location, LocationCatalog, LocationKind};
pub use mapgen::{MazeConfig, generate_maze};
pub use maze::{Cell, Maze, MazeError};
pub use rng::RandomSource;
pub use session::{Event, Player, Session};
pub use snapshot::SnapshotError;
pub use types::*;
