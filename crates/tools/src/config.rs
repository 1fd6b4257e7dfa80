//! Generation settings assembled from an optional TOML file and CLI flags.

use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use lbrnt_core::GenerationConfig;
use tracing::warn;

/// Flags given on the command line. `None` means "not given", so the config
/// file value, or the built-in default, applies.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenerateFlags {
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub openness: Option<i32>,
    pub seed: Option<u64>,
    pub max_placement_rounds: Option<usize>,
}

pub fn load_file(path: &Path) -> Result<GenerationConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    parse(&raw).with_context(|| format!("failed to parse config file {}", path.display()))
}

pub fn parse(raw: &str) -> Result<GenerationConfig> {
    Ok(toml::from_str(raw)?)
}

/// Explicit flags override the file.
pub fn resolve(file: Option<GenerationConfig>, flags: &GenerateFlags) -> GenerationConfig {
    let from_file = file.is_some();
    let mut config = file.unwrap_or_default();

    override_field("maze.width", &mut config.maze.width, flags.width, from_file);
    override_field("maze.height", &mut config.maze.height, flags.height, from_file);
    override_field("maze.openness", &mut config.maze.openness, flags.openness, from_file);
    override_field("seed", &mut config.seed, flags.seed, from_file);
    override_field(
        "max_placement_rounds",
        &mut config.max_placement_rounds,
        flags.max_placement_rounds,
        from_file,
    );
    config
}

fn override_field<T: PartialEq + fmt::Debug>(
    key: &str,
    slot: &mut T,
    flag: Option<T>,
    from_file: bool,
) {
    let Some(value) = flag else {
        return;
    };
    if from_file && *slot != value {
        warn!(key, file = ?slot, flag = ?value, "command-line flag overrides config file");
    }
    *slot = value;
}
