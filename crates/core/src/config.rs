//! Generation settings, deserializable from a config file.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::locations::shapes::{COMPACT_SHAPES, DEFAULT_SHAPES};
use crate::locations::{AnchorRule, LocationCatalog, LocationKind, side_door};
use crate::mapgen::MazeConfig;

pub const DEFAULT_MAX_PLACEMENT_ROUNDS: usize = 10_000;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub maze: MazeConfig,
    /// 0 asks for a runtime seed.
    pub seed: u64,
    /// Cap on propose/commit rounds per location type before giving up.
    pub max_placement_rounds: usize,
    /// Per-type tweaks keyed by snapshot keyword, case-insensitive.
    pub locations: BTreeMap<String, LocationOverride>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            maze: MazeConfig::default(),
            seed: 0,
            max_placement_rounds: DEFAULT_MAX_PLACEMENT_ROUNDS,
            locations: BTreeMap::new(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LocationOverride {
    pub attempts: Option<usize>,
    pub side_door: Option<bool>,
    /// Restricts the footprint pool to squares and L triples.
    pub compact_shapes: Option<bool>,
    /// Keeps anchors this many cells away from the border; 0 is uniform.
    pub anchor_margin: Option<i32>,
}

impl GenerationConfig {
    /// Copy of `catalog` with this config's per-type overrides applied.
    pub fn apply_overrides(&self, catalog: &LocationCatalog) -> Result<LocationCatalog, ConfigError> {
        let mut tuned = catalog.clone();
        for (key, tweak) in &self.locations {
            let kind = LocationKind::from_keyword(&key.to_ascii_uppercase())
                .ok_or_else(|| ConfigError::Invalid(format!("unknown location type '{key}'")))?;
            let Some(profile) = tuned.profile_mut(kind) else {
                return Err(ConfigError::Invalid(format!("location type '{key}' is not registered")));
            };
            if let Some(attempts) = tweak.attempts {
                profile.policy.attempts = attempts;
            }
            match tweak.side_door {
                Some(true) => profile.policy.hook = Some(side_door),
                Some(false) => profile.policy.hook = None,
                None => {}
            }
            match tweak.compact_shapes {
                Some(true) => profile.policy.shapes = COMPACT_SHAPES,
                Some(false) => profile.policy.shapes = DEFAULT_SHAPES,
                None => {}
            }
            match tweak.anchor_margin {
                Some(margin) if margin < 0 => {
                    return Err(ConfigError::Invalid(format!(
                        "anchor_margin for '{key}' must not be negative, got {margin}"
                    )));
                }
                Some(0) => profile.policy.anchor = AnchorRule::AnyCell,
                Some(margin) => profile.policy.anchor = AnchorRule::Inset { margin },
                None => {}
            }
        }
        Ok(tuned)
    }
}
