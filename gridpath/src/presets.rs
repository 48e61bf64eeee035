//! The table of (grid, source, destination) triples shown when the application starts.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::Rejected;
use crate::find::MapTrait;
use crate::grid::{GridMap, Point};
use crate::parse::validate_grid;

const BUILTIN_PRESETS: &str = include_str!("../presets.json");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub matrix: GridMap,
    pub source: Point,
    pub dest: Point,
}

#[derive(Debug, Error)]
pub enum PresetError {
    #[error("failed to decode preset table: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("preset table is empty")]
    Empty,
    #[error("preset '{name}' has an invalid matrix: {source}")]
    InvalidMatrix {
        name: String,
        #[source]
        source: Rejected,
    },
    #[error("preset '{name}' has {point} outside the grid or on an obstacle")]
    InvalidEndpoint { name: String, point: Point },
}

/// Read-only list of presets, never empty
#[derive(Debug, Clone)]
pub struct PresetTable {
    presets: Vec<Preset>,
}

impl PresetTable {
    /// The presets shipped with the crate
    pub fn builtin() -> Result<Self, PresetError> {
        Self::from_json(BUILTIN_PRESETS)
    }

    pub fn from_json(text: &str) -> Result<Self, PresetError> {
        let presets: Vec<Preset> = serde_json::from_str(text)?;

        if presets.is_empty() {
            return Err(PresetError::Empty);
        }

        // the JSON decoder is laxer than the text grammar (e.g. empty rows), hold presets to the same rules
        for preset in &presets {
            validate_grid(&preset.matrix.to_text()).map_err(|source| {
                PresetError::InvalidMatrix {
                    name: preset.name.clone(),
                    source,
                }
            })?;

            for point in [preset.source, preset.dest] {
                if !preset.matrix.is_valid(point) {
                    return Err(PresetError::InvalidEndpoint {
                        name: preset.name.clone(),
                        point,
                    });
                }
            }
        }

        Ok(Self { presets })
    }

    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    /// Select a preset from any seed, e.g. the clock at startup
    pub fn pick(&self, seed: u64) -> &Preset {
        &self.presets[(seed % self.presets.len() as u64) as usize]
    }
}
