//! Engine settings
//!
//! Loaded from a JSON file by the binary; every field has a default so a
//! partial file only overrides what it names.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{BASE_BUBBLE_SIZE, TICK_PERIOD_MS};
use crate::error::EngineError;

/// How new bubbles pick their size, speed and spin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SpeedMode {
    /// Random size, speed in [-3, 3] px/tick per axis, spin in [1, 3]
    #[default]
    Random,
    /// Largest size, fixed (20, 20) px/tick, no spin
    SingleSpeed,
    /// Largest size, no motion, no spin
    Still,
}

impl SpeedMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpeedMode::Random => "Random",
            SpeedMode::SingleSpeed => "SingleSpeed",
            SpeedMode::Still => "Still",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "random" => Some(SpeedMode::Random),
            "single" | "singlespeed" | "single_speed" => Some(SpeedMode::SingleSpeed),
            "still" => Some(SpeedMode::Still),
            _ => None,
        }
    }
}

/// Shape of the tap hit box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum HitBox {
    /// Square of half-width `visual_size` anchored at the bubble's top-left
    /// position. Not centered on the drawn bubble; kept for compatibility.
    #[default]
    Anchored,
    /// Circle of `radius` around the bubble's visual center
    Centered,
}

/// Engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Mode applied to newly spawned bubbles
    pub speed_mode: SpeedMode,
    /// Tap hit-test shape
    pub hit_box: HitBox,
    /// Tick period (ms). Also the divisor converting fling velocity to px/tick.
    pub tick_period_ms: u64,
    /// Size of a 1x bubble in pixels
    pub base_size: f32,
    /// RNG seed; random when unset
    pub seed: Option<u64>,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Drop all pop sounds
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            speed_mode: SpeedMode::Random,
            hit_box: HitBox::Anchored,
            tick_period_ms: TICK_PERIOD_MS,
            base_size: BASE_BUBBLE_SIZE,
            seed: None,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Tick period as f32, clamped to at least 1ms
    pub fn tick_period(&self) -> f32 {
        self.tick_period_ms.max(1) as f32
    }

    /// Read settings from a JSON file
    pub fn try_load(path: &Path) -> Result<Self, EngineError> {
        let json = fs::read_to_string(path).map_err(|source| EngineError::SettingsIo {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| EngineError::SettingsParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), EngineError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| {
            EngineError::SettingsParse {
                path: path.to_path_buf(),
                source,
            }
        })?;
        fs::write(path, json).map_err(|source| EngineError::SettingsIo {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
