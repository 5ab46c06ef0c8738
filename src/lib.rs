//! Bubble Pop - tappable, flingable bubbles
//!
//! Core modules:
//! - `sim`: Bubble entities, the bubble field, and the tick pass
//! - `platform`: Interaction thread and central ticker
//! - `renderer`: Redraw request seam
//! - `audio`: Pop sound seam and volume handling
//! - `settings`: Runtime configuration

pub mod audio;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::EngineError;
pub use platform::{Engine, EngineHandle};
pub use settings::{HitBox, Settings, SpeedMode};

/// Engine configuration constants
pub mod consts {
    /// Tick period in milliseconds (25 Hz)
    pub const TICK_PERIOD_MS: u64 = 40;

    /// Base bubble size in pixels (size of the source bitmap)
    pub const BASE_BUBBLE_SIZE: f32 = 64.0;
    /// Bubble sizes are 1x, 2x or 3x the base size
    pub const MAX_SIZE_MULTIPLIER: u32 = 3;

    /// Random mode: per-axis speed range is [-RANDOM_SPEED_MAX, RANDOM_SPEED_MAX] px/tick
    pub const RANDOM_SPEED_MAX: i32 = 3;
    /// Single speed mode: fixed velocity on both axes, px/tick
    pub const SINGLE_SPEED: f32 = 20.0;
    /// Random mode: slowest spin, degrees/tick
    pub const ROTATION_DELTA_MIN: i32 = 1;
    /// Random mode: fastest spin, degrees/tick (inclusive)
    pub const ROTATION_DELTA_MAX: i32 = 3;
}
