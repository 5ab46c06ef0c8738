//! Bubble simulation
//!
//! Pure logic, no threads or I/O:
//! - Bubbles own their kinematics behind a per-bubble lock
//! - The field owns the live set and dispatches taps and flings
//! - Seeded RNG only, stable iteration order (insertion order)

pub mod bounds;
pub mod bubble;
pub mod field;
pub mod tick;

pub use bounds::Bounds;
pub use bubble::{Bubble, BubbleSprite, Motion, RemovalQueue, TickOutcome};
pub use field::{BubbleField, FieldView, TapOutcome};
pub use tick::tick;
