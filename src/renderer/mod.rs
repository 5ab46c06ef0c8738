//! Redraw request seam
//!
//! The engine never draws. Once per tick it hands the host the sprites that
//! moved; hosts may coalesce these into a single frame.

pub use crate::sim::BubbleSprite;

/// Host-side drawing. Fire-and-forget, no exactly-once guarantee.
pub trait RenderSink: Send {
    fn request_redraw(&mut self, sprites: &[BubbleSprite]);
}

/// Sink that logs frame statistics, for headless runs
#[derive(Debug, Default)]
pub struct LogRenderer {
    frames: u64,
}

impl RenderSink for LogRenderer {
    fn request_redraw(&mut self, sprites: &[BubbleSprite]) {
        self.frames += 1;
        log::trace!("Frame {}: {} bubbles", self.frames, sprites.len());
    }
}
