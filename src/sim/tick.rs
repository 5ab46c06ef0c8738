//! Tick pass
//!
//! Advances every bubble in a field snapshot by one step.

use super::bubble::{BubbleSprite, RemovalQueue, TickOutcome};
use super::field::FieldView;

/// Tick every bubble in `view`, returning sprites for the ones still on screen.
///
/// Bubbles that leave the view queue their own removal on `removals`.
pub fn tick(view: &FieldView, removals: &dyn RemovalQueue) -> Vec<BubbleSprite> {
    let mut sprites = Vec::with_capacity(view.bubbles.len());
    for bubble in &view.bubbles {
        match bubble.tick(view.bounds, removals) {
            TickOutcome::Moved(sprite) => sprites.push(sprite),
            TickOutcome::OutOfView => {
                log::debug!("Bubble {} left the field", bubble.id());
            }
            TickOutcome::Cancelled => {}
        }
    }
    sprites
}
