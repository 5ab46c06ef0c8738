//! The bubble field: owner of all live bubbles
//!
//! Only the interaction thread touches a `BubbleField`. The ticker works from
//! `FieldView` snapshots, so removals never race the hit-test loop.

use std::sync::Arc;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::bounds::Bounds;
use super::bubble::{Bubble, BubbleSprite, RemovalQueue};
use crate::settings::{HitBox, Settings, SpeedMode};

/// What a single tap did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// An existing bubble was hit and its removal requested
    Popped(u32),
    /// Nothing was hit; a new bubble was spawned
    Spawned(u32),
}

/// Snapshot handed to the ticker
#[derive(Debug, Clone, Default)]
pub struct FieldView {
    pub bounds: Bounds,
    /// Live bubbles in insertion order
    pub bubbles: Vec<Arc<Bubble>>,
}

#[derive(Debug)]
pub struct BubbleField {
    bounds: Bounds,
    /// Insertion order = draw order = hit-test priority
    live: Vec<Arc<Bubble>>,
    speed_mode: SpeedMode,
    hit_box: HitBox,
    base_size: f32,
    tick_period: f32,
    rng: Pcg32,
    next_id: u32,
}

impl BubbleField {
    pub fn new(settings: &Settings) -> Self {
        let seed = settings.seed.unwrap_or_else(rand::random);
        log::info!("Bubble field seed: {}", seed);
        Self {
            bounds: Bounds::UNKNOWN,
            live: Vec::new(),
            speed_mode: settings.speed_mode,
            hit_box: settings.hit_box,
            base_size: settings.base_size,
            tick_period: settings.tick_period(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Record screen geometry. May be called again after a resize.
    pub fn on_bounds_known(&mut self, width: f32, height: f32) {
        let bounds = Bounds::new(width, height);
        if !bounds.is_known() {
            log::warn!("Ignoring degenerate bounds {}x{}", width, height);
            return;
        }
        log::info!("Field bounds: {}x{}", width, height);
        self.bounds = bounds;
    }

    /// Pop the first bubble under the tap, or spawn a new one there.
    ///
    /// A bubble stays live until its removal is applied, so a repeat tap on a
    /// bubble that is already popping is consumed without another request.
    pub fn on_single_tap(&mut self, x: f32, y: f32, removals: &dyn RemovalQueue) -> TapOutcome {
        let hit = self.live.iter().find(|b| b.hit_test(x, y, self.hit_box));

        if let Some(bubble) = hit {
            if bubble.request_removal(true, removals) {
                log::debug!("Tap ({}, {}) popped bubble {}", x, y, bubble.id());
            } else {
                log::debug!("Tap ({}, {}) hit bubble {} already popping", x, y, bubble.id());
            }
            return TapOutcome::Popped(bubble.id());
        }

        let bubble = self.spawn_at(x, y);
        log::debug!(
            "Tap ({}, {}) spawned bubble {} (size {})",
            x,
            y,
            bubble.id(),
            bubble.visual_size()
        );
        TapOutcome::Spawned(bubble.id())
    }

    /// Deflect every live bubble
    pub fn on_fling(&mut self, vx: f32, vy: f32) {
        log::debug!("Fling ({}, {}) on {} bubbles", vx, vy, self.live.len());
        for bubble in &self.live {
            bubble.deflect(vx, vy, self.tick_period);
        }
    }

    /// Spawn a bubble centered at (x, y) using the current mode
    pub fn spawn_at(&mut self, x: f32, y: f32) -> Arc<Bubble> {
        let id = self.next_id;
        self.next_id += 1;
        let bubble = Arc::new(Bubble::spawn(
            id,
            Vec2::new(x, y),
            self.speed_mode,
            self.base_size,
            &mut self.rng,
        ));
        self.live.push(Arc::clone(&bubble));
        bubble
    }

    /// Remove a bubble; `None` if it is already gone
    pub fn remove_bubble(&mut self, id: u32) -> Option<Arc<Bubble>> {
        let idx = self.live.iter().position(|b| b.id() == id)?;
        Some(self.live.remove(idx))
    }

    /// Applies to bubbles spawned from now on
    pub fn set_speed_mode(&mut self, mode: SpeedMode) {
        log::info!("Speed mode: {}", mode.as_str());
        self.speed_mode = mode;
    }

    pub fn speed_mode(&self) -> SpeedMode {
        self.speed_mode
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn get(&self, id: u32) -> Option<&Arc<Bubble>> {
        self.live.iter().find(|b| b.id() == id)
    }

    pub fn bubbles(&self) -> &[Arc<Bubble>] {
        &self.live
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn view(&self) -> FieldView {
        FieldView {
            bounds: self.bounds,
            bubbles: self.live.clone(),
        }
    }

    pub fn sprites(&self) -> Vec<BubbleSprite> {
        self.live.iter().map(|b| b.sprite()).collect()
    }
}
