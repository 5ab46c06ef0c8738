//! Bubble entity
//!
//! A bubble is shared between the interaction thread (hit-test, deflect) and
//! the ticker (movement), so its kinematic state sits behind a mutex. Size and
//! spin rate are fixed at spawn and need no lock.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use glam::Vec2;
use rand::Rng;
use serde::Serialize;

use super::bounds::Bounds;
use crate::consts::*;
use crate::settings::{HitBox, SpeedMode};

/// Destination for removal requests.
///
/// Implemented by the interaction thread's command channel: removals are
/// always applied there, never on the caller's thread.
pub trait RemovalQueue {
    fn enqueue_removal(&self, id: u32, popped: bool);
}

/// Mutable kinematic state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    /// Top-left corner of the bounding square
    pub pos: Vec2,
    /// Pixels per tick
    pub vel: Vec2,
    /// Accumulated spin in degrees (render only)
    pub rotation: f32,
}

/// What a renderer needs to draw one bubble
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BubbleSprite {
    pub id: u32,
    pub pos: Vec2,
    pub size: f32,
    pub rotation: f32,
}

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Still on screen, redraw at the new position
    Moved(BubbleSprite),
    /// Left the visible area; removal has been requested
    OutOfView,
    /// Removal was already requested, nothing moved
    Cancelled,
}

#[derive(Debug)]
pub struct Bubble {
    id: u32,
    visual_size: f32,
    radius: f32,
    rotation_delta: f32,
    motion: Mutex<Motion>,
    /// Set once; also stops further ticks
    removal_requested: AtomicBool,
}

impl Bubble {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, visual_size: f32, rotation_delta: f32) -> Self {
        Self {
            id,
            visual_size,
            radius: visual_size / 2.0,
            rotation_delta,
            motion: Mutex::new(Motion {
                pos,
                vel,
                rotation: 0.0,
            }),
            removal_requested: AtomicBool::new(false),
        }
    }

    /// Create a bubble centered under a tap
    pub fn spawn<R: Rng>(
        id: u32,
        tap: Vec2,
        mode: SpeedMode,
        base_size: f32,
        rng: &mut R,
    ) -> Self {
        let visual_size = match mode {
            SpeedMode::Random => rng.random_range(1..=MAX_SIZE_MULTIPLIER) as f32 * base_size,
            SpeedMode::SingleSpeed | SpeedMode::Still => {
                MAX_SIZE_MULTIPLIER as f32 * base_size
            }
        };
        let radius = visual_size / 2.0;

        let vel = match mode {
            SpeedMode::Random => Vec2::new(
                rng.random_range(-RANDOM_SPEED_MAX..=RANDOM_SPEED_MAX) as f32,
                rng.random_range(-RANDOM_SPEED_MAX..=RANDOM_SPEED_MAX) as f32,
            ),
            SpeedMode::SingleSpeed => Vec2::splat(SINGLE_SPEED),
            SpeedMode::Still => Vec2::ZERO,
        };

        let rotation_delta = match mode {
            SpeedMode::Random => {
                rng.random_range(ROTATION_DELTA_MIN..=ROTATION_DELTA_MAX) as f32
            }
            _ => 0.0,
        };

        Self::new(id, tap - Vec2::splat(radius), vel, visual_size, rotation_delta)
    }

    fn motion(&self) -> MutexGuard<'_, Motion> {
        self.motion.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn visual_size(&self) -> f32 {
        self.visual_size
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn rotation_delta(&self) -> f32 {
        self.rotation_delta
    }

    /// Copy of the current kinematic state
    pub fn snapshot(&self) -> Motion {
        *self.motion()
    }

    pub fn position(&self) -> Vec2 {
        self.motion().pos
    }

    pub fn velocity(&self) -> Vec2 {
        self.motion().vel
    }

    pub fn sprite(&self) -> BubbleSprite {
        let m = self.snapshot();
        BubbleSprite {
            id: self.id,
            pos: m.pos,
            size: self.visual_size,
            rotation: m.rotation,
        }
    }

    pub fn is_removal_requested(&self) -> bool {
        self.removal_requested.load(Ordering::Acquire)
    }

    /// Advance one step. Requests its own (unpopped) removal on leaving view.
    pub fn tick(&self, bounds: Bounds, removals: &dyn RemovalQueue) -> TickOutcome {
        // A tick may still fire after removal was requested
        if self.is_removal_requested() {
            return TickOutcome::Cancelled;
        }

        let moved = {
            let mut m = self.motion();
            let vel = m.vel;
            m.pos += vel;
            m.rotation += self.rotation_delta;
            *m
        };

        if bounds.is_out_of_view(moved.pos, self.radius) {
            log::trace!("Bubble {} left view at {:?}", self.id, moved.pos);
            self.request_removal(false, removals);
            return TickOutcome::OutOfView;
        }

        TickOutcome::Moved(BubbleSprite {
            id: self.id,
            pos: moved.pos,
            size: self.visual_size,
            rotation: moved.rotation,
        })
    }

    /// Tap hit-test
    pub fn hit_test(&self, x: f32, y: f32, hit_box: HitBox) -> bool {
        let pos = self.position();
        match hit_box {
            HitBox::Anchored => {
                (x - pos.x).abs() <= self.visual_size && (y - pos.y).abs() <= self.visual_size
            }
            HitBox::Centered => {
                let center = pos + Vec2::splat(self.radius);
                Vec2::new(x, y).distance_squared(center) <= self.radius * self.radius
            }
        }
    }

    /// Replace velocity with a fling impulse converted to pixels per tick
    pub fn deflect(&self, vx: f32, vy: f32, tick_period: f32) {
        self.motion().vel = Vec2::new(vx, vy) / tick_period;
    }

    /// Stop ticking and queue removal. Only the first call has any effect.
    pub fn request_removal(&self, popped: bool, removals: &dyn RemovalQueue) -> bool {
        if self.removal_requested.swap(true, Ordering::AcqRel) {
            log::trace!("Bubble {} removal already pending", self.id);
            return false;
        }
        removals.enqueue_removal(self.id, popped);
        true
    }
}

#[cfg(test)]
impl RemovalQueue for Mutex<Vec<(u32, bool)>> {
    fn enqueue_removal(&self, id: u32, popped: bool) {
        self.lock().unwrap().push((id, popped));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn queue() -> Mutex<Vec<(u32, bool)>> {
        Mutex::new(Vec::new())
    }

    #[test]
    fn test_spawn_single_speed() {
        let mut rng = Pcg32::seed_from_u64(1);
        let b = Bubble::spawn(1, Vec2::new(100.0, 150.0), SpeedMode::SingleSpeed, 64.0, &mut rng);
        assert_eq!(b.visual_size(), 192.0);
        assert_eq!(b.radius(), 96.0);
        assert_eq!(b.velocity(), Vec2::new(20.0, 20.0));
        assert_eq!(b.rotation_delta(), 0.0);
        assert_eq!(b.position(), Vec2::new(100.0 - 96.0, 150.0 - 96.0));
    }

    #[test]
    fn test_still_never_moves() {
        let mut rng = Pcg32::seed_from_u64(2);
        let b = Bubble::spawn(1, Vec2::new(300.0, 300.0), SpeedMode::Still, 64.0, &mut rng);
        let start = b.position();
        let q = queue();
        for _ in 0..100 {
            assert!(matches!(
                b.tick(Bounds::new(800.0, 600.0), &q),
                TickOutcome::Moved(_)
            ));
        }
        assert_eq!(b.position(), start);
        assert_eq!(b.snapshot().rotation, 0.0);
        assert!(q.lock().unwrap().is_empty());
    }

    #[test]
    fn test_tick_moves_and_spins() {
        let b = Bubble::new(4, Vec2::new(10.0, 10.0), Vec2::new(2.0, -1.0), 64.0, 3.0);
        let q = queue();
        match b.tick(Bounds::new(800.0, 600.0), &q) {
            TickOutcome::Moved(sprite) => {
                assert_eq!(sprite.id, 4);
                assert_eq!(sprite.pos, Vec2::new(12.0, 9.0));
                assert_eq!(sprite.rotation, 3.0);
                assert_eq!(sprite.size, 64.0);
            }
            other => panic!("expected Moved, got {other:?}"),
        }
    }

    #[test]
    fn test_out_of_view_requests_one_removal() {
        let b = Bubble::new(7, Vec2::new(790.0, 100.0), Vec2::new(20.0, 0.0), 20.0, 0.0);
        let bounds = Bounds::new(800.0, 600.0);
        let q = queue();

        // 810 is inside 800 + r (10)
        assert!(matches!(b.tick(bounds, &q), TickOutcome::Moved(_)));
        assert_eq!(b.tick(bounds, &q), TickOutcome::OutOfView);
        // Late ticks after cancellation do nothing
        assert_eq!(b.tick(bounds, &q), TickOutcome::Cancelled);
        assert_eq!(b.tick(bounds, &q), TickOutcome::Cancelled);

        assert_eq!(*q.lock().unwrap(), vec![(7, false)]);
        assert_eq!(b.position(), Vec2::new(830.0, 100.0));
    }

    #[test]
    fn test_unknown_bounds_never_out_of_view() {
        let b = Bubble::new(1, Vec2::ZERO, Vec2::new(-500.0, 500.0), 64.0, 0.0);
        let q = queue();
        for _ in 0..10 {
            assert!(matches!(b.tick(Bounds::UNKNOWN, &q), TickOutcome::Moved(_)));
        }
        assert!(q.lock().unwrap().is_empty());
    }

    #[test]
    fn test_request_removal_is_idempotent() {
        let b = Bubble::new(3, Vec2::ZERO, Vec2::ZERO, 64.0, 0.0);
        let q = queue();
        assert!(b.request_removal(true, &q));
        assert!(!b.request_removal(true, &q));
        assert!(!b.request_removal(false, &q));
        assert_eq!(*q.lock().unwrap(), vec![(3, true)]);
        assert!(b.is_removal_requested());
    }

    #[test]
    fn test_deflect_converts_to_per_tick() {
        let b = Bubble::new(1, Vec2::ZERO, Vec2::new(3.0, 3.0), 64.0, 1.0);
        b.deflect(40.0, 80.0, 40.0);
        assert_eq!(b.velocity(), Vec2::new(1.0, 2.0));
    }

    #[test]
    fn test_anchored_hit_box_is_not_centered() {
        // Drawn square spans (100..164, 100..164)
        let b = Bubble::new(1, Vec2::new(100.0, 100.0), Vec2::ZERO, 64.0, 0.0);
        assert!(b.hit_test(100.0, 100.0, HitBox::Anchored));
        // Up-left of the drawn bubble still hits
        assert!(b.hit_test(40.0, 40.0, HitBox::Anchored));
        assert!(b.hit_test(164.0, 164.0, HitBox::Anchored));
        assert!(!b.hit_test(165.0, 100.0, HitBox::Anchored));
        assert!(!b.hit_test(100.0, 35.0, HitBox::Anchored));
    }

    #[test]
    fn test_centered_hit_box() {
        let b = Bubble::new(1, Vec2::new(100.0, 100.0), Vec2::ZERO, 64.0, 0.0);
        assert!(b.hit_test(132.0, 132.0, HitBox::Centered));
        assert!(b.hit_test(164.0, 132.0, HitBox::Centered));
        // Corner of the square is outside the circle
        assert!(!b.hit_test(101.0, 101.0, HitBox::Centered));
        assert!(!b.hit_test(40.0, 40.0, HitBox::Centered));
    }

    proptest! {
        #[test]
        fn prop_random_spawn_ranges(seed in any::<u64>(), x in -500.0f32..2000.0, y in -500.0f32..2000.0) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let b = Bubble::spawn(1, Vec2::new(x, y), SpeedMode::Random, 64.0, &mut rng);

            prop_assert!([64.0, 128.0, 192.0].contains(&b.visual_size()));
            prop_assert_eq!(b.radius(), b.visual_size() / 2.0);
            let v = b.velocity();
            prop_assert!((-3.0..=3.0).contains(&v.x) && v.x.fract() == 0.0);
            prop_assert!((-3.0..=3.0).contains(&v.y) && v.y.fract() == 0.0);
            prop_assert!((1.0..=3.0).contains(&b.rotation_delta()));
            prop_assert_eq!(b.position(), Vec2::new(x, y) - Vec2::splat(b.radius()));
        }

        #[test]
        fn prop_out_of_view_iff_outside_margin(
            x in -200.0f32..1000.0,
            y in -200.0f32..800.0,
            vx in -50.0f32..50.0,
            vy in -50.0f32..50.0,
        ) {
            let b = Bubble::new(9, Vec2::new(x, y), Vec2::new(vx, vy), 64.0, 1.0);
            let bounds = Bounds::new(800.0, 600.0);
            let q = queue();
            let outcome = b.tick(bounds, &q);
            let pos = b.position();
            let outside = pos.x < -32.0 || pos.x > 832.0 || pos.y < -32.0 || pos.y > 632.0;

            if outside {
                prop_assert_eq!(outcome, TickOutcome::OutOfView);
                prop_assert_eq!(q.lock().unwrap().clone(), vec![(9, false)]);
            } else {
                prop_assert!(matches!(outcome, TickOutcome::Moved(_)), "expected Moved");
                prop_assert!(q.lock().unwrap().is_empty());
            }
        }
    }
}
