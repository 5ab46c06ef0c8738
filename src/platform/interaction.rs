//! Interaction thread
//!
//! Owns the `BubbleField`. Input, removals, sound and redraw requests are all
//! applied here, one command at a time.

use std::collections::HashSet;
use std::sync::mpsc::Receiver;
use std::sync::{Mutex, PoisonError};

use super::{Command, FrameGate, InteractionQueue, SharedView};
use crate::audio::{AudioManager, SoundEffect};
use crate::renderer::RenderSink;
use crate::sim::{BubbleField, BubbleSprite, TapOutcome};

pub(crate) struct Interaction {
    pub field: BubbleField,
    pub view: SharedView,
    pub queue: InteractionQueue,
    pub gate: FrameGate,
    pub render: Box<dyn RenderSink>,
    pub audio: AudioManager,
}

impl Interaction {
    pub fn run(mut self, rx: Receiver<Command>) {
        log::info!("Interaction thread running");
        for cmd in rx.iter() {
            if !self.handle(cmd) {
                break;
            }
        }
        log::info!("Interaction thread stopped ({} bubbles left)", self.field.len());
    }

    /// Apply one command. Returns false on shutdown.
    fn handle(&mut self, cmd: Command) -> bool {
        match cmd {
            Command::BoundsKnown { width, height } => {
                self.field.on_bounds_known(width, height);
                self.publish();
            }
            Command::Tap { x, y } => {
                if let TapOutcome::Spawned(_) = self.field.on_single_tap(x, y, &self.queue) {
                    self.publish();
                    self.redraw_all();
                }
            }
            Command::Fling { vx, vy } => self.field.on_fling(vx, vy),
            Command::SetSpeedMode(mode) => self.field.set_speed_mode(mode),
            Command::Remove { id, popped } => self.remove(id, popped),
            Command::Frame(mut sprites) => {
                // Frames are built from a snapshot and may trail a removal
                let live: HashSet<u32> = self.field.bubbles().iter().map(|b| b.id()).collect();
                sprites.retain(|s| live.contains(&s.id));
                self.render.request_redraw(&sprites);
                self.gate.release();
            }
            Command::Inspect(reply) => {
                let _ = reply.send(self.field.sprites());
            }
            Command::Shutdown => return false,
        }
        true
    }

    fn remove(&mut self, id: u32, popped: bool) {
        if self.field.remove_bubble(id).is_none() {
            log::debug!("Bubble {} already removed", id);
            return;
        }
        log::debug!(
            "Removed bubble {} ({})",
            id,
            if popped { "popped" } else { "left view" }
        );
        self.publish();
        self.redraw_all();
        if popped {
            self.audio.play(SoundEffect::Pop);
        }
    }

    fn redraw_all(&mut self) {
        let sprites: Vec<BubbleSprite> = self.field.sprites();
        self.render.request_redraw(&sprites);
    }

    /// Hand the ticker a fresh snapshot of the live set
    fn publish(&self) {
        *lock(&self.view) = self.field.view();
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}
