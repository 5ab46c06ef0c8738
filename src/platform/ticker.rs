//! Central ticker
//!
//! One thread ticks every live bubble once per period, working from the last
//! snapshot the interaction thread published.

use std::sync::PoisonError;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use super::{Command, FrameGate, InteractionQueue, SharedView};
use crate::sim;

pub(crate) fn run(
    view: SharedView,
    queue: InteractionQueue,
    gate: FrameGate,
    period: Duration,
    stop: Receiver<()>,
) {
    log::info!("Ticker running every {:?}", period);
    let mut ticks: u64 = 0;
    loop {
        match stop.recv_timeout(period) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }

        let snapshot = view.lock().unwrap_or_else(PoisonError::into_inner).clone();
        if snapshot.bubbles.is_empty() {
            continue;
        }

        ticks += 1;
        let sprites = sim::tick(&snapshot, &queue);
        log::trace!("Tick {}: {} of {} bubbles moved", ticks, sprites.len(), snapshot.bubbles.len());
        if !gate.try_claim() {
            log::trace!("Tick {}: previous frame still pending", ticks);
            continue;
        }
        if queue.send(Command::Frame(sprites)).is_err() {
            break;
        }
    }
    log::info!("Ticker stopped after {} ticks", ticks);
}
