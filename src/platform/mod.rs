//! Engine runtime
//!
//! Two threads:
//! - Interaction: owns the field, applies input and removals, issues sound
//!   and redraw requests
//! - Ticker: advances all bubbles once per tick period
//!
//! They talk over one command channel, so every mutation of the live set is
//! serialized on the interaction thread.

mod interaction;
mod ticker;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::audio::{AudioManager, SoundSink};
use crate::error::EngineError;
use crate::renderer::RenderSink;
use crate::settings::{Settings, SpeedMode};
use crate::sim::{BubbleField, BubbleSprite, FieldView, RemovalQueue};

use interaction::Interaction;

/// Latest live-set snapshot, published by the interaction thread
pub(crate) type SharedView = Arc<Mutex<FieldView>>;

/// Messages handled by the interaction thread
pub(crate) enum Command {
    BoundsKnown { width: f32, height: f32 },
    Tap { x: f32, y: f32 },
    Fling { vx: f32, vy: f32 },
    SetSpeedMode(SpeedMode),
    Remove { id: u32, popped: bool },
    /// Sprites moved by one tick pass
    Frame(Vec<BubbleSprite>),
    Inspect(Sender<Vec<BubbleSprite>>),
    Shutdown,
}

/// Set while a tick frame is queued and not yet drawn.
///
/// The ticker keeps moving bubbles but sends no new frame until the
/// interaction thread has drawn the previous one, so a slow renderer never
/// backs up the command channel.
#[derive(Clone, Default)]
pub(crate) struct FrameGate(Arc<AtomicBool>);

impl FrameGate {
    /// True if the caller may send a frame; the gate is then closed
    fn try_claim(&self) -> bool {
        !self.0.swap(true, Ordering::AcqRel)
    }

    fn release(&self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Sending side of the interaction thread's channel
#[derive(Clone)]
pub(crate) struct InteractionQueue(Sender<Command>);

impl InteractionQueue {
    fn send(&self, cmd: Command) -> Result<(), EngineError> {
        self.0.send(cmd).map_err(|_| EngineError::Stopped)
    }
}

impl RemovalQueue for InteractionQueue {
    fn enqueue_removal(&self, id: u32, popped: bool) {
        if self.send(Command::Remove { id, popped }).is_err() {
            log::debug!("Engine stopped; dropping removal of bubble {}", id);
        }
    }
}

/// Cloneable input handle for the host
#[derive(Clone)]
pub struct EngineHandle {
    queue: InteractionQueue,
}

impl EngineHandle {
    /// Screen geometry is available (or changed)
    pub fn bounds_known(&self, width: f32, height: f32) -> Result<(), EngineError> {
        self.queue.send(Command::BoundsKnown { width, height })
    }

    /// Confirmed single tap
    pub fn tap(&self, x: f32, y: f32) -> Result<(), EngineError> {
        self.queue.send(Command::Tap { x, y })
    }

    /// Fling; velocity is divided by the tick period to get px/tick
    pub fn fling(&self, vx: f32, vy: f32) -> Result<(), EngineError> {
        self.queue.send(Command::Fling { vx, vy })
    }

    /// Mode for bubbles spawned from now on
    pub fn set_speed_mode(&self, mode: SpeedMode) -> Result<(), EngineError> {
        self.queue.send(Command::SetSpeedMode(mode))
    }

    /// Sprites of all live bubbles, in hit-test order
    pub fn live_bubbles(&self) -> Result<Vec<BubbleSprite>, EngineError> {
        let (tx, rx) = mpsc::channel();
        self.queue.send(Command::Inspect(tx))?;
        rx.recv().map_err(|_| EngineError::Stopped)
    }
}

/// Running engine. Stops both threads on `shutdown` or drop.
pub struct Engine {
    handle: EngineHandle,
    stop_ticker: Option<Sender<()>>,
    ticker: Option<JoinHandle<()>>,
    interaction: Option<JoinHandle<()>>,
}

impl Engine {
    pub fn start(
        settings: &Settings,
        render: Box<dyn RenderSink>,
        sound: Box<dyn SoundSink>,
    ) -> Result<Self, EngineError> {
        let (tx, rx) = mpsc::channel();
        let queue = InteractionQueue(tx);
        let field = BubbleField::new(settings);
        let view: SharedView = Arc::new(Mutex::new(field.view()));
        let gate = FrameGate::default();

        let mut audio = AudioManager::new(sound);
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_muted(settings.muted);

        let state = Interaction {
            field,
            view: Arc::clone(&view),
            queue: queue.clone(),
            gate: gate.clone(),
            render,
            audio,
        };
        let interaction = thread::Builder::new()
            .name("bubble-interaction".into())
            .spawn(move || state.run(rx))
            .map_err(EngineError::Spawn)?;

        let (stop_tx, stop_rx) = mpsc::channel();
        let period = Duration::from_millis(settings.tick_period_ms.max(1));
        let ticker_queue = queue.clone();
        let ticker = match thread::Builder::new()
            .name("bubble-ticker".into())
            .spawn(move || ticker::run(view, ticker_queue, gate, period, stop_rx))
        {
            Ok(handle) => handle,
            Err(e) => {
                let _ = queue.send(Command::Shutdown);
                let _ = interaction.join();
                return Err(EngineError::Spawn(e));
            }
        };

        log::info!("Engine started ({} mode)", settings.speed_mode.as_str());
        Ok(Self {
            handle: EngineHandle { queue },
            stop_ticker: Some(stop_tx),
            ticker: Some(ticker),
            interaction: Some(interaction),
        })
    }

    pub fn handle(&self) -> EngineHandle {
        self.handle.clone()
    }

    /// Stop the ticker, then the interaction thread
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        // Dropping the sender wakes the ticker
        self.stop_ticker.take();
        if let Some(ticker) = self.ticker.take() {
            if ticker.join().is_err() {
                log::error!("Ticker thread panicked");
            }
        }

        if let Some(interaction) = self.interaction.take() {
            let _ = self.handle.queue.send(Command::Shutdown);
            if interaction.join().is_err() {
                log::error!("Interaction thread panicked");
            }
            log::info!("Engine stopped");
        }
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.stop();
    }
}
