//! Pop sound requests
//!
//! Playback itself belongs to the host (sound pool, audio device). The engine
//! only decides when to play and how loud.

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// A bubble was popped by a tap
    Pop,
}

/// Host-side playback. Fire-and-forget.
pub trait SoundSink: Send {
    fn play(&self, effect: SoundEffect, volume: f32);
}

/// Sink that only logs, for headless runs
#[derive(Debug, Default)]
pub struct LogSound;

impl SoundSink for LogSound {
    fn play(&self, effect: SoundEffect, volume: f32) {
        log::info!("Play {:?} at volume {:.2}", effect, volume);
    }
}

/// Audio manager for the engine
pub struct AudioManager {
    sink: Box<dyn SoundSink>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl AudioManager {
    pub fn new(sink: Box<dyn SoundSink>) -> Self {
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect. Returns false if it was dropped (muted or silent).
    pub fn play(&self, effect: SoundEffect) -> bool {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            log::trace!("Dropped {:?}: volume is zero", effect);
            return false;
        }
        self.sink.play(effect, vol);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    type Played = Arc<Mutex<Vec<(SoundEffect, f32)>>>;

    struct Recorder(Played);

    impl SoundSink for Recorder {
        fn play(&self, effect: SoundEffect, volume: f32) {
            self.0.lock().unwrap().push((effect, volume));
        }
    }

    fn manager() -> (AudioManager, Played) {
        let played = Played::default();
        (AudioManager::new(Box::new(Recorder(played.clone()))), played)
    }

    #[test]
    fn test_volume_scales() {
        let (mut audio, played) = manager();
        audio.set_master_volume(0.5);
        audio.set_sfx_volume(0.5);
        assert!(audio.play(SoundEffect::Pop));
        assert_eq!(*played.lock().unwrap(), vec![(SoundEffect::Pop, 0.25)]);
    }

    #[test]
    fn test_muted_drops() {
        let (mut audio, played) = manager();
        audio.set_muted(true);
        assert!(!audio.play(SoundEffect::Pop));
        audio.set_muted(false);
        audio.set_master_volume(-3.0);
        assert!(!audio.play(SoundEffect::Pop));
        assert!(played.lock().unwrap().is_empty());
    }

    #[test]
    fn test_volume_clamped() {
        let (mut audio, _) = manager();
        audio.set_master_volume(4.0);
        audio.set_sfx_volume(2.0);
        assert_eq!(audio.effective_volume(), 1.0);
    }
}
