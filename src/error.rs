//! Engine error types
//!
//! The simulation itself never fails: duplicate removals and late ticks are
//! no-ops. Errors only come from the outer surfaces: engine threads and the
//! settings file.

use std::fmt;
use std::io;
use std::path::PathBuf;

#[derive(Debug)]
pub enum EngineError {
    /// The interaction thread has shut down and no longer accepts commands.
    Stopped,

    /// An engine thread could not be started.
    Spawn(io::Error),

    /// Settings file could not be read or written.
    SettingsIo {
        path: PathBuf,
        source: io::Error,
    },

    /// Settings file is not valid settings JSON.
    SettingsParse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Stopped => write!(f, "engine is stopped"),
            EngineError::Spawn(e) => write!(f, "failed to start engine thread: {}", e),
            EngineError::SettingsIo { path, source } => {
                write!(f, "settings file '{}': {}", path.display(), source)
            }
            EngineError::SettingsParse { path, source } => {
                write!(f, "invalid settings in '{}': {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Stopped => None,
            EngineError::Spawn(e) => Some(e),
            EngineError::SettingsIo { source, .. } => Some(source),
            EngineError::SettingsParse { source, .. } => Some(source),
        }
    }
}
