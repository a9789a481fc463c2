pub mod engine;
pub mod narrator;
pub mod voices;

use std::process::ExitStatus;

use thiserror::Error;

/// Speaking rate relative to the engine's normal speed.
pub const SPEECH_RATE: f32 = 0.8;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Voice {
    pub name: String,
    pub locale: String,
    /// Engine-specific identifier passed back when speaking.
    pub handle: String,
}

impl Voice {
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.name, self.locale)
    }
}

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("failed to start {engine}: {source}")]
    Spawn {
        engine: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("{engine} exited with {status}")]
    Exit {
        engine: &'static str,
        status: ExitStatus,
    },
}

/// Fire-and-forget text to speech. Implementations must never block the
/// caller on synthesis and must swallow engine failures.
pub trait Narrator {
    fn speak(&self, text: &str, voice: Option<&Voice>);
}
