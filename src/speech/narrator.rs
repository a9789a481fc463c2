use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Sender};
use std::thread;

use tracing::{debug, trace, warn};

use crate::speech::engine::SpeechEngine;
use crate::speech::{Narrator, SPEECH_RATE, SpeechError, Voice};

struct Utterance {
    text: String,
    voice: Option<String>,
}

/// Speaks through a host speech command. Utterances are queued on a single
/// worker thread and spoken in the order they were issued.
pub struct CommandNarrator {
    engine: SpeechEngine,
    tx: Sender<Utterance>,
}

impl CommandNarrator {
    pub fn spawn(engine: SpeechEngine) -> Self {
        let (tx, rx) = mpsc::channel::<Utterance>();
        thread::spawn(move || {
            for utterance in rx {
                if let Err(err) = run(engine, &utterance) {
                    warn!(%err, text = %utterance.text, "speech failed");
                }
            }
        });
        Self { engine, tx }
    }

    pub fn engine(&self) -> SpeechEngine {
        self.engine
    }
}

impl Narrator for CommandNarrator {
    fn speak(&self, text: &str, voice: Option<&Voice>) {
        let utterance = Utterance {
            text: text.to_string(),
            voice: voice.map(|v| v.handle.clone()),
        };
        if self.tx.send(utterance).is_err() {
            warn!(text, "speech worker stopped, utterance dropped");
        }
    }
}

fn run(engine: SpeechEngine, utterance: &Utterance) -> Result<(), SpeechError> {
    let args = engine.speak_args(&utterance.text, utterance.voice.as_deref(), SPEECH_RATE);
    trace!(engine = engine.binary(), ?args, "speaking");
    let status = Command::new(engine.binary())
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|source| SpeechError::Spawn {
            engine: engine.binary(),
            source,
        })?;
    if status.success() {
        Ok(())
    } else {
        Err(SpeechError::Exit {
            engine: engine.binary(),
            status,
        })
    }
}

/// Stand-in when no speech engine is available.
pub struct SilentNarrator;

impl Narrator for SilentNarrator {
    fn speak(&self, text: &str, _voice: Option<&Voice>) {
        debug!(text, "no speech engine, skipping utterance");
    }
}

pub fn for_engine(engine: Option<SpeechEngine>) -> Box<dyn Narrator> {
    match engine {
        Some(engine) => Box::new(CommandNarrator::spawn(engine)),
        None => Box::new(SilentNarrator),
    }
}
