use std::process::{Command, Stdio};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use tracing::{debug, trace, warn};

use crate::speech::engine::SpeechEngine;
use crate::speech::{SpeechError, Voice};

/// The result of one voice enumeration. Later lists replace earlier ones.
#[derive(Clone, Debug, Default)]
pub struct VoiceList {
    pub voices: Vec<Voice>,
}

impl VoiceList {
    /// `(display name, handle)` pairs in engine order.
    pub fn entries(&self) -> Vec<(String, &str)> {
        self.voices
            .iter()
            .map(|v| (v.display_name(), v.handle.as_str()))
            .collect()
    }

    pub fn position(&self, handle: &str) -> Option<usize> {
        self.voices.iter().position(|v| v.handle == handle)
    }
}

/// `en_US`, `en-us` and `EN-US` all compare equal.
pub fn same_locale(a: &str, b: &str) -> bool {
    let norm = |s: &str| s.trim().replace('_', "-").to_ascii_lowercase();
    norm(a) == norm(b)
}

pub fn filter_locale(voices: Vec<Voice>, locale: &str) -> Vec<Voice> {
    voices
        .into_iter()
        .filter(|v| same_locale(&v.locale, locale))
        .collect()
}

/// Ask the engine for its voices and keep those in `locale`.
pub fn enumerate(engine: SpeechEngine, locale: &str) -> Result<VoiceList, SpeechError> {
    let output = Command::new(engine.binary())
        .args(engine.list_voices_args())
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .map_err(|source| SpeechError::Spawn {
            engine: engine.binary(),
            source,
        })?;
    if !output.status.success() {
        return Err(SpeechError::Exit {
            engine: engine.binary(),
            status: output.status,
        });
    }
    let text = String::from_utf8_lossy(&output.stdout);
    let voices = filter_locale(engine.parse_voices(&text), locale);
    debug!(engine = engine.binary(), locale, count = voices.len(), "voices enumerated");
    Ok(VoiceList { voices })
}

/// Enumerate on a background thread and post the list to `tx`. An engine
/// failure posts an empty list so listeners still get their ready signal.
pub fn spawn_enumeration<T>(
    engine: Option<SpeechEngine>,
    locale: String,
    tx: Sender<T>,
) -> JoinHandle<()>
where
    T: From<VoiceList> + Send + 'static,
{
    thread::spawn(move || {
        let list = match engine {
            Some(engine) => enumerate(engine, &locale).unwrap_or_else(|err| {
                warn!(%err, "voice enumeration failed");
                VoiceList::default()
            }),
            None => VoiceList::default(),
        };
        if tx.send(list.into()).is_err() {
            trace!("voice listener gone, list dropped");
        }
    })
}

/// espeak / espeak-ng `--voices`:
/// `Pty Language Age/Gender VoiceName File Other Languages`
pub fn parse_espeak(output: &str) -> Vec<Voice> {
    output
        .lines()
        .filter(|line| !line.trim_start().starts_with("Pty"))
        .filter_map(|line| {
            let cols: Vec<&str> = line.split_whitespace().collect();
            if cols.len() < 5 {
                return None;
            }
            let file = cols[4];
            let handle = file.rsplit('/').next().unwrap_or(file);
            Some(Voice {
                name: cols[3].replace('_', " "),
                locale: cols[1].to_string(),
                handle: handle.to_string(),
            })
        })
        .collect()
}

/// macOS `say -v ?`: `Name With Spaces    en_US    # sample sentence`
pub fn parse_say(output: &str) -> Vec<Voice> {
    output
        .lines()
        .filter_map(|line| {
            let head = line.split_once('#').map_or(line, |(head, _)| head).trim_end();
            let (name, locale) = head.rsplit_once(char::is_whitespace)?;
            let name = name.trim();
            if name.is_empty() || locale.is_empty() {
                return None;
            }
            Some(Voice {
                name: name.to_string(),
                locale: locale.to_string(),
                handle: name.to_string(),
            })
        })
        .collect()
}

/// speech-dispatcher `spd-say -L`: `NAME LANGUAGE VARIANT`
pub fn parse_spd_say(output: &str) -> Vec<Voice> {
    output
        .lines()
        .filter_map(|line| {
            let cols: Vec<&str> = line.split_whitespace().collect();
            if cols.len() < 2 || cols[0] == "NAME" {
                return None;
            }
            Some(Voice {
                name: cols[0].to_string(),
                locale: cols[1].to_string(),
                handle: cols[0].to_string(),
            })
        })
        .collect()
}
