use std::env;
use std::path::Path;

use tracing::{info, warn};

use crate::speech::Voice;
use crate::speech::voices;

/// Words per minute the espeak family and `say` use at normal speed.
const BASE_WPM: f32 = 175.0;

/// Host command-line speech engines, in auto-detection order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpeechEngine {
    EspeakNg,
    Espeak,
    Say,
    SpdSay,
}

impl SpeechEngine {
    pub const ALL: [SpeechEngine; 4] = [
        SpeechEngine::EspeakNg,
        SpeechEngine::Espeak,
        SpeechEngine::Say,
        SpeechEngine::SpdSay,
    ];

    pub fn binary(self) -> &'static str {
        match self {
            SpeechEngine::EspeakNg => "espeak-ng",
            SpeechEngine::Espeak => "espeak",
            SpeechEngine::Say => "say",
            SpeechEngine::SpdSay => "spd-say",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.binary() == key)
    }

    /// Resolve a config setting: `auto`, `none`, or an engine binary name.
    pub fn resolve(setting: &str) -> Option<Self> {
        match setting {
            "none" => None,
            "auto" => {
                let found = Self::ALL.into_iter().find(|e| on_path(e.binary()));
                match found {
                    Some(engine) => info!(engine = engine.binary(), "speech engine detected"),
                    None => warn!("no speech engine found on PATH, speaking disabled"),
                }
                found
            }
            key => match Self::from_key(key) {
                Some(engine) if on_path(engine.binary()) => Some(engine),
                Some(engine) => {
                    warn!(engine = engine.binary(), "configured speech engine not on PATH");
                    None
                }
                None => {
                    warn!(setting = key, "unknown speech engine");
                    None
                }
            },
        }
    }

    pub fn speak_args(self, text: &str, voice: Option<&str>, rate: f32) -> Vec<String> {
        let mut args = Vec::new();
        match self {
            SpeechEngine::EspeakNg | SpeechEngine::Espeak | SpeechEngine::Say => {
                let flag = if self == SpeechEngine::Say { "-r" } else { "-s" };
                args.push(flag.to_string());
                args.push(format!("{}", (BASE_WPM * rate).round() as u32));
                if let Some(voice) = voice {
                    args.push("-v".to_string());
                    args.push(voice.to_string());
                }
            }
            SpeechEngine::SpdSay => {
                // spd-say rates run -100..=100 around 0; -w blocks until spoken
                let relative = ((rate - 1.0) * 100.0).round().clamp(-100.0, 100.0) as i32;
                args.push("-w".to_string());
                args.push("-r".to_string());
                args.push(relative.to_string());
                if let Some(voice) = voice {
                    args.push("-y".to_string());
                    args.push(voice.to_string());
                }
            }
        }
        args.push(text.to_string());
        args
    }

    pub fn list_voices_args(self) -> &'static [&'static str] {
        match self {
            SpeechEngine::EspeakNg | SpeechEngine::Espeak => &["--voices"],
            SpeechEngine::Say => &["-v", "?"],
            SpeechEngine::SpdSay => &["-L"],
        }
    }

    pub fn parse_voices(self, output: &str) -> Vec<Voice> {
        match self {
            SpeechEngine::EspeakNg | SpeechEngine::Espeak => voices::parse_espeak(output),
            SpeechEngine::Say => voices::parse_say(output),
            SpeechEngine::SpdSay => voices::parse_spd_say(output),
        }
    }
}

fn on_path(binary: &str) -> bool {
    let Some(paths) = env::var_os("PATH") else {
        return false;
    };
    env::split_paths(&paths).any(|dir| is_executable(&dir.join(binary)))
}

#[cfg(windows)]
fn is_executable(path: &Path) -> bool {
    path.with_extension("exe").is_file() || path.is_file()
}

#[cfg(not(windows))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
