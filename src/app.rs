use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, info, warn};

use crate::config::{Config, SPEECH_ENGINE_KEYS};
use crate::event::AppEvent;
use crate::lookup::fetch::{DictionaryClient, OfflineLookup};
use crate::lookup::{DefinitionLookup, LookupReply, ThreadedLookup};
use crate::session::controller::{Ports, SessionController, SessionError, SessionState};
use crate::speech::engine::SpeechEngine;
use crate::speech::narrator;
use crate::speech::voices::{self, VoiceList};
use crate::speech::{Narrator, Voice};
use crate::ui::components::menu::Menu;
use crate::ui::theme::Theme;
use crate::ui::view::PracticeView;
use crate::words::bank::{WordBank, clamp_word_count};

const MAX_COUNT_DIGITS: usize = 4;
pub const SETTINGS_FIELDS: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Menu,
    Practice,
    Results,
    Settings,
}

pub struct App {
    pub screen: AppScreen,
    pub config: Config,
    pub theme: &'static Theme,
    pub menu: Menu<'static>,
    pub bank: WordBank,
    pub session: SessionController,
    pub view: PracticeView,
    pub voices: VoiceList,
    pub voices_loaded: bool,
    /// Raw text of the word-count field on the menu.
    pub count_input: String,
    pub settings_selected: usize,
    pub should_quit: bool,
    engine: Option<SpeechEngine>,
    narrator: Box<dyn Narrator>,
    lookups: ThreadedLookup<AppEvent>,
    events: Sender<AppEvent>,
    rng: SmallRng,
}

impl App {
    pub fn new(config: Config, bank: WordBank, events: Sender<AppEvent>) -> Self {
        let loaded_theme = Theme::load(&config.theme).unwrap_or_default();
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));
        let menu = Menu::new(theme);

        let engine = SpeechEngine::resolve(&config.speech_engine);
        let narrator = narrator::for_engine(engine);
        let lookups = ThreadedLookup::new(lookup_source(&config), events.clone());
        let count_input = config.word_count.min(bank.len()).to_string();

        let app = Self {
            screen: AppScreen::Menu,
            config,
            theme,
            menu,
            bank,
            session: SessionController::new(),
            view: PracticeView::default(),
            voices: VoiceList::default(),
            voices_loaded: false,
            count_input,
            settings_selected: 0,
            should_quit: false,
            engine,
            narrator,
            lookups,
            events,
            rng: SmallRng::from_entropy(),
        };
        app.refresh_voices();
        app
    }

    pub fn engine_name(&self) -> &'static str {
        self.engine.map_or("none", SpeechEngine::binary)
    }

    pub fn requested_count(&self) -> usize {
        clamp_word_count(&self.count_input, self.bank.len())
    }

    pub fn start_session(&mut self) {
        let count = self.requested_count();
        self.count_input = count.to_string();
        self.config.word_count = count;
        let set = self.bank.sample(count, &mut self.rng);

        let voice = selected_voice(&self.voices, self.config.voice.as_deref());
        let mut ports = Ports {
            presenter: &mut self.view,
            narrator: self.narrator.as_ref(),
            lookups: &self.lookups,
            voice,
        };
        match self.session.start(set, &mut ports) {
            Ok(()) => {
                self.screen = match self.session.state() {
                    SessionState::Presenting => AppScreen::Practice,
                    _ => AppScreen::Results,
                };
            }
            Err(err) => debug!(%err, "start ignored"),
        }
    }

    pub fn judge(&mut self, correct: bool) {
        let voice = selected_voice(&self.voices, self.config.voice.as_deref());
        let mut ports = Ports {
            presenter: &mut self.view,
            narrator: self.narrator.as_ref(),
            lookups: &self.lookups,
            voice,
        };
        log_rejected(self.session.judge(correct, &mut ports).map(|_| ()), "judge");
        if self.session.state() == SessionState::Finished {
            self.screen = AppScreen::Results;
        }
    }

    pub fn repeat(&mut self) {
        let voice = selected_voice(&self.voices, self.config.voice.as_deref());
        let mut ports = Ports {
            presenter: &mut self.view,
            narrator: self.narrator.as_ref(),
            lookups: &self.lookups,
            voice,
        };
        log_rejected(self.session.repeat(&mut ports), "repeat");
    }

    pub fn reveal(&mut self) {
        let voice = selected_voice(&self.voices, self.config.voice.as_deref());
        let mut ports = Ports {
            presenter: &mut self.view,
            narrator: self.narrator.as_ref(),
            lookups: &self.lookups,
            voice,
        };
        log_rejected(self.session.reveal(&mut ports), "reveal");
    }

    pub fn abandon_session(&mut self) {
        self.session.abandon(&mut self.view);
        self.go_to_menu();
    }

    pub fn on_definition(&mut self, reply: LookupReply) {
        self.session.apply_definition(&reply, &mut self.view);
    }

    /// Each enumeration replaces the previous list.
    pub fn on_voices(&mut self, list: VoiceList) {
        info!(count = list.voices.len(), "voices ready");
        if let Some(handle) = self.config.voice.as_deref() {
            if list.position(handle).is_none() && !list.voices.is_empty() {
                warn!(handle, "configured voice not offered by engine, using default");
            }
        }
        self.voices = list;
        self.voices_loaded = true;
    }

    pub fn refresh_voices(&self) {
        voices::spawn_enumeration(self.engine, self.config.locale.clone(), self.events.clone());
    }

    pub fn go_to_menu(&mut self) {
        self.screen = AppScreen::Menu;
    }

    pub fn go_to_settings(&mut self) {
        self.settings_selected = 0;
        self.screen = AppScreen::Settings;
    }

    pub fn leave_settings(&mut self) {
        self.config.validate();
        if let Err(err) = self.config.save() {
            warn!(%err, "failed to save config");
        }
        self.go_to_menu();
    }

    pub fn count_push_digit(&mut self, digit: char) {
        if !digit.is_ascii_digit() {
            return;
        }
        if self.count_input == "0" {
            self.count_input.clear();
        }
        if self.count_input.len() < MAX_COUNT_DIGITS {
            self.count_input.push(digit);
        }
    }

    pub fn count_backspace(&mut self) {
        self.count_input.pop();
    }

    pub fn count_adjust(&mut self, delta: i64) {
        let current = self.requested_count() as i64;
        let next = (current + delta).clamp(0, self.bank.len() as i64);
        self.count_input = next.to_string();
    }

    pub fn selected_voice(&self) -> Option<&Voice> {
        selected_voice(&self.voices, self.config.voice.as_deref())
    }

    pub fn settings_cycle_forward(&mut self) {
        self.settings_cycle(true);
    }

    pub fn settings_cycle_backward(&mut self) {
        self.settings_cycle(false);
    }

    fn settings_cycle(&mut self, forward: bool) {
        match self.settings_selected {
            0 => {
                // Slot 0 is the engine default, then each enumerated voice
                let slots = self.voices.voices.len() + 1;
                let current = self
                    .config
                    .voice
                    .as_deref()
                    .and_then(|h| self.voices.position(h))
                    .map_or(0, |i| i + 1);
                let next = cycle_index(current, slots, forward);
                self.config.voice = match next {
                    0 => None,
                    i => Some(self.voices.voices[i - 1].handle.clone()),
                };
                if let Some(voice) = self.selected_voice() {
                    self.narrator.speak(&voice.name, Some(voice));
                }
            }
            1 => {
                let themes = Theme::available_themes();
                if themes.is_empty() {
                    return;
                }
                let current = themes
                    .iter()
                    .position(|t| *t == self.config.theme)
                    .unwrap_or(0);
                let next = cycle_index(current, themes.len(), forward);
                self.config.theme = themes[next].clone();
                if let Some(theme) = Theme::load(&self.config.theme) {
                    let theme: &'static Theme = Box::leak(Box::new(theme));
                    self.theme = theme;
                    self.menu.theme = theme;
                }
            }
            2 => {
                let current = SPEECH_ENGINE_KEYS
                    .iter()
                    .position(|k| *k == self.config.speech_engine)
                    .unwrap_or(0);
                let next = cycle_index(current, SPEECH_ENGINE_KEYS.len(), forward);
                self.set_speech_engine(SPEECH_ENGINE_KEYS[next]);
            }
            3 => {
                self.config.lookups_enabled = !self.config.lookups_enabled;
                self.lookups = ThreadedLookup::new(lookup_source(&self.config), self.events.clone());
            }
            _ => {}
        }
    }

    fn set_speech_engine(&mut self, key: &str) {
        self.config.speech_engine = key.to_string();
        self.engine = SpeechEngine::resolve(key);
        self.narrator = narrator::for_engine(self.engine);
        self.config.voice = None;
        self.voices = VoiceList::default();
        self.voices_loaded = false;
        self.refresh_voices();
    }
}

fn selected_voice<'a>(voices: &'a VoiceList, handle: Option<&str>) -> Option<&'a Voice> {
    let handle = handle?;
    voices.voices.iter().find(|v| v.handle == handle)
}

fn lookup_source(config: &Config) -> Arc<dyn DefinitionLookup> {
    if !config.lookups_enabled {
        return Arc::new(OfflineLookup);
    }
    let timeout = Duration::from_secs(config.lookup_timeout_secs);
    match DictionaryClient::new(&config.dictionary_url, timeout) {
        Ok(client) => Arc::new(client),
        Err(err) => {
            warn!(%err, "dictionary client unavailable, definitions disabled");
            Arc::new(OfflineLookup)
        }
    }
}

fn log_rejected(result: Result<(), SessionError>, command: &str) {
    if let Err(err) = result {
        debug!(command, %err, "command ignored");
    }
}

fn cycle_index(current: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if forward {
        (current + 1) % len
    } else if current == 0 {
        len - 1
    } else {
        current - 1
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;

    fn test_app(words: &[&str]) -> (App, mpsc::Receiver<AppEvent>) {
        let (tx, rx) = mpsc::channel();
        let mut config = Config::default();
        config.speech_engine = "none".to_string();
        config.lookups_enabled = false;
        let bank = WordBank::from_words(words.iter().map(|w| w.to_string()).collect());
        (App::new(config, bank, tx), rx)
    }

    #[test]
    fn cycle_index_wraps_both_ways() {
        assert_eq!(cycle_index(0, 3, true), 1);
        assert_eq!(cycle_index(2, 3, true), 0);
        assert_eq!(cycle_index(0, 3, false), 2);
        assert_eq!(cycle_index(0, 0, true), 0);
    }

    #[test]
    fn count_input_is_clamped_to_bank() {
        let (mut app, _rx) = test_app(&["a", "b", "c"]);
        app.count_input = "99".to_string();
        assert_eq!(app.requested_count(), 3);
        app.count_input = "-1".to_string();
        assert_eq!(app.requested_count(), 0);
        app.count_adjust(5);
        assert_eq!(app.count_input, "3");
        app.count_adjust(-10);
        assert_eq!(app.count_input, "0");
    }

    #[test]
    fn digit_entry_replaces_leading_zero() {
        let (mut app, _rx) = test_app(&["a"]);
        app.count_input = "0".to_string();
        app.count_push_digit('7');
        app.count_push_digit('x');
        assert_eq!(app.count_input, "7");
        for _ in 0..6 {
            app.count_push_digit('1');
        }
        assert_eq!(app.count_input.len(), MAX_COUNT_DIGITS);
        app.count_backspace();
        assert_eq!(app.count_input.len(), MAX_COUNT_DIGITS - 1);
    }

    #[test]
    fn full_session_through_app() {
        let (mut app, rx) = test_app(&["siege", "weird"]);
        app.count_input = "2".to_string();
        app.start_session();
        assert_eq!(app.screen, AppScreen::Practice);
        assert!(app.view.masked);

        app.reveal();
        assert!(!app.view.masked);
        app.judge(true);
        app.judge(false);

        assert_eq!(app.screen, AppScreen::Results);
        let table = app.view.results.clone().unwrap();
        assert_eq!(table.correct.len(), 1);
        assert_eq!(table.incorrect.len(), 1);

        // Late replies for either word must not touch the results view
        let mut replies = 0;
        while let Ok(event) = rx.recv_timeout(Duration::from_secs(2)) {
            if let AppEvent::Definition(reply) = event {
                app.on_definition(reply);
                replies += 1;
                if replies == 2 {
                    break;
                }
            }
        }
        assert!(app.view.definition.is_none());
    }

    #[test]
    fn zero_words_goes_straight_to_results() {
        let (mut app, _rx) = test_app(&["only"]);
        app.count_input = "0".to_string();
        app.start_session();
        assert_eq!(app.screen, AppScreen::Results);
        assert_eq!(app.session.result().unwrap().total(), 0);
    }

    #[test]
    fn voice_cycle_includes_default_slot() {
        let (mut app, _rx) = test_app(&["a"]);
        app.on_voices(VoiceList {
            voices: vec![Voice {
                name: "Alex".to_string(),
                locale: "en_US".to_string(),
                handle: "Alex".to_string(),
            }],
        });
        app.settings_selected = 0;
        app.settings_cycle_forward();
        assert_eq!(app.config.voice.as_deref(), Some("Alex"));
        assert!(app.selected_voice().is_some());
        app.settings_cycle_forward();
        assert!(app.config.voice.is_none());
    }
}
