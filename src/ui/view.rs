use crate::lookup::definition::Definition;
use crate::session::presenter::Presenter;

pub const MASK_CHAR: char = '•';

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResultsTable {
    pub correct: Vec<String>,
    pub incorrect: Vec<String>,
}

/// What the practice and results screens draw. Only the session controller
/// writes to it, through `Presenter`.
#[derive(Clone, Debug, Default)]
pub struct PracticeView {
    pub panel_visible: bool,
    pub word: Option<String>,
    pub masked: bool,
    /// `None` while the lookup for the current word is outstanding.
    pub definition: Option<Definition>,
    pub controls_enabled: bool,
    pub results: Option<ResultsTable>,
}

impl PracticeView {
    /// The word as it should appear on screen.
    pub fn display_word(&self) -> Option<String> {
        let word = self.word.as_ref()?;
        if self.masked {
            Some(word.chars().map(|_| MASK_CHAR).collect())
        } else {
            Some(word.clone())
        }
    }
}

impl Presenter for PracticeView {
    fn show_practice_panel(&mut self) {
        self.panel_visible = true;
        self.results = None;
    }

    fn hide_practice_panel(&mut self) {
        self.panel_visible = false;
        self.word = None;
        self.definition = None;
    }

    fn render_current_word(&mut self, masked: bool, text: &str) {
        self.word = Some(text.to_string());
        self.masked = masked;
    }

    fn render_definition(&mut self, definition: &Definition) {
        self.definition = Some(definition.clone());
    }

    fn clear_definition(&mut self) {
        self.definition = None;
    }

    fn set_controls_enabled(&mut self, enabled: bool) {
        self.controls_enabled = enabled;
    }

    fn render_results(&mut self, correct_words: &[&str], incorrect_words: &[&str]) {
        self.results = Some(ResultsTable {
            correct: correct_words.iter().map(|w| w.to_string()).collect(),
            incorrect: incorrect_words.iter().map(|w| w.to_string()).collect(),
        });
    }
}
