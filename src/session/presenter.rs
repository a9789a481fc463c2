use crate::lookup::definition::Definition;

/// Display commands the session controller issues. The TUI implements this
/// by updating the state it renders from.
pub trait Presenter {
    fn show_practice_panel(&mut self);
    fn hide_practice_panel(&mut self);
    fn render_current_word(&mut self, masked: bool, text: &str);
    fn render_definition(&mut self, definition: &Definition);
    /// Blank the definition panel while a new lookup is outstanding.
    fn clear_definition(&mut self);
    fn set_controls_enabled(&mut self, enabled: bool);
    fn render_results(&mut self, correct_words: &[&str], incorrect_words: &[&str]);
}
