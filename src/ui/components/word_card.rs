use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::ui::theme::Theme;
use crate::ui::view::PracticeView;

/// The current word, masked until revealed.
pub struct WordCard<'a> {
    view: &'a PracticeView,
    theme: &'a Theme,
    inline_definition: bool,
}

impl<'a> WordCard<'a> {
    pub fn new(view: &'a PracticeView, theme: &'a Theme) -> Self {
        Self {
            view,
            theme,
            inline_definition: false,
        }
    }

    /// Narrow terminals have no room for a separate definition panel.
    pub fn inline_definition(mut self, inline: bool) -> Self {
        self.inline_definition = inline;
        self
    }
}

impl Widget for WordCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Spell it ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let (word, word_style, hint) = match self.view.display_word() {
            Some(word) if self.view.masked => (
                word,
                Style::default().fg(colors.word_masked()),
                "[↓] reveal",
            ),
            Some(word) => (
                word,
                Style::default()
                    .fg(colors.word())
                    .add_modifier(Modifier::BOLD),
                "",
            ),
            None => (String::new(), Style::default(), ""),
        };

        let top_pad = inner.height.saturating_sub(3) / 2;
        let mut lines: Vec<Line> = (0..top_pad).map(|_| Line::from("")).collect();
        lines.push(Line::from(Span::styled(spaced(&word), word_style)));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            hint,
            Style::default().fg(colors.text_pending()),
        )));

        if self.inline_definition {
            let text = match &self.view.definition {
                Some(def) => def.definition.clone(),
                None => "looking up…".to_string(),
            };
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                text,
                Style::default().fg(colors.fg()),
            )));
        }

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}

/// Letter-spaced so short words read clearly.
fn spaced(word: &str) -> String {
    word.chars()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
