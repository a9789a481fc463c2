use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::lookup::definition::Definition;
use crate::ui::theme::Theme;

pub struct DefinitionPanel<'a> {
    definition: Option<&'a Definition>,
    theme: &'a Theme,
}

impl<'a> DefinitionPanel<'a> {
    pub fn new(definition: Option<&'a Definition>, theme: &'a Theme) -> Self {
        Self { definition, theme }
    }
}

impl Widget for DefinitionPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Dictionary ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let label = Style::default()
            .fg(colors.accent())
            .add_modifier(Modifier::BOLD);
        let body = Style::default().fg(colors.fg());

        let lines = match self.definition {
            Some(def) => vec![
                Line::from(vec![
                    Span::styled("Definition: ", label),
                    Span::styled(def.definition.as_str(), body),
                ]),
                Line::from(""),
                Line::from(vec![
                    Span::styled("Sentence: ", label),
                    Span::styled(def.example.as_str(), body),
                ]),
            ],
            None => vec![Line::from(Span::styled(
                "Looking up…",
                Style::default().fg(colors.text_pending()),
            ))],
        };

        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}
