use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::result::SessionResult;
use crate::ui::theme::Theme;
use crate::ui::view::ResultsTable;

/// End-of-session summary with the correct and incorrect word columns.
pub struct Dashboard<'a> {
    pub result: &'a SessionResult,
    pub table: &'a ResultsTable,
    pub theme: &'a Theme,
}

impl<'a> Dashboard<'a> {
    pub fn new(result: &'a SessionResult, table: &'a ResultsTable, theme: &'a Theme) -> Self {
        Self {
            result,
            table,
            theme,
        }
    }
}

impl Widget for Dashboard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Session Complete ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Min(3),
                Constraint::Length(2),
            ])
            .split(inner);

        let title = Paragraph::new(Line::from(Span::styled(
            "Results",
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center);
        title.render(layout[0], buf);

        let acc = self.result.accuracy();
        let score_color = if self.result.total() == 0 {
            colors.text_pending()
        } else if acc >= 90.0 {
            colors.success()
        } else if acc >= 70.0 {
            colors.warning()
        } else {
            colors.error()
        };
        let score_text = self.result.summary_utterance();
        let acc_text = if self.result.total() > 0 {
            format!("  ({acc:.0}%)")
        } else {
            String::new()
        };
        let score_line = Line::from(vec![
            Span::styled("  Score: ", Style::default().fg(colors.fg())),
            Span::styled(
                &*score_text,
                Style::default().fg(score_color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(&*acc_text, Style::default().fg(colors.text_pending())),
        ]);
        Paragraph::new(score_line).render(layout[1], buf);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(layout[2]);

        render_column("Correct", &self.table.correct, colors.success(), self.theme, columns[0], buf);
        render_column(
            "Incorrect",
            &self.table.incorrect,
            colors.error(),
            self.theme,
            columns[1],
            buf,
        );

        let help = Paragraph::new(Line::from(vec![
            Span::styled("  [r] Play again  ", Style::default().fg(colors.accent())),
            Span::styled("[q/Enter] Menu", Style::default().fg(colors.accent())),
        ]));
        help.render(layout[3], buf);
    }
}

fn render_column(
    title: &str,
    words: &[String],
    color: ratatui::style::Color,
    theme: &Theme,
    area: Rect,
    buf: &mut Buffer,
) {
    let colors = &theme.colors;
    let block = Block::bordered()
        .title(format!(" {title} ({}) ", words.len()))
        .border_style(Style::default().fg(color));
    let inner = block.inner(area);
    block.render(area, buf);

    let visible = inner.height as usize;
    let mut lines: Vec<Line> = words
        .iter()
        .take(visible)
        .map(|w| Line::from(Span::styled(format!(" {w}"), Style::default().fg(colors.fg()))))
        .collect();
    if words.len() > visible && visible > 0 {
        lines.pop();
        lines.push(Line::from(Span::styled(
            format!(" … {} more", words.len() - visible + 1),
            Style::default().fg(colors.text_pending()),
        )));
    }
    Paragraph::new(lines).render(inner, buf);
}
