use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Widget;
use tui_input::Input;

use crate::text_input;

const PLACEHOLDER: &str = "Type a message...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ComposerAction {
    None,
    Send(String),
}

/// Single-line message input at the bottom of the panel.
#[derive(Debug, Default)]
pub(crate) struct Composer {
    input: Input,
}

impl Composer {
    pub(crate) fn handle_key(&mut self, key: KeyEvent) -> ComposerAction {
        if key.code == KeyCode::Enter {
            let text = self.input.value().trim().to_string();
            if text.is_empty() {
                return ComposerAction::None;
            }
            self.input.reset();
            return ComposerAction::Send(text);
        }
        text_input::apply_key(&mut self.input, key);
        ComposerAction::None
    }

    /// Insert pasted text, folding newlines into spaces.
    pub(crate) fn insert_str(&mut self, text: &str) {
        for c in text.chars() {
            let c = if c == '\n' || c == '\r' { ' ' } else { c };
            self.input.handle(tui_input::InputRequest::InsertChar(c));
        }
    }

    pub(crate) const fn height() -> u16 {
        3
    }

    pub(crate) fn render(&self, area: Rect, buf: &mut Buffer, focused: bool) {
        let border_style = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" Message ");
        let inner_width = usize::from(block.inner(area).width.saturating_sub(1));
        let scroll = self.input.visual_scroll(inner_width);

        let dim = Style::default().add_modifier(Modifier::DIM);
        let line = if self.input.value().is_empty() {
            let mut spans = Vec::with_capacity(2);
            if focused {
                spans.push(Span::styled(" ", Style::default().add_modifier(Modifier::REVERSED)));
            }
            spans.push(Span::styled(PLACEHOLDER, dim));
            Line::from(spans)
        } else if focused {
            let visible = Input::new(self.input.value().chars().skip(scroll).collect())
                .with_cursor(self.input.cursor().saturating_sub(scroll));
            Line::from(text_input::spans_with_cursor(&visible, Style::default()))
        } else {
            Line::from(self.input.value().chars().skip(scroll).collect::<String>())
        };
        Paragraph::new(line).block(block).render(area, buf);
    }
}
