//! Single-line editing shared by the composer and form fields.

use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyModifiers;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Span;
use tui_input::Input;
use tui_input::InputRequest;

/// Map a key press to an editing request, if it is one.
pub(crate) fn input_request(key: KeyEvent) -> Option<InputRequest> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    match key.code {
        KeyCode::Char('a') if ctrl => Some(InputRequest::GoToStart),
        KeyCode::Char('e') if ctrl => Some(InputRequest::GoToEnd),
        KeyCode::Char('u') if ctrl => Some(InputRequest::DeleteLine),
        KeyCode::Char('k') if ctrl => Some(InputRequest::DeleteTillEnd),
        KeyCode::Char('w') if ctrl => Some(InputRequest::DeletePrevWord),
        KeyCode::Char(c) if !ctrl && !alt => Some(InputRequest::InsertChar(c)),
        KeyCode::Backspace if ctrl || alt => Some(InputRequest::DeletePrevWord),
        KeyCode::Backspace => Some(InputRequest::DeletePrevChar),
        KeyCode::Delete => Some(InputRequest::DeleteNextChar),
        KeyCode::Left if ctrl || alt => Some(InputRequest::GoToPrevWord),
        KeyCode::Right if ctrl || alt => Some(InputRequest::GoToNextWord),
        KeyCode::Left => Some(InputRequest::GoToPrevChar),
        KeyCode::Right => Some(InputRequest::GoToNextChar),
        KeyCode::Home => Some(InputRequest::GoToStart),
        KeyCode::End => Some(InputRequest::GoToEnd),
        _ => None,
    }
}

/// Apply a key to `input`. Returns whether the key was an editing key.
pub(crate) fn apply_key(input: &mut Input, key: KeyEvent) -> bool {
    match input_request(key) {
        Some(request) => {
            input.handle(request);
            true
        }
        None => false,
    }
}

/// Split `input` into spans with the character under the cursor reversed.
pub(crate) fn spans_with_cursor(input: &Input, style: Style) -> Vec<Span<'static>> {
    let cursor_style = style.add_modifier(Modifier::REVERSED);
    let value = input.value();
    let cursor = input.cursor();
    let before: String = value.chars().take(cursor).collect();
    let mut rest = value.chars().skip(cursor);
    let under = rest.next().map(String::from).unwrap_or_else(|| " ".to_string());
    let after: String = rest.collect();

    let mut spans = Vec::with_capacity(3);
    if !before.is_empty() {
        spans.push(Span::styled(before, style));
    }
    spans.push(Span::styled(under, cursor_style));
    if !after.is_empty() {
        spans.push(Span::styled(after, style));
    }
    spans
}
