//! Key bindings and their footer rendering.

use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;
use ratatui::style::Style;
use ratatui::style::Stylize;
use ratatui::text::Line;
use ratatui::text::Span;

const CTRL_PREFIX: &str = "ctrl + ";
const SHIFT_PREFIX: &str = "shift + ";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct KeyBinding {
    key: KeyCode,
    modifiers: KeyModifiers,
}

impl KeyBinding {
    pub(crate) const fn new(key: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { key, modifiers }
    }

    /// Check if this binding matches the given key event (press or repeat).
    pub(crate) fn is_press(&self, event: KeyEvent) -> bool {
        self.key == event.code
            && self.modifiers == event.modifiers
            && (event.kind == KeyEventKind::Press || event.kind == KeyEventKind::Repeat)
    }
}

pub(crate) const fn plain(key: KeyCode) -> KeyBinding {
    KeyBinding::new(key, KeyModifiers::NONE)
}

/// Crossterm reports shift+tab as `BackTab` with the shift modifier set.
pub(crate) const fn shift(key: KeyCode) -> KeyBinding {
    KeyBinding::new(key, KeyModifiers::SHIFT)
}

pub(crate) const fn ctrl(key: KeyCode) -> KeyBinding {
    KeyBinding::new(key, KeyModifiers::CONTROL)
}

pub(crate) const QUIT: KeyBinding = ctrl(KeyCode::Char('c'));
pub(crate) const ESCAPE: KeyBinding = plain(KeyCode::Esc);
pub(crate) const TOGGLE_CHROME: KeyBinding = ctrl(KeyCode::Char('t'));
pub(crate) const SUBMIT: KeyBinding = plain(KeyCode::Enter);
pub(crate) const NEXT_FOCUS: KeyBinding = plain(KeyCode::Tab);
pub(crate) const PREV_FOCUS: KeyBinding = shift(KeyCode::BackTab);
pub(crate) const OLDER_FORM: KeyBinding = ctrl(KeyCode::Up);
pub(crate) const NEWER_FORM: KeyBinding = ctrl(KeyCode::Down);
pub(crate) const PAGE_UP: KeyBinding = plain(KeyCode::PageUp);
pub(crate) const PAGE_DOWN: KeyBinding = plain(KeyCode::PageDown);

fn modifiers_to_string(modifiers: KeyModifiers) -> String {
    let mut result = String::new();
    if modifiers.contains(KeyModifiers::CONTROL) {
        result.push_str(CTRL_PREFIX);
    }
    if modifiers.contains(KeyModifiers::SHIFT) {
        result.push_str(SHIFT_PREFIX);
    }
    result
}

impl From<KeyBinding> for Span<'static> {
    fn from(binding: KeyBinding) -> Self {
        let KeyBinding { key, modifiers } = binding;
        let modifiers = modifiers_to_string(modifiers);
        let key = match key {
            KeyCode::Enter => "enter".to_string(),
            KeyCode::Esc => "esc".to_string(),
            KeyCode::Tab | KeyCode::BackTab => "tab".to_string(),
            KeyCode::Up => "↑".to_string(),
            KeyCode::Down => "↓".to_string(),
            KeyCode::Left => "←".to_string(),
            KeyCode::Right => "→".to_string(),
            KeyCode::PageUp => "pgup".to_string(),
            KeyCode::PageDown => "pgdn".to_string(),
            _ => format!("{key}").to_ascii_lowercase(),
        };
        Span::styled(format!("{modifiers}{key}"), key_hint_style())
    }
}

fn key_hint_style() -> Style {
    Style::default().dim()
}

/// Footer line of `key description` pairs separated by gaps.
pub(crate) fn hint_line(hints: &[(KeyBinding, &'static str)]) -> Line<'static> {
    let mut spans = Vec::with_capacity(hints.len() * 3);
    for (i, (binding, description)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::from("   "));
        }
        spans.push(Span::from(*binding).bold());
        spans.push(Span::from(format!(" {description}")).dim());
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn key_binding_ctrl() {
        let span: Span = TOGGLE_CHROME.into();
        assert_eq!(span.content.as_ref(), "ctrl + t");
    }

    #[test]
    fn back_tab_renders_as_shift_tab() {
        assert_eq!(Span::from(PREV_FOCUS).content.as_ref(), "shift + tab");
    }

    #[test]
    fn key_binding_special_keys() {
        assert_eq!(Span::from(OLDER_FORM).content.as_ref(), "ctrl + ↑");
        assert_eq!(Span::from(PAGE_DOWN).content.as_ref(), "pgdn");
    }

    #[test]
    fn is_press_matches_correctly() {
        let event = KeyEvent::new_with_kind(
            KeyCode::Char('t'),
            KeyModifiers::CONTROL,
            KeyEventKind::Press,
        );
        assert!(TOGGLE_CHROME.is_press(event));

        let release = KeyEvent::new_with_kind(
            KeyCode::Char('t'),
            KeyModifiers::CONTROL,
            KeyEventKind::Release,
        );
        assert!(!TOGGLE_CHROME.is_press(release));

        let unmodified = KeyEvent::new(KeyCode::Char('t'), KeyModifiers::NONE);
        assert!(!TOGGLE_CHROME.is_press(unmodified));
    }

    #[test]
    fn hint_line_joins_pairs() {
        let line = hint_line(&[(SUBMIT, "send"), (QUIT, "quit")]);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "enter send   ctrl + c quit");
    }
}
