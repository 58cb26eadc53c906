//! Expanded/collapsed state of the chat panel.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChromeState {
    #[default]
    Open,
    Collapsed,
}

impl ChromeState {
    pub fn toggle(&mut self) {
        *self = match self {
            ChromeState::Open => ChromeState::Collapsed,
            ChromeState::Collapsed => ChromeState::Open,
        };
    }

    pub fn is_open(self) -> bool {
        matches!(self, ChromeState::Open)
    }

    /// Glyph shown on the toggle control: what pressing it would do.
    pub fn control_glyph(self) -> &'static str {
        match self {
            ChromeState::Open => "−",
            ChromeState::Collapsed => "+",
        }
    }
}
