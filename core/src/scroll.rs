//! Where the transcript view should land after an update.
//!
//! The directive is decided from what an exchange appended; turning it into
//! a row offset needs the rendered height of each entry, which only the
//! presentation layer knows, so [`Viewport`] takes those heights as input.

use crate::transcript::EntryId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    /// Jump straight to the target.
    Instant,
    /// Animate toward the target over a few frames.
    Smooth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirective {
    /// Snap to the end of the transcript.
    Bottom,
    /// Bring the top edge of an entry to the top of the view.
    RevealTop(EntryId),
}

impl ScrollDirective {
    /// Scroll rule for a server reply: when a form follows a text entry from
    /// the same reply, show that text from its top so it is read before the
    /// form; otherwise go to the bottom.
    pub fn for_reply(form_rendered: bool, text_entry: Option<EntryId>) -> Self {
        match (form_rendered, text_entry) {
            (true, Some(entry)) => ScrollDirective::RevealTop(entry),
            _ => ScrollDirective::Bottom,
        }
    }

    pub fn behavior(self) -> ScrollBehavior {
        match self {
            ScrollDirective::Bottom => ScrollBehavior::Instant,
            ScrollDirective::RevealTop(_) => ScrollBehavior::Smooth,
        }
    }
}

/// Scroll position over a list of entries with known heights (in rows).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub offset: usize,
    pub height: usize,
}

impl Viewport {
    pub fn new(height: usize) -> Self {
        Self { offset: 0, height }
    }

    pub fn max_offset(&self, heights: &[usize]) -> usize {
        let total: usize = heights.iter().sum();
        total.saturating_sub(self.height)
    }

    /// Row offset that satisfies `directive` for the given entry heights.
    pub fn target_offset(&self, directive: ScrollDirective, heights: &[usize]) -> usize {
        let max = self.max_offset(heights);
        match directive {
            ScrollDirective::Bottom => max,
            ScrollDirective::RevealTop(EntryId(index)) => {
                let top: usize = heights.iter().take(index).sum();
                top.min(max)
            }
        }
    }

    pub fn is_at_bottom(&self, heights: &[usize]) -> bool {
        self.offset >= self.max_offset(heights)
    }

    pub fn scroll_by(&mut self, delta: isize, heights: &[usize]) {
        let max = self.max_offset(heights);
        self.offset = self.offset.saturating_add_signed(delta).min(max);
    }

    pub fn clamp(&mut self, heights: &[usize]) {
        self.offset = self.offset.min(self.max_offset(heights));
    }
}

/// Frame-by-frame approach toward a target offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmoothScroll {
    target: usize,
}

/// Fraction of the remaining distance covered per frame (1/3), with at least
/// one row of progress so the animation always terminates.
const SMOOTH_DIVISOR: usize = 3;

impl SmoothScroll {
    pub fn toward(target: usize) -> Self {
        Self { target }
    }

    pub fn target(&self) -> usize {
        self.target
    }

    /// Advance `current` one frame. Returns the new offset and whether the
    /// target has been reached.
    pub fn step(&self, current: usize) -> (usize, bool) {
        let distance = current.abs_diff(self.target);
        if distance == 0 {
            return (current, true);
        }
        let stride = distance.div_ceil(SMOOTH_DIVISOR).max(1);
        let next = if current < self.target {
            current + stride
        } else {
            current - stride
        };
        (next, next == self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn form_with_text_reveals_text() {
        assert_eq!(
            ScrollDirective::for_reply(true, Some(EntryId(4))),
            ScrollDirective::RevealTop(EntryId(4))
        );
        assert_eq!(ScrollDirective::for_reply(true, None), ScrollDirective::Bottom);
        assert_eq!(
            ScrollDirective::for_reply(false, Some(EntryId(4))),
            ScrollDirective::Bottom
        );
        assert_eq!(ScrollDirective::for_reply(false, None), ScrollDirective::Bottom);
    }

    #[test]
    fn reveal_top_puts_entry_at_top() {
        let heights = [3, 5, 2, 12];
        let viewport = Viewport::new(10);
        assert_eq!(
            viewport.target_offset(ScrollDirective::RevealTop(EntryId(2)), &heights),
            8
        );
        assert_eq!(viewport.target_offset(ScrollDirective::Bottom, &heights), 12);
    }

    #[test]
    fn reveal_top_is_clamped_to_bottom() {
        let heights = [3, 5, 2];
        let viewport = Viewport::new(8);
        assert_eq!(
            viewport.target_offset(ScrollDirective::RevealTop(EntryId(2)), &heights),
            2
        );
    }

    #[test]
    fn short_transcript_never_scrolls() {
        let heights = [1, 1];
        let mut viewport = Viewport::new(10);
        viewport.scroll_by(5, &heights);
        assert_eq!(viewport.offset, 0);
        assert!(viewport.is_at_bottom(&heights));
    }

    #[test]
    fn smooth_scroll_converges() {
        let animation = SmoothScroll::toward(10);
        let mut offset = 0;
        let mut frames = 0;
        loop {
            let (next, done) = animation.step(offset);
            offset = next;
            frames += 1;
            if done {
                break;
            }
            assert!(frames < 20, "animation did not converge");
        }
        assert_eq!(offset, 10);
        assert!(frames > 1);
    }
}
