//! Scrollable view over the transcript.
//!
//! Entry heights depend on the wrap width, so scroll directives coming from
//! the controller are queued and resolved at the next render.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Widget;
use ratatui::widgets::Wrap;
use showroom_core::EntryId;
use showroom_core::Role;
use showroom_core::ScrollBehavior;
use showroom_core::ScrollDirective;
use showroom_core::SmoothScroll;
use showroom_core::TranscriptItem;
use showroom_core::Viewport;

use crate::form_view;
use crate::form_view::FormFocus;
use crate::markdown;

/// Lines for one transcript entry, including its trailing spacer.
pub(crate) fn entry_lines(
    item: &TranscriptItem,
    markdown: bool,
    focus: Option<&FormFocus>,
) -> Vec<Line<'static>> {
    let mut lines = match item {
        TranscriptItem::Message { role, content } => {
            let (name, color) = match role {
                Role::User => ("You", Color::Cyan),
                Role::Bot => ("Assistant", Color::Magenta),
            };
            let mut lines = vec![Line::from(Span::styled(
                name,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))];
            let body = match role {
                Role::Bot if markdown => markdown::render_markdown(content),
                _ => markdown::render_plain(content),
            };
            lines.extend(body);
            lines
        }
        TranscriptItem::Form(form) => form_view::form_lines(form, focus),
    };
    lines.push(Line::default());
    lines
}

fn wrapped_height(lines: &[Line<'static>], width: u16) -> usize {
    Paragraph::new(lines.to_vec())
        .wrap(Wrap { trim: false })
        .line_count(width)
}

#[derive(Debug, Default)]
pub(crate) struct TranscriptView {
    viewport: Viewport,
    heights: Vec<usize>,
    pending: Option<ScrollDirective>,
    reveal: Option<EntryId>,
    smooth: Option<SmoothScroll>,
}

impl TranscriptView {
    /// Queue a directive; the latest one wins.
    pub(crate) fn request(&mut self, directive: ScrollDirective) {
        self.pending = Some(directive);
    }

    /// Scroll just enough to show `entry` at the next render.
    pub(crate) fn reveal(&mut self, entry: EntryId) {
        self.reveal = Some(entry);
    }

    /// Scroll by whole pages (negative is up).
    pub(crate) fn page(&mut self, pages: isize) {
        self.smooth = None;
        let page = self.viewport.height.saturating_sub(1).max(1) as isize;
        self.viewport.scroll_by(pages * page, &self.heights);
    }

    pub(crate) fn is_animating(&self) -> bool {
        self.smooth.is_some()
    }

    /// Advance an in-progress smooth scroll by one frame.
    pub(crate) fn tick(&mut self) -> bool {
        let Some(smooth) = self.smooth else {
            return false;
        };
        let (offset, done) = smooth.step(self.viewport.offset);
        self.viewport.offset = offset;
        self.viewport.clamp(&self.heights);
        if done {
            self.smooth = None;
        }
        true
    }

    #[cfg(test)]
    fn offset(&self) -> usize {
        self.viewport.offset
    }

    pub(crate) fn is_at_bottom(&self) -> bool {
        self.viewport.is_at_bottom(&self.heights)
    }

    /// Scroll position as a percentage of the scrollable range.
    pub(crate) fn percent(&self) -> u8 {
        let max = self.viewport.max_offset(&self.heights);
        if max == 0 {
            return 100;
        }
        ((self.viewport.offset.min(max) * 100) / max) as u8
    }

    pub(crate) fn render(
        &mut self,
        area: Rect,
        buf: &mut Buffer,
        entries: Vec<Vec<Line<'static>>>,
    ) {
        self.heights = entries
            .iter()
            .map(|lines| wrapped_height(lines, area.width))
            .collect();
        self.viewport.height = usize::from(area.height);
        self.viewport.clamp(&self.heights);

        if let Some(entry) = self.reveal.take() {
            self.ensure_visible(entry);
        }
        if let Some(directive) = self.pending.take() {
            let target = self.viewport.target_offset(directive, &self.heights);
            match directive.behavior() {
                ScrollBehavior::Instant => {
                    self.smooth = None;
                    self.viewport.offset = target;
                }
                ScrollBehavior::Smooth => self.smooth = Some(SmoothScroll::toward(target)),
            }
        }

        let lines: Vec<Line<'static>> = entries.into_iter().flatten().collect();
        let offset = u16::try_from(self.viewport.offset).unwrap_or(u16::MAX);
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((offset, 0))
            .render(area, buf);
    }

    fn ensure_visible(&mut self, entry: EntryId) {
        let Some(height) = self.heights.get(entry.0).copied() else {
            return;
        };
        let top: usize = self.heights.iter().take(entry.0).sum();
        let bottom = top + height;
        let view = self.viewport.height;
        if top < self.viewport.offset || height > view {
            self.viewport.offset = top;
        } else if bottom > self.viewport.offset + view {
            self.viewport.offset = bottom - view;
        }
        self.smooth = None;
        self.viewport.clamp(&self.heights);
    }
}
