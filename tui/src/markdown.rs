//! Markdown rendering for bot messages.
//!
//! Produces owned ratatui lines; wrapping is left to the paragraph that
//! draws them.

use pulldown_cmark::Event;
use pulldown_cmark::HeadingLevel;
use pulldown_cmark::Options;
use pulldown_cmark::Parser;
use pulldown_cmark::Tag;
use pulldown_cmark::TagEnd;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;

/// Render `text` as markdown, or as plain lines when nothing renders.
pub(crate) fn render_markdown(text: &str) -> Vec<Line<'static>> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    let mut writer = MarkdownWriter::default();
    for event in Parser::new_ext(text, options) {
        writer.handle(event);
    }
    let lines = writer.finish();
    if lines.is_empty() && !text.trim().is_empty() {
        return render_plain(text);
    }
    lines
}

pub(crate) fn render_plain(text: &str) -> Vec<Line<'static>> {
    text.lines().map(|l| Line::from(l.to_string())).collect()
}

fn code_style() -> Style {
    Style::default().fg(Color::Cyan)
}

#[derive(Default)]
struct MarkdownWriter {
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    styles: Vec<Style>,
    /// One entry per open list: the next ordinal for ordered lists.
    lists: Vec<Option<u64>>,
    quote_depth: usize,
    in_code_block: bool,
    needs_blank: bool,
}

impl MarkdownWriter {
    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.push_span(Span::styled(code.to_string(), code_style())),
            Event::SoftBreak => self.push_span(Span::styled(" ", self.style())),
            Event::HardBreak => self.flush_line(),
            Event::Rule => {
                self.start_block();
                self.push_span(Span::styled("───", Style::default().add_modifier(Modifier::DIM)));
                self.flush_line();
                self.needs_blank = true;
            }
            Event::Html(html) | Event::InlineHtml(html) => self.text(&html),
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.start_block(),
            Tag::Heading { level, .. } => {
                self.start_block();
                let mut style = Style::default().add_modifier(Modifier::BOLD);
                if level == HeadingLevel::H1 {
                    style = style.add_modifier(Modifier::UNDERLINED);
                }
                self.push_style(style);
            }
            Tag::BlockQuote(_) => {
                self.start_block();
                self.quote_depth += 1;
            }
            Tag::CodeBlock(_) => {
                self.start_block();
                self.in_code_block = true;
            }
            Tag::List(start) => {
                if self.lists.is_empty() {
                    self.start_block();
                } else {
                    self.flush_line();
                }
                self.lists.push(start);
            }
            Tag::Item => {
                self.flush_line();
                let depth = self.lists.len().saturating_sub(1);
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{n}. ");
                        *n += 1;
                        marker
                    }
                    _ => "- ".to_string(),
                };
                self.push_span(Span::raw(format!("{}{marker}", "  ".repeat(depth))));
            }
            Tag::Emphasis => self.push_style(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.push_style(Style::default().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => {
                self.push_style(Style::default().add_modifier(Modifier::CROSSED_OUT));
            }
            Tag::Link { .. } => self.push_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::UNDERLINED),
            ),
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                self.flush_line();
                self.needs_blank = true;
            }
            TagEnd::Heading(_) => {
                self.styles.pop();
                self.flush_line();
                self.needs_blank = true;
            }
            TagEnd::BlockQuote(_) => {
                self.flush_line();
                self.quote_depth = self.quote_depth.saturating_sub(1);
                self.needs_blank = true;
            }
            TagEnd::CodeBlock => {
                if !self.current.is_empty() {
                    self.flush_line();
                }
                self.in_code_block = false;
                self.needs_blank = true;
            }
            TagEnd::List(_) => {
                self.flush_line();
                self.lists.pop();
                if self.lists.is_empty() {
                    self.needs_blank = true;
                }
            }
            TagEnd::Item => self.flush_line(),
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link => {
                self.styles.pop();
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if self.in_code_block {
            let mut pieces = text.split('\n').peekable();
            while let Some(piece) = pieces.next() {
                let last = pieces.peek().is_none();
                if !piece.is_empty() {
                    self.push_span(Span::styled(piece.to_string(), code_style()));
                }
                if !last {
                    self.flush_code_line();
                }
            }
            return;
        }
        // Tight list items have no paragraph and may carry raw newlines.
        let mut pieces = text.split('\n');
        if let Some(first) = pieces.next() {
            self.push_span(Span::styled(first.to_string(), self.style()));
        }
        for piece in pieces {
            self.flush_line();
            self.push_span(Span::styled(piece.to_string(), self.style()));
        }
    }

    fn style(&self) -> Style {
        self.styles.last().copied().unwrap_or_default()
    }

    fn push_style(&mut self, style: Style) {
        let merged = self.style().patch(style);
        self.styles.push(merged);
    }

    fn push_span(&mut self, span: Span<'static>) {
        if span.content.is_empty() {
            return;
        }
        if self.current.is_empty() && self.quote_depth > 0 {
            self.current.push(Span::styled(
                "│ ".repeat(self.quote_depth),
                Style::default().add_modifier(Modifier::DIM),
            ));
        }
        self.current.push(span);
    }

    fn start_block(&mut self) {
        self.flush_line();
        if self.needs_blank && !self.lines.is_empty() {
            self.lines.push(Line::default());
        }
        self.needs_blank = false;
    }

    fn flush_line(&mut self) {
        if !self.current.is_empty() {
            self.lines.push(Line::from(std::mem::take(&mut self.current)));
        }
    }

    /// Blank lines inside code blocks are kept.
    fn flush_code_line(&mut self) {
        self.lines.push(Line::from(std::mem::take(&mut self.current)));
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush_line();
        self.lines
    }
}
