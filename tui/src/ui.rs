//! Panel layout: header with the chrome toggle, transcript, composer and a
//! footer of key hints.

use ratatui::Frame;
use ratatui::layout::Constraint;
use ratatui::layout::Layout;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::style::Style;
use ratatui::style::Stylize;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Paragraph;
use showroom_core::ChromeState;

use crate::app::App;
use crate::app::Focus;
use crate::composer::Composer;
use crate::key_hint;
use crate::key_hint::KeyBinding;
use crate::transcript_view::entry_lines;

const TITLE: &str = " Showroom Assistant ";
const COLLAPSED_WIDTH: u16 = 36;

pub(crate) fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();
    match app.controller.chrome() {
        ChromeState::Open => render_open(app, frame, area),
        ChromeState::Collapsed => render_collapsed(frame, area),
    }
}

fn panel(chrome: ChromeState) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Magenta))
        .title_top(Line::from(TITLE).bold())
        .title_top(Line::from(format!(" [{}] ", chrome.control_glyph())).right_aligned())
}

fn render_open(app: &mut App, frame: &mut Frame, area: Rect) {
    let block = panel(ChromeState::Open);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [transcript_area, composer_area, footer_area] = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(Composer::height()),
        Constraint::Length(1),
    ])
    .areas(inner);

    let focus = app.form_focus().cloned();
    let entries = app
        .controller
        .transcript()
        .items()
        .iter()
        .map(|item| entry_lines(item, app.markdown, focus.as_ref()))
        .collect();
    app.transcript_view
        .render(transcript_area, frame.buffer_mut(), entries);

    let composer_focused = matches!(app.focus, Focus::Composer);
    app.composer
        .render(composer_area, frame.buffer_mut(), composer_focused);

    render_footer(app, frame, footer_area);
}

fn footer_hints(app: &App) -> Vec<(KeyBinding, &'static str)> {
    match app.focus {
        Focus::Composer => {
            let mut hints = vec![(key_hint::SUBMIT, "send")];
            if app.controller.transcript().latest_form().is_some() {
                hints.push((key_hint::NEXT_FOCUS, "form"));
            }
            hints.push((key_hint::TOGGLE_CHROME, "collapse"));
            hints.push((key_hint::ESCAPE, "quit"));
            hints
        }
        Focus::Form(_) => vec![
            (key_hint::SUBMIT, "submit"),
            (key_hint::NEXT_FOCUS, "next"),
            (key_hint::OLDER_FORM, "older form"),
            (key_hint::ESCAPE, "quit"),
        ],
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let status = if app.in_flight > 0 {
        Some(Span::from(" waiting for reply... ").italic().fg(Color::Yellow))
    } else if !app.transcript_view.is_at_bottom() {
        Some(Span::from(format!(" {}% ", app.transcript_view.percent())).dim())
    } else {
        None
    };
    let status_width = status
        .as_ref()
        .map(|s| u16::try_from(s.width()).unwrap_or(u16::MAX))
        .unwrap_or(0);

    let [hints_area, status_area] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(status_width)]).areas(area);
    frame.render_widget(
        Paragraph::new(key_hint::hint_line(&footer_hints(app))),
        hints_area,
    );
    if let Some(status) = status {
        frame.render_widget(Paragraph::new(Line::from(status)), status_area);
    }
}

/// Collapsed: a small tab in the bottom-right corner.
fn render_collapsed(frame: &mut Frame, area: Rect) {
    let width = COLLAPSED_WIDTH.min(area.width);
    let height = 3.min(area.height);
    let tab = Rect::new(
        area.x + area.width - width,
        area.y + area.height - height,
        width,
        height,
    );
    let hint = Line::from(vec![
        Span::from(key_hint::TOGGLE_CHROME),
        Span::from(" to open chat").dim(),
    ]);
    frame.render_widget(
        Paragraph::new(hint).block(panel(ChromeState::Collapsed)),
        tab,
    );
}
