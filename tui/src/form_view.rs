//! Drawing and editing one inline order form.
//!
//! Every form in the transcript is drawn with the same function; only the
//! focused one carries a [`FormFocus`], which owns the editor for the field
//! under the cursor and writes each edit straight back into the block.

use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::style::Stylize;
use ratatui::text::Line;
use ratatui::text::Span;
use showroom_core::FieldKey;
use showroom_core::FormBlock;
use showroom_core::FormId;
use showroom_core::ProductField;
use showroom_core::form::OptionKind;
use tui_input::Input;

use crate::text_input;

const LABEL_WIDTH: usize = 9;

/// A focusable stop inside a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormSlot {
    Field(FieldKey),
    Submit,
}

/// Focus stops of `form`, top to bottom. A locked product is read-only and
/// is skipped.
pub(crate) fn slots(form: &FormBlock) -> Vec<FormSlot> {
    FieldKey::ALL
        .into_iter()
        .filter(|key| *key != FieldKey::ProductInterest || !form.is_product_locked())
        .map(FormSlot::Field)
        .chain(std::iter::once(FormSlot::Submit))
        .collect()
}

fn is_text(slot: FormSlot) -> bool {
    matches!(slot, FormSlot::Field(key) if key != FieldKey::ProductInterest)
}

#[derive(Debug, Clone)]
pub(crate) struct FormFocus {
    pub(crate) id: FormId,
    pub(crate) slot: FormSlot,
    input: Input,
}

impl FormFocus {
    pub(crate) fn at(form: &FormBlock, slot: FormSlot) -> Self {
        let value = match slot {
            FormSlot::Field(key) if is_text(slot) => form.value(key),
            _ => String::new(),
        };
        Self {
            id: form.id(),
            slot,
            input: Input::new(value),
        }
    }

    pub(crate) fn first(form: &FormBlock) -> Self {
        Self::at(form, FormSlot::Field(FieldKey::FullName))
    }

    pub(crate) fn last(form: &FormBlock) -> Self {
        Self::at(form, FormSlot::Submit)
    }

    /// Move `step` stops within the form. Returns `false` when that would
    /// leave the form.
    pub(crate) fn advance(&mut self, form: &FormBlock, step: isize) -> bool {
        let slots = slots(form);
        let Some(current) = slots.iter().position(|s| *s == self.slot) else {
            return false;
        };
        let Some(next) = current
            .checked_add_signed(step)
            .and_then(|i| slots.get(i).copied())
        else {
            return false;
        };
        *self = Self::at(form, next);
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormKeyOutcome {
    Handled,
    Submit,
    Ignored,
}

/// Route a key to the focused slot of `form`.
pub(crate) fn handle_key(
    form: &mut FormBlock,
    focus: &mut FormFocus,
    key: KeyEvent,
) -> FormKeyOutcome {
    match key.code {
        KeyCode::Enter => return FormKeyOutcome::Submit,
        KeyCode::Up => {
            focus.advance(form, -1);
            return FormKeyOutcome::Handled;
        }
        KeyCode::Down => {
            focus.advance(form, 1);
            return FormKeyOutcome::Handled;
        }
        _ => {}
    }

    match focus.slot {
        FormSlot::Field(FieldKey::ProductInterest) => {
            let step = match key.code {
                KeyCode::Left => -1,
                KeyCode::Right | KeyCode::Char(' ') => 1,
                _ => return FormKeyOutcome::Ignored,
            };
            form.cycle_product(step);
            FormKeyOutcome::Handled
        }
        FormSlot::Field(field) => {
            // Quantity mirrors a numeric input: digits and a sign only.
            if field == FieldKey::Quantity
                && matches!(key.code, KeyCode::Char(c) if !c.is_ascii_digit() && c != '-')
            {
                return FormKeyOutcome::Handled;
            }
            if !text_input::apply_key(&mut focus.input, key) {
                return FormKeyOutcome::Ignored;
            }
            form.set_text(field, focus.input.value());
            FormKeyOutcome::Handled
        }
        FormSlot::Submit => FormKeyOutcome::Ignored,
    }
}

fn label(key: FieldKey) -> &'static str {
    match key {
        FieldKey::FullName => "Name",
        FieldKey::Email => "Email",
        FieldKey::Phone => "Phone",
        FieldKey::Address => "Address",
        FieldKey::ProductInterest => "Product",
        FieldKey::Quantity => "Qty",
    }
}

fn border() -> Span<'static> {
    Span::styled("│ ", Style::default().fg(Color::DarkGray))
}

fn title(form: &FormBlock) -> &'static str {
    if form.mode().is_confirm() {
        "Confirm your order"
    } else {
        "Your details"
    }
}

/// Lines for `form`, with the focused slot highlighted when `focus` targets
/// this form.
pub(crate) fn form_lines(form: &FormBlock, focus: Option<&FormFocus>) -> Vec<Line<'static>> {
    let focus = focus.filter(|f| f.id == form.id());
    let focused = |slot: FormSlot| focus.is_some_and(|f| f.slot == slot);

    let mut lines = Vec::with_capacity(FieldKey::ALL.len() + 3);
    lines.push(Line::from(vec![
        Span::styled("╭─ ", Style::default().fg(Color::DarkGray)),
        Span::from(title(form)).bold(),
    ]));

    for key in FieldKey::ALL {
        let slot = FormSlot::Field(key);
        let is_focused = focused(slot);
        let label_style = if is_focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };
        let mut spans = vec![
            border(),
            Span::styled(format!("{:<LABEL_WIDTH$}", label(key)), label_style),
        ];
        if key == FieldKey::ProductInterest {
            spans.extend(product_spans(form, is_focused));
        } else {
            match focus.filter(|_| is_focused) {
                Some(focus) => {
                    spans.extend(text_input::spans_with_cursor(&focus.input, Style::default()));
                }
                None => spans.push(value_span(form, key)),
            }
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(vec![border(), submit_span(form, focused(FormSlot::Submit))]));
    lines.push(Line::from(Span::styled("╰─", Style::default().fg(Color::DarkGray))));
    lines
}

fn value_span(form: &FormBlock, key: FieldKey) -> Span<'static> {
    let value = form.value(key);
    if value.is_empty() {
        Span::styled(key.placeholder(), Style::default().add_modifier(Modifier::DIM))
    } else {
        Span::from(value)
    }
}

fn product_spans(form: &FormBlock, focused: bool) -> Vec<Span<'static>> {
    match &form.description().product {
        ProductField::Locked(value) => vec![
            Span::from(value.clone()).bold(),
            Span::styled(" (locked)", Style::default().add_modifier(Modifier::DIM)),
        ],
        ProductField::Selector(selector) => {
            let option = form
                .selected_product_index()
                .and_then(|i| selector.options.get(i));
            let (text, style) = match option {
                Some(o) if o.kind == OptionKind::Placeholder => {
                    (o.label.clone(), Style::default().add_modifier(Modifier::DIM))
                }
                Some(o) => (o.label.clone(), Style::default()),
                None => (String::new(), Style::default()),
            };
            let style = if focused {
                style.add_modifier(Modifier::REVERSED)
            } else {
                style
            };
            vec![
                Span::styled("‹ ", Style::default().fg(Color::DarkGray)),
                Span::styled(text, style),
                Span::styled(" ›", Style::default().fg(Color::DarkGray)),
            ]
        }
    }
}

fn submit_span(form: &FormBlock, focused: bool) -> Span<'static> {
    let mut style = if form.control().is_enabled() {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::DIM)
    };
    if focused {
        style = style.add_modifier(Modifier::REVERSED);
    }
    Span::styled(format!("[ {} ]", form.submit_label()), style)
}
