//! Turning one server reply into transcript updates.
//!
//! The order is fixed: reply text, then the form, then a scroll decision,
//! then any server-reported error (which always leaves the view at the
//! bottom). [`plan_reply`] spells the order out as data so it can be checked
//! without applying it; [`apply_plan`] executes it against a transcript.

use crate::catalog::ProductCatalog;
use crate::form::FormDescription;
use crate::form::FormId;
use crate::form::FormMode;
use crate::form::FormPrefill;
use crate::scroll::ScrollDirective;
use crate::transcript::EntryId;
use crate::transcript::Transcript;
use crate::transport::ChatReply;

/// Prefix for errors the server reports inside an otherwise good reply.
pub const SERVER_ERROR_PREFIX: &str = "Error: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannedScroll {
    Bottom,
    /// Reveal the text entry appended earlier in the same plan.
    RevealText,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyStep {
    AppendText(String),
    RenderForm { prefill: FormPrefill, mode: FormMode },
    Scroll(PlannedScroll),
    AppendError(String),
}

/// What applying a reply (or a failed exchange) changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyOutcome {
    pub text_entry: Option<EntryId>,
    pub form: Option<(EntryId, FormId)>,
    pub error_entry: Option<EntryId>,
    /// Last scroll decision; the one the view should honor.
    pub scroll: ScrollDirective,
}

impl ReplyOutcome {
    pub(crate) fn error_only(entry: EntryId) -> Self {
        Self {
            text_entry: None,
            form: None,
            error_entry: Some(entry),
            scroll: ScrollDirective::Bottom,
        }
    }
}

pub fn plan_reply(reply: &ChatReply) -> Vec<ReplyStep> {
    let mut steps = Vec::with_capacity(5);

    let text = reply.response.as_deref().filter(|t| !t.is_empty());
    if let Some(text) = text {
        steps.push(ReplyStep::AppendText(text.to_string()));
    }

    if reply.wants_form() {
        steps.push(ReplyStep::RenderForm {
            prefill: reply.prefill(),
            mode: reply.form_mode(),
        });
        steps.push(ReplyStep::Scroll(if text.is_some() {
            PlannedScroll::RevealText
        } else {
            PlannedScroll::Bottom
        }));
    } else {
        steps.push(ReplyStep::Scroll(PlannedScroll::Bottom));
    }

    if let Some(error) = reply.error.as_deref().filter(|e| !e.is_empty()) {
        steps.push(ReplyStep::AppendError(format!("{SERVER_ERROR_PREFIX}{error}")));
        steps.push(ReplyStep::Scroll(PlannedScroll::Bottom));
    }

    steps
}

pub fn apply_plan(
    steps: Vec<ReplyStep>,
    transcript: &mut Transcript,
    catalog: &ProductCatalog,
) -> ReplyOutcome {
    let mut outcome = ReplyOutcome {
        text_entry: None,
        form: None,
        error_entry: None,
        scroll: ScrollDirective::Bottom,
    };

    for step in steps {
        match step {
            ReplyStep::AppendText(text) => {
                outcome.text_entry = Some(transcript.push_bot(text));
            }
            ReplyStep::RenderForm { prefill, mode } => {
                let description = FormDescription::describe(&prefill, mode, catalog);
                outcome.form = Some(transcript.push_form(description));
            }
            ReplyStep::Scroll(PlannedScroll::Bottom) => {
                outcome.scroll = ScrollDirective::Bottom;
            }
            ReplyStep::Scroll(PlannedScroll::RevealText) => {
                outcome.scroll =
                    ScrollDirective::for_reply(outcome.form.is_some(), outcome.text_entry);
            }
            ReplyStep::AppendError(message) => {
                outcome.error_entry = Some(transcript.push_bot(message));
            }
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::ProductField;
    use crate::transcript::Role;
    use crate::transcript::TranscriptItem;
    use crate::transport::ReplyMeta;
    use pretty_assertions::assert_eq;

    fn form_reply(response: Option<&str>, mode: FormMode) -> ChatReply {
        ChatReply {
            response: response.map(str::to_string),
            show_form: Some(true),
            state: Some(FormPrefill::default().with_product("Velvet Armchair")),
            meta: Some(ReplyMeta { form_mode: mode }),
            error: None,
        }
    }

    #[test]
    fn plan_orders_text_form_scroll_error() {
        let mut reply = form_reply(Some("Got it"), FormMode::Confirm);
        reply.error = Some("stock lookup failed".to_string());
        let steps = plan_reply(&reply);
        assert_eq!(
            steps,
            vec![
                ReplyStep::AppendText("Got it".to_string()),
                ReplyStep::RenderForm {
                    prefill: FormPrefill::default().with_product("Velvet Armchair"),
                    mode: FormMode::Confirm,
                },
                ReplyStep::Scroll(PlannedScroll::RevealText),
                ReplyStep::AppendError("Error: stock lookup failed".to_string()),
                ReplyStep::Scroll(PlannedScroll::Bottom),
            ]
        );
    }

    #[test]
    fn text_then_confirm_form_reveals_text() {
        let mut transcript = Transcript::new();
        transcript.push_user("I'd like the armchair");
        let outcome = apply_plan(
            plan_reply(&form_reply(Some("Got it"), FormMode::Confirm)),
            &mut transcript,
            &ProductCatalog::default(),
        );

        assert_eq!(outcome.text_entry, Some(EntryId(1)));
        assert_eq!(outcome.scroll, ScrollDirective::RevealTop(EntryId(1)));
        assert_eq!(
            transcript.get(EntryId(1)).and_then(TranscriptItem::as_message),
            Some((Role::Bot, "Got it"))
        );
        let Some((entry, form_id)) = outcome.form else {
            panic!("expected a form");
        };
        assert_eq!(entry, EntryId(2));
        let form = transcript.form(form_id);
        assert_eq!(form.map(|f| f.submit_label()), Some("Confirm Order"));
        assert_eq!(
            form.map(|f| f.description().product.clone()),
            Some(ProductField::Locked("Velvet Armchair".to_string()))
        );
    }

    #[test]
    fn form_without_text_goes_to_bottom() {
        let mut transcript = Transcript::new();
        let outcome = apply_plan(
            plan_reply(&form_reply(None, FormMode::Edit)),
            &mut transcript,
            &ProductCatalog::default(),
        );
        assert_eq!(outcome.text_entry, None);
        assert!(outcome.form.is_some());
        assert_eq!(outcome.scroll, ScrollDirective::Bottom);
    }

    #[test]
    fn empty_strings_are_skipped() {
        let reply = ChatReply {
            response: Some(String::new()),
            error: Some(String::new()),
            ..ChatReply::default()
        };
        assert_eq!(
            plan_reply(&reply),
            vec![ReplyStep::Scroll(PlannedScroll::Bottom)]
        );
    }

    #[test]
    fn server_error_does_not_suppress_text() {
        let mut transcript = Transcript::new();
        let reply = ChatReply {
            response: Some("Partial answer".to_string()),
            error: Some("model timeout".to_string()),
            ..ChatReply::default()
        };
        let outcome = apply_plan(plan_reply(&reply), &mut transcript, &ProductCatalog::default());
        let messages: Vec<_> = transcript
            .items()
            .iter()
            .filter_map(TranscriptItem::as_message)
            .collect();
        assert_eq!(
            messages,
            vec![
                (Role::Bot, "Partial answer"),
                (Role::Bot, "Error: model timeout"),
            ]
        );
        assert_eq!(outcome.error_entry, Some(EntryId(1)));
        assert_eq!(outcome.scroll, ScrollDirective::Bottom);
    }
}
