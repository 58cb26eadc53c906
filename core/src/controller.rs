//! Sequencing of user actions, exchanges and replies.
//!
//! Every action is split in two halves. The synchronous half
//! ([`ChatController::send_message`], [`ChatController::submit_form`])
//! updates the transcript immediately and returns a [`PendingExchange`].
//! The caller runs that exchange however it likes (the terminal UI spawns a
//! task) and hands the result back to [`ChatController::complete_exchange`].
//! Exchanges are independent: replies are applied in whatever order they
//! arrive.

use tracing::info;
use tracing::warn;

use crate::catalog::ProductCatalog;
use crate::chrome::ChromeState;
use crate::form::FormBlock;
use crate::form::FormId;
use crate::form::SubmitError;
use crate::reply::ReplyOutcome;
use crate::reply::apply_plan;
use crate::reply::plan_reply;
use crate::scroll::ScrollDirective;
use crate::session::SessionToken;
use crate::transcript::Transcript;
use crate::transport::ChatReply;
use crate::transport::ChatRequest;
use crate::transport::ChatTransport;
use crate::transport::TransportError;

/// Shown in place of the raw JSON when a form is submitted.
pub const FORM_SUBMITTED_NOTICE: &str = "📝 Form Submitted";
/// Generic failure for a message typed in the composer.
pub const SEND_FAILURE_MESSAGE: &str = "Sorry, something went wrong.";
/// Failure for a form submission; the form's control is re-enabled.
pub const SUBMIT_FAILURE_MESSAGE: &str = "Error submitting form. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeOrigin {
    Composer,
    Form(FormId),
}

/// An exchange whose request has been built but whose reply is outstanding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingExchange {
    pub sequence: u64,
    pub origin: ExchangeOrigin,
    pub request: ChatRequest,
}

#[derive(Debug)]
pub struct ChatController {
    session: SessionToken,
    catalog: ProductCatalog,
    transcript: Transcript,
    chrome: ChromeState,
    next_sequence: u64,
    pending_scroll: Option<ScrollDirective>,
}

impl ChatController {
    pub fn new(session: SessionToken, catalog: ProductCatalog) -> Self {
        Self {
            session,
            catalog,
            transcript: Transcript::new(),
            chrome: ChromeState::default(),
            next_sequence: 0,
            pending_scroll: None,
        }
    }

    pub fn session(&self) -> &SessionToken {
        &self.session
    }

    pub fn catalog(&self) -> &ProductCatalog {
        &self.catalog
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn chrome(&self) -> ChromeState {
        self.chrome
    }

    pub fn toggle_chrome(&mut self) -> ChromeState {
        self.chrome.toggle();
        self.chrome
    }

    /// Edit access to one form block, for input handling.
    pub fn form_mut(&mut self, id: FormId) -> Option<&mut FormBlock> {
        self.transcript.form_mut(id)
    }

    /// The scroll request left by the most recent update, if not yet taken.
    pub fn take_scroll(&mut self) -> Option<ScrollDirective> {
        self.pending_scroll.take()
    }

    /// Append a typed message and prepare its exchange. Blank input is
    /// ignored.
    pub fn send_message(&mut self, text: &str) -> Option<PendingExchange> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        self.transcript.push_user(text);
        self.pending_scroll = Some(ScrollDirective::Bottom);
        Some(self.pending(ExchangeOrigin::Composer, text.to_string()))
    }

    /// Lock a form's submit control, note the submission in the transcript
    /// and prepare the exchange carrying the encoded payload.
    pub fn submit_form(&mut self, id: FormId) -> Result<PendingExchange, SubmitError> {
        let form = self
            .transcript
            .form_mut(id)
            .ok_or(SubmitError::UnknownForm(id))?;
        let payload = form.begin_submit()?;
        let message = match payload.to_chat_message() {
            Ok(message) => message,
            Err(err) => {
                form.fail_submit();
                return Err(err.into());
            }
        };
        info!(form = %id, confirmed = payload.confirmed.unwrap_or(false), "form submitted");

        self.transcript.push_user(FORM_SUBMITTED_NOTICE);
        self.pending_scroll = Some(ScrollDirective::Bottom);
        Ok(self.pending(ExchangeOrigin::Form(id), message))
    }

    fn pending(&mut self, origin: ExchangeOrigin, message: String) -> PendingExchange {
        self.next_sequence += 1;
        PendingExchange {
            sequence: self.next_sequence,
            origin,
            request: ChatRequest {
                message,
                session_id: self.session.as_str().to_string(),
            },
        }
    }

    /// Apply the result of an exchange. Never fails: transport problems are
    /// turned into a single error entry.
    pub fn complete_exchange(
        &mut self,
        pending: &PendingExchange,
        result: Result<ChatReply, TransportError>,
    ) -> ReplyOutcome {
        let outcome = match result {
            Ok(reply) => {
                let steps = plan_reply(&reply);
                apply_plan(steps, &mut self.transcript, &self.catalog)
            }
            Err(err) => {
                warn!(
                    sequence = pending.sequence,
                    origin = ?pending.origin,
                    error = %err,
                    "exchange failed"
                );
                self.fail_exchange(pending.origin)
            }
        };
        self.pending_scroll = Some(outcome.scroll);
        outcome
    }

    fn fail_exchange(&mut self, origin: ExchangeOrigin) -> ReplyOutcome {
        let message = match origin {
            ExchangeOrigin::Composer => SEND_FAILURE_MESSAGE,
            ExchangeOrigin::Form(id) => {
                if let Some(form) = self.transcript.form_mut(id) {
                    form.fail_submit();
                }
                SUBMIT_FAILURE_MESSAGE
            }
        };
        ReplyOutcome::error_only(self.transcript.push_bot(message))
    }
}

/// Run one pending exchange against a transport.
pub async fn run_exchange(
    transport: &dyn ChatTransport,
    pending: &PendingExchange,
) -> Result<ChatReply, TransportError> {
    info!(
        sequence = pending.sequence,
        origin = ?pending.origin,
        session = %pending.request.session_id,
        "sending exchange"
    );
    let reply = transport.exchange(&pending.request).await?;
    info!(
        sequence = pending.sequence,
        show_form = reply.wants_form(),
        has_error = reply.error.is_some(),
        "reply received"
    );
    Ok(reply)
}
