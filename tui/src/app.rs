//! Top-level application state and the main event loop.

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::Event;
use crossterm::event::EventStream;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use futures::StreamExt;
use ratatui::Frame;
use ratatui::Terminal;
use ratatui::backend::Backend;
use showroom_core::ChatController;
use showroom_core::ChatTransport;
use showroom_core::FormId;
use showroom_core::PendingExchange;
use showroom_core::SubmitError;
use showroom_core::run_exchange;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::app_event::AppEvent;
use crate::app_event_sender::AppEventSender;
use crate::composer::Composer;
use crate::composer::ComposerAction;
use crate::form_view;
use crate::form_view::FormFocus;
use crate::form_view::FormKeyOutcome;
use crate::key_hint;
use crate::transcript_view::TranscriptView;
use crate::ui;

/// Frame interval while a smooth scroll is running.
const ANIMATION_FRAME: Duration = Duration::from_millis(16);

#[derive(Debug, Clone)]
pub(crate) enum Focus {
    Composer,
    Form(FormFocus),
}

pub(crate) struct App {
    pub(crate) controller: ChatController,
    transport: Arc<dyn ChatTransport>,
    app_event_tx: AppEventSender,
    pub(crate) composer: Composer,
    pub(crate) focus: Focus,
    pub(crate) transcript_view: TranscriptView,
    pub(crate) markdown: bool,
    pub(crate) in_flight: usize,
}

impl App {
    pub(crate) fn new(
        controller: ChatController,
        transport: Arc<dyn ChatTransport>,
        app_event_tx: AppEventSender,
        markdown: bool,
    ) -> Self {
        Self {
            controller,
            transport,
            app_event_tx,
            composer: Composer::default(),
            focus: Focus::Composer,
            transcript_view: TranscriptView::default(),
            markdown,
            in_flight: 0,
        }
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        if key_hint::QUIT.is_press(key) || key_hint::ESCAPE.is_press(key) {
            self.app_event_tx.send(AppEvent::ExitRequest);
            return;
        }
        if key_hint::TOGGLE_CHROME.is_press(key) {
            let chrome = self.controller.toggle_chrome();
            debug!(?chrome, "chrome toggled");
            return;
        }
        if !self.controller.chrome().is_open() {
            return;
        }

        if key_hint::PAGE_UP.is_press(key) {
            self.transcript_view.page(-1);
        } else if key_hint::PAGE_DOWN.is_press(key) {
            self.transcript_view.page(1);
        } else if key_hint::NEXT_FOCUS.is_press(key) {
            self.cycle_focus(true);
        } else if key_hint::PREV_FOCUS.is_press(key) {
            self.cycle_focus(false);
        } else if key_hint::OLDER_FORM.is_press(key) {
            self.select_form(-1);
        } else if key_hint::NEWER_FORM.is_press(key) {
            self.select_form(1);
        } else {
            self.dispatch_key(key);
        }
    }

    pub(crate) fn handle_paste(&mut self, text: &str) {
        if matches!(self.focus, Focus::Composer) && self.controller.chrome().is_open() {
            self.composer.insert_str(text);
        }
    }

    fn dispatch_key(&mut self, key: KeyEvent) {
        match &mut self.focus {
            Focus::Composer => {
                if let ComposerAction::Send(text) = self.composer.handle_key(key) {
                    self.send_message(&text);
                }
            }
            Focus::Form(focus) => {
                let id = focus.id;
                let Some(form) = self.controller.form_mut(id) else {
                    self.focus = Focus::Composer;
                    return;
                };
                if form_view::handle_key(form, focus, key) == FormKeyOutcome::Submit {
                    self.submit_form(id);
                }
            }
        }
    }

    fn send_message(&mut self, text: &str) {
        if let Some(pending) = self.controller.send_message(text) {
            self.sync_scroll();
            self.spawn_exchange(pending);
        }
    }

    fn submit_form(&mut self, id: FormId) {
        match self.controller.submit_form(id) {
            Ok(pending) => {
                self.sync_scroll();
                self.spawn_exchange(pending);
            }
            Err(SubmitError::AlreadySubmitted(id)) => {
                debug!(form = %id, "submit ignored while control is disabled");
            }
            Err(err) => warn!(form = %id, "form submit failed: {err}"),
        }
    }

    fn spawn_exchange(&mut self, pending: PendingExchange) {
        self.in_flight += 1;
        let transport = Arc::clone(&self.transport);
        let tx = self.app_event_tx.clone();
        tokio::spawn(async move {
            let result = run_exchange(transport.as_ref(), &pending).await;
            tx.send(AppEvent::ExchangeFinished { pending, result });
        });
    }

    fn sync_scroll(&mut self) {
        if let Some(directive) = self.controller.take_scroll() {
            self.transcript_view.request(directive);
        }
    }

    /// Apply a background event. Returns `false` when the app should exit.
    pub(crate) fn handle_app_event(&mut self, event: AppEvent) -> bool {
        match event {
            AppEvent::ExchangeFinished { pending, result } => {
                self.in_flight = self.in_flight.saturating_sub(1);
                let outcome = self.controller.complete_exchange(&pending, result);
                debug!(sequence = pending.sequence, ?outcome, "exchange applied");
                self.sync_scroll();
                true
            }
            AppEvent::ExitRequest => false,
        }
    }

    /// Tab walks composer → latest form fields → composer; shift+tab walks
    /// back.
    fn cycle_focus(&mut self, forward: bool) {
        let transcript = self.controller.transcript();
        let next = match &self.focus {
            Focus::Composer => transcript
                .latest_form()
                .and_then(|id| transcript.form(id))
                .map(|form| {
                    Focus::Form(if forward {
                        FormFocus::first(form)
                    } else {
                        FormFocus::last(form)
                    })
                }),
            Focus::Form(focus) => {
                let mut focus = focus.clone();
                match transcript.form(focus.id) {
                    Some(form) if focus.advance(form, if forward { 1 } else { -1 }) => {
                        Some(Focus::Form(focus))
                    }
                    _ => Some(Focus::Composer),
                }
            }
        };
        if let Some(next) = next {
            self.set_focus(next);
        }
    }

    /// Move focus to an older (`-1`) or newer (`1`) form. Past the newest
    /// form, focus returns to the composer.
    fn select_form(&mut self, direction: isize) {
        let transcript = self.controller.transcript();
        let ids = transcript.form_ids();
        let target = match &self.focus {
            Focus::Composer if direction < 0 => ids.last().copied(),
            Focus::Composer => None,
            Focus::Form(focus) => {
                let Some(position) = ids.iter().position(|id| *id == focus.id) else {
                    self.set_focus(Focus::Composer);
                    return;
                };
                match position.checked_add_signed(direction) {
                    Some(i) if i < ids.len() => Some(ids[i]),
                    Some(_) => {
                        self.set_focus(Focus::Composer);
                        return;
                    }
                    None => Some(ids[position]),
                }
            }
        };
        if let Some(form) = target.and_then(|id| transcript.form(id)) {
            self.set_focus(Focus::Form(FormFocus::first(form)));
        }
    }

    fn set_focus(&mut self, focus: Focus) {
        if let Focus::Form(form_focus) = &focus {
            if let Some(entry) = self.controller.transcript().entry_of_form(form_focus.id) {
                self.transcript_view.reveal(entry);
            }
        }
        self.focus = focus;
    }

    pub(crate) fn form_focus(&self) -> Option<&FormFocus> {
        match &self.focus {
            Focus::Form(focus) => Some(focus),
            Focus::Composer => None,
        }
    }

    pub(crate) fn render(&mut self, frame: &mut Frame) {
        ui::render(self, frame);
    }
}

/// Drive `app` until an exit is requested or the terminal stream ends.
pub(crate) async fn run<B: Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    mut app_event_rx: UnboundedReceiver<AppEvent>,
) -> anyhow::Result<()> {
    let mut events = EventStream::new();
    let mut frame_tick = tokio::time::interval(ANIMATION_FRAME);
    frame_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    info!(session = %app.controller.session(), "chat session started");
    loop {
        terminal.draw(|frame| app.render(frame))?;

        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) => app.handle_key(key),
                Some(Ok(Event::Paste(text))) => app.handle_paste(&text),
                Some(Ok(_)) => {}
                Some(Err(err)) => return Err(err.into()),
                None => break,
            },
            Some(event) = app_event_rx.recv() => {
                if !app.handle_app_event(event) {
                    break;
                }
            }
            _ = frame_tick.tick(), if app.transcript_view.is_animating() => {
                app.transcript_view.tick();
            }
        }
    }
    info!("chat session ended");
    Ok(())
}
