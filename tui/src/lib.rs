//! Terminal front end for the showroom chat assistant.
//!
//! Draws the transcript and its inline order forms with ratatui and runs
//! every exchange on a background task, so the panel stays responsive while
//! replies are outstanding.

mod app;
mod app_event;
mod app_event_sender;
mod cli;
mod composer;
mod form_view;
mod key_hint;
mod logging;
mod markdown;
mod terminal;
mod text_input;
mod transcript_view;
mod ui;

use std::sync::Arc;

use showroom_core::ChatController;
use showroom_core::HttpTransport;
use showroom_core::SessionToken;
use tokio::sync::mpsc::unbounded_channel;
use tracing::info;

pub use cli::Cli;

use crate::app::App;
use crate::app_event_sender::AppEventSender;
use crate::terminal::TerminalGuard;

pub async fn run_main(cli: Cli) -> anyhow::Result<()> {
    let config = cli.load_config()?;
    let _log_guard = logging::init(&config.log_dir)?;

    let transport = HttpTransport::new(config.endpoint.clone(), config.timeout)?;
    let session = SessionToken::generate();
    info!(
        endpoint = %config.endpoint,
        timeout_ms = config.timeout.map(|t| t.as_millis() as u64),
        products = config.catalog.len(),
        "configuration loaded"
    );

    let controller = ChatController::new(session, config.catalog);
    let (app_event_tx, app_event_rx) = unbounded_channel();
    let app = App::new(
        controller,
        Arc::new(transport),
        AppEventSender::new(app_event_tx),
        config.markdown,
    );

    let (_guard, mut terminal) = TerminalGuard::enter()?;
    app::run(&mut terminal, app, app_event_rx).await
}
