use showroom_core::ChatReply;
use showroom_core::PendingExchange;
use showroom_core::TransportError;

/// Events delivered to the main loop from background tasks.
#[derive(Debug)]
pub(crate) enum AppEvent {
    /// A spawned exchange finished, successfully or not.
    ExchangeFinished {
        pending: PendingExchange,
        result: Result<ChatReply, TransportError>,
    },

    /// Leave the main loop.
    ExitRequest,
}
