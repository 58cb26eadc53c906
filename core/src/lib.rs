//! Conversational order-form client core.
//!
//! Holds everything that decides *what* the chat widget shows: the session
//! token, the append-only transcript, the inline order form (prefill, product
//! locking, submission encoding), scroll directives, and the reply pipeline
//! that sequences a server reply into transcript updates. Presentation lives
//! in `showroom-tui`; nothing here touches a terminal.

pub mod catalog;
pub mod chrome;
pub mod config;
pub mod controller;
pub mod form;
pub mod reply;
pub mod scroll;
pub mod session;
pub mod transcript;
pub mod transport;

pub use catalog::ProductCatalog;
pub use chrome::ChromeState;
pub use config::ClientConfig;
pub use config::ConfigError;
pub use config::ConfigLoader;
pub use controller::ChatController;
pub use controller::ExchangeOrigin;
pub use controller::PendingExchange;
pub use controller::run_exchange;
pub use form::FieldKey;
pub use form::FormBlock;
pub use form::FormDescription;
pub use form::FormId;
pub use form::FormMode;
pub use form::FormPrefill;
pub use form::ProductField;
pub use form::SubmissionPayload;
pub use form::SubmitControl;
pub use form::SubmitError;
pub use reply::ReplyOutcome;
pub use reply::ReplyStep;
pub use scroll::ScrollBehavior;
pub use scroll::ScrollDirective;
pub use scroll::SmoothScroll;
pub use scroll::Viewport;
pub use session::SessionToken;
pub use transcript::EntryId;
pub use transcript::Role;
pub use transcript::Transcript;
pub use transcript::TranscriptItem;
pub use transport::ChatReply;
pub use transport::ChatRequest;
pub use transport::ChatTransport;
pub use transport::HttpTransport;
pub use transport::TransportError;
