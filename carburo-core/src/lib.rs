//! Core types and service wiring for the carburo fuel price browser.

/// Domain models and identifiers shared by the providers and the UI.
pub mod model;
/// Provider bundle handed to the service.
pub mod plugin;
/// Traits describing the provider interfaces.
pub mod ports;
/// Turning station listings into display lists.
pub mod render;
/// Weekly opening-hours parsing and evaluation.
pub mod schedule;
/// Selection state machine driving catalog and listing requests.
pub mod selection;
/// High-level service facade used by clients.
pub mod service;
/// Cancellable "latest request wins" slots for background fetches.
pub mod task;

pub use model::*;
pub use plugin::*;
pub use ports::*;
pub use render::*;
pub use schedule::*;
pub use selection::*;
pub use service::*;
pub use task::*;
