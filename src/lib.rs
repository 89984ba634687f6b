//! Event-filtering gate for a monitoring pipeline.
//!
//! Given an incoming event and a handler's configured filter set, decide
//! whether the event is suppressed or delivered to that handler. Decisions
//! are stateless per (event, handler) pair; misconfigured filters fail open
//! (event delivered) and are reported through `tracing` warnings.

pub mod config;
pub mod event;
pub mod expr;
pub mod gate;
pub mod handler;

pub use config::HandlersConfig;
pub use event::Event;
pub use gate::{filter_matches, should_suppress};
pub use handler::{Filter, FilterAction, Handler, HandlerKind, HandlerSocket, ValidationError};
