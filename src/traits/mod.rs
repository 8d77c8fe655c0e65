//! Core trait abstractions at the engine's seams.
//!
//! [`AssetTransfer`] is the external custody collaborator every
//! asset-moving operation goes through; [`EventSink`] receives the
//! notifications completed operations emit.

mod asset_transfer;
mod event_sink;

pub use asset_transfer::{AssetTransfer, TransferError};
pub use event_sink::EventSink;
