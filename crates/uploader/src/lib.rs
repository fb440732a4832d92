//! Client-side upload coordination: validation, per-file lifecycle
//! tracking, and strategy dispatch.
//!
//! This crate implements the **business logic** between a file-selection
//! control and the wire. It is a library crate with no UI or HTTP client
//! dependencies — the host app provides [`HttpTransport`] and
//! [`ChunkedTransport`] implementations that bridge to its actual network
//! stack, and a thin adapter that feeds selection events into
//! [`Uploader::on_selection`].
//!
//! # Flow
//!
//! 1. **Select** — the adapter hands over a batch of [`RawFile`]s
//! 2. **Validate** — size, type and count checks gate entry into the collection
//! 3. **Track** — accepted files become [`TrackedFile`] records
//! 4. **Upload** — direct, presigned or chunked, per the classified mode
//! 5. **Settle** — progress, completion and errors land on the records and
//!    the shared error state

mod collection;
mod errors;
mod file;
mod strategy;
mod transport;
mod validation;

pub use airlift_protocol::{
    ModeError, OptionsError, RawFile, Strategy, Timing, UploadMode, UploadOptions,
};
pub use collection::Uploader;
pub use errors::{ErrorBag, ErrorSlot, ErrorState};
pub use file::{FileInfo, TrackedFile};
pub use transport::{
    ChunkedEvent, ChunkedHandle, ChunkedOptions, ChunkedTransport, HttpTransport, ProgressFn,
    RequestBody, TransportError, TransportRequest, TransportResponse,
};
pub use validation::Validator;

/// Errors surfaced to callers of the coordinator.
///
/// Validation and transport failures are absorbed into the per-category
/// error state instead; only configuration problems and unknown identities
/// come back as `Err`.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("invalid options: {0}")]
    Options(#[from] airlift_protocol::OptionsError),

    #[error(transparent)]
    Mode(#[from] airlift_protocol::ModeError),

    #[error("no tracked file with id {0}")]
    UnknownFile(u64),
}
