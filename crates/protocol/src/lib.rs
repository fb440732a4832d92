//! Shared types for the Airlift upload coordinator.
//!
//! This crate defines the configuration surface consumed by the uploader
//! core, the upload-mode classifier, the raw-file descriptor produced by
//! the selection boundary, and the small pure utilities (byte-size
//! formatting, error-message templates) both sides agree on.

pub mod file;
pub mod format;
pub mod messages;
pub mod mode;
pub mod options;

// Re-export primary types for convenience.
pub use file::RawFile;
pub use format::{SizeUnit, format_size};
pub use messages::render;
pub use mode::{ModeError, Strategy, Timing, UploadMode, classify};
pub use options::{CHUNK_BLOCK_SIZE, HttpMethod, OptionsError, UploadOptions};
