//! Upload mode classification.
//!
//! The mode is a pure function of the options and can be recomputed at any
//! time; nothing is cached. The only fatal configuration is requesting
//! immediate uploads without an endpoint URL.

use serde::{Deserialize, Serialize};

use crate::options::UploadOptions;

/// When uploads start relative to file selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timing {
    /// Upload as soon as a file passes validation.
    Immediate,
    /// Upload only on an explicit call.
    Deferred,
}

/// Which transport flow drives the upload. Absent means direct multipart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Presigned,
    Chunked,
}

/// The classified upload mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadMode {
    pub timing: Timing,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<Strategy>,
}

impl UploadMode {
    pub fn is_immediate(&self) -> bool {
        self.timing == Timing::Immediate
    }
}

/// Errors produced while classifying upload options.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ModeError {
    #[error("immediate uploads require an endpoint URL")]
    MissingEndpoint,
}

/// Classifies options into an upload mode.
///
/// Presigned takes precedence over chunked when both are configured.
pub fn classify(options: &UploadOptions) -> Result<UploadMode, ModeError> {
    let timing = if options.immediate {
        if options.url.is_empty() {
            return Err(ModeError::MissingEndpoint);
        }
        Timing::Immediate
    } else {
        Timing::Deferred
    };

    let strategy = if options.presigned {
        Some(Strategy::Presigned)
    } else if options.chunk_size.is_some() {
        Some(Strategy::Chunked)
    } else {
        None
    };

    Ok(UploadMode { timing, strategy })
}
