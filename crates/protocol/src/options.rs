//! Upload session configuration.
//!
//! The options surface mirrors the JSON shape the host application
//! configures the uploader with, so everything deserializes from
//! camelCase with sensible defaults.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::format::SizeUnit;
use crate::messages;

/// Chunk sizes must be a positive multiple of this block size.
pub const CHUNK_BLOCK_SIZE: u64 = 256;

/// HTTP method used for the upload request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    #[default]
    #[serde(rename = "post")]
    Post,
    #[serde(rename = "put")]
    Put,
    #[serde(rename = "patch")]
    Patch,
}

impl HttpMethod {
    /// Lowercase form, as configured.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Patch => "patch",
        }
    }

    /// Uppercase form, required by the chunked transport.
    pub fn as_upper(&self) -> &'static str {
        match self {
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
        }
    }
}

/// Errors produced while validating upload options.
#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    #[error("chunk size {0} must be a positive multiple of {CHUNK_BLOCK_SIZE}")]
    InvalidChunkSize(u64),
}

/// Configuration for an upload session. Immutable once the uploader is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadOptions {
    /// Endpoint URL. Required for immediate uploads.
    pub url: String,
    pub method: HttpMethod,
    /// Use the presigned two-phase flow instead of a direct POST.
    pub presigned: bool,
    /// Chunk size in bytes; enables the chunked/resumable flow when set.
    pub chunk_size: Option<u64>,
    /// Whether the selection control accepts more than one file.
    pub multiple: bool,
    /// Comma-separated MIME/extension globs, e.g. `"image/*,.pdf"`.
    pub accepts: Option<String>,
    pub file_limit: Option<usize>,
    /// Maximum file size in bytes.
    pub size_limit: Option<u64>,
    /// Unit preference for human-readable sizes.
    pub format_size: SizeUnit,
    /// Stop adding the rest of a batch after the first rejected file.
    pub stop_on_error: bool,
    pub file_limit_message: String,
    pub size_limit_message: String,
    pub type_message: String,
    pub endpoint_message: String,
    /// Upload on selection rather than on an explicit call.
    pub immediate: bool,
    /// Extra headers merged into every upload request.
    pub headers: HashMap<String, String>,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            url: String::new(),
            method: HttpMethod::default(),
            presigned: false,
            chunk_size: None,
            multiple: false,
            accepts: None,
            file_limit: None,
            size_limit: None,
            format_size: SizeUnit::default(),
            stop_on_error: false,
            file_limit_message: messages::DEFAULT_FILE_LIMIT_MESSAGE.to_string(),
            size_limit_message: messages::DEFAULT_SIZE_LIMIT_MESSAGE.to_string(),
            type_message: messages::DEFAULT_TYPE_MESSAGE.to_string(),
            endpoint_message: messages::DEFAULT_ENDPOINT_MESSAGE.to_string(),
            immediate: false,
            headers: HashMap::new(),
        }
    }
}

impl UploadOptions {
    /// Validates invariants that cannot be expressed in the types.
    ///
    /// Currently only the chunk-size rule: a configured chunk size must be
    /// a positive multiple of [`CHUNK_BLOCK_SIZE`].
    pub fn validate(&self) -> Result<(), OptionsError> {
        if let Some(size) = self.chunk_size {
            if size == 0 || size % CHUNK_BLOCK_SIZE != 0 {
                return Err(OptionsError::InvalidChunkSize(size));
            }
        }
        Ok(())
    }
}
