//! Transport trait seams.
//!
//! The coordinator never talks to the network itself. The host app provides
//! an [`HttpTransport`] for the direct and presigned flows and a
//! [`ChunkedTransport`] for the resumable flow. Using traits keeps the
//! strategy logic decoupled from the wire and testable with mocks.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use airlift_protocol::RawFile;
use tokio::sync::mpsc;

/// Error rejected by a transport.
///
/// `server_message` carries the error body the remote endpoint returned,
/// when it returned one; `message` is the transport's own description.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
    pub server_message: Option<String>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            server_message: None,
        }
    }

    pub fn with_server_message(mut self, msg: impl Into<String>) -> Self {
        self.server_message = Some(msg.into());
        self
    }
}

/// Progress callback: `(bytes_sent, bytes_total)`.
pub type ProgressFn = Box<dyn Fn(u64, u64) + Send + Sync>;

/// The body of an outgoing request.
pub enum RequestBody {
    /// A file wrapped in a multipart form (direct flow).
    Multipart(RawFile),
    /// Raw file bytes (presigned transfer step).
    Raw(RawFile),
    /// A JSON payload (presigned metadata step).
    Json(serde_json::Value),
}

/// A single HTTP exchange.
pub struct TransportRequest {
    /// Lowercase method name, e.g. `"post"`.
    pub method: String,
    pub url: String,
    pub body: RequestBody,
    pub headers: HashMap<String, String>,
    /// Invoked as the body is sent. `None` when progress is irrelevant
    /// (the presigned metadata step).
    pub on_progress: Option<ProgressFn>,
}

/// The settled response of an exchange.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub data: serde_json::Value,
}

/// Transport for the direct and presigned flows.
///
/// Implemented by the host app on top of its HTTP client. The same
/// `Pin<Box<dyn Future>>` shape as the rest of the codebase keeps the
/// trait object-safe without an async-trait dependency.
pub trait HttpTransport: Send + Sync {
    fn request(
        &self,
        req: TransportRequest,
    ) -> Pin<Box<dyn Future<Output = Result<TransportResponse, TransportError>> + Send + '_>>;
}

/// Options handed to the chunked transport when an attempt starts.
pub struct ChunkedOptions {
    pub endpoint: String,
    /// Uppercase method name, e.g. `"POST"`.
    pub method: String,
    pub file: RawFile,
    pub chunk_size: u64,
    pub headers: HashMap<String, String>,
}

/// Notifications emitted by a chunked upload attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkedEvent {
    /// Percentage complete, 0-100.
    Progress(u8),
    Success,
    Error(String),
}

/// Live controls of a chunked upload attempt.
pub trait ChunkedHandle: Send + Sync {
    fn pause(&self);
    fn resume(&self);
    fn abort(&self);
}

/// Transport for the chunked/resumable flow.
///
/// `create` starts the attempt and delivers [`ChunkedEvent`]s on `events`
/// until a terminal `Success` or `Error`. The returned handle stays valid
/// for the lifetime of the attempt.
pub trait ChunkedTransport: Send + Sync {
    fn create(
        &self,
        options: ChunkedOptions,
        events: mpsc::UnboundedSender<ChunkedEvent>,
    ) -> Result<Box<dyn ChunkedHandle>, TransportError>;
}
