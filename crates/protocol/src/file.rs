//! Raw file descriptor produced by the selection boundary.

use serde::{Deserialize, Serialize};

/// A selected file as handed over by the input-control adapter: metadata
/// plus the binary content. The coordinator treats `data` as opaque and
/// only forwards it to a transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFile {
    pub name: String,
    /// Declared size in bytes.
    pub size: u64,
    /// Declared MIME type, e.g. `"image/png"`. May be empty or malformed.
    pub content_type: String,
    #[serde(skip)]
    pub data: Vec<u8>,
}

impl RawFile {
    /// Builds a descriptor from in-memory content.
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            size: data.len() as u64,
            content_type: content_type.into(),
            data,
        }
    }

    /// The substring after the last `.` in the name, if any.
    pub fn extension(&self) -> Option<&str> {
        self.name.rsplit_once('.').map(|(_, ext)| ext)
    }
}
