//! Tracked-file record and lifecycle state.

use std::sync::{Arc, RwLock};

use airlift_protocol::{RawFile, SizeUnit, format_size};
use serde::Serialize;

use crate::transport::ChunkedHandle;

/// Mutable lifecycle state, guarded so transport callbacks can update it
/// while the collection is read elsewhere.
#[derive(Default)]
struct FileState {
    progress: u8,
    completed: bool,
    processing: bool,
    response: Option<serde_json::Value>,
    /// Present only while a chunked attempt is live.
    control: Option<Arc<dyn ChunkedHandle>>,
}

/// A plain snapshot of a tracked file for display or serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    pub id: u64,
    pub name: String,
    pub size: u64,
    pub content_type: String,
    pub extension: Option<String>,
    pub formatted_size: String,
    pub progress: u8,
    pub completed: bool,
    pub processing: bool,
}

/// A file accepted into the collection.
///
/// Identity and metadata are fixed at creation; progress, completion and
/// the response payload are mutated by the file's own upload attempts.
pub struct TrackedFile {
    id: u64,
    raw: RawFile,
    extension: Option<String>,
    formatted_size: String,
    state: RwLock<FileState>,
}

impl TrackedFile {
    pub(crate) fn new(id: u64, raw: RawFile, size_unit: SizeUnit) -> Self {
        let extension = raw.extension().map(String::from);
        let formatted_size = format_size(raw.size, size_unit);
        Self {
            id,
            raw,
            extension,
            formatted_size,
            state: RwLock::new(FileState::default()),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.raw.name
    }

    pub fn size(&self) -> u64 {
        self.raw.size
    }

    pub fn content_type(&self) -> &str {
        &self.raw.content_type
    }

    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    pub fn formatted_size(&self) -> &str {
        &self.formatted_size
    }

    /// The underlying raw file, cloned for handing to a transport.
    pub(crate) fn raw(&self) -> RawFile {
        self.raw.clone()
    }

    pub fn progress(&self) -> u8 {
        self.state.read().unwrap().progress
    }

    pub fn completed(&self) -> bool {
        self.state.read().unwrap().completed
    }

    pub fn processing(&self) -> bool {
        self.state.read().unwrap().processing
    }

    pub fn response(&self) -> Option<serde_json::Value> {
        self.state.read().unwrap().response.clone()
    }

    /// Updates progress. Non-increasing updates are dropped so the value
    /// stays monotonic until a new attempt resets it.
    pub(crate) fn set_progress(&self, percent: u8) {
        let mut s = self.state.write().unwrap();
        if percent > s.progress {
            s.progress = percent.min(100);
        }
    }

    /// Resets progress at the start of a fresh attempt.
    pub(crate) fn reset_progress(&self) {
        self.state.write().unwrap().progress = 0;
    }

    pub(crate) fn set_completed(&self, completed: bool) {
        self.state.write().unwrap().completed = completed;
    }

    pub(crate) fn set_processing(&self, processing: bool) {
        self.state.write().unwrap().processing = processing;
    }

    pub(crate) fn set_response(&self, response: serde_json::Value) {
        self.state.write().unwrap().response = Some(response);
    }

    pub(crate) fn attach_control(&self, control: Arc<dyn ChunkedHandle>) {
        self.state.write().unwrap().control = Some(control);
    }

    pub(crate) fn detach_control(&self) {
        self.state.write().unwrap().control = None;
    }

    fn control(&self) -> Option<Arc<dyn ChunkedHandle>> {
        self.state.read().unwrap().control.clone()
    }

    /// Pauses a live chunked attempt. No-op otherwise.
    pub fn pause(&self) {
        if let Some(control) = self.control() {
            control.pause();
        }
    }

    /// Resumes a paused chunked attempt. No-op otherwise.
    pub fn resume(&self) {
        if let Some(control) = self.control() {
            control.resume();
        }
    }

    /// Cancels a live chunked attempt. No-op otherwise.
    pub fn cancel(&self) {
        if let Some(control) = self.control() {
            control.abort();
        }
    }

    pub fn info(&self) -> FileInfo {
        let s = self.state.read().unwrap();
        FileInfo {
            id: self.id,
            name: self.raw.name.clone(),
            size: self.raw.size,
            content_type: self.raw.content_type.clone(),
            extension: self.extension.clone(),
            formatted_size: self.formatted_size.clone(),
            progress: s.progress,
            completed: s.completed,
            processing: s.processing,
        }
    }
}

/// Converts a sent/total byte pair into a rounded percentage.
pub(crate) fn percent(sent: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (sent as f64 / total as f64 * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}
