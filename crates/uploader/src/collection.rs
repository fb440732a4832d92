//! The upload coordinator façade: the ordered file collection, identity
//! allocation, validation on entry, and strategy dispatch.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use airlift_protocol::{ModeError, RawFile, Strategy, UploadMode, UploadOptions, classify};
use futures_util::future::join_all;
use tracing::debug;

use crate::UploadError;
use crate::errors::{ErrorBag, ErrorState};
use crate::file::TrackedFile;
use crate::strategy;
use crate::transport::{ChunkedTransport, HttpTransport};
use crate::validation::Validator;

/// Coordinates uploads for one selection control.
///
/// Owns the ordered collection of tracked files (most recent first), the
/// session-scoped identity counter and the shared error state. Transports
/// are provided by the host app; see [`crate::transport`].
pub struct Uploader {
    options: UploadOptions,
    errors: Arc<ErrorBag>,
    files: RwLock<Vec<Arc<TrackedFile>>>,
    next_id: AtomicU64,
    http: Arc<dyn HttpTransport>,
    chunked: Arc<dyn ChunkedTransport>,
}

impl Uploader {
    /// Builds a coordinator, validating the options first.
    pub fn new(
        options: UploadOptions,
        http: Arc<dyn HttpTransport>,
        chunked: Arc<dyn ChunkedTransport>,
    ) -> Result<Self, UploadError> {
        options.validate()?;
        Ok(Self {
            options,
            errors: Arc::new(ErrorBag::new()),
            files: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
            http,
            chunked,
        })
    }

    pub fn options(&self) -> &UploadOptions {
        &self.options
    }

    /// Classifies the current options into an upload mode.
    pub fn mode(&self) -> Result<UploadMode, ModeError> {
        classify(&self.options)
    }

    // --- collection ---

    /// Validates one candidate and, if accepted, prepends a tracked record.
    ///
    /// Size and type failures land in the error state; the candidate is not
    /// inserted and `false` is returned.
    pub fn add_file(&self, candidate: RawFile) -> bool {
        let validator = Validator::new(&self.options, &self.errors);
        if !validator.check_size(&candidate) || !validator.check_type(&candidate) {
            return false;
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let file = Arc::new(TrackedFile::new(id, candidate, self.options.format_size));
        debug!(id, file = %file.name(), size = file.size(), "file added");
        self.files.write().unwrap().insert(0, file);
        true
    }

    /// Adds a batch of candidates.
    ///
    /// The count check runs against the whole batch first; a failure rejects
    /// the batch outright. Individual candidates are then added in order.
    /// With `stop_on_error` set, the first rejected candidate halts the rest
    /// (already-added files stay). Returns the accepted records.
    pub fn add_batch(&self, candidates: Vec<RawFile>) -> Vec<Arc<TrackedFile>> {
        let validator = Validator::new(&self.options, &self.errors);
        if !validator.check_count(candidates.len(), self.len()) {
            return Vec::new();
        }

        let mut accepted = Vec::new();
        for candidate in candidates {
            if self.add_file(candidate) {
                let files = self.files.read().unwrap();
                accepted.push(Arc::clone(&files[0]));
            } else if self.options.stop_on_error {
                break;
            }
        }
        accepted
    }

    /// Removes the record with the given identity. No-op if absent.
    pub fn remove_file(&self, id: u64) -> bool {
        let mut files = self.files.write().unwrap();
        match files.iter().position(|f| f.id() == id) {
            Some(index) => {
                files.remove(index);
                true
            }
            None => false,
        }
    }

    /// Removes the record at an ordinal position. Out-of-range is a no-op.
    pub fn remove_file_at(&self, index: usize) {
        let mut files = self.files.write().unwrap();
        if index < files.len() {
            files.remove(index);
        }
    }

    /// Empties the collection. The identity counter keeps running.
    pub fn clear_files(&self) {
        self.files.write().unwrap().clear();
    }

    /// The tracked files, most recent first.
    pub fn files(&self) -> Vec<Arc<TrackedFile>> {
        self.files.read().unwrap().clone()
    }

    /// The record with the given identity, if tracked.
    pub fn file(&self, id: u64) -> Option<Arc<TrackedFile>> {
        self.files
            .read()
            .unwrap()
            .iter()
            .find(|f| f.id() == id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.files.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.read().unwrap().is_empty()
    }

    // --- errors ---

    pub fn errors(&self) -> ErrorState {
        self.errors.snapshot()
    }

    pub fn first_error(&self) -> Option<String> {
        self.errors.first()
    }

    pub fn has_errors(&self) -> bool {
        self.errors.has_errors()
    }

    pub fn clear_errors(&self) {
        self.errors.clear();
    }

    // --- uploads ---

    /// Uploads one tracked file using the classified strategy.
    ///
    /// Transport failures are absorbed into the error state; the only `Err`
    /// outcomes are a fatal mode classification and an unknown identity.
    /// Re-invoking on a completed or in-flight record re-runs the strategy
    /// from scratch.
    pub async fn upload(
        &self,
        id: u64,
        extra_headers: Option<&HashMap<String, String>>,
    ) -> Result<(), UploadError> {
        let mode = self.mode()?;
        let file = self.file(id).ok_or(UploadError::UnknownFile(id))?;
        self.run_strategy(&mode, &file, extra_headers).await;
        Ok(())
    }

    /// Handles a selection event from the input-control adapter: clears the
    /// error state, validates and adds the batch, and — in immediate mode —
    /// starts every accepted file uploading concurrently, settling them all.
    pub async fn on_selection(&self, candidates: Vec<RawFile>) -> Result<(), UploadError> {
        self.clear_errors();
        let accepted = self.add_batch(candidates);

        let mode = self.mode()?;
        if mode.is_immediate() {
            join_all(
                accepted
                    .iter()
                    .map(|file| self.run_strategy(&mode, file, None)),
            )
            .await;
        }
        Ok(())
    }

    async fn run_strategy(
        &self,
        mode: &UploadMode,
        file: &Arc<TrackedFile>,
        extra_headers: Option<&HashMap<String, String>>,
    ) {
        match mode.strategy {
            None => {
                strategy::run_direct(file, &self.options, &*self.http, &self.errors, extra_headers)
                    .await
            }
            Some(Strategy::Presigned) => {
                strategy::run_presigned(
                    file,
                    &self.options,
                    &*self.http,
                    &self.errors,
                    extra_headers,
                )
                .await
            }
            Some(Strategy::Chunked) => {
                strategy::run_chunked(
                    file,
                    &self.options,
                    &*self.chunked,
                    &self.errors,
                    extra_headers,
                )
                .await
            }
        }
    }
}
