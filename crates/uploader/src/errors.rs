//! Per-category error aggregation.
//!
//! At most one active message per category. Concurrent failure callbacks
//! may write at the same time; each write touches only its own slot, so
//! the result is last-writer-wins per category.

use std::sync::RwLock;

use serde::Serialize;

/// The four error categories, in display priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSlot {
    FileLimit,
    SizeLimit,
    Type,
    Endpoint,
}

/// A plain snapshot of the aggregated error state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorState {
    pub file_limit: Option<String>,
    pub size_limit: Option<String>,
    #[serde(rename = "type")]
    pub file_type: Option<String>,
    pub endpoint: Option<String>,
}

impl ErrorState {
    /// The first active message, in fixed category order.
    pub fn first(&self) -> Option<&str> {
        self.file_limit
            .as_deref()
            .or(self.size_limit.as_deref())
            .or(self.file_type.as_deref())
            .or(self.endpoint.as_deref())
    }

    pub fn has_errors(&self) -> bool {
        self.first().is_some()
    }
}

/// Thread-safe error aggregator shared by validation and transport callbacks.
#[derive(Debug, Default)]
pub struct ErrorBag {
    inner: RwLock<ErrorState>,
}

impl ErrorBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a slot, overwriting any prior message in that category.
    pub fn set(&self, slot: ErrorSlot, message: impl Into<String>) {
        let mut state = self.inner.write().unwrap();
        let message = Some(message.into());
        match slot {
            ErrorSlot::FileLimit => state.file_limit = message,
            ErrorSlot::SizeLimit => state.size_limit = message,
            ErrorSlot::Type => state.file_type = message,
            ErrorSlot::Endpoint => state.endpoint = message,
        }
    }

    /// Clears all slots. Idempotent.
    pub fn clear(&self) {
        let mut state = self.inner.write().unwrap();
        *state = ErrorState::default();
    }

    pub fn has_errors(&self) -> bool {
        self.inner.read().unwrap().has_errors()
    }

    /// The first active message, in fixed category order.
    pub fn first(&self) -> Option<String> {
        self.inner.read().unwrap().first().map(String::from)
    }

    pub fn get(&self, slot: ErrorSlot) -> Option<String> {
        let state = self.inner.read().unwrap();
        match slot {
            ErrorSlot::FileLimit => state.file_limit.clone(),
            ErrorSlot::SizeLimit => state.size_limit.clone(),
            ErrorSlot::Type => state.file_type.clone(),
            ErrorSlot::Endpoint => state.endpoint.clone(),
        }
    }

    pub fn snapshot(&self) -> ErrorState {
        self.inner.read().unwrap().clone()
    }
}
