//! User-facing notices for rejected cart mutations.

use std::sync::{Arc, Mutex, PoisonError};

use crate::error::CartOperation;

/// A message for the shopper explaining why a cart change did not happen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub operation: CartOperation,
    pub message: &'static str,
}

/// Receives one notice per rejected mutation.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: &Notice);
}

/// Emits notices as `warn` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: &Notice) {
        tracing::warn!(operation = %notice.operation, "{}", notice.message);
    }
}

/// Keeps every notice; clones share the same list.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All notices received so far, oldest first.
    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Messages of all notices received so far.
    #[must_use]
    pub fn messages(&self) -> Vec<&'static str> {
        self.notices().iter().map(|n| n.message).collect()
    }

    /// Remove and return all notices.
    pub fn take(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: &Notice) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice.clone());
    }
}
