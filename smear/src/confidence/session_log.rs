use std::sync::Arc;

use parking_lot::Mutex;

/// Append-only record of per-image confidences for one capture session.
///
/// Cloning yields another handle to the same log. Analysis runs only append;
/// the session owner reads it back for reporting and clears it when the
/// session ends.
#[derive(Debug, Clone, Default)]
pub struct ConfidenceLog {
    entries: Arc<Mutex<Vec<f32>>>,
}

impl ConfidenceLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, confidence: f32) {
        self.entries.lock().push(confidence);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Copy of all entries in append order.
    pub fn snapshot(&self) -> Vec<f32> {
        self.entries.lock().clone()
    }

    /// End-of-session reset. Only the session owner should call this.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}
