use std::sync::{Arc, Mutex, PoisonError};

use super::{Notice, Notifier};

/// A notifier that logs through `tracing`, or records into a buffer.
#[derive(Clone, Default)]
pub struct LogNotifier {
    buffer: Option<Arc<Mutex<Vec<Notice>>>>,
}

impl LogNotifier {
    pub fn new() -> Self {
        LogNotifier { buffer: None }
    }

    pub fn with_buffer(buffer: Arc<Mutex<Vec<Notice>>>) -> Self {
        LogNotifier {
            buffer: Some(buffer),
        }
    }
}

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        if let Some(buffer) = &self.buffer {
            buffer
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(notice);
            return;
        }

        match &notice {
            Notice::Success(message) => tracing::info!(notice = %message, "success"),
            Notice::Failure(message) => tracing::warn!(notice = %message, "failure"),
        }
    }
}
