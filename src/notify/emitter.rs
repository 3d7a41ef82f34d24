use std::sync::{Mutex, PoisonError};

use event_emitter_rs::EventEmitter;

use super::{Notice, Notifier};

/// A notifier that emits `"success"` / `"failure"` events to in-process listeners.
///
/// Listeners receive the notice message.
pub struct EmitterNotifier {
    emitter: Mutex<EventEmitter>,
}

impl EmitterNotifier {
    pub fn new(emitter: EventEmitter) -> Self {
        EmitterNotifier {
            emitter: Mutex::new(emitter),
        }
    }
}

impl Notifier for EmitterNotifier {
    fn notify(&self, notice: Notice) {
        let kind = notice.kind();
        let message = match notice {
            Notice::Success(message) | Notice::Failure(message) => message,
        };
        self.emitter
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .emit(kind, message);
    }
}
