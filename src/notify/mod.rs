//! Notices - the user-visible outcome of a collection operation.
//!
//! Every operation reports through a [`Notifier`]: one success notice when it
//! lands, exactly one failure notice when it does not.

mod log;

#[cfg(feature = "emitter")]
mod emitter;

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "lowercase")]
pub enum Notice {
    Success(String),
    Failure(String),
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Notice::Success(message.into())
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Notice::Failure(message.into())
    }

    pub fn message(&self) -> &str {
        match self {
            Notice::Success(message) | Notice::Failure(message) => message,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Notice::Failure(_))
    }

    /// Event name used by emitter-based notifiers.
    pub fn kind(&self) -> &'static str {
        match self {
            Notice::Success(_) => "success",
            Notice::Failure(_) => "failure",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind(), self.message())
    }
}

/// Sink for user-visible notices.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

impl<N: Notifier + ?Sized> Notifier for std::sync::Arc<N> {
    fn notify(&self, notice: Notice) {
        (**self).notify(notice);
    }
}

#[cfg(feature = "emitter")]
pub use emitter::EmitterNotifier;
pub use log::LogNotifier;
