use std::fmt;

use bevy::log::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Failure,
}

/// Short message for the user about the outcome of an action. Every notice is also logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapperNotice {
    pub kind: NoticeKind,
    pub message: String,
}

impl MapperNotice {
    pub fn info(message: impl Into<String>) -> Self {
        let message = message.into();
        info!("{message}");
        Self {
            kind: NoticeKind::Info,
            message,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        let message = message.into();
        warn!("{message}");
        Self {
            kind: NoticeKind::Failure,
            message,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.kind == NoticeKind::Failure
    }
}

impl fmt::Display for MapperNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
