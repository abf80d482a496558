//! Outbound notifications from the core to whatever view is attached.
//!
//! The library, player and queue never touch the terminal. They push
//! `Notice`s into a channel and the view decides how to show them.

use std::sync::mpsc::{self, Receiver, Sender};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Something the view renders has changed.
    Changed,
    Info(String),
    Success(String),
    Warning(String),
    Error(String),
}

impl Notice {
    /// Toast text, if this notice is meant to be shown to the user.
    pub fn message(&self) -> Option<&str> {
        match self {
            Notice::Changed => None,
            Notice::Info(m) | Notice::Success(m) | Notice::Warning(m) | Notice::Error(m) => {
                Some(m)
            }
        }
    }
}

/// Sending half of the notice channel. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: Sender<Notice>,
}

impl Notifier {
    pub fn channel() -> (Self, Receiver<Notice>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx }, rx)
    }

    pub fn send(&self, notice: Notice) {
        // The view may already be gone during shutdown.
        let _ = self.tx.send(notice);
    }

    pub fn changed(&self) {
        self.send(Notice::Changed);
    }

    pub fn info(&self, msg: impl Into<String>) {
        self.send(Notice::Info(msg.into()));
    }

    pub fn success(&self, msg: impl Into<String>) {
        self.send(Notice::Success(msg.into()));
    }

    pub fn warning(&self, msg: impl Into<String>) {
        self.send(Notice::Warning(msg.into()));
    }

    pub fn error(&self, msg: impl Into<String>) {
        self.send(Notice::Error(msg.into()));
    }
}
