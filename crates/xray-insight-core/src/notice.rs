//! Notification relay
//!
//! Maps a `{kind, message}` pair to whatever transient surface the host
//! offers: a toast in the browser, a colored line in the terminal, a log line
//! otherwise. No queueing, no state.

use core::fmt;
use serde::{Deserialize, Serialize};

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

impl fmt::Display for NoticeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NoticeKind::Success => "success",
            NoticeKind::Error => "error",
            NoticeKind::Info => "info",
        };
        f.write_str(label)
    }
}

/// A transient user-visible notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    /// Optional heading shown above the message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Error, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Info, message)
    }

    fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: None,
            message: message.into(),
        }
    }

    /// Attach a heading
    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

// ----------------------------------------------------------------------------
// Notifier Trait
// ----------------------------------------------------------------------------

/// Surface that displays notices
pub trait Notifier {
    fn notify(&mut self, notice: &Notice);
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn notify(&mut self, notice: &Notice) {
        (**self).notify(notice)
    }
}

/// Notifier that writes notices to the tracing subscriber
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&mut self, notice: &Notice) {
        match notice.kind {
            NoticeKind::Error => tracing::warn!(title = ?notice.title, "{}", notice.message),
            NoticeKind::Success | NoticeKind::Info => {
                tracing::info!(kind = %notice.kind, title = ?notice.title, "{}", notice.message)
            }
        }
    }
}

/// Notifier that keeps every notice, for assertions
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    notices: Vec<Notice>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every notice received, oldest first
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// The most recent notice
    pub fn last(&self) -> Option<&Notice> {
        self.notices.last()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, notice: &Notice) {
        self.notices.push(notice.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_notifier() {
        let mut notifier = RecordingNotifier::new();
        notifier.notify(&Notice::success("saved"));
        notifier.notify(&Notice::error("Please upload an image file.").titled("Invalid file type"));

        assert_eq!(notifier.notices().len(), 2);
        let last = notifier.last().unwrap();
        assert_eq!(last.kind, NoticeKind::Error);
        assert_eq!(last.title.as_deref(), Some("Invalid file type"));
    }

    #[test]
    fn test_notice_serialization() {
        let json = serde_json::to_string(&Notice::info("hello")).unwrap();
        assert_eq!(json, r#"{"kind":"info","message":"hello"}"#);
    }

    #[test]
    fn test_boxed_notifier() {
        let mut notifier: Box<dyn Notifier> = Box::new(TracingNotifier);
        notifier.notify(&Notice::info("logged"));
    }
}
