use arcade_types::{format_megabytes, percentage};
use serde::{Deserialize, Serialize};

/// Label shown while a title is downloading
pub const DOWNLOADING_LABEL: &str = "Downloading Game...";
/// Label shown while a title is being unpacked
pub const INSTALLING_LABEL: &str = "Installing Game...";
/// Label shown when a pipeline fails
pub const ERROR_LABEL: &str = "Error";
/// Label shown when the platform has no download for a title
pub const NOT_FOUND_LABEL: &str = "Not Found";

/// Which stage produced a progress update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressPhase {
    /// Blank progress; the display clears its bar
    Reset,
    Downloading,
    Installing,
    NotFound,
    Error,
}

/// Snapshot pushed to the progress display
///
/// Delivery is fire-and-forget; the latest value wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent {
    pub phase: ProgressPhase,
    pub title: String,
    pub filename: String,
    pub percentage: u8,
    pub text_received: String,
    pub text_total: String,
    pub done: u64,
    pub total: u64,
}

impl ProgressEvent {
    fn counted(
        phase: ProgressPhase,
        title: &str,
        filename: impl Into<String>,
        texts: (String, String),
        done: u64,
        total: u64,
    ) -> Self {
        Self {
            phase,
            title: title.to_string(),
            filename: filename.into(),
            percentage: percentage(done, total),
            text_received: texts.0,
            text_total: texts.1,
            done,
            total,
        }
    }

    /// Blank update used between phases and after success
    #[must_use]
    pub fn reset() -> Self {
        Self {
            phase: ProgressPhase::Reset,
            title: String::new(),
            filename: String::new(),
            percentage: 0,
            text_received: "0".to_string(),
            text_total: "0".to_string(),
            done: 0,
            total: 0,
        }
    }

    /// Byte-level download tick; `total` is 0 when the length is unknown
    #[must_use]
    pub fn downloading(filename: impl Into<String>, received: u64, total: u64) -> Self {
        Self::counted(
            ProgressPhase::Downloading,
            DOWNLOADING_LABEL,
            filename,
            (format_megabytes(received), format_megabytes(total)),
            received,
            total,
        )
    }

    /// Entry-level extraction tick, `entries_done` counted from 1
    #[must_use]
    pub fn installing(filename: impl Into<String>, entries_done: u64, entry_count: u64) -> Self {
        Self::counted(
            ProgressPhase::Installing,
            INSTALLING_LABEL,
            filename,
            (
                format!("FILE {entries_done}"),
                format!("{entry_count} FILES"),
            ),
            entries_done,
            entry_count,
        )
    }

    /// Failure shown to the user; the message takes the filename slot
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            phase: ProgressPhase::Error,
            title: ERROR_LABEL.to_string(),
            filename: message.into(),
            ..Self::reset()
        }
    }

    /// No download published for the current platform
    #[must_use]
    pub fn not_found(filename: impl Into<String>) -> Self {
        Self {
            phase: ProgressPhase::NotFound,
            title: NOT_FOUND_LABEL.to_string(),
            filename: filename.into(),
            ..Self::reset()
        }
    }

    /// Whether this update reports a failure
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self.phase, ProgressPhase::Error | ProgressPhase::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_texts() {
        let event = ProgressEvent::downloading("g1.zip", 1024 * 1024, 4 * 1024 * 1024);
        assert_eq!(event.percentage, 25);
        assert_eq!(event.text_received, "1.00 MB");
        assert_eq!(event.text_total, "4.00 MB");
        assert_eq!(event.title, DOWNLOADING_LABEL);
    }

    #[test]
    fn test_unknown_length_reports_zero() {
        let event = ProgressEvent::downloading("g1.zip", 4096, 0);
        assert_eq!(event.percentage, 0);
        assert_eq!(event.done, 4096);
    }

    #[test]
    fn test_install_texts() {
        let event = ProgressEvent::installing("g1.zip", 3, 12);
        assert_eq!(event.text_received, "FILE 3");
        assert_eq!(event.text_total, "12 FILES");
        assert_eq!(event.percentage, 25);
    }

    #[test]
    fn test_error_carries_message() {
        let event = ProgressEvent::error("connection reset");
        assert!(event.is_failure());
        assert_eq!(event.title, ERROR_LABEL);
        assert_eq!(event.filename, "connection reset");
        assert_eq!(event.percentage, 0);
    }
}
