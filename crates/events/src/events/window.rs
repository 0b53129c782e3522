use serde::{Deserialize, Serialize};

/// Visibility requests for the launcher's two windows
///
/// The orchestrator never touches a UI directly; whatever presents the
/// launcher reacts to these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowEvent {
    ShowMain,
    HideMain,
    ShowProgress,
    HideProgress,
}
