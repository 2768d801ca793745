#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Clipboard text read by one poll iteration.
    ClipboardObserved(String),
    /// A draft finished resolving for a previously requested URL.
    DraftResolved(crate::DraftRecord),
    /// Cooperative shutdown requested.
    StopRequested,
    /// Poll tick with nothing read (clipboard unavailable).
    NoOp,
}
