//! System clipboard access through `arboard`.

use tracker_engine::{ClipboardError, ClipboardSource};
use tracker_logging::tracker_warn;

/// Reads the OS clipboard, reconnecting after a failed open or read.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        match arboard::Clipboard::new() {
            Ok(clipboard) => Self {
                inner: Some(clipboard),
            },
            Err(err) => {
                tracker_warn!("Clipboard not available yet: {}", err);
                Self::default()
            }
        }
    }
}

impl ClipboardSource for SystemClipboard {
    fn read_text(&mut self) -> Result<String, ClipboardError> {
        let clipboard = match &mut self.inner {
            Some(clipboard) => clipboard,
            slot => slot.insert(
                arboard::Clipboard::new()
                    .map_err(|err| ClipboardError::Unavailable(err.to_string()))?,
            ),
        };
        match clipboard.get_text() {
            Ok(text) => Ok(text),
            Err(arboard::Error::ContentNotAvailable) => Err(ClipboardError::NoText),
            Err(err) => {
                self.inner = None;
                Err(ClipboardError::Unavailable(err.to_string()))
            }
        }
    }
}
