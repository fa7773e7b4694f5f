//! Clipboard operations.

use thiserror::Error;

/// Clipboard failures.
#[derive(Debug, Error)]
pub enum ClipboardError {
    /// The clipboard could not be opened, read or written.
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
    /// The clipboard holds no text.
    #[error("clipboard holds no text")]
    Empty,
}

impl From<arboard::Error> for ClipboardError {
    fn from(err: arboard::Error) -> Self {
        match err {
            arboard::Error::ContentNotAvailable => Self::Empty,
            other => Self::Unavailable(other.to_string()),
        }
    }
}

/// Text access to a clipboard.
pub trait Clipboard {
    /// Current clipboard text.
    fn get_text(&mut self) -> Result<String, ClipboardError>;

    /// Replace the clipboard contents with `text`.
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// The system clipboard.
///
/// A fresh `arboard` handle is opened for every call; the handle takes care of
/// opening the clipboard on the thread Windows expects.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn get_text(&mut self) -> Result<String, ClipboardError> {
        let mut clipboard = arboard::Clipboard::new()?;
        Ok(clipboard.get_text()?)
    }

    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard = arboard::Clipboard::new()?;
        clipboard.set_text(text)?;
        Ok(())
    }
}

/// In-memory clipboard for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    pub text: Option<String>,
    pub unavailable: bool,
}

#[cfg(test)]
impl MemoryClipboard {
    pub fn with_text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            unavailable: false,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            text: None,
            unavailable: true,
        }
    }
}

#[cfg(test)]
impl Clipboard for MemoryClipboard {
    fn get_text(&mut self) -> Result<String, ClipboardError> {
        if self.unavailable {
            return Err(ClipboardError::Unavailable("locked by another process".to_string()));
        }
        self.text.clone().ok_or(ClipboardError::Empty)
    }

    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if self.unavailable {
            return Err(ClipboardError::Unavailable("locked by another process".to_string()));
        }
        self.text = Some(text.to_string());
        Ok(())
    }
}
