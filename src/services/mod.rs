//! Platform services.

pub mod clipboard;
pub mod console;

pub use clipboard::{Clipboard, ClipboardError, SystemClipboard};
pub use console::{CodePage, SystemConsole, Utf8OutputGuard};
