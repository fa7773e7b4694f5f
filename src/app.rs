//! Mode selection and the two transfer directions.

use std::io::{self, Read, Write};
use thiserror::Error;
use tracing::{debug, warn};

use crate::services::{Clipboard, ClipboardError, CodePage, Utf8OutputGuard};
use crate::utils::{read_input, rejoin_lines, NATIVE_LINE_ENDING};

/// What a single invocation does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Print usage help.
    Help,
    /// Copy redirected stdin onto the clipboard.
    ReadToClipboard,
    /// Print the clipboard to stdout.
    WriteFromClipboard,
}

impl Mode {
    /// Pick the mode for this invocation.
    ///
    /// Any argument at all means help. Otherwise redirected input is copied to
    /// the clipboard, and an interactive stdin prints the clipboard. Whether
    /// stdout is redirected does not change the mode.
    pub fn select(arg_count: usize, input_redirected: bool) -> Self {
        if arg_count > 0 {
            Self::Help
        } else if input_redirected {
            Self::ReadToClipboard
        } else {
            Self::WriteFromClipboard
        }
    }
}

/// Transfer failures.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
    #[error("console I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Moves text between the console streams and a clipboard.
pub struct App<C, K> {
    clipboard: C,
    console: K,
    empty_on_read_error: bool,
}

impl<C: Clipboard, K: CodePage> App<C, K> {
    /// Create an application over a clipboard and a console.
    pub fn new(clipboard: C, console: K, empty_on_read_error: bool) -> Self {
        Self {
            clipboard,
            console,
            empty_on_read_error,
        }
    }

    /// Read `input` to end-of-stream and place it on the clipboard.
    ///
    /// Returns the number of bytes placed on the clipboard.
    pub fn read_to_clipboard<R: Read>(&mut self, input: R) -> Result<usize, AppError> {
        let text = read_input(input)?;
        let text = rejoin_lines(&text, NATIVE_LINE_ENDING);
        self.clipboard.set_text(&text)?;
        debug!(bytes = text.len(), "input copied to clipboard");
        Ok(text.len())
    }

    /// Write the clipboard text to `output`.
    ///
    /// The console is switched to UTF-8 only when `output_is_terminal`; a
    /// redirected stdout leaves the console encoding to whoever consumes it.
    /// Returns the number of bytes written.
    pub fn write_from_clipboard<W: Write>(
        &mut self,
        mut output: W,
        output_is_terminal: bool,
    ) -> Result<usize, AppError> {
        let _guard = output_is_terminal.then(|| Utf8OutputGuard::acquire(&self.console));

        let text = match self.clipboard.get_text() {
            Ok(text) => text,
            Err(ClipboardError::Empty) => String::new(),
            Err(e) if self.empty_on_read_error => {
                warn!(error = %e, "treating unreadable clipboard as empty");
                String::new()
            }
            Err(e) => return Err(e.into()),
        };

        let text = rejoin_lines(&text, NATIVE_LINE_ENDING);
        output.write_all(text.as_bytes())?;
        output.flush()?;
        debug!(bytes = text.len(), "clipboard written to output");
        Ok(text.len())
    }

    /// The clipboard this application writes to.
    #[cfg(test)]
    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::clipboard::MemoryClipboard;
    use crate::services::console::{FakeConsole, CP_UTF8};

    const NL: &str = NATIVE_LINE_ENDING;

    fn app(clipboard: MemoryClipboard) -> App<MemoryClipboard, FakeConsole> {
        App::new(clipboard, FakeConsole::new(437), false)
    }

    #[test]
    fn test_any_argument_selects_help() {
        assert_eq!(Mode::select(1, false), Mode::Help);
        assert_eq!(Mode::select(1, true), Mode::Help);
        assert_eq!(Mode::select(3, true), Mode::Help);
    }

    #[test]
    fn test_redirected_input_selects_read() {
        assert_eq!(Mode::select(0, true), Mode::ReadToClipboard);
    }

    #[test]
    fn test_interactive_input_selects_write() {
        assert_eq!(Mode::select(0, false), Mode::WriteFromClipboard);
    }

    #[test]
    fn test_piped_lines_reach_clipboard_without_trailing_terminator() {
        let mut app = app(MemoryClipboard::default());
        let input: &[u8] = b"a\nb\nc\n";
        app.read_to_clipboard(input).unwrap();
        assert_eq!(app.clipboard().text.as_deref(), Some(format!("a{NL}b{NL}c").as_str()));
    }

    #[test]
    fn test_empty_input_clears_clipboard() {
        let mut app = app(MemoryClipboard::with_text("old"));
        assert_eq!(app.read_to_clipboard(io::empty()).unwrap(), 0);
        assert_eq!(app.clipboard().text.as_deref(), Some(""));
    }

    #[test]
    fn test_utf16_input_is_decoded() {
        let mut app = app(MemoryClipboard::default());
        let input: &[u8] = &[0xFF, 0xFE, 0xE9, 0x00];
        app.read_to_clipboard(input).unwrap();
        assert_eq!(app.clipboard().text.as_deref(), Some("é"));
    }

    #[test]
    fn test_clipboard_crlf_is_normalized_on_output() {
        let mut app = app(MemoryClipboard::with_text("x\r\ny"));
        let mut out = Vec::new();
        app.write_from_clipboard(&mut out, false).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), format!("x{NL}y"));
    }

    #[test]
    fn test_empty_clipboard_writes_nothing() {
        for clipboard in [MemoryClipboard::default(), MemoryClipboard::with_text("")] {
            let mut app = app(clipboard);
            let mut out = Vec::new();
            assert_eq!(app.write_from_clipboard(&mut out, true).unwrap(), 0);
            assert!(out.is_empty());
        }
    }

    #[test]
    fn test_unavailable_clipboard_fails_without_output() {
        let mut app = app(MemoryClipboard::unavailable());
        let mut out = Vec::new();
        let err = app.write_from_clipboard(&mut out, true).unwrap_err();
        assert!(matches!(err, AppError::Clipboard(ClipboardError::Unavailable(_))));
        assert!(out.is_empty());
    }

    #[test]
    fn test_unavailable_clipboard_can_read_as_empty() {
        let mut app = App::new(MemoryClipboard::unavailable(), FakeConsole::new(437), true);
        let mut out = Vec::new();
        assert_eq!(app.write_from_clipboard(&mut out, false).unwrap(), 0);
    }

    #[test]
    fn test_unavailable_clipboard_fails_read_to_clipboard() {
        let mut app = app(MemoryClipboard::unavailable());
        let input: &[u8] = b"text";
        assert!(app.read_to_clipboard(input).is_err());
    }

    #[test]
    fn test_console_code_page_restored_after_write() {
        let mut app = app(MemoryClipboard::with_text("héllo"));
        app.write_from_clipboard(io::sink(), true).unwrap();
        assert_eq!(app.console.code_page.get(), 437);
        assert_eq!(app.console.changes.get(), 2);
    }

    #[test]
    fn test_console_code_page_restored_after_failure() {
        let mut app = app(MemoryClipboard::unavailable());
        assert!(app.write_from_clipboard(io::sink(), true).is_err());
        assert_eq!(app.console.code_page.get(), 437);
    }

    #[test]
    fn test_redirected_output_leaves_console_alone() {
        let mut app = app(MemoryClipboard::with_text("x"));
        app.write_from_clipboard(io::sink(), false).unwrap();
        assert_eq!(app.console.changes.get(), 0);
    }

    #[test]
    fn test_utf8_console_not_switched() {
        let mut app = App::new(MemoryClipboard::with_text("x"), FakeConsole::new(CP_UTF8), false);
        app.write_from_clipboard(io::sink(), true).unwrap();
        assert_eq!(app.console.changes.get(), 0);
    }

    #[test]
    fn test_round_trip_through_output_and_back() {
        let original = "first\nsecond\n\nfourth";
        let mut source = app(MemoryClipboard::with_text(original));
        let mut out = Vec::new();
        source.write_from_clipboard(&mut out, false).unwrap();

        let mut sink = app(MemoryClipboard::default());
        sink.read_to_clipboard(out.as_slice()).unwrap();
        assert_eq!(sink.clipboard().text.as_deref(), Some(original.replace('\n', NL).as_str()));
    }
}
