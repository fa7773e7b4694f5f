//! Console output code page control.
//!
//! Printing the clipboard to an interactive console needs the console to
//! interpret our bytes as UTF-8. [`Utf8OutputGuard`] switches the output code
//! page for the lifetime of one operation and puts the user's setting back
//! when it is dropped, whichever way the operation ends.

use std::io;
use tracing::{debug, warn};

/// Windows code page identifier for UTF-8.
pub const CP_UTF8: u32 = 65001;

/// Read and change the console output code page.
pub trait CodePage {
    fn output_code_page(&self) -> io::Result<u32>;
    fn set_output_code_page(&self, code_page: u32) -> io::Result<()>;
}

/// The attached Windows console.
#[cfg(windows)]
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowsConsole;

#[cfg(windows)]
impl CodePage for WindowsConsole {
    fn output_code_page(&self) -> io::Result<u32> {
        use windows::Win32::System::Console::GetConsoleOutputCP;

        // Zero means no console is attached.
        match unsafe { GetConsoleOutputCP() } {
            0 => Err(io::Error::last_os_error()),
            code_page => Ok(code_page),
        }
    }

    fn set_output_code_page(&self, code_page: u32) -> io::Result<()> {
        use windows::Win32::System::Console::SetConsoleOutputCP;

        unsafe { SetConsoleOutputCP(code_page) }.map_err(|e| io::Error::other(e.to_string()))
    }
}

/// Terminals outside Windows already speak UTF-8.
#[cfg(not(windows))]
#[derive(Debug, Default, Clone, Copy)]
pub struct Utf8Terminal;

#[cfg(not(windows))]
impl CodePage for Utf8Terminal {
    fn output_code_page(&self) -> io::Result<u32> {
        Ok(CP_UTF8)
    }

    fn set_output_code_page(&self, _code_page: u32) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(windows)]
pub type SystemConsole = WindowsConsole;
#[cfg(not(windows))]
pub type SystemConsole = Utf8Terminal;

/// Scoped UTF-8 override of the console output code page.
///
/// Holds the original code page only when it was actually changed, so an
/// already-UTF-8 console is never touched.
pub struct Utf8OutputGuard<'a, C: CodePage> {
    console: &'a C,
    original: Option<u32>,
}

impl<'a, C: CodePage> Utf8OutputGuard<'a, C> {
    /// Switch the console to UTF-8 output.
    ///
    /// Failing to query or switch the code page is logged and the guard holds
    /// nothing; the output is still written, just possibly misrendered.
    pub fn acquire(console: &'a C) -> Self {
        let original = match console.output_code_page() {
            Ok(CP_UTF8) => None,
            Ok(current) => match console.set_output_code_page(CP_UTF8) {
                Ok(()) => {
                    debug!(from = current, "console output code page set to UTF-8");
                    Some(current)
                }
                Err(e) => {
                    warn!(error = %e, "failed to set console output code page to UTF-8");
                    None
                }
            },
            Err(e) => {
                warn!(error = %e, "failed to read console output code page");
                None
            }
        };

        Self { console, original }
    }

    /// Code page that will be restored on drop, if any.
    #[cfg(test)]
    pub fn original(&self) -> Option<u32> {
        self.original
    }
}

impl<C: CodePage> Drop for Utf8OutputGuard<'_, C> {
    fn drop(&mut self) {
        if let Some(code_page) = self.original.take() {
            match self.console.set_output_code_page(code_page) {
                Ok(()) => debug!(code_page, "console output code page restored"),
                Err(e) => warn!(code_page, error = %e, "failed to restore console output code page"),
            }
        }
    }
}

/// Console double recording every code page change.
#[cfg(test)]
#[derive(Debug)]
pub struct FakeConsole {
    pub code_page: std::cell::Cell<u32>,
    pub changes: std::cell::Cell<usize>,
    pub fail_set: std::cell::Cell<bool>,
}

#[cfg(test)]
impl FakeConsole {
    pub fn new(code_page: u32) -> Self {
        Self {
            code_page: std::cell::Cell::new(code_page),
            changes: std::cell::Cell::new(0),
            fail_set: std::cell::Cell::new(false),
        }
    }
}

#[cfg(test)]
impl CodePage for FakeConsole {
    fn output_code_page(&self) -> io::Result<u32> {
        Ok(self.code_page.get())
    }

    fn set_output_code_page(&self, code_page: u32) -> io::Result<()> {
        if self.fail_set.get() {
            return Err(io::Error::other("console detached"));
        }
        self.code_page.set(code_page);
        self.changes.set(self.changes.get() + 1);
        Ok(())
    }
}
