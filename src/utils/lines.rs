//! Line splitting and rejoining.
//!
//! Text moving between the console and the clipboard is cut into logical lines
//! and put back together with the destination's terminator. CRLF, LF and lone
//! CR input all come out in a single convention, so a pipe between programs
//! with different conventions never translates line endings twice.

use std::fmt;

/// Line terminator expected by the clipboard and the console on this platform.
#[cfg(windows)]
pub const NATIVE_LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
pub const NATIVE_LINE_ENDING: &str = "\n";

/// Iterator over the logical lines of a string.
///
/// `\r\n`, `\n` and a lone `\r` each end a line. A terminator at the very end
/// of the text does not start another, empty line.
#[derive(Debug, Clone)]
pub struct Lines<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }

        match self.rest.find(|c: char| c == '\r' || c == '\n') {
            Some(pos) => {
                let line = &self.rest[..pos];
                let terminator = if self.rest[pos..].starts_with("\r\n") { 2 } else { 1 };
                self.rest = &self.rest[pos + terminator..];
                Some(line)
            }
            None => {
                let line = self.rest;
                self.rest = "";
                Some(line)
            }
        }
    }
}

/// Split text into logical lines.
pub fn split_lines(text: &str) -> Lines<'_> {
    Lines { rest: text }
}

/// Copy `source` into `sink` line by line, ending every line but the last
/// with `line_ending`.
pub fn copy_lines<W: fmt::Write>(source: &str, sink: &mut W, line_ending: &str) -> fmt::Result {
    for (index, line) in split_lines(source).enumerate() {
        if index > 0 {
            sink.write_str(line_ending)?;
        }
        sink.write_str(line)?;
    }
    Ok(())
}

/// Rejoin the lines of `source` with `line_ending`, no trailing terminator.
pub fn rejoin_lines(source: &str, line_ending: &str) -> String {
    let mut out = String::with_capacity(source.len());
    // Writing into a String cannot fail.
    let _ = copy_lines(source, &mut out, line_ending);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines_of(text: &str) -> Vec<&str> {
        split_lines(text).collect()
    }

    #[test]
    fn test_split_mixed_terminators() {
        assert_eq!(lines_of("a\r\nb\nc\rd"), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_split_trailing_terminator_adds_no_line() {
        assert_eq!(lines_of("a\n"), vec!["a"]);
        assert_eq!(lines_of("a\r\n"), vec!["a"]);
        assert_eq!(lines_of("a\n\n"), vec!["a", ""]);
    }

    #[test]
    fn test_split_empty_and_blank() {
        assert!(lines_of("").is_empty());
        assert_eq!(lines_of("\n"), vec![""]);
        assert_eq!(lines_of("\r\n\r\n"), vec!["", ""]);
    }

    #[test]
    fn test_split_keeps_non_ascii() {
        assert_eq!(lines_of("日本語\r\nüber"), vec!["日本語", "über"]);
    }

    #[test]
    fn test_rejoin_has_no_trailing_terminator() {
        assert_eq!(rejoin_lines("a\nb\nc\n", "\r\n"), "a\r\nb\r\nc");
        assert_eq!(rejoin_lines("x\r\ny", "\n"), "x\ny");
    }

    #[test]
    fn test_rejoin_empty() {
        assert_eq!(rejoin_lines("", "\r\n"), "");
        assert_eq!(rejoin_lines("\n", "\r\n"), "");
    }

    #[test]
    fn test_rejoin_is_stable_on_its_own_output() {
        let once = rejoin_lines("one\r\ntwo\rthree\n", NATIVE_LINE_ENDING);
        assert_eq!(rejoin_lines(&once, NATIVE_LINE_ENDING), once);
    }

    #[test]
    fn test_copy_lines_into_writer() {
        let mut out = String::new();
        copy_lines("a\nb", &mut out, "|").unwrap();
        assert_eq!(out, "a|b");
    }
}
