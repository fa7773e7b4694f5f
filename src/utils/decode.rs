//! Decoding of piped console input.
//!
//! Input is UTF-8 unless it starts with a byte-order mark; UTF-16 and UTF-32
//! files redirected into the program are still read correctly.

use encoding_rs::UTF_8;
use std::io::{self, Read};
use tracing::{debug, warn};

/// Decode raw input bytes, honouring a leading byte-order mark.
///
/// Malformed sequences become U+FFFD rather than failing the copy.
pub fn decode_input(bytes: &[u8]) -> String {
    if let Some(text) = decode_utf32(bytes) {
        return text;
    }

    let (text, encoding, had_errors) = UTF_8.decode(bytes);

    if encoding != UTF_8 {
        debug!(encoding = encoding.name(), "byte-order mark selected input encoding");
    }
    if had_errors {
        warn!("input contained malformed {} sequences", encoding.name());
    }

    text.into_owned()
}

/// Decode input carrying a UTF-32 byte-order mark.
///
/// `encoding_rs` has no UTF-32 support, and would otherwise take the
/// UTF-32LE mark for UTF-16LE followed by a NUL. Returns `None` when the input
/// does not start with a UTF-32 mark.
fn decode_utf32(bytes: &[u8]) -> Option<String> {
    let (name, unit): (&str, fn([u8; 4]) -> u32) = match bytes {
        [0xFF, 0xFE, 0x00, 0x00, ..] => ("UTF-32LE", u32::from_le_bytes),
        [0x00, 0x00, 0xFE, 0xFF, ..] => ("UTF-32BE", u32::from_be_bytes),
        _ => return None,
    };
    debug!(encoding = name, "byte-order mark selected input encoding");

    let mut chunks = bytes[4..].chunks_exact(4);
    let mut text = String::with_capacity(bytes.len() / 4);
    let mut had_errors = false;

    for chunk in chunks.by_ref() {
        let code_point = unit([chunk[0], chunk[1], chunk[2], chunk[3]]);
        match char::from_u32(code_point) {
            Some(c) => text.push(c),
            None => {
                had_errors = true;
                text.push(char::REPLACEMENT_CHARACTER);
            }
        }
    }
    if !chunks.remainder().is_empty() {
        had_errors = true;
        text.push(char::REPLACEMENT_CHARACTER);
    }

    if had_errors {
        warn!("input contained malformed {} sequences", name);
    }
    Some(text)
}

/// Read `reader` to end-of-stream and decode it.
pub fn read_input<R: Read>(mut reader: R) -> io::Result<String> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    debug!(bytes = bytes.len(), "read input");
    Ok(decode_input(&bytes))
}
