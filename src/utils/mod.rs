//! Text helpers shared by both transfer directions.

pub mod decode;
pub mod lines;

pub use decode::read_input;
pub use lines::{rejoin_lines, NATIVE_LINE_ENDING};
