//! Transform passes
//!
//! Each pass is a pure function from source text to (text, count). Passes
//! operate on raw text with regular expressions; there is no tokenizer and
//! no scope analysis. See the individual modules for the known limitations
//! this implies.

mod bogus;
mod rename;
mod strings;

pub use bogus::insert_bogus_functions;
pub use rename::rename_identifiers;
pub use strings::{encrypt_strings, MARKER_PREFIX, MARKER_SUFFIX};
