//! javelin_scanner: Lexer for Java source code.
//!
//! Produces tokens from source text with support for:
//! - Unicode escape translation (offsets stay in original coordinates)
//! - All Java literal forms, including text blocks
//! - Restarting at an arbitrary offset and bounding the scan, so a method
//!   body can be lexed on its own
//! - Completion cursor and selection flagging

mod char_codes;
mod literals;
mod scanner;
mod token;
mod unicode;

pub use char_codes::{is_identifier_part, is_identifier_start};
pub use scanner::{Scanner, ScannerState, Tokens};
pub use token::TokenInfo;
