//! javelin_core: positions and identifier interning shared by every javelin
//! crate.

pub mod intern;
pub mod text;

pub use intern::{InternedString, KnownNames, StringInterner};
pub use text::{TextPos, TextRange, TextSpan};
