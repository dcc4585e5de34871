//! javelin_ast: syntax kinds, flags and the arena-allocated AST for Java
//! compilation units, including the assist nodes built in completion and
//! selection mode.

pub mod node;
pub mod syntax_kind;
pub mod types;
pub mod visitor;

pub use node::*;
pub use syntax_kind::SyntaxKind;
pub use types::*;
