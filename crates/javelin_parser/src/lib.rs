//! javelin_parser: a recovering Java parser.
//!
//! Declarations and statements are parsed by recursive descent; binary
//! operator runs go through a table-driven shift/reduce engine. A unit can
//! be parsed in full, or diet parsed with method bodies skipped and parsed
//! later on demand. Completion and selection parses build an assist node at
//! the cursor.

mod assist;
mod declarations;
mod diet;
mod engine;
mod expressions;
mod java_parser;
mod parser;
mod precedence;
mod recovery;
mod statements;
mod types;
mod utilities;

pub use assist::ParentSnapshot;
pub use java_parser::{AssistError, AssistResult, JavaParser, ParseResult};
pub use parser::{ParseMode, MAX_RECURSION_DEPTH};
pub use recovery::{RecoveryAction, RecoveryLog, RecoveryState};
