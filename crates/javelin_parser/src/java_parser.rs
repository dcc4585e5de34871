//! The public entry points.

use bumpalo::Bump;
use javelin_ast::node::*;
use javelin_core::intern::StringInterner;
use javelin_core::text::TextRange;
use javelin_diagnostics::DiagnosticCollection;
use javelin_options::{CompilerOptions, OptionsError, ResolvedOptions};
use thiserror::Error;
use tracing::debug;

use crate::assist::ParentSnapshot;
use crate::diet::{BodyFiller, BodySelection};
use crate::parser::{ParseMode, Parser};
use crate::recovery::{Construct, RecoveryLog};

/// A cursor or selection that does not lie within the source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssistError {
    #[error("cursor {cursor} is outside the source (length {len})")]
    CursorOutOfBounds { cursor: u32, len: u32 },

    #[error("selection {start}..{end} is not a range within the source (length {len})")]
    InvalidSelection { start: u32, end: u32, len: u32 },
}

/// A parsed compilation unit with its problems and the repairs made.
#[derive(Debug)]
pub struct ParseResult<'a> {
    pub unit: &'a CompilationUnit<'a>,
    pub diagnostics: DiagnosticCollection,
    pub recovery: RecoveryLog,
}

/// The outcome of a completion or selection parse.
#[derive(Debug)]
pub struct AssistResult<'a> {
    pub unit: &'a CompilationUnit<'a>,
    /// `None` when nothing at the cursor or selection could be assisted.
    pub assist: Option<&'a AssistNode<'a>>,
    pub parent: Option<ParentSnapshot>,
    pub diagnostics: DiagnosticCollection,
}

impl AssistResult<'_> {
    /// The source text an accepted proposal would replace.
    pub fn replaced_text(&self) -> Option<String> {
        let node = self.assist?;
        Some(char_slice(self.unit.text, node.replaced))
    }
}

fn char_slice(text: &str, range: TextRange) -> String {
    text.chars()
        .skip(range.pos as usize)
        .take(range.len() as usize)
        .collect()
}

/// Parses Java compilation units. Cheap to share between threads: each
/// call builds its own parser state and allocates into the caller's arena.
#[derive(Debug, Clone)]
pub struct JavaParser {
    options: ResolvedOptions,
    interner: StringInterner,
}

impl JavaParser {
    pub fn new(options: &CompilerOptions) -> Result<Self, OptionsError> {
        Ok(Self::from_resolved(options.validate()?))
    }

    pub fn from_resolved(options: ResolvedOptions) -> Self {
        Self {
            options,
            interner: StringInterner::new(),
        }
    }

    /// Keep malformed statements in the tree instead of dropping them.
    /// Assist parses always keep them.
    pub fn set_statement_recovery_enabled(&mut self, enabled: bool) {
        self.options.statement_recovery = enabled;
    }

    pub fn options(&self) -> &ResolvedOptions {
        &self.options
    }

    /// The interner every parse of this parser shares.
    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    fn parser<'a>(&self, arena: &'a Bump, source: &str, mode: ParseMode) -> Parser<'a> {
        Parser::new(arena, source, self.interner.clone(), self.options, mode)
    }

    /// Parse everything, method bodies included.
    pub fn parse<'a>(&self, arena: &'a Bump, source: &str, unit_name: &str) -> ParseResult<'a> {
        self.parse_unit(arena, source, unit_name, ParseMode::Full)
    }

    /// Parse declarations only. Bodies are left deferred for
    /// [`JavaParser::parse_bodies`] or [`JavaParser::parse_method_body`].
    pub fn diet_parse<'a>(&self, arena: &'a Bump, source: &str, unit_name: &str) -> ParseResult<'a> {
        self.parse_unit(arena, source, unit_name, ParseMode::Diet)
    }

    fn parse_unit<'a>(
        &self,
        arena: &'a Bump,
        source: &str,
        unit_name: &str,
        mode: ParseMode,
    ) -> ParseResult<'a> {
        debug!(?mode, unit = unit_name, len = source.len(), "parse start");
        let mut parser = self.parser(arena, source, mode);
        let unit = parser.parse_compilation_unit(unit_name);
        let diagnostics = parser.take_diagnostics(true);
        let recovery = std::mem::take(&mut parser.recovery.log);
        debug!(
            ?mode,
            unit = unit_name,
            diagnostics = diagnostics.len(),
            repairs = recovery.len(),
            "parse done"
        );
        ParseResult {
            unit,
            diagnostics,
            recovery,
        }
    }

    /// Parse every deferred body of a diet-parsed unit in place. Returns
    /// the syntax problems found in the bodies; lexical problems were
    /// already reported by the diet parse.
    pub fn parse_bodies<'a>(&self, arena: &'a Bump, unit: &CompilationUnit<'a>) -> DiagnosticCollection {
        let mut parser = self.parser(arena, unit.text, ParseMode::Full);
        let mut filler = BodyFiller::new(&mut parser, BodySelection::All);
        for declaration in unit.types {
            filler.fill_type(declaration);
        }
        let filled = filler.filled;
        let diagnostics = parser.take_diagnostics(false);
        debug!(unit = unit.file_name, bodies = filled, diagnostics = diagnostics.len(), "bodies parsed");
        diagnostics
    }

    /// Parse the deferred body of one method or constructor in place.
    pub fn parse_method_body<'a>(
        &self,
        arena: &'a Bump,
        unit: &CompilationUnit<'a>,
        method: &MethodDeclaration<'a>,
    ) -> DiagnosticCollection {
        let mut parser = self.parser(arena, unit.text, ParseMode::Full);
        parser.fill_body(&method.body, Construct::MethodBody);
        parser.take_diagnostics(false)
    }

    /// Parse for code completion at `cursor`, a character offset. The unit
    /// is diet parsed; when the cursor is inside a body, only that body is
    /// parsed in full.
    pub fn parse_for_completion<'a>(
        &self,
        arena: &'a Bump,
        source: &str,
        unit_name: &str,
        cursor: u32,
    ) -> Result<AssistResult<'a>, AssistError> {
        let len = source.chars().count() as u32;
        if cursor > len {
            return Err(AssistError::CursorOutOfBounds { cursor, len });
        }
        let mut parser = self.parser(arena, source, ParseMode::Diet);
        parser.arm_completion(cursor);
        Ok(self.assist_parse(parser, unit_name, cursor))
    }

    /// Parse for selection of the characters `[start, end)`.
    pub fn parse_for_selection<'a>(
        &self,
        arena: &'a Bump,
        source: &str,
        unit_name: &str,
        start: u32,
        end: u32,
    ) -> Result<AssistResult<'a>, AssistError> {
        let len = source.chars().count() as u32;
        if start > end || end > len {
            return Err(AssistError::InvalidSelection { start, end, len });
        }
        let mut parser = self.parser(arena, source, ParseMode::Diet);
        parser.arm_selection(start, end);
        Ok(self.assist_parse(parser, unit_name, start))
    }

    fn assist_parse<'a>(&self, mut parser: Parser<'a>, unit_name: &str, offset: u32) -> AssistResult<'a> {
        debug!(unit = unit_name, offset, "assist parse start");
        let unit = parser.parse_compilation_unit(unit_name);
        if parser.assist_pending() {
            parser.enter_bodies();
            let mut filler = BodyFiller::new(&mut parser, BodySelection::Containing(offset));
            for declaration in unit.types {
                filler.fill_type(declaration);
            }
        }
        parser.capture_covering();
        let diagnostics = parser.take_diagnostics(true);
        let (assist, parent) = match parser.assist.take() {
            Some(state) => (state.node, state.parent),
            None => (None, None),
        };
        debug!(
            unit = unit_name,
            kind = ?assist.map(|node| node.assist_kind),
            diagnostics = diagnostics.len(),
            "assist parse done"
        );
        AssistResult {
            unit,
            assist,
            parent,
            diagnostics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<JavaParser>();
    }

    #[test]
    fn test_char_slice_counts_characters() {
        assert_eq!(char_slice("é.has", TextRange::new(0, 5)), "é.has");
        assert_eq!(char_slice("aé", TextRange::new(1, 2)), "é");
    }

    #[test]
    fn test_out_of_bounds_cursor() {
        let parser = JavaParser::from_resolved(ResolvedOptions::default());
        let arena = Bump::new();
        let err = parser.parse_for_completion(&arena, "class X {}", "X.java", 11).unwrap_err();
        assert_eq!(err, AssistError::CursorOutOfBounds { cursor: 11, len: 10 });
        let err = parser.parse_for_selection(&arena, "class X {}", "X.java", 4, 2).unwrap_err();
        assert!(matches!(err, AssistError::InvalidSelection { start: 4, end: 2, .. }));
    }
}
