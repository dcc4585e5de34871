//! Parser state and the token-level helpers every production uses.
//!
//! Productions live in their own modules (`declarations`, `statements`,
//! `types`, `expressions`, `engine`, `diet`, `assist`), each adding methods
//! to [`Parser`]. Nodes are allocated in the caller's arena; the parser
//! itself owns only the scanner, the diagnostics and the recovery state.

use bumpalo::Bump;
use javelin_ast::node::*;
use javelin_ast::syntax_kind::SyntaxKind;
use javelin_ast::types::*;
use javelin_core::intern::StringInterner;
use javelin_core::text::TextRange;
use javelin_diagnostics::{
    messages, Diagnostic, DiagnosticCategory, DiagnosticCollection, DiagnosticMessage,
};
use javelin_options::{ConfigurableProblem, ResolvedOptions, SourceLevel};
use javelin_scanner::Scanner;

use crate::assist::AssistState;
use crate::recovery::RecoveryEngine;

/// Maximum recursion depth to prevent stack overflow on deeply nested input.
pub const MAX_RECURSION_DEPTH: u32 = 200;

/// Allocate a Vec into the arena as a slice.
///
/// Uses ManuallyDrop to prevent double-free on panic inside alloc_slice_fill_with.
pub(crate) fn alloc_vec_in<T>(arena: &Bump, vec: Vec<T>) -> &[T] {
    if vec.is_empty() {
        return &[];
    }
    let mut vec = std::mem::ManuallyDrop::new(vec);
    let len = vec.len();
    let ptr = vec.as_ptr();
    let slice = arena.alloc_slice_fill_with(len, |i| {
        // SAFETY: i < len, and each element is read exactly once. ManuallyDrop
        // prevents the Vec destructor from running, so elements won't be
        // double-freed even if this closure panics partway through.
        unsafe { std::ptr::read(ptr.add(i)) }
    });
    // SAFETY: all elements have been moved out; a zero length keeps a later
    // manual drop from touching them.
    unsafe {
        vec.set_len(0);
    }
    slice
}

/// Whether method and initializer bodies are parsed or skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    Full,
    /// Bodies are skipped and recorded as `MethodBody::Deferred`.
    Diet,
}

pub(crate) struct Parser<'a> {
    pub(crate) arena: &'a Bump,
    pub(crate) scanner: Scanner,
    pub(crate) interner: StringInterner,
    pub(crate) options: ResolvedOptions,
    pub(crate) mode: ParseMode,
    /// The compilation unit text, copied into the arena.
    pub(crate) source: &'a str,
    pub(crate) diagnostics: DiagnosticCollection,
    pub(crate) recovery: RecoveryEngine,
    pub(crate) assist: Option<AssistState<'a>>,
    /// Tracks recursion depth to prevent stack overflow on deeply nested input.
    pub(crate) recursion_depth: u32,
    /// Range of the last consumed token.
    pub(crate) prev_range: TextRange,
    /// Syntax errors detected so far, reported or not. Statements compare it before and
    /// after parsing to tell whether they are malformed.
    pub(crate) syntax_errors: u32,
    /// `syntax_errors` when each enclosing statement started.
    pub(crate) statement_marks: Vec<u32>,
    /// Offset where scanning stops; the source length except for islands.
    pub(crate) end_offset: u32,
    /// Name of each type declaration being parsed, innermost last.
    pub(crate) type_names: Vec<&'a str>,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(
        arena: &'a Bump,
        source: &str,
        interner: StringInterner,
        options: ResolvedOptions,
        mode: ParseMode,
    ) -> Self {
        let scanner = Scanner::new(source);
        let end_offset = scanner.source_len();
        Self {
            arena,
            scanner,
            interner,
            options,
            mode,
            source: arena.alloc_str(source),
            diagnostics: DiagnosticCollection::new(),
            recovery: RecoveryEngine::new(end_offset),
            assist: None,
            recursion_depth: 0,
            prev_range: TextRange::empty(0),
            syntax_errors: 0,
            statement_marks: Vec::new(),
            end_offset,
            type_names: Vec::new(),
        }
    }

    /// Parser diagnostics merged with the scanner's, sorted by position.
    /// Island parses leave lexical problems out, since the diet parse that
    /// preceded them already reported those.
    pub(crate) fn take_diagnostics(&mut self, include_lexical: bool) -> DiagnosticCollection {
        let parsed = std::mem::take(&mut self.diagnostics);
        let lexical = self.scanner.take_diagnostics();
        // Lexical problems go first so they lead at equal offsets.
        let mut diagnostics = if include_lexical {
            lexical
        } else {
            DiagnosticCollection::new()
        };
        diagnostics.extend(parsed);
        diagnostics.sort();
        diagnostics
    }

    // ========================================================================
    // Token management
    // ========================================================================

    #[inline]
    pub(crate) fn current_token(&self) -> SyntaxKind {
        self.scanner.token()
    }

    pub(crate) fn next_token(&mut self) -> SyntaxKind {
        if self.scanner.token() != SyntaxKind::Unknown {
            self.prev_range = self.scanner.token_range();
        }
        self.scanner.scan()
    }

    #[inline]
    pub(crate) fn token_pos(&self) -> u32 {
        self.scanner.token_start()
    }

    #[inline]
    pub(crate) fn token_end(&self) -> u32 {
        self.scanner.token_end()
    }

    #[inline]
    pub(crate) fn token_range(&self) -> TextRange {
        self.scanner.token_range()
    }

    #[inline]
    pub(crate) fn token_flags(&self) -> TokenFlags {
        self.scanner.token_flags()
    }

    #[inline]
    pub(crate) fn token_value(&self) -> &str {
        self.scanner.token_value()
    }

    /// End of the last consumed token; where nodes end.
    #[inline]
    pub(crate) fn last_end(&self) -> u32 {
        self.prev_range.end
    }

    #[inline]
    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.current_token() == kind
    }

    #[inline]
    pub(crate) fn is_eof(&self) -> bool {
        self.at(SyntaxKind::EndOfFileToken)
    }

    pub(crate) fn optional_token(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.next_token();
            true
        } else {
            false
        }
    }

    /// Kind of the token after the current one.
    pub(crate) fn peek(&mut self) -> SyntaxKind {
        self.scanner.look_ahead(|s| s.scan())
    }

    /// An identifier spelling a contextual keyword such as `record`.
    pub(crate) fn at_contextual(&self, word: &str) -> bool {
        self.at(SyntaxKind::Identifier)
            && !self.token_flags().contains(TokenFlags::CURSOR_TOKEN)
            && self.token_value() == word
    }

    /// Merge `>` with following `>` and `=` where operators are legal.
    pub(crate) fn rescan_greater_than(&mut self) -> SyntaxKind {
        self.scanner.rescan_greater_than_token()
    }

    /// Raw source of a range.
    pub(crate) fn source_text(&self, range: TextRange) -> String {
        self.scanner.text_slice(range.pos, range.end)
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    /// Report a problem unless the same one is already reported at `range`.
    /// While recovering, errors raised before another token is consumed
    /// still count as syntax errors but are not reported.
    pub(crate) fn report(
        &mut self,
        range: TextRange,
        message: &DiagnosticMessage,
        args: &[&str],
    ) -> bool {
        let is_error = message.category == DiagnosticCategory::Error;
        if is_error && self.recovery.is_follow_on(self.token_pos()) {
            self.syntax_errors += 1;
            return false;
        }
        if self.diagnostics.has_at(range.pos, message.code) {
            let duplicate = self.diagnostics.iter().any(|d| {
                d.span.start == range.pos
                    && d.code == message.code
                    && d.args.iter().map(String::as_str).eq(args.iter().copied())
            });
            if duplicate {
                return false;
            }
        }
        self.diagnostics.add(Diagnostic::new(range, message, args));
        if is_error {
            self.syntax_errors += 1;
            let at = self.token_pos();
            self.recovery.enter_recovering(at);
        }
        true
    }

    /// `Syntax error on token "x", {what} expected after this token`, or
    /// before the current token at the start of input.
    pub(crate) fn report_expected_after(&mut self, what: &str) {
        if self.prev_range.is_empty() {
            let range = self.token_range();
            let text = self.scanner.token_text();
            self.report(range, &messages::TOKEN_EXPECTED_BEFORE, &[&text, what]);
        } else {
            let range = self.prev_range;
            let text = self.source_text(range);
            self.report(range, &messages::TOKEN_EXPECTED_AFTER, &[&text, what]);
        }
    }

    /// `Syntax error on token "x", {what} expected` on the current token.
    pub(crate) fn report_expected(&mut self, what: &str) {
        let range = self.token_range();
        let text = if self.is_eof() {
            SyntaxKind::EndOfFileToken.describe().to_string()
        } else {
            self.scanner.token_text()
        };
        self.report(range, &messages::TOKEN_EXPECTED, &[&text, what]);
    }

    /// Report a problem whose severity the options decide.
    pub(crate) fn report_configurable(
        &mut self,
        problem: ConfigurableProblem,
        range: TextRange,
        message: &DiagnosticMessage,
        args: &[&str],
    ) {
        let Some(category) = self.options.severities.get(problem).category() else {
            return;
        };
        if self.diagnostics.has_at(range.pos, message.code) {
            return;
        }
        self.diagnostics
            .add(Diagnostic::new(range, message, args).with_category(category));
        if category == DiagnosticCategory::Error {
            self.syntax_errors += 1;
        }
    }

    /// Report `feature` when the source level is below `level`. The
    /// construct is still parsed and kept.
    pub(crate) fn require_level(&mut self, level: SourceLevel, feature: &str, range: TextRange) {
        if self.options.source_level >= level {
            return;
        }
        let level_text = level.to_string();
        self.report_configurable(
            ConfigurableProblem::SourceLevelFeature,
            range,
            &messages::FEATURE_REQUIRES_SOURCE_LEVEL,
            &[feature, &level_text],
        );
    }

    // ========================================================================
    // Recursion guard
    // ========================================================================

    /// Enter a nested construct. Returns `false`, after reporting, when the
    /// input is nested too deeply to parse.
    pub(crate) fn enter_nested(&mut self) -> bool {
        if self.recursion_depth >= MAX_RECURSION_DEPTH {
            let range = self.token_range();
            self.report(range, &messages::NESTING_TOO_DEEP, &[]);
            return false;
        }
        self.recursion_depth += 1;
        true
    }

    pub(crate) fn leave_nested(&mut self) {
        self.recursion_depth -= 1;
    }

    // ========================================================================
    // Allocation
    // ========================================================================

    /// Allocate a finished node. In assist mode the node is offered as the
    /// parent of the assist node.
    pub(crate) fn alloc<T: HasNodeData>(&mut self, node: T) -> &'a T {
        let node: &'a T = self.arena.alloc(node);
        if self.assist.is_some() {
            self.observe_finished(node.data());
        }
        node
    }

    #[inline]
    pub(crate) fn list<T>(&self, items: Vec<T>) -> &'a [T] {
        alloc_vec_in(self.arena, items)
    }

    #[inline]
    pub(crate) fn alloc_str(&self, text: &str) -> &'a str {
        self.arena.alloc_str(text)
    }

    /// Offer a node stored by value to the assist parent tracking.
    pub(crate) fn finished<T: HasNodeData>(&mut self, node: T) -> T {
        if self.assist.is_some() {
            self.observe_finished(node.data());
        }
        node
    }

    /// Node data from `pos` to the end of the last consumed token.
    #[inline]
    pub(crate) fn finish(&self, kind: SyntaxKind, pos: u32) -> NodeData {
        NodeData::new(kind, pos, self.last_end().max(pos))
    }

    /// Like [`Parser::finish`] for the node of the innermost statement,
    /// flagged `RECOVERED` when errors were reported inside it.
    pub(crate) fn finish_statement(&self, kind: SyntaxKind, pos: u32) -> NodeData {
        let mut data = self.finish(kind, pos);
        if self
            .statement_marks
            .last()
            .is_some_and(|mark| self.syntax_errors > *mark)
        {
            data.flags |= NodeFlags::RECOVERED;
        }
        data
    }

    // ========================================================================
    // Identifiers
    // ========================================================================

    /// Build an identifier from the current token and consume it.
    pub(crate) fn take_identifier(&mut self) -> Identifier<'a> {
        let range = self.token_range();
        let text = self.alloc_str(self.scanner.token_value());
        let name = self.interner.intern(text);
        self.next_token();
        Identifier {
            data: NodeData::new(SyntaxKind::Identifier, range.pos, range.end),
            name,
            text,
        }
    }

    /// A zero-width identifier after the last consumed token.
    pub(crate) fn missing_identifier(&self) -> Identifier<'a> {
        Identifier {
            data: NodeData::missing(SyntaxKind::Identifier, self.last_end()),
            name: self.interner.intern(""),
            text: "",
        }
    }

    /// Parse an identifier, repairing when absent. A keyword used as a name
    /// is reported and consumed when what follows reads like the rest of a
    /// declaration.
    pub(crate) fn expect_identifier(&mut self) -> Identifier<'a> {
        if self.at(SyntaxKind::Identifier) {
            self.recovery.resume();
            return self.take_identifier();
        }
        let current = self.current_token();
        if current.is_keyword() && !current.is_member_only_modifier() {
            let follows_name = matches!(
                self.peek(),
                SyntaxKind::SemicolonToken
                    | SyntaxKind::EqualsToken
                    | SyntaxKind::CommaToken
                    | SyntaxKind::OpenParenToken
                    | SyntaxKind::CloseParenToken
                    | SyntaxKind::OpenBracketToken
                    | SyntaxKind::DotToken
                    | SyntaxKind::ColonToken
            );
            if follows_name {
                self.report_expected(SyntaxKind::Identifier.describe());
                let mut ident = self.take_identifier();
                ident.data.flags |= NodeFlags::RECOVERED;
                return ident;
            }
        }
        self.report_expected_after(SyntaxKind::Identifier.describe());
        self.missing_identifier()
    }

    /// Whether the current token is where the assist cursor or selection
    /// lies and no assist node has been built yet.
    pub(crate) fn at_assist_token(&self) -> bool {
        self.assist_pending()
            && self
                .token_flags()
                .intersects(TokenFlags::AT_CURSOR | TokenFlags::CURSOR_TOKEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recovery::RecoveryState;

    fn parser<'a>(arena: &'a Bump, source: &str) -> Parser<'a> {
        let mut parser = Parser::new(
            arena,
            source,
            StringInterner::new(),
            ResolvedOptions::default(),
            ParseMode::Full,
        );
        parser.next_token();
        parser
    }

    #[test]
    fn test_alloc_vec_in() {
        let arena = Bump::new();
        let slice = alloc_vec_in(&arena, vec![String::from("a"), String::from("b")]);
        assert_eq!(slice, &["a".to_string(), "b".to_string()]);
        let empty: &[u32] = alloc_vec_in(&arena, Vec::new());
        assert!(empty.is_empty());
    }

    #[test]
    fn test_prev_range_tracks_consumed_token() {
        let arena = Bump::new();
        let mut p = parser(&arena, "foo  bar");
        assert_eq!(p.last_end(), 0);
        p.next_token();
        assert_eq!(p.prev_range, TextRange::new(0, 3));
        assert_eq!(p.token_range(), TextRange::new(5, 8));
    }

    #[test]
    fn test_duplicate_reports_are_dropped() {
        let arena = Bump::new();
        let mut p = parser(&arena, "x");
        let range = TextRange::new(0, 1);
        assert!(p.report(range, &messages::INSERT_TO_COMPLETE, &["}", "Block"]));
        p.next_token();
        assert!(!p.report(range, &messages::INSERT_TO_COMPLETE, &["}", "Block"]));
        assert!(p.report(range, &messages::INSERT_TO_COMPLETE, &["}", "ClassBody"]));
        assert_eq!(p.diagnostics.len(), 2);
        assert_eq!(p.syntax_errors, 2);
    }

    #[test]
    fn test_follow_on_errors_are_counted_not_reported() {
        let arena = Bump::new();
        let mut p = parser(&arena, "a b");
        assert_eq!(p.recovery.state, RecoveryState::Normal);
        let range = TextRange::new(0, 1);
        assert!(p.report(range, &messages::INSERT_TO_COMPLETE, &[";", "BlockStatements"]));
        assert_eq!(p.recovery.state, RecoveryState::Recovering);
        assert!(!p.report(range, &messages::INSERT_TO_COMPLETE, &["}", "Block"]));
        assert!(!p.report(range, &messages::INSERT_TO_COMPLETE, &["}", "ClassBody"]));
        assert_eq!(p.diagnostics.len(), 1);
        assert_eq!(p.syntax_errors, 3);

        // Consuming a token ends the follow-on window.
        p.next_token();
        assert!(p.report(TextRange::new(2, 3), &messages::INSERT_TO_COMPLETE, &["}", "Block"]));
        assert_eq!(p.diagnostics.len(), 2);

        p.recovery.resume();
        assert_eq!(p.recovery.state, RecoveryState::Normal);
        assert!(!p.recovery.is_follow_on(p.token_pos()));
    }

    #[test]
    fn test_unterminated_string_reports_once() {
        for source in ["class X { String s = \"abc\n}", "class X { String s = \"abc"] {
            let arena = Bump::new();
            let mut p = parser(&arena, source);
            p.parse_compilation_unit("X.java");
            let diagnostics = p.take_diagnostics(true);
            let messages = diagnostics.messages();
            assert_eq!(messages.len(), 2, "{source}: {messages:?}");
            assert_eq!(messages[0], "String literal is not properly closed by a double-quote");
        }
    }

    #[test]
    fn test_keyword_used_as_name() {
        let arena = Bump::new();
        let mut p = parser(&arena, "int = 1");
        let ident = p.expect_identifier();
        assert_eq!(ident.text, "int");
        assert!(ident.data.flags.contains(NodeFlags::RECOVERED));
        assert_eq!(
            p.diagnostics.messages(),
            vec!["Syntax error on token \"int\", Identifier expected"]
        );
    }

    #[test]
    fn test_missing_identifier_after_token() {
        let arena = Bump::new();
        let mut p = parser(&arena, "int )");
        p.next_token();
        let ident = p.expect_identifier();
        assert!(ident.is_missing());
        assert_eq!(ident.data.range, TextRange::empty(3));
        assert_eq!(
            p.diagnostics.messages(),
            vec!["Syntax error on token \"int\", Identifier expected after this token"]
        );
    }

    #[test]
    fn test_source_level_gate() {
        let arena = Bump::new();
        let mut p = parser(&arena, "x");
        p.options.source_level = SourceLevel::JAVA_7;
        p.require_level(SourceLevel::JAVA_8, "Lambda expressions", TextRange::new(0, 1));
        p.require_level(SourceLevel::JAVA_7, "Diamond operators", TextRange::new(0, 1));
        assert_eq!(
            p.diagnostics.messages(),
            vec!["Syntax error, Lambda expressions are only available if source level is 1.8 or above"]
        );
    }
}
