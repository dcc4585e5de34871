//! Error recovery.
//!
//! Three strategies are tried in order when the parser does not find the
//! token it expects:
//!
//! 1. Insertion: a missing closer or `;` is assumed when the current token
//!    is a natural boundary (end of file, a closer some enclosing construct
//!    is waiting for, or a modifier that only starts members).
//! 2. Deletion: up to `DELETE_WINDOW` stray tokens in front of the expected
//!    one are discarded.
//! 3. Insertion anyway, so the caller can continue with a zero-width node.
//!
//! When a list loop meets a token it cannot use at all, it falls back to
//! [`Parser::skip_to_boundary`], which discards balanced token runs up to
//! the next statement, member or type boundary. Every list loop also ticks a
//! step budget proportional to the input length; when it runs out the scan
//! is forced to end of file, so a parse always terminates.

use javelin_ast::syntax_kind::SyntaxKind;
use javelin_ast::types::TokenFlags;
use javelin_core::text::TextRange;
use javelin_diagnostics::messages;
use tracing::trace;

use crate::parser::Parser;

// ============================================================================
// Token sets
// ============================================================================

/// A set of token kinds with O(1) membership. Every token kind's
/// discriminant is below 128.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub(crate) struct TokenSet(u128);

impl TokenSet {
    #[inline]
    pub(crate) const fn new() -> Self {
        Self(0)
    }

    #[inline]
    #[must_use]
    pub(crate) const fn with(self, kind: SyntaxKind) -> Self {
        Self(self.0 | (1u128 << kind as u16))
    }

    #[inline]
    #[must_use]
    pub(crate) const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[inline]
    pub(crate) const fn contains(&self, kind: SyntaxKind) -> bool {
        let index = kind as u16;
        index < 128 && (self.0 & (1u128 << index)) != 0
    }
}

/// Keywords that begin a statement and nothing else.
pub(crate) const STATEMENT_KEYWORDS: TokenSet = TokenSet::new()
    .with(SyntaxKind::IfKeyword)
    .with(SyntaxKind::WhileKeyword)
    .with(SyntaxKind::DoKeyword)
    .with(SyntaxKind::ForKeyword)
    .with(SyntaxKind::TryKeyword)
    .with(SyntaxKind::SwitchKeyword)
    .with(SyntaxKind::ReturnKeyword)
    .with(SyntaxKind::ThrowKeyword)
    .with(SyntaxKind::BreakKeyword)
    .with(SyntaxKind::ContinueKeyword)
    .with(SyntaxKind::AssertKeyword);

/// Where a skipped run inside a block stops.
pub(crate) const STATEMENT_BOUNDARY: TokenSet = STATEMENT_KEYWORDS
    .with(SyntaxKind::SemicolonToken)
    .with(SyntaxKind::OpenBraceToken)
    .with(SyntaxKind::CloseBraceToken)
    .with(SyntaxKind::EndOfFileToken)
    .union(MEMBER_ONLY_MODIFIERS);

/// Modifiers never legal on a statement.
pub(crate) const MEMBER_ONLY_MODIFIERS: TokenSet = TokenSet::new()
    .with(SyntaxKind::PublicKeyword)
    .with(SyntaxKind::PrivateKeyword)
    .with(SyntaxKind::ProtectedKeyword)
    .with(SyntaxKind::StaticKeyword)
    .with(SyntaxKind::NativeKeyword)
    .with(SyntaxKind::TransientKeyword)
    .with(SyntaxKind::VolatileKeyword);

/// Where a skipped run inside a class body stops.
pub(crate) const MEMBER_BOUNDARY: TokenSet = MEMBER_ONLY_MODIFIERS
    .with(SyntaxKind::AbstractKeyword)
    .with(SyntaxKind::FinalKeyword)
    .with(SyntaxKind::SynchronizedKeyword)
    .with(SyntaxKind::StrictfpKeyword)
    .with(SyntaxKind::ClassKeyword)
    .with(SyntaxKind::InterfaceKeyword)
    .with(SyntaxKind::EnumKeyword)
    .with(SyntaxKind::AtToken)
    .with(SyntaxKind::VoidKeyword)
    .with(SyntaxKind::SemicolonToken)
    .with(SyntaxKind::CloseBraceToken)
    .with(SyntaxKind::EndOfFileToken);

/// Where a skipped run at the top level stops.
pub(crate) const TYPE_BOUNDARY: TokenSet = TokenSet::new()
    .with(SyntaxKind::ClassKeyword)
    .with(SyntaxKind::InterfaceKeyword)
    .with(SyntaxKind::EnumKeyword)
    .with(SyntaxKind::AtToken)
    .with(SyntaxKind::ImportKeyword)
    .with(SyntaxKind::PublicKeyword)
    .with(SyntaxKind::AbstractKeyword)
    .with(SyntaxKind::FinalKeyword)
    .with(SyntaxKind::SemicolonToken)
    .with(SyntaxKind::EndOfFileToken);

// ============================================================================
// Recovery log
// ============================================================================

/// Whether the parser is in the middle of repairing an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecoveryState {
    #[default]
    Normal,
    /// An error was reported and the parser has not yet consumed an
    /// expected token since.
    Recovering,
}

/// The grammar construct a missing token would have completed. Its label is
/// the `{1}` argument of the insertion diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Construct {
    Block,
    BlockStatements,
    Statement,
    MethodBody,
    ClassBody,
    InterfaceBody,
    EnumBody,
    RecordBody,
    AnnotationTypeBody,
    SwitchBlock,
    ArrayInitializer,
    ArgumentList,
    FormalParameterList,
    RecordHeader,
    Expression,
    Dimensions,
    TypeArguments,
    TypeParameters,
    FieldDeclaration,
    LocalVariableDeclaration,
    MethodDeclaration,
    ImportDeclaration,
    PackageDeclaration,
    TryStatement,
    ResourceSpecification,
    CatchHeader,
    AnnotationArguments,
    EnumConstant,
    LambdaExpression,
    SwitchLabel,
    ConditionalExpression,
    ClassHeader,
}

impl Construct {
    pub fn label(self) -> &'static str {
        match self {
            Construct::Block => "Block",
            Construct::BlockStatements => "BlockStatements",
            Construct::Statement => "Statement",
            Construct::MethodBody => "MethodBody",
            Construct::ClassBody => "ClassBody",
            Construct::InterfaceBody => "InterfaceBody",
            Construct::EnumBody => "EnumBody",
            Construct::RecordBody => "RecordBody",
            Construct::AnnotationTypeBody => "AnnotationTypeBody",
            Construct::SwitchBlock => "SwitchBlock",
            Construct::ArrayInitializer => "ArrayInitializer",
            Construct::ArgumentList => "ArgumentList",
            Construct::FormalParameterList => "FormalParameterList",
            Construct::RecordHeader => "RecordHeader",
            Construct::Expression => "Expression",
            Construct::Dimensions => "Dimensions",
            Construct::TypeArguments => "TypeArguments",
            Construct::TypeParameters => "TypeParameters",
            Construct::FieldDeclaration => "FieldDeclaration",
            Construct::LocalVariableDeclaration => "LocalVariableDeclaration",
            Construct::MethodDeclaration => "MethodDeclaration",
            Construct::ImportDeclaration => "ImportDeclaration",
            Construct::PackageDeclaration => "PackageDeclaration",
            Construct::TryStatement => "TryStatement",
            Construct::ResourceSpecification => "ResourceSpecification",
            Construct::CatchHeader => "CatchHeader",
            Construct::AnnotationArguments => "AnnotationArguments",
            Construct::EnumConstant => "EnumConstant",
            Construct::LambdaExpression => "LambdaExpression",
            Construct::SwitchLabel => "SwitchLabel",
            Construct::ConditionalExpression => "ConditionalExpression",
            Construct::ClassHeader => "ClassHeader",
        }
    }
}

/// One repair the parser made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryAction {
    /// A zero-width token was assumed at `at`.
    InsertToken {
        kind: SyntaxKind,
        at: u32,
        construct: &'static str,
    },
    /// `count` tokens covering `range` were discarded.
    DeleteTokens { range: TextRange, count: u32 },
    /// Statements found among members were wrapped in a synthesized
    /// initializer block.
    WrapInBlock { range: TextRange },
    /// Panic mode discarded `range` up to a boundary token.
    SkipToBoundary { range: TextRange },
}

/// Every repair of one parse, in the order they were made.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecoveryLog {
    actions: Vec<RecoveryAction>,
}

impl RecoveryLog {
    pub fn push(&mut self, action: RecoveryAction) {
        self.actions.push(action);
    }

    pub fn actions(&self) -> &[RecoveryAction] {
        &self.actions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RecoveryAction> {
        self.actions.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn extend(&mut self, other: RecoveryLog) {
        self.actions.extend(other.actions);
    }

    /// Number of tokens assumed present.
    pub fn insertions(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| matches!(a, RecoveryAction::InsertToken { .. }))
            .count()
    }
}

// ============================================================================
// Engine state
// ============================================================================

/// Tokens that may be discarded in one deletion repair.
const DELETE_WINDOW: u32 = 3;

/// Loop iterations allowed per character of input.
const STEPS_PER_CHAR: u64 = 8;

#[derive(Debug, Clone, Copy)]
pub(crate) struct OpenBracket {
    pub(crate) kind: SyntaxKind,
    pub(crate) construct: Construct,
    /// The opener itself was missing; its closer is optional.
    pub(crate) assumed: bool,
}

#[derive(Debug)]
pub(crate) struct RecoveryEngine {
    pub(crate) state: RecoveryState,
    /// Token offset where the last reported error left the parser.
    recovering_at: u32,
    pub(crate) log: RecoveryLog,
    brackets: Vec<OpenBracket>,
    steps: u64,
    budget: u64,
    exhausted: bool,
}

impl RecoveryEngine {
    pub(crate) fn new(source_len: u32) -> Self {
        Self {
            state: RecoveryState::Normal,
            recovering_at: 0,
            log: RecoveryLog::default(),
            brackets: Vec::new(),
            steps: 0,
            budget: STEPS_PER_CHAR * (source_len as u64 + 16),
            exhausted: false,
        }
    }

    pub(crate) fn enter_recovering(&mut self, at: u32) {
        self.state = RecoveryState::Recovering;
        self.recovering_at = at;
    }

    /// An error at token offset `at` follows from the one already
    /// reported: no token was consumed since.
    pub(crate) fn is_follow_on(&self, at: u32) -> bool {
        self.state == RecoveryState::Recovering && at == self.recovering_at
    }

    pub(crate) fn resume(&mut self) {
        self.state = RecoveryState::Normal;
    }

    pub(crate) fn push(&mut self, bracket: OpenBracket) {
        self.brackets.push(bracket);
    }

    pub(crate) fn pop(&mut self) -> Option<OpenBracket> {
        self.brackets.pop()
    }

    pub(crate) fn depth(&self) -> usize {
        self.brackets.len()
    }

    /// Whether any open bracket waits for `closer`.
    pub(crate) fn any_expects(&self, closer: SyntaxKind) -> bool {
        self.brackets
            .iter()
            .any(|b| !b.assumed && b.kind.matching_closer() == Some(closer))
    }

    /// Count one loop iteration. Returns `false` once the budget is spent.
    pub(crate) fn tick(&mut self) -> bool {
        self.steps += 1;
        self.steps <= self.budget
    }

    pub(crate) fn record(&mut self, action: RecoveryAction) {
        trace!(?action, "recovery");
        self.log.push(action);
    }
}

// ============================================================================
// Parser operations
// ============================================================================

impl<'a> Parser<'a> {
    /// Consume an opening bracket and remember what it opens. A missing
    /// opener is reported once and its closer becomes optional.
    pub(crate) fn open_bracket(&mut self, kind: SyntaxKind, construct: Construct) -> bool {
        let present = self.at(kind);
        if present {
            self.next_token();
            self.recovery.resume();
        } else {
            self.report_expected_after(kind.describe());
        }
        self.recovery.push(OpenBracket {
            kind,
            construct,
            assumed: !present,
        });
        present
    }

    /// Consume the closer of the innermost bracket, repairing when absent.
    /// `label` overrides the construct named in an insertion diagnostic.
    pub(crate) fn close_bracket(&mut self, label: Option<&'static str>) -> bool {
        let Some(open) = self.recovery.pop() else {
            return false;
        };
        let Some(closer) = open.kind.matching_closer() else {
            return false;
        };
        if self.at(closer) {
            self.next_token();
            self.recovery.resume();
            return true;
        }
        if open.assumed {
            return false;
        }
        let label = label.unwrap_or(open.construct.label());
        if !self.is_insertion_boundary(closer) && self.delete_until(closer) {
            self.next_token();
            self.recovery.resume();
            return true;
        }
        self.insert_missing(closer, label);
        false
    }

    /// Consume a non-bracket token, repairing when absent.
    pub(crate) fn expect(&mut self, kind: SyntaxKind, construct: Construct) -> bool {
        if self.at(kind) {
            self.next_token();
            self.recovery.resume();
            return true;
        }
        if !self.is_insertion_boundary(kind) && self.delete_until(kind) {
            self.next_token();
            self.recovery.resume();
            return true;
        }
        self.insert_missing(kind, construct.label());
        false
    }

    /// Whether a missing `expected` should simply be assumed in front of
    /// the current token.
    pub(crate) fn is_insertion_boundary(&self, expected: SyntaxKind) -> bool {
        let current = self.current_token();
        match current {
            SyntaxKind::EndOfFileToken | SyntaxKind::CloseBraceToken => true,
            SyntaxKind::CloseParenToken | SyntaxKind::CloseBracketToken => {
                current != expected && self.recovery.any_expects(current)
            }
            SyntaxKind::SemicolonToken => matches!(
                expected,
                SyntaxKind::CloseParenToken | SyntaxKind::CloseBracketToken
            ),
            _ => current.is_member_only_modifier() && self.recovery.depth() > 0,
        }
    }

    /// Report and log a zero-width `kind` after the previous token. The
    /// same insertion is reported once per position.
    pub(crate) fn insert_missing(&mut self, kind: SyntaxKind, label: &'static str) {
        let at = self.last_end();
        let text = kind.describe();
        let range = self.prev_range;
        self.report(range, &messages::INSERT_TO_COMPLETE, &[text, label]);
        self.recovery.record(RecoveryAction::InsertToken {
            kind,
            at,
            construct: label,
        });
    }

    /// Look up to `DELETE_WINDOW` tokens ahead for `expected`. When found,
    /// discard the tokens in between and report them; the parser is left
    /// at `expected`.
    fn delete_until(&mut self, expected: SyntaxKind) -> bool {
        let found = self.scanner.look_ahead(|s| {
            let mut count = 0;
            while count < DELETE_WINDOW {
                let kind = s.token();
                let undeletable = kind == SyntaxKind::EndOfFileToken
                    || kind == SyntaxKind::SemicolonToken
                    || kind.is_open_bracket()
                    || kind.is_close_bracket()
                    || s.token_flags()
                        .intersects(TokenFlags::AT_CURSOR | TokenFlags::CURSOR_TOKEN);
                if undeletable {
                    return None;
                }
                count += 1;
                if s.scan() == expected {
                    return Some(count);
                }
            }
            None
        });
        let Some(count) = found else {
            return false;
        };
        let start = self.token_pos();
        let first = self.scanner.token_text();
        for _ in 0..count {
            self.next_token();
        }
        let range = TextRange::new(start, self.last_end());
        if count == 1 {
            self.report(range, &messages::DELETE_TOKEN, &[&first]);
        } else {
            self.report(range, &messages::DELETE_TOKENS, &[]);
        }
        self.recovery.record(RecoveryAction::DeleteTokens { range, count });
        true
    }

    /// Discard the current token, which nothing enclosing can use.
    pub(crate) fn delete_current(&mut self) {
        let range = self.token_range();
        let text = self.scanner.token_text();
        self.next_token();
        self.report(range, &messages::DELETE_TOKEN, &[&text]);
        self.recovery.record(RecoveryAction::DeleteTokens { range, count: 1 });
    }

    /// A closer no open bracket is waiting for.
    pub(crate) fn at_stray_closer(&self) -> bool {
        let current = self.current_token();
        current.is_close_bracket() && !self.recovery.any_expects(current)
    }

    /// Panic mode: discard tokens until one in `boundary`, a closer some
    /// enclosing bracket expects, or end of file. Nested brackets are
    /// skipped whole. At least the current token is consumed unless it
    /// already stops the skip. Returns the number of tokens discarded.
    pub(crate) fn skip_to_boundary(&mut self, boundary: TokenSet) -> u32 {
        let start = self.token_pos();
        let first = self.scanner.token_text();
        let mut count = 0u32;
        loop {
            let kind = self.current_token();
            if kind == SyntaxKind::EndOfFileToken {
                break;
            }
            if kind.is_close_bracket() && self.recovery.any_expects(kind) {
                break;
            }
            if count > 0 && boundary.contains(kind) {
                break;
            }
            if kind.is_open_bracket() {
                count += self.skip_balanced();
            } else {
                self.next_token();
                count += 1;
            }
            if count > 0 && boundary.contains(self.current_token()) {
                break;
            }
        }
        if count > 0 {
            let range = TextRange::new(start, self.last_end());
            if count == 1 {
                self.report(range, &messages::DELETE_TOKEN, &[&first]);
            } else {
                self.report(range, &messages::DELETE_TOKENS, &[]);
            }
            self.recovery.record(RecoveryAction::SkipToBoundary { range });
        }
        count
    }

    /// Consume a bracketed run starting at the current opener, up to and
    /// including its closer. Returns the number of tokens consumed.
    pub(crate) fn skip_balanced(&mut self) -> u32 {
        let mut depth = 0u32;
        let mut count = 0u32;
        loop {
            let kind = self.current_token();
            if kind == SyntaxKind::EndOfFileToken {
                break;
            }
            if kind.is_open_bracket() {
                depth += 1;
            } else if kind.is_close_bracket() {
                depth = depth.saturating_sub(1);
            }
            self.next_token();
            count += 1;
            if depth == 0 {
                break;
            }
        }
        count
    }

    /// Count a list loop iteration. When the budget is spent the rest of
    /// the input is abandoned and `false` is returned.
    pub(crate) fn tick(&mut self) -> bool {
        if self.recovery.tick() {
            return true;
        }
        if !self.recovery.exhausted {
            self.recovery.exhausted = true;
            let range = TextRange::new(self.token_pos(), self.end_offset.max(self.token_pos()));
            self.report(range, &messages::UNEXPECTED_END_OF_FILE, &[]);
            self.recovery.record(RecoveryAction::SkipToBoundary { range });
            self.scanner.reset_to(self.end_offset);
            self.next_token();
        }
        false
    }
}
