//! The Java scanner.
//!
//! Converts source text into tokens for the parser. Unicode escapes are
//! translated up front; every position the scanner reports (token offsets,
//! diagnostic spans) is an offset into the original text.

use crate::char_codes::*;
use crate::literals::{cook_text_block, decode_escape, Escape};
use crate::token::TokenInfo;
use crate::unicode;
use javelin_ast::syntax_kind::SyntaxKind;
use javelin_ast::types::TokenFlags;
use javelin_core::text::TextRange;
use javelin_diagnostics::{messages, Diagnostic, DiagnosticCollection, DiagnosticMessage};

/// Saved scanner state for lookahead.
#[derive(Debug, Clone)]
pub struct ScannerState {
    pub pos: usize,
    pub token_start: usize,
    pub token: SyntaxKind,
    pub token_value: String,
    pub token_flags: TokenFlags,
    pub token_pos: u32,
    pub token_end: u32,
}

/// What the assist machinery wants the scanner to watch for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssistTarget {
    /// Completion: flag the token ending at or containing the offset, or
    /// inject a zero-width identifier there.
    Cursor(u32),
    /// Selection: flag the identifier or keyword covering `[start, end)`.
    Selection(u32, u32),
}

/// The scanner converts Java source text into tokens.
pub struct Scanner {
    /// Source after unicode escape translation.
    text: Vec<char>,
    /// Original offset of every translated char, plus one trailing entry.
    /// `None` when the source has no unicode escapes.
    offsets: Option<Vec<u32>>,
    /// Untranslated source, kept only when it differs from `text`.
    original: Option<Vec<char>>,
    /// Malformed unicode escapes, reported when the scan passes them.
    escape_errors: Vec<(u32, u32)>,
    /// Current position in `text`.
    pos: usize,
    /// Scanning stops here (exclusive, index into `text`).
    limit: usize,
    /// Start of the current token in `text`.
    token_start: usize,
    token: SyntaxKind,
    token_value: String,
    token_flags: TokenFlags,
    /// Original offsets of the current token.
    token_pos: u32,
    token_end: u32,
    assist: Option<AssistTarget>,
    diagnostics: DiagnosticCollection,
}

impl Scanner {
    /// Create a new scanner for the given source text.
    pub fn new(source: &str) -> Self {
        let raw: Vec<char> = source.chars().collect();
        let (text, offsets, original, escape_errors) = if unicode::has_unicode_escape(source) {
            let translated = unicode::translate(&raw);
            (
                translated.chars,
                Some(translated.offsets),
                Some(raw),
                translated.errors,
            )
        } else {
            (raw, None, None, Vec::new())
        };
        let limit = text.len();
        Self {
            text,
            offsets,
            original,
            escape_errors,
            pos: 0,
            limit,
            token_start: 0,
            token: SyntaxKind::Unknown,
            token_value: String::new(),
            token_flags: TokenFlags::NONE,
            token_pos: 0,
            token_end: 0,
            assist: None,
            diagnostics: DiagnosticCollection::new(),
        }
    }

    /// Arm completion at the given original offset.
    pub fn set_cursor(&mut self, cursor: Option<u32>) {
        self.assist = cursor.map(AssistTarget::Cursor);
    }

    /// Arm selection of the original range `[start, end)`.
    pub fn set_selection(&mut self, range: Option<(u32, u32)>) {
        self.assist = range.map(|(start, end)| AssistTarget::Selection(start, end));
    }

    /// Length of the original source in chars.
    pub fn source_len(&self) -> u32 {
        match &self.original {
            Some(original) => original.len() as u32,
            None => self.text.len() as u32,
        }
    }

    /// Look ahead: save state, call f, restore state and return the result.
    pub fn look_ahead<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let state = self.save_state();
        let result = f(self);
        self.restore_state(state);
        result
    }

    /// Try scanning: save state, call f, restore state if f returns None.
    pub fn try_scan<T>(&mut self, f: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let state = self.save_state();
        let result = f(self);
        if result.is_none() {
            self.restore_state(state);
        }
        result
    }

    #[inline]
    pub fn token(&self) -> SyntaxKind {
        self.token
    }

    /// Identifier name, decoded literal value, or raw numeric text.
    #[inline]
    pub fn token_value(&self) -> &str {
        &self.token_value
    }

    /// Original offset of the current token.
    #[inline]
    pub fn token_start(&self) -> u32 {
        self.token_pos
    }

    /// Original offset one past the current token.
    #[inline]
    pub fn token_end(&self) -> u32 {
        self.token_end
    }

    #[inline]
    pub fn token_range(&self) -> TextRange {
        TextRange::new(self.token_pos, self.token_end)
    }

    #[inline]
    pub fn token_flags(&self) -> TokenFlags {
        self.token_flags
    }

    #[inline]
    pub fn has_preceding_line_break(&self) -> bool {
        self.token_flags.contains(TokenFlags::PRECEDING_LINE_BREAK)
    }

    /// Raw source text of the current token.
    pub fn token_text(&self) -> String {
        self.text_slice(self.token_pos, self.token_end)
    }

    pub fn diagnostics(&self) -> &DiagnosticCollection {
        &self.diagnostics
    }

    /// Take the accumulated diagnostics, leaving an empty collection.
    pub fn take_diagnostics(&mut self) -> DiagnosticCollection {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn token_info(&self) -> TokenInfo {
        TokenInfo {
            kind: self.token,
            pos: self.token_pos,
            end: self.token_end,
            text: self.token_value.clone(),
            flags: self.token_flags,
        }
    }

    pub fn save_state(&self) -> ScannerState {
        ScannerState {
            pos: self.pos,
            token_start: self.token_start,
            token: self.token,
            token_value: self.token_value.clone(),
            token_flags: self.token_flags,
            token_pos: self.token_pos,
            token_end: self.token_end,
        }
    }

    pub fn restore_state(&mut self, state: ScannerState) {
        self.pos = state.pos;
        self.token_start = state.token_start;
        self.token = state.token;
        self.token_value = state.token_value;
        self.token_flags = state.token_flags;
        self.token_pos = state.token_pos;
        self.token_end = state.token_end;
    }

    /// Restart scanning at an original offset. Nothing from the previous
    /// token carries over, so the next `scan` behaves as a fresh scanner
    /// started at `offset` would.
    pub fn reset_to(&mut self, offset: u32) {
        let pos = self.index_of(offset).min(self.limit);
        self.pos = pos;
        self.token_start = pos;
        self.token = SyntaxKind::Unknown;
        self.token_value.clear();
        self.token_flags = TokenFlags::NONE;
        self.token_pos = offset;
        self.token_end = offset;
    }

    /// Stop scanning at an original offset: `EndOfFileToken` is returned
    /// there. Used to lex a deferred body as an island.
    pub fn set_end(&mut self, offset: u32) {
        self.limit = self.index_of(offset).min(self.text.len());
    }

    /// Raw original source between two original offsets.
    pub fn text_slice(&self, start: u32, end: u32) -> String {
        let source = self.original.as_deref().unwrap_or(&self.text);
        let end = (end as usize).min(source.len());
        let start = (start as usize).min(end);
        source[start..end].iter().collect()
    }

    /// Lazily iterate the remaining tokens, ending with one `EndOfFileToken`.
    pub fn tokens(&mut self) -> Tokens<'_> {
        Tokens {
            scanner: self,
            done: false,
        }
    }

    // ========================================================================
    // Positions
    // ========================================================================

    /// Original offset of a translated index.
    #[inline]
    fn original_offset(&self, index: usize) -> u32 {
        match &self.offsets {
            Some(offsets) => offsets[index.min(offsets.len() - 1)],
            None => index as u32,
        }
    }

    /// Translated index of an original offset. Offsets inside an escape map
    /// to the char the escape produced.
    fn index_of(&self, offset: u32) -> usize {
        match &self.offsets {
            Some(offsets) => {
                let after = offsets.partition_point(|o| *o <= offset);
                after.saturating_sub(1).min(self.text.len())
            }
            None => (offset as usize).min(self.text.len()),
        }
    }

    #[inline]
    fn current_char(&self) -> Option<char> {
        self.char_at(0)
    }

    #[inline]
    fn char_at(&self, offset: usize) -> Option<char> {
        let at = self.pos + offset;
        if at < self.limit {
            self.text.get(at).copied()
        } else {
            None
        }
    }

    #[inline]
    fn is_eof(&self) -> bool {
        self.pos >= self.limit
    }

    fn chars_to_string(&self, start: usize, end: usize) -> String {
        self.text[start..end].iter().collect()
    }

    fn error(&mut self, message: &DiagnosticMessage, start: usize, end: usize, args: &[&str]) {
        let pos = self.original_offset(start);
        if self.diagnostics.has_at(pos, message.code) {
            return;
        }
        let end = self.original_offset(end).max(pos);
        self.diagnostics
            .add(Diagnostic::new(TextRange::new(pos, end), message, args));
    }

    fn report_escape_errors(&mut self, from: u32, to: u32) {
        if self.escape_errors.is_empty() {
            return;
        }
        let errors: Vec<(u32, u32)> = self
            .escape_errors
            .iter()
            .copied()
            .filter(|(start, _)| *start >= from && *start < to)
            .collect();
        for (start, end) in errors {
            if !self
                .diagnostics
                .has_at(start, messages::INVALID_UNICODE_ESCAPE.code)
            {
                self.diagnostics.add(Diagnostic::new(
                    TextRange::new(start, end),
                    &messages::INVALID_UNICODE_ESCAPE,
                    &[],
                ));
            }
        }
    }

    // ========================================================================
    // Core scanning
    // ========================================================================

    /// Skip whitespace and comments. Returns whether the completion cursor
    /// lies inside a skipped comment.
    fn skip_trivia(&mut self) -> bool {
        let cursor = match self.assist {
            Some(AssistTarget::Cursor(cursor)) => Some(cursor),
            _ => None,
        };
        let mut cursor_in_comment = false;
        loop {
            let Some(ch) = self.current_char() else {
                return cursor_in_comment;
            };
            match ch {
                '\r' | '\n' => {
                    self.token_flags |= TokenFlags::PRECEDING_LINE_BREAK;
                    self.pos += 1;
                }
                c if is_white_space_single_line(c) => {
                    self.pos += 1;
                }
                '/' if self.char_at(1) == Some('/') => {
                    let start = self.pos;
                    self.pos += 2;
                    while self.current_char().is_some_and(|c| !is_line_terminator(c)) {
                        self.pos += 1;
                    }
                    if let Some(cursor) = cursor {
                        let (s, e) = (self.original_offset(start), self.original_offset(self.pos));
                        cursor_in_comment |= s < cursor && cursor <= e;
                    }
                }
                '/' if self.char_at(1) == Some('*') => {
                    let start = self.pos;
                    let javadoc = self.char_at(2) == Some('*') && self.char_at(3) != Some('/');
                    self.pos += 2;
                    let mut closed = false;
                    while let Some(c) = self.current_char() {
                        if c == '*' && self.char_at(1) == Some('/') {
                            self.pos += 2;
                            closed = true;
                            break;
                        }
                        if is_line_terminator(c) {
                            self.token_flags |= TokenFlags::PRECEDING_LINE_BREAK;
                        }
                        self.pos += 1;
                    }
                    if !closed {
                        self.error(&messages::UNTERMINATED_COMMENT, start, self.pos, &[]);
                    }
                    if javadoc {
                        self.token_flags |= TokenFlags::PRECEDING_JAVADOC;
                    }
                    if let Some(cursor) = cursor {
                        let (s, e) = (self.original_offset(start), self.original_offset(self.pos));
                        cursor_in_comment |= s < cursor && (cursor < e || !closed);
                    }
                }
                // A trailing control-Z is tolerated as end of file.
                '\u{001A}' if self.pos + 1 == self.limit => {
                    self.pos += 1;
                }
                _ => return cursor_in_comment,
            }
        }
    }

    /// Scan the next token and return its kind.
    pub fn scan(&mut self) -> SyntaxKind {
        let entry = self.pos;
        let previous = self.token;
        let previous_end = self.token_end;
        self.token_flags = TokenFlags::NONE;
        self.token_value.clear();

        let cursor_in_comment = self.skip_trivia();
        self.token_start = self.pos;
        let start_offset = self.original_offset(self.pos);

        if let Some(AssistTarget::Cursor(cursor)) = self.assist {
            if !cursor_in_comment
                && previous_end <= cursor
                && cursor <= start_offset
                && can_precede_identifier(previous)
            {
                // Zero-width identifier at the cursor. The real next token is
                // scanned again, trivia included, on the following call.
                self.pos = entry;
                self.token = SyntaxKind::Identifier;
                self.token_flags |= TokenFlags::CURSOR_TOKEN;
                self.token_pos = cursor;
                self.token_end = cursor;
                return self.token;
            }
        }

        self.token = if self.is_eof() {
            SyntaxKind::EndOfFileToken
        } else {
            self.scan_token()
        };
        self.token_pos = start_offset;
        self.token_end = self.original_offset(self.pos);

        if self.offsets.is_some() {
            if self.token_end - self.token_pos != (self.pos - self.token_start) as u32 {
                self.token_flags |= TokenFlags::UNICODE_ESCAPE;
            }
            let from = self.original_offset(entry);
            self.report_escape_errors(from, self.token_end.max(from + 1));
        }
        if self.assist.is_some() {
            self.mark_assist_token();
        }
        self.token
    }

    fn mark_assist_token(&mut self) {
        let identifier_like = self.token == SyntaxKind::Identifier || self.token.is_keyword();
        if !identifier_like {
            return;
        }
        match self.assist {
            Some(AssistTarget::Cursor(cursor)) => {
                if self.token_pos < cursor && cursor <= self.token_end {
                    self.token_flags |= TokenFlags::AT_CURSOR;
                    if self.token.is_keyword() && self.token != SyntaxKind::ClassKeyword {
                        self.token = SyntaxKind::Identifier;
                        self.token_flags |= TokenFlags::KEYWORD_AT_CURSOR;
                    }
                }
            }
            Some(AssistTarget::Selection(start, end)) => {
                if self.token_pos <= start && end <= self.token_end {
                    self.token_flags |= TokenFlags::AT_CURSOR;
                }
            }
            None => {}
        }
    }

    fn scan_token(&mut self) -> SyntaxKind {
        let ch = self.text[self.pos];
        match ch {
            '(' => self.single(SyntaxKind::OpenParenToken),
            ')' => self.single(SyntaxKind::CloseParenToken),
            '{' => self.single(SyntaxKind::OpenBraceToken),
            '}' => self.single(SyntaxKind::CloseBraceToken),
            '[' => self.single(SyntaxKind::OpenBracketToken),
            ']' => self.single(SyntaxKind::CloseBracketToken),
            ';' => self.single(SyntaxKind::SemicolonToken),
            ',' => self.single(SyntaxKind::CommaToken),
            '@' => self.single(SyntaxKind::AtToken),
            '~' => self.single(SyntaxKind::TildeToken),
            '?' => self.single(SyntaxKind::QuestionToken),
            // `>` is always scanned alone; see `rescan_greater_than_token`.
            '>' => self.single(SyntaxKind::GreaterThanToken),
            ':' => {
                if self.char_at(1) == Some(':') {
                    self.pos += 2;
                    SyntaxKind::ColonColonToken
                } else {
                    self.single(SyntaxKind::ColonToken)
                }
            }
            '.' => self.scan_dot(),
            '=' => self.with_equals(SyntaxKind::EqualsToken, SyntaxKind::EqualsEqualsToken),
            '!' => self.with_equals(SyntaxKind::ExclamationToken, SyntaxKind::ExclamationEqualsToken),
            '*' => self.with_equals(SyntaxKind::AsteriskToken, SyntaxKind::AsteriskEqualsToken),
            '/' => self.with_equals(SyntaxKind::SlashToken, SyntaxKind::SlashEqualsToken),
            '%' => self.with_equals(SyntaxKind::PercentToken, SyntaxKind::PercentEqualsToken),
            '^' => self.with_equals(SyntaxKind::CaretToken, SyntaxKind::CaretEqualsToken),
            '<' => self.scan_less_than(),
            '+' => self.scan_doubled(
                '+',
                SyntaxKind::PlusToken,
                SyntaxKind::PlusPlusToken,
                SyntaxKind::PlusEqualsToken,
            ),
            '-' => {
                if self.char_at(1) == Some('>') {
                    self.pos += 2;
                    SyntaxKind::ArrowToken
                } else {
                    self.scan_doubled(
                        '-',
                        SyntaxKind::MinusToken,
                        SyntaxKind::MinusMinusToken,
                        SyntaxKind::MinusEqualsToken,
                    )
                }
            }
            '&' => self.scan_doubled(
                '&',
                SyntaxKind::AmpersandToken,
                SyntaxKind::AmpersandAmpersandToken,
                SyntaxKind::AmpersandEqualsToken,
            ),
            '|' => self.scan_doubled(
                '|',
                SyntaxKind::BarToken,
                SyntaxKind::BarBarToken,
                SyntaxKind::BarEqualsToken,
            ),
            '\'' => self.scan_character_literal(),
            '"' => {
                if self.char_at(1) == Some('"') && self.char_at(2) == Some('"') {
                    self.scan_text_block()
                } else {
                    self.scan_string_literal()
                }
            }
            '0'..='9' => self.scan_number(),
            _ if is_identifier_start(ch) => self.scan_identifier(),
            _ => {
                self.pos += 1;
                let text = ch.to_string();
                self.error(&messages::INVALID_CHARACTER, self.pos - 1, self.pos, &[&text]);
                self.token_value = text;
                SyntaxKind::InvalidToken
            }
        }
    }

    // ========================================================================
    // Operators
    // ========================================================================

    #[inline]
    fn single(&mut self, kind: SyntaxKind) -> SyntaxKind {
        self.pos += 1;
        kind
    }

    /// `op` or `op=`.
    fn with_equals(&mut self, plain: SyntaxKind, equals: SyntaxKind) -> SyntaxKind {
        if self.char_at(1) == Some('=') {
            self.pos += 2;
            equals
        } else {
            self.single(plain)
        }
    }

    /// `op`, `opop` or `op=`.
    fn scan_doubled(
        &mut self,
        ch: char,
        plain: SyntaxKind,
        doubled: SyntaxKind,
        equals: SyntaxKind,
    ) -> SyntaxKind {
        if self.char_at(1) == Some(ch) {
            self.pos += 2;
            doubled
        } else {
            self.with_equals(plain, equals)
        }
    }

    fn scan_less_than(&mut self) -> SyntaxKind {
        match self.char_at(1) {
            Some('<') => {
                if self.char_at(2) == Some('=') {
                    self.pos += 3;
                    SyntaxKind::LessThanLessThanEqualsToken
                } else {
                    self.pos += 2;
                    SyntaxKind::LessThanLessThanToken
                }
            }
            Some('=') => {
                self.pos += 2;
                SyntaxKind::LessThanEqualsToken
            }
            _ => self.single(SyntaxKind::LessThanToken),
        }
    }

    fn scan_dot(&mut self) -> SyntaxKind {
        if self.char_at(1) == Some('.') && self.char_at(2) == Some('.') {
            self.pos += 3;
            SyntaxKind::DotDotDotToken
        } else if self.char_at(1).is_some_and(is_digit) {
            self.scan_number()
        } else {
            self.single(SyntaxKind::DotToken)
        }
    }

    /// Merge the `>` just scanned with following `>` and `=` characters.
    /// The parser calls this where a shift or relational operator is legal;
    /// in type argument lists each `>` stays separate.
    pub fn rescan_greater_than_token(&mut self) -> SyntaxKind {
        if self.token != SyntaxKind::GreaterThanToken {
            return self.token;
        }
        let (advance, kind) = match (self.current_char(), self.char_at(1), self.char_at(2)) {
            (Some('>'), Some('>'), Some('=')) => {
                (3, SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken)
            }
            (Some('>'), Some('>'), _) => (2, SyntaxKind::GreaterThanGreaterThanGreaterThanToken),
            (Some('>'), Some('='), _) => (2, SyntaxKind::GreaterThanGreaterThanEqualsToken),
            (Some('>'), _, _) => (1, SyntaxKind::GreaterThanGreaterThanToken),
            (Some('='), _, _) => (1, SyntaxKind::GreaterThanEqualsToken),
            _ => return self.token,
        };
        self.pos += advance;
        self.token = kind;
        self.token_end = self.original_offset(self.pos);
        self.token
    }

    // ========================================================================
    // Identifiers
    // ========================================================================

    fn scan_identifier(&mut self) -> SyntaxKind {
        let start = self.pos;
        self.pos += 1;
        while self.current_char().is_some_and(is_identifier_part) {
            self.pos += 1;
        }
        self.token_value = self.chars_to_string(start, self.pos);
        SyntaxKind::from_keyword(&self.token_value).unwrap_or(SyntaxKind::Identifier)
    }

    // ========================================================================
    // Numbers
    // ========================================================================

    /// Consume digits and underscores accepted by `valid`. Returns the number
    /// of digits; misplaced underscores are reported.
    fn scan_digit_run(&mut self, valid: fn(char) -> bool) -> usize {
        let start = self.pos;
        let mut digits = 0;
        while let Some(ch) = self.current_char() {
            if ch == '_' {
                self.token_flags |= TokenFlags::CONTAINS_SEPARATOR;
            } else if valid(ch) {
                digits += 1;
            } else {
                break;
            }
            self.pos += 1;
        }
        if self.pos > start
            && (self.text[start] == '_' || self.text[self.pos - 1] == '_')
        {
            self.token_flags |= TokenFlags::MALFORMED;
            self.error(&messages::INVALID_UNDERSCORE, start, self.pos, &[]);
        }
        digits
    }

    fn scan_exponent(&mut self, start: usize, malformed: &DiagnosticMessage) {
        self.pos += 1;
        if let Some('+' | '-') = self.current_char() {
            self.pos += 1;
        }
        if self.scan_digit_run(is_digit) == 0 {
            self.token_flags |= TokenFlags::MALFORMED;
            self.error(malformed, start, self.pos, &[]);
        }
    }

    /// Consume identifier characters glued to a number (`12ab`).
    fn scan_trailing_garbage(&mut self, start: usize, radix: &str) {
        let garbage = self.pos;
        while self.current_char().is_some_and(is_identifier_part) {
            self.pos += 1;
        }
        if self.pos > garbage {
            self.token_flags |= TokenFlags::MALFORMED;
            let digit = self.text[garbage].to_string();
            self.error(&messages::INVALID_DIGIT, start, self.pos, &[&digit, radix]);
        }
    }

    fn scan_number(&mut self) -> SyntaxKind {
        let start = self.pos;
        let kind = if self.current_char() == Some('0') {
            match self.char_at(1) {
                Some('x' | 'X') => self.scan_hex_number(start),
                Some('b' | 'B') => self.scan_binary_number(start),
                _ => self.scan_decimal_number(start),
            }
        } else {
            self.scan_decimal_number(start)
        };
        self.token_value = self.chars_to_string(start, self.pos);
        kind
    }

    fn scan_decimal_number(&mut self, start: usize) -> SyntaxKind {
        let mut is_float = false;
        if self.current_char() != Some('.') {
            self.scan_digit_run(is_digit);
        }
        if self.current_char() == Some('.') && self.char_at(1) != Some('.') {
            is_float = true;
            self.pos += 1;
            if self.current_char() == Some('_') {
                self.token_flags |= TokenFlags::MALFORMED;
                self.error(&messages::INVALID_UNDERSCORE, self.pos, self.pos + 1, &[]);
            }
            self.scan_digit_run(is_digit);
        }
        if let Some('e' | 'E') = self.current_char() {
            is_float = true;
            self.scan_exponent(start, &messages::INVALID_FLOAT_LITERAL);
        }
        let digits_end = self.pos;
        let kind = match self.current_char() {
            Some('f' | 'F') => {
                self.pos += 1;
                SyntaxKind::FloatLiteral
            }
            Some('d' | 'D') => {
                self.pos += 1;
                SyntaxKind::DoubleLiteral
            }
            Some('l' | 'L') if !is_float => {
                self.pos += 1;
                SyntaxKind::LongLiteral
            }
            _ if is_float => SyntaxKind::DoubleLiteral,
            _ => SyntaxKind::IntegerLiteral,
        };

        if matches!(kind, SyntaxKind::IntegerLiteral | SyntaxKind::LongLiteral)
            && self.text[start] == '0'
            && digits_end - start > 1
        {
            self.token_flags |= TokenFlags::OCTAL;
            if let Some(bad) = self.text[start..digits_end]
                .iter()
                .find(|c| matches!(c, '8' | '9'))
            {
                let digit = bad.to_string();
                self.token_flags |= TokenFlags::MALFORMED;
                self.error(&messages::INVALID_DIGIT, start, self.pos, &[&digit, "octal"]);
            }
        }
        self.scan_trailing_garbage(start, "decimal");
        kind
    }

    fn scan_hex_number(&mut self, start: usize) -> SyntaxKind {
        self.pos += 2;
        self.token_flags |= TokenFlags::HEX_SPECIFIER;
        let mut digits = self.scan_digit_run(is_hex_digit);
        let mut is_float = false;
        if self.current_char() == Some('.') {
            is_float = true;
            self.pos += 1;
            digits += self.scan_digit_run(is_hex_digit);
        }
        if digits == 0 {
            self.token_flags |= TokenFlags::MALFORMED;
            self.error(&messages::INVALID_HEX_LITERAL, start, self.pos, &[]);
        }
        if let Some('p' | 'P') = self.current_char() {
            is_float = true;
            self.scan_exponent(start, &messages::INVALID_FLOAT_LITERAL);
        } else if is_float {
            // Hexadecimal floating literals require a binary exponent.
            self.token_flags |= TokenFlags::MALFORMED;
            self.error(&messages::INVALID_FLOAT_LITERAL, start, self.pos, &[]);
        }
        let kind = match self.current_char() {
            Some('f' | 'F') if is_float => {
                self.pos += 1;
                SyntaxKind::FloatLiteral
            }
            Some('d' | 'D') if is_float => {
                self.pos += 1;
                SyntaxKind::DoubleLiteral
            }
            Some('l' | 'L') if !is_float => {
                self.pos += 1;
                SyntaxKind::LongLiteral
            }
            _ if is_float => SyntaxKind::DoubleLiteral,
            _ => SyntaxKind::IntegerLiteral,
        };
        self.scan_trailing_garbage(start, "hexadecimal");
        kind
    }

    fn scan_binary_number(&mut self, start: usize) -> SyntaxKind {
        self.pos += 2;
        self.token_flags |= TokenFlags::BINARY_SPECIFIER;
        let run = self.pos;
        let digits = self.scan_digit_run(is_digit);
        let all_binary = self.text[run..self.pos]
            .iter()
            .all(|c| *c == '_' || is_binary_digit(*c));
        if digits == 0 || !all_binary {
            self.token_flags |= TokenFlags::MALFORMED;
            self.error(&messages::INVALID_BINARY_LITERAL, start, self.pos, &[]);
        }
        let kind = if let Some('l' | 'L') = self.current_char() {
            self.pos += 1;
            SyntaxKind::LongLiteral
        } else {
            SyntaxKind::IntegerLiteral
        };
        self.scan_trailing_garbage(start, "binary");
        kind
    }

    // ========================================================================
    // Characters, strings and text blocks
    // ========================================================================

    fn scan_character_literal(&mut self) -> SyntaxKind {
        let start = self.pos;
        self.pos += 1;
        let value = match self.current_char() {
            None => None,
            Some('\'') => None,
            Some(c) if is_line_terminator(c) => None,
            Some('\\') => match decode_escape(&self.text[..self.limit], self.pos, false) {
                Ok((Escape::Char(c), next)) => {
                    self.pos = next;
                    Some(c)
                }
                Ok((Escape::LineContinuation, next)) | Err(next) => {
                    let next = self.stop_before_line_end(next);
                    self.error(&messages::INVALID_ESCAPE, self.pos, next, &[]);
                    self.pos = next;
                    self.token_flags |= TokenFlags::MALFORMED;
                    None
                }
            },
            Some(c) => {
                self.pos += 1;
                Some(c)
            }
        };

        if value.is_some() && self.current_char() == Some('\'') {
            self.pos += 1;
            if let Some(c) = value {
                self.token_value.push(c);
            }
            return SyntaxKind::CharacterLiteral;
        }

        // Empty, overlong or unterminated: resync on the closing quote of the
        // same line, if any.
        if self.current_char() == Some('\'') && value.is_none() {
            self.pos += 1;
        } else {
            let mut closed = false;
            while let Some(c) = self.current_char() {
                if is_line_terminator(c) {
                    break;
                }
                self.pos += 1;
                if c == '\'' {
                    closed = true;
                    break;
                }
            }
            if !closed {
                self.token_flags |= TokenFlags::UNTERMINATED;
            }
        }
        self.token_flags |= TokenFlags::MALFORMED;
        self.error(&messages::INVALID_CHARACTER_CONSTANT, start, self.pos, &[]);
        SyntaxKind::CharacterLiteral
    }

    /// Clamp an escape's end so that it never swallows a line terminator.
    fn stop_before_line_end(&self, next: usize) -> usize {
        let mut i = self.pos + 1;
        while i < next.min(self.limit) {
            if is_line_terminator(self.text[i]) {
                return i;
            }
            i += 1;
        }
        next.min(self.limit)
    }

    fn scan_string_literal(&mut self) -> SyntaxKind {
        let start = self.pos;
        self.pos += 1;
        let mut value = String::new();
        loop {
            match self.current_char() {
                None => break,
                Some(c) if is_line_terminator(c) => break,
                Some('"') => {
                    self.pos += 1;
                    self.token_value = value;
                    return SyntaxKind::StringLiteral;
                }
                Some('\\') => match decode_escape(&self.text[..self.limit], self.pos, false) {
                    Ok((Escape::Char(c), next)) => {
                        value.push(c);
                        self.pos = next;
                    }
                    Ok((Escape::LineContinuation, next)) | Err(next) => {
                        let next = self.stop_before_line_end(next);
                        self.error(&messages::INVALID_ESCAPE, self.pos, next, &[]);
                        self.token_flags |= TokenFlags::MALFORMED;
                        self.pos = next;
                    }
                },
                Some(c) => {
                    value.push(c);
                    self.pos += 1;
                }
            }
        }
        self.token_flags |= TokenFlags::UNTERMINATED | TokenFlags::MALFORMED;
        self.error(&messages::UNTERMINATED_STRING, start, self.pos, &[]);
        self.token_value = value;
        SyntaxKind::StringLiteral
    }

    fn scan_text_block(&mut self) -> SyntaxKind {
        let start = self.pos;
        self.pos += 3;
        while self.current_char().is_some_and(is_white_space_single_line) {
            self.pos += 1;
        }
        match self.current_char() {
            Some('\r') => {
                self.pos += 1;
                if self.current_char() == Some('\n') {
                    self.pos += 1;
                }
            }
            Some('\n') => self.pos += 1,
            _ => {
                self.token_flags |= TokenFlags::MALFORMED;
                self.error(&messages::INVALID_TEXT_BLOCK_OPENING, start, self.pos, &[]);
            }
        }

        let content_start = self.pos;
        let mut content_end = None;
        while let Some(c) = self.current_char() {
            if c == '\\' {
                self.pos = (self.pos + 2).min(self.limit);
                continue;
            }
            if c == '"' && self.char_at(1) == Some('"') && self.char_at(2) == Some('"') {
                content_end = Some(self.pos);
                self.pos += 3;
                break;
            }
            self.pos += 1;
        }

        let Some(content_end) = content_end else {
            self.token_flags |= TokenFlags::UNTERMINATED | TokenFlags::MALFORMED;
            self.error(&messages::UNTERMINATED_TEXT_BLOCK, start, self.pos, &[]);
            self.token_value = self.chars_to_string(content_start, self.pos);
            return SyntaxKind::TextBlock;
        };

        let (value, invalid) = cook_text_block(&self.text[content_start..content_end]);
        for at in invalid {
            let at = content_start + at;
            self.token_flags |= TokenFlags::MALFORMED;
            self.error(&messages::INVALID_ESCAPE, at, (at + 2).min(content_end), &[]);
        }
        self.token_value = value;
        SyntaxKind::TextBlock
    }
}

/// Whether a completion identifier may directly follow a token of `kind`.
fn can_precede_identifier(kind: SyntaxKind) -> bool {
    use SyntaxKind::*;
    if kind.is_modifier_keyword() || kind.is_assignment_operator() {
        return true;
    }
    if (LessThanToken as u16..=BarBarToken as u16).contains(&(kind as u16)) {
        return true;
    }
    matches!(
        kind,
        Unknown
            | DotToken
            | OpenParenToken
            | CloseParenToken
            | CommaToken
            | OpenBraceToken
            | CloseBraceToken
            | SemicolonToken
            | OpenBracketToken
            | AtToken
            | QuestionToken
            | ColonToken
            | ArrowToken
            | ColonColonToken
            | NewKeyword
            | ReturnKeyword
            | ExtendsKeyword
            | ImplementsKeyword
            | ThrowsKeyword
            | InstanceofKeyword
            | CaseKeyword
            | ImportKeyword
            | PackageKeyword
            | ThrowKeyword
            | ElseKeyword
            | DoKeyword
            | AssertKeyword
    )
}

/// Iterator over the remaining tokens of a scanner.
pub struct Tokens<'s> {
    scanner: &'s mut Scanner,
    done: bool,
}

impl Iterator for Tokens<'_> {
    type Item = TokenInfo;

    fn next(&mut self) -> Option<TokenInfo> {
        if self.done {
            return None;
        }
        let kind = self.scanner.scan();
        self.done = kind == SyntaxKind::EndOfFileToken;
        Some(self.scanner.token_info())
    }
}
