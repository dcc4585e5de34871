//! javelin_diagnostics: structured problems reported while scanning and
//! parsing Java source.
//!
//! A diagnostic carries its span, a message template with `{0}`-style
//! placeholders and the arguments substituted into it. The rendered text is
//! kept alongside so callers that only print messages need not re-format.

use javelin_core::text::{TextRange, TextSpan};
use std::fmt;

/// How serious a reported problem is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DiagnosticCategory {
    Info,
    Warning,
    Error,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Info => write!(f, "info"),
            DiagnosticCategory::Warning => write!(f, "warning"),
            DiagnosticCategory::Error => write!(f, "error"),
        }
    }
}

/// A catalogue entry: code, default category and message template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

/// A reported problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub span: TextSpan,
    pub code: u32,
    pub category: DiagnosticCategory,
    pub template: &'static str,
    pub args: Vec<String>,
    pub message_text: String,
}

impl Diagnostic {
    pub fn new(range: TextRange, message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            span: range.to_span(),
            code: message.code,
            category: message.category,
            template: message.message,
            args: args.iter().map(|a| a.to_string()).collect(),
            message_text: format_message(message.message, args),
        }
    }

    /// Overrides the catalogue category, as configured severities do.
    pub fn with_category(mut self, category: DiagnosticCategory) -> Self {
        self.category = category;
        self
    }

    pub fn range(&self) -> TextRange {
        self.span.to_text_range()
    }

    #[inline]
    pub fn source_start(&self) -> i64 {
        self.range().source_start()
    }

    #[inline]
    pub fn source_end(&self) -> i64 {
        self.range().source_end()
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} J{} at {:?}: {}",
            self.category, self.code, self.span, self.message_text
        )
    }
}

/// Substitutes `{0}`, `{1}`, ... in `template`. Placeholders without a
/// matching argument are left in place.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len() + 16);
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let substituted = after.find('}').and_then(|close| {
            let index: usize = after[..close].parse().ok()?;
            let arg = args.get(index)?;
            Some((arg, close))
        });
        match substituted {
            Some((arg, close)) => {
                out.push_str(arg);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Diagnostics gathered by one parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticCollection {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Whether a diagnostic with `code` already starts at `pos`.
    pub fn has_at(&self, pos: u32, code: u32) -> bool {
        self.diagnostics
            .iter()
            .rev()
            .any(|d| d.span.start == pos && d.code == code)
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn extend(&mut self, other: DiagnosticCollection) {
        self.diagnostics.extend(other.diagnostics);
    }

    pub fn retain(&mut self, keep: impl FnMut(&Diagnostic) -> bool) {
        self.diagnostics.retain(keep);
    }

    /// Stable sort by start offset, so problems reported at the same place
    /// keep the order the parser found them in.
    pub fn sort(&mut self) {
        self.diagnostics.sort_by_key(|d| d.span.start);
    }

    /// The rendered messages, in order.
    pub fn messages(&self) -> Vec<&str> {
        self.diagnostics
            .iter()
            .map(|d| d.message_text.as_str())
            .collect()
    }
}

impl<'a> IntoIterator for &'a DiagnosticCollection {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}

// ============================================================================
// Message catalogue
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($code:expr, Error, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Error, message: $msg }
        };
        ($code:expr, Warning, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Warning, message: $msg }
        };
        ($code:expr, Info, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Info, message: $msg }
        };
    }

    // ========================================================================
    // Lexical problems (100-199)
    // ========================================================================
    pub const UNTERMINATED_STRING: DiagnosticMessage = diag!(100, Error, "String literal is not properly closed by a double-quote");
    pub const INVALID_CHARACTER_CONSTANT: DiagnosticMessage = diag!(101, Error, "Invalid character constant");
    pub const UNTERMINATED_COMMENT: DiagnosticMessage = diag!(102, Error, "Unexpected end of comment");
    pub const UNTERMINATED_TEXT_BLOCK: DiagnosticMessage = diag!(103, Error, "Text block is not properly closed with the delimiter");
    pub const INVALID_ESCAPE: DiagnosticMessage = diag!(104, Error, "Invalid escape sequence (valid ones are  \\b  \\t  \\n  \\f  \\r  \\s  \\\"  \\'  \\\\ )");
    pub const INVALID_UNICODE_ESCAPE: DiagnosticMessage = diag!(105, Error, "Invalid unicode");
    pub const INVALID_HEX_LITERAL: DiagnosticMessage = diag!(106, Error, "Invalid hex literal number");
    pub const INVALID_BINARY_LITERAL: DiagnosticMessage = diag!(107, Error, "Invalid binary literal number (only '0' and '1' are expected)");
    pub const INVALID_FLOAT_LITERAL: DiagnosticMessage = diag!(108, Error, "Invalid float literal number");
    pub const INVALID_UNDERSCORE: DiagnosticMessage = diag!(109, Error, "Underscores have to be located within digits");
    pub const INVALID_CHARACTER: DiagnosticMessage = diag!(110, Error, "Syntax error on token \"{0}\", invalid character in source");
    pub const INVALID_DIGIT: DiagnosticMessage = diag!(111, Error, "Invalid digit \"{0}\" in {1} literal");
    pub const INVALID_TEXT_BLOCK_OPENING: DiagnosticMessage = diag!(112, Error, "Text block opening delimiter must be followed by a line terminator");

    // ========================================================================
    // Syntax problems (200-299)
    // ========================================================================
    pub const INSERT_TO_COMPLETE: DiagnosticMessage = diag!(200, Error, "Syntax error, insert \"{0}\" to complete {1}");
    pub const DELETE_TOKEN: DiagnosticMessage = diag!(201, Error, "Syntax error on token \"{0}\", delete this token");
    pub const DELETE_TOKENS: DiagnosticMessage = diag!(202, Error, "Syntax error on tokens, delete these tokens");
    pub const TOKEN_EXPECTED: DiagnosticMessage = diag!(203, Error, "Syntax error on token \"{0}\", {1} expected");
    pub const TOKEN_EXPECTED_AFTER: DiagnosticMessage = diag!(204, Error, "Syntax error on token \"{0}\", {1} expected after this token");
    pub const TOKEN_EXPECTED_BEFORE: DiagnosticMessage = diag!(205, Error, "Syntax error on token \"{0}\", {1} expected before this token");
    pub const MISPLACED_CONSTRUCTS: DiagnosticMessage = diag!(206, Error, "Syntax error on token(s), misplaced construct(s)");
    pub const UNEXPECTED_END_OF_FILE: DiagnosticMessage = diag!(207, Error, "Syntax error, unexpected end of file");
    pub const NESTING_TOO_DEEP: DiagnosticMessage = diag!(208, Error, "Syntax error, the construct is nested too deeply");
    pub const RETURN_TYPE_MISSING: DiagnosticMessage = diag!(209, Error, "Return type for the method is missing");
    pub const VARARGS_NOT_LAST: DiagnosticMessage = diag!(210, Error, "Only the last formal parameter may be variable arity");
    pub const INVALID_ASSIGNMENT_TARGET: DiagnosticMessage = diag!(211, Error, "Syntax error on token \"{0}\", invalid AssignmentOperator");
    pub const OPERATOR_AFTER_TYPE: DiagnosticMessage = diag!(212, Error, "Syntax error on token \"{0}\", the type of an instanceof cannot be an operand");

    // ========================================================================
    // Source level (300-399)
    // ========================================================================
    pub const FEATURE_REQUIRES_SOURCE_LEVEL: DiagnosticMessage = diag!(300, Error, "Syntax error, {0} are only available if source level is {1} or above");

    // ========================================================================
    // Configurable style problems (400-499)
    // ========================================================================
    pub const UNNECESSARY_SEMICOLON: DiagnosticMessage = diag!(400, Warning, "Unnecessary semicolon");
    pub const EMPTY_CONTROL_STATEMENT: DiagnosticMessage = diag!(401, Warning, "Empty control-flow statement");
    pub const DEPRECATED_METHOD_DIMENSIONS: DiagnosticMessage = diag!(402, Warning, "Array dimensions after the method parameter list are deprecated");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_message() {
        let msg = format_message(messages::INSERT_TO_COMPLETE.message, &["}", "Statement"]);
        assert_eq!(msg, "Syntax error, insert \"}\" to complete Statement");
    }

    #[test]
    fn test_format_message_keeps_unmatched_placeholders() {
        assert_eq!(format_message("a {1} b", &["x"]), "a {1} b");
        assert_eq!(format_message("{ {0} }", &["x"]), "{ x }");
        assert_eq!(format_message("no args", &[]), "no args");
    }

    #[test]
    fn test_diagnostic_keeps_template_and_args() {
        let diag = Diagnostic::new(TextRange::new(10, 15), &messages::DELETE_TOKEN, &["else"]);
        assert_eq!(diag.template, messages::DELETE_TOKEN.message);
        assert_eq!(diag.args, vec!["else".to_string()]);
        assert_eq!(diag.source_start(), 10);
        assert_eq!(diag.source_end(), 14);
        assert!(diag.is_error());
        assert!(format!("{diag}").contains("J201"));
    }

    #[test]
    fn test_sort_is_stable() {
        let mut collection = DiagnosticCollection::new();
        collection.add(Diagnostic::new(TextRange::new(9, 10), &messages::DELETE_TOKEN, &[";"]));
        collection.add(Diagnostic::new(TextRange::empty(3), &messages::INSERT_TO_COMPLETE, &[";", "a"]));
        collection.add(Diagnostic::new(TextRange::empty(3), &messages::INSERT_TO_COMPLETE, &[";", "b"]));
        collection.sort();
        let args: Vec<_> = collection.iter().map(|d| d.args.last().cloned()).collect();
        assert_eq!(
            args,
            vec![Some("a".to_string()), Some("b".to_string()), Some(";".to_string())]
        );
    }

    #[test]
    fn test_category_override() {
        let diag = Diagnostic::new(TextRange::new(0, 1), &messages::UNNECESSARY_SEMICOLON, &[])
            .with_category(DiagnosticCategory::Error);
        let mut collection = DiagnosticCollection::new();
        collection.add(diag);
        assert_eq!(collection.error_count(), 1);
        assert!(collection.has_at(0, messages::UNNECESSARY_SEMICOLON.code));
    }
}
