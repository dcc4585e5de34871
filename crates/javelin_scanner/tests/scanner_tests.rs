//! Scanner integration tests.
//!
//! Verifies that the scanner tokenizes Java constructs, reports lexical
//! problems in original coordinates and supports the assist machinery.

use javelin_ast::syntax_kind::SyntaxKind;
use javelin_ast::types::TokenFlags;
use javelin_core::text::TextRange;
use javelin_scanner::{Scanner, TokenInfo};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// Helper: scan all tokens from source and return as (kind, value) pairs.
fn scan_all(source: &str) -> Vec<(SyntaxKind, String)> {
    let mut scanner = Scanner::new(source);
    let mut tokens = Vec::new();
    loop {
        let kind = scanner.scan();
        if kind == SyntaxKind::EndOfFileToken {
            break;
        }
        tokens.push((kind, scanner.token_value().to_string()));
    }
    tokens
}

/// Helper: scan all token kinds.
fn scan_kinds(source: &str) -> Vec<SyntaxKind> {
    scan_all(source).into_iter().map(|(k, _)| k).collect()
}

/// Helper: scan one token and return it with the scanner's diagnostics.
fn scan_one(source: &str) -> (TokenInfo, Vec<String>) {
    let mut scanner = Scanner::new(source);
    scanner.scan();
    let token = scanner.token_info();
    let messages = scanner
        .diagnostics()
        .iter()
        .map(|d| d.message_text.clone())
        .collect();
    (token, messages)
}

fn with_cursor(source: &str, cursor: u32) -> Vec<TokenInfo> {
    let mut scanner = Scanner::new(source);
    scanner.set_cursor(Some(cursor));
    scanner.tokens().collect()
}

#[test]
fn test_empty_source() {
    assert!(scan_all("").is_empty());
    assert_eq!(
        Scanner::new("").tokens().map(|t| t.kind).collect::<Vec<_>>(),
        vec![SyntaxKind::EndOfFileToken]
    );
}

#[test]
fn test_whitespace_and_comments_only() {
    assert!(scan_all("   \n\t  // line\n /* block */ /** doc */").is_empty());
}

#[test]
fn test_integer_literals() {
    let cases = [
        ("42", SyntaxKind::IntegerLiteral),
        ("42L", SyntaxKind::LongLiteral),
        ("0x7fff_ffff", SyntaxKind::IntegerLiteral),
        ("0b1010", SyntaxKind::IntegerLiteral),
        ("017", SyntaxKind::IntegerLiteral),
        ("1_000_000l", SyntaxKind::LongLiteral),
        ("0", SyntaxKind::IntegerLiteral),
    ];
    for (source, kind) in cases {
        let (token, messages) = scan_one(source);
        assert_eq!(token.kind, kind, "{source}");
        assert_eq!(token.text, source);
        assert!(messages.is_empty(), "{source}: {messages:?}");
    }
    let (token, _) = scan_one("017");
    assert!(token.flags.contains(TokenFlags::OCTAL));
    let (token, _) = scan_one("0L");
    assert!(!token.flags.contains(TokenFlags::OCTAL));
}

#[test]
fn test_floating_literals() {
    let cases = [
        ("3.14", SyntaxKind::DoubleLiteral),
        ("3.14f", SyntaxKind::FloatLiteral),
        (".5", SyntaxKind::DoubleLiteral),
        ("1e10", SyntaxKind::DoubleLiteral),
        ("1E-3D", SyntaxKind::DoubleLiteral),
        ("2.", SyntaxKind::DoubleLiteral),
        ("0x1.8p1", SyntaxKind::DoubleLiteral),
        ("0x1p-2f", SyntaxKind::FloatLiteral),
        ("09.5", SyntaxKind::DoubleLiteral),
    ];
    for (source, kind) in cases {
        let (token, messages) = scan_one(source);
        assert_eq!(token.kind, kind, "{source}");
        assert!(messages.is_empty(), "{source}: {messages:?}");
    }
}

#[test]
fn test_malformed_numbers_keep_their_kind() {
    let (token, messages) = scan_one("0x");
    assert_eq!(token.kind, SyntaxKind::IntegerLiteral);
    assert!(token.flags.contains(TokenFlags::MALFORMED));
    assert_eq!(messages, vec!["Invalid hex literal number"]);

    let (token, messages) = scan_one("0b102");
    assert!(token.flags.contains(TokenFlags::MALFORMED));
    assert_eq!(
        messages,
        vec!["Invalid binary literal number (only '0' and '1' are expected)"]
    );

    let (_, messages) = scan_one("1_");
    assert_eq!(messages, vec!["Underscores have to be located within digits"]);

    let (_, messages) = scan_one("1e+");
    assert_eq!(messages, vec!["Invalid float literal number"]);

    let (_, messages) = scan_one("0x1.8");
    assert_eq!(messages, vec!["Invalid float literal number"]);

    let (token, messages) = scan_one("089");
    assert!(token.flags.contains(TokenFlags::OCTAL | TokenFlags::MALFORMED));
    assert_eq!(messages, vec!["Invalid digit \"8\" in octal literal"]);
}

#[test]
fn test_number_followed_by_letters() {
    let (token, messages) = scan_one("12ab");
    assert_eq!(token.range(), TextRange::new(0, 4));
    assert_eq!(messages, vec!["Invalid digit \"a\" in decimal literal"]);
}

#[test]
fn test_character_literals() {
    assert_eq!(
        scan_all(r"'a' '\n' '\'' 'A' '\101'"),
        vec![
            (SyntaxKind::CharacterLiteral, "a".to_string()),
            (SyntaxKind::CharacterLiteral, "\n".to_string()),
            (SyntaxKind::CharacterLiteral, "'".to_string()),
            (SyntaxKind::CharacterLiteral, "A".to_string()),
            (SyntaxKind::CharacterLiteral, "A".to_string()),
        ]
    );
}

#[test]
fn test_invalid_character_constants() {
    for source in ["''", "'ab'", "'a"] {
        let (token, messages) = scan_one(source);
        assert_eq!(token.kind, SyntaxKind::CharacterLiteral, "{source}");
        assert!(token.flags.contains(TokenFlags::MALFORMED));
        assert_eq!(messages, vec!["Invalid character constant"], "{source}");
    }
}

#[test]
fn test_string_literals() {
    assert_eq!(
        scan_all(r#""hello" "" "a\tb\"c\\""#),
        vec![
            (SyntaxKind::StringLiteral, "hello".to_string()),
            (SyntaxKind::StringLiteral, String::new()),
            (SyntaxKind::StringLiteral, "a\tb\"c\\".to_string()),
        ]
    );
}

#[test]
fn test_unterminated_string_stops_at_line_end() {
    let mut scanner = Scanner::new("\"abc\nint");
    assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
    assert!(scanner.token_flags().contains(TokenFlags::UNTERMINATED));
    assert_eq!(scanner.token_range(), TextRange::new(0, 4));
    assert_eq!(scanner.scan(), SyntaxKind::IntKeyword);
    let diagnostics = scanner.take_diagnostics();
    assert_eq!(
        diagnostics.messages(),
        vec!["String literal is not properly closed by a double-quote"]
    );
    assert_eq!(diagnostics.diagnostics()[0].range(), TextRange::new(0, 4));
}

#[test]
fn test_invalid_escape_is_reported_and_scanning_continues() {
    let (token, messages) = scan_one(r#""a\qb""#);
    assert_eq!(token.kind, SyntaxKind::StringLiteral);
    assert_eq!(token.text, "ab");
    assert_eq!(messages.len(), 1);
    assert!(messages[0].starts_with("Invalid escape sequence"));
}

#[test]
fn test_text_block() {
    let source = "String s = \"\"\"\n    hello\n      world\n    \"\"\";";
    let tokens = scan_all(source);
    assert_eq!(tokens[3], (SyntaxKind::TextBlock, "hello\n  world\n".to_string()));
    assert_eq!(tokens[4].0, SyntaxKind::SemicolonToken);
}

#[test]
fn test_text_block_problems() {
    let (_, messages) = scan_one("\"\"\"abc\"\"\"");
    assert_eq!(
        messages,
        vec!["Text block opening delimiter must be followed by a line terminator"]
    );
    let (token, messages) = scan_one("\"\"\"\n abc");
    assert!(token.flags.contains(TokenFlags::UNTERMINATED));
    assert_eq!(
        messages,
        vec!["Text block is not properly closed with the delimiter"]
    );
}

#[test]
fn test_unterminated_comment() {
    let mut scanner = Scanner::new("int /* never closed");
    assert_eq!(scanner.scan(), SyntaxKind::IntKeyword);
    assert_eq!(scanner.scan(), SyntaxKind::EndOfFileToken);
    assert_eq!(scanner.diagnostics().messages(), vec!["Unexpected end of comment"]);
}

#[test]
fn test_invalid_character() {
    let mut scanner = Scanner::new("a # b");
    let kinds: Vec<_> = scanner.tokens().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::Identifier,
            SyntaxKind::InvalidToken,
            SyntaxKind::Identifier,
            SyntaxKind::EndOfFileToken
        ]
    );
    assert_eq!(
        scanner.diagnostics().messages(),
        vec!["Syntax error on token \"#\", invalid character in source"]
    );
}

#[test]
fn test_identifiers_and_contextual_words() {
    assert_eq!(
        scan_all("foo $bar _baz é var record yield sealed permits"),
        ["foo", "$bar", "_baz", "é", "var", "record", "yield", "sealed", "permits"]
            .iter()
            .map(|s| (SyntaxKind::Identifier, s.to_string()))
            .collect::<Vec<_>>()
    );
}

#[test]
fn test_keywords() {
    assert_eq!(
        scan_kinds("class interface enum extends implements instanceof new null true"),
        vec![
            SyntaxKind::ClassKeyword,
            SyntaxKind::InterfaceKeyword,
            SyntaxKind::EnumKeyword,
            SyntaxKind::ExtendsKeyword,
            SyntaxKind::ImplementsKeyword,
            SyntaxKind::InstanceofKeyword,
            SyntaxKind::NewKeyword,
            SyntaxKind::NullKeyword,
            SyntaxKind::TrueKeyword,
        ]
    );
}

#[test]
fn test_non_sealed_scans_as_three_tokens() {
    assert_eq!(
        scan_kinds("non-sealed"),
        vec![SyntaxKind::Identifier, SyntaxKind::MinusToken, SyntaxKind::Identifier]
    );
}

#[test]
fn test_generic_closers_stay_separate() {
    assert_eq!(
        scan_kinds("List<List<String>>"),
        vec![
            SyntaxKind::Identifier,
            SyntaxKind::LessThanToken,
            SyntaxKind::Identifier,
            SyntaxKind::LessThanToken,
            SyntaxKind::Identifier,
            SyntaxKind::GreaterThanToken,
            SyntaxKind::GreaterThanToken,
        ]
    );
}

#[test]
fn test_rescan_right_shift() {
    let mut scanner = Scanner::new("a >> 2");
    scanner.scan();
    assert_eq!(scanner.scan(), SyntaxKind::GreaterThanToken);
    assert_eq!(
        scanner.rescan_greater_than_token(),
        SyntaxKind::GreaterThanGreaterThanToken
    );
    assert_eq!(scanner.scan(), SyntaxKind::IntegerLiteral);
}

#[test]
fn test_rescan_greater_than_equals() {
    let mut scanner = Scanner::new("a >= 2");
    scanner.scan();
    scanner.scan();
    assert_eq!(
        scanner.rescan_greater_than_token(),
        SyntaxKind::GreaterThanEqualsToken
    );
    assert_eq!(scanner.token_range(), TextRange::new(2, 4));
}

#[test]
fn test_lambda_and_method_reference_tokens() {
    assert_eq!(
        scan_kinds("(a, b) -> a::compareTo"),
        vec![
            SyntaxKind::OpenParenToken,
            SyntaxKind::Identifier,
            SyntaxKind::CommaToken,
            SyntaxKind::Identifier,
            SyntaxKind::CloseParenToken,
            SyntaxKind::ArrowToken,
            SyntaxKind::Identifier,
            SyntaxKind::ColonColonToken,
            SyntaxKind::Identifier,
        ]
    );
}

#[test]
fn test_token_positions() {
    let mut scanner = Scanner::new("int  x;");
    scanner.scan();
    assert_eq!(scanner.token_range(), TextRange::new(0, 3));
    scanner.scan();
    assert_eq!(scanner.token_range(), TextRange::new(5, 6));
    scanner.scan();
    assert_eq!(scanner.token_range(), TextRange::new(6, 7));
}

#[test]
fn test_crlf_line_breaks() {
    let mut scanner = Scanner::new("a\r\nb");
    scanner.scan();
    assert!(!scanner.has_preceding_line_break());
    scanner.scan();
    assert!(scanner.has_preceding_line_break());
    assert_eq!(scanner.token_start(), 3);
}

#[test]
fn test_unicode_escape_in_keyword() {
    // An escaped `c` still spells the keyword.
    let mut scanner = Scanner::new("\\u0063lass A");
    assert_eq!(scanner.scan(), SyntaxKind::ClassKeyword);
    assert_eq!(scanner.token_range(), TextRange::new(0, 10));
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert_eq!(scanner.token_start(), 11);
}

#[test]
fn test_invalid_unicode_escape_reported_once() {
    let mut scanner = Scanner::new("a \\u00g1 b");
    let _ = scanner.tokens().count();
    let messages = scanner.diagnostics().messages();
    assert_eq!(messages.iter().filter(|m| **m == "Invalid unicode").count(), 1);
}

#[test]
fn test_look_ahead_restores_state() {
    let mut scanner = Scanner::new("a b c");
    scanner.scan();
    let second = scanner.look_ahead(|s| {
        s.scan();
        s.token_value().to_string()
    });
    assert_eq!(second, "b");
    assert_eq!(scanner.token_value(), "a");
    scanner.scan();
    assert_eq!(scanner.token_value(), "b");
}

#[test]
fn test_try_scan_keeps_state_on_success() {
    let mut scanner = Scanner::new("a b");
    scanner.scan();
    let none: Option<()> = scanner.try_scan(|s| {
        s.scan();
        None
    });
    assert!(none.is_none());
    assert_eq!(scanner.token_value(), "a");
    let some = scanner.try_scan(|s| {
        s.scan();
        Some(s.token_value().to_string())
    });
    assert_eq!(some.as_deref(), Some("b"));
    assert_eq!(scanner.token_value(), "b");
}

#[test]
fn test_text_slice_uses_original_text() {
    let scanner = Scanner::new("x = \\u0031;");
    assert_eq!(scanner.text_slice(4, 10), "\\u0031");
    assert_eq!(scanner.text_slice(8, 100), "31;");
    assert_eq!(scanner.source_len(), 11);
}

// ============================================================================
// Assist support
// ============================================================================

#[test]
fn test_cursor_token_injected_in_argument_slot() {
    let source = "this.fred(1, 2, i);";
    let tokens = with_cursor(source, 10);
    let cursor = &tokens[4];
    assert_eq!(cursor.kind, SyntaxKind::Identifier);
    assert!(cursor.flags.contains(TokenFlags::CURSOR_TOKEN));
    assert_eq!(cursor.range(), TextRange::empty(10));
    assert_eq!(tokens[5].kind, SyntaxKind::IntegerLiteral);
    assert_eq!(
        tokens.iter().filter(|t| t.is_at_cursor()).count(),
        1,
        "exactly one cursor token"
    );
}

#[test]
fn test_identifier_ending_at_cursor_is_flagged() {
    let tokens = with_cursor("e.has", 5);
    assert_eq!(tokens[2].text, "has");
    assert!(tokens[2].flags.contains(TokenFlags::AT_CURSOR));
    assert!(!tokens.iter().any(|t| t.flags.contains(TokenFlags::CURSOR_TOKEN)));
}

#[test]
fn test_keyword_at_cursor_becomes_identifier() {
    let tokens = with_cursor("x = ret", 7);
    assert_eq!(tokens[2].kind, SyntaxKind::Identifier);
    let tokens = with_cursor("return", 3);
    assert_eq!(tokens[0].kind, SyntaxKind::Identifier);
    assert!(tokens[0].flags.contains(TokenFlags::KEYWORD_AT_CURSOR));
    let tokens = with_cursor("class", 5);
    assert_eq!(tokens[0].kind, SyntaxKind::ClassKeyword);
}

#[test]
fn test_cursor_after_dot_at_end_of_file() {
    let tokens = with_cursor("a.", 2);
    let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::Identifier,
            SyntaxKind::DotToken,
            SyntaxKind::Identifier,
            SyntaxKind::EndOfFileToken
        ]
    );
    assert!(tokens[2].flags.contains(TokenFlags::CURSOR_TOKEN));
}

#[test]
fn test_no_cursor_token_inside_comment_or_literal() {
    let tokens = with_cursor("a. // x\n", 6);
    assert!(!tokens.iter().any(|t| t.is_at_cursor()));
    let tokens = with_cursor("a. // x\n", 2);
    assert!(tokens.iter().any(|t| t.flags.contains(TokenFlags::CURSOR_TOKEN)));
    let tokens = with_cursor("\"abc\"", 2);
    assert!(!tokens.iter().any(|t| t.is_at_cursor()));
    let tokens = with_cursor("\"abc\"", 5);
    assert!(!tokens.iter().any(|t| t.is_at_cursor()));
}

#[test]
fn test_no_cursor_token_after_identifier() {
    let tokens = with_cursor("foo ", 4);
    assert!(!tokens.iter().any(|t| t.is_at_cursor()));
}

#[test]
fn test_selection_flags_covering_token() {
    let mut scanner = Scanner::new("super(fred());");
    scanner.set_selection(Some((6, 10)));
    let tokens: Vec<_> = scanner.tokens().collect();
    let flagged: Vec<_> = tokens.iter().filter(|t| t.is_at_cursor()).collect();
    assert_eq!(flagged.len(), 1);
    assert_eq!(flagged[0].text, "fred");
    assert_eq!(tokens[0].kind, SyntaxKind::SuperKeyword);
}

// ============================================================================
// Restart
// ============================================================================

fn tokens_from(source: &str, offset: u32) -> Vec<TokenInfo> {
    let mut scanner = Scanner::new(source);
    scanner.reset_to(offset);
    scanner.tokens().collect()
}

#[test]
fn test_reset_to_discards_previous_token() {
    let mut scanner = Scanner::new("alpha beta gamma");
    scanner.scan();
    scanner.scan();
    scanner.reset_to(6);
    assert_eq!(scanner.token(), SyntaxKind::Unknown);
    scanner.scan();
    assert_eq!(scanner.token_value(), "beta");
}

/// Plain source text or a unicode escape, so restarts land on both sides
/// of escape translation.
fn fragment() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => "[a-z0-9 (){};=+<>.'\"\n/*]{1,4}",
        1 => prop::sample::select(vec!["\\u0041", "\\u0062", "\\uu0030", "\\u0020", "\\u0028"])
            .prop_map(String::from),
    ]
}

proptest! {
    #[test]
    fn prop_reset_to_matches_fresh_scan(
        fragments in prop::collection::vec(fragment(), 0..12),
        split in 0usize..=64,
    ) {
        let mut source = String::new();
        let mut escapes = Vec::new();
        for fragment in &fragments {
            let start = source.len();
            source.push_str(fragment);
            if fragment.starts_with('\\') {
                escapes.push(start..source.len());
            }
        }
        let offset = split.min(source.len());
        let restarted = tokens_from(&source, offset as u32);
        match escapes.iter().find(|e| e.start < offset && offset < e.end) {
            // Inside an escape the scan restarts at the char it produced.
            Some(escape) => {
                prop_assert_eq!(restarted, tokens_from(&source, escape.start as u32));
            }
            None => {
                let fresh: Vec<TokenInfo> = Scanner::new(&source[offset..])
                    .tokens()
                    .map(|mut t| {
                        t.pos += offset as u32;
                        t.end += offset as u32;
                        t
                    })
                    .collect();
                prop_assert_eq!(restarted, fresh);
            }
        }
    }

    #[test]
    fn prop_scanner_always_reaches_end(source in "\\PC{0,64}") {
        let mut scanner = Scanner::new(&source);
        let mut last_end = 0;
        let len = scanner.source_len();
        for token in scanner.tokens() {
            prop_assert!(token.pos <= token.end);
            prop_assert!(token.end <= len);
            prop_assert!(token.end >= last_end || token.kind == SyntaxKind::EndOfFileToken);
            last_end = token.end;
        }
    }
}
