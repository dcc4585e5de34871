//! Token classification and lookahead skimmers.
//!
//! The skimmers advance a scanner over the tokens of a type without
//! building nodes. They run inside `Scanner::look_ahead`, so the parser can
//! decide between a declaration and an expression, or a cast and a
//! parenthesized expression, before committing.

use javelin_ast::syntax_kind::SyntaxKind;
use javelin_scanner::Scanner;

/// Check if a token kind can start an expression.
pub(crate) fn can_start_expression(kind: SyntaxKind) -> bool {
    kind.is_literal_start()
        || kind.is_primitive_type()
        || matches!(
            kind,
            SyntaxKind::Identifier
                | SyntaxKind::OpenParenToken
                | SyntaxKind::ThisKeyword
                | SyntaxKind::SuperKeyword
                | SyntaxKind::NewKeyword
                | SyntaxKind::SwitchKeyword
                | SyntaxKind::VoidKeyword
                | SyntaxKind::PlusToken
                | SyntaxKind::MinusToken
                | SyntaxKind::PlusPlusToken
                | SyntaxKind::MinusMinusToken
                | SyntaxKind::ExclamationToken
                | SyntaxKind::TildeToken
                | SyntaxKind::AtToken
        )
}

/// Check if a token kind can start a statement.
pub(crate) fn can_start_statement(kind: SyntaxKind) -> bool {
    can_start_expression(kind)
        || matches!(
            kind,
            SyntaxKind::OpenBraceToken
                | SyntaxKind::SemicolonToken
                | SyntaxKind::IfKeyword
                | SyntaxKind::WhileKeyword
                | SyntaxKind::DoKeyword
                | SyntaxKind::ForKeyword
                | SyntaxKind::TryKeyword
                | SyntaxKind::ReturnKeyword
                | SyntaxKind::ThrowKeyword
                | SyntaxKind::BreakKeyword
                | SyntaxKind::ContinueKeyword
                | SyntaxKind::AssertKeyword
                | SyntaxKind::SynchronizedKeyword
                | SyntaxKind::FinalKeyword
                | SyntaxKind::AbstractKeyword
                | SyntaxKind::StrictfpKeyword
                | SyntaxKind::ClassKeyword
                | SyntaxKind::InterfaceKeyword
                | SyntaxKind::EnumKeyword
        )
}

/// Tokens that start a statement but never a member, so meeting one in a
/// class body means statements were written outside a method.
pub(crate) fn is_statement_only_start(kind: SyntaxKind) -> bool {
    kind.is_literal_start()
        || matches!(
            kind,
            SyntaxKind::IfKeyword
                | SyntaxKind::WhileKeyword
                | SyntaxKind::DoKeyword
                | SyntaxKind::ForKeyword
                | SyntaxKind::TryKeyword
                | SyntaxKind::SwitchKeyword
                | SyntaxKind::ReturnKeyword
                | SyntaxKind::ThrowKeyword
                | SyntaxKind::BreakKeyword
                | SyntaxKind::ContinueKeyword
                | SyntaxKind::AssertKeyword
                | SyntaxKind::ThisKeyword
                | SyntaxKind::SuperKeyword
                | SyntaxKind::NewKeyword
                | SyntaxKind::PlusPlusToken
                | SyntaxKind::MinusMinusToken
                | SyntaxKind::OpenParenToken
                | SyntaxKind::ExclamationToken
        )
}

/// What can follow `(Type)` when the parentheses are a cast to a reference
/// type. `+` and `-` are excluded: `(a) - b` is a subtraction.
pub(crate) fn can_follow_reference_cast(kind: SyntaxKind) -> bool {
    kind.is_literal_start()
        || kind.is_primitive_type()
        || matches!(
            kind,
            SyntaxKind::Identifier
                | SyntaxKind::OpenParenToken
                | SyntaxKind::ThisKeyword
                | SyntaxKind::SuperKeyword
                | SyntaxKind::NewKeyword
                | SyntaxKind::SwitchKeyword
                | SyntaxKind::ExclamationToken
                | SyntaxKind::TildeToken
        )
}

/// What follows the name in a local variable declaration.
pub(crate) fn can_follow_declarator_name(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::EqualsToken
            | SyntaxKind::SemicolonToken
            | SyntaxKind::CommaToken
            | SyntaxKind::OpenBracketToken
            | SyntaxKind::ColonToken
            | SyntaxKind::CloseBraceToken
            | SyntaxKind::EndOfFileToken
    )
}

pub(crate) fn is_prefix_operator(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::PlusToken
            | SyntaxKind::MinusToken
            | SyntaxKind::PlusPlusToken
            | SyntaxKind::MinusMinusToken
            | SyntaxKind::ExclamationToken
            | SyntaxKind::TildeToken
    )
}

// ============================================================================
// Skimmers
// ============================================================================

/// Skip annotations in front of a type: `@A`, `@a.B(...)`.
pub(crate) fn skim_annotations(s: &mut Scanner) -> bool {
    while s.token() == SyntaxKind::AtToken {
        if s.scan() != SyntaxKind::Identifier {
            return false;
        }
        while s.scan() == SyntaxKind::DotToken {
            if s.scan() != SyntaxKind::Identifier {
                return false;
            }
        }
        if s.token() == SyntaxKind::OpenParenToken && !skim_balanced(s) {
            return false;
        }
    }
    true
}

/// Skip a bracketed run starting at the current opener.
pub(crate) fn skim_balanced(s: &mut Scanner) -> bool {
    let mut depth = 0u32;
    loop {
        let kind = s.token();
        if kind == SyntaxKind::EndOfFileToken {
            return false;
        }
        if kind.is_open_bracket() {
            depth += 1;
        } else if kind.is_close_bracket() {
            depth = depth.saturating_sub(1);
        }
        s.scan();
        if depth == 0 {
            return true;
        }
    }
}

/// Skip a type: primitive or qualified class type with type arguments,
/// then any `[]` pairs. The scanner is left on the first token after it.
pub(crate) fn skim_type(s: &mut Scanner) -> bool {
    if !skim_annotations(s) {
        return false;
    }
    let kind = s.token();
    if kind.is_primitive_type() {
        s.scan();
    } else if kind == SyntaxKind::Identifier {
        loop {
            if s.scan() == SyntaxKind::LessThanToken && !skim_type_arguments(s) {
                return false;
            }
            if s.token() != SyntaxKind::DotToken {
                break;
            }
            let next = s.look_ahead(|s| s.scan());
            if next != SyntaxKind::Identifier && next != SyntaxKind::AtToken {
                break;
            }
            s.scan();
            if !skim_annotations(s) || s.token() != SyntaxKind::Identifier {
                return false;
            }
        }
    } else {
        return false;
    }
    skim_dims(s);
    true
}

/// Skip `[]` pairs.
pub(crate) fn skim_dims(s: &mut Scanner) {
    while s.token() == SyntaxKind::OpenBracketToken {
        let closes = s.look_ahead(|s| s.scan()) == SyntaxKind::CloseBracketToken;
        if !closes {
            return;
        }
        s.scan();
        s.scan();
    }
}

/// Skip `<...>` starting at the current `<`. The diamond `<>` is accepted.
pub(crate) fn skim_type_arguments(s: &mut Scanner) -> bool {
    if s.scan() == SyntaxKind::GreaterThanToken {
        s.scan();
        return true;
    }
    loop {
        if s.token() == SyntaxKind::QuestionToken {
            let bound = s.scan();
            if bound == SyntaxKind::ExtendsKeyword || bound == SyntaxKind::SuperKeyword {
                s.scan();
                if !skim_type(s) {
                    return false;
                }
            }
        } else if !skim_type(s) {
            return false;
        }
        match s.token() {
            SyntaxKind::CommaToken => {
                s.scan();
            }
            SyntaxKind::GreaterThanToken => {
                s.scan();
                return true;
            }
            _ => return false,
        }
    }
}

/// At `(`: whether a lambda parameter list follows, i.e. the balanced
/// parentheses are followed by `->`.
pub(crate) fn skim_lambda_parameters(s: &mut Scanner) -> bool {
    skim_balanced(s) && s.token() == SyntaxKind::ArrowToken
}

/// At `(`: whether the parentheses hold a cast.
pub(crate) fn skim_cast(s: &mut Scanner) -> bool {
    s.scan();
    let primitive = s.token().is_primitive_type();
    if !skim_type(s) {
        return false;
    }
    if primitive {
        return s.token() == SyntaxKind::CloseParenToken;
    }
    while s.token() == SyntaxKind::AmpersandToken {
        s.scan();
        if !skim_type(s) {
            return false;
        }
    }
    if s.token() != SyntaxKind::CloseParenToken {
        return false;
    }
    can_follow_reference_cast(s.scan())
}

/// Whether a local variable declaration starts here: a type followed by a
/// name and something that can follow a declarator name.
pub(crate) fn skim_local_declaration(s: &mut Scanner) -> bool {
    if !skim_type(s) || s.token() != SyntaxKind::Identifier {
        return false;
    }
    can_follow_declarator_name(s.scan())
}

/// At `<`: whether type arguments followed by `::` or `(` etc. follow, as
/// in `List<String>::size`.
pub(crate) fn skim_type_arguments_then(s: &mut Scanner, follower: SyntaxKind) -> bool {
    skim_type_arguments(s) && {
        skim_dims(s);
        s.token() == follower
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skim(source: &str, f: fn(&mut Scanner) -> bool) -> bool {
        let mut scanner = Scanner::new(source);
        scanner.scan();
        f(&mut scanner)
    }

    #[test]
    fn test_skim_type() {
        assert!(skim("java.util.Map<String, List<int[]>>[] x", skim_type));
        assert!(skim("Map.Entry<? extends K, ?> e", skim_type));
        assert!(skim("@NonNull String s", skim_type));
        assert!(!skim("+ x", skim_type));
        assert!(!skim("a < b ;", skim_type));
    }

    #[test]
    fn test_local_declaration_lookahead() {
        assert!(skim("int x = 1;", skim_local_declaration));
        assert!(skim("List<String> names;", skim_local_declaration));
        assert!(skim("String s : list", skim_local_declaration));
        assert!(skim("var v = 3;", skim_local_declaration));
        assert!(!skim("foo(x);", skim_local_declaration));
        assert!(!skim("a = b;", skim_local_declaration));
        assert!(!skim("i < n;", skim_local_declaration));
    }

    #[test]
    fn test_cast_lookahead() {
        assert!(skim("(int) -x", skim_cast));
        assert!(skim("(String) o", skim_cast));
        assert!(skim("(Runnable & Serializable) () -> {}", skim_cast));
        assert!(skim("(List<String>) raw", skim_cast));
        assert!(!skim("(a) - b", skim_cast));
        assert!(!skim("(a + b)", skim_cast));
        assert!(!skim("(x) -> x", skim_cast));
    }

    #[test]
    fn test_lambda_lookahead() {
        assert!(skim("(a, b) -> a", skim_lambda_parameters));
        assert!(skim("() -> 1", skim_lambda_parameters));
        assert!(!skim("(a, b)", skim_lambda_parameters));
    }
}
