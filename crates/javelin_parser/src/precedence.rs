//! Operator precedence for Java binary operators.
//!
//! The table is a `const` shared read-only by every parse.

use javelin_ast::syntax_kind::SyntaxKind;

/// Operator precedence levels, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub(crate) enum OperatorPrecedence {
    /// Marks the bottom of the engine's state stack.
    Lowest = 0,
    LogicalOr = 1,
    LogicalAnd = 2,
    BitwiseOr = 3,
    BitwiseXor = 4,
    BitwiseAnd = 5,
    Equality = 6,
    /// `<`, `>`, `<=`, `>=` and `instanceof`.
    Relational = 7,
    Shift = 8,
    Additive = 9,
    Multiplicative = 10,
}

/// One row of the binary operator table.
#[derive(Debug, Clone, Copy)]
pub(crate) struct OperatorInfo {
    pub kind: SyntaxKind,
    pub precedence: OperatorPrecedence,
}

const fn left(kind: SyntaxKind, precedence: OperatorPrecedence) -> OperatorInfo {
    OperatorInfo { kind, precedence }
}

/// Every operator the shift/reduce engine reduces. `?:` and assignment are
/// right associative and parsed above the engine.
pub(crate) const BINARY_OPERATORS: [OperatorInfo; 20] = [
    left(SyntaxKind::BarBarToken, OperatorPrecedence::LogicalOr),
    left(SyntaxKind::AmpersandAmpersandToken, OperatorPrecedence::LogicalAnd),
    left(SyntaxKind::BarToken, OperatorPrecedence::BitwiseOr),
    left(SyntaxKind::CaretToken, OperatorPrecedence::BitwiseXor),
    left(SyntaxKind::AmpersandToken, OperatorPrecedence::BitwiseAnd),
    left(SyntaxKind::EqualsEqualsToken, OperatorPrecedence::Equality),
    left(SyntaxKind::ExclamationEqualsToken, OperatorPrecedence::Equality),
    left(SyntaxKind::LessThanToken, OperatorPrecedence::Relational),
    left(SyntaxKind::GreaterThanToken, OperatorPrecedence::Relational),
    left(SyntaxKind::LessThanEqualsToken, OperatorPrecedence::Relational),
    left(SyntaxKind::GreaterThanEqualsToken, OperatorPrecedence::Relational),
    left(SyntaxKind::InstanceofKeyword, OperatorPrecedence::Relational),
    left(SyntaxKind::LessThanLessThanToken, OperatorPrecedence::Shift),
    left(SyntaxKind::GreaterThanGreaterThanToken, OperatorPrecedence::Shift),
    left(SyntaxKind::GreaterThanGreaterThanGreaterThanToken, OperatorPrecedence::Shift),
    left(SyntaxKind::PlusToken, OperatorPrecedence::Additive),
    left(SyntaxKind::MinusToken, OperatorPrecedence::Additive),
    left(SyntaxKind::AsteriskToken, OperatorPrecedence::Multiplicative),
    left(SyntaxKind::SlashToken, OperatorPrecedence::Multiplicative),
    left(SyntaxKind::PercentToken, OperatorPrecedence::Multiplicative),
];

/// Look up a binary operator.
pub(crate) fn binary_operator(kind: SyntaxKind) -> Option<OperatorInfo> {
    BINARY_OPERATORS.iter().find(|info| info.kind == kind).copied()
}

/// Whether the operator on the stack must be reduced before `incoming` is
/// shifted. Equal precedence reduces, which makes every operator left
/// associative.
pub(crate) fn should_reduce(stacked: OperatorPrecedence, incoming: OperatorInfo) -> bool {
    stacked >= incoming.precedence
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ladder_order() {
        let prec = |k| binary_operator(k).unwrap().precedence;
        assert!(prec(SyntaxKind::AsteriskToken) > prec(SyntaxKind::PlusToken));
        assert!(prec(SyntaxKind::PlusToken) > prec(SyntaxKind::LessThanLessThanToken));
        assert!(prec(SyntaxKind::LessThanLessThanToken) > prec(SyntaxKind::LessThanToken));
        assert_eq!(prec(SyntaxKind::InstanceofKeyword), prec(SyntaxKind::LessThanToken));
        assert!(prec(SyntaxKind::LessThanToken) > prec(SyntaxKind::EqualsEqualsToken));
        assert!(prec(SyntaxKind::EqualsEqualsToken) > prec(SyntaxKind::AmpersandToken));
        assert!(prec(SyntaxKind::AmpersandToken) > prec(SyntaxKind::CaretToken));
        assert!(prec(SyntaxKind::CaretToken) > prec(SyntaxKind::BarToken));
        assert!(prec(SyntaxKind::BarToken) > prec(SyntaxKind::AmpersandAmpersandToken));
        assert!(prec(SyntaxKind::AmpersandAmpersandToken) > prec(SyntaxKind::BarBarToken));
        assert_eq!(prec(SyntaxKind::PercentToken), prec(SyntaxKind::SlashToken));
    }

    #[test]
    fn test_non_operators() {
        assert!(binary_operator(SyntaxKind::EqualsToken).is_none());
        assert!(binary_operator(SyntaxKind::QuestionToken).is_none());
        assert!(binary_operator(SyntaxKind::Identifier).is_none());
    }

    #[test]
    fn test_left_associative_reduces_on_equal_precedence() {
        let plus = binary_operator(SyntaxKind::PlusToken).unwrap();
        assert!(should_reduce(OperatorPrecedence::Additive, plus));
        assert!(!should_reduce(OperatorPrecedence::Relational, plus));
        assert!(!should_reduce(OperatorPrecedence::Lowest, plus));
    }
}
