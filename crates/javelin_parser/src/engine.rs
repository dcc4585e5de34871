//! Shift/reduce engine for binary operator expressions.
//!
//! Operands are parsed by recursive descent (`parse_unary`); the engine only
//! decides how they group. It keeps an operand stack and a state stack of
//! operator precedences seeded with `Lowest`. Before an incoming operator is
//! shifted, every stacked operator the precedence table says binds at least
//! as tightly is reduced into a node. At the end of the run the remaining
//! operators are reduced bottom-up.

use javelin_ast::node::*;
use javelin_ast::syntax_kind::SyntaxKind;
use javelin_core::text::TextRange;
use javelin_diagnostics::messages;
use javelin_options::SourceLevel;
use tracing::trace;

use crate::parser::Parser;
use crate::precedence::{binary_operator, should_reduce, OperatorPrecedence};
use crate::types::TypeContext;

/// An entry on the operand stack. The right side of `instanceof` is a type,
/// optionally with a pattern variable.
#[derive(Debug, Clone, Copy)]
enum Operand<'a> {
    Expr(Expression<'a>),
    Pattern {
        ty: TypeRef<'a>,
        binding: Option<Identifier<'a>>,
        end: u32,
    },
}

impl Operand<'_> {
    fn end(&self) -> u32 {
        match self {
            Operand::Expr(expr) => expr.range().end,
            Operand::Pattern { end, .. } => *end,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct State {
    precedence: OperatorPrecedence,
    operator: SyntaxKind,
}

impl<'a> Parser<'a> {
    /// Parse a run of operands joined by binary operators.
    pub(crate) fn parse_binary(&mut self) -> Expression<'a> {
        let mut operands: Vec<Operand<'a>> = vec![Operand::Expr(self.parse_unary())];
        let mut states = vec![State {
            precedence: OperatorPrecedence::Lowest,
            operator: SyntaxKind::Unknown,
        }];

        loop {
            let kind = self.rescan_greater_than();
            let Some(info) = binary_operator(kind) else {
                break;
            };
            if !self.tick() {
                break;
            }
            // A tighter operator after an instanceof type would take the
            // type as its operand. Close the instanceof first.
            if matches!(operands.last(), Some(Operand::Pattern { .. }))
                && !states.last().is_some_and(|top| should_reduce(top.precedence, info))
            {
                let range = self.token_range();
                let text = self.scanner.token_text();
                self.report(range, &messages::OPERATOR_AFTER_TYPE, &[&text]);
                if let Some(state) = states.pop() {
                    self.reduce(&mut operands, state.operator);
                }
            }
            while states
                .last()
                .is_some_and(|top| should_reduce(top.precedence, info))
            {
                if let Some(state) = states.pop() {
                    self.reduce(&mut operands, state.operator);
                }
            }
            states.push(State {
                precedence: info.precedence,
                operator: kind,
            });
            self.next_token();
            let operand = if kind == SyntaxKind::InstanceofKeyword {
                self.parse_instanceof_target()
            } else {
                Operand::Expr(self.parse_unary())
            };
            operands.push(operand);
        }

        while states.len() > 1 {
            if let Some(state) = states.pop() {
                self.reduce(&mut operands, state.operator);
            }
        }
        match operands.pop() {
            Some(Operand::Expr(expr)) => expr,
            _ => self.missing_expression(),
        }
    }

    /// Pop two operands, push the node joining them with `operator`. A
    /// pattern is reduced before anything is shifted after it, so the left
    /// operand is always an expression.
    fn reduce(&mut self, operands: &mut Vec<Operand<'a>>, operator: SyntaxKind) {
        let (Some(right), Some(Operand::Expr(left))) = (operands.pop(), operands.pop()) else {
            return;
        };
        let pos = left.range().pos;
        let end = right.end().max(pos);
        trace!(?operator, pos, end, "reduce");
        let reduced = match right {
            Operand::Expr(right) => Expression::Binary(self.alloc(BinaryExpression {
                data: NodeData::new(SyntaxKind::BinaryExpression, pos, end),
                left,
                operator,
                right,
            })),
            Operand::Pattern { ty, binding, .. } => {
                Expression::InstanceOf(self.alloc(InstanceOfExpression {
                    data: NodeData::new(SyntaxKind::InstanceOfExpression, pos, end),
                    expression: left,
                    ty,
                    binding,
                }))
            }
        };
        operands.push(Operand::Expr(reduced));
    }

    /// The type after `instanceof`, with an optional pattern variable.
    fn parse_instanceof_target(&mut self) -> Operand<'a> {
        let pos = self.token_pos();
        let is_final = self.optional_token(SyntaxKind::FinalKeyword);
        let ty = self.parse_type(TypeContext::Reference);
        let binding = if self.at(SyntaxKind::Identifier) {
            Some(self.take_identifier())
        } else {
            None
        };
        if binding.is_some() || is_final {
            let range = TextRange::new(pos, self.last_end().max(pos));
            self.require_level(SourceLevel::JAVA_16, "Instanceof patterns", range);
        }
        Operand::Pattern {
            ty,
            binding,
            end: self.last_end().max(pos),
        }
    }
}
