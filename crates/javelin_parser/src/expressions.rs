//! Expressions above and below the binary operator engine: assignment,
//! conditional, lambda, unary, cast, primary and selector chains.

use javelin_ast::node::*;
use javelin_ast::syntax_kind::SyntaxKind;
use javelin_ast::types::*;
use javelin_core::text::TextRange;
use javelin_diagnostics::messages;
use javelin_options::SourceLevel;

use crate::declarations::ModifierContext;
use crate::parser::Parser;
use crate::recovery::Construct;
use crate::types::TypeContext;
use crate::utilities::*;

/// Arguments of a call, and whether the completion cursor sat at the start
/// of one of the argument slots.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Arguments<'a> {
    pub(crate) list: NodeList<'a, Expression<'a>>,
    pub(crate) at_cursor: bool,
}

impl<'a> Parser<'a> {
    // ========================================================================
    // Entry points
    // ========================================================================

    /// Parse a full expression, lambdas and assignments included.
    pub(crate) fn parse_expression(&mut self) -> Expression<'a> {
        if !self.enter_nested() {
            return self.abandon_nested_expression();
        }
        let expr = self.parse_assignment();
        self.leave_nested();
        expr
    }

    /// A zero-width name standing for an absent expression.
    pub(crate) fn missing_expression(&mut self) -> Expression<'a> {
        let pos = if self.prev_range.is_empty() {
            self.token_pos()
        } else {
            self.last_end()
        };
        Expression::Name(self.alloc(NameReference {
            data: NodeData::missing(SyntaxKind::NameReference, pos),
            name: Name {
                data: NodeData::missing(SyntaxKind::Name, pos),
                segments: &[],
            },
        }))
    }

    /// Past the nesting limit: drop the construct at hand whole so the
    /// caller does not descend into it again.
    fn abandon_nested_expression(&mut self) -> Expression<'a> {
        let current = self.current_token();
        if current.is_open_bracket() {
            self.skip_balanced();
        } else if !current.is_close_bracket()
            && current != SyntaxKind::SemicolonToken
            && current != SyntaxKind::EndOfFileToken
        {
            self.next_token();
        }
        self.missing_expression()
    }

    fn parse_assignment(&mut self) -> Expression<'a> {
        if self.at_lambda_start() {
            return self.parse_lambda();
        }
        let target = self.parse_conditional();
        let operator = self.rescan_greater_than();
        if !operator.is_assignment_operator() {
            return target;
        }
        let is_target = matches!(
            target,
            Expression::Name(_)
                | Expression::FieldAccess(_)
                | Expression::ArrayAccess(_)
                | Expression::Parenthesized(_)
                | Expression::Assist(_)
        );
        if !is_target {
            let range = self.token_range();
            let text = self.scanner.token_text();
            self.report(range, &messages::INVALID_ASSIGNMENT_TARGET, &[&text]);
        }
        self.next_token();
        let value = self.parse_expression();
        let pos = target.range().pos;
        Expression::Assignment(self.alloc(Assignment {
            data: self.finish(SyntaxKind::Assignment, pos),
            target,
            operator,
            value,
        }))
    }

    /// `c ? a : b`, or just the binary run when no `?` follows.
    pub(crate) fn parse_conditional(&mut self) -> Expression<'a> {
        let condition = self.parse_binary();
        if !self.at(SyntaxKind::QuestionToken) {
            return condition;
        }
        self.next_token();
        let when_true = self.parse_expression();
        self.expect(SyntaxKind::ColonToken, Construct::ConditionalExpression);
        let when_false = if !self.enter_nested() {
            self.abandon_nested_expression()
        } else {
            let expr = if self.at_lambda_start() {
                self.parse_lambda()
            } else {
                self.parse_conditional()
            };
            self.leave_nested();
            expr
        };
        let pos = condition.range().pos;
        Expression::Conditional(self.alloc(ConditionalExpression {
            data: self.finish(SyntaxKind::ConditionalExpression, pos),
            condition,
            when_true,
            when_false,
        }))
    }

    // ========================================================================
    // Lambda
    // ========================================================================

    fn at_lambda_start(&mut self) -> bool {
        match self.current_token() {
            SyntaxKind::Identifier => self.peek() == SyntaxKind::ArrowToken,
            SyntaxKind::OpenParenToken => self.scanner.look_ahead(skim_lambda_parameters),
            _ => false,
        }
    }

    fn parse_lambda(&mut self) -> Expression<'a> {
        let pos = self.token_pos();
        let parenthesized = self.at(SyntaxKind::OpenParenToken);
        let mut parameters = Vec::new();
        if parenthesized {
            self.open_bracket(SyntaxKind::OpenParenToken, Construct::FormalParameterList);
            if !self.at(SyntaxKind::CloseParenToken) {
                loop {
                    if !self.tick() {
                        break;
                    }
                    let parameter = self.parse_lambda_parameter();
                    parameters.push(parameter);
                    if !self.optional_token(SyntaxKind::CommaToken) {
                        break;
                    }
                }
            }
            self.close_bracket(None);
        } else {
            let name = self.take_identifier();
            parameters.push(self.inferred_parameter(name));
        }
        self.expect(SyntaxKind::ArrowToken, Construct::LambdaExpression);
        let header = TextRange::new(pos, self.last_end().max(pos));
        self.require_level(SourceLevel::JAVA_8, "Lambda expressions", header);

        let body = if self.at(SyntaxKind::OpenBraceToken) {
            LambdaBody::Block(self.parse_block(Construct::Block))
        } else {
            LambdaBody::Expression(self.parse_expression())
        };
        Expression::Lambda(self.alloc(LambdaExpression {
            data: self.finish(SyntaxKind::LambdaExpression, pos),
            parameters: self.list(parameters),
            parenthesized,
            body,
        }))
    }

    fn parse_lambda_parameter(&mut self) -> Parameter<'a> {
        let inferred = self.at(SyntaxKind::Identifier)
            && matches!(
                self.peek(),
                SyntaxKind::CommaToken | SyntaxKind::CloseParenToken
            );
        if inferred {
            let name = self.take_identifier();
            return self.inferred_parameter(name);
        }
        self.parse_formal_parameter(ModifierContext::Local)
    }

    fn inferred_parameter(&mut self, name: Identifier<'a>) -> Parameter<'a> {
        let range = name.data.range;
        self.finished(Parameter {
            data: NodeData::new(SyntaxKind::Parameter, range.pos, range.end)
                .with_flags(NodeFlags::INFERRED_TYPE),
            modifiers: ModifierList::default(),
            ty: None,
            name,
            extra_dims: 0,
        })
    }

    // ========================================================================
    // Unary and cast
    // ========================================================================

    pub(crate) fn parse_unary(&mut self) -> Expression<'a> {
        let operator = self.current_token();
        if is_prefix_operator(operator) {
            if !self.enter_nested() {
                return self.abandon_nested_expression();
            }
            let pos = self.token_pos();
            self.next_token();
            let operand = self.parse_unary();
            self.leave_nested();
            return Expression::Prefix(self.alloc(UnaryExpression {
                data: self.finish(SyntaxKind::PrefixExpression, pos),
                operator,
                operand,
            }));
        }
        if operator == SyntaxKind::OpenParenToken && self.scanner.look_ahead(skim_cast) {
            return self.parse_cast();
        }
        self.parse_postfix()
    }

    fn parse_cast(&mut self) -> Expression<'a> {
        let pos = self.token_pos();
        self.open_bracket(SyntaxKind::OpenParenToken, Construct::Expression);
        let first = self.parse_type(TypeContext::Reference);
        let ty = if self.at(SyntaxKind::AmpersandToken) {
            let mut types = vec![first];
            while self.optional_token(SyntaxKind::AmpersandToken) {
                types.push(self.parse_type(TypeContext::Reference));
            }
            TypeRef::Intersection(self.alloc(CompoundType {
                data: self.finish(SyntaxKind::IntersectionType, first.range().pos),
                types: self.list(types),
            }))
        } else {
            first
        };
        self.close_bracket(None);
        if !self.enter_nested() {
            return self.abandon_nested_expression();
        }
        let expression = if self.at_lambda_start() {
            self.parse_lambda()
        } else {
            self.parse_unary()
        };
        self.leave_nested();
        Expression::Cast(self.alloc(CastExpression {
            data: self.finish(SyntaxKind::CastExpression, pos),
            ty,
            expression,
        }))
    }

    fn parse_postfix(&mut self) -> Expression<'a> {
        let primary = self.parse_primary();
        let mut expr = self.parse_selectors(primary);
        while matches!(
            self.current_token(),
            SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken
        ) {
            let operator = self.current_token();
            self.next_token();
            let pos = expr.range().pos;
            expr = Expression::Postfix(self.alloc(UnaryExpression {
                data: self.finish(SyntaxKind::PostfixExpression, pos),
                operator,
                operand: expr,
            }));
        }
        expr
    }

    // ========================================================================
    // Primary
    // ========================================================================

    fn parse_primary(&mut self) -> Expression<'a> {
        let pos = self.token_pos();
        let current = self.current_token();
        if current.is_literal_start() {
            return self.parse_literal();
        }
        match current {
            SyntaxKind::Identifier => self.parse_name_expression(),
            SyntaxKind::ThisKeyword => {
                self.next_token();
                Expression::This(self.alloc(ThisReference {
                    data: self.finish(SyntaxKind::ThisReference, pos),
                    qualifier: None,
                }))
            }
            SyntaxKind::SuperKeyword => {
                self.next_token();
                Expression::Super(self.alloc(ThisReference {
                    data: self.finish(SyntaxKind::ThisReference, pos),
                    qualifier: None,
                }))
            }
            SyntaxKind::NewKeyword => self.parse_allocation(None, pos),
            SyntaxKind::OpenParenToken => {
                self.open_bracket(SyntaxKind::OpenParenToken, Construct::Expression);
                let expression = self.parse_expression();
                self.close_bracket(None);
                Expression::Parenthesized(self.alloc(ParenthesizedExpression {
                    data: self.finish(SyntaxKind::ParenthesizedExpression, pos),
                    expression,
                }))
            }
            SyntaxKind::SwitchKeyword => {
                let block = self.parse_switch(SyntaxKind::SwitchExpression);
                self.require_level(SourceLevel::JAVA_14, "Switch expressions", block.data.range);
                Expression::Switch(block)
            }
            SyntaxKind::OpenBraceToken => {
                Expression::ArrayInitializer(self.parse_array_initializer(false))
            }
            kind if kind.is_primitive_type() || kind == SyntaxKind::VoidKeyword => {
                let primitive = self.parse_primitive_type();
                let ty = self.parse_array_type(primitive, pos);
                self.parse_type_selector(pos, ty)
            }
            _ => {
                self.report_expected_after("Expression");
                self.missing_expression()
            }
        }
    }

    /// `T.class` or `T::m` after a type written in expression position.
    fn parse_type_selector(&mut self, pos: u32, ty: TypeRef<'a>) -> Expression<'a> {
        if self.at(SyntaxKind::DotToken) && self.peek() == SyntaxKind::ClassKeyword {
            self.next_token();
            return self.parse_class_literal(pos, ty);
        }
        if self.at(SyntaxKind::ColonColonToken) {
            return self.parse_method_reference(pos, ReferenceTarget::Type(ty));
        }
        self.report_expected_after(".class");
        Expression::ClassLiteral(self.alloc(ClassLiteralAccess {
            data: self
                .finish(SyntaxKind::ClassLiteralAccess, pos)
                .with_flags(NodeFlags::RECOVERED),
            ty,
        }))
    }

    fn parse_literal(&mut self) -> Expression<'a> {
        let range = self.token_range();
        let token = self.current_token();
        let flags = self.token_flags();
        let raw = self.alloc_str(&self.source_text(range));
        let value = match token {
            SyntaxKind::StringLiteral | SyntaxKind::CharacterLiteral | SyntaxKind::TextBlock => {
                Some(self.alloc_str(self.scanner.token_value()))
            }
            _ => None,
        };
        self.next_token();

        if token == SyntaxKind::TextBlock {
            self.require_level(SourceLevel::JAVA_15, "Text blocks", range);
        }
        if flags.contains(TokenFlags::BINARY_SPECIFIER) {
            self.require_level(SourceLevel::JAVA_7, "Binary literals", range);
        }
        if flags.contains(TokenFlags::CONTAINS_SEPARATOR) {
            self.require_level(SourceLevel::JAVA_7, "Underscores in literals", range);
        }
        let mut data = NodeData::new(SyntaxKind::Literal, range.pos, range.end);
        if flags.intersects(TokenFlags::MALFORMED | TokenFlags::UNTERMINATED) {
            data.flags |= NodeFlags::MALFORMED;
        }
        Expression::Literal(self.alloc(Literal {
            data,
            token,
            raw,
            value,
        }))
    }

    // ========================================================================
    // Names
    // ========================================================================

    /// A dotted name, possibly ending in a method call, `Name<T>::m` or an
    /// assist node when one of its segments is at the cursor.
    fn parse_name_expression(&mut self) -> Expression<'a> {
        let pos = self.token_pos();
        let mut segments: Vec<Identifier<'a>> = Vec::new();
        loop {
            if self.at_assist_token() {
                let name = self.take_identifier();
                return self.name_assist(pos, segments, name);
            }
            segments.push(self.take_identifier());
            if self.at(SyntaxKind::DotToken) && self.peek() == SyntaxKind::Identifier {
                self.next_token();
            } else {
                break;
            }
        }

        if self.at(SyntaxKind::OpenParenToken) {
            if let Some(selector) = segments.pop() {
                let receiver = self.name_reference(pos, segments);
                return self.finish_message_send(pos, receiver, &[], selector);
            }
        }
        if self.at(SyntaxKind::LessThanToken)
            && self
                .scanner
                .look_ahead(|s| skim_type_arguments_then(s, SyntaxKind::ColonColonToken))
        {
            let type_arguments = self.parse_type_arguments();
            let ty = self.type_from_segments(pos, segments, Some(type_arguments));
            let ty = self.parse_array_type(ty, pos);
            return self.parse_method_reference(pos, ReferenceTarget::Type(ty));
        }
        match self.name_reference(pos, segments) {
            Some(expr) => expr,
            None => self.missing_expression(),
        }
    }

    fn name_reference(&mut self, pos: u32, segments: Vec<Identifier<'a>>) -> Option<Expression<'a>> {
        let end = segments.last()?.data.range.end;
        let data = NodeData::new(SyntaxKind::NameReference, pos, end);
        let name = Name {
            data: NodeData::new(SyntaxKind::Name, pos, end),
            segments: self.list(segments),
        };
        Some(Expression::Name(self.alloc(NameReference { data, name })))
    }

    /// Reinterpret a name as a class type, for `a.B.class` and `a.B[]::new`.
    fn type_from_segments(
        &mut self,
        pos: u32,
        segments: Vec<Identifier<'a>>,
        last_arguments: Option<NodeList<'a, TypeRef<'a>>>,
    ) -> TypeRef<'a> {
        let count = segments.len();
        let segments: Vec<TypeSegment<'a>> = segments
            .into_iter()
            .enumerate()
            .map(|(i, name)| TypeSegment {
                name,
                type_arguments: if i + 1 == count { last_arguments } else { None },
            })
            .collect();
        TypeRef::Class(self.alloc(ClassType {
            data: self.finish(SyntaxKind::ClassType, pos),
            annotations: &[],
            segments: self.list(segments),
        }))
    }

    fn expression_as_type(&mut self, expr: Expression<'a>) -> Option<TypeRef<'a>> {
        let Expression::Name(reference) = expr else {
            return None;
        };
        let range = reference.data.range;
        let segments: Vec<TypeSegment<'a>> = reference
            .name
            .segments
            .iter()
            .map(|name| TypeSegment {
                name: *name,
                type_arguments: None,
            })
            .collect();
        Some(TypeRef::Class(self.alloc(ClassType {
            data: NodeData::new(SyntaxKind::ClassType, range.pos, range.end),
            annotations: &[],
            segments: self.list(segments),
        })))
    }

    /// The assist node for a name segment at the cursor.
    fn name_assist(
        &mut self,
        pos: u32,
        qualifier: Vec<Identifier<'a>>,
        name: Identifier<'a>,
    ) -> Expression<'a> {
        if self.at(SyntaxKind::OpenParenToken) {
            let receiver = self.name_reference(pos, qualifier);
            return self.send_name_assist(pos, receiver, &[], name);
        }
        let qualified = !qualifier.is_empty();
        let kind = match (self.is_completion(), qualified) {
            (true, false) => AssistKind::CompleteOnName,
            (true, true) => AssistKind::CompleteOnQualifiedName,
            (false, false) => AssistKind::SelectOnName,
            (false, true) => AssistKind::SelectOnQualifiedName,
        };
        let range = TextRange::new(pos, name.data.range.end);
        let mut node = self.blank_assist(kind, range, range);
        node.prefix = self.assist_prefix(&name);
        node.name = Some(name);
        node.qualifier = self.list(qualifier);
        Expression::Assist(self.capture(node))
    }

    /// A method name at the cursor, `(` following.
    fn send_name_assist(
        &mut self,
        pos: u32,
        receiver: Option<Expression<'a>>,
        type_arguments: NodeList<'a, TypeRef<'a>>,
        name: Identifier<'a>,
    ) -> Expression<'a> {
        let completion = self.is_completion();
        let arguments = self.parse_arguments();
        let mut node = if completion {
            let range = TextRange::new(pos, name.data.range.end);
            self.blank_assist(AssistKind::CompleteOnMessageSendName, range, name.data.range)
        } else {
            let range = TextRange::new(pos, self.last_end().max(pos));
            self.blank_assist(AssistKind::SelectOnMessageSend, range, range)
        };
        node.prefix = self.assist_prefix(&name);
        node.name = Some(name);
        node.receiver = receiver;
        node.type_arguments = type_arguments;
        node.arguments = arguments.list;
        Expression::Assist(self.capture(node))
    }

    /// A field name at the cursor after `.`.
    fn member_assist(&mut self, pos: u32, receiver: Expression<'a>, name: Identifier<'a>) -> Expression<'a> {
        let range = TextRange::new(pos, name.data.range.end);
        let mut node = if self.is_completion() {
            self.blank_assist(AssistKind::CompleteOnMemberAccess, range, name.data.range)
        } else {
            self.blank_assist(AssistKind::SelectOnFieldReference, range, range)
        };
        node.prefix = self.assist_prefix(&name);
        node.name = Some(name);
        node.receiver = Some(receiver);
        Expression::Assist(self.capture(node))
    }

    // ========================================================================
    // Selectors
    // ========================================================================

    /// Apply `.name`, `.m()`, `[i]`, `::m` and friends to `expr`.
    pub(crate) fn parse_selectors(&mut self, mut expr: Expression<'a>) -> Expression<'a> {
        loop {
            if !self.tick() {
                break;
            }
            let pos = expr.range().pos;
            expr = match self.current_token() {
                SyntaxKind::DotToken => {
                    self.next_token();
                    self.parse_dot_selector(pos, expr)
                }
                SyntaxKind::OpenBracketToken => {
                    if self.peek() == SyntaxKind::CloseBracketToken {
                        let Some(element) = self.expression_as_type(expr) else {
                            break;
                        };
                        let ty = self.parse_array_type(element, pos);
                        return self.parse_type_selector(pos, ty);
                    }
                    self.open_bracket(SyntaxKind::OpenBracketToken, Construct::Expression);
                    let index = self.parse_expression();
                    self.close_bracket(None);
                    Expression::ArrayAccess(self.alloc(ArrayAccess {
                        data: self.finish(SyntaxKind::ArrayAccess, pos),
                        receiver: expr,
                        index,
                    }))
                }
                SyntaxKind::ColonColonToken => {
                    self.parse_method_reference(pos, ReferenceTarget::Expression(expr))
                }
                _ => break,
            };
        }
        expr
    }

    /// What follows a `.` that was just consumed.
    fn parse_dot_selector(&mut self, pos: u32, receiver: Expression<'a>) -> Expression<'a> {
        match self.current_token() {
            SyntaxKind::Identifier => {
                let at_assist = self.at_assist_token();
                let name = self.take_identifier();
                if at_assist {
                    if self.at(SyntaxKind::OpenParenToken) {
                        return self.send_name_assist(pos, Some(receiver), &[], name);
                    }
                    return self.member_assist(pos, receiver, name);
                }
                if self.at(SyntaxKind::OpenParenToken) {
                    return self.finish_message_send(pos, Some(receiver), &[], name);
                }
                let kind = if matches!(receiver, Expression::Super(_)) {
                    SyntaxKind::SuperFieldAccess
                } else {
                    SyntaxKind::FieldAccess
                };
                Expression::FieldAccess(self.alloc(FieldAccess {
                    data: self.finish(kind, pos),
                    receiver,
                    name,
                }))
            }
            SyntaxKind::LessThanToken => {
                let type_arguments = self.parse_type_arguments();
                let at_assist = self.at_assist_token();
                let name = self.expect_identifier();
                if at_assist {
                    return self.send_name_assist(pos, Some(receiver), type_arguments, name);
                }
                self.finish_message_send(pos, Some(receiver), type_arguments, name)
            }
            SyntaxKind::ThisKeyword | SyntaxKind::SuperKeyword => {
                let is_this = self.at(SyntaxKind::ThisKeyword);
                self.next_token();
                let qualifier = match receiver {
                    Expression::Name(reference) => Some(reference.name),
                    _ => None,
                };
                let reference = self.alloc(ThisReference {
                    data: self.finish(SyntaxKind::QualifiedThisReference, pos),
                    qualifier,
                });
                if is_this {
                    Expression::This(reference)
                } else {
                    Expression::Super(reference)
                }
            }
            SyntaxKind::NewKeyword => self.parse_allocation(Some(receiver), pos),
            SyntaxKind::ClassKeyword => match self.expression_as_type(receiver) {
                Some(ty) => self.parse_class_literal(pos, ty),
                None => {
                    self.report_expected(SyntaxKind::Identifier.describe());
                    self.next_token();
                    receiver
                }
            },
            _ => {
                let name = self.expect_identifier();
                Expression::FieldAccess(self.alloc(FieldAccess {
                    data: self
                        .finish(SyntaxKind::FieldAccess, pos)
                        .with_flags(NodeFlags::RECOVERED),
                    receiver,
                    name,
                }))
            }
        }
    }

    /// At `class` after `T.`.
    fn parse_class_literal(&mut self, pos: u32, ty: TypeRef<'a>) -> Expression<'a> {
        if self.completion_pending() && self.token_flags().contains(TokenFlags::AT_CURSOR) {
            let keyword = self.take_identifier();
            let range = TextRange::new(pos, keyword.data.range.end);
            let mut node =
                self.blank_assist(AssistKind::CompleteOnClassLiteralAccess, range, keyword.data.range);
            node.prefix = self.assist_prefix(&keyword);
            node.name = Some(keyword);
            node.ty = Some(ty);
            return Expression::Assist(self.capture(node));
        }
        self.next_token();
        Expression::ClassLiteral(self.alloc(ClassLiteralAccess {
            data: self.finish(SyntaxKind::ClassLiteralAccess, pos),
            ty,
        }))
    }

    /// At `::`.
    fn parse_method_reference(&mut self, pos: u32, target: ReferenceTarget<'a>) -> Expression<'a> {
        self.next_token();
        let type_arguments = if self.at(SyntaxKind::LessThanToken) {
            self.parse_type_arguments()
        } else {
            &[]
        };
        let name = if self.at(SyntaxKind::NewKeyword) {
            let range = self.token_range();
            self.next_token();
            Identifier {
                data: NodeData::new(SyntaxKind::Identifier, range.pos, range.end),
                name: self.interner.intern("new"),
                text: "new",
            }
        } else {
            self.expect_identifier()
        };
        let range = TextRange::new(pos, self.last_end().max(pos));
        self.require_level(SourceLevel::JAVA_8, "Method references", range);
        Expression::MethodReference(self.alloc(MethodReference {
            data: self.finish(SyntaxKind::MethodReference, pos),
            target,
            type_arguments,
            name,
        }))
    }

    /// Parse the arguments after a method name and build the send, or a
    /// completion node when the cursor sits in an argument slot.
    fn finish_message_send(
        &mut self,
        pos: u32,
        receiver: Option<Expression<'a>>,
        type_arguments: NodeList<'a, TypeRef<'a>>,
        selector: Identifier<'a>,
    ) -> Expression<'a> {
        let arguments = self.parse_arguments();
        if arguments.at_cursor {
            let cursor = self.assist_cursor().unwrap_or(self.last_end()).max(pos);
            let range = TextRange::new(pos, cursor);
            let replaced = TextRange::new(selector.data.range.pos, cursor);
            let mut node = self.blank_assist(AssistKind::CompleteOnMessageSend, range, replaced);
            node.name = Some(selector);
            node.receiver = receiver;
            node.type_arguments = type_arguments;
            node.arguments = arguments.list;
            return Expression::Assist(self.capture(node));
        }
        Expression::MessageSend(self.alloc(MessageSend {
            data: self.finish(SyntaxKind::MessageSend, pos),
            receiver,
            type_arguments,
            selector,
            arguments: arguments.list,
        }))
    }

    /// Parse `(a, b)`. When the completion cursor starts an argument slot,
    /// the arguments before it are kept and the rest of the list skipped.
    pub(crate) fn parse_arguments(&mut self) -> Arguments<'a> {
        self.open_bracket(SyntaxKind::OpenParenToken, Construct::ArgumentList);
        let mut list = Vec::new();
        let mut at_cursor = false;
        if !self.at(SyntaxKind::CloseParenToken) {
            loop {
                if !self.tick() {
                    break;
                }
                if self.is_insertion_boundary(SyntaxKind::CloseParenToken) {
                    break;
                }
                if self.completion_pending() && self.token_flags().contains(TokenFlags::CURSOR_TOKEN) {
                    at_cursor = true;
                    self.skip_rest_of_arguments();
                    break;
                }
                list.push(self.parse_expression());
                if !self.optional_token(SyntaxKind::CommaToken) {
                    break;
                }
            }
        }
        self.close_bracket(None);
        Arguments {
            list: self.list(list),
            at_cursor,
        }
    }

    /// Skip to the `)` closing the current argument list, stopping early at
    /// `;`, `}` or end of file outside nested brackets.
    fn skip_rest_of_arguments(&mut self) {
        let mut depth = 0u32;
        loop {
            match self.current_token() {
                SyntaxKind::EndOfFileToken => break,
                SyntaxKind::OpenParenToken
                | SyntaxKind::OpenBracketToken
                | SyntaxKind::OpenBraceToken => depth += 1,
                SyntaxKind::CloseParenToken
                | SyntaxKind::CloseBracketToken
                | SyntaxKind::CloseBraceToken
                    if depth == 0 =>
                {
                    break
                }
                SyntaxKind::SemicolonToken if depth == 0 => break,
                kind if kind.is_close_bracket() => depth -= 1,
                _ => {}
            }
            self.next_token();
        }
    }

    // ========================================================================
    // Allocation
    // ========================================================================

    /// At `new`. `outer` is the receiver of `outer.new Inner()`.
    fn parse_allocation(&mut self, outer: Option<Expression<'a>>, pos: u32) -> Expression<'a> {
        self.next_token();
        let type_arguments = if self.at(SyntaxKind::LessThanToken) {
            self.parse_type_arguments()
        } else {
            &[]
        };
        let ty_pos = self.token_pos();
        let annotations = self.parse_annotations();
        let ty = if self.current_token().is_primitive_type() {
            self.parse_primitive_type()
        } else if self.at(SyntaxKind::Identifier) {
            self.parse_class_type(TypeContext::Allocation, annotations, ty_pos)
        } else {
            self.report_expected_after("Type");
            TypeRef::Class(self.alloc(ClassType {
                data: NodeData::missing(SyntaxKind::ClassType, self.last_end()),
                annotations,
                segments: &[],
            }))
        };

        if self.at(SyntaxKind::OpenBracketToken) {
            return self.parse_array_allocation(pos, ty);
        }

        let arguments = self.parse_arguments();
        let selected = self.take_allocation_selection();
        let body = if self.at(SyntaxKind::OpenBraceToken) {
            Some(self.parse_anonymous_body())
        } else {
            None
        };

        if arguments.at_cursor {
            let cursor = self.assist_cursor().unwrap_or(self.last_end()).max(pos);
            let range = TextRange::new(pos, cursor);
            let replaced = TextRange::new(ty.range().pos, cursor);
            let mut node = self.blank_assist(AssistKind::CompleteOnAllocation, range, replaced);
            node.receiver = outer;
            node.ty = Some(ty);
            node.type_arguments = type_arguments;
            node.arguments = arguments.list;
            return Expression::Assist(self.capture(node));
        }
        if selected {
            let range = TextRange::new(pos, self.last_end().max(pos));
            let mut node = self.blank_assist(AssistKind::SelectOnAllocation, range, range);
            node.receiver = outer;
            node.ty = Some(ty);
            node.type_arguments = type_arguments;
            node.arguments = arguments.list;
            return Expression::Assist(self.capture(node));
        }
        Expression::Allocation(self.alloc(Allocation {
            data: self.finish(SyntaxKind::Allocation, pos),
            outer,
            type_arguments,
            ty,
            arguments: arguments.list,
            body,
        }))
    }

    /// `new T[n][]` or `new T[] { ... }`, at the first `[`.
    fn parse_array_allocation(&mut self, pos: u32, element: TypeRef<'a>) -> Expression<'a> {
        let mut dimensions = Vec::new();
        while self.at(SyntaxKind::OpenBracketToken) {
            if !self.tick() {
                break;
            }
            if self.peek() == SyntaxKind::CloseBracketToken {
                self.next_token();
                self.next_token();
                dimensions.push(None);
                continue;
            }
            self.open_bracket(SyntaxKind::OpenBracketToken, Construct::Dimensions);
            dimensions.push(Some(self.parse_expression()));
            self.close_bracket(None);
        }
        let initializer = if self.at(SyntaxKind::OpenBraceToken) {
            Some(self.parse_array_initializer(false))
        } else {
            None
        };
        Expression::ArrayAllocation(self.alloc(ArrayAllocation {
            data: self.finish(SyntaxKind::ArrayAllocation, pos),
            element,
            dimensions: self.list(dimensions),
            initializer,
        }))
    }

    /// `{a, b, }`. Element values of annotations may themselves be
    /// annotations.
    pub(crate) fn parse_array_initializer(&mut self, element_values: bool) -> &'a ArrayInitializer<'a> {
        let pos = self.token_pos();
        self.open_bracket(SyntaxKind::OpenBraceToken, Construct::ArrayInitializer);
        let mut elements = Vec::new();
        while !self.at(SyntaxKind::CloseBraceToken) && !self.is_eof() {
            if !self.tick() {
                break;
            }
            let before = self.token_pos();
            let element = if element_values {
                self.parse_element_value()
            } else if self.at(SyntaxKind::OpenBraceToken) {
                Expression::ArrayInitializer(self.parse_array_initializer(false))
            } else {
                self.parse_expression()
            };
            elements.push(element);
            if !self.optional_token(SyntaxKind::CommaToken) {
                break;
            }
            if self.token_pos() == before {
                break;
            }
        }
        self.close_bracket(None);
        self.alloc(ArrayInitializer {
            data: self.finish(SyntaxKind::ArrayInitializer, pos),
            elements: self.list(elements),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::{ParseMode, Parser};
    use bumpalo::Bump;
    use javelin_ast::node::*;
    use javelin_ast::syntax_kind::SyntaxKind;
    use javelin_ast::types::NodeFlags;
    use javelin_core::intern::StringInterner;
    use javelin_options::{ResolvedOptions, SourceLevel};

    fn with_expression<R>(source: &str, level: SourceLevel, f: impl FnOnce(Expression<'_>, Vec<&str>) -> R) -> R {
        let arena = Bump::new();
        let mut options = ResolvedOptions::default();
        options.source_level = level;
        let mut p = Parser::new(&arena, source, StringInterner::new(), options, ParseMode::Full);
        p.next_token();
        let expr = p.parse_expression();
        let diagnostics = p.take_diagnostics(true);
        f(expr, diagnostics.messages())
    }

    fn kind_of(source: &str) -> SyntaxKind {
        with_expression(source, SourceLevel::LATEST, |expr, messages| {
            assert!(messages.is_empty(), "{source}: {messages:?}");
            expr.kind()
        })
    }

    #[test]
    fn test_primary_forms() {
        assert_eq!(kind_of("a.b.c"), SyntaxKind::NameReference);
        assert_eq!(kind_of("a.b.c()"), SyntaxKind::MessageSend);
        assert_eq!(kind_of("this.x"), SyntaxKind::FieldAccess);
        assert_eq!(kind_of("super.x"), SyntaxKind::SuperFieldAccess);
        assert_eq!(kind_of("Outer.this"), SyntaxKind::QualifiedThisReference);
        assert_eq!(kind_of("a[i][j]"), SyntaxKind::ArrayAccess);
        assert_eq!(kind_of("String.class"), SyntaxKind::ClassLiteralAccess);
        assert_eq!(kind_of("int[].class"), SyntaxKind::ClassLiteralAccess);
        assert_eq!(kind_of("String[]::new"), SyntaxKind::MethodReference);
        assert_eq!(kind_of("List<String>::size"), SyntaxKind::MethodReference);
        assert_eq!(kind_of("this::run"), SyntaxKind::MethodReference);
        assert_eq!(kind_of("new int[3][]"), SyntaxKind::ArrayAllocation);
        assert_eq!(kind_of("new String[] {\"a\", \"b\",}"), SyntaxKind::ArrayAllocation);
        assert_eq!(kind_of("outer.new Inner()"), SyntaxKind::Allocation);
        assert_eq!(kind_of("Collections.<String>emptyList()"), SyntaxKind::MessageSend);
    }

    #[test]
    fn test_assignment_is_right_associative() {
        with_expression("a = b += c", SourceLevel::LATEST, |expr, messages| {
            assert!(messages.is_empty());
            let Expression::Assignment(outer) = expr else {
                panic!("expected assignment");
            };
            assert!(matches!(outer.value, Expression::Assignment(_)));
        });
    }

    #[test]
    fn test_invalid_assignment_target() {
        with_expression("a + b = c", SourceLevel::LATEST, |_, messages| {
            assert_eq!(
                messages,
                vec!["Syntax error on token \"=\", invalid AssignmentOperator"]
            );
        });
    }

    #[test]
    fn test_cast_and_parenthesized() {
        assert_eq!(kind_of("(int) x"), SyntaxKind::CastExpression);
        assert_eq!(kind_of("(String) o"), SyntaxKind::CastExpression);
        assert_eq!(kind_of("(a) - b"), SyntaxKind::BinaryExpression);
        assert_eq!(kind_of("(a)"), SyntaxKind::ParenthesizedExpression);
        assert_eq!(kind_of("(Runnable & Serializable) () -> {}"), SyntaxKind::CastExpression);
    }

    #[test]
    fn test_lambda_forms() {
        assert_eq!(kind_of("x -> x + 1"), SyntaxKind::LambdaExpression);
        assert_eq!(kind_of("(a, b) -> { return a; }"), SyntaxKind::LambdaExpression);
        assert_eq!(kind_of("(int a, final String... b) -> a"), SyntaxKind::LambdaExpression);
        with_expression("(a, b) -> a", SourceLevel::LATEST, |expr, _| {
            let Expression::Lambda(lambda) = expr else {
                panic!("expected lambda");
            };
            assert!(lambda.parenthesized);
            assert!(lambda
                .parameters
                .iter()
                .all(|p| p.data.flags.contains(NodeFlags::INFERRED_TYPE)));
        });
    }

    #[test]
    fn test_conditional_nests_to_the_right() {
        with_expression("a ? b : c ? d : e", SourceLevel::LATEST, |expr, messages| {
            assert!(messages.is_empty());
            let Expression::Conditional(outer) = expr else {
                panic!("expected conditional");
            };
            assert!(matches!(outer.when_false, Expression::Conditional(_)));
        });
    }

    #[test]
    fn test_features_gated_by_source_level() {
        with_expression("x -> x", SourceLevel::JAVA_7, |expr, messages| {
            assert_eq!(expr.kind(), SyntaxKind::LambdaExpression);
            assert_eq!(
                messages,
                vec!["Syntax error, Lambda expressions are only available if source level is 1.8 or above"]
            );
        });
        with_expression("0b1010", SourceLevel::JAVA_5, |_, messages| {
            assert_eq!(
                messages,
                vec!["Syntax error, Binary literals are only available if source level is 1.7 or above"]
            );
        });
    }

    #[test]
    fn test_missing_operand() {
        with_expression("a + ;", SourceLevel::LATEST, |expr, messages| {
            let Expression::Binary(binary) = expr else {
                panic!("expected binary");
            };
            assert!(binary.right.data().is_missing());
            assert_eq!(
                messages,
                vec!["Syntax error on token \"+\", Expression expected after this token"]
            );
        });
    }

    #[test]
    fn test_literal_values() {
        with_expression("\"a\\tb\"", SourceLevel::LATEST, |expr, _| {
            let Expression::Literal(literal) = expr else {
                panic!("expected literal");
            };
            assert_eq!(literal.raw, "\"a\\tb\"");
            assert_eq!(literal.value, Some("a\tb"));
        });
    }
}
