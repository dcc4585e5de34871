//! Blocks and statements.

use javelin_ast::node::*;
use javelin_ast::syntax_kind::SyntaxKind;
use javelin_ast::types::*;
use javelin_core::text::TextRange;
use javelin_diagnostics::messages;
use javelin_options::{ConfigurableProblem, SourceLevel};
use javelin_scanner::Scanner;

use crate::declarations::ModifierContext;
use crate::parser::Parser;
use crate::recovery::{Construct, RecoveryAction, TokenSet, STATEMENT_BOUNDARY};
use crate::types::TypeContext;
use crate::utilities::*;

/// Where a run of statements before the first case label stops.
const SWITCH_LABEL_BOUNDARY: TokenSet = TokenSet::new()
    .with(SyntaxKind::CaseKeyword)
    .with(SyntaxKind::DefaultKeyword)
    .with(SyntaxKind::CloseBraceToken)
    .with(SyntaxKind::EndOfFileToken);

/// `final` and annotations in front of a local declaration.
fn skim_local_modifiers(s: &mut Scanner) -> bool {
    loop {
        match s.token() {
            SyntaxKind::FinalKeyword => {
                s.scan();
            }
            SyntaxKind::AtToken => {
                if !skim_annotations(s) {
                    return false;
                }
            }
            _ => return true,
        }
    }
}

/// At the first token inside `for (`: whether an enhanced for header follows.
fn skim_foreach_header(s: &mut Scanner) -> bool {
    skim_local_modifiers(s)
        && skim_type(s)
        && s.token() == SyntaxKind::Identifier
        && {
            s.scan();
            skim_dims(s);
            s.token() == SyntaxKind::ColonToken
        }
}

/// A resource declared in a try header: `Type name =`.
fn skim_resource_declaration(s: &mut Scanner) -> bool {
    skim_local_modifiers(s)
        && skim_type(s)
        && s.token() == SyntaxKind::Identifier
        && s.scan() == SyntaxKind::EqualsToken
}

impl<'a> Parser<'a> {
    /// Malformed statements are kept when statement recovery is on, and
    /// always in assist parses.
    pub(crate) fn statement_recovery_enabled(&self) -> bool {
        self.options.statement_recovery || self.assist.is_some()
    }

    // ========================================================================
    // Blocks
    // ========================================================================

    /// Parse `{ statements }`. `construct` names what an unclosed empty
    /// block would have completed.
    pub(crate) fn parse_block(&mut self, construct: Construct) -> &'a Block<'a> {
        let pos = self.token_pos();
        self.open_bracket(SyntaxKind::OpenBraceToken, construct);
        let (statements, dropped) = self.parse_block_statements(false);
        let label = if statements.is_empty() {
            construct.label()
        } else {
            Construct::Statement.label()
        };
        self.close_bracket(Some(label));
        let mut data = self.finish(SyntaxKind::Block, pos);
        if dropped {
            data.flags |= NodeFlags::HAS_SYNTAX_ERRORS;
        }
        self.alloc(Block {
            data,
            statements: self.list(statements),
        })
    }

    /// Parse statements up to the closing brace. Returns the statements
    /// kept and whether any were dropped.
    pub(crate) fn parse_block_statements(&mut self, stop_at_case: bool) -> (Vec<Statement<'a>>, bool) {
        let mut statements = Vec::new();
        let mut dropped = false;
        loop {
            if !self.tick() {
                break;
            }
            let current = self.current_token();
            if current == SyntaxKind::CloseBraceToken
                || current == SyntaxKind::EndOfFileToken
                || current.is_member_only_modifier()
            {
                break;
            }
            if stop_at_case && self.at_case_label() {
                break;
            }
            if current.is_close_bracket() {
                if self.at_stray_closer() {
                    self.delete_current();
                    dropped = true;
                    continue;
                }
                break;
            }

            let errors_before = self.syntax_errors;
            let before = self.token_pos();
            let statement = self.parse_statement();
            if self.token_pos() == before {
                if can_start_statement(current) {
                    self.skip_to_boundary(STATEMENT_BOUNDARY);
                } else {
                    self.delete_current();
                }
                dropped = true;
                continue;
            }
            if self.syntax_errors > errors_before && !self.statement_recovery_enabled() {
                dropped = true;
                continue;
            }
            statements.push(statement);
        }
        (statements, dropped)
    }

    fn at_case_label(&mut self) -> bool {
        match self.current_token() {
            SyntaxKind::CaseKeyword => true,
            SyntaxKind::DefaultKeyword => matches!(
                self.peek(),
                SyntaxKind::ColonToken | SyntaxKind::ArrowToken
            ),
            _ => false,
        }
    }

    // ========================================================================
    // Statements
    // ========================================================================

    pub(crate) fn parse_statement(&mut self) -> Statement<'a> {
        if !self.enter_nested() {
            let pos = self.token_pos();
            let current = self.current_token();
            if current.is_open_bracket() {
                self.skip_balanced();
            } else if !current.is_close_bracket() && !self.is_eof() {
                self.next_token();
            }
            let data = self
                .finish(SyntaxKind::EmptyStatement, pos)
                .with_flags(NodeFlags::HAS_SYNTAX_ERRORS);
            return Statement::Empty(self.alloc(EmptyStatement { data }));
        }
        self.statement_marks.push(self.syntax_errors);
        let statement = self.parse_statement_kind();
        self.statement_marks.pop();
        self.leave_nested();
        statement
    }

    fn parse_statement_kind(&mut self) -> Statement<'a> {
        let pos = self.token_pos();
        match self.current_token() {
            SyntaxKind::OpenBraceToken => Statement::Block(self.parse_block(Construct::Block)),
            SyntaxKind::SemicolonToken => {
                self.next_token();
                let data = self.finish_statement(SyntaxKind::EmptyStatement, pos);
                Statement::Empty(self.alloc(EmptyStatement { data }))
            }
            SyntaxKind::IfKeyword => self.parse_if(pos),
            SyntaxKind::WhileKeyword => self.parse_while(pos),
            SyntaxKind::DoKeyword => self.parse_do(pos),
            SyntaxKind::ForKeyword => self.parse_for(pos),
            SyntaxKind::TryKeyword => self.parse_try(pos),
            SyntaxKind::SwitchKeyword => Statement::Switch(self.parse_switch(SyntaxKind::SwitchStatement)),
            SyntaxKind::SynchronizedKeyword => self.parse_synchronized(pos),
            SyntaxKind::ReturnKeyword => self.parse_return(pos),
            SyntaxKind::ThrowKeyword => self.parse_throw(pos),
            SyntaxKind::BreakKeyword | SyntaxKind::ContinueKeyword => self.parse_jump(pos),
            SyntaxKind::AssertKeyword => self.parse_assert(pos),
            SyntaxKind::ClassKeyword
            | SyntaxKind::InterfaceKeyword
            | SyntaxKind::EnumKeyword
            | SyntaxKind::AbstractKeyword
            | SyntaxKind::FinalKeyword
            | SyntaxKind::StrictfpKeyword
            | SyntaxKind::AtToken => self.parse_local_declaration(pos),
            SyntaxKind::ThisKeyword | SyntaxKind::SuperKeyword
                if self.peek() == SyntaxKind::OpenParenToken =>
            {
                let call_kind = if self.at(SyntaxKind::ThisKeyword) {
                    ConstructorCallKind::This
                } else {
                    ConstructorCallKind::Super
                };
                let keyword = self.token_range();
                let selected = !self.is_completion() && self.at_assist_token();
                self.next_token();
                self.parse_explicit_constructor_call(pos, call_kind, keyword, None, selected)
            }
            SyntaxKind::Identifier => self.parse_identifier_statement(pos),
            kind if kind.is_primitive_type() => {
                let is_expression = self.scanner.look_ahead(|s| {
                    skim_type(s)
                        && matches!(s.token(), SyntaxKind::DotToken | SyntaxKind::ColonColonToken)
                });
                if is_expression {
                    self.parse_expression_statement(pos)
                } else {
                    self.parse_local_declaration(pos)
                }
            }
            kind if can_start_expression(kind) => self.parse_expression_statement(pos),
            // Nothing here starts a statement; the block skips it.
            _ => Statement::Empty(self.alloc(EmptyStatement {
                data: NodeData::missing(SyntaxKind::EmptyStatement, pos),
            })),
        }
    }

    /// Statements that start with an identifier: `yield`, local records,
    /// labels, declarations and expressions.
    fn parse_identifier_statement(&mut self, pos: u32) -> Statement<'a> {
        if self.at_contextual("yield") {
            let next = self.peek();
            let starts_value = can_start_expression(next)
                && !matches!(
                    next,
                    SyntaxKind::DotToken
                        | SyntaxKind::OpenBracketToken
                        | SyntaxKind::PlusPlusToken
                        | SyntaxKind::MinusMinusToken
                );
            if starts_value {
                return self.parse_yield(pos);
            }
        }
        if self.at_contextual("record")
            && self.scanner.look_ahead(|s| {
                s.scan() == SyntaxKind::Identifier && s.scan() == SyntaxKind::OpenParenToken
            })
        {
            return self.parse_local_declaration(pos);
        }
        if self.peek() == SyntaxKind::ColonToken {
            let label = self.take_identifier();
            self.next_token();
            let body = self.parse_statement();
            return Statement::Labeled(self.alloc(LabeledStatement {
                data: self.finish_statement(SyntaxKind::LabeledStatement, pos),
                label,
                body,
            }));
        }
        if self.scanner.look_ahead(skim_local_declaration) {
            return self.parse_local_declaration(pos);
        }
        self.parse_expression_statement(pos)
    }

    fn parse_expression_statement(&mut self, pos: u32) -> Statement<'a> {
        let expression = self.parse_expression();

        // `outer.super(...)`
        if let Expression::Super(reference) = expression {
            if let (Some(name), true) = (reference.qualifier, self.at(SyntaxKind::OpenParenToken)) {
                let qualifier = Expression::Name(self.alloc(NameReference {
                    data: NodeData::new(SyntaxKind::NameReference, name.data.range.pos, name.data.range.end),
                    name,
                }));
                let keyword = TextRange::new(name.data.range.end, reference.data.range.end);
                return self.parse_explicit_constructor_call(
                    pos,
                    ConstructorCallKind::Super,
                    keyword,
                    Some(qualifier),
                    false,
                );
            }
        }

        if !expression.is_statement_expression() && !expression.data().is_missing() {
            let range = self.prev_range;
            self.report(
                range,
                &messages::INSERT_TO_COMPLETE,
                &["AssignmentOperator Expression", "Expression"],
            );
        }
        self.expect(SyntaxKind::SemicolonToken, Construct::BlockStatements);
        Statement::Expression(self.alloc(ExpressionStatement {
            data: self.finish_statement(SyntaxKind::ExpressionStatement, pos),
            expression,
        }))
    }

    /// At the `(` after `this`, `super` or `outer.super`.
    fn parse_explicit_constructor_call(
        &mut self,
        pos: u32,
        call_kind: ConstructorCallKind,
        keyword: TextRange,
        qualifier: Option<Expression<'a>>,
        selected: bool,
    ) -> Statement<'a> {
        let arguments = self.parse_arguments();
        let keyword_text = match call_kind {
            ConstructorCallKind::This => "this",
            ConstructorCallKind::Super => "super",
        };
        let keyword_name = Identifier {
            data: NodeData::new(SyntaxKind::Identifier, keyword.pos, keyword.end),
            name: self.interner.intern(keyword_text),
            text: keyword_text,
        };
        if arguments.at_cursor {
            let cursor = self.assist_cursor().unwrap_or(self.last_end()).max(pos);
            let mut node = self.blank_assist(
                AssistKind::CompleteOnExplicitConstructorCall,
                TextRange::new(pos, cursor),
                TextRange::new(keyword.pos, cursor),
            );
            node.name = Some(keyword_name);
            node.receiver = qualifier;
            node.arguments = arguments.list;
            let node = self.capture(node);
            self.expect(SyntaxKind::SemicolonToken, Construct::BlockStatements);
            return Statement::Assist(node);
        }
        if selected {
            let range = TextRange::new(pos, self.last_end().max(pos));
            let mut node = self.blank_assist(AssistKind::SelectOnExplicitConstructorCall, range, range);
            node.name = Some(keyword_name);
            node.receiver = qualifier;
            node.arguments = arguments.list;
            let node = self.capture(node);
            self.expect(SyntaxKind::SemicolonToken, Construct::BlockStatements);
            return Statement::Assist(node);
        }
        self.expect(SyntaxKind::SemicolonToken, Construct::BlockStatements);
        Statement::ExplicitConstructorCall(self.alloc(ExplicitConstructorCall {
            data: self.finish_statement(SyntaxKind::ExplicitConstructorCall, pos),
            call_kind,
            qualifier,
            type_arguments: &[],
            arguments: arguments.list,
        }))
    }

    // ========================================================================
    // Declarations in blocks
    // ========================================================================

    /// A local variable declaration or a local class, interface, enum or
    /// record.
    fn parse_local_declaration(&mut self, pos: u32) -> Statement<'a> {
        let modifiers = self.parse_modifiers(ModifierContext::Local);
        let is_type = matches!(
            self.current_token(),
            SyntaxKind::ClassKeyword | SyntaxKind::InterfaceKeyword | SyntaxKind::EnumKeyword
        ) || (self.at_contextual("record") && self.peek() == SyntaxKind::Identifier);
        if is_type {
            let declaration = self.parse_type_declaration(pos, modifiers);
            return Statement::LocalType(declaration);
        }
        let variable = self.parse_local_variable(pos, modifiers, true);
        Statement::LocalVariable(variable)
    }

    /// The type and declarators of a local variable, after its modifiers.
    /// `terminated` declarations end with `;`.
    pub(crate) fn parse_local_variable(
        &mut self,
        pos: u32,
        modifiers: ModifierList<'a>,
        terminated: bool,
    ) -> &'a LocalVariableDeclaration<'a> {
        let ty = self.parse_type(TypeContext::Reference);
        self.check_var_type(ty);
        let declarators = self.parse_variable_declarators(
            AssistKind::CompleteOnLocalName,
            AssistKind::SelectOnLocalDeclaration,
        );
        if terminated {
            self.expect(SyntaxKind::SemicolonToken, Construct::BlockStatements);
        }
        self.alloc(LocalVariableDeclaration {
            data: self.finish_statement(SyntaxKind::LocalVariableDeclaration, pos),
            modifiers,
            ty,
            declarators,
        })
    }

    fn check_var_type(&mut self, ty: TypeRef<'a>) {
        if let TypeRef::Class(class) = ty {
            let is_var = matches!(class.segments, [segment]
                if segment.name.text == "var" && segment.type_arguments.is_none());
            if is_var {
                self.require_level(SourceLevel::JAVA_10, "'var' declarations", class.data.range);
            }
        }
    }

    /// `a = 1, b[] = {2}` after a type. A name at the cursor becomes a
    /// declaration assist of the given kinds.
    pub(crate) fn parse_variable_declarators(
        &mut self,
        completion: AssistKind,
        selection: AssistKind,
    ) -> NodeList<'a, VariableDeclarator<'a>> {
        let mut declarators = Vec::new();
        loop {
            if !self.tick() {
                break;
            }
            let pos = self.token_pos();
            let at_assist = self.at_assist_token();
            let name = self.expect_identifier();
            if at_assist {
                self.declaration_assist(completion, selection, &name);
            }
            let extra_dims = self.parse_dims();
            let initializer = if self.optional_token(SyntaxKind::EqualsToken) {
                Some(self.parse_variable_initializer())
            } else {
                None
            };
            declarators.push(self.finished(VariableDeclarator {
                data: self.finish(SyntaxKind::VariableDeclarator, pos),
                name,
                extra_dims,
                initializer,
            }));
            if !self.optional_token(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.list(declarators)
    }

    pub(crate) fn parse_variable_initializer(&mut self) -> Expression<'a> {
        if self.at(SyntaxKind::OpenBraceToken) {
            Expression::ArrayInitializer(self.parse_array_initializer(false))
        } else {
            self.parse_expression()
        }
    }

    // ========================================================================
    // Control flow
    // ========================================================================

    /// `( expression )` after `if`, `while`, `switch` and `synchronized`.
    fn parse_parenthesized_condition(&mut self) -> Expression<'a> {
        self.open_bracket(SyntaxKind::OpenParenToken, Construct::Expression);
        let condition = self.parse_expression();
        self.close_bracket(None);
        condition
    }

    /// The body of `if`, `while` and `for`. A lone `;` is reported when
    /// configured to be.
    fn parse_control_body(&mut self) -> Statement<'a> {
        if self.at(SyntaxKind::SemicolonToken) {
            let range = self.token_range();
            self.report_configurable(
                ConfigurableProblem::EmptyControlStatement,
                range,
                &messages::EMPTY_CONTROL_STATEMENT,
                &[],
            );
        }
        self.parse_statement()
    }

    fn parse_if(&mut self, pos: u32) -> Statement<'a> {
        self.next_token();
        let condition = self.parse_parenthesized_condition();
        let then_statement = self.parse_control_body();
        let else_statement = if self.optional_token(SyntaxKind::ElseKeyword) {
            Some(self.parse_statement())
        } else {
            None
        };
        Statement::If(self.alloc(IfStatement {
            data: self.finish_statement(SyntaxKind::IfStatement, pos),
            condition,
            then_statement,
            else_statement,
        }))
    }

    fn parse_while(&mut self, pos: u32) -> Statement<'a> {
        self.next_token();
        let condition = self.parse_parenthesized_condition();
        let body = self.parse_control_body();
        Statement::While(self.alloc(WhileStatement {
            data: self.finish_statement(SyntaxKind::WhileStatement, pos),
            condition,
            body,
        }))
    }

    fn parse_do(&mut self, pos: u32) -> Statement<'a> {
        self.next_token();
        let body = self.parse_statement();
        self.expect(SyntaxKind::WhileKeyword, Construct::Statement);
        let condition = self.parse_parenthesized_condition();
        self.expect(SyntaxKind::SemicolonToken, Construct::Statement);
        Statement::Do(self.alloc(DoStatement {
            data: self.finish_statement(SyntaxKind::DoStatement, pos),
            body,
            condition,
        }))
    }

    fn parse_for(&mut self, pos: u32) -> Statement<'a> {
        self.next_token();
        self.open_bracket(SyntaxKind::OpenParenToken, Construct::Expression);
        if self.scanner.look_ahead(skim_foreach_header) {
            return self.parse_foreach(pos);
        }

        let mut initializers = Vec::new();
        if !self.at(SyntaxKind::SemicolonToken) {
            let init_pos = self.token_pos();
            let is_declaration = matches!(
                self.current_token(),
                SyntaxKind::FinalKeyword | SyntaxKind::AtToken
            ) || self.scanner.look_ahead(skim_local_declaration);
            if is_declaration {
                let modifiers = self.parse_modifiers(ModifierContext::Local);
                let variable = self.parse_local_variable(init_pos, modifiers, false);
                initializers.push(Statement::LocalVariable(variable));
            } else {
                for expression in self.parse_expression_list() {
                    let range = expression.range();
                    initializers.push(Statement::Expression(self.alloc(ExpressionStatement {
                        data: NodeData::new(SyntaxKind::ExpressionStatement, range.pos, range.end),
                        expression,
                    })));
                }
            }
        }
        self.expect(SyntaxKind::SemicolonToken, Construct::Statement);
        let condition = if self.at(SyntaxKind::SemicolonToken) {
            None
        } else {
            Some(self.parse_expression())
        };
        self.expect(SyntaxKind::SemicolonToken, Construct::Statement);
        let updates = if self.at(SyntaxKind::CloseParenToken) {
            Vec::new()
        } else {
            self.parse_expression_list()
        };
        self.close_bracket(None);
        let body = self.parse_control_body();
        Statement::For(self.alloc(ForStatement {
            data: self.finish_statement(SyntaxKind::ForStatement, pos),
            initializers: self.list(initializers),
            condition,
            updates: self.list(updates),
            body,
        }))
    }

    fn parse_expression_list(&mut self) -> Vec<Expression<'a>> {
        let mut expressions = vec![self.parse_expression()];
        while self.optional_token(SyntaxKind::CommaToken) {
            if !self.tick() {
                break;
            }
            expressions.push(self.parse_expression());
        }
        expressions
    }

    /// After `for (`, with `Type name :` ahead.
    fn parse_foreach(&mut self, pos: u32) -> Statement<'a> {
        let variable_pos = self.token_pos();
        let modifiers = self.parse_modifiers(ModifierContext::Local);
        let variable = self.parse_local_variable(variable_pos, modifiers, false);
        let header = TextRange::new(pos, self.token_end());
        self.expect(SyntaxKind::ColonToken, Construct::Statement);
        self.require_level(SourceLevel::JAVA_5, "'for each' statements", header);
        let iterable = self.parse_expression();
        self.close_bracket(None);
        let body = self.parse_control_body();
        Statement::Foreach(self.alloc(ForeachStatement {
            data: self.finish_statement(SyntaxKind::ForeachStatement, pos),
            variable,
            iterable,
            body,
        }))
    }

    fn parse_try(&mut self, pos: u32) -> Statement<'a> {
        self.next_token();
        let resources = if self.at(SyntaxKind::OpenParenToken) {
            self.parse_resources()
        } else {
            &[]
        };
        let block = self.parse_block(Construct::Block);

        let mut catches = Vec::new();
        while self.at(SyntaxKind::CatchKeyword) {
            if !self.tick() {
                break;
            }
            catches.push(self.parse_catch_clause());
        }
        let finally = if self.optional_token(SyntaxKind::FinallyKeyword) {
            Some(self.parse_block(Construct::Block))
        } else {
            None
        };
        if catches.is_empty() && finally.is_none() && resources.is_empty() {
            let range = self.prev_range;
            let at = self.last_end();
            self.report(range, &messages::INSERT_TO_COMPLETE, &["Finally", "TryStatement"]);
            self.recovery.record(RecoveryAction::InsertToken {
                kind: SyntaxKind::FinallyKeyword,
                at,
                construct: Construct::TryStatement.label(),
            });
        }
        Statement::Try(self.alloc(TryStatement {
            data: self.finish_statement(SyntaxKind::TryStatement, pos),
            resources,
            block,
            catches: self.list(catches),
            finally,
        }))
    }

    fn parse_resources(&mut self) -> NodeList<'a, Resource<'a>> {
        let pos = self.token_pos();
        self.open_bracket(SyntaxKind::OpenParenToken, Construct::ResourceSpecification);
        let mut resources = Vec::new();
        while !self.at(SyntaxKind::CloseParenToken) && !self.is_eof() {
            if !self.tick() {
                break;
            }
            let resource_pos = self.token_pos();
            let resource = if self.scanner.look_ahead(skim_resource_declaration) {
                let modifiers = self.parse_modifiers(ModifierContext::Local);
                Resource::Declaration(self.parse_local_variable(resource_pos, modifiers, false))
            } else {
                Resource::Expression(self.parse_expression())
            };
            resources.push(resource);
            if !self.optional_token(SyntaxKind::SemicolonToken) {
                break;
            }
        }
        self.close_bracket(None);
        let range = TextRange::new(pos, self.last_end().max(pos));
        self.require_level(SourceLevel::JAVA_7, "Resource specifications", range);
        self.list(resources)
    }

    fn parse_catch_clause(&mut self) -> CatchClause<'a> {
        let pos = self.token_pos();
        self.next_token();
        self.open_bracket(SyntaxKind::OpenParenToken, Construct::CatchHeader);
        let parameter_pos = self.token_pos();
        let modifiers = self.parse_modifiers(ModifierContext::Local);
        let first = self.parse_type(TypeContext::Exception);
        let ty = if self.at(SyntaxKind::BarToken) {
            let mut types = vec![first];
            while self.optional_token(SyntaxKind::BarToken) {
                types.push(self.parse_type(TypeContext::Exception));
            }
            let union = self.alloc(CompoundType {
                data: self.finish(SyntaxKind::UnionType, first.range().pos),
                types: self.list(types),
            });
            self.require_level(SourceLevel::JAVA_7, "Multi-catch parameters", union.data.range);
            TypeRef::Union(union)
        } else {
            first
        };
        let at_assist = self.at_assist_token();
        let name = self.expect_identifier();
        if at_assist {
            self.declaration_assist(
                AssistKind::CompleteOnArgumentName,
                AssistKind::SelectOnParameter,
                &name,
            );
        }
        let parameter = self.alloc(Parameter {
            data: self.finish(SyntaxKind::Parameter, parameter_pos),
            modifiers,
            ty: Some(ty),
            name,
            extra_dims: 0,
        });
        self.close_bracket(None);
        let block = self.parse_block(Construct::Block);
        self.finished(CatchClause {
            data: self.finish(SyntaxKind::CatchClause, pos),
            parameter,
            block,
        })
    }

    /// A switch statement or expression, at `switch`.
    pub(crate) fn parse_switch(&mut self, kind: SyntaxKind) -> &'a SwitchBlock<'a> {
        let pos = self.token_pos();
        self.next_token();
        let selector = self.parse_parenthesized_condition();
        self.open_bracket(SyntaxKind::OpenBraceToken, Construct::SwitchBlock);
        let mut cases = Vec::new();
        loop {
            if !self.tick() {
                break;
            }
            let current = self.current_token();
            match current {
                SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken => break,
                SyntaxKind::CaseKeyword | SyntaxKind::DefaultKeyword => {
                    cases.push(self.parse_switch_case());
                }
                _ if current.is_member_only_modifier() => break,
                _ if current.is_close_bracket() => {
                    if !self.at_stray_closer() {
                        break;
                    }
                    self.delete_current();
                }
                _ => {
                    self.skip_to_boundary(SWITCH_LABEL_BOUNDARY);
                }
            }
        }
        self.close_bracket(None);
        let data = if kind == SyntaxKind::SwitchStatement {
            self.finish_statement(kind, pos)
        } else {
            self.finish(kind, pos)
        };
        self.alloc(SwitchBlock {
            data,
            selector,
            cases: self.list(cases),
        })
    }

    fn parse_switch_case(&mut self) -> SwitchCase<'a> {
        let pos = self.token_pos();
        let mut labels = Vec::new();
        let is_default = self.optional_token(SyntaxKind::DefaultKeyword);
        if !is_default {
            self.next_token();
            loop {
                if !self.tick() {
                    break;
                }
                labels.push(self.parse_conditional());
                if !self.optional_token(SyntaxKind::CommaToken) {
                    break;
                }
            }
        }

        let mut data_flags = NodeFlags::NONE;
        let body = if self.at(SyntaxKind::ArrowToken) {
            let range = TextRange::new(pos, self.token_end());
            self.next_token();
            self.require_level(SourceLevel::JAVA_14, "Case arrows", range);
            data_flags |= NodeFlags::ARROW_CASE;
            let body = self.parse_arrow_case_body();
            self.list(vec![body])
        } else {
            self.expect(SyntaxKind::ColonToken, Construct::SwitchLabel);
            let (statements, dropped) = self.parse_block_statements(true);
            if dropped {
                data_flags |= NodeFlags::HAS_SYNTAX_ERRORS;
            }
            self.list(statements)
        };
        self.finished(SwitchCase {
            data: self.finish(SyntaxKind::SwitchCase, pos).with_flags(data_flags),
            labels: self.list(labels),
            is_default,
            body,
        })
    }

    /// After `->`: a block, a throw, or an expression ended by `;`.
    fn parse_arrow_case_body(&mut self) -> Statement<'a> {
        match self.current_token() {
            SyntaxKind::OpenBraceToken => Statement::Block(self.parse_block(Construct::Block)),
            SyntaxKind::ThrowKeyword => self.parse_statement(),
            _ => {
                let pos = self.token_pos();
                let expression = self.parse_expression();
                self.expect(SyntaxKind::SemicolonToken, Construct::Statement);
                Statement::Expression(self.alloc(ExpressionStatement {
                    data: self.finish(SyntaxKind::ExpressionStatement, pos),
                    expression,
                }))
            }
        }
    }

    fn parse_synchronized(&mut self, pos: u32) -> Statement<'a> {
        self.next_token();
        let lock = self.parse_parenthesized_condition();
        let block = self.parse_block(Construct::Block);
        Statement::Synchronized(self.alloc(SynchronizedStatement {
            data: self.finish_statement(SyntaxKind::SynchronizedStatement, pos),
            lock,
            block,
        }))
    }

    fn parse_return(&mut self, pos: u32) -> Statement<'a> {
        self.next_token();
        let expression = if self.at(SyntaxKind::SemicolonToken) {
            None
        } else {
            Some(self.parse_expression())
        };
        self.expect(SyntaxKind::SemicolonToken, Construct::Statement);
        Statement::Return(self.alloc(ReturnStatement {
            data: self.finish_statement(SyntaxKind::ReturnStatement, pos),
            expression,
        }))
    }

    fn parse_throw(&mut self, pos: u32) -> Statement<'a> {
        self.next_token();
        let expression = self.parse_expression();
        self.expect(SyntaxKind::SemicolonToken, Construct::Statement);
        Statement::Throw(self.alloc(ThrowStatement {
            data: self.finish_statement(SyntaxKind::ThrowStatement, pos),
            expression,
        }))
    }

    fn parse_yield(&mut self, pos: u32) -> Statement<'a> {
        let keyword = self.token_range();
        self.next_token();
        self.require_level(SourceLevel::JAVA_14, "Yield statements", keyword);
        let expression = self.parse_expression();
        self.expect(SyntaxKind::SemicolonToken, Construct::Statement);
        Statement::Yield(self.alloc(YieldStatement {
            data: self.finish_statement(SyntaxKind::YieldStatement, pos),
            expression,
        }))
    }

    /// `break` or `continue`, with an optional label. A label at the
    /// completion cursor becomes a `CompleteOnLabel` node.
    fn parse_jump(&mut self, pos: u32) -> Statement<'a> {
        let is_break = self.at(SyntaxKind::BreakKeyword);
        self.next_token();
        let label = if self.at(SyntaxKind::Identifier) {
            if self.completion_pending() && self.at_assist_token() {
                let name = self.take_identifier();
                let range = name.data.range;
                let mut node = self.blank_assist(AssistKind::CompleteOnLabel, range, range);
                node.prefix = self.assist_prefix(&name);
                node.name = Some(name);
                let node = self.capture(node);
                self.expect(SyntaxKind::SemicolonToken, Construct::Statement);
                return Statement::Assist(node);
            }
            Some(self.take_identifier())
        } else {
            None
        };
        self.expect(SyntaxKind::SemicolonToken, Construct::Statement);
        let kind = if is_break {
            SyntaxKind::BreakStatement
        } else {
            SyntaxKind::ContinueStatement
        };
        let jump = self.alloc(JumpStatement {
            data: self.finish_statement(kind, pos),
            label,
        });
        if is_break {
            Statement::Break(jump)
        } else {
            Statement::Continue(jump)
        }
    }

    fn parse_assert(&mut self, pos: u32) -> Statement<'a> {
        self.next_token();
        let condition = self.parse_expression();
        let message = if self.optional_token(SyntaxKind::ColonToken) {
            Some(self.parse_expression())
        } else {
            None
        };
        self.expect(SyntaxKind::SemicolonToken, Construct::Statement);
        Statement::Assert(self.alloc(AssertStatement {
            data: self.finish_statement(SyntaxKind::AssertStatement, pos),
            condition,
            message,
        }))
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::{ParseMode, Parser};
    use crate::recovery::Construct;
    use bumpalo::Bump;
    use javelin_ast::node::*;
    use javelin_ast::syntax_kind::SyntaxKind;
    use javelin_ast::types::NodeFlags;
    use javelin_core::intern::StringInterner;
    use javelin_options::ResolvedOptions;

    struct Parsed {
        kinds: Vec<SyntaxKind>,
        messages: Vec<String>,
        has_errors_flag: bool,
    }

    fn parse_block(source: &str, statement_recovery: bool) -> Parsed {
        let arena = Bump::new();
        let options = ResolvedOptions {
            statement_recovery,
            ..ResolvedOptions::default()
        };
        let mut p = Parser::new(&arena, source, StringInterner::new(), options, ParseMode::Full);
        p.next_token();
        let block = p.parse_block(Construct::MethodBody);
        let diagnostics = p.take_diagnostics(true);
        Parsed {
            kinds: block.statements.iter().map(|s| s.kind()).collect(),
            messages: diagnostics.messages().into_iter().map(String::from).collect(),
            has_errors_flag: block.data.flags.contains(NodeFlags::HAS_SYNTAX_ERRORS),
        }
    }

    #[test]
    fn test_statement_forms() {
        let parsed = parse_block(
            "{ int x = 1; foo(); if (x > 0) x++; else { } while (true) break; \
             do { continue; } while (false); for (int i = 0; i < 3; i++) ; \
             for (String s : list) { } label: return; throw e; \
             try { } catch (IOException | RuntimeException e) { } finally { } \
             switch (x) { case 1: case 2: foo(); break; default: } \
             synchronized (this) { } assert x : \"m\"; ; class L { } }",
            false,
        );
        assert!(parsed.messages.is_empty(), "{:?}", parsed.messages);
        assert_eq!(
            parsed.kinds,
            vec![
                SyntaxKind::LocalVariableDeclaration,
                SyntaxKind::ExpressionStatement,
                SyntaxKind::IfStatement,
                SyntaxKind::WhileStatement,
                SyntaxKind::DoStatement,
                SyntaxKind::ForStatement,
                SyntaxKind::ForeachStatement,
                SyntaxKind::LabeledStatement,
                SyntaxKind::ThrowStatement,
                SyntaxKind::TryStatement,
                SyntaxKind::SwitchStatement,
                SyntaxKind::SynchronizedStatement,
                SyntaxKind::AssertStatement,
                SyntaxKind::EmptyStatement,
                SyntaxKind::ClassDeclaration,
            ]
        );
    }

    #[test]
    fn test_modern_statements() {
        let parsed = parse_block(
            "{ var v = switch (k) { case A, B -> 1; default -> { yield 2; } }; \
             try (var in = open(); out) { } record P(int x) { } }",
            false,
        );
        assert!(parsed.messages.is_empty(), "{:?}", parsed.messages);
        assert_eq!(
            parsed.kinds,
            vec![
                SyntaxKind::LocalVariableDeclaration,
                SyntaxKind::TryStatement,
                SyntaxKind::RecordDeclaration,
            ]
        );
    }

    #[test]
    fn test_missing_semicolon_is_inserted() {
        let parsed = parse_block("{ foo() }", true);
        assert_eq!(parsed.messages, vec!["Syntax error, insert \";\" to complete BlockStatements"]);
        assert_eq!(parsed.kinds, vec![SyntaxKind::ExpressionStatement]);
    }

    #[test]
    fn test_malformed_statement_dropped_without_recovery() {
        let parsed = parse_block("{ a(); b( ; c(); }", false);
        assert_eq!(
            parsed.kinds,
            vec![SyntaxKind::ExpressionStatement, SyntaxKind::ExpressionStatement]
        );
        assert!(parsed.has_errors_flag);

        let recovered = parse_block("{ a(); b( ; c(); }", true);
        assert_eq!(recovered.kinds.len(), 3);
        assert_eq!(parsed.messages, recovered.messages);
    }

    #[test]
    fn test_not_a_statement() {
        let parsed = parse_block("{ x; }", true);
        assert_eq!(
            parsed.messages,
            vec!["Syntax error, insert \"AssignmentOperator Expression\" to complete Expression"]
        );
    }

    #[test]
    fn test_stray_token_is_deleted() {
        let parsed = parse_block("{ else x(); }", true);
        assert_eq!(parsed.messages[0], "Syntax error on token \"else\", delete this token");
    }

    #[test]
    fn test_try_without_handlers() {
        let parsed = parse_block("{ try { } }", true);
        assert_eq!(
            parsed.messages,
            vec!["Syntax error, insert \"Finally\" to complete TryStatement"]
        );
    }

    #[test]
    fn test_unclosed_block_before_member() {
        let parsed = parse_block("{ if (a) { } public", false);
        assert_eq!(parsed.messages, vec!["Syntax error, insert \"}\" to complete Statement"]);
        let empty = parse_block("{ public", false);
        assert_eq!(empty.messages, vec!["Syntax error, insert \"}\" to complete MethodBody"]);
    }
}
