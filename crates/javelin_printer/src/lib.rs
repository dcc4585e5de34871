//! javelin_printer: AST to text output.
//!
//! Renders a compilation unit back into Java source. Assist nodes are shown
//! as `<CompleteOnName:foo>` markers so tests can see where the completion
//! or selection node landed. Deferred bodies of a diet parse print as
//! `{ /* deferred */ }`.

use javelin_ast::node::*;
use javelin_ast::syntax_kind::SyntaxKind;
use javelin_ast::types::{Modifiers, NodeFlags};

/// Options for the printer.
pub struct PrinterOptions {
    /// Indentation string.
    pub indent_str: String,
    /// Newline string.
    pub new_line: String,
    /// Whether to emit a trailing newline.
    pub trailing_newline: bool,
    /// Wrap assist nodes in `<Kind:...>` markers.
    pub mark_assist: bool,
}

impl Default for PrinterOptions {
    fn default() -> Self {
        Self {
            indent_str: "    ".to_string(),
            new_line: "\n".to_string(),
            trailing_newline: true,
            mark_assist: true,
        }
    }
}

/// The printer converts AST nodes to text.
pub struct Printer {
    output: String,
    indent_level: u32,
    options: PrinterOptions,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

/// Print a whole unit with default options.
pub fn print_unit(unit: &CompilationUnit<'_>) -> String {
    Printer::new().print_compilation_unit(unit)
}

/// The Java text an assist node stands for, without a marker.
/// `this.fred(` with the cursor after `(` prints as `this.fred()`.
pub fn print_assist(node: &AssistNode<'_>) -> String {
    let mut printer = Printer::with_options(PrinterOptions {
        mark_assist: false,
        ..PrinterOptions::default()
    });
    printer.print_assist_node(node);
    printer.output
}

pub fn print_expression(expr: &Expression<'_>) -> String {
    let mut printer = Printer::new();
    printer.print_expr(expr);
    printer.output
}

pub fn print_statement(stmt: &Statement<'_>) -> String {
    let mut printer = Printer::new();
    printer.print_stmt(stmt);
    printer.output
}

pub fn print_type(ty: &TypeRef<'_>) -> String {
    let mut printer = Printer::new();
    printer.print_type_ref(ty);
    printer.output
}

impl Printer {
    pub fn new() -> Self {
        Self::with_options(PrinterOptions::default())
    }

    pub fn with_options(options: PrinterOptions) -> Self {
        Self {
            output: String::with_capacity(4096),
            indent_level: 0,
            options,
        }
    }

    /// Print a compilation unit to a string.
    pub fn print_compilation_unit(&mut self, unit: &CompilationUnit<'_>) -> String {
        self.output.clear();
        if let Some(package) = unit.package {
            self.print_annotations(package.annotations);
            self.write("package ");
            match package.assist {
                Some(node) => self.print_assist_node(node),
                None => self.print_name(&package.name),
            }
            self.write(";");
            self.write_newline();
        }
        for import in unit.imports {
            self.write("import ");
            if import.data.flags.contains(NodeFlags::STATIC) {
                self.write("static ");
            }
            match import.assist {
                Some(node) => self.print_assist_node(node),
                None => self.print_name(&import.name),
            }
            if import.data.flags.contains(NodeFlags::ON_DEMAND) {
                self.write(".*");
            }
            self.write(";");
            self.write_newline();
        }
        for (i, declaration) in unit.types.iter().enumerate() {
            if i > 0 || unit.package.is_some() || !unit.imports.is_empty() {
                self.write_newline();
            }
            self.print_type_declaration(declaration);
            self.write_newline();
        }
        if !self.options.trailing_newline {
            while self.output.ends_with(self.options.new_line.as_str()) {
                let len = self.output.len() - self.options.new_line.len();
                self.output.truncate(len);
            }
        }
        self.output.clone()
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    fn print_type_declaration(&mut self, node: &TypeDeclaration<'_>) {
        self.print_modifiers(&node.modifiers);
        self.write(node.type_kind.keyword());
        self.write(" ");
        self.print_identifier(&node.name);
        self.print_type_parameters(node.type_parameters);
        if node.type_kind == TypeKind::Record {
            self.print_parameters(node.record_components);
        }
        if !node.extends.is_empty() {
            self.write(" extends ");
            self.print_type_list(node.extends);
        }
        if !node.implements.is_empty() {
            self.write(" implements ");
            self.print_type_list(node.implements);
        }
        if !node.permits.is_empty() {
            self.write(" permits ");
            self.print_type_list(node.permits);
        }
        self.write(" ");
        self.print_class_body(node.enum_constants, node.members, node.type_kind == TypeKind::Enum);
    }

    fn print_class_body(
        &mut self,
        constants: &[EnumConstant<'_>],
        members: &[Member<'_>],
        is_enum: bool,
    ) {
        self.write("{");
        if constants.is_empty() && members.is_empty() {
            self.write("}");
            return;
        }
        self.increase_indent();
        if !constants.is_empty() {
            self.write_newline();
            self.write_indent();
            for (i, constant) in constants.iter().enumerate() {
                if i > 0 {
                    self.write(", ");
                }
                self.print_enum_constant(constant);
            }
            self.write(";");
        } else if is_enum {
            self.write_newline();
            self.write_indent();
            self.write(";");
        }
        for member in members {
            self.write_newline();
            self.write_indent();
            self.print_member(member);
        }
        self.decrease_indent();
        self.write_newline();
        self.write_indent();
        self.write("}");
    }

    fn print_enum_constant(&mut self, constant: &EnumConstant<'_>) {
        self.print_annotations(constant.annotations);
        self.print_identifier(&constant.name);
        if let Some(arguments) = constant.arguments {
            self.print_arguments(arguments);
        }
        if let Some(body) = constant.body {
            self.write(" ");
            self.print_class_body(&[], body, false);
        }
    }

    fn print_member(&mut self, member: &Member<'_>) {
        match member {
            Member::Field(field) => {
                self.print_modifiers(&field.modifiers);
                self.print_type_ref(&field.ty);
                self.write(" ");
                self.print_declarators(field.declarators);
                self.write(";");
            }
            Member::Method(method) => self.print_method(method),
            Member::Initializer(initializer) => {
                if initializer.is_static() {
                    self.write("static ");
                }
                self.print_body(initializer.body());
            }
            Member::Type(declaration) => self.print_type_declaration(declaration),
        }
    }

    fn print_method(&mut self, node: &MethodDeclaration<'_>) {
        self.print_modifiers(&node.modifiers);
        if !node.type_parameters.is_empty() {
            self.print_type_parameters(node.type_parameters);
            self.write(" ");
        }
        if let Some(return_type) = &node.return_type {
            self.print_type_ref(return_type);
            self.write(" ");
        }
        self.print_identifier(&node.name);
        if !node.data.flags.contains(NodeFlags::COMPACT_CONSTRUCTOR) {
            self.print_parameters(node.parameters);
        }
        self.print_dims(node.extra_dims);
        if !node.throws.is_empty() {
            self.write(" throws ");
            self.print_type_list(node.throws);
        }
        if let Some(value) = &node.default_value {
            self.write(" default ");
            self.print_expr(value);
        }
        match node.body() {
            MethodBody::None => self.write(";"),
            body => {
                self.write(" ");
                self.print_body(body);
            }
        }
    }

    fn print_body(&mut self, body: MethodBody<'_>) {
        match body {
            MethodBody::None => self.write(";"),
            MethodBody::Deferred(_) => self.write("{ /* deferred */ }"),
            MethodBody::Parsed(block) => self.print_block(block),
        }
    }

    fn print_parameters(&mut self, parameters: &[Parameter<'_>]) {
        self.write("(");
        for (i, parameter) in parameters.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.print_parameter(parameter);
        }
        self.write(")");
    }

    fn print_parameter(&mut self, parameter: &Parameter<'_>) {
        self.print_modifiers(&parameter.modifiers);
        if let Some(ty) = &parameter.ty {
            self.print_type_ref(ty);
            if parameter.is_varargs() {
                self.write("...");
            }
            self.write(" ");
        }
        self.print_identifier(&parameter.name);
        self.print_dims(parameter.extra_dims);
    }

    fn print_declarators(&mut self, declarators: &[VariableDeclarator<'_>]) {
        for (i, declarator) in declarators.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.print_identifier(&declarator.name);
            self.print_dims(declarator.extra_dims);
            if let Some(initializer) = &declarator.initializer {
                self.write(" = ");
                self.print_expr(initializer);
            }
        }
    }

    fn print_modifiers(&mut self, modifiers: &ModifierList<'_>) {
        self.print_annotations(modifiers.annotations);
        self.print_modifier_flags(modifiers.flags);
    }

    fn print_modifier_flags(&mut self, flags: Modifiers) {
        for keyword in flags.keywords() {
            self.write(keyword);
            self.write(" ");
        }
    }

    fn print_annotations(&mut self, annotations: &[Annotation<'_>]) {
        for annotation in annotations {
            self.print_annotation(annotation);
            self.write(" ");
        }
    }

    fn print_annotation(&mut self, annotation: &Annotation<'_>) {
        self.write("@");
        self.print_type_ref(&annotation.type_ref);
        match annotation.args {
            AnnotationArgs::Marker => {}
            AnnotationArgs::Single(value) => {
                self.write("(");
                self.print_expr(&value);
                self.write(")");
            }
            AnnotationArgs::Pairs(pairs) => {
                self.write("(");
                for (i, pair) in pairs.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.print_identifier(&pair.name);
                    self.write(" = ");
                    self.print_expr(&pair.value);
                }
                self.write(")");
            }
        }
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn print_block(&mut self, block: &Block<'_>) {
        self.write("{");
        if block.statements.is_empty() {
            self.write("}");
            return;
        }
        self.increase_indent();
        for statement in block.statements {
            self.write_newline();
            self.write_indent();
            self.print_stmt(statement);
        }
        self.decrease_indent();
        self.write_newline();
        self.write_indent();
        self.write("}");
    }

    fn print_stmt(&mut self, stmt: &Statement<'_>) {
        match stmt {
            Statement::Block(block) => self.print_block(block),
            Statement::LocalVariable(node) => {
                self.print_local_variable(node);
                self.write(";");
            }
            Statement::LocalType(node) => self.print_type_declaration(node),
            Statement::Expression(node) => {
                self.print_expr(&node.expression);
                self.write(";");
            }
            Statement::If(node) => {
                self.write("if (");
                self.print_expr(&node.condition);
                self.write(") ");
                self.print_stmt(&node.then_statement);
                if let Some(else_statement) = &node.else_statement {
                    self.write(" else ");
                    self.print_stmt(else_statement);
                }
            }
            Statement::While(node) => {
                self.write("while (");
                self.print_expr(&node.condition);
                self.write(") ");
                self.print_stmt(&node.body);
            }
            Statement::Do(node) => {
                self.write("do ");
                self.print_stmt(&node.body);
                self.write(" while (");
                self.print_expr(&node.condition);
                self.write(");");
            }
            Statement::For(node) => {
                self.write("for (");
                for (i, init) in node.initializers.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    match init {
                        Statement::LocalVariable(local) => self.print_local_variable(local),
                        Statement::Expression(expr) => self.print_expr(&expr.expression),
                        other => self.print_stmt(other),
                    }
                }
                self.write(";");
                if let Some(condition) = &node.condition {
                    self.write(" ");
                    self.print_expr(condition);
                }
                self.write(";");
                if !node.updates.is_empty() {
                    self.write(" ");
                    self.print_expr_list(node.updates);
                }
                self.write(") ");
                self.print_stmt(&node.body);
            }
            Statement::Foreach(node) => {
                self.write("for (");
                self.print_local_variable(node.variable);
                self.write(" : ");
                self.print_expr(&node.iterable);
                self.write(") ");
                self.print_stmt(&node.body);
            }
            Statement::Labeled(node) => {
                self.print_identifier(&node.label);
                self.write(": ");
                self.print_stmt(&node.body);
            }
            Statement::Break(node) => self.print_jump("break", node),
            Statement::Continue(node) => self.print_jump("continue", node),
            Statement::Return(node) => {
                self.write("return");
                if let Some(expr) = &node.expression {
                    self.write(" ");
                    self.print_expr(expr);
                }
                self.write(";");
            }
            Statement::Throw(node) => {
                self.write("throw ");
                self.print_expr(&node.expression);
                self.write(";");
            }
            Statement::Try(node) => self.print_try(node),
            Statement::Switch(node) => self.print_switch(node),
            Statement::Synchronized(node) => {
                self.write("synchronized (");
                self.print_expr(&node.lock);
                self.write(") ");
                self.print_block(node.block);
            }
            Statement::Assert(node) => {
                self.write("assert ");
                self.print_expr(&node.condition);
                if let Some(message) = &node.message {
                    self.write(" : ");
                    self.print_expr(message);
                }
                self.write(";");
            }
            Statement::Yield(node) => {
                self.write("yield ");
                self.print_expr(&node.expression);
                self.write(";");
            }
            Statement::Empty(_) => self.write(";"),
            Statement::ExplicitConstructorCall(node) => {
                if let Some(qualifier) = &node.qualifier {
                    self.print_expr(qualifier);
                    self.write(".");
                }
                self.print_type_arguments(node.type_arguments);
                self.write(match node.call_kind {
                    ConstructorCallKind::This => "this",
                    ConstructorCallKind::Super => "super",
                });
                self.print_arguments(node.arguments);
                self.write(";");
            }
            Statement::Assist(node) => {
                self.print_assist_node(node);
                self.write(";");
            }
        }
    }

    fn print_local_variable(&mut self, node: &LocalVariableDeclaration<'_>) {
        self.print_modifiers(&node.modifiers);
        self.print_type_ref(&node.ty);
        self.write(" ");
        self.print_declarators(node.declarators);
    }

    fn print_jump(&mut self, keyword: &str, node: &JumpStatement<'_>) {
        self.write(keyword);
        if let Some(label) = &node.label {
            self.write(" ");
            self.print_identifier(label);
        }
        self.write(";");
    }

    fn print_try(&mut self, node: &TryStatement<'_>) {
        self.write("try ");
        if !node.resources.is_empty() {
            self.write("(");
            for (i, resource) in node.resources.iter().enumerate() {
                if i > 0 {
                    self.write("; ");
                }
                match resource {
                    Resource::Declaration(local) => self.print_local_variable(local),
                    Resource::Expression(expr) => self.print_expr(expr),
                }
            }
            self.write(") ");
        }
        self.print_block(node.block);
        for catch in node.catches {
            self.write(" catch (");
            self.print_parameter(catch.parameter);
            self.write(") ");
            self.print_block(catch.block);
        }
        if let Some(finally) = node.finally {
            self.write(" finally ");
            self.print_block(finally);
        }
    }

    fn print_switch(&mut self, node: &SwitchBlock<'_>) {
        self.write("switch (");
        self.print_expr(&node.selector);
        self.write(") {");
        self.increase_indent();
        for case in node.cases {
            self.write_newline();
            self.write_indent();
            if case.is_default {
                self.write("default");
            } else {
                self.write("case ");
                self.print_expr_list(case.labels);
            }
            if case.data.flags.contains(NodeFlags::ARROW_CASE) {
                self.write(" -> ");
                for statement in case.body {
                    self.print_stmt(statement);
                }
                continue;
            }
            self.write(":");
            self.increase_indent();
            for statement in case.body {
                self.write_newline();
                self.write_indent();
                self.print_stmt(statement);
            }
            self.decrease_indent();
        }
        self.decrease_indent();
        self.write_newline();
        self.write_indent();
        self.write("}");
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn print_expr(&mut self, expr: &Expression<'_>) {
        match expr {
            Expression::Literal(node) => self.write(node.raw),
            Expression::Name(node) => self.print_name(&node.name),
            Expression::This(node) => {
                if let Some(qualifier) = &node.qualifier {
                    self.print_name(qualifier);
                    self.write(".");
                }
                self.write("this");
            }
            Expression::Super(node) => {
                if let Some(qualifier) = &node.qualifier {
                    self.print_name(qualifier);
                    self.write(".");
                }
                self.write("super");
            }
            Expression::FieldAccess(node) => {
                self.print_expr(&node.receiver);
                self.write(".");
                self.print_identifier(&node.name);
            }
            Expression::MessageSend(node) => {
                if let Some(receiver) = &node.receiver {
                    self.print_expr(receiver);
                    self.write(".");
                }
                self.print_type_arguments(node.type_arguments);
                self.print_identifier(&node.selector);
                self.print_arguments(node.arguments);
            }
            Expression::Allocation(node) => {
                if let Some(outer) = &node.outer {
                    self.print_expr(outer);
                    self.write(".");
                }
                self.write("new ");
                self.print_type_arguments(node.type_arguments);
                self.print_type_ref(&node.ty);
                self.print_arguments(node.arguments);
                if let Some(body) = node.body {
                    self.write(" ");
                    self.print_class_body(&[], body, false);
                }
            }
            Expression::ArrayAllocation(node) => {
                self.write("new ");
                self.print_type_ref(&node.element);
                for dimension in node.dimensions {
                    self.write("[");
                    if let Some(size) = dimension {
                        self.print_expr(size);
                    }
                    self.write("]");
                }
                if let Some(initializer) = node.initializer {
                    self.write(" ");
                    self.print_array_initializer(initializer);
                }
            }
            Expression::ArrayInitializer(node) => self.print_array_initializer(node),
            Expression::ArrayAccess(node) => {
                self.print_expr(&node.receiver);
                self.write("[");
                self.print_expr(&node.index);
                self.write("]");
            }
            Expression::ClassLiteral(node) => {
                self.print_type_ref(&node.ty);
                self.write(".class");
            }
            Expression::Cast(node) => {
                self.write("(");
                self.print_type_ref(&node.ty);
                self.write(") ");
                self.print_expr(&node.expression);
            }
            Expression::InstanceOf(node) => {
                self.print_expr(&node.expression);
                self.write(" instanceof ");
                self.print_type_ref(&node.ty);
                if let Some(binding) = &node.binding {
                    self.write(" ");
                    self.print_identifier(binding);
                }
            }
            Expression::Prefix(node) => {
                self.write_owned(node.operator.to_string());
                self.print_expr(&node.operand);
            }
            Expression::Postfix(node) => {
                self.print_expr(&node.operand);
                self.write_owned(node.operator.to_string());
            }
            Expression::Binary(node) => {
                self.print_expr(&node.left);
                self.write(" ");
                self.write_owned(node.operator.to_string());
                self.write(" ");
                self.print_expr(&node.right);
            }
            Expression::Conditional(node) => {
                self.print_expr(&node.condition);
                self.write(" ? ");
                self.print_expr(&node.when_true);
                self.write(" : ");
                self.print_expr(&node.when_false);
            }
            Expression::Assignment(node) => {
                self.print_expr(&node.target);
                self.write(" ");
                self.write_owned(node.operator.to_string());
                self.write(" ");
                self.print_expr(&node.value);
            }
            Expression::Lambda(node) => {
                if node.parenthesized {
                    self.print_parameters(node.parameters);
                } else {
                    for parameter in node.parameters {
                        self.print_identifier(&parameter.name);
                    }
                }
                self.write(" -> ");
                match node.body {
                    LambdaBody::Expression(body) => self.print_expr(&body),
                    LambdaBody::Block(block) => self.print_block(block),
                }
            }
            Expression::MethodReference(node) => {
                match node.target {
                    ReferenceTarget::Expression(target) => self.print_expr(&target),
                    ReferenceTarget::Type(target) => self.print_type_ref(&target),
                }
                self.write("::");
                self.print_type_arguments(node.type_arguments);
                self.print_identifier(&node.name);
            }
            Expression::Switch(node) => self.print_switch(node),
            Expression::Parenthesized(node) => {
                self.write("(");
                self.print_expr(&node.expression);
                self.write(")");
            }
            Expression::Annotation(node) => self.print_annotation(node),
            Expression::Assist(node) => self.print_assist_node(node),
        }
    }

    fn print_array_initializer(&mut self, node: &ArrayInitializer<'_>) {
        self.write("{");
        self.print_expr_list(node.elements);
        self.write("}");
    }

    fn print_arguments(&mut self, arguments: &[Expression<'_>]) {
        self.write("(");
        self.print_expr_list(arguments);
        self.write(")");
    }

    fn print_expr_list(&mut self, exprs: &[Expression<'_>]) {
        for (i, expr) in exprs.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.print_expr(expr);
        }
    }

    // ========================================================================
    // Assist nodes
    // ========================================================================

    fn print_assist_node(&mut self, node: &AssistNode<'_>) {
        if self.options.mark_assist {
            self.write("<");
            self.write(node.assist_kind.label());
            self.write(":");
        }
        self.print_assist_body(node);
        if self.options.mark_assist {
            self.write(">");
        }
    }

    fn print_assist_body(&mut self, node: &AssistNode<'_>) {
        let name = node.name.map_or("", |name| name.text);
        if node.data.flags.contains(NodeFlags::COVERING) {
            self.write(name);
            return;
        }
        match node.assist_kind {
            AssistKind::CompleteOnMessageSend
            | AssistKind::CompleteOnMessageSendName
            | AssistKind::SelectOnMessageSend => {
                self.print_receiver(node);
                self.print_type_arguments(node.type_arguments);
                self.write(name);
                self.print_arguments(node.arguments);
            }
            AssistKind::CompleteOnMemberAccess | AssistKind::SelectOnFieldReference => {
                self.print_receiver(node);
                self.write(name);
            }
            AssistKind::CompleteOnAllocation | AssistKind::SelectOnAllocation => {
                self.print_receiver(node);
                self.write("new ");
                self.print_type_arguments(node.type_arguments);
                if let Some(ty) = &node.ty {
                    self.print_type_ref(ty);
                }
                self.print_arguments(node.arguments);
            }
            AssistKind::CompleteOnExplicitConstructorCall | AssistKind::SelectOnExplicitConstructorCall => {
                self.print_receiver(node);
                self.write(name);
                self.print_arguments(node.arguments);
            }
            AssistKind::CompleteOnClassLiteralAccess => {
                if let Some(ty) = &node.ty {
                    self.print_type_ref(ty);
                }
                self.write(".");
                self.write(name);
            }
            _ => {
                for segment in node.qualifier {
                    self.print_identifier(segment);
                    self.write(".");
                }
                self.write(name);
            }
        }
    }

    fn print_receiver(&mut self, node: &AssistNode<'_>) {
        if let Some(receiver) = &node.receiver {
            self.print_expr(receiver);
            self.write(".");
        }
    }

    // ========================================================================
    // Types
    // ========================================================================

    fn print_type_ref(&mut self, ty: &TypeRef<'_>) {
        match ty {
            TypeRef::Primitive(node) => self.write_owned(node.keyword.to_string()),
            TypeRef::Class(node) => {
                self.print_annotations(node.annotations);
                for (i, segment) in node.segments.iter().enumerate() {
                    if i > 0 {
                        self.write(".");
                    }
                    self.print_identifier(&segment.name);
                    if let Some(arguments) = segment.type_arguments {
                        self.write("<");
                        self.print_type_list(arguments);
                        self.write(">");
                    }
                }
            }
            TypeRef::Array(node) => {
                self.print_type_ref(&node.element);
                self.print_dims(node.dims);
            }
            TypeRef::Wildcard(node) => {
                self.write("?");
                match (node.bound_kind, &node.bound) {
                    (WildcardBound::Extends, Some(bound)) => {
                        self.write(" extends ");
                        self.print_type_ref(bound);
                    }
                    (WildcardBound::Super, Some(bound)) => {
                        self.write(" super ");
                        self.print_type_ref(bound);
                    }
                    _ => {}
                }
            }
            TypeRef::Union(node) => self.print_joined_types(node.types, " | "),
            TypeRef::Intersection(node) => self.print_joined_types(node.types, " & "),
            TypeRef::Assist(node) => self.print_assist_node(node),
        }
    }

    fn print_joined_types(&mut self, types: &[TypeRef<'_>], separator: &str) {
        for (i, ty) in types.iter().enumerate() {
            if i > 0 {
                self.write(separator);
            }
            self.print_type_ref(ty);
        }
    }

    fn print_type_list(&mut self, types: &[TypeRef<'_>]) {
        self.print_joined_types(types, ", ");
    }

    fn print_type_arguments(&mut self, arguments: &[TypeRef<'_>]) {
        if arguments.is_empty() {
            return;
        }
        self.write("<");
        self.print_type_list(arguments);
        self.write(">");
    }

    fn print_type_parameters(&mut self, parameters: &[TypeParameter<'_>]) {
        if parameters.is_empty() {
            return;
        }
        self.write("<");
        for (i, parameter) in parameters.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.print_annotations(parameter.annotations);
            self.print_identifier(&parameter.name);
            if !parameter.bounds.is_empty() {
                self.write(" extends ");
                self.print_joined_types(parameter.bounds, " & ");
            }
        }
        self.write(">");
    }

    fn print_dims(&mut self, dims: u8) {
        for _ in 0..dims {
            self.write("[]");
        }
    }

    // ========================================================================
    // Names
    // ========================================================================

    fn print_identifier(&mut self, id: &Identifier<'_>) {
        self.write(id.text);
    }

    fn print_name(&mut self, name: &Name<'_>) {
        self.write_owned(name.dotted());
    }

    // ========================================================================
    // Output helpers
    // ========================================================================

    fn write(&mut self, s: &str) {
        self.output.push_str(s);
    }

    fn write_owned(&mut self, s: String) {
        self.output.push_str(&s);
    }

    fn write_newline(&mut self) {
        self.output.push_str(&self.options.new_line);
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.output.push_str(&self.options.indent_str);
        }
    }

    fn increase_indent(&mut self) {
        self.indent_level += 1;
    }

    fn decrease_indent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }
}

/// Spelling of an operator or keyword token.
pub fn token_to_string(kind: SyntaxKind) -> String {
    kind.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use javelin_core::text::TextRange;
    use pretty_assertions::assert_eq;

    fn identifier(text: &str, pos: u32) -> Identifier<'_> {
        let interner = javelin_core::intern::StringInterner::new();
        Identifier {
            data: NodeData::new(SyntaxKind::Identifier, pos, pos + text.len() as u32),
            name: interner.intern(text),
            text,
        }
    }

    fn assist<'a>(kind: AssistKind, name: Identifier<'a>, qualifier: &'a [Identifier<'a>]) -> AssistNode<'a> {
        AssistNode {
            data: NodeData::new(SyntaxKind::AssistNode, 0, 5),
            assist_kind: kind,
            replaced: TextRange::new(0, 5),
            prefix: "",
            name: Some(name),
            qualifier,
            receiver: None,
            ty: None,
            type_arguments: &[],
            arguments: &[],
        }
    }

    #[test]
    fn test_token_to_string() {
        assert_eq!(token_to_string(SyntaxKind::PlusToken), "+");
        assert_eq!(token_to_string(SyntaxKind::InstanceofKeyword), "instanceof");
    }

    #[test]
    fn test_qualified_name_assist() {
        let qualifier = [identifier("e", 0)];
        let node = assist(AssistKind::CompleteOnQualifiedName, identifier("has", 2), &qualifier);
        assert_eq!(print_assist(&node), "e.has");
    }

    #[test]
    fn test_marker_wraps_assist() {
        let node = assist(AssistKind::CompleteOnName, identifier("fo", 0), &[]);
        let expr = Expression::Assist(&node);
        assert_eq!(print_expression(&expr), "<CompleteOnName:fo>");
    }

    #[test]
    fn test_message_send_assist_prints_call() {
        let this = ThisReference {
            data: NodeData::new(SyntaxKind::ThisReference, 0, 4),
            qualifier: None,
        };
        let mut node = assist(AssistKind::CompleteOnMessageSend, identifier("fred", 5), &[]);
        node.receiver = Some(Expression::This(&this));
        assert_eq!(print_assist(&node), "this.fred()");
    }
}
