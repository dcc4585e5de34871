//! AST traversal.
//!
//! `AstVisitor` has one method per node category. The default methods call
//! the matching `walk_*` function, which reports the node to `enter_node`
//! and then visits its children in source order. Override a method to
//! intercept a category and call `walk_*` to keep descending.
//!
//! Deferred method bodies are not visited; only parsed ones are.

use crate::node::*;

pub trait AstVisitor<'a> {
    /// Called once for every node, before its children.
    fn enter_node(&mut self, _data: &NodeData) {}

    fn visit_compilation_unit(&mut self, node: &CompilationUnit<'a>) {
        walk_compilation_unit(self, node);
    }

    fn visit_type_declaration(&mut self, node: &TypeDeclaration<'a>) {
        walk_type_declaration(self, node);
    }

    fn visit_member(&mut self, member: &Member<'a>) {
        walk_member(self, member);
    }

    fn visit_method(&mut self, node: &MethodDeclaration<'a>) {
        walk_method(self, node);
    }

    fn visit_parameter(&mut self, node: &Parameter<'a>) {
        walk_parameter(self, node);
    }

    fn visit_annotation(&mut self, node: &Annotation<'a>) {
        walk_annotation(self, node);
    }

    fn visit_identifier(&mut self, node: &Identifier<'a>) {
        self.enter_node(&node.data);
    }

    fn visit_type_ref(&mut self, ty: &TypeRef<'a>) {
        walk_type_ref(self, ty);
    }

    fn visit_block(&mut self, node: &Block<'a>) {
        walk_block(self, node);
    }

    fn visit_statement(&mut self, stmt: &Statement<'a>) {
        walk_statement(self, stmt);
    }

    fn visit_expression(&mut self, expr: &Expression<'a>) {
        walk_expression(self, expr);
    }

    fn visit_assist(&mut self, node: &AssistNode<'a>) {
        walk_assist(self, node);
    }
}

pub fn walk_compilation_unit<'a, V: AstVisitor<'a> + ?Sized>(v: &mut V, node: &CompilationUnit<'a>) {
    v.enter_node(&node.data);
    if let Some(package) = node.package {
        v.enter_node(&package.data);
        for annotation in package.annotations {
            v.visit_annotation(annotation);
        }
        match package.assist {
            Some(assist) => v.visit_assist(assist),
            None => walk_name(v, &package.name),
        }
    }
    for import in node.imports {
        v.enter_node(&import.data);
        match import.assist {
            Some(assist) => v.visit_assist(assist),
            None => walk_name(v, &import.name),
        }
    }
    for ty in node.types {
        v.visit_type_declaration(ty);
    }
}

fn walk_name<'a, V: AstVisitor<'a> + ?Sized>(v: &mut V, name: &Name<'a>) {
    v.enter_node(&name.data);
    for segment in name.segments {
        v.visit_identifier(segment);
    }
}

fn walk_modifiers<'a, V: AstVisitor<'a> + ?Sized>(v: &mut V, modifiers: &ModifierList<'a>) {
    for annotation in modifiers.annotations {
        v.visit_annotation(annotation);
    }
}

fn walk_members<'a, V: AstVisitor<'a> + ?Sized>(v: &mut V, members: &[Member<'a>]) {
    for member in members {
        v.visit_member(member);
    }
}

pub fn walk_type_declaration<'a, V: AstVisitor<'a> + ?Sized>(v: &mut V, node: &TypeDeclaration<'a>) {
    v.enter_node(&node.data);
    walk_modifiers(v, &node.modifiers);
    v.visit_identifier(&node.name);
    for tp in node.type_parameters {
        v.enter_node(&tp.data);
        for annotation in tp.annotations {
            v.visit_annotation(annotation);
        }
        v.visit_identifier(&tp.name);
        for bound in tp.bounds {
            v.visit_type_ref(bound);
        }
    }
    for component in node.record_components {
        v.visit_parameter(component);
    }
    for ty in node.extends.iter().chain(node.implements).chain(node.permits) {
        v.visit_type_ref(ty);
    }
    for constant in node.enum_constants {
        v.enter_node(&constant.data);
        for annotation in constant.annotations {
            v.visit_annotation(annotation);
        }
        v.visit_identifier(&constant.name);
        for arg in constant.arguments.unwrap_or_default() {
            v.visit_expression(arg);
        }
        if let Some(body) = constant.body {
            walk_members(v, body);
        }
    }
    walk_members(v, node.members);
}

pub fn walk_member<'a, V: AstVisitor<'a> + ?Sized>(v: &mut V, member: &Member<'a>) {
    match member {
        Member::Field(field) => {
            v.enter_node(&field.data);
            walk_modifiers(v, &field.modifiers);
            v.visit_type_ref(&field.ty);
            for declarator in field.declarators {
                walk_declarator(v, declarator);
            }
        }
        Member::Method(method) => v.visit_method(method),
        Member::Initializer(init) => {
            v.enter_node(&init.data);
            walk_modifiers(v, &init.modifiers);
            if let Some(block) = init.body().block() {
                v.visit_block(block);
            }
        }
        Member::Type(ty) => v.visit_type_declaration(ty),
    }
}

fn walk_declarator<'a, V: AstVisitor<'a> + ?Sized>(v: &mut V, node: &VariableDeclarator<'a>) {
    v.enter_node(&node.data);
    v.visit_identifier(&node.name);
    if let Some(init) = &node.initializer {
        v.visit_expression(init);
    }
}

pub fn walk_method<'a, V: AstVisitor<'a> + ?Sized>(v: &mut V, node: &MethodDeclaration<'a>) {
    v.enter_node(&node.data);
    walk_modifiers(v, &node.modifiers);
    for tp in node.type_parameters {
        v.enter_node(&tp.data);
        v.visit_identifier(&tp.name);
        for bound in tp.bounds {
            v.visit_type_ref(bound);
        }
    }
    if let Some(ret) = &node.return_type {
        v.visit_type_ref(ret);
    }
    v.visit_identifier(&node.name);
    for param in node.parameters {
        v.visit_parameter(param);
    }
    for ty in node.throws {
        v.visit_type_ref(ty);
    }
    if let Some(default) = &node.default_value {
        v.visit_expression(default);
    }
    if let Some(block) = node.body().block() {
        v.visit_block(block);
    }
}

pub fn walk_parameter<'a, V: AstVisitor<'a> + ?Sized>(v: &mut V, node: &Parameter<'a>) {
    v.enter_node(&node.data);
    walk_modifiers(v, &node.modifiers);
    if let Some(ty) = &node.ty {
        v.visit_type_ref(ty);
    }
    v.visit_identifier(&node.name);
}

pub fn walk_annotation<'a, V: AstVisitor<'a> + ?Sized>(v: &mut V, node: &Annotation<'a>) {
    v.enter_node(&node.data);
    v.visit_type_ref(&node.type_ref);
    match &node.args {
        AnnotationArgs::Marker => {}
        AnnotationArgs::Single(value) => v.visit_expression(value),
        AnnotationArgs::Pairs(pairs) => {
            for pair in pairs.iter() {
                v.enter_node(&pair.data);
                v.visit_identifier(&pair.name);
                v.visit_expression(&pair.value);
            }
        }
    }
}

pub fn walk_type_ref<'a, V: AstVisitor<'a> + ?Sized>(v: &mut V, ty: &TypeRef<'a>) {
    match ty {
        TypeRef::Primitive(p) => v.enter_node(&p.data),
        TypeRef::Class(class) => {
            v.enter_node(&class.data);
            for annotation in class.annotations {
                v.visit_annotation(annotation);
            }
            for segment in class.segments {
                v.visit_identifier(&segment.name);
                for arg in segment.type_arguments.unwrap_or_default() {
                    v.visit_type_ref(arg);
                }
            }
        }
        TypeRef::Array(array) => {
            v.enter_node(&array.data);
            v.visit_type_ref(&array.element);
        }
        TypeRef::Wildcard(wildcard) => {
            v.enter_node(&wildcard.data);
            if let Some(bound) = &wildcard.bound {
                v.visit_type_ref(bound);
            }
        }
        TypeRef::Union(compound) | TypeRef::Intersection(compound) => {
            v.enter_node(&compound.data);
            for ty in compound.types {
                v.visit_type_ref(ty);
            }
        }
        TypeRef::Assist(assist) => v.visit_assist(assist),
    }
}

pub fn walk_block<'a, V: AstVisitor<'a> + ?Sized>(v: &mut V, node: &Block<'a>) {
    v.enter_node(&node.data);
    for stmt in node.statements {
        v.visit_statement(stmt);
    }
}

fn walk_local<'a, V: AstVisitor<'a> + ?Sized>(v: &mut V, node: &LocalVariableDeclaration<'a>) {
    v.enter_node(&node.data);
    walk_modifiers(v, &node.modifiers);
    v.visit_type_ref(&node.ty);
    for declarator in node.declarators {
        walk_declarator(v, declarator);
    }
}

fn walk_switch<'a, V: AstVisitor<'a> + ?Sized>(v: &mut V, node: &SwitchBlock<'a>) {
    v.enter_node(&node.data);
    v.visit_expression(&node.selector);
    for case in node.cases {
        v.enter_node(&case.data);
        for label in case.labels {
            v.visit_expression(label);
        }
        for stmt in case.body {
            v.visit_statement(stmt);
        }
    }
}

pub fn walk_statement<'a, V: AstVisitor<'a> + ?Sized>(v: &mut V, stmt: &Statement<'a>) {
    match stmt {
        Statement::Block(block) => v.visit_block(block),
        Statement::LocalVariable(local) => walk_local(v, local),
        Statement::LocalType(ty) => v.visit_type_declaration(ty),
        Statement::Expression(n) => {
            v.enter_node(&n.data);
            v.visit_expression(&n.expression);
        }
        Statement::If(n) => {
            v.enter_node(&n.data);
            v.visit_expression(&n.condition);
            v.visit_statement(&n.then_statement);
            if let Some(else_stmt) = &n.else_statement {
                v.visit_statement(else_stmt);
            }
        }
        Statement::While(n) => {
            v.enter_node(&n.data);
            v.visit_expression(&n.condition);
            v.visit_statement(&n.body);
        }
        Statement::Do(n) => {
            v.enter_node(&n.data);
            v.visit_statement(&n.body);
            v.visit_expression(&n.condition);
        }
        Statement::For(n) => {
            v.enter_node(&n.data);
            for init in n.initializers {
                v.visit_statement(init);
            }
            if let Some(cond) = &n.condition {
                v.visit_expression(cond);
            }
            for update in n.updates {
                v.visit_expression(update);
            }
            v.visit_statement(&n.body);
        }
        Statement::Foreach(n) => {
            v.enter_node(&n.data);
            walk_local(v, n.variable);
            v.visit_expression(&n.iterable);
            v.visit_statement(&n.body);
        }
        Statement::Labeled(n) => {
            v.enter_node(&n.data);
            v.visit_identifier(&n.label);
            v.visit_statement(&n.body);
        }
        Statement::Break(n) | Statement::Continue(n) => {
            v.enter_node(&n.data);
            if let Some(label) = &n.label {
                v.visit_identifier(label);
            }
        }
        Statement::Return(n) => {
            v.enter_node(&n.data);
            if let Some(expr) = &n.expression {
                v.visit_expression(expr);
            }
        }
        Statement::Throw(n) => {
            v.enter_node(&n.data);
            v.visit_expression(&n.expression);
        }
        Statement::Try(n) => {
            v.enter_node(&n.data);
            for resource in n.resources {
                match resource {
                    Resource::Declaration(local) => walk_local(v, local),
                    Resource::Expression(expr) => v.visit_expression(expr),
                }
            }
            v.visit_block(n.block);
            for catch in n.catches {
                v.enter_node(&catch.data);
                v.visit_parameter(catch.parameter);
                v.visit_block(catch.block);
            }
            if let Some(finally) = n.finally {
                v.visit_block(finally);
            }
        }
        Statement::Switch(n) => walk_switch(v, n),
        Statement::Synchronized(n) => {
            v.enter_node(&n.data);
            v.visit_expression(&n.lock);
            v.visit_block(n.block);
        }
        Statement::Assert(n) => {
            v.enter_node(&n.data);
            v.visit_expression(&n.condition);
            if let Some(message) = &n.message {
                v.visit_expression(message);
            }
        }
        Statement::Yield(n) => {
            v.enter_node(&n.data);
            v.visit_expression(&n.expression);
        }
        Statement::Empty(n) => v.enter_node(&n.data),
        Statement::ExplicitConstructorCall(n) => {
            v.enter_node(&n.data);
            if let Some(qualifier) = &n.qualifier {
                v.visit_expression(qualifier);
            }
            for ty in n.type_arguments {
                v.visit_type_ref(ty);
            }
            for arg in n.arguments {
                v.visit_expression(arg);
            }
        }
        Statement::Assist(n) => v.visit_assist(n),
    }
}

pub fn walk_expression<'a, V: AstVisitor<'a> + ?Sized>(v: &mut V, expr: &Expression<'a>) {
    match expr {
        Expression::Literal(n) => v.enter_node(&n.data),
        Expression::Name(n) => {
            v.enter_node(&n.data);
            walk_name(v, &n.name);
        }
        Expression::This(n) | Expression::Super(n) => {
            v.enter_node(&n.data);
            if let Some(qualifier) = &n.qualifier {
                walk_name(v, qualifier);
            }
        }
        Expression::FieldAccess(n) => {
            v.enter_node(&n.data);
            v.visit_expression(&n.receiver);
            v.visit_identifier(&n.name);
        }
        Expression::MessageSend(n) => {
            v.enter_node(&n.data);
            if let Some(receiver) = &n.receiver {
                v.visit_expression(receiver);
            }
            for ty in n.type_arguments {
                v.visit_type_ref(ty);
            }
            v.visit_identifier(&n.selector);
            for arg in n.arguments {
                v.visit_expression(arg);
            }
        }
        Expression::Allocation(n) => {
            v.enter_node(&n.data);
            if let Some(outer) = &n.outer {
                v.visit_expression(outer);
            }
            for ty in n.type_arguments {
                v.visit_type_ref(ty);
            }
            v.visit_type_ref(&n.ty);
            for arg in n.arguments {
                v.visit_expression(arg);
            }
            if let Some(body) = n.body {
                walk_members(v, body);
            }
        }
        Expression::ArrayAllocation(n) => {
            v.enter_node(&n.data);
            v.visit_type_ref(&n.element);
            for dim in n.dimensions.iter().flatten() {
                v.visit_expression(dim);
            }
            if let Some(init) = n.initializer {
                v.visit_expression(&Expression::ArrayInitializer(init));
            }
        }
        Expression::ArrayInitializer(n) => {
            v.enter_node(&n.data);
            for element in n.elements {
                v.visit_expression(element);
            }
        }
        Expression::ArrayAccess(n) => {
            v.enter_node(&n.data);
            v.visit_expression(&n.receiver);
            v.visit_expression(&n.index);
        }
        Expression::ClassLiteral(n) => {
            v.enter_node(&n.data);
            v.visit_type_ref(&n.ty);
        }
        Expression::Cast(n) => {
            v.enter_node(&n.data);
            v.visit_type_ref(&n.ty);
            v.visit_expression(&n.expression);
        }
        Expression::InstanceOf(n) => {
            v.enter_node(&n.data);
            v.visit_expression(&n.expression);
            v.visit_type_ref(&n.ty);
            if let Some(binding) = &n.binding {
                v.visit_identifier(binding);
            }
        }
        Expression::Prefix(n) | Expression::Postfix(n) => {
            v.enter_node(&n.data);
            v.visit_expression(&n.operand);
        }
        Expression::Binary(n) => {
            v.enter_node(&n.data);
            v.visit_expression(&n.left);
            v.visit_expression(&n.right);
        }
        Expression::Conditional(n) => {
            v.enter_node(&n.data);
            v.visit_expression(&n.condition);
            v.visit_expression(&n.when_true);
            v.visit_expression(&n.when_false);
        }
        Expression::Assignment(n) => {
            v.enter_node(&n.data);
            v.visit_expression(&n.target);
            v.visit_expression(&n.value);
        }
        Expression::Lambda(n) => {
            v.enter_node(&n.data);
            for param in n.parameters {
                v.visit_parameter(param);
            }
            match &n.body {
                LambdaBody::Expression(expr) => v.visit_expression(expr),
                LambdaBody::Block(block) => v.visit_block(block),
            }
        }
        Expression::MethodReference(n) => {
            v.enter_node(&n.data);
            match &n.target {
                ReferenceTarget::Expression(expr) => v.visit_expression(expr),
                ReferenceTarget::Type(ty) => v.visit_type_ref(ty),
            }
            for ty in n.type_arguments {
                v.visit_type_ref(ty);
            }
            v.visit_identifier(&n.name);
        }
        Expression::Switch(n) => walk_switch(v, n),
        Expression::Parenthesized(n) => {
            v.enter_node(&n.data);
            v.visit_expression(&n.expression);
        }
        Expression::Annotation(n) => v.visit_annotation(n),
        Expression::Assist(n) => v.visit_assist(n),
    }
}

pub fn walk_assist<'a, V: AstVisitor<'a> + ?Sized>(v: &mut V, node: &AssistNode<'a>) {
    v.enter_node(&node.data);
    if let Some(receiver) = &node.receiver {
        v.visit_expression(receiver);
    }
    if let Some(ty) = &node.ty {
        v.visit_type_ref(ty);
    }
    for arg in node.arguments {
        v.visit_expression(arg);
    }
}

/// Collects `(kind, range)` of every node in visiting order. Two trees with
/// equal shapes produce equal lists.
#[derive(Debug, Default)]
pub struct ShapeCollector {
    pub nodes: Vec<(crate::SyntaxKind, javelin_core::TextRange)>,
}

impl<'a> AstVisitor<'a> for ShapeCollector {
    fn enter_node(&mut self, data: &NodeData) {
        self.nodes.push((data.kind, data.range));
    }
}

/// The shape of a compilation unit, for structural comparisons.
pub fn tree_shape(unit: &CompilationUnit<'_>) -> Vec<(crate::SyntaxKind, javelin_core::TextRange)> {
    let mut collector = ShapeCollector::default();
    collector.visit_compilation_unit(unit);
    collector.nodes
}
