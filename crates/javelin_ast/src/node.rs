//! AST node definitions for Java compilation units.
//!
//! Nodes live in a bump arena and refer to their children by `&'a`
//! reference, so every category enum is `Copy`. There are no parent links;
//! code that needs the enclosing node keeps its own ancestor stack.

use crate::syntax_kind::SyntaxKind;
use crate::types::*;
use javelin_core::intern::InternedString;
use javelin_core::text::TextRange;
use std::cell::Cell;

// ============================================================================
// Core Node Wrapper
// ============================================================================

/// Common data shared by all AST nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeData {
    pub kind: SyntaxKind,
    pub range: TextRange,
    pub flags: NodeFlags,
}

impl NodeData {
    pub fn new(kind: SyntaxKind, pos: u32, end: u32) -> Self {
        Self {
            kind,
            range: TextRange::new(pos, end),
            flags: NodeFlags::NONE,
        }
    }

    /// A zero-width placeholder for an absent construct.
    pub fn missing(kind: SyntaxKind, pos: u32) -> Self {
        Self {
            kind,
            range: TextRange::empty(pos),
            flags: NodeFlags::MISSING,
        }
    }

    pub fn with_flags(mut self, flags: NodeFlags) -> Self {
        self.flags |= flags;
        self
    }

    #[inline]
    pub fn is_missing(&self) -> bool {
        self.flags.contains(NodeFlags::MISSING)
    }

    #[inline]
    pub fn source_start(&self) -> i64 {
        self.range.source_start()
    }

    #[inline]
    pub fn source_end(&self) -> i64 {
        self.range.source_end()
    }
}

/// Access to the common node data of any node.
pub trait HasNodeData {
    fn data(&self) -> &NodeData;

    fn kind(&self) -> SyntaxKind {
        self.data().kind
    }

    fn range(&self) -> TextRange {
        self.data().range
    }
}

macro_rules! impl_has_node_data {
    ($($ty:ident),* $(,)?) => {
        $(
            impl HasNodeData for $ty<'_> {
                #[inline]
                fn data(&self) -> &NodeData {
                    &self.data
                }
            }
        )*
    };
}

/// A list of nodes, allocated in the arena.
pub type NodeList<'a, T> = &'a [T];

// ============================================================================
// Names
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct Identifier<'a> {
    pub data: NodeData,
    pub name: InternedString,
    /// The identifier as written, with unicode escapes translated.
    pub text: &'a str,
}

impl Identifier<'_> {
    #[inline]
    pub fn is_missing(&self) -> bool {
        self.data.is_missing()
    }
}

/// A simple or qualified name such as `java.util.List`.
#[derive(Debug, Clone, Copy)]
pub struct Name<'a> {
    pub data: NodeData,
    pub segments: NodeList<'a, Identifier<'a>>,
}

impl<'a> Name<'a> {
    pub fn is_qualified(&self) -> bool {
        self.segments.len() > 1
    }

    pub fn last(&self) -> Option<&Identifier<'a>> {
        self.segments.last()
    }

    /// The dotted spelling of the name.
    pub fn dotted(&self) -> String {
        join_segments(self.segments)
    }
}

pub fn join_segments(segments: &[Identifier<'_>]) -> String {
    let mut out = String::new();
    for (i, segment) in segments.iter().enumerate() {
        if i > 0 {
            out.push('.');
        }
        out.push_str(segment.text);
    }
    out
}

// ============================================================================
// Compilation Unit
// ============================================================================

#[derive(Debug)]
pub struct CompilationUnit<'a> {
    pub data: NodeData,
    pub package: Option<&'a PackageDeclaration<'a>>,
    pub imports: NodeList<'a, ImportDeclaration<'a>>,
    pub types: NodeList<'a, &'a TypeDeclaration<'a>>,
    pub file_name: &'a str,
    pub text: &'a str,
}

#[derive(Debug)]
pub struct PackageDeclaration<'a> {
    pub data: NodeData,
    pub annotations: NodeList<'a, Annotation<'a>>,
    pub name: Name<'a>,
    /// Set when the name was replaced by a completion or selection node.
    pub assist: Option<&'a AssistNode<'a>>,
}

#[derive(Debug)]
pub struct ImportDeclaration<'a> {
    /// `STATIC` and `ON_DEMAND` flags describe the import form.
    pub data: NodeData,
    pub name: Name<'a>,
    pub assist: Option<&'a AssistNode<'a>>,
}

impl ImportDeclaration<'_> {
    pub fn is_static(&self) -> bool {
        self.data.flags.contains(NodeFlags::STATIC)
    }

    pub fn is_on_demand(&self) -> bool {
        self.data.flags.contains(NodeFlags::ON_DEMAND)
    }
}

// ============================================================================
// Declarations
// ============================================================================

/// Modifier keywords and annotations in front of a declaration.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModifierList<'a> {
    pub range: TextRange,
    pub flags: Modifiers,
    pub annotations: NodeList<'a, Annotation<'a>>,
}

impl ModifierList<'_> {
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty() && self.annotations.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
}

impl TypeKind {
    pub fn syntax_kind(self) -> SyntaxKind {
        match self {
            TypeKind::Class => SyntaxKind::ClassDeclaration,
            TypeKind::Interface => SyntaxKind::InterfaceDeclaration,
            TypeKind::Enum => SyntaxKind::EnumDeclaration,
            TypeKind::Record => SyntaxKind::RecordDeclaration,
            TypeKind::Annotation => SyntaxKind::AnnotationTypeDeclaration,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Interface => "interface",
            TypeKind::Enum => "enum",
            TypeKind::Record => "record",
            TypeKind::Annotation => "@interface",
        }
    }
}

/// A class, interface, enum, record or annotation type, at top level, as a
/// member or as a local declaration.
#[derive(Debug)]
pub struct TypeDeclaration<'a> {
    pub data: NodeData,
    pub type_kind: TypeKind,
    pub modifiers: ModifierList<'a>,
    pub name: Identifier<'a>,
    pub type_parameters: NodeList<'a, TypeParameter<'a>>,
    pub record_components: NodeList<'a, Parameter<'a>>,
    /// Superclass for classes, superinterfaces for interfaces.
    pub extends: NodeList<'a, TypeRef<'a>>,
    pub implements: NodeList<'a, TypeRef<'a>>,
    pub permits: NodeList<'a, TypeRef<'a>>,
    pub enum_constants: NodeList<'a, EnumConstant<'a>>,
    pub members: NodeList<'a, Member<'a>>,
    /// From `{` to `}` inclusive. Empty when the body is missing.
    pub body_range: TextRange,
}

#[derive(Debug, Clone, Copy)]
pub enum Member<'a> {
    Field(&'a FieldDeclaration<'a>),
    Method(&'a MethodDeclaration<'a>),
    Initializer(&'a Initializer<'a>),
    Type(&'a TypeDeclaration<'a>),
}

#[derive(Debug)]
pub struct FieldDeclaration<'a> {
    pub data: NodeData,
    pub modifiers: ModifierList<'a>,
    pub ty: TypeRef<'a>,
    pub declarators: NodeList<'a, VariableDeclarator<'a>>,
}

#[derive(Debug)]
pub struct VariableDeclarator<'a> {
    pub data: NodeData,
    pub name: Identifier<'a>,
    /// Brackets written after the name, as in `int a[]`.
    pub extra_dims: u8,
    pub initializer: Option<Expression<'a>>,
}

/// The body of a method, constructor or initializer. Diet parsing leaves
/// `Deferred` bodies that a later pass replaces with `Parsed` in place.
#[derive(Debug, Clone, Copy)]
pub enum MethodBody<'a> {
    /// `;` in place of a body (abstract, native, interface methods).
    None,
    /// Skipped by diet parsing. The range spans the braces.
    Deferred(TextRange),
    Parsed(&'a Block<'a>),
}

impl<'a> MethodBody<'a> {
    pub fn block(self) -> Option<&'a Block<'a>> {
        match self {
            MethodBody::Parsed(block) => Some(block),
            _ => None,
        }
    }

    pub fn deferred_range(self) -> Option<TextRange> {
        match self {
            MethodBody::Deferred(range) => Some(range),
            _ => None,
        }
    }
}

/// Methods, constructors and annotation type elements. `data.kind` tells
/// them apart.
#[derive(Debug)]
pub struct MethodDeclaration<'a> {
    pub data: NodeData,
    pub modifiers: ModifierList<'a>,
    pub type_parameters: NodeList<'a, TypeParameter<'a>>,
    /// `None` for constructors.
    pub return_type: Option<TypeRef<'a>>,
    pub name: Identifier<'a>,
    pub parameters: NodeList<'a, Parameter<'a>>,
    pub extra_dims: u8,
    pub throws: NodeList<'a, TypeRef<'a>>,
    /// `default` value of an annotation type element.
    pub default_value: Option<Expression<'a>>,
    pub body: Cell<MethodBody<'a>>,
}

impl<'a> MethodDeclaration<'a> {
    pub fn is_constructor(&self) -> bool {
        self.data.kind == SyntaxKind::ConstructorDeclaration
    }

    pub fn body(&self) -> MethodBody<'a> {
        self.body.get()
    }
}

#[derive(Debug)]
pub struct Initializer<'a> {
    /// `STATIC` flag for `static { }`.
    pub data: NodeData,
    pub modifiers: ModifierList<'a>,
    pub body: Cell<MethodBody<'a>>,
}

impl<'a> Initializer<'a> {
    pub fn is_static(&self) -> bool {
        self.data.flags.contains(NodeFlags::STATIC)
    }

    pub fn body(&self) -> MethodBody<'a> {
        self.body.get()
    }
}

/// Formal parameter of a method, constructor, lambda or catch clause, and
/// record component.
#[derive(Debug)]
pub struct Parameter<'a> {
    pub data: NodeData,
    pub modifiers: ModifierList<'a>,
    /// `None` for lambda parameters without a declared type.
    pub ty: Option<TypeRef<'a>>,
    pub name: Identifier<'a>,
    pub extra_dims: u8,
}

impl Parameter<'_> {
    pub fn is_varargs(&self) -> bool {
        self.data.flags.contains(NodeFlags::VARARGS)
    }
}

#[derive(Debug)]
pub struct EnumConstant<'a> {
    pub data: NodeData,
    pub annotations: NodeList<'a, Annotation<'a>>,
    pub name: Identifier<'a>,
    pub arguments: Option<NodeList<'a, Expression<'a>>>,
    /// Class body of a constant with its own members.
    pub body: Option<NodeList<'a, Member<'a>>>,
}

#[derive(Debug)]
pub struct TypeParameter<'a> {
    pub data: NodeData,
    pub annotations: NodeList<'a, Annotation<'a>>,
    pub name: Identifier<'a>,
    pub bounds: NodeList<'a, TypeRef<'a>>,
}

#[derive(Debug)]
pub struct Annotation<'a> {
    pub data: NodeData,
    pub type_ref: TypeRef<'a>,
    pub args: AnnotationArgs<'a>,
}

#[derive(Debug, Clone, Copy)]
pub enum AnnotationArgs<'a> {
    /// `@Marker`
    Marker,
    /// `@Single(value)`
    Single(Expression<'a>),
    /// `@Normal(a = 1, b = 2)`
    Pairs(NodeList<'a, MemberValuePair<'a>>),
}

#[derive(Debug)]
pub struct MemberValuePair<'a> {
    pub data: NodeData,
    pub name: Identifier<'a>,
    pub value: Expression<'a>,
}

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub enum TypeRef<'a> {
    Primitive(&'a PrimitiveType),
    Class(&'a ClassType<'a>),
    Array(&'a ArrayType<'a>),
    Wildcard(&'a WildcardType<'a>),
    /// `A | B` in a multi-catch.
    Union(&'a CompoundType<'a>),
    /// `A & B` in bounds and casts.
    Intersection(&'a CompoundType<'a>),
    Assist(&'a AssistNode<'a>),
}

/// A primitive type or `void`.
#[derive(Debug)]
pub struct PrimitiveType {
    pub data: NodeData,
    pub keyword: SyntaxKind,
}

/// A possibly qualified, possibly parameterized reference type such as
/// `Map.Entry<K, V>`.
#[derive(Debug)]
pub struct ClassType<'a> {
    pub data: NodeData,
    pub annotations: NodeList<'a, Annotation<'a>>,
    pub segments: NodeList<'a, TypeSegment<'a>>,
}

impl<'a> ClassType<'a> {
    pub fn simple_name(&self) -> Option<&Identifier<'a>> {
        self.segments.last().map(|s| &s.name)
    }

    pub fn dotted(&self) -> String {
        let names: Vec<_> = self.segments.iter().map(|s| s.name).collect();
        join_segments(&names)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TypeSegment<'a> {
    pub name: Identifier<'a>,
    /// `Some(&[])` is the diamond `<>`.
    pub type_arguments: Option<NodeList<'a, TypeRef<'a>>>,
}

#[derive(Debug)]
pub struct ArrayType<'a> {
    pub data: NodeData,
    pub element: TypeRef<'a>,
    pub dims: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WildcardBound {
    Unbounded,
    Extends,
    Super,
}

#[derive(Debug)]
pub struct WildcardType<'a> {
    pub data: NodeData,
    pub bound_kind: WildcardBound,
    pub bound: Option<TypeRef<'a>>,
}

#[derive(Debug)]
pub struct CompoundType<'a> {
    pub data: NodeData,
    pub types: NodeList<'a, TypeRef<'a>>,
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub enum Statement<'a> {
    Block(&'a Block<'a>),
    LocalVariable(&'a LocalVariableDeclaration<'a>),
    LocalType(&'a TypeDeclaration<'a>),
    Expression(&'a ExpressionStatement<'a>),
    If(&'a IfStatement<'a>),
    While(&'a WhileStatement<'a>),
    Do(&'a DoStatement<'a>),
    For(&'a ForStatement<'a>),
    Foreach(&'a ForeachStatement<'a>),
    Labeled(&'a LabeledStatement<'a>),
    Break(&'a JumpStatement<'a>),
    Continue(&'a JumpStatement<'a>),
    Return(&'a ReturnStatement<'a>),
    Throw(&'a ThrowStatement<'a>),
    Try(&'a TryStatement<'a>),
    Switch(&'a SwitchBlock<'a>),
    Synchronized(&'a SynchronizedStatement<'a>),
    Assert(&'a AssertStatement<'a>),
    Yield(&'a YieldStatement<'a>),
    Empty(&'a EmptyStatement),
    ExplicitConstructorCall(&'a ExplicitConstructorCall<'a>),
    Assist(&'a AssistNode<'a>),
}

#[derive(Debug)]
pub struct Block<'a> {
    pub data: NodeData,
    pub statements: NodeList<'a, Statement<'a>>,
}

#[derive(Debug)]
pub struct LocalVariableDeclaration<'a> {
    pub data: NodeData,
    pub modifiers: ModifierList<'a>,
    pub ty: TypeRef<'a>,
    pub declarators: NodeList<'a, VariableDeclarator<'a>>,
}

#[derive(Debug)]
pub struct ExpressionStatement<'a> {
    pub data: NodeData,
    pub expression: Expression<'a>,
}

#[derive(Debug)]
pub struct IfStatement<'a> {
    pub data: NodeData,
    pub condition: Expression<'a>,
    pub then_statement: Statement<'a>,
    pub else_statement: Option<Statement<'a>>,
}

#[derive(Debug)]
pub struct WhileStatement<'a> {
    pub data: NodeData,
    pub condition: Expression<'a>,
    pub body: Statement<'a>,
}

#[derive(Debug)]
pub struct DoStatement<'a> {
    pub data: NodeData,
    pub body: Statement<'a>,
    pub condition: Expression<'a>,
}

#[derive(Debug)]
pub struct ForStatement<'a> {
    pub data: NodeData,
    pub initializers: NodeList<'a, Statement<'a>>,
    pub condition: Option<Expression<'a>>,
    pub updates: NodeList<'a, Expression<'a>>,
    pub body: Statement<'a>,
}

#[derive(Debug)]
pub struct ForeachStatement<'a> {
    pub data: NodeData,
    pub variable: &'a LocalVariableDeclaration<'a>,
    pub iterable: Expression<'a>,
    pub body: Statement<'a>,
}

#[derive(Debug)]
pub struct LabeledStatement<'a> {
    pub data: NodeData,
    pub label: Identifier<'a>,
    pub body: Statement<'a>,
}

/// `break` or `continue`.
#[derive(Debug)]
pub struct JumpStatement<'a> {
    pub data: NodeData,
    pub label: Option<Identifier<'a>>,
}

#[derive(Debug)]
pub struct ReturnStatement<'a> {
    pub data: NodeData,
    pub expression: Option<Expression<'a>>,
}

#[derive(Debug)]
pub struct ThrowStatement<'a> {
    pub data: NodeData,
    pub expression: Expression<'a>,
}

#[derive(Debug)]
pub struct TryStatement<'a> {
    pub data: NodeData,
    pub resources: NodeList<'a, Resource<'a>>,
    pub block: &'a Block<'a>,
    pub catches: NodeList<'a, CatchClause<'a>>,
    pub finally: Option<&'a Block<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub enum Resource<'a> {
    Declaration(&'a LocalVariableDeclaration<'a>),
    /// A variable or field access naming an effectively final resource.
    Expression(Expression<'a>),
}

#[derive(Debug)]
pub struct CatchClause<'a> {
    pub data: NodeData,
    pub parameter: &'a Parameter<'a>,
    pub block: &'a Block<'a>,
}

/// A switch statement or switch expression; `data.kind` tells which.
#[derive(Debug)]
pub struct SwitchBlock<'a> {
    pub data: NodeData,
    pub selector: Expression<'a>,
    pub cases: NodeList<'a, SwitchCase<'a>>,
}

#[derive(Debug)]
pub struct SwitchCase<'a> {
    /// `ARROW_CASE` for `case X ->`.
    pub data: NodeData,
    /// Empty for `default`.
    pub labels: NodeList<'a, Expression<'a>>,
    pub is_default: bool,
    pub body: NodeList<'a, Statement<'a>>,
}

#[derive(Debug)]
pub struct SynchronizedStatement<'a> {
    pub data: NodeData,
    pub lock: Expression<'a>,
    pub block: &'a Block<'a>,
}

#[derive(Debug)]
pub struct AssertStatement<'a> {
    pub data: NodeData,
    pub condition: Expression<'a>,
    pub message: Option<Expression<'a>>,
}

#[derive(Debug)]
pub struct YieldStatement<'a> {
    pub data: NodeData,
    pub expression: Expression<'a>,
}

#[derive(Debug)]
pub struct EmptyStatement {
    pub data: NodeData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructorCallKind {
    This,
    Super,
}

/// `this(...)`, `super(...)` or `outer.super(...)` at the start of a
/// constructor body.
#[derive(Debug)]
pub struct ExplicitConstructorCall<'a> {
    pub data: NodeData,
    pub call_kind: ConstructorCallKind,
    pub qualifier: Option<Expression<'a>>,
    pub type_arguments: NodeList<'a, TypeRef<'a>>,
    pub arguments: NodeList<'a, Expression<'a>>,
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub enum Expression<'a> {
    Literal(&'a Literal<'a>),
    Name(&'a NameReference<'a>),
    This(&'a ThisReference<'a>),
    /// `super` or `Outer.super`, only as the receiver of a field access,
    /// method invocation or method reference.
    Super(&'a ThisReference<'a>),
    FieldAccess(&'a FieldAccess<'a>),
    MessageSend(&'a MessageSend<'a>),
    Allocation(&'a Allocation<'a>),
    ArrayAllocation(&'a ArrayAllocation<'a>),
    ArrayInitializer(&'a ArrayInitializer<'a>),
    ArrayAccess(&'a ArrayAccess<'a>),
    ClassLiteral(&'a ClassLiteralAccess<'a>),
    Cast(&'a CastExpression<'a>),
    InstanceOf(&'a InstanceOfExpression<'a>),
    Prefix(&'a UnaryExpression<'a>),
    Postfix(&'a UnaryExpression<'a>),
    Binary(&'a BinaryExpression<'a>),
    Conditional(&'a ConditionalExpression<'a>),
    Assignment(&'a Assignment<'a>),
    Lambda(&'a LambdaExpression<'a>),
    MethodReference(&'a MethodReference<'a>),
    Switch(&'a SwitchBlock<'a>),
    Parenthesized(&'a ParenthesizedExpression<'a>),
    /// A nested annotation used as an annotation element value.
    Annotation(&'a Annotation<'a>),
    Assist(&'a AssistNode<'a>),
}

#[derive(Debug)]
pub struct Literal<'a> {
    /// `MALFORMED` when the literal did not scan cleanly.
    pub data: NodeData,
    /// The literal token kind, or `TrueKeyword`/`FalseKeyword`/`NullKeyword`.
    pub token: SyntaxKind,
    /// The literal as written.
    pub raw: &'a str,
    /// Decoded contents of string, character and text block literals.
    pub value: Option<&'a str>,
}

/// A simple or qualified name in expression position. Whether `a.b` is a
/// package, type, variable or field is left to semantic analysis.
#[derive(Debug)]
pub struct NameReference<'a> {
    pub data: NodeData,
    pub name: Name<'a>,
}

#[derive(Debug)]
pub struct ThisReference<'a> {
    pub data: NodeData,
    /// `Outer` in `Outer.this` / `Outer.super`.
    pub qualifier: Option<Name<'a>>,
}

#[derive(Debug)]
pub struct FieldAccess<'a> {
    pub data: NodeData,
    pub receiver: Expression<'a>,
    pub name: Identifier<'a>,
}

#[derive(Debug)]
pub struct MessageSend<'a> {
    pub data: NodeData,
    pub receiver: Option<Expression<'a>>,
    pub type_arguments: NodeList<'a, TypeRef<'a>>,
    pub selector: Identifier<'a>,
    pub arguments: NodeList<'a, Expression<'a>>,
}

#[derive(Debug)]
pub struct Allocation<'a> {
    pub data: NodeData,
    /// `outer` in `outer.new Inner()`.
    pub outer: Option<Expression<'a>>,
    pub type_arguments: NodeList<'a, TypeRef<'a>>,
    pub ty: TypeRef<'a>,
    pub arguments: NodeList<'a, Expression<'a>>,
    /// Members of an anonymous class body.
    pub body: Option<NodeList<'a, Member<'a>>>,
}

#[derive(Debug)]
pub struct ArrayAllocation<'a> {
    pub data: NodeData,
    pub element: TypeRef<'a>,
    /// One entry per bracket pair; `None` for `[]` without a size.
    pub dimensions: NodeList<'a, Option<Expression<'a>>>,
    pub initializer: Option<&'a ArrayInitializer<'a>>,
}

#[derive(Debug)]
pub struct ArrayInitializer<'a> {
    pub data: NodeData,
    pub elements: NodeList<'a, Expression<'a>>,
}

#[derive(Debug)]
pub struct ArrayAccess<'a> {
    pub data: NodeData,
    pub receiver: Expression<'a>,
    pub index: Expression<'a>,
}

#[derive(Debug)]
pub struct ClassLiteralAccess<'a> {
    pub data: NodeData,
    pub ty: TypeRef<'a>,
}

#[derive(Debug)]
pub struct CastExpression<'a> {
    pub data: NodeData,
    pub ty: TypeRef<'a>,
    pub expression: Expression<'a>,
}

#[derive(Debug)]
pub struct InstanceOfExpression<'a> {
    pub data: NodeData,
    pub expression: Expression<'a>,
    pub ty: TypeRef<'a>,
    /// Pattern variable of `x instanceof String s`.
    pub binding: Option<Identifier<'a>>,
}

/// Prefix (`-x`, `!x`, `++x`) and postfix (`x++`) operators.
#[derive(Debug)]
pub struct UnaryExpression<'a> {
    pub data: NodeData,
    pub operator: SyntaxKind,
    pub operand: Expression<'a>,
}

#[derive(Debug)]
pub struct BinaryExpression<'a> {
    pub data: NodeData,
    pub left: Expression<'a>,
    pub operator: SyntaxKind,
    pub right: Expression<'a>,
}

#[derive(Debug)]
pub struct ConditionalExpression<'a> {
    pub data: NodeData,
    pub condition: Expression<'a>,
    pub when_true: Expression<'a>,
    pub when_false: Expression<'a>,
}

#[derive(Debug)]
pub struct Assignment<'a> {
    pub data: NodeData,
    pub target: Expression<'a>,
    pub operator: SyntaxKind,
    pub value: Expression<'a>,
}

#[derive(Debug)]
pub struct LambdaExpression<'a> {
    pub data: NodeData,
    pub parameters: NodeList<'a, Parameter<'a>>,
    /// Whether the parameters were written inside parentheses.
    pub parenthesized: bool,
    pub body: LambdaBody<'a>,
}

#[derive(Debug, Clone, Copy)]
pub enum LambdaBody<'a> {
    Expression(Expression<'a>),
    Block(&'a Block<'a>),
}

#[derive(Debug)]
pub struct MethodReference<'a> {
    pub data: NodeData,
    pub target: ReferenceTarget<'a>,
    pub type_arguments: NodeList<'a, TypeRef<'a>>,
    /// The method name; `new` for constructor references.
    pub name: Identifier<'a>,
}

#[derive(Debug, Clone, Copy)]
pub enum ReferenceTarget<'a> {
    Expression(Expression<'a>),
    Type(TypeRef<'a>),
}

#[derive(Debug)]
pub struct ParenthesizedExpression<'a> {
    pub data: NodeData,
    pub expression: Expression<'a>,
}

// ============================================================================
// Assist nodes
// ============================================================================

/// What a completion or selection node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssistKind {
    CompleteOnName,
    CompleteOnQualifiedName,
    CompleteOnMemberAccess,
    CompleteOnMessageSend,
    CompleteOnMessageSendName,
    CompleteOnType,
    CompleteOnQualifiedType,
    CompleteOnException,
    CompleteOnAnnotation,
    CompleteOnAllocation,
    CompleteOnExplicitConstructorCall,
    CompleteOnClassLiteralAccess,
    CompleteOnImport,
    CompleteOnPackage,
    CompleteOnLabel,
    CompleteOnFieldName,
    CompleteOnLocalName,
    CompleteOnArgumentName,

    SelectOnName,
    SelectOnQualifiedName,
    SelectOnFieldReference,
    SelectOnMessageSend,
    SelectOnType,
    SelectOnQualifiedType,
    SelectOnAllocation,
    SelectOnExplicitConstructorCall,
    SelectOnImport,
    SelectOnPackage,
    SelectOnTypeDeclaration,
    SelectOnMethodDeclaration,
    SelectOnFieldDeclaration,
    SelectOnLocalDeclaration,
    SelectOnParameter,
}

impl AssistKind {
    pub fn is_completion(self) -> bool {
        (self as u8) <= AssistKind::CompleteOnArgumentName as u8
    }

    pub fn is_selection(self) -> bool {
        !self.is_completion()
    }

    pub fn label(self) -> &'static str {
        match self {
            AssistKind::CompleteOnName => "CompleteOnName",
            AssistKind::CompleteOnQualifiedName => "CompleteOnQualifiedName",
            AssistKind::CompleteOnMemberAccess => "CompleteOnMemberAccess",
            AssistKind::CompleteOnMessageSend => "CompleteOnMessageSend",
            AssistKind::CompleteOnMessageSendName => "CompleteOnMessageSendName",
            AssistKind::CompleteOnType => "CompleteOnType",
            AssistKind::CompleteOnQualifiedType => "CompleteOnQualifiedType",
            AssistKind::CompleteOnException => "CompleteOnException",
            AssistKind::CompleteOnAnnotation => "CompleteOnAnnotation",
            AssistKind::CompleteOnAllocation => "CompleteOnAllocation",
            AssistKind::CompleteOnExplicitConstructorCall => "CompleteOnExplicitConstructorCall",
            AssistKind::CompleteOnClassLiteralAccess => "CompleteOnClassLiteralAccess",
            AssistKind::CompleteOnImport => "CompleteOnImport",
            AssistKind::CompleteOnPackage => "CompleteOnPackage",
            AssistKind::CompleteOnLabel => "CompleteOnLabel",
            AssistKind::CompleteOnFieldName => "CompleteOnFieldName",
            AssistKind::CompleteOnLocalName => "CompleteOnLocalName",
            AssistKind::CompleteOnArgumentName => "CompleteOnArgumentName",
            AssistKind::SelectOnName => "SelectOnName",
            AssistKind::SelectOnQualifiedName => "SelectOnQualifiedName",
            AssistKind::SelectOnFieldReference => "SelectOnFieldReference",
            AssistKind::SelectOnMessageSend => "SelectOnMessageSend",
            AssistKind::SelectOnType => "SelectOnType",
            AssistKind::SelectOnQualifiedType => "SelectOnQualifiedType",
            AssistKind::SelectOnAllocation => "SelectOnAllocation",
            AssistKind::SelectOnExplicitConstructorCall => "SelectOnExplicitConstructorCall",
            AssistKind::SelectOnImport => "SelectOnImport",
            AssistKind::SelectOnPackage => "SelectOnPackage",
            AssistKind::SelectOnTypeDeclaration => "SelectOnTypeDeclaration",
            AssistKind::SelectOnMethodDeclaration => "SelectOnMethodDeclaration",
            AssistKind::SelectOnFieldDeclaration => "SelectOnFieldDeclaration",
            AssistKind::SelectOnLocalDeclaration => "SelectOnLocalDeclaration",
            AssistKind::SelectOnParameter => "SelectOnParameter",
        }
    }
}

impl std::fmt::Display for AssistKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The node built at the cursor in completion or selection mode.
///
/// Which payload fields are set depends on `assist_kind`: member accesses and
/// message sends carry a receiver, qualified names carry the segments before
/// the completed one, allocations and class literals carry a type, message
/// sends carry the arguments written before the cursor.
#[derive(Debug)]
pub struct AssistNode<'a> {
    pub data: NodeData,
    pub assist_kind: AssistKind,
    /// The source range an accepted proposal replaces.
    pub replaced: TextRange,
    /// Characters of the identifier typed before the cursor. Empty for
    /// selection.
    pub prefix: &'a str,
    /// The identifier or keyword the node is about, possibly partial.
    pub name: Option<Identifier<'a>>,
    pub qualifier: NodeList<'a, Identifier<'a>>,
    pub receiver: Option<Expression<'a>>,
    pub ty: Option<TypeRef<'a>>,
    pub type_arguments: NodeList<'a, TypeRef<'a>>,
    pub arguments: NodeList<'a, Expression<'a>>,
}

// ============================================================================
// Node data accessors
// ============================================================================

impl_has_node_data!(
    Identifier, Name, CompilationUnit, PackageDeclaration, ImportDeclaration,
    TypeDeclaration, FieldDeclaration, VariableDeclarator, MethodDeclaration,
    Initializer, Parameter, EnumConstant, TypeParameter, Annotation,
    MemberValuePair, ClassType, ArrayType, WildcardType, CompoundType, Block,
    LocalVariableDeclaration, ExpressionStatement, IfStatement, WhileStatement,
    DoStatement, ForStatement, ForeachStatement, LabeledStatement, JumpStatement,
    ReturnStatement, ThrowStatement, TryStatement, CatchClause, SwitchBlock,
    SwitchCase, SynchronizedStatement, AssertStatement, YieldStatement,
    ExplicitConstructorCall, Literal, NameReference, ThisReference, FieldAccess,
    MessageSend, Allocation, ArrayAllocation, ArrayInitializer, ArrayAccess,
    ClassLiteralAccess, CastExpression, InstanceOfExpression, UnaryExpression,
    BinaryExpression, ConditionalExpression, Assignment, LambdaExpression,
    MethodReference, ParenthesizedExpression, AssistNode,
);

impl HasNodeData for PrimitiveType {
    fn data(&self) -> &NodeData {
        &self.data
    }
}

impl HasNodeData for EmptyStatement {
    fn data(&self) -> &NodeData {
        &self.data
    }
}

impl HasNodeData for Member<'_> {
    fn data(&self) -> &NodeData {
        match self {
            Member::Field(n) => &n.data,
            Member::Method(n) => &n.data,
            Member::Initializer(n) => &n.data,
            Member::Type(n) => &n.data,
        }
    }
}

impl HasNodeData for TypeRef<'_> {
    fn data(&self) -> &NodeData {
        match self {
            TypeRef::Primitive(n) => &n.data,
            TypeRef::Class(n) => &n.data,
            TypeRef::Array(n) => &n.data,
            TypeRef::Wildcard(n) => &n.data,
            TypeRef::Union(n) | TypeRef::Intersection(n) => &n.data,
            TypeRef::Assist(n) => &n.data,
        }
    }
}

impl HasNodeData for Statement<'_> {
    fn data(&self) -> &NodeData {
        match self {
            Statement::Block(n) => &n.data,
            Statement::LocalVariable(n) => &n.data,
            Statement::LocalType(n) => &n.data,
            Statement::Expression(n) => &n.data,
            Statement::If(n) => &n.data,
            Statement::While(n) => &n.data,
            Statement::Do(n) => &n.data,
            Statement::For(n) => &n.data,
            Statement::Foreach(n) => &n.data,
            Statement::Labeled(n) => &n.data,
            Statement::Break(n) | Statement::Continue(n) => &n.data,
            Statement::Return(n) => &n.data,
            Statement::Throw(n) => &n.data,
            Statement::Try(n) => &n.data,
            Statement::Switch(n) => &n.data,
            Statement::Synchronized(n) => &n.data,
            Statement::Assert(n) => &n.data,
            Statement::Yield(n) => &n.data,
            Statement::Empty(n) => &n.data,
            Statement::ExplicitConstructorCall(n) => &n.data,
            Statement::Assist(n) => &n.data,
        }
    }
}

impl HasNodeData for Expression<'_> {
    fn data(&self) -> &NodeData {
        match self {
            Expression::Literal(n) => &n.data,
            Expression::Name(n) => &n.data,
            Expression::This(n) | Expression::Super(n) => &n.data,
            Expression::FieldAccess(n) => &n.data,
            Expression::MessageSend(n) => &n.data,
            Expression::Allocation(n) => &n.data,
            Expression::ArrayAllocation(n) => &n.data,
            Expression::ArrayInitializer(n) => &n.data,
            Expression::ArrayAccess(n) => &n.data,
            Expression::ClassLiteral(n) => &n.data,
            Expression::Cast(n) => &n.data,
            Expression::InstanceOf(n) => &n.data,
            Expression::Prefix(n) | Expression::Postfix(n) => &n.data,
            Expression::Binary(n) => &n.data,
            Expression::Conditional(n) => &n.data,
            Expression::Assignment(n) => &n.data,
            Expression::Lambda(n) => &n.data,
            Expression::MethodReference(n) => &n.data,
            Expression::Switch(n) => &n.data,
            Expression::Parenthesized(n) => &n.data,
            Expression::Annotation(n) => &n.data,
            Expression::Assist(n) => &n.data,
        }
    }
}

impl<'a> Expression<'a> {
    pub fn as_assist(&self) -> Option<&'a AssistNode<'a>> {
        match *self {
            Expression::Assist(node) => Some(node),
            _ => None,
        }
    }

    /// Whether the expression can stand alone as a statement.
    pub fn is_statement_expression(&self) -> bool {
        match self {
            Expression::Assignment(_)
            | Expression::MessageSend(_)
            | Expression::Allocation(_)
            | Expression::Assist(_) => true,
            Expression::Prefix(u) => matches!(
                u.operator,
                SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken
            ),
            Expression::Postfix(_) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_node_data() {
        let data = NodeData::missing(SyntaxKind::Identifier, 7);
        assert!(data.is_missing());
        assert!(data.range.is_empty());
        assert!(data.source_end() < data.source_start());
    }

    #[test]
    fn test_assist_kind_families() {
        assert!(AssistKind::CompleteOnMessageSend.is_completion());
        assert!(AssistKind::CompleteOnArgumentName.is_completion());
        assert!(AssistKind::SelectOnName.is_selection());
        assert!(AssistKind::SelectOnParameter.is_selection());
        assert_eq!(AssistKind::SelectOnMessageSend.to_string(), "SelectOnMessageSend");
    }
}
