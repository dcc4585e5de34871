//! SyntaxKind: every token and node kind of the Java grammar.
//!
//! Token kinds come first and are grouped so that the classification helpers
//! can test ranges. Node kinds follow; they are what `NodeData::kind` and
//! assist parent snapshots report.

/// The kind of a token or of an AST node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum SyntaxKind {
    // ========================================================================
    // Tokens
    // ========================================================================
    Unknown,
    EndOfFileToken,
    /// A character that starts no Java token.
    InvalidToken,

    // Trivia
    SingleLineCommentTrivia,
    MultiLineCommentTrivia,
    JavadocCommentTrivia,
    NewLineTrivia,
    WhitespaceTrivia,

    // Literals
    IntegerLiteral,
    LongLiteral,
    FloatLiteral,
    DoubleLiteral,
    CharacterLiteral,
    StringLiteral,
    TextBlock,

    Identifier,

    // Punctuation
    OpenBraceToken,
    CloseBraceToken,
    OpenParenToken,
    CloseParenToken,
    OpenBracketToken,
    CloseBracketToken,
    SemicolonToken,
    CommaToken,
    DotToken,
    DotDotDotToken,
    AtToken,
    ColonColonToken,
    ArrowToken,
    QuestionToken,
    ColonToken,

    // Operators
    LessThanToken,
    GreaterThanToken,
    LessThanEqualsToken,
    GreaterThanEqualsToken,
    EqualsEqualsToken,
    ExclamationEqualsToken,
    PlusToken,
    MinusToken,
    AsteriskToken,
    SlashToken,
    PercentToken,
    PlusPlusToken,
    MinusMinusToken,
    LessThanLessThanToken,
    GreaterThanGreaterThanToken,
    GreaterThanGreaterThanGreaterThanToken,
    AmpersandToken,
    BarToken,
    CaretToken,
    ExclamationToken,
    TildeToken,
    AmpersandAmpersandToken,
    BarBarToken,

    // Assignment operators
    EqualsToken,
    PlusEqualsToken,
    MinusEqualsToken,
    AsteriskEqualsToken,
    SlashEqualsToken,
    PercentEqualsToken,
    LessThanLessThanEqualsToken,
    GreaterThanGreaterThanEqualsToken,
    GreaterThanGreaterThanGreaterThanEqualsToken,
    AmpersandEqualsToken,
    BarEqualsToken,
    CaretEqualsToken,

    // Reserved words
    AbstractKeyword,
    AssertKeyword,
    BooleanKeyword,
    BreakKeyword,
    ByteKeyword,
    CaseKeyword,
    CatchKeyword,
    CharKeyword,
    ClassKeyword,
    ConstKeyword,
    ContinueKeyword,
    DefaultKeyword,
    DoKeyword,
    DoubleKeyword,
    ElseKeyword,
    EnumKeyword,
    ExtendsKeyword,
    FalseKeyword,
    FinalKeyword,
    FinallyKeyword,
    FloatKeyword,
    ForKeyword,
    GotoKeyword,
    IfKeyword,
    ImplementsKeyword,
    ImportKeyword,
    InstanceofKeyword,
    IntKeyword,
    InterfaceKeyword,
    LongKeyword,
    NativeKeyword,
    NewKeyword,
    NullKeyword,
    PackageKeyword,
    PrivateKeyword,
    ProtectedKeyword,
    PublicKeyword,
    ReturnKeyword,
    ShortKeyword,
    StaticKeyword,
    StrictfpKeyword,
    SuperKeyword,
    SwitchKeyword,
    SynchronizedKeyword,
    ThisKeyword,
    ThrowKeyword,
    ThrowsKeyword,
    TransientKeyword,
    TrueKeyword,
    TryKeyword,
    VoidKeyword,
    VolatileKeyword,
    WhileKeyword,

    // ========================================================================
    // Nodes
    // ========================================================================
    CompilationUnit,
    PackageDeclaration,
    ImportDeclaration,
    Name,

    // Declarations
    ClassDeclaration,
    InterfaceDeclaration,
    EnumDeclaration,
    RecordDeclaration,
    AnnotationTypeDeclaration,
    EnumConstant,
    RecordComponent,
    TypeParameter,
    FieldDeclaration,
    VariableDeclarator,
    MethodDeclaration,
    ConstructorDeclaration,
    AnnotationMethodDeclaration,
    Initializer,
    Parameter,
    Annotation,
    MemberValuePair,

    // Types
    PrimitiveType,
    ClassType,
    ArrayType,
    WildcardType,
    UnionType,
    IntersectionType,

    // Statements
    Block,
    LocalVariableDeclaration,
    LocalTypeDeclaration,
    ExpressionStatement,
    IfStatement,
    WhileStatement,
    DoStatement,
    ForStatement,
    ForeachStatement,
    LabeledStatement,
    BreakStatement,
    ContinueStatement,
    ReturnStatement,
    ThrowStatement,
    TryStatement,
    CatchClause,
    SwitchStatement,
    SwitchCase,
    SynchronizedStatement,
    AssertStatement,
    YieldStatement,
    EmptyStatement,
    ExplicitConstructorCall,

    // Expressions
    Literal,
    NameReference,
    ThisReference,
    QualifiedThisReference,
    FieldAccess,
    SuperFieldAccess,
    MessageSend,
    Allocation,
    ArrayAllocation,
    ArrayInitializer,
    ArrayAccess,
    ClassLiteralAccess,
    CastExpression,
    InstanceOfExpression,
    TypePattern,
    PrefixExpression,
    PostfixExpression,
    BinaryExpression,
    ConditionalExpression,
    Assignment,
    LambdaExpression,
    MethodReference,
    SwitchExpression,
    ParenthesizedExpression,

    /// A node produced at the cursor in completion or selection mode.
    AssistNode,
}

impl SyntaxKind {
    pub const FIRST_LITERAL: SyntaxKind = SyntaxKind::IntegerLiteral;
    pub const LAST_LITERAL: SyntaxKind = SyntaxKind::TextBlock;
    pub const FIRST_PUNCTUATION: SyntaxKind = SyntaxKind::OpenBraceToken;
    pub const LAST_PUNCTUATION: SyntaxKind = SyntaxKind::CaretEqualsToken;
    pub const FIRST_ASSIGNMENT: SyntaxKind = SyntaxKind::EqualsToken;
    pub const LAST_ASSIGNMENT: SyntaxKind = SyntaxKind::CaretEqualsToken;
    pub const FIRST_KEYWORD: SyntaxKind = SyntaxKind::AbstractKeyword;
    pub const LAST_KEYWORD: SyntaxKind = SyntaxKind::WhileKeyword;
    pub const FIRST_NODE: SyntaxKind = SyntaxKind::CompilationUnit;

    #[inline]
    fn between(self, first: SyntaxKind, last: SyntaxKind) -> bool {
        let v = self as u16;
        v >= first as u16 && v <= last as u16
    }

    #[inline]
    pub fn is_keyword(self) -> bool {
        self.between(Self::FIRST_KEYWORD, Self::LAST_KEYWORD)
    }

    #[inline]
    pub fn is_punctuation(self) -> bool {
        self.between(Self::FIRST_PUNCTUATION, Self::LAST_PUNCTUATION)
    }

    #[inline]
    pub fn is_literal(self) -> bool {
        self.between(Self::FIRST_LITERAL, Self::LAST_LITERAL)
    }

    #[inline]
    pub fn is_trivia(self) -> bool {
        self.between(
            SyntaxKind::SingleLineCommentTrivia,
            SyntaxKind::WhitespaceTrivia,
        )
    }

    #[inline]
    pub fn is_token(self) -> bool {
        (self as u16) < Self::FIRST_NODE as u16
    }

    #[inline]
    pub fn is_assignment_operator(self) -> bool {
        self.between(Self::FIRST_ASSIGNMENT, Self::LAST_ASSIGNMENT)
    }

    /// Literal keywords and literal tokens.
    #[inline]
    pub fn is_literal_start(self) -> bool {
        self.is_literal()
            || matches!(
                self,
                SyntaxKind::TrueKeyword | SyntaxKind::FalseKeyword | SyntaxKind::NullKeyword
            )
    }

    #[inline]
    pub fn is_primitive_type(self) -> bool {
        matches!(
            self,
            SyntaxKind::BooleanKeyword
                | SyntaxKind::ByteKeyword
                | SyntaxKind::CharKeyword
                | SyntaxKind::ShortKeyword
                | SyntaxKind::IntKeyword
                | SyntaxKind::LongKeyword
                | SyntaxKind::FloatKeyword
                | SyntaxKind::DoubleKeyword
        )
    }

    /// Keywords that can start a modifier list. `default` only acts as a
    /// modifier inside interfaces, so callers check the context.
    #[inline]
    pub fn is_modifier_keyword(self) -> bool {
        matches!(
            self,
            SyntaxKind::PublicKeyword
                | SyntaxKind::ProtectedKeyword
                | SyntaxKind::PrivateKeyword
                | SyntaxKind::StaticKeyword
                | SyntaxKind::AbstractKeyword
                | SyntaxKind::FinalKeyword
                | SyntaxKind::NativeKeyword
                | SyntaxKind::SynchronizedKeyword
                | SyntaxKind::TransientKeyword
                | SyntaxKind::VolatileKeyword
                | SyntaxKind::StrictfpKeyword
        )
    }

    /// Modifiers that are never legal on a statement. Meeting one inside a
    /// block means the block was left unclosed and a member follows.
    #[inline]
    pub fn is_member_only_modifier(self) -> bool {
        matches!(
            self,
            SyntaxKind::PublicKeyword
                | SyntaxKind::PrivateKeyword
                | SyntaxKind::ProtectedKeyword
                | SyntaxKind::StaticKeyword
                | SyntaxKind::NativeKeyword
                | SyntaxKind::TransientKeyword
                | SyntaxKind::VolatileKeyword
        )
    }

    #[inline]
    pub fn is_open_bracket(self) -> bool {
        matches!(
            self,
            SyntaxKind::OpenBraceToken | SyntaxKind::OpenParenToken | SyntaxKind::OpenBracketToken
        )
    }

    #[inline]
    pub fn is_close_bracket(self) -> bool {
        matches!(
            self,
            SyntaxKind::CloseBraceToken
                | SyntaxKind::CloseParenToken
                | SyntaxKind::CloseBracketToken
        )
    }

    /// The closer matching an opening bracket.
    pub fn matching_closer(self) -> Option<SyntaxKind> {
        match self {
            SyntaxKind::OpenBraceToken => Some(SyntaxKind::CloseBraceToken),
            SyntaxKind::OpenParenToken => Some(SyntaxKind::CloseParenToken),
            SyntaxKind::OpenBracketToken => Some(SyntaxKind::CloseBracketToken),
            _ => None,
        }
    }

    pub fn from_keyword(text: &str) -> Option<SyntaxKind> {
        let kind = match text {
            "abstract" => SyntaxKind::AbstractKeyword,
            "assert" => SyntaxKind::AssertKeyword,
            "boolean" => SyntaxKind::BooleanKeyword,
            "break" => SyntaxKind::BreakKeyword,
            "byte" => SyntaxKind::ByteKeyword,
            "case" => SyntaxKind::CaseKeyword,
            "catch" => SyntaxKind::CatchKeyword,
            "char" => SyntaxKind::CharKeyword,
            "class" => SyntaxKind::ClassKeyword,
            "const" => SyntaxKind::ConstKeyword,
            "continue" => SyntaxKind::ContinueKeyword,
            "default" => SyntaxKind::DefaultKeyword,
            "do" => SyntaxKind::DoKeyword,
            "double" => SyntaxKind::DoubleKeyword,
            "else" => SyntaxKind::ElseKeyword,
            "enum" => SyntaxKind::EnumKeyword,
            "extends" => SyntaxKind::ExtendsKeyword,
            "false" => SyntaxKind::FalseKeyword,
            "final" => SyntaxKind::FinalKeyword,
            "finally" => SyntaxKind::FinallyKeyword,
            "float" => SyntaxKind::FloatKeyword,
            "for" => SyntaxKind::ForKeyword,
            "goto" => SyntaxKind::GotoKeyword,
            "if" => SyntaxKind::IfKeyword,
            "implements" => SyntaxKind::ImplementsKeyword,
            "import" => SyntaxKind::ImportKeyword,
            "instanceof" => SyntaxKind::InstanceofKeyword,
            "int" => SyntaxKind::IntKeyword,
            "interface" => SyntaxKind::InterfaceKeyword,
            "long" => SyntaxKind::LongKeyword,
            "native" => SyntaxKind::NativeKeyword,
            "new" => SyntaxKind::NewKeyword,
            "null" => SyntaxKind::NullKeyword,
            "package" => SyntaxKind::PackageKeyword,
            "private" => SyntaxKind::PrivateKeyword,
            "protected" => SyntaxKind::ProtectedKeyword,
            "public" => SyntaxKind::PublicKeyword,
            "return" => SyntaxKind::ReturnKeyword,
            "short" => SyntaxKind::ShortKeyword,
            "static" => SyntaxKind::StaticKeyword,
            "strictfp" => SyntaxKind::StrictfpKeyword,
            "super" => SyntaxKind::SuperKeyword,
            "switch" => SyntaxKind::SwitchKeyword,
            "synchronized" => SyntaxKind::SynchronizedKeyword,
            "this" => SyntaxKind::ThisKeyword,
            "throw" => SyntaxKind::ThrowKeyword,
            "throws" => SyntaxKind::ThrowsKeyword,
            "transient" => SyntaxKind::TransientKeyword,
            "true" => SyntaxKind::TrueKeyword,
            "try" => SyntaxKind::TryKeyword,
            "void" => SyntaxKind::VoidKeyword,
            "volatile" => SyntaxKind::VolatileKeyword,
            "while" => SyntaxKind::WhileKeyword,
            _ => return None,
        };
        Some(kind)
    }

    pub fn keyword_text(self) -> Option<&'static str> {
        let text = match self {
            SyntaxKind::AbstractKeyword => "abstract",
            SyntaxKind::AssertKeyword => "assert",
            SyntaxKind::BooleanKeyword => "boolean",
            SyntaxKind::BreakKeyword => "break",
            SyntaxKind::ByteKeyword => "byte",
            SyntaxKind::CaseKeyword => "case",
            SyntaxKind::CatchKeyword => "catch",
            SyntaxKind::CharKeyword => "char",
            SyntaxKind::ClassKeyword => "class",
            SyntaxKind::ConstKeyword => "const",
            SyntaxKind::ContinueKeyword => "continue",
            SyntaxKind::DefaultKeyword => "default",
            SyntaxKind::DoKeyword => "do",
            SyntaxKind::DoubleKeyword => "double",
            SyntaxKind::ElseKeyword => "else",
            SyntaxKind::EnumKeyword => "enum",
            SyntaxKind::ExtendsKeyword => "extends",
            SyntaxKind::FalseKeyword => "false",
            SyntaxKind::FinalKeyword => "final",
            SyntaxKind::FinallyKeyword => "finally",
            SyntaxKind::FloatKeyword => "float",
            SyntaxKind::ForKeyword => "for",
            SyntaxKind::GotoKeyword => "goto",
            SyntaxKind::IfKeyword => "if",
            SyntaxKind::ImplementsKeyword => "implements",
            SyntaxKind::ImportKeyword => "import",
            SyntaxKind::InstanceofKeyword => "instanceof",
            SyntaxKind::IntKeyword => "int",
            SyntaxKind::InterfaceKeyword => "interface",
            SyntaxKind::LongKeyword => "long",
            SyntaxKind::NativeKeyword => "native",
            SyntaxKind::NewKeyword => "new",
            SyntaxKind::NullKeyword => "null",
            SyntaxKind::PackageKeyword => "package",
            SyntaxKind::PrivateKeyword => "private",
            SyntaxKind::ProtectedKeyword => "protected",
            SyntaxKind::PublicKeyword => "public",
            SyntaxKind::ReturnKeyword => "return",
            SyntaxKind::ShortKeyword => "short",
            SyntaxKind::StaticKeyword => "static",
            SyntaxKind::StrictfpKeyword => "strictfp",
            SyntaxKind::SuperKeyword => "super",
            SyntaxKind::SwitchKeyword => "switch",
            SyntaxKind::SynchronizedKeyword => "synchronized",
            SyntaxKind::ThisKeyword => "this",
            SyntaxKind::ThrowKeyword => "throw",
            SyntaxKind::ThrowsKeyword => "throws",
            SyntaxKind::TransientKeyword => "transient",
            SyntaxKind::TrueKeyword => "true",
            SyntaxKind::TryKeyword => "try",
            SyntaxKind::VoidKeyword => "void",
            SyntaxKind::VolatileKeyword => "volatile",
            SyntaxKind::WhileKeyword => "while",
            _ => return None,
        };
        Some(text)
    }

    pub fn punctuation_text(self) -> Option<&'static str> {
        let text = match self {
            SyntaxKind::OpenBraceToken => "{",
            SyntaxKind::CloseBraceToken => "}",
            SyntaxKind::OpenParenToken => "(",
            SyntaxKind::CloseParenToken => ")",
            SyntaxKind::OpenBracketToken => "[",
            SyntaxKind::CloseBracketToken => "]",
            SyntaxKind::SemicolonToken => ";",
            SyntaxKind::CommaToken => ",",
            SyntaxKind::DotToken => ".",
            SyntaxKind::DotDotDotToken => "...",
            SyntaxKind::AtToken => "@",
            SyntaxKind::ColonColonToken => "::",
            SyntaxKind::ArrowToken => "->",
            SyntaxKind::QuestionToken => "?",
            SyntaxKind::ColonToken => ":",
            SyntaxKind::LessThanToken => "<",
            SyntaxKind::GreaterThanToken => ">",
            SyntaxKind::LessThanEqualsToken => "<=",
            SyntaxKind::GreaterThanEqualsToken => ">=",
            SyntaxKind::EqualsEqualsToken => "==",
            SyntaxKind::ExclamationEqualsToken => "!=",
            SyntaxKind::PlusToken => "+",
            SyntaxKind::MinusToken => "-",
            SyntaxKind::AsteriskToken => "*",
            SyntaxKind::SlashToken => "/",
            SyntaxKind::PercentToken => "%",
            SyntaxKind::PlusPlusToken => "++",
            SyntaxKind::MinusMinusToken => "--",
            SyntaxKind::LessThanLessThanToken => "<<",
            SyntaxKind::GreaterThanGreaterThanToken => ">>",
            SyntaxKind::GreaterThanGreaterThanGreaterThanToken => ">>>",
            SyntaxKind::AmpersandToken => "&",
            SyntaxKind::BarToken => "|",
            SyntaxKind::CaretToken => "^",
            SyntaxKind::ExclamationToken => "!",
            SyntaxKind::TildeToken => "~",
            SyntaxKind::AmpersandAmpersandToken => "&&",
            SyntaxKind::BarBarToken => "||",
            SyntaxKind::EqualsToken => "=",
            SyntaxKind::PlusEqualsToken => "+=",
            SyntaxKind::MinusEqualsToken => "-=",
            SyntaxKind::AsteriskEqualsToken => "*=",
            SyntaxKind::SlashEqualsToken => "/=",
            SyntaxKind::PercentEqualsToken => "%=",
            SyntaxKind::LessThanLessThanEqualsToken => "<<=",
            SyntaxKind::GreaterThanGreaterThanEqualsToken => ">>=",
            SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken => ">>>=",
            SyntaxKind::AmpersandEqualsToken => "&=",
            SyntaxKind::BarEqualsToken => "|=",
            SyntaxKind::CaretEqualsToken => "^=",
            _ => return None,
        };
        Some(text)
    }

    /// The fixed source text of a keyword or punctuation kind.
    pub fn token_text(self) -> Option<&'static str> {
        self.keyword_text().or_else(|| self.punctuation_text())
    }

    /// How a kind is named in "X expected" diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            SyntaxKind::Identifier => "Identifier",
            SyntaxKind::EndOfFileToken => "EOF",
            _ => self.token_text().unwrap_or("token"),
        }
    }
}

impl std::fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.token_text() {
            Some(text) => f.write_str(text),
            None => write!(f, "{:?}", self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_round_trip() {
        let mut kind = SyntaxKind::FIRST_KEYWORD as u16;
        while kind <= SyntaxKind::LAST_KEYWORD as u16 {
            // Walk the keyword range through the public lookup tables.
            let text = [
                "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char",
                "class", "const", "continue", "default", "do", "double", "else", "enum",
                "extends", "false", "final", "finally", "float", "for", "goto", "if",
                "implements", "import", "instanceof", "int", "interface", "long", "native",
                "new", "null", "package", "private", "protected", "public", "return", "short",
                "static", "strictfp", "super", "switch", "synchronized", "this", "throw",
                "throws", "transient", "true", "try", "void", "volatile", "while",
            ][(kind - SyntaxKind::FIRST_KEYWORD as u16) as usize];
            let parsed = SyntaxKind::from_keyword(text).unwrap();
            assert_eq!(parsed as u16, kind);
            assert_eq!(parsed.keyword_text(), Some(text));
            assert!(parsed.is_keyword());
            kind += 1;
        }
    }

    #[test]
    fn test_contextual_words_are_not_keywords() {
        for word in ["var", "yield", "record", "sealed", "permits", "module"] {
            assert_eq!(SyntaxKind::from_keyword(word), None);
        }
    }

    #[test]
    fn test_classification() {
        assert!(SyntaxKind::PlusEqualsToken.is_assignment_operator());
        assert!(!SyntaxKind::EqualsEqualsToken.is_assignment_operator());
        assert!(SyntaxKind::TextBlock.is_literal());
        assert!(SyntaxKind::NullKeyword.is_literal_start());
        assert!(SyntaxKind::TransientKeyword.is_member_only_modifier());
        assert!(!SyntaxKind::FinalKeyword.is_member_only_modifier());
        assert!(SyntaxKind::WhileKeyword.is_token());
        assert!(!SyntaxKind::Block.is_token());
        assert_eq!(
            SyntaxKind::OpenParenToken.matching_closer(),
            Some(SyntaxKind::CloseParenToken)
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(SyntaxKind::CloseBraceToken.to_string(), "}");
        assert_eq!(SyntaxKind::InstanceofKeyword.to_string(), "instanceof");
        assert_eq!(SyntaxKind::MessageSend.to_string(), "MessageSend");
    }
}
