//! Flag sets carried by tokens and nodes.

use crate::syntax_kind::SyntaxKind;

bitflags::bitflags! {
    /// Per-node flags. The recovery flags let callers tell real code from
    /// scaffolding the parser made up.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NodeFlags: u32 {
        const NONE                  = 0;
        /// Zero-width node standing for an absent construct.
        const MISSING               = 1 << 0;
        /// The node contains synthesized parts (an inserted `}` or `;`).
        const RECOVERED             = 1 << 1;
        /// The node itself was made up by recovery.
        const SYNTHESIZED           = 1 << 2;
        /// Some of the node's source was discarded or could not be parsed.
        const HAS_SYNTAX_ERRORS     = 1 << 3;
        /// A literal whose text did not scan cleanly.
        const MALFORMED             = 1 << 4;
        const HAS_JAVADOC           = 1 << 5;
        /// Variable arity parameter.
        const VARARGS               = 1 << 6;
        /// Record constructor written without a parameter list.
        const COMPACT_CONSTRUCTOR   = 1 << 7;
        /// `new T<>()`.
        const DIAMOND               = 1 << 8;
        /// `static { ... }` initializer or `import static`.
        const STATIC                = 1 << 9;
        /// `import a.b.*`.
        const ON_DEMAND             = 1 << 10;
        /// Lambda parameter without a declared type.
        const INFERRED_TYPE         = 1 << 11;
        /// Switch case written with `->`.
        const ARROW_CASE            = 1 << 12;
        /// Assist node standing for a whole node a selection covers.
        const COVERING              = 1 << 13;
    }
}

bitflags::bitflags! {
    /// Declaration modifiers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u16 {
        const NONE          = 0;
        const PUBLIC        = 1 << 0;
        const PROTECTED     = 1 << 1;
        const PRIVATE       = 1 << 2;
        const STATIC        = 1 << 3;
        const ABSTRACT      = 1 << 4;
        const FINAL         = 1 << 5;
        const NATIVE        = 1 << 6;
        const SYNCHRONIZED  = 1 << 7;
        const TRANSIENT     = 1 << 8;
        const VOLATILE      = 1 << 9;
        const STRICTFP      = 1 << 10;
        const DEFAULT       = 1 << 11;
        const SEALED        = 1 << 12;
        const NON_SEALED    = 1 << 13;

        const ACCESS = Self::PUBLIC.bits() | Self::PROTECTED.bits() | Self::PRIVATE.bits();
    }
}

impl Modifiers {
    /// The modifier a reserved word denotes.
    pub fn from_keyword(kind: SyntaxKind) -> Option<Modifiers> {
        let modifier = match kind {
            SyntaxKind::PublicKeyword => Modifiers::PUBLIC,
            SyntaxKind::ProtectedKeyword => Modifiers::PROTECTED,
            SyntaxKind::PrivateKeyword => Modifiers::PRIVATE,
            SyntaxKind::StaticKeyword => Modifiers::STATIC,
            SyntaxKind::AbstractKeyword => Modifiers::ABSTRACT,
            SyntaxKind::FinalKeyword => Modifiers::FINAL,
            SyntaxKind::NativeKeyword => Modifiers::NATIVE,
            SyntaxKind::SynchronizedKeyword => Modifiers::SYNCHRONIZED,
            SyntaxKind::TransientKeyword => Modifiers::TRANSIENT,
            SyntaxKind::VolatileKeyword => Modifiers::VOLATILE,
            SyntaxKind::StrictfpKeyword => Modifiers::STRICTFP,
            SyntaxKind::DefaultKeyword => Modifiers::DEFAULT,
            _ => return None,
        };
        Some(modifier)
    }

    /// Source spelling of each set modifier, in canonical order.
    pub fn keywords(self) -> impl Iterator<Item = &'static str> {
        const ORDER: [(Modifiers, &str); 14] = [
            (Modifiers::PUBLIC, "public"),
            (Modifiers::PROTECTED, "protected"),
            (Modifiers::PRIVATE, "private"),
            (Modifiers::ABSTRACT, "abstract"),
            (Modifiers::STATIC, "static"),
            (Modifiers::FINAL, "final"),
            (Modifiers::SEALED, "sealed"),
            (Modifiers::NON_SEALED, "non-sealed"),
            (Modifiers::TRANSIENT, "transient"),
            (Modifiers::VOLATILE, "volatile"),
            (Modifiers::SYNCHRONIZED, "synchronized"),
            (Modifiers::NATIVE, "native"),
            (Modifiers::DEFAULT, "default"),
            (Modifiers::STRICTFP, "strictfp"),
        ];
        ORDER
            .into_iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, text)| text)
    }
}

bitflags::bitflags! {
    /// Flags the scanner attaches to a token.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TokenFlags: u16 {
        const NONE                  = 0;
        const PRECEDING_LINE_BREAK  = 1 << 0;
        /// Some of the token's characters were written as `\uXXXX`.
        const UNICODE_ESCAPE        = 1 << 1;
        const UNTERMINATED          = 1 << 2;
        /// The literal is not well formed; its kind is a placeholder.
        const MALFORMED             = 1 << 3;
        const HEX_SPECIFIER         = 1 << 4;
        const BINARY_SPECIFIER      = 1 << 5;
        const OCTAL                 = 1 << 6;
        const CONTAINS_SEPARATOR    = 1 << 7;
        /// The completion cursor lies inside or at the end of the token.
        const AT_CURSOR             = 1 << 8;
        /// Zero-width identifier injected at the completion cursor.
        const CURSOR_TOKEN          = 1 << 9;
        /// A keyword the cursor touches, re-kinded to an identifier.
        const KEYWORD_AT_CURSOR     = 1 << 10;
        /// A preceding comment was a `/** */` doc comment.
        const PRECEDING_JAVADOC     = 1 << 11;
    }
}
