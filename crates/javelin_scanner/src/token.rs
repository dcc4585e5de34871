//! Token information produced by the scanner.

use javelin_ast::syntax_kind::SyntaxKind;
use javelin_ast::types::TokenFlags;
use javelin_core::text::TextRange;

/// A scanned token. Offsets are in original source coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub kind: SyntaxKind,
    pub pos: u32,
    pub end: u32,
    /// Identifier name, decoded literal value, or raw numeric text.
    pub text: String,
    pub flags: TokenFlags,
}

impl TokenInfo {
    pub fn new(kind: SyntaxKind, pos: u32, end: u32) -> Self {
        Self {
            kind,
            pos,
            end,
            text: String::new(),
            flags: TokenFlags::NONE,
        }
    }

    pub fn range(&self) -> TextRange {
        TextRange::new(self.pos, self.end)
    }

    pub fn len(&self) -> u32 {
        self.end - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.pos == self.end
    }

    pub fn has_preceding_line_break(&self) -> bool {
        self.flags.contains(TokenFlags::PRECEDING_LINE_BREAK)
    }

    /// Whether this is the completion cursor or the token containing it.
    pub fn is_at_cursor(&self) -> bool {
        self.flags
            .intersects(TokenFlags::AT_CURSOR | TokenFlags::CURSOR_TOKEN)
    }
}
