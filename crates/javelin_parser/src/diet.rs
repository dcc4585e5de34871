//! Diet parsing.
//!
//! A diet parse builds declarations only. Method, constructor and
//! initializer bodies are skipped by brace counting and left as
//! [`MethodBody::Deferred`]. A later pass re-scans each deferred range on
//! its own ("island" parse) and stores the block in the declaration's body
//! cell, so diet + bodies and a full parse produce the same tree.

use javelin_ast::node::*;
use javelin_ast::syntax_kind::SyntaxKind;
use javelin_core::text::TextRange;
use tracing::{debug, trace};

use crate::parser::Parser;
use crate::recovery::Construct;

impl<'a> Parser<'a> {
    /// Move past a body starting at `{` without building anything. Stops
    /// early, before the closing brace, at a modifier that only starts
    /// members, which is where a full parse would close the body too.
    pub(crate) fn skip_body(&mut self) -> TextRange {
        let pos = self.token_pos();
        let mut depth = 0u32;
        // Depths at which an anonymous or local class body was opened.
        let mut class_bodies: Vec<u32> = Vec::new();
        let mut expect_class_body = false;
        let mut previous = SyntaxKind::Unknown;
        loop {
            let kind = self.current_token();
            match kind {
                SyntaxKind::EndOfFileToken => break,
                SyntaxKind::OpenBraceToken => {
                    depth += 1;
                    if std::mem::take(&mut expect_class_body) {
                        class_bodies.push(depth);
                    }
                }
                SyntaxKind::CloseBraceToken => {
                    if class_bodies.last() == Some(&depth) {
                        class_bodies.pop();
                    }
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        self.next_token();
                        break;
                    }
                }
                SyntaxKind::NewKeyword | SyntaxKind::InterfaceKeyword | SyntaxKind::EnumKeyword => {
                    expect_class_body = true;
                }
                SyntaxKind::ClassKeyword if previous != SyntaxKind::DotToken => {
                    expect_class_body = true;
                }
                SyntaxKind::Identifier if self.token_value() == "record" => {
                    expect_class_body = true;
                }
                SyntaxKind::SemicolonToken => expect_class_body = false,
                _ if kind.is_member_only_modifier() && depth > 0 && class_bodies.is_empty() => {
                    trace!(pos = self.token_pos(), "body ends at member modifier");
                    break;
                }
                _ => {}
            }
            previous = kind;
            self.next_token();
        }
        TextRange::new(pos, self.last_end().max(pos))
    }

    /// Parse the block at `range` on its own. The scanner is confined to
    /// the range, so an unclosed block ends where the diet parse stopped.
    pub(crate) fn parse_island(&mut self, range: TextRange, construct: Construct) -> &'a Block<'a> {
        debug!(pos = range.pos, end = range.end, "parsing deferred body");
        self.scanner.set_end(range.end);
        self.scanner.reset_to(range.pos);
        self.end_offset = range.end;
        self.prev_range = TextRange::empty(range.pos);
        self.next_token();
        self.parse_block(construct)
    }

    /// Parse the deferred body of one method, constructor or initializer
    /// and store it. Bodies already parsed are left alone.
    pub(crate) fn fill_body(&mut self, cell: &std::cell::Cell<MethodBody<'a>>, construct: Construct) {
        if let MethodBody::Deferred(range) = cell.get() {
            let block = self.parse_island(range, construct);
            cell.set(MethodBody::Parsed(block));
        }
    }
}

/// Which deferred bodies a [`BodyFiller`] parses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BodySelection {
    All,
    /// Only the body containing this offset. A body left unclosed also
    /// contains its end, where typing at end of input happens.
    Containing(u32),
}

impl BodySelection {
    fn wants(self, range: TextRange, closed: bool) -> bool {
        match self {
            BodySelection::All => true,
            BodySelection::Containing(offset) => {
                range.pos < offset && (offset < range.end || (!closed && offset == range.end))
            }
        }
    }
}

/// Walks declarations and parses the deferred bodies it selects.
pub(crate) struct BodyFiller<'p, 'a> {
    pub(crate) parser: &'p mut Parser<'a>,
    pub(crate) selection: BodySelection,
    pub(crate) filled: usize,
}

impl<'p, 'a> BodyFiller<'p, 'a> {
    pub(crate) fn new(parser: &'p mut Parser<'a>, selection: BodySelection) -> Self {
        Self {
            parser,
            selection,
            filled: 0,
        }
    }

    fn fill(&mut self, cell: &std::cell::Cell<MethodBody<'a>>, construct: Construct) {
        let Some(range) = cell.get().deferred_range() else {
            return;
        };
        let closed = range.end > range.pos
            && self.parser.source_text(TextRange::new(range.end - 1, range.end)) == "}";
        if self.selection.wants(range, closed) {
            self.parser.fill_body(cell, construct);
            self.filled += 1;
        }
    }

    /// Fill the bodies of `declaration` and of its member types.
    pub(crate) fn fill_type(&mut self, declaration: &TypeDeclaration<'a>) {
        for member in declaration.members {
            self.fill_member(member);
        }
    }

    pub(crate) fn fill_member(&mut self, member: &Member<'a>) {
        match member {
            Member::Method(method) => self.fill(&method.body, Construct::MethodBody),
            Member::Initializer(initializer) => self.fill(&initializer.body, Construct::Block),
            Member::Type(declaration) => self.fill_type(declaration),
            Member::Field(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParseMode;
    use bumpalo::Bump;
    use javelin_core::intern::StringInterner;
    use javelin_options::ResolvedOptions;

    fn diet<'a>(arena: &'a Bump, source: &str) -> (Parser<'a>, &'a CompilationUnit<'a>) {
        let mut p = Parser::new(arena, source, StringInterner::new(), ResolvedOptions::default(), ParseMode::Diet);
        let unit = p.parse_compilation_unit("X.java");
        (p, unit)
    }

    fn method<'u, 'a>(unit: &'u CompilationUnit<'a>, index: usize) -> &'a MethodDeclaration<'a> {
        match unit.types[0].members[index] {
            Member::Method(method) => method,
            other => panic!("expected method, got {other:?}"),
        }
    }

    #[test]
    fn test_bodies_are_deferred() {
        let arena = Bump::new();
        let source = "class X { int f = 1; void m() { if (a) { b(); } } static { c(); } }";
        let (p, unit) = diet(&arena, source);
        assert!(p.diagnostics.is_empty(), "{:?}", p.diagnostics.messages());
        let body = method(unit, 1).body();
        assert_eq!(
            body.deferred_range().map(|r| &source[r.pos as usize..r.end as usize]),
            Some("{ if (a) { b(); } }")
        );
        let Member::Initializer(init) = unit.types[0].members[2] else {
            panic!("expected initializer");
        };
        assert!(init.body().deferred_range().is_some());
    }

    #[test]
    fn test_skip_stops_at_member_modifier() {
        let arena = Bump::new();
        let source = "class X { void foo() { if (true) { } public void bar() { } }";
        let (p, unit) = diet(&arena, source);
        assert!(p.diagnostics.is_empty());
        let range = method(unit, 0).body().deferred_range().unwrap();
        assert_eq!(&source[range.pos as usize..range.end as usize], "{ if (true) { }");
        assert_eq!(method(unit, 1).name.text, "bar");
    }

    #[test]
    fn test_anonymous_class_members_do_not_end_skip() {
        let arena = Bump::new();
        let source = "class X { void m() { Runnable r = new Runnable() { public void run() { } }; } void n() {} }";
        let (_, unit) = diet(&arena, source);
        assert_eq!(unit.types[0].members.len(), 2);
        let range = method(unit, 0).body().deferred_range().unwrap();
        assert!(source[range.pos as usize..range.end as usize].ends_with("}; }"));
    }

    #[test]
    fn test_fill_bodies_in_place() {
        let arena = Bump::new();
        let source = "class X { void m() { a(); } class Y { void n() { b(); c(); } } }";
        let (mut p, unit) = diet(&arena, source);
        let mut filler = BodyFiller::new(&mut p, BodySelection::All);
        filler.fill_type(unit.types[0]);
        assert_eq!(filler.filled, 2);
        assert_eq!(method(unit, 0).body().block().map(|b| b.statements.len()), Some(1));
        let Member::Type(inner) = unit.types[0].members[1] else {
            panic!("expected member type");
        };
        let Member::Method(n) = inner.members[0] else {
            panic!("expected method");
        };
        assert_eq!(n.body().block().map(|b| b.statements.len()), Some(2));
    }

    #[test]
    fn test_fill_only_containing_body() {
        let arena = Bump::new();
        let source = "class X { void m() { a(); } void n() { b(); } }";
        let (mut p, unit) = diet(&arena, source);
        let offset = source.find("b()").unwrap() as u32;
        let mut filler = BodyFiller::new(&mut p, BodySelection::Containing(offset));
        filler.fill_type(unit.types[0]);
        assert_eq!(filler.filled, 1);
        assert!(method(unit, 0).body().deferred_range().is_some());
        assert!(method(unit, 1).body().block().is_some());
    }

    #[test]
    fn test_unclosed_body_contains_its_end() {
        let arena = Bump::new();
        let source = "class X { void m() { foo.ba";
        let (mut p, unit) = diet(&arena, source);
        let mut filler = BodyFiller::new(&mut p, BodySelection::Containing(source.len() as u32));
        filler.fill_type(unit.types[0]);
        assert_eq!(filler.filled, 1);
        assert!(method(unit, 0).body().block().is_some());

        let arena = Bump::new();
        let source = "class X { void m() { a(); } void n() { b(); } }";
        let (mut p, unit) = diet(&arena, source);
        let after_m = source.find("} void n").unwrap() as u32 + 1;
        let mut filler = BodyFiller::new(&mut p, BodySelection::Containing(after_m));
        filler.fill_type(unit.types[0]);
        assert_eq!(filler.filled, 0);
    }
}
