//! Completion and selection support.
//!
//! With a cursor or selection armed, the scanner flags the token under it
//! (or injects a zero-width identifier where nothing is typed yet). The
//! production that meets the flagged token builds an [`AssistNode`] instead
//! of its usual node and hands it to [`Parser::capture`]. From then on every
//! finished node is offered to [`Parser::observe_finished`]; the first one
//! whose range covers the assist node is remembered as its parent.
//!
//! A selection spanning several tokens flags none of them. The innermost
//! selectable node covering it is remembered instead and turned into the
//! assist node by [`Parser::capture_covering`] once the parse is over.

use javelin_ast::node::*;
use javelin_ast::syntax_kind::SyntaxKind;
use javelin_ast::types::NodeFlags;
use javelin_core::text::TextRange;
use tracing::trace;

use crate::parser::Parser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AssistTarget {
    Completion { cursor: u32 },
    /// `[start, end)` in original offsets.
    Selection { start: u32, end: u32 },
}

/// The innermost node enclosing the assist node, copied out of the arena so
/// it outlives the parse that found it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentSnapshot {
    pub kind: SyntaxKind,
    pub range: TextRange,
    pub source: String,
}

#[derive(Debug)]
pub(crate) struct AssistState<'a> {
    pub(crate) target: AssistTarget,
    pub(crate) node: Option<&'a AssistNode<'a>>,
    pub(crate) parent: Option<ParentSnapshot>,
    /// A selection landed on the type of an allocation; the allocation
    /// itself becomes the assist node once its arguments are parsed.
    pub(crate) allocation_selected: bool,
    /// Innermost selectable node covering a selection no token matched.
    pub(crate) covering: Option<Covering>,
    pub(crate) covering_parent: Option<ParentSnapshot>,
    /// Deferred bodies are being parsed; their nodes are nested deeper
    /// than any declaration the diet parse finished.
    pub(crate) in_body: bool,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Covering {
    pub(crate) data: NodeData,
    pub(crate) kind: AssistKind,
    pub(crate) in_body: bool,
}

impl<'a> AssistState<'a> {
    pub(crate) fn new(target: AssistTarget) -> Self {
        Self {
            target,
            node: None,
            parent: None,
            allocation_selected: false,
            covering: None,
            covering_parent: None,
            in_body: false,
        }
    }
}

/// The selection kind for a node that covers a selection, if it is one a
/// caller can select.
fn covering_kind(kind: SyntaxKind) -> Option<AssistKind> {
    let assist = match kind {
        SyntaxKind::NameReference => AssistKind::SelectOnQualifiedName,
        SyntaxKind::FieldAccess | SyntaxKind::SuperFieldAccess => AssistKind::SelectOnFieldReference,
        SyntaxKind::MessageSend => AssistKind::SelectOnMessageSend,
        SyntaxKind::Allocation => AssistKind::SelectOnAllocation,
        SyntaxKind::ExplicitConstructorCall => AssistKind::SelectOnExplicitConstructorCall,
        SyntaxKind::ClassType | SyntaxKind::ArrayType => AssistKind::SelectOnQualifiedType,
        SyntaxKind::ImportDeclaration => AssistKind::SelectOnImport,
        SyntaxKind::PackageDeclaration => AssistKind::SelectOnPackage,
        SyntaxKind::ClassDeclaration
        | SyntaxKind::InterfaceDeclaration
        | SyntaxKind::EnumDeclaration
        | SyntaxKind::RecordDeclaration
        | SyntaxKind::AnnotationTypeDeclaration => AssistKind::SelectOnTypeDeclaration,
        SyntaxKind::MethodDeclaration
        | SyntaxKind::ConstructorDeclaration
        | SyntaxKind::AnnotationMethodDeclaration => AssistKind::SelectOnMethodDeclaration,
        SyntaxKind::FieldDeclaration => AssistKind::SelectOnFieldDeclaration,
        SyntaxKind::LocalVariableDeclaration => AssistKind::SelectOnLocalDeclaration,
        SyntaxKind::Parameter => AssistKind::SelectOnParameter,
        _ => return None,
    };
    Some(assist)
}

impl<'a> Parser<'a> {
    /// Arm completion at `cursor` for the rest of this parser's life.
    pub(crate) fn arm_completion(&mut self, cursor: u32) {
        self.scanner.set_cursor(Some(cursor));
        self.assist = Some(AssistState::new(AssistTarget::Completion { cursor }));
    }

    /// Arm selection of `[start, end)`.
    pub(crate) fn arm_selection(&mut self, start: u32, end: u32) {
        self.scanner.set_selection(Some((start, end)));
        self.assist = Some(AssistState::new(AssistTarget::Selection { start, end }));
    }

    /// Whether an assist target is armed and no node has been built for it.
    pub(crate) fn assist_pending(&self) -> bool {
        self.assist.as_ref().is_some_and(|state| state.node.is_none())
    }

    pub(crate) fn completion_pending(&self) -> bool {
        self.assist.as_ref().is_some_and(|state| {
            state.node.is_none() && matches!(state.target, AssistTarget::Completion { .. })
        })
    }

    pub(crate) fn assist_cursor(&self) -> Option<u32> {
        match self.assist.as_ref()?.target {
            AssistTarget::Completion { cursor } => Some(cursor),
            AssistTarget::Selection { .. } => None,
        }
    }

    pub(crate) fn is_completion(&self) -> bool {
        self.assist
            .as_ref()
            .is_some_and(|state| matches!(state.target, AssistTarget::Completion { .. }))
    }

    /// An assist node with only its kind and ranges filled in.
    pub(crate) fn blank_assist(
        &self,
        kind: AssistKind,
        range: TextRange,
        replaced: TextRange,
    ) -> AssistNode<'a> {
        AssistNode {
            data: NodeData::new(SyntaxKind::AssistNode, range.pos, range.end),
            assist_kind: kind,
            replaced,
            prefix: "",
            name: None,
            qualifier: &[],
            receiver: None,
            ty: None,
            type_arguments: &[],
            arguments: &[],
        }
    }

    /// The characters of `name` typed before the cursor. Selection has no
    /// prefix.
    pub(crate) fn assist_prefix(&self, name: &Identifier<'a>) -> &'a str {
        let Some(cursor) = self.assist_cursor() else {
            return "";
        };
        let range = name.data.range;
        if range.is_empty() {
            return "";
        }
        let end = cursor.clamp(range.pos, range.end);
        let text = self.scanner.text_slice(range.pos, end);
        self.alloc_str(&text)
    }

    /// Store the assist node. Only the first one of a parse counts.
    pub(crate) fn capture(&mut self, node: AssistNode<'a>) -> &'a AssistNode<'a> {
        let node: &'a AssistNode<'a> = self.arena.alloc(node);
        if let Some(state) = self.assist.as_mut() {
            if state.node.is_none() {
                trace!(
                    kind = %node.assist_kind,
                    pos = node.data.range.pos,
                    end = node.data.range.end,
                    "assist node"
                );
                state.node = Some(node);
            }
        }
        node
    }

    /// Build and capture an assist node about a declared name. The node is
    /// reported but not placed in the tree; the declaration keeps its name.
    pub(crate) fn declaration_assist(
        &mut self,
        completion: AssistKind,
        selection: AssistKind,
        name: &Identifier<'a>,
    ) {
        let kind = if self.is_completion() { completion } else { selection };
        let range = name.data.range;
        let mut node = self.blank_assist(kind, range, range);
        node.prefix = self.assist_prefix(name);
        node.name = Some(*name);
        self.capture(node);
    }

    pub(crate) fn defer_allocation_selection(&mut self) {
        if let Some(state) = self.assist.as_mut() {
            state.allocation_selected = true;
        }
    }

    /// Take the flag set by [`Parser::defer_allocation_selection`].
    pub(crate) fn take_allocation_selection(&mut self) -> bool {
        self.assist
            .as_mut()
            .is_some_and(|state| std::mem::take(&mut state.allocation_selected))
    }

    /// Remember the first finished node that encloses the assist node, or
    /// with no assist node yet, the node covering the selection.
    pub(crate) fn observe_finished(&mut self, data: &NodeData) {
        let Some(state) = self.assist.as_ref() else {
            return;
        };
        if data.kind == SyntaxKind::AssistNode || data.is_missing() {
            return;
        }
        let Some(node) = state.node else {
            self.observe_covering(data);
            return;
        };
        if state.parent.is_some() || !data.range.contains_range(node.data.range) {
            return;
        }
        let snapshot = self.snapshot(data);
        trace!(kind = ?snapshot.kind, "assist parent");
        if let Some(state) = self.assist.as_mut() {
            state.parent = Some(snapshot);
        }
    }

    fn observe_covering(&mut self, data: &NodeData) {
        let Some(state) = self.assist.as_ref() else {
            return;
        };
        let AssistTarget::Selection { start, end } = state.target else {
            return;
        };
        let in_body = state.in_body;
        if let Some(covering) = state.covering {
            // Body nodes replace a covering declaration from the diet pass.
            if covering.in_body || !in_body {
                if state.covering_parent.is_none() && data.range.contains_range(covering.data.range) {
                    let snapshot = self.snapshot(data);
                    if let Some(state) = self.assist.as_mut() {
                        state.covering_parent = Some(snapshot);
                    }
                }
                return;
            }
        }
        if data.range.pos > start || end > data.range.end {
            return;
        }
        let Some(kind) = covering_kind(data.kind) else {
            return;
        };
        trace!(?kind, pos = data.range.pos, end = data.range.end, "covering node");
        if let Some(state) = self.assist.as_mut() {
            state.covering = Some(Covering {
                data: *data,
                kind,
                in_body,
            });
            state.covering_parent = None;
        }
    }

    /// Mark the start of deferred body parsing.
    pub(crate) fn enter_bodies(&mut self) {
        if let Some(state) = self.assist.as_mut() {
            state.in_body = true;
        }
    }

    /// With no token-level assist node, make one of the node covering the
    /// selection. Its name is the covered source.
    pub(crate) fn capture_covering(&mut self) {
        let Some(state) = self.assist.as_mut() else {
            return;
        };
        if state.node.is_some() {
            return;
        }
        let Some(covering) = state.covering.take() else {
            return;
        };
        let parent = state.covering_parent.take();
        let range = covering.data.range;
        let text = self.alloc_str(&self.source_text(range));
        let mut node = self.blank_assist(covering.kind, range, range);
        node.data.flags |= NodeFlags::COVERING;
        node.name = Some(Identifier {
            data: NodeData::new(SyntaxKind::Identifier, range.pos, range.end),
            name: self.interner.intern(text),
            text,
        });
        self.capture(node);
        if let Some(state) = self.assist.as_mut() {
            state.parent = parent;
        }
    }

    fn snapshot(&self, data: &NodeData) -> ParentSnapshot {
        ParentSnapshot {
            kind: data.kind,
            range: data.range,
            source: self.source_text(data.range),
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

    fn parser<'a>(arena: &'a Bump, source: &str) -> Parser<'a> {
        Parser::new(
            arena,
            source,
            StringInterner::new(),
            ResolvedOptions::default(),
            ParseMode::Full,
        )
    }

    #[test]
    fn test_prefix_stops_at_cursor() {
        let arena = Bump::new();
        let mut p = parser(&arena, "hashCode");
        p.arm_completion(3);
        p.next_token();
        let name = p.take_identifier();
        assert_eq!(p.assist_prefix(&name), "has");
    }

    #[test]
    fn test_first_capture_wins() {
        let arena = Bump::new();
        let mut p = parser(&arena, "a b");
        p.arm_selection(0, 1);
        let range = TextRange::new(0, 1);
        p.capture(p.blank_assist(AssistKind::SelectOnName, range, range));
        p.capture(p.blank_assist(AssistKind::SelectOnType, range, range));
        let node = p.assist.as_ref().and_then(|s| s.node).unwrap();
        assert_eq!(node.assist_kind, AssistKind::SelectOnName);
        assert!(!p.assist_pending());
    }

    #[test]
    fn test_parent_is_first_enclosing_node() {
        let arena = Bump::new();
        let mut p = parser(&arena, "foo(bar)");
        p.arm_completion(7);
        let range = TextRange::new(4, 7);
        p.capture(p.blank_assist(AssistKind::CompleteOnName, range, range));
        p.observe_finished(&NodeData::new(SyntaxKind::Literal, 0, 3));
        p.observe_finished(&NodeData::missing(SyntaxKind::NameReference, 4));
        p.observe_finished(&NodeData::new(SyntaxKind::MessageSend, 0, 8));
        p.observe_finished(&NodeData::new(SyntaxKind::ExpressionStatement, 0, 8));
        let parent = p.assist.as_ref().and_then(|s| s.parent.clone()).unwrap();
        assert_eq!(parent.kind, SyntaxKind::MessageSend);
        assert_eq!(parent.source, "foo(bar)");
    }

    #[test]
    fn test_covering_node_prefers_body_nodes() {
        let arena = Bump::new();
        let mut p = parser(&arena, "void m() { foo.bar(); }");
        p.arm_selection(11, 18);
        p.observe_finished(&NodeData::new(SyntaxKind::Block, 9, 23));
        p.observe_finished(&NodeData::new(SyntaxKind::MethodDeclaration, 0, 23));
        p.enter_bodies();
        p.observe_finished(&NodeData::new(SyntaxKind::NameReference, 11, 14));
        p.observe_finished(&NodeData::new(SyntaxKind::MessageSend, 11, 20));
        p.observe_finished(&NodeData::new(SyntaxKind::ExpressionStatement, 11, 21));
        p.capture_covering();
        let state = p.assist.as_ref().unwrap();
        let node = state.node.unwrap();
        assert_eq!(node.assist_kind, AssistKind::SelectOnMessageSend);
        assert!(node.data.flags.contains(NodeFlags::COVERING));
        assert_eq!(node.name.map(|n| n.text), Some("foo.bar()"));
        assert_eq!(
            state.parent.as_ref().map(|parent| parent.kind),
            Some(SyntaxKind::ExpressionStatement)
        );
    }

    #[test]
    fn test_token_assist_beats_covering_node() {
        let arena = Bump::new();
        let mut p = parser(&arena, "foo.bar()");
        p.arm_selection(4, 7);
        p.observe_finished(&NodeData::new(SyntaxKind::MessageSend, 0, 9));
        let range = TextRange::new(4, 7);
        p.capture(p.blank_assist(AssistKind::SelectOnMessageSend, range, range));
        p.capture_covering();
        let node = p.assist.as_ref().and_then(|s| s.node).unwrap();
        assert!(!node.data.flags.contains(NodeFlags::COVERING));
    }
}
