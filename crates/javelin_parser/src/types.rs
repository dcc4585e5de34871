//! Type references, type arguments and type parameters.

use javelin_ast::node::*;
use javelin_ast::syntax_kind::SyntaxKind;
use javelin_ast::types::*;
use javelin_options::SourceLevel;

use crate::assist::AssistTarget;
use crate::parser::Parser;
use crate::recovery::Construct;

/// Where a type is written; decides which assist node a type at the
/// cursor becomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TypeContext {
    Reference,
    /// `throws` clauses and catch parameters.
    Exception,
    /// The name after `@`.
    Annotation,
    /// The type after `new`; a selection there covers the allocation.
    Allocation,
}

impl<'a> Parser<'a> {
    /// Parse a type, including annotations and trailing `[]` pairs.
    pub(crate) fn parse_type(&mut self, ctx: TypeContext) -> TypeRef<'a> {
        let pos = self.token_pos();
        let annotations = self.parse_annotations();
        let element = if self.current_token().is_primitive_type() {
            self.parse_primitive_type()
        } else if self.at(SyntaxKind::Identifier) {
            self.parse_class_type(ctx, annotations, pos)
        } else {
            self.report_expected_after("Type");
            let ty = self.alloc(ClassType {
                data: NodeData::missing(SyntaxKind::ClassType, self.last_end()),
                annotations,
                segments: &[],
            });
            return TypeRef::Class(ty);
        };
        self.parse_array_type(element, pos)
    }

    /// Parse `int`, `boolean` ... or `void` at the current token.
    pub(crate) fn parse_primitive_type(&mut self) -> TypeRef<'a> {
        let range = self.token_range();
        let keyword = self.current_token();
        self.next_token();
        TypeRef::Primitive(self.alloc(PrimitiveType {
            data: NodeData::new(SyntaxKind::PrimitiveType, range.pos, range.end),
            keyword,
        }))
    }

    /// Wrap `element` in an array type when `[]` pairs follow.
    pub(crate) fn parse_array_type(&mut self, element: TypeRef<'a>, pos: u32) -> TypeRef<'a> {
        let dims = self.parse_dims();
        if dims == 0 {
            return element;
        }
        TypeRef::Array(self.alloc(ArrayType {
            data: self.finish(SyntaxKind::ArrayType, pos),
            element,
            dims,
        }))
    }

    /// Count `[]` pairs, skipping type annotations between them.
    pub(crate) fn parse_dims(&mut self) -> u8 {
        let mut dims = 0u8;
        loop {
            if self.at(SyntaxKind::AtToken) {
                let before_dims = self.scanner.look_ahead(|s| {
                    crate::utilities::skim_annotations(s) && s.token() == SyntaxKind::OpenBracketToken
                });
                if !before_dims {
                    break;
                }
                self.parse_annotations();
            }
            if !self.at(SyntaxKind::OpenBracketToken) || self.peek() != SyntaxKind::CloseBracketToken {
                break;
            }
            self.next_token();
            self.next_token();
            dims = dims.saturating_add(1);
        }
        dims
    }

    /// Parse a possibly qualified, possibly parameterized class type. A
    /// segment at the assist cursor turns the whole type into an assist
    /// node.
    pub(crate) fn parse_class_type(
        &mut self,
        ctx: TypeContext,
        annotations: NodeList<'a, Annotation<'a>>,
        pos: u32,
    ) -> TypeRef<'a> {
        let mut segments: Vec<TypeSegment<'a>> = Vec::new();
        let mut assist_segment = None;
        loop {
            if assist_segment.is_none() && self.at_assist_token() {
                assist_segment = Some(segments.len());
            }
            let name = self.expect_identifier();
            let type_arguments = if self.at(SyntaxKind::LessThanToken) {
                Some(self.parse_type_arguments())
            } else {
                None
            };
            segments.push(TypeSegment {
                name,
                type_arguments,
            });
            if !self.at(SyntaxKind::DotToken) {
                break;
            }
            let next = self.peek();
            if next != SyntaxKind::Identifier && next != SyntaxKind::AtToken {
                break;
            }
            self.next_token();
            self.parse_annotations();
        }

        if let Some(index) = assist_segment {
            if let Some(ty) = self.type_assist(ctx, &segments, index, pos) {
                return ty;
            }
        }

        let last = segments.last().and_then(|s| s.type_arguments);
        let mut data = self.finish(SyntaxKind::ClassType, pos);
        if last.is_some_and(|args| args.is_empty()) {
            data.flags |= NodeFlags::DIAMOND;
        }
        TypeRef::Class(self.alloc(ClassType {
            data,
            annotations,
            segments: self.list(segments),
        }))
    }

    fn type_assist(
        &mut self,
        ctx: TypeContext,
        segments: &[TypeSegment<'a>],
        index: usize,
        pos: u32,
    ) -> Option<TypeRef<'a>> {
        let target = self.assist.as_ref()?.target;
        let name = segments[index].name;
        let qualified = index > 0;
        let kind = match target {
            AssistTarget::Completion { .. } => match ctx {
                TypeContext::Exception => AssistKind::CompleteOnException,
                TypeContext::Annotation => AssistKind::CompleteOnAnnotation,
                _ if qualified => AssistKind::CompleteOnQualifiedType,
                _ => AssistKind::CompleteOnType,
            },
            AssistTarget::Selection { .. } => {
                if ctx == TypeContext::Allocation {
                    self.defer_allocation_selection();
                    return None;
                }
                if qualified {
                    AssistKind::SelectOnQualifiedType
                } else {
                    AssistKind::SelectOnType
                }
            }
        };
        let start = if qualified { pos } else { name.data.range.pos };
        let replaced = javelin_core::TextRange::new(start, name.data.range.end);
        let qualifier: Vec<Identifier<'a>> = segments[..index].iter().map(|s| s.name).collect();
        let mut node = self.blank_assist(kind, self.finish(SyntaxKind::AssistNode, pos).range, replaced);
        node.prefix = self.assist_prefix(&name);
        node.name = Some(name);
        node.qualifier = self.list(qualifier);
        Some(TypeRef::Assist(self.capture(node)))
    }

    /// Parse `<T, ? extends U>` at the current `<`. The diamond `<>` yields
    /// an empty list.
    pub(crate) fn parse_type_arguments(&mut self) -> NodeList<'a, TypeRef<'a>> {
        let pos = self.token_pos();
        self.next_token();
        if self.at(SyntaxKind::GreaterThanToken) {
            let range = javelin_core::TextRange::new(pos, self.token_end());
            self.next_token();
            self.require_level(SourceLevel::JAVA_7, "Diamond operators", range);
            return &[];
        }
        let mut arguments = Vec::new();
        loop {
            if !self.tick() {
                break;
            }
            arguments.push(self.parse_type_argument());
            if !self.optional_token(SyntaxKind::CommaToken) {
                break;
            }
        }
        if !self.optional_token(SyntaxKind::GreaterThanToken) {
            self.expect(SyntaxKind::GreaterThanToken, Construct::TypeArguments);
        }
        let range = javelin_core::TextRange::new(pos, self.last_end().max(pos));
        self.require_level(SourceLevel::JAVA_5, "Parameterized types", range);
        self.list(arguments)
    }

    fn parse_type_argument(&mut self) -> TypeRef<'a> {
        let pos = self.token_pos();
        let annotations = self.parse_annotations();
        if !self.at(SyntaxKind::QuestionToken) {
            let element = if self.current_token().is_primitive_type() {
                self.parse_primitive_type()
            } else if self.at(SyntaxKind::Identifier) {
                self.parse_class_type(TypeContext::Reference, annotations, pos)
            } else {
                return self.parse_type(TypeContext::Reference);
            };
            return self.parse_array_type(element, pos);
        }
        self.next_token();
        let (bound_kind, bound) = match self.current_token() {
            SyntaxKind::ExtendsKeyword => {
                self.next_token();
                (WildcardBound::Extends, Some(self.parse_type(TypeContext::Reference)))
            }
            SyntaxKind::SuperKeyword => {
                self.next_token();
                (WildcardBound::Super, Some(self.parse_type(TypeContext::Reference)))
            }
            _ => (WildcardBound::Unbounded, None),
        };
        TypeRef::Wildcard(self.alloc(WildcardType {
            data: self.finish(SyntaxKind::WildcardType, pos),
            bound_kind,
            bound,
        }))
    }

    /// Parse `<T extends A & B, U>` when present.
    pub(crate) fn parse_type_parameters(&mut self) -> NodeList<'a, TypeParameter<'a>> {
        if !self.at(SyntaxKind::LessThanToken) {
            return &[];
        }
        let start = self.token_pos();
        self.next_token();
        let mut parameters = Vec::new();
        loop {
            if !self.tick() {
                break;
            }
            let pos = self.token_pos();
            let annotations = self.parse_annotations();
            let name = self.expect_identifier();
            let mut bounds = Vec::new();
            if self.optional_token(SyntaxKind::ExtendsKeyword) {
                bounds.push(self.parse_type(TypeContext::Reference));
                while self.optional_token(SyntaxKind::AmpersandToken) {
                    bounds.push(self.parse_type(TypeContext::Reference));
                }
            }
            parameters.push(TypeParameter {
                data: self.finish(SyntaxKind::TypeParameter, pos),
                annotations,
                name,
                bounds: self.list(bounds),
            });
            if !self.optional_token(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.expect(SyntaxKind::GreaterThanToken, Construct::TypeParameters);
        let range = javelin_core::TextRange::new(start, self.last_end().max(start));
        self.require_level(SourceLevel::JAVA_5, "Type parameters", range);
        self.list(parameters)
    }

    /// Parse `A, B, C` after `extends`, `implements`, `permits` or `throws`.
    pub(crate) fn parse_type_list(&mut self, ctx: TypeContext) -> NodeList<'a, TypeRef<'a>> {
        let mut types = vec![self.parse_type(ctx)];
        while self.optional_token(SyntaxKind::CommaToken) {
            if !self.tick() {
                break;
            }
            types.push(self.parse_type(ctx));
        }
        self.list(types)
    }
}
