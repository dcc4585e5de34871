//! Compilation units, type declarations and their members.
//!
//! Member bodies go through [`Parser::parse_method_body`], which parses
//! them in full mode and only skips over them in diet mode.

use std::cell::Cell;

use javelin_ast::node::*;
use javelin_ast::syntax_kind::SyntaxKind;
use javelin_ast::types::*;
use javelin_core::text::TextRange;
use javelin_diagnostics::messages;
use javelin_options::{ConfigurableProblem, SourceLevel};
use tracing::{debug, trace};

use crate::parser::{ParseMode, Parser};
use crate::recovery::{Construct, RecoveryAction, TokenSet, MEMBER_BOUNDARY, TYPE_BOUNDARY};
use crate::types::TypeContext;
use crate::utilities::{is_statement_only_start, skim_annotations};

/// Which modifiers a declaration may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ModifierContext {
    /// Members and top level types.
    Member,
    /// Local variables, parameters and local types.
    Local,
}

/// Tokens that end a malformed class header.
const CLASS_HEADER_BOUNDARY: TokenSet = TokenSet::new()
    .with(SyntaxKind::OpenBraceToken)
    .with(SyntaxKind::CloseBraceToken)
    .with(SyntaxKind::SemicolonToken)
    .with(SyntaxKind::EndOfFileToken);

impl<'a> Parser<'a> {
    // ========================================================================
    // Compilation unit
    // ========================================================================

    pub(crate) fn parse_compilation_unit(&mut self, file_name: &str) -> &'a CompilationUnit<'a> {
        self.next_token();
        let package = if self.at_package_declaration() {
            Some(self.parse_package_declaration())
        } else {
            None
        };

        let mut imports = Vec::new();
        let mut types = Vec::new();
        loop {
            if !self.tick() {
                break;
            }
            match self.current_token() {
                SyntaxKind::EndOfFileToken => break,
                SyntaxKind::SemicolonToken => {
                    self.unnecessary_semicolon();
                    continue;
                }
                SyntaxKind::ImportKeyword => {
                    imports.push(self.parse_import_declaration());
                    continue;
                }
                _ => {}
            }
            let pos = self.token_pos();
            let flags = self.javadoc_flag();
            let modifiers = self.parse_modifiers(ModifierContext::Member);
            if self.at_type_keyword() {
                types.push(self.type_declaration(pos, modifiers, flags));
                continue;
            }
            if self.is_eof() {
                if !modifiers.is_empty() {
                    self.report_expected_after(TypeKind::Class.keyword());
                }
                break;
            }
            self.skip_to_boundary(TYPE_BOUNDARY);
        }

        let end = self.scanner.source_len();
        debug!(types = types.len(), imports = imports.len(), "compilation unit");
        self.arena.alloc(CompilationUnit {
            data: NodeData::new(SyntaxKind::CompilationUnit, 0, end),
            package,
            imports: self.list(imports),
            types: self.list(types),
            file_name: self.alloc_str(file_name),
            text: self.source,
        })
    }

    fn unnecessary_semicolon(&mut self) {
        let range = self.token_range();
        self.next_token();
        self.report_configurable(
            ConfigurableProblem::UnnecessarySemicolon,
            range,
            &messages::UNNECESSARY_SEMICOLON,
            &[],
        );
    }

    fn javadoc_flag(&self) -> NodeFlags {
        if self.token_flags().contains(TokenFlags::PRECEDING_JAVADOC) {
            NodeFlags::HAS_JAVADOC
        } else {
            NodeFlags::NONE
        }
    }

    /// `package`, possibly after annotations.
    fn at_package_declaration(&mut self) -> bool {
        match self.current_token() {
            SyntaxKind::PackageKeyword => true,
            SyntaxKind::AtToken => self.scanner.look_ahead(|s| {
                skim_annotations(s) && s.token() == SyntaxKind::PackageKeyword
            }),
            _ => false,
        }
    }

    fn parse_package_declaration(&mut self) -> &'a PackageDeclaration<'a> {
        let pos = self.token_pos();
        let annotations = self.parse_annotations();
        self.next_token();
        let (name, assist) = self.parse_declaration_name(
            AssistKind::CompleteOnPackage,
            AssistKind::SelectOnPackage,
            false,
        );
        self.expect(SyntaxKind::SemicolonToken, Construct::PackageDeclaration);
        self.alloc(PackageDeclaration {
            data: self.finish(SyntaxKind::PackageDeclaration, pos),
            annotations,
            name: name.0,
            assist,
        })
    }

    fn parse_import_declaration(&mut self) -> ImportDeclaration<'a> {
        let pos = self.token_pos();
        self.next_token();
        let mut flags = NodeFlags::NONE;
        if self.at(SyntaxKind::StaticKeyword) {
            let range = self.token_range();
            self.next_token();
            self.require_level(SourceLevel::JAVA_5, "Static imports", range);
            flags |= NodeFlags::STATIC;
        }
        let ((name, on_demand), assist) = self.parse_declaration_name(
            AssistKind::CompleteOnImport,
            AssistKind::SelectOnImport,
            true,
        );
        if on_demand {
            flags |= NodeFlags::ON_DEMAND;
        }
        self.expect(SyntaxKind::SemicolonToken, Construct::ImportDeclaration);
        self.finished(ImportDeclaration {
            data: self.finish(SyntaxKind::ImportDeclaration, pos).with_flags(flags),
            name,
            assist,
        })
    }

    /// The dotted name of a package or import. A segment at the assist
    /// cursor becomes an assist node covering the name up to and including
    /// that segment. `.*` ends an on-demand import.
    fn parse_declaration_name(
        &mut self,
        completion: AssistKind,
        selection: AssistKind,
        allow_on_demand: bool,
    ) -> ((Name<'a>, bool), Option<&'a AssistNode<'a>>) {
        let pos = self.token_pos();
        let mut segments: Vec<Identifier<'a>> = Vec::new();
        let mut assist = None;
        let mut on_demand = false;
        loop {
            if !self.tick() {
                break;
            }
            if assist.is_none() && self.at_assist_token() && self.at(SyntaxKind::Identifier) {
                let name = self.take_identifier();
                let kind = if self.is_completion() { completion } else { selection };
                let range = TextRange::new(pos, name.data.range.end);
                let mut node = self.blank_assist(kind, range, range);
                node.prefix = self.assist_prefix(&name);
                node.name = Some(name);
                node.qualifier = self.list(segments.clone());
                assist = Some(self.capture(node));
                segments.push(name);
            } else {
                segments.push(self.expect_identifier());
            }
            if !self.at(SyntaxKind::DotToken) {
                break;
            }
            self.next_token();
            if allow_on_demand && self.at(SyntaxKind::AsteriskToken) {
                self.next_token();
                on_demand = true;
                break;
            }
        }
        let end = segments.last().map_or(pos, |s| s.data.range.end);
        let name = Name {
            data: NodeData::new(SyntaxKind::Name, pos, end.max(pos)),
            segments: self.list(segments),
        };
        ((name, on_demand), assist)
    }

    // ========================================================================
    // Modifiers and annotations
    // ========================================================================

    /// Modifier keywords and annotations, in any order.
    pub(crate) fn parse_modifiers(&mut self, ctx: ModifierContext) -> ModifierList<'a> {
        let pos = self.token_pos();
        let mut flags = Modifiers::NONE;
        let mut annotations = Vec::new();
        let mut consumed = false;
        loop {
            if !self.tick() {
                break;
            }
            let current = self.current_token();
            if current == SyntaxKind::AtToken {
                if self.peek() == SyntaxKind::InterfaceKeyword {
                    break;
                }
                annotations.push(self.parse_annotation());
                consumed = true;
                continue;
            }
            if let Some(modifier) = Modifiers::from_keyword(current) {
                let allowed = match ctx {
                    ModifierContext::Member => {
                        current != SyntaxKind::DefaultKeyword
                            || !matches!(
                                self.peek(),
                                SyntaxKind::ColonToken | SyntaxKind::ArrowToken
                            )
                    }
                    ModifierContext::Local => {
                        (Modifiers::FINAL | Modifiers::ABSTRACT | Modifiers::STRICTFP)
                            .contains(modifier)
                    }
                };
                if !allowed {
                    break;
                }
                flags |= modifier;
                self.next_token();
                consumed = true;
                continue;
            }
            if ctx == ModifierContext::Member {
                if let Some(modifier) = self.contextual_modifier() {
                    flags |= modifier;
                    consumed = true;
                    continue;
                }
            }
            break;
        }
        let range = if consumed {
            TextRange::new(pos, self.last_end().max(pos))
        } else {
            TextRange::empty(pos)
        };
        ModifierList {
            range,
            flags,
            annotations: self.list(annotations),
        }
    }

    /// `sealed` or `non-sealed` in front of a type. Consumed when found.
    fn contextual_modifier(&mut self) -> Option<Modifiers> {
        let pos = self.token_pos();
        if self.at_contextual("sealed") {
            let next = self.peek();
            let before_type = next.is_modifier_keyword()
                || matches!(
                    next,
                    SyntaxKind::ClassKeyword | SyntaxKind::InterfaceKeyword | SyntaxKind::AtToken
                );
            if !before_type {
                return None;
            }
            self.next_token();
            self.require_level(SourceLevel::JAVA_17, "Sealed classes", TextRange::new(pos, self.last_end()));
            return Some(Modifiers::SEALED);
        }
        if self.at_contextual("non") {
            let non_end = self.token_end();
            let adjacent = self.scanner.look_ahead(|s| {
                if s.scan() != SyntaxKind::MinusToken || s.token_start() != non_end {
                    return false;
                }
                let minus_end = s.token_end();
                s.scan() == SyntaxKind::Identifier
                    && s.token_value() == "sealed"
                    && s.token_start() == minus_end
            });
            if !adjacent {
                return None;
            }
            self.next_token();
            self.next_token();
            self.next_token();
            self.require_level(SourceLevel::JAVA_17, "Sealed classes", TextRange::new(pos, self.last_end()));
            return Some(Modifiers::NON_SEALED);
        }
        None
    }

    /// Annotations in front of a type or declaration. `@interface` is left
    /// alone.
    pub(crate) fn parse_annotations(&mut self) -> NodeList<'a, Annotation<'a>> {
        let mut annotations = Vec::new();
        while self.at(SyntaxKind::AtToken) && self.peek() != SyntaxKind::InterfaceKeyword {
            if !self.tick() {
                break;
            }
            annotations.push(self.parse_annotation());
        }
        self.list(annotations)
    }

    fn parse_annotation(&mut self) -> Annotation<'a> {
        let pos = self.token_pos();
        self.next_token();
        let name_pos = self.token_pos();
        let type_ref = self.parse_class_type(TypeContext::Annotation, &[], name_pos);
        let args = if self.at(SyntaxKind::OpenParenToken) {
            self.parse_annotation_arguments()
        } else {
            AnnotationArgs::Marker
        };
        let range = TextRange::new(pos, self.last_end().max(pos));
        self.require_level(SourceLevel::JAVA_5, "Annotations", range);
        self.finished(Annotation {
            data: self.finish(SyntaxKind::Annotation, pos),
            type_ref,
            args,
        })
    }

    fn parse_annotation_arguments(&mut self) -> AnnotationArgs<'a> {
        self.open_bracket(SyntaxKind::OpenParenToken, Construct::AnnotationArguments);
        let args = if self.at(SyntaxKind::CloseParenToken) {
            AnnotationArgs::Pairs(&[])
        } else if self.at(SyntaxKind::Identifier) && self.peek() == SyntaxKind::EqualsToken {
            let mut pairs = Vec::new();
            loop {
                if !self.tick() || self.is_insertion_boundary(SyntaxKind::CloseParenToken) {
                    break;
                }
                let pos = self.token_pos();
                let name = self.expect_identifier();
                self.expect(SyntaxKind::EqualsToken, Construct::AnnotationArguments);
                let value = self.parse_element_value();
                pairs.push(self.finished(MemberValuePair {
                    data: self.finish(SyntaxKind::MemberValuePair, pos),
                    name,
                    value,
                }));
                if !self.optional_token(SyntaxKind::CommaToken) {
                    break;
                }
            }
            AnnotationArgs::Pairs(self.list(pairs))
        } else {
            AnnotationArgs::Single(self.parse_element_value())
        };
        self.close_bracket(None);
        args
    }

    /// An annotation argument: a nested annotation, an array of element
    /// values or a conditional expression.
    pub(crate) fn parse_element_value(&mut self) -> Expression<'a> {
        match self.current_token() {
            SyntaxKind::AtToken => {
                let annotation = self.parse_annotation();
                Expression::Annotation(self.arena.alloc(annotation))
            }
            SyntaxKind::OpenBraceToken => Expression::ArrayInitializer(self.parse_array_initializer(true)),
            _ => self.parse_conditional(),
        }
    }

    // ========================================================================
    // Type declarations
    // ========================================================================

    fn at_type_keyword(&mut self) -> bool {
        match self.current_token() {
            SyntaxKind::ClassKeyword | SyntaxKind::InterfaceKeyword | SyntaxKind::EnumKeyword => true,
            SyntaxKind::AtToken => self.peek() == SyntaxKind::InterfaceKeyword,
            _ => self.at_contextual("record") && self.peek() == SyntaxKind::Identifier,
        }
    }

    /// A type declaration after its modifiers, starting at the type
    /// keyword.
    pub(crate) fn parse_type_declaration(
        &mut self,
        pos: u32,
        modifiers: ModifierList<'a>,
    ) -> &'a TypeDeclaration<'a> {
        self.type_declaration(pos, modifiers, NodeFlags::NONE)
    }

    fn type_declaration(
        &mut self,
        pos: u32,
        modifiers: ModifierList<'a>,
        flags: NodeFlags,
    ) -> &'a TypeDeclaration<'a> {
        let keyword_pos = self.token_pos();
        let type_kind = match self.current_token() {
            SyntaxKind::ClassKeyword => TypeKind::Class,
            SyntaxKind::InterfaceKeyword => TypeKind::Interface,
            SyntaxKind::EnumKeyword => TypeKind::Enum,
            SyntaxKind::AtToken => {
                self.next_token();
                TypeKind::Annotation
            }
            _ => TypeKind::Record,
        };
        self.next_token();
        let keyword_range = TextRange::new(keyword_pos, self.last_end());
        match type_kind {
            TypeKind::Enum => self.require_level(SourceLevel::JAVA_5, "Enum declarations", keyword_range),
            TypeKind::Annotation => {
                self.require_level(SourceLevel::JAVA_5, "Annotation type declarations", keyword_range)
            }
            TypeKind::Record => self.require_level(SourceLevel::JAVA_16, "Records", keyword_range),
            TypeKind::Class | TypeKind::Interface => {}
        }

        let at_assist = self.at_assist_token() && !self.is_completion();
        let name = self.expect_identifier();
        if at_assist {
            self.declaration_assist(
                AssistKind::SelectOnTypeDeclaration,
                AssistKind::SelectOnTypeDeclaration,
                &name,
            );
        }
        trace!(kind = type_kind.keyword(), name = name.text, "type declaration");

        let type_parameters = self.parse_type_parameters();
        let record_components = if type_kind == TypeKind::Record {
            self.parse_formal_parameters(Construct::RecordHeader, SyntaxKind::RecordComponent)
        } else {
            &[]
        };
        let extends = if self.optional_token(SyntaxKind::ExtendsKeyword) {
            if type_kind == TypeKind::Interface {
                self.parse_type_list(TypeContext::Reference)
            } else {
                let ty = self.parse_type(TypeContext::Reference);
                self.list(vec![ty])
            }
        } else {
            &[]
        };
        let implements = if self.optional_token(SyntaxKind::ImplementsKeyword) {
            self.parse_type_list(TypeContext::Reference)
        } else {
            &[]
        };
        let permits = if self.at_contextual("permits") {
            let range = self.token_range();
            self.next_token();
            self.require_level(SourceLevel::JAVA_17, "Sealed classes", range);
            self.parse_type_list(TypeContext::Reference)
        } else {
            &[]
        };
        if !self.at(SyntaxKind::OpenBraceToken) && !self.is_insertion_boundary(SyntaxKind::OpenBraceToken) {
            self.skip_to_boundary(CLASS_HEADER_BOUNDARY);
        }

        self.type_names.push(name.text);
        let body_pos = self.token_pos();
        let present = self.at(SyntaxKind::OpenBraceToken);
        let (enum_constants, members, dropped) = self.parse_class_body(type_kind);
        self.type_names.pop();
        let body_range = if present {
            TextRange::new(body_pos, self.last_end().max(body_pos))
        } else {
            TextRange::empty(body_pos)
        };

        let mut data = self.finish(type_kind.syntax_kind(), pos).with_flags(flags);
        if dropped {
            data.flags |= NodeFlags::HAS_SYNTAX_ERRORS;
        }
        self.alloc(TypeDeclaration {
            data,
            type_kind,
            modifiers,
            name,
            type_parameters,
            record_components,
            extends,
            implements,
            permits,
            enum_constants,
            members,
            body_range,
        })
    }

    /// `{ constants; members }`. Returns whether statements found among
    /// the members were discarded.
    fn parse_class_body(
        &mut self,
        type_kind: TypeKind,
    ) -> (NodeList<'a, EnumConstant<'a>>, NodeList<'a, Member<'a>>, bool) {
        let construct = match type_kind {
            TypeKind::Class => Construct::ClassBody,
            TypeKind::Interface => Construct::InterfaceBody,
            TypeKind::Enum => Construct::EnumBody,
            TypeKind::Record => Construct::RecordBody,
            TypeKind::Annotation => Construct::AnnotationTypeBody,
        };
        self.open_bracket(SyntaxKind::OpenBraceToken, construct);
        let constants = if type_kind == TypeKind::Enum {
            self.parse_enum_constants()
        } else {
            &[]
        };
        let (members, dropped) = self.parse_members(type_kind);
        self.close_bracket(None);
        (constants, members, dropped)
    }

    /// The body of an anonymous class or enum constant. Methods inside are
    /// always parsed in full, in diet mode too.
    pub(crate) fn parse_anonymous_body(&mut self) -> NodeList<'a, Member<'a>> {
        let mode = std::mem::replace(&mut self.mode, ParseMode::Full);
        self.type_names.push("");
        self.open_bracket(SyntaxKind::OpenBraceToken, Construct::ClassBody);
        let (members, _) = self.parse_members(TypeKind::Class);
        self.close_bracket(None);
        self.type_names.pop();
        self.mode = mode;
        members
    }

    fn parse_enum_constants(&mut self) -> NodeList<'a, EnumConstant<'a>> {
        let mut constants = Vec::new();
        loop {
            if !self.tick() {
                break;
            }
            match self.current_token() {
                SyntaxKind::SemicolonToken => {
                    self.next_token();
                    break;
                }
                SyntaxKind::Identifier | SyntaxKind::AtToken => {}
                _ => break,
            }
            let pos = self.token_pos();
            let annotations = self.parse_annotations();
            let at_assist = self.at_assist_token();
            let name = self.expect_identifier();
            if at_assist {
                self.declaration_assist(
                    AssistKind::CompleteOnFieldName,
                    AssistKind::SelectOnFieldDeclaration,
                    &name,
                );
            }
            let arguments = if self.at(SyntaxKind::OpenParenToken) {
                Some(self.parse_arguments().list)
            } else {
                None
            };
            let body = if self.at(SyntaxKind::OpenBraceToken) {
                Some(self.parse_anonymous_body())
            } else {
                None
            };
            constants.push(self.finished(EnumConstant {
                data: self.finish(SyntaxKind::EnumConstant, pos),
                annotations,
                name,
                arguments,
                body,
            }));
            if self.optional_token(SyntaxKind::CommaToken) {
                continue;
            }
            if self.optional_token(SyntaxKind::SemicolonToken) {
                break;
            }
            break;
        }
        self.list(constants)
    }

    // ========================================================================
    // Members
    // ========================================================================

    /// Members up to the closing brace.
    fn parse_members(&mut self, type_kind: TypeKind) -> (NodeList<'a, Member<'a>>, bool) {
        let mut members = Vec::new();
        let mut dropped = false;
        loop {
            if !self.tick() {
                break;
            }
            let current = self.current_token();
            if current == SyntaxKind::CloseBraceToken || current == SyntaxKind::EndOfFileToken {
                break;
            }
            if current.is_close_bracket() {
                if self.at_stray_closer() {
                    self.delete_current();
                    continue;
                }
                break;
            }
            if current == SyntaxKind::SemicolonToken {
                self.unnecessary_semicolon();
                continue;
            }
            if is_statement_only_start(current) {
                dropped |= self.parse_misplaced_statements(&mut members);
                continue;
            }
            let before = self.token_pos();
            if let Some(member) = self.parse_member(type_kind) {
                members.push(member);
            }
            if self.token_pos() == before {
                self.skip_to_boundary(MEMBER_BOUNDARY);
            }
        }
        (self.list(members), dropped)
    }

    /// Statements written directly in a class body. They are reported once
    /// and, with statement recovery on, kept inside a synthesized
    /// initializer. Returns whether they were discarded.
    fn parse_misplaced_statements(&mut self, members: &mut Vec<Member<'a>>) -> bool {
        let pos = self.token_pos();
        let mut statements = Vec::new();
        while is_statement_only_start(self.current_token()) {
            if !self.tick() {
                break;
            }
            let before = self.token_pos();
            statements.push(self.parse_statement());
            if self.token_pos() == before {
                self.next_token();
            }
        }
        let range = TextRange::new(pos, self.last_end().max(pos));
        self.report(range, &messages::MISPLACED_CONSTRUCTS, &[]);
        if !self.statement_recovery_enabled() {
            return true;
        }
        debug!(pos = range.pos, end = range.end, "wrapping misplaced statements");
        let block = self.alloc(Block {
            data: NodeData::new(SyntaxKind::Block, range.pos, range.end).with_flags(NodeFlags::SYNTHESIZED),
            statements: self.list(statements),
        });
        let initializer = self.alloc(Initializer {
            data: NodeData::new(SyntaxKind::Initializer, range.pos, range.end)
                .with_flags(NodeFlags::SYNTHESIZED),
            modifiers: ModifierList {
                range: TextRange::empty(pos),
                ..ModifierList::default()
            },
            body: Cell::new(MethodBody::Parsed(block)),
        });
        members.push(Member::Initializer(initializer));
        self.recovery.record(RecoveryAction::WrapInBlock { range });
        false
    }

    fn parse_member(&mut self, type_kind: TypeKind) -> Option<Member<'a>> {
        let pos = self.token_pos();
        let flags = self.javadoc_flag();
        let modifiers = self.parse_modifiers(ModifierContext::Member);
        if self.at_type_keyword() {
            return Some(Member::Type(self.type_declaration(pos, modifiers, flags)));
        }
        if self.at(SyntaxKind::OpenBraceToken) {
            return Some(self.parse_initializer(pos, modifiers));
        }
        if self.is_eof() || self.at(SyntaxKind::CloseBraceToken) {
            if !modifiers.is_empty() {
                self.report_expected_after("Type");
            }
            return None;
        }

        let type_parameters = if self.at(SyntaxKind::LessThanToken) {
            self.parse_type_parameters()
        } else {
            &[]
        };

        if self.at(SyntaxKind::Identifier) {
            match self.peek() {
                SyntaxKind::OpenParenToken => {
                    return Some(self.parse_constructor(pos, modifiers, type_parameters, flags));
                }
                SyntaxKind::OpenBraceToken
                    if type_kind == TypeKind::Record
                        && self.type_names.last() == Some(&self.token_value()) =>
                {
                    return Some(self.parse_compact_constructor(pos, modifiers, flags));
                }
                _ => {}
            }
        }

        let return_type = if self.at(SyntaxKind::VoidKeyword) {
            self.parse_primitive_type()
        } else {
            self.parse_type(TypeContext::Reference)
        };
        let is_method = self.at(SyntaxKind::OpenParenToken)
            || (self.at(SyntaxKind::Identifier) && self.peek() == SyntaxKind::OpenParenToken);
        if is_method {
            let kind = if type_kind == TypeKind::Annotation {
                SyntaxKind::AnnotationMethodDeclaration
            } else {
                SyntaxKind::MethodDeclaration
            };
            let name = self.method_name();
            return Some(self.parse_method_rest(
                pos,
                MethodHead {
                    kind,
                    flags,
                    modifiers,
                    type_parameters,
                    return_type: Some(return_type),
                    name,
                },
            ));
        }
        Some(self.parse_field(pos, modifiers, return_type, flags))
    }

    fn parse_initializer(&mut self, pos: u32, modifiers: ModifierList<'a>) -> Member<'a> {
        let mut data_flags = NodeFlags::NONE;
        if modifiers.flags.contains(Modifiers::STATIC) {
            data_flags |= NodeFlags::STATIC;
        }
        let body = match self.mode {
            ParseMode::Full => MethodBody::Parsed(self.parse_block(Construct::Block)),
            ParseMode::Diet => MethodBody::Deferred(self.skip_body()),
        };
        Member::Initializer(self.alloc(Initializer {
            data: self.finish(SyntaxKind::Initializer, pos).with_flags(data_flags),
            modifiers,
            body: Cell::new(body),
        }))
    }

    fn parse_field(
        &mut self,
        pos: u32,
        modifiers: ModifierList<'a>,
        ty: TypeRef<'a>,
        flags: NodeFlags,
    ) -> Member<'a> {
        let declarators = self.parse_variable_declarators(
            AssistKind::CompleteOnFieldName,
            AssistKind::SelectOnFieldDeclaration,
        );
        self.expect(SyntaxKind::SemicolonToken, Construct::FieldDeclaration);
        Member::Field(self.alloc(FieldDeclaration {
            data: self.finish(SyntaxKind::FieldDeclaration, pos).with_flags(flags),
            modifiers,
            ty,
            declarators,
        }))
    }

    /// The name of a method or constructor. Selecting it selects the
    /// declaration.
    fn method_name(&mut self) -> Identifier<'a> {
        let at_assist = self.at_assist_token() && !self.is_completion();
        let name = self.expect_identifier();
        if at_assist {
            self.declaration_assist(
                AssistKind::SelectOnMethodDeclaration,
                AssistKind::SelectOnMethodDeclaration,
                &name,
            );
        }
        name
    }

    /// `Name(...)` without a return type. Only a constructor when the name
    /// is the enclosing type's.
    fn parse_constructor(
        &mut self,
        pos: u32,
        modifiers: ModifierList<'a>,
        type_parameters: NodeList<'a, TypeParameter<'a>>,
        flags: NodeFlags,
    ) -> Member<'a> {
        let name = self.method_name();
        let is_constructor = self.type_names.last() == Some(&name.text);
        if !is_constructor {
            self.report(name.data.range, &messages::RETURN_TYPE_MISSING, &[]);
        }
        let kind = if is_constructor {
            SyntaxKind::ConstructorDeclaration
        } else {
            SyntaxKind::MethodDeclaration
        };
        self.parse_method_rest(
            pos,
            MethodHead {
                kind,
                flags,
                modifiers,
                type_parameters,
                return_type: None,
                name,
            },
        )
    }

    /// `Name { ... }` in a record.
    fn parse_compact_constructor(
        &mut self,
        pos: u32,
        modifiers: ModifierList<'a>,
        flags: NodeFlags,
    ) -> Member<'a> {
        let name = self.method_name();
        let body = self.parse_method_body();
        Member::Method(self.alloc(MethodDeclaration {
            data: self
                .finish(SyntaxKind::ConstructorDeclaration, pos)
                .with_flags(flags | NodeFlags::COMPACT_CONSTRUCTOR),
            modifiers,
            type_parameters: &[],
            return_type: None,
            name,
            parameters: &[],
            extra_dims: 0,
            throws: &[],
            default_value: None,
            body: Cell::new(body),
        }))
    }

    /// Parameters, dimensions, `throws`, `default` and body of a method
    /// whose head is already parsed.
    fn parse_method_rest(&mut self, pos: u32, head: MethodHead<'a>) -> Member<'a> {
        let parameters = self.parse_formal_parameters(Construct::FormalParameterList, SyntaxKind::Parameter);
        let dims_pos = self.token_pos();
        let extra_dims = self.parse_dims();
        if extra_dims > 0 {
            let range = TextRange::new(dims_pos, self.last_end());
            self.report_configurable(
                ConfigurableProblem::DeprecatedSyntax,
                range,
                &messages::DEPRECATED_METHOD_DIMENSIONS,
                &[],
            );
        }
        let throws = if self.optional_token(SyntaxKind::ThrowsKeyword) {
            self.parse_type_list(TypeContext::Exception)
        } else {
            &[]
        };
        let default_value = if self.at(SyntaxKind::DefaultKeyword) {
            self.next_token();
            Some(self.parse_element_value())
        } else {
            None
        };
        let body = self.parse_method_body();
        Member::Method(self.alloc(MethodDeclaration {
            data: self.finish(head.kind, pos).with_flags(head.flags),
            modifiers: head.modifiers,
            type_parameters: head.type_parameters,
            return_type: head.return_type,
            name: head.name,
            parameters,
            extra_dims,
            throws,
            default_value,
            body: Cell::new(body),
        }))
    }

    /// `;`, or a body in braces. Diet mode records where the body is and
    /// moves past it.
    pub(crate) fn parse_method_body(&mut self) -> MethodBody<'a> {
        match self.current_token() {
            SyntaxKind::SemicolonToken => {
                self.next_token();
                MethodBody::None
            }
            SyntaxKind::OpenBraceToken => match self.mode {
                ParseMode::Full => MethodBody::Parsed(self.parse_block(Construct::MethodBody)),
                ParseMode::Diet => MethodBody::Deferred(self.skip_body()),
            },
            _ => {
                self.insert_missing(
                    SyntaxKind::SemicolonToken,
                    Construct::MethodDeclaration.label(),
                );
                MethodBody::None
            }
        }
    }

    // ========================================================================
    // Parameters
    // ========================================================================

    /// `( parameters )`. Only the last parameter may be variable arity.
    fn parse_formal_parameters(
        &mut self,
        construct: Construct,
        kind: SyntaxKind,
    ) -> NodeList<'a, Parameter<'a>> {
        self.open_bracket(SyntaxKind::OpenParenToken, construct);
        let mut parameters: Vec<Parameter<'a>> = Vec::new();
        if !self.at(SyntaxKind::CloseParenToken) {
            loop {
                if !self.tick() || self.is_insertion_boundary(SyntaxKind::CloseParenToken) {
                    break;
                }
                parameters.push(self.parameter(ModifierContext::Local, kind));
                if !self.optional_token(SyntaxKind::CommaToken) {
                    break;
                }
            }
        }
        self.close_bracket(None);
        if let Some((_, init)) = parameters.split_last() {
            let misplaced: Vec<TextRange> = init
                .iter()
                .filter(|p| p.data.flags.contains(NodeFlags::VARARGS))
                .map(|p| p.data.range)
                .collect();
            for range in misplaced {
                self.report(range, &messages::VARARGS_NOT_LAST, &[]);
            }
        }
        self.list(parameters)
    }

    /// A typed parameter of a method, lambda or catch clause.
    pub(crate) fn parse_formal_parameter(&mut self, ctx: ModifierContext) -> Parameter<'a> {
        self.parameter(ctx, SyntaxKind::Parameter)
    }

    fn parameter(&mut self, ctx: ModifierContext, kind: SyntaxKind) -> Parameter<'a> {
        let pos = self.token_pos();
        let modifiers = self.parse_modifiers(ctx);
        let ty = self.parse_type(TypeContext::Reference);
        let mut flags = NodeFlags::NONE;
        if self.at(SyntaxKind::DotDotDotToken) {
            let range = self.token_range();
            self.next_token();
            self.require_level(SourceLevel::JAVA_5, "Variable arity methods", range);
            flags |= NodeFlags::VARARGS;
        }
        let at_assist = self.at_assist_token();
        let name = self.expect_identifier();
        if at_assist {
            self.declaration_assist(AssistKind::CompleteOnArgumentName, AssistKind::SelectOnParameter, &name);
        }
        let extra_dims = self.parse_dims();
        self.finished(Parameter {
            data: self.finish(kind, pos).with_flags(flags),
            modifiers,
            ty: Some(ty),
            name,
            extra_dims,
        })
    }
}

/// What a method declaration looks like up to its name.
struct MethodHead<'a> {
    kind: SyntaxKind,
    flags: NodeFlags,
    modifiers: ModifierList<'a>,
    type_parameters: NodeList<'a, TypeParameter<'a>>,
    return_type: Option<TypeRef<'a>>,
    name: Identifier<'a>,
}

#[cfg(test)]
mod tests {
    use crate::parser::{ParseMode, Parser};
    use bumpalo::Bump;
    use javelin_ast::node::*;
    use javelin_ast::syntax_kind::SyntaxKind;
    use javelin_ast::types::*;
    use javelin_core::intern::StringInterner;
    use javelin_options::{ResolvedOptions, SourceLevel};

    fn with_unit<R>(
        source: &str,
        options: ResolvedOptions,
        f: impl FnOnce(&CompilationUnit<'_>, Vec<String>) -> R,
    ) -> R {
        let arena = Bump::new();
        let mut p = Parser::new(&arena, source, StringInterner::new(), options, ParseMode::Full);
        let unit = p.parse_compilation_unit("X.java");
        let messages = p.diagnostics.messages().into_iter().map(String::from).collect();
        f(unit, messages)
    }

    fn parse<R>(source: &str, f: impl FnOnce(&CompilationUnit<'_>, Vec<String>) -> R) -> R {
        with_unit(source, ResolvedOptions::default(), f)
    }

    #[test]
    fn test_package_and_imports() {
        parse(
            "package a.b; import java.util.*; import static java.lang.Math.max; class X {}",
            |unit, messages| {
                assert!(messages.is_empty(), "{messages:?}");
                assert_eq!(unit.package.map(|p| p.name.dotted()), Some("a.b".to_string()));
                assert_eq!(unit.imports.len(), 2);
                assert!(unit.imports[0].data.flags.contains(NodeFlags::ON_DEMAND));
                assert!(unit.imports[1].data.flags.contains(NodeFlags::STATIC));
                assert_eq!(unit.imports[1].name.dotted(), "java.lang.Math.max");
            },
        );
    }

    #[test]
    fn test_member_kinds() {
        let source = "class X { int a, b[] = {}; X() {} <T> void m(T t) throws E {} static {} { } class Y {} }";
        parse(source, |unit, messages| {
            assert!(messages.is_empty(), "{messages:?}");
            let kinds: Vec<SyntaxKind> = unit.types[0]
                .members
                .iter()
                .map(|m| match m {
                    Member::Field(f) => f.data.kind,
                    Member::Method(m) => m.data.kind,
                    Member::Initializer(i) => i.data.kind,
                    Member::Type(t) => t.data.kind,
                })
                .collect();
            assert_eq!(
                kinds,
                vec![
                    SyntaxKind::FieldDeclaration,
                    SyntaxKind::ConstructorDeclaration,
                    SyntaxKind::MethodDeclaration,
                    SyntaxKind::Initializer,
                    SyntaxKind::Initializer,
                    SyntaxKind::ClassDeclaration,
                ]
            );
            let Member::Initializer(init) = unit.types[0].members[3] else {
                panic!("expected initializer");
            };
            assert!(init.is_static());
        });
    }

    #[test]
    fn test_modern_type_declarations() {
        let source = "sealed interface S permits A {} non-sealed class A implements S {} \
                      record P(int x, int y) { P { } } enum E { A(1), B { void f() {} }; E(int i) {} E() {} } \
                      @interface Ann { int value() default 1; }";
        parse(source, |unit, messages| {
            assert!(messages.is_empty(), "{messages:?}");
            let kinds: Vec<TypeKind> = unit.types.iter().map(|t| t.type_kind).collect();
            assert_eq!(
                kinds,
                vec![TypeKind::Interface, TypeKind::Class, TypeKind::Record, TypeKind::Enum, TypeKind::Annotation]
            );
            assert!(unit.types[0].modifiers.flags.contains(Modifiers::SEALED));
            assert!(unit.types[1].modifiers.flags.contains(Modifiers::NON_SEALED));
            assert_eq!(unit.types[2].record_components.len(), 2);
            let Member::Method(compact) = unit.types[2].members[0] else {
                panic!("expected compact constructor");
            };
            assert!(compact.data.flags.contains(NodeFlags::COMPACT_CONSTRUCTOR));
            assert_eq!(unit.types[3].enum_constants.len(), 2);
            assert!(unit.types[3].enum_constants[1].body.is_some());
            let Member::Method(element) = unit.types[4].members[0] else {
                panic!("expected annotation element");
            };
            assert!(element.default_value.is_some());
        });
    }

    #[test]
    fn test_annotations_on_declarations() {
        parse(
            "@Deprecated @SuppressWarnings({\"a\", \"b\"}) @A(x = 1, y = @B) public class X {}",
            |unit, messages| {
                assert!(messages.is_empty(), "{messages:?}");
                let annotations = unit.types[0].modifiers.annotations;
                assert_eq!(annotations.len(), 3);
                assert!(matches!(annotations[0].args, AnnotationArgs::Marker));
                assert!(matches!(annotations[1].args, AnnotationArgs::Single(Expression::ArrayInitializer(_))));
                assert!(matches!(annotations[2].args, AnnotationArgs::Pairs(pairs) if pairs.len() == 2));
            },
        );
    }

    #[test]
    fn test_constructor_name_mismatch() {
        parse("class X { Y() {} }", |unit, messages| {
            assert_eq!(messages, vec!["Return type for the method is missing"]);
            let Member::Method(method) = unit.types[0].members[0] else {
                panic!("expected method");
            };
            assert_eq!(method.data.kind, SyntaxKind::MethodDeclaration);
        });
    }

    #[test]
    fn test_varargs_must_be_last() {
        parse("class X { void m(int... a, int b) {} }", |_, messages| {
            assert_eq!(messages, vec!["Only the last formal parameter may be variable arity"]);
        });
    }

    #[test]
    fn test_misplaced_statements_are_reported_once() {
        let source = "class X { if (a) b(); while (c) d(); void m() {} }";
        parse(source, |unit, messages| {
            assert_eq!(messages, vec!["Syntax error on token(s), misplaced construct(s)"]);
            assert_eq!(unit.types[0].members.len(), 1);
            assert!(unit.types[0].data.flags.contains(NodeFlags::HAS_SYNTAX_ERRORS));
        });

        let mut options = ResolvedOptions::default();
        options.statement_recovery = true;
        with_unit(source, options, |unit, messages| {
            assert_eq!(messages.len(), 1);
            let Member::Initializer(init) = unit.types[0].members[0] else {
                panic!("expected synthesized initializer");
            };
            assert!(init.data.flags.contains(NodeFlags::SYNTHESIZED));
            assert_eq!(init.body().block().map(|b| b.statements.len()), Some(2));
        });
    }

    #[test]
    fn test_missing_body_and_semicolon() {
        parse("class X { void m() }", |_, messages| {
            assert_eq!(messages, vec!["Syntax error, insert \";\" to complete MethodDeclaration"]);
        });
        parse("class X { int a }", |_, messages| {
            assert_eq!(messages, vec!["Syntax error, insert \";\" to complete FieldDeclaration"]);
        });
    }

    #[test]
    fn test_unclosed_class_body() {
        parse("class X { void m() {}", |unit, messages| {
            assert_eq!(messages, vec!["Syntax error, insert \"}\" to complete ClassBody"]);
            assert_eq!(unit.types[0].members.len(), 1);
        });
    }

    #[test]
    fn test_source_level_gates_records() {
        let mut options = ResolvedOptions::default();
        options.source_level = SourceLevel::JAVA_8;
        with_unit("record R(int x) {}", options, |unit, messages| {
            assert_eq!(
                messages,
                vec!["Syntax error, Records are only available if source level is 16 or above"]
            );
            assert_eq!(unit.types[0].type_kind, TypeKind::Record);
        });
    }

    #[test]
    fn test_junk_at_top_level_is_deleted() {
        parse("foo bar class X {}", |unit, messages| {
            assert_eq!(messages, vec!["Syntax error on tokens, delete these tokens"]);
            assert_eq!(unit.types.len(), 1);
        });
    }
}
