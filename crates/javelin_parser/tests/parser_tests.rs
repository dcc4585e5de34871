//! Parser integration tests.
//!
//! Drives the public `JavaParser` API: full and diet parses, recovery,
//! source level gating and completion/selection parses.

use bumpalo::Bump;
use javelin_ast::visitor::tree_shape;
use javelin_ast::{AssistKind, Member, MethodDeclaration, NodeFlags, SyntaxKind, TypeKind};
use javelin_diagnostics::DiagnosticCategory;
use javelin_options::{CompilerOptions, Severity};
use javelin_parser::{AssistError, AssistResult, JavaParser, RecoveryAction};
use javelin_printer::{print_assist, print_unit};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::collections::BTreeMap;

fn parser() -> JavaParser {
    JavaParser::new(&CompilerOptions::default()).unwrap()
}

fn parser_at(level: &str) -> JavaParser {
    let options = CompilerOptions {
        source_level: Some(level.to_string()),
        ..CompilerOptions::default()
    };
    JavaParser::new(&options).unwrap()
}

fn messages(parser: &JavaParser, source: &str) -> Vec<String> {
    let arena = Bump::new();
    let result = parser.parse(&arena, source, "Test.java");
    result.diagnostics.messages().into_iter().map(String::from).collect()
}

fn method<'a>(members: &[Member<'a>], index: usize) -> &'a MethodDeclaration<'a> {
    match members[index] {
        Member::Method(method) => method,
        other => panic!("expected a method, got {other:?}"),
    }
}

const SERVICE: &str = r#"
package org.example.service;

import java.util.*;
import java.util.function.Function;
import static java.lang.Math.max;

@SuppressWarnings("unchecked")
public class UserService<T extends Comparable<T>> implements Runnable {
    private final Map<String, List<T>> users = new HashMap<>();
    private int count = 0, limit[] = {1, 2};

    static {
        System.out.println("loaded");
    }

    public UserService(int limit) {
        this();
        this.count = limit > 0 ? limit : 10;
    }

    public UserService() {
        super();
    }

    @Override
    public void run() {
        for (int i = 0; i < count; i++) {
            if (i % 2 == 0 && i != 4) {
                continue;
            } else {
                users.put("k" + i, new ArrayList<>());
            }
        }
        for (String key : users.keySet()) {
            System.out.println(key);
        }
        Function<Integer, Integer> twice = x -> x * 2;
        Runnable r = new Runnable() {
            public void run() { count++; }
        };
        try (Scanner in = new Scanner(System.in)) {
            in.next();
        } catch (IllegalStateException | NoSuchElementException e) {
            throw new RuntimeException(e);
        } finally {
            count = max(count, 0);
        }
        int kind = switch (count) {
            case 0 -> 1;
            default -> {
                yield 2;
            }
        };
        label:
        while (true) {
            break label;
        }
        Object o = users;
        if (o instanceof Map<?, ?> m) {
            assert m.size() >= 0 : "size";
        }
        int[][] grid = new int[3][];
        String s = (String) o.toString();
        users.values().forEach(System.out::println);
    }

    protected <R> R apply(Function<? super T, ? extends R> f, T value) throws Exception {
        synchronized (this) {
            return f.apply(value);
        }
    }

    enum Color { RED, GREEN("g") { void paint() {} }, BLUE; Color() {} Color(String s) {} }

    record Point(int x, int y) {
        Point {
            if (x < 0) throw new IllegalArgumentException();
        }
    }

    @interface Marker {
        String value() default "";
    }
}
"#;

// ============================================================================
// Full and diet parses
// ============================================================================

#[test]
fn test_valid_unit_parses_cleanly() {
    let arena = Bump::new();
    let result = parser().parse(&arena, SERVICE, "UserService.java");
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics.messages());
    assert!(result.recovery.is_empty());

    let unit = result.unit;
    assert_eq!(unit.package.map(|p| p.name.dotted()), Some("org.example.service".to_string()));
    assert_eq!(unit.imports.len(), 3);
    assert!(unit.imports[0].is_on_demand());
    assert!(unit.imports[2].is_static());
    assert_eq!(unit.types.len(), 1);

    let service = unit.types[0];
    assert_eq!(service.type_kind, TypeKind::Class);
    assert_eq!(service.name.text, "UserService");
    assert_eq!(service.type_parameters.len(), 1);
    assert_eq!(service.implements.len(), 1);
    assert_eq!(service.members.len(), 10);
    assert!(method(service.members, 3).is_constructor());
}

#[test]
fn test_diet_then_bodies_equals_full_parse() {
    let parser = parser();
    let full_arena = Bump::new();
    let full = parser.parse(&full_arena, SERVICE, "UserService.java");

    let diet_arena = Bump::new();
    let diet = parser.diet_parse(&diet_arena, SERVICE, "UserService.java");
    assert!(diet.diagnostics.is_empty());
    let run = method(diet.unit.types[0].members, 5);
    assert_eq!(run.name.text, "run");
    assert!(run.body().deferred_range().is_some());

    let bodies = parser.parse_bodies(&diet_arena, diet.unit);
    assert!(bodies.is_empty(), "{:?}", bodies.messages());
    assert!(run.body().block().is_some());
    assert_eq!(tree_shape(diet.unit), tree_shape(full.unit));
    assert_eq!(print_unit(diet.unit), print_unit(full.unit));
}

#[test]
fn test_parse_single_method_body() {
    let parser = parser();
    let arena = Bump::new();
    let source = "class X { void a() { one(); } void b() { two(); three(); } }";
    let diet = parser.diet_parse(&arena, source, "X.java");
    let b = method(diet.unit.types[0].members, 1);

    let diagnostics = parser.parse_method_body(&arena, diet.unit, b);
    assert!(diagnostics.is_empty());
    assert_eq!(b.body().block().map(|block| block.statements.len()), Some(2));
    assert!(method(diet.unit.types[0].members, 0).body().deferred_range().is_some());
}

#[test]
fn test_printer_round_trip() {
    let arena = Bump::new();
    let source = "class X {\n    int f(int a) {\n        return a + 1;\n    }\n}\n";
    let result = parser().parse(&arena, source, "X.java");
    assert_eq!(print_unit(result.unit), source);
}

#[test]
fn test_shared_parser_across_threads() {
    let parser = parser();
    std::thread::scope(|scope| {
        for i in 0..4 {
            let parser = &parser;
            scope.spawn(move || {
                let source = format!("class T{i} {{ int f() {{ return {i}; }} }}");
                let arena = Bump::new();
                let result = parser.parse(&arena, &source, "T.java");
                assert!(result.diagnostics.is_empty());
                assert_eq!(result.unit.types[0].name.text, format!("T{i}"));
            });
        }
    });
}

// ============================================================================
// Recovery
// ============================================================================

#[test]
fn test_unclosed_if_block_before_member() {
    let source = "public class X { void foo(){ if(true){ } public void bar(){ } }";
    let parser = parser();
    let arena = Bump::new();
    let result = parser.parse(&arena, source, "X.java");
    assert_eq!(
        result.diagnostics.messages(),
        vec!["Syntax error, insert \"}\" to complete Statement"]
    );
    let members = result.unit.types[0].members;
    assert_eq!(members.len(), 2);
    assert_eq!(method(members, 1).name.text, "bar");
    assert!(matches!(
        result.recovery.actions(),
        [RecoveryAction::InsertToken { construct: "Statement", .. }]
    ));

    // The diet parse stops the skip at `public`; the body parse reports
    // the missing brace.
    let diet_arena = Bump::new();
    let diet = parser.diet_parse(&diet_arena, source, "X.java");
    assert!(diet.diagnostics.is_empty());
    assert_eq!(method(diet.unit.types[0].members, 1).name.text, "bar");
    let bodies = parser.parse_bodies(&diet_arena, diet.unit);
    assert_eq!(bodies.messages(), vec!["Syntax error, insert \"}\" to complete Statement"]);
}

#[test]
fn test_statement_recovery_switch() {
    let source = "class X { if (a) b(); while (c) d(); void m() {} }";
    let mut parser = parser();

    let arena = Bump::new();
    let dropped = parser.parse(&arena, source, "X.java");
    assert_eq!(
        dropped.diagnostics.messages(),
        vec!["Syntax error on token(s), misplaced construct(s)"]
    );
    assert_eq!(dropped.unit.types[0].members.len(), 1);

    parser.set_statement_recovery_enabled(true);
    let arena = Bump::new();
    let kept = parser.parse(&arena, source, "X.java");
    assert_eq!(kept.diagnostics.len(), 1);
    assert_eq!(kept.unit.types[0].members.len(), 2);
    let Member::Initializer(init) = kept.unit.types[0].members[0] else {
        panic!("expected a synthesized initializer");
    };
    assert!(init.data.flags.contains(NodeFlags::SYNTHESIZED));
    assert!(kept
        .recovery
        .iter()
        .any(|action| matches!(action, RecoveryAction::WrapInBlock { .. })));
}

#[test]
fn test_missing_semicolon_is_inserted() {
    let parser = parser();
    assert_eq!(
        messages(&parser, "class X { void m() { foo() } }"),
        vec!["Syntax error, insert \";\" to complete BlockStatements"]
    );
}

#[test]
fn test_operator_after_instanceof_type_is_reported() {
    let parser = parser();
    let arena = Bump::new();
    let result = parser.parse(&arena, "class X { boolean b = o instanceof Foo * 2; }", "X.java");
    assert_eq!(
        result.diagnostics.messages(),
        vec!["Syntax error on token \"*\", the type of an instanceof cannot be an operand"]
    );
    let printed = print_unit(result.unit);
    assert!(printed.contains("o instanceof Foo"), "{printed}");
    assert!(printed.contains("* 2"), "{printed}");
}

#[test]
fn test_deep_nesting_reports_instead_of_overflowing() {
    let depth = 2_000;
    let source = format!(
        "class X {{ int f() {{ return {}1{}; }} }}",
        "(".repeat(depth),
        ")".repeat(depth)
    );
    let handle = std::thread::Builder::new()
        .stack_size(64 * 1024 * 1024)
        .spawn(move || messages(&parser(), &source))
        .unwrap();
    let messages = handle.join().unwrap();
    assert!(
        messages.iter().any(|m| m.contains("nested too deeply")),
        "{messages:?}"
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_parse_terminates_on_arbitrary_input(source in "[a-z{}();=.,<>\\[\\] +\"'@:?-]{0,120}") {
        let parser = parser();
        let arena = Bump::new();
        let result = parser.parse(&arena, &source, "Fuzz.java");
        prop_assert!(result.unit.data.range.end as usize <= source.chars().count());
    }

    #[test]
    fn prop_diet_terminates_on_token_soup(
        words in prop::collection::vec(
            prop::sample::select(vec![
                "class", "X", "{", "}", "(", ")", ";", "void", "m", "public",
                "if", "else", "new", "int", "=", "1", "return", "static", ",",
            ]),
            0..60,
        )
    ) {
        let source = words.join(" ");
        let parser = parser();
        let arena = Bump::new();
        let diet = parser.diet_parse(&arena, &source, "Soup.java");
        let _ = parser.parse_bodies(&arena, diet.unit);
    }
}

// ============================================================================
// Options
// ============================================================================

#[test]
fn test_features_are_gated_by_source_level() {
    let source = "class X { void m() { Runnable r = () -> {}; } }";
    assert!(messages(&parser(), source).is_empty());
    assert_eq!(
        messages(&parser_at("1.7"), source),
        vec!["Syntax error, Lambda expressions are only available if source level is 1.8 or above"]
    );
    assert_eq!(
        messages(&parser_at("1.8"), "record P(int x) {}"),
        vec!["Syntax error, Records are only available if source level is 16 or above"]
    );
}

#[test]
fn test_configured_severity() {
    let mut severities = BTreeMap::new();
    severities.insert("sourceLevelFeature".to_string(), Severity::Warning);
    let options = CompilerOptions {
        source_level: Some("1.7".to_string()),
        severities: Some(severities),
        ..CompilerOptions::default()
    };
    let parser = JavaParser::new(&options).unwrap();
    let arena = Bump::new();
    let result = parser.parse(&arena, "class X { Runnable r = () -> {}; }", "X.java");
    assert_eq!(result.diagnostics.len(), 1);
    assert!(!result.diagnostics.has_errors());
    assert_eq!(result.diagnostics.diagnostics()[0].category, DiagnosticCategory::Warning);
}

#[test]
fn test_invalid_options_are_rejected() {
    let options = CompilerOptions {
        source_level: Some("banana".to_string()),
        ..CompilerOptions::default()
    };
    assert!(JavaParser::new(&options).is_err());
}

// ============================================================================
// Completion and selection
// ============================================================================

#[test]
fn test_complete_inside_argument_list() {
    let source = "class Bar { void foo(){ this.fred(1, 2, i); } }";
    let cursor = (source.find("fred(").unwrap() + "fred(".len()) as u32;
    let arena = Bump::new();
    let result = parser().parse_for_completion(&arena, source, "Bar.java", cursor).unwrap();
    let node = result.assist.expect("assist node");
    assert_eq!(node.assist_kind, AssistKind::CompleteOnMessageSend);
    assert_eq!(print_assist(node), "this.fred()");
    assert_eq!(node.prefix, "");
    assert_eq!(result.replaced_text().as_deref(), Some("fred("));
}

#[test]
fn test_complete_qualified_name() {
    let source = "class X { void m(Object e) { e.has } }";
    let cursor = (source.find("e.has").unwrap() + "e.has".len()) as u32;
    let arena = Bump::new();
    let result = parser().parse_for_completion(&arena, source, "X.java", cursor).unwrap();
    let node = result.assist.expect("assist node");
    assert_eq!(node.prefix, "has");
    assert_eq!(result.replaced_text().as_deref(), Some("e.has"));
    assert_eq!(print_assist(node), "e.has");
}

#[test]
fn test_select_message_send_in_constructor_call() {
    let source = "class X { X() { super(fred()); } }";
    let start = source.find("fred").unwrap() as u32;
    let arena = Bump::new();
    let result = parser()
        .parse_for_selection(&arena, source, "X.java", start, start + 4)
        .unwrap();
    let node = result.assist.expect("assist node");
    assert_eq!(node.assist_kind, AssistKind::SelectOnMessageSend);
    assert_eq!(result.replaced_text().as_deref(), Some("fred()"));
}

#[test]
fn test_assist_parses_only_the_containing_body() {
    let source = "class X { void a() { one(); } void b() { two.th } }";
    let cursor = (source.find("two.th").unwrap() + "two.th".len()) as u32;
    let arena = Bump::new();
    let result = parser().parse_for_completion(&arena, source, "X.java", cursor).unwrap();
    assert!(result.assist.is_some());
    let members = result.unit.types[0].members;
    assert!(method(members, 0).body().deferred_range().is_some());
    assert!(method(members, 1).body().block().is_some());
}

/// Run a completion parse at `|`, or a selection parse between the two
/// `$` markers.
fn assist_at<'a>(arena: &'a Bump, marked: &str) -> AssistResult<'a> {
    let parser = parser();
    if let Some(cursor) = marked.find('|') {
        let source = marked.replace('|', "");
        return parser.parse_for_completion(arena, &source, "X.java", cursor as u32).unwrap();
    }
    let start = marked.find('$').expect("selection start");
    let end = marked.rfind('$').expect("selection end") - 1;
    let source = marked.replace('$', "");
    parser
        .parse_for_selection(arena, &source, "X.java", start as u32, end as u32)
        .unwrap()
}

struct AssistCase {
    source: &'static str,
    kind: AssistKind,
    prefix: &'static str,
    replaced: &'static str,
    parent: Option<SyntaxKind>,
}

const fn case(
    source: &'static str,
    kind: AssistKind,
    prefix: &'static str,
    replaced: &'static str,
    parent: Option<SyntaxKind>,
) -> AssistCase {
    AssistCase {
        source,
        kind,
        prefix,
        replaced,
        parent,
    }
}

#[test]
fn test_assist_kinds() {
    use AssistKind::*;
    let cases = [
        case("class X { void m() { ba| } }", CompleteOnName, "ba", "ba", Some(SyntaxKind::ExpressionStatement)),
        case("class X { void m() { ba|", CompleteOnName, "ba", "ba", None),
        case("class X { void m() { foo.ba|", CompleteOnQualifiedName, "ba", "foo.ba", None),
        case("class X { void m() { if (a.b|", CompleteOnQualifiedName, "b", "a.b", None),
        case("class X { void m() { this.fo| } }", CompleteOnMemberAccess, "fo", "fo", None),
        case("class X { void m() { foo.ba|(); } }", CompleteOnMessageSendName, "ba", "ba", None),
        case("class X { void m() { this.fred(1, |); } }", CompleteOnMessageSend, "", "fred(1, ", None),
        case("class X { Str| f; }", CompleteOnType, "Str", "Str", Some(SyntaxKind::FieldDeclaration)),
        case("class X { java.util.Li| f; }", CompleteOnQualifiedType, "Li", "java.util.Li", None),
        case("class X { void m() throws IOExc| {} }", CompleteOnException, "IOExc", "IOExc", None),
        case("class X { @Overr| void m() {} }", CompleteOnAnnotation, "Overr", "Overr", None),
        case("class X { Object o = new Foo(|); }", CompleteOnAllocation, "", "Foo(", None),
        case("class X { X() { super(|); } }", CompleteOnExplicitConstructorCall, "", "super(", None),
        case("class X { Object c = String.class|; }", CompleteOnClassLiteralAccess, "class", "class", None),
        case("import java.ut|;\nclass X {}", CompleteOnImport, "ut", "java.ut", None),
        case("package org.exa|;\nclass X {}", CompleteOnPackage, "exa", "org.exa", None),
        case("class X { void m() { outer: for (;;) { break ou|; } } }", CompleteOnLabel, "ou", "ou", None),
        case("class X { void m() { String na| = null; } }", CompleteOnLocalName, "na", "na", None),
        case("class X { int cou| = 0; }", CompleteOnFieldName, "cou", "cou", None),
        case("class X { void m(String na|) {} }", CompleteOnArgumentName, "na", "na", None),
        case(
            "class X { Runnable r = new Runnable() { public void run() { fo| } }; }",
            CompleteOnName,
            "fo",
            "fo",
            Some(SyntaxKind::ExpressionStatement),
        ),
        case("class X { int m() { return $foo$; } }", SelectOnName, "", "foo", Some(SyntaxKind::ReturnStatement)),
        case("class X { int m() { return foo.$bar$; } }", SelectOnQualifiedName, "", "foo.bar", None),
        case("class X { int m() { return this.$count$; } }", SelectOnFieldReference, "", "this.count", None),
        case("class X { $Foo$ f; }", SelectOnType, "", "Foo", Some(SyntaxKind::FieldDeclaration)),
        case("class X { java.util.$List$ f; }", SelectOnQualifiedType, "", "java.util.List", None),
        case("class X { Object o = new $Foo$(1); }", SelectOnAllocation, "", "new Foo(1)", None),
        case("class X { X() { $this$(1); } }", SelectOnExplicitConstructorCall, "", "this(1)", None),
        case("import java.$util$.List;\nclass X {}", SelectOnImport, "", "java.util", None),
        case("package org.$example$;\nclass X {}", SelectOnPackage, "", "org.example", None),
        case("class $Foo$ {}", SelectOnTypeDeclaration, "", "Foo", None),
        case("class X { void $run$() {} }", SelectOnMethodDeclaration, "", "run", Some(SyntaxKind::MethodDeclaration)),
        case("class X { int $count$; }", SelectOnFieldDeclaration, "", "count", Some(SyntaxKind::VariableDeclarator)),
        case("class X { void m() { int $n$ = 1; } }", SelectOnLocalDeclaration, "", "n", Some(SyntaxKind::VariableDeclarator)),
        case("class X { void m(int $n$) {} }", SelectOnParameter, "", "n", Some(SyntaxKind::Parameter)),
    ];
    for case in &cases {
        let arena = Bump::new();
        let result = assist_at(&arena, case.source);
        let Some(node) = result.assist else {
            panic!("{}: no assist node", case.source);
        };
        assert_eq!(node.assist_kind, case.kind, "{}", case.source);
        assert_eq!(node.prefix, case.prefix, "{}", case.source);
        assert_eq!(result.replaced_text().as_deref(), Some(case.replaced), "{}", case.source);
        if let Some(kind) = case.parent {
            assert_eq!(result.parent.as_ref().map(|p| p.kind), Some(kind), "{}", case.source);
        }
    }
}

#[test]
fn test_complete_at_end_of_unclosed_body() {
    let arena = Bump::new();
    let result = assist_at(&arena, "class X { void m() { foo.ba|");
    let node = result.assist.expect("assist node");
    assert_eq!(print_assist(node), "foo.ba");
    let members = result.unit.types[0].members;
    assert!(method(members, 0).body().block().is_some());
}

#[test]
fn test_select_range_spanning_tokens() {
    let arena = Bump::new();
    let result = assist_at(&arena, "class X { void m() { $foo.bar$(); } }");
    let node = result.assist.expect("assist node");
    assert_eq!(node.assist_kind, AssistKind::SelectOnMessageSend);
    assert!(node.data.flags.contains(NodeFlags::COVERING));
    assert_eq!(print_assist(node), "foo.bar()");
    assert_eq!(result.replaced_text().as_deref(), Some("foo.bar()"));
    let parent = result.parent.expect("parent snapshot");
    assert_eq!(parent.kind, SyntaxKind::ExpressionStatement);
    assert_eq!(parent.source, "foo.bar();");

    // Covering a declaration header resolves to the declaration.
    let arena = Bump::new();
    let result = assist_at(&arena, "class X { $int count$; }");
    let node = result.assist.expect("assist node");
    assert_eq!(node.assist_kind, AssistKind::SelectOnFieldDeclaration);
    assert_eq!(result.replaced_text().as_deref(), Some("int count;"));
}

#[test]
fn test_cursor_outside_source() {
    let arena = Bump::new();
    let source = "class X {}";
    assert_eq!(
        parser().parse_for_completion(&arena, source, "X.java", 99).unwrap_err(),
        AssistError::CursorOutOfBounds { cursor: 99, len: 10 }
    );
}
