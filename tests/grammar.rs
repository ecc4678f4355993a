mod common;

use common::{
    GENERICS_INPUT, SHAPES, grammar_tags, grammar_tags_with, kotlin_tags, names, summary,
};
use tagscan::{
    Error, KotlinStrategy, Language, ScanOptions, SyntaxErrorKind, TagHandle, TagKind, scan_str,
};

#[test]
fn realistic_file() {
    let (tags, result) = grammar_tags(SHAPES);
    assert_eq!(result, Ok(()));
    assert_eq!(
        summary(&tags),
        [
            ("com.example.shapes", 'p', 1),
            ("Shape", 'i', 6),
            ("area", 'v', 7),
            ("Circle", 'c', 10),
            ("radius", 'v', 10),
            ("area", 'v', 11),
            ("Registry", 'o', 15),
            ("shapes", 'v', 16),
            ("register", 'm', 17),
            ("Color", 'c', 20),
            ("ShapeList", 'T', 22),
            ("totalArea", 'm', 24),
            ("UNIT", 'C', 26),
            ("main", 'm', 28),
        ]
    );
    let qualified: Vec<Option<&str>> = tags.iter().map(|t| t.qualified_name.as_deref()).collect();
    assert_eq!(
        qualified,
        [
            None,
            None,
            Some("Shape.area"),
            None,
            Some("Circle.radius"),
            Some("Circle.area"),
            None,
            Some("Registry.shapes"),
            Some("Registry.register"),
            None,
            None,
            None,
            None,
            None,
        ]
    );
}

#[test]
fn offsets_point_at_names() {
    let (tags, _) = grammar_tags(SHAPES);
    for tag in tags {
        let end = tag.offset + tag.name.len();
        assert_eq!(&SHAPES[tag.offset..end], tag.name, "offset of {}", tag.name);
    }
}

#[test]
fn agrees_with_hand_written_scanner() {
    let (grammar, result) = grammar_tags(GENERICS_INPUT);
    assert_eq!(result, Ok(()));
    let hand_written = kotlin_tags(GENERICS_INPUT);
    let key = |t: &tagscan::Tag| (t.name.clone(), t.kind, t.line);
    assert_eq!(
        grammar.iter().map(key).collect::<Vec<_>>(),
        hand_written.iter().map(key).collect::<Vec<_>>()
    );
    assert_eq!(grammar.len(), 10);
}

#[test]
fn generic_members_are_scoped() {
    let (tags, _) = grammar_tags(GENERICS_INPUT);
    let scoped: Vec<(&str, Option<&str>)> = tags
        .iter()
        .filter(|t| t.scope.is_some())
        .map(|t| (t.name.as_str(), t.qualified_name.as_deref()))
        .collect();
    assert_eq!(
        scoped,
        [
            ("genericFunction1", Some("Foo.genericFunction1")),
            ("genericFunction2", Some("Foo.genericFunction2")),
            ("genericFunction3", Some("Foo.genericFunction3")),
            ("a", Some("Bar.a")),
            ("b", Some("Bar.b")),
            ("c", Some("Baz.c")),
            ("d", Some("Baz.d")),
        ]
    );
}

#[test]
fn qualified_entries_for_nested_scopes() {
    let input = "class Outer {\n    object Inner {\n        fun f() {}\n    }\n}\n";
    let options = ScanOptions::new().qualified_tags(true);
    let (tags, result) = grammar_tags_with(input, &options);
    assert_eq!(result, Ok(()));
    assert_eq!(
        names(&tags),
        ["Outer", "Inner", "Outer.Inner", "f", "Outer.Inner.f"]
    );
    assert_eq!(tags[3].scope.map(TagHandle::index), Some(1));
    assert_eq!(tags[3].line, 3);
    assert_eq!(tags[4].kind, TagKind::Method);
}

#[test]
fn file_header() {
    let input = "@file:Suppress(\"unused\")\n\
                 package a.b.c\n\
                 import x.y.*\n\
                 import x.z as w\n\
                 class K\n";
    let (tags, result) = grammar_tags(input);
    assert_eq!(result, Ok(()));
    assert_eq!(summary(&tags), [("a.b.c", 'p', 2), ("K", 'c', 5)]);
}

#[test]
fn escaped_identifiers() {
    let input = "class `my class` {\n    fun `do it`() {}\n}\n";
    let (tags, _) = grammar_tags(input);
    assert_eq!(names(&tags), ["my class", "do it"]);
    assert_eq!(tags[0].offset, 7);
    assert_eq!(tags[1].qualified_name.as_deref(), Some("my class.do it"));
}

#[test]
fn first_error_stops_the_scan() {
    let input = "class A {}\nfun f() = listOf(1, 2]\nclass B {}\n";
    let (tags, result) = grammar_tags(input);
    assert_eq!(names(&tags), ["A"]);
    let err = result.unwrap_err();
    assert_eq!(err.kind, SyntaxErrorKind::UnexpectedToken("]".to_string()));
    assert_eq!((err.line, err.offset), (2, 32));
    assert_eq!(
        err.to_string(),
        "syntax error at line 2, offset 32: unexpected ']'"
    );
}

#[test]
fn failed_unit_contributes_no_tags() {
    let input = "class A\nclass B {\n  fun f() = )\n}\nclass C\n";
    let (tags, result) = grammar_tags(input);
    assert_eq!(names(&tags), ["A"]);
    assert_eq!(result.unwrap_err().line, 3);
}

#[test]
fn truncated_file() {
    let (tags, result) = grammar_tags("class A\nclass B {\n    fun f() {\n");
    assert_eq!(names(&tags), ["A"]);
    assert_eq!(result.unwrap_err().kind, SyntaxErrorKind::UnexpectedEof);
}

#[test]
fn scan_str_wraps_syntax_errors() {
    let options = ScanOptions::new().kotlin_strategy(KotlinStrategy::Grammar);
    let err = scan_str(Language::Kotlin, "val = 1", &options).unwrap_err();
    assert!(matches!(err, Error::Syntax(ref e) if e.line == 1));
    assert_eq!(err.to_string(), "syntax error at line 1, offset 4: unexpected '='");
}

#[test]
fn hand_written_scanner_tolerates_the_same_input() {
    let input = "class A {}\nfun f() = listOf(1, 2]\nclass B {}\n";
    let tags = scan_str(Language::Kotlin, input, &ScanOptions::new()).unwrap();
    assert_eq!(names(&tags), ["A", "f", "B"]);
}
