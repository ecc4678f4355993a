mod common;

use common::{go_tags, go_tags_with, names, summary};
use tagscan::{Language, ScanOptions, TagKind, scan_str};

const SERVER: &str = r#"// Package server implements a tiny HTTP service.
package server

import (
	"fmt"
	"net/http"
)

const Version = "1.0"

const (
	ModeA Mode = iota
	ModeB
)

type Mode int

type (
	Handler func(w http.ResponseWriter, r *http.Request)
	Server struct {
		addr string
		mux  map[string]Handler
	}
)

var defaultServer = &Server{addr: ":8080"}

func New(addr string) *Server {
	return &Server{addr: addr}
}

func (s *Server) Start() error {
	go func() {
		fmt.Println("started")
	}()
	return http.ListenAndServe(s.addr, nil)
}

func Map[K comparable, V any](m map[K]V, f func(V) V) map[K]V {
	return m
}
"#;

#[test]
fn realistic_file() {
    let tags = go_tags(SERVER);
    assert_eq!(
        summary(&tags),
        [
            ("server", 'p', 2),
            ("Version", 'c', 9),
            ("ModeA", 'c', 12),
            ("ModeB", 'c', 13),
            ("Mode", 't', 16),
            ("Handler", 't', 19),
            ("Server", 't', 20),
            ("defaultServer", 'v', 26),
            ("New", 'f', 28),
            ("Start", 'f', 32),
            ("Map", 'f', 39),
        ]
    );
}

#[test]
fn offsets_point_at_names() {
    let tags = go_tags(SERVER);
    for tag in &tags {
        let end = tag.offset + tag.name.len();
        assert_eq!(&SERVER[tag.offset..end], tag.name, "offset of {}", tag.name);
    }
}

#[test]
fn tags_are_in_source_order() {
    let tags = go_tags(SERVER);
    assert!(tags.windows(2).all(|w| w[0].offset < w[1].offset));
}

#[test]
fn qualified_entries_follow_each_tag() {
    let options = ScanOptions::new().qualified_tags(true);
    let tags = go_tags_with(SERVER, &options);
    let qualified: Vec<&str> = tags
        .iter()
        .filter(|t| t.name.starts_with("server."))
        .map(|t| t.name.as_str())
        .collect();
    assert_eq!(
        qualified,
        [
            "server.Version",
            "server.ModeA",
            "server.ModeB",
            "server.Mode",
            "server.Handler",
            "server.Server",
            "server.defaultServer",
            "server.New",
            "server.Start",
            "server.Map",
        ]
    );
    // Every qualified entry directly follows its plain entry.
    for pair in tags.windows(2) {
        if let Some(rest) = pair[1].name.strip_prefix("server.") {
            assert_eq!(pair[0].name, rest);
            assert_eq!(pair[0].line, pair[1].line);
            assert_eq!(pair[0].kind, pair[1].kind);
        }
    }
}

#[test]
fn literals_hide_delimiters() {
    let input = "package p\n\
                 func A() {\n\
                 \ts := `}\n\
                 func Fake() {}\n\
                 `\n\
                 \tr := '}'\n\
                 \tq := \"{\\\"}\"\n\
                 }\n\
                 func B() {}\n";
    assert_eq!(names(&go_tags(input)), ["p", "A", "B"]);
}

#[test]
fn comments_hide_declarations() {
    let input = "package p\n\
                 // func Hidden() {}\n\
                 /* func Also() {}\n\
                 var x int */\n\
                 func Shown() {}\n";
    assert_eq!(summary(&go_tags(input)), [("p", 'p', 1), ("Shown", 'f', 5)]);
}

#[test]
fn newline_ends_a_var_without_initializer() {
    let input = "package p\nvar x int\nfunc f() {}\n";
    assert_eq!(names(&go_tags(input)), ["p", "x", "f"]);
}

#[test]
fn crlf_line_endings() {
    let input = "package p\r\n\r\nvar a, b = 1, 2\r\nfunc f() {}\r\n";
    assert_eq!(
        summary(&go_tags(input)),
        [("p", 'p', 1), ("a", 'v', 3), ("b", 'v', 3), ("f", 'f', 4)]
    );
}

#[test]
fn interface_and_struct_bodies_are_not_tagged() {
    let input = "package p\n\
                 type Reader interface {\n\
                 \tRead(p []byte) (n int, err error)\n\
                 }\n\
                 type pair struct { a, b int }\n";
    assert_eq!(names(&go_tags(input)), ["p", "Reader", "pair"]);
}

#[test]
fn truncated_file_keeps_earlier_tags() {
    let input = "package p\nfunc ok() {}\nfunc broken() {\n\tif x {\n";
    assert_eq!(names(&go_tags(input)), ["p", "ok"]);
}

#[test]
fn empty_and_garbage_input() {
    assert!(go_tags("").is_empty());
    assert!(go_tags(")))}}}]]]").is_empty());
    assert!(go_tags("func").is_empty());
    assert!(go_tags("package").is_empty());
}

#[test]
fn disabled_kinds_are_dropped() {
    let options = ScanOptions::new()
        .disable(TagKind::Variable)
        .disable(TagKind::Package);
    let tags = go_tags_with(SERVER, &options);
    assert!(
        tags.iter()
            .all(|t| !matches!(t.kind, TagKind::Variable | TagKind::Package))
    );
    assert_eq!(tags.len(), 9);
}

#[test]
fn scan_str_reports_language() {
    let tags = scan_str(Language::Go, "package p", &ScanOptions::new()).unwrap();
    assert_eq!(tags[0].language, Language::Go);
    assert_eq!(tags[0].kind_name(), "package");
}
