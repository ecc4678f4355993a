use tracing::trace;

use crate::go::lexer::Lexer;
use crate::go::token::{Keyword, Token, TokenKind};
use crate::options::{Language, ScanOptions};
use crate::tag::{Tag, TagKind, TagSink};

/// Scan Go source and append its tags to `sink`.
///
/// Never fails; malformed declarations are skipped or under-tagged.
pub fn scan(input: &[u8], options: &ScanOptions, sink: &mut TagSink) {
    Parser::new(input, options, sink).parse();
}

struct Parser<'a, 's> {
    lexer: Lexer<'a>,
    options: &'s ScanOptions,
    sink: &'s mut TagSink,
    /// Package name used to qualify tags. Set once per file.
    scope: Option<String>,
}

impl<'a, 's> Parser<'a, 's> {
    fn new(input: &'a [u8], options: &'s ScanOptions, sink: &'s mut TagSink) -> Self {
        Self {
            lexer: Lexer::new(input),
            options,
            sink,
            scope: None,
        }
    }

    fn parse(mut self) {
        let mut token = Token::new();
        loop {
            self.lexer.read_token(&mut token);
            match token.kind {
                TokenKind::Eof => break,
                TokenKind::Keyword(Keyword::Package) => self.parse_package(),
                TokenKind::Keyword(Keyword::Func) => self.parse_function_or_method(&mut token),
                TokenKind::Keyword(Keyword::Const) => {
                    self.parse_const_type_var(&mut token, TagKind::Constant);
                }
                TokenKind::Keyword(Keyword::Type) => {
                    self.parse_const_type_var(&mut token, TagKind::Type);
                }
                TokenKind::Keyword(Keyword::Var) => {
                    self.parse_const_type_var(&mut token, TagKind::Variable);
                }
                TokenKind::OpenParen | TokenKind::OpenBrace | TokenKind::OpenBracket => {
                    self.skip_to_matched(&mut token);
                }
                _ => {}
            }
        }
    }

    /// Skip a delimited group starting at `token`, leaving `token` on the
    /// first token after the matching close.
    ///
    /// Returns `true` if the group was closed. Does nothing and returns
    /// `false` when `token` is not an opening delimiter; returns `false`
    /// with `token` at end of input when the group never closes.
    fn skip_to_matched(&mut self, token: &mut Token) -> bool {
        let open = token.kind;
        let Some(close) = open.closing() else {
            return false;
        };

        let mut depth = 1usize;
        loop {
            self.lexer.read_token(token);
            if token.kind == TokenKind::Eof {
                trace!(line = token.line, "unterminated group");
                return false;
            }
            if token.kind == open {
                depth += 1;
            } else if token.kind == close {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
        }

        self.lexer.read_token(token);
        true
    }

    /// Skip one type expression. Returns `false`, leaving `token`
    /// untouched, when `token` does not start a type.
    fn skip_type(&mut self, token: &mut Token) -> bool {
        let mut moved = false;
        loop {
            match token.kind {
                // Type = TypeName | TypeLit | "(" Type ")" .
                // Also covers multiple results "(" Type {"," Type} ")".
                TokenKind::OpenParen => {
                    self.skip_to_matched(token);
                    return true;
                }
                // TypeName = [ PackageName "." ] identifier .
                TokenKind::Identifier => {
                    self.lexer.read_token(token);
                    if token.kind == TokenKind::Dot {
                        self.lexer.read_token(token);
                        if token.kind == TokenKind::Identifier {
                            self.lexer.read_token(token);
                        }
                    }
                    return true;
                }
                // StructType = "struct" "{" { FieldDecl ";" } "}" .
                // InterfaceType = "interface" "{" { MethodSpec ";" } "}" .
                TokenKind::Keyword(Keyword::Struct | Keyword::Interface) => {
                    self.lexer.read_token(token);
                    self.skip_to_matched(token);
                    return true;
                }
                // ArrayType = "[" ArrayLength "]" ElementType .
                TokenKind::OpenBracket => {
                    self.skip_to_matched(token);
                }
                // PointerType = "*" BaseType .
                // ChannelType = ( "chan" [ "<-" ] | "<-" "chan" ) ElementType .
                TokenKind::Star | TokenKind::LeftArrow | TokenKind::Keyword(Keyword::Chan) => {
                    self.lexer.read_token(token);
                }
                // MapType = "map" "[" KeyType "]" ElementType .
                TokenKind::Keyword(Keyword::Map) => {
                    self.lexer.read_token(token);
                    self.skip_to_matched(token);
                }
                // FunctionType = "func" Parameters [ Result ] .
                // The result is optional, so falling out of the loop on a
                // non-type is fine here.
                TokenKind::Keyword(Keyword::Func) => {
                    self.lexer.read_token(token);
                    self.skip_to_matched(token);
                }
                _ => return moved,
            }
            moved = true;
        }
    }

    fn parse_package(&mut self) {
        let mut name = Token::new();
        self.lexer.read_token(&mut name);
        if name.kind != TokenKind::Identifier {
            return;
        }
        self.make_tag(&name, TagKind::Package);
        if self.scope.is_none() && self.options.qualified_tags {
            self.scope = Some(name.text);
        }
    }

    // FunctionDecl = "func" identifier [ TypeParams ] Signature [ Body ] .
    // MethodDecl   = "func" Receiver MethodName Signature [ Body ] .
    // Receiver     = "(" [ identifier ] [ "*" ] BaseTypeName ")" .
    fn parse_function_or_method(&mut self, token: &mut Token) {
        let mut name = Token::new();
        self.lexer.read_token(&mut name);
        if name.kind == TokenKind::OpenParen {
            self.skip_to_matched(&mut name);
        }

        if name.kind != TokenKind::Identifier {
            trace!(line = name.line, "function literal, not tagged");
            return;
        }

        self.lexer.read_token(token);
        if token.kind == TokenKind::OpenBracket && !self.skip_to_matched(token) {
            return;
        }
        if token.kind != TokenKind::OpenParen || !self.skip_to_matched(token) {
            return;
        }

        self.skip_type(token);

        if token.kind == TokenKind::OpenBrace && !self.skip_to_matched(token) {
            return;
        }

        self.make_tag(&name, TagKind::Function);
    }

    // ConstDecl = "const" ( ConstSpec | "(" { ConstSpec ";" } ")" ) .
    // ConstSpec = IdentifierList [ [ Type ] "=" ExpressionList ] .
    // TypeDecl  = "type" ( TypeSpec | "(" { TypeSpec ";" } ")" ) .
    // TypeSpec  = identifier [ TypeParams ] Type .
    // VarDecl   = "var" ( VarSpec | "(" { VarSpec ";" } ")" ) .
    // VarSpec   = IdentifierList ( Type [ "=" ExpressionList ] | "=" ExpressionList ) .
    fn parse_const_type_var(&mut self, token: &mut Token, kind: TagKind) {
        let mut name = Token::new();
        self.lexer.read_token(&mut name);

        let uses_parens = name.kind == TokenKind::OpenParen;
        if uses_parens {
            self.lexer.read_token(&mut name);
        }

        loop {
            if name.kind == TokenKind::Identifier {
                loop {
                    self.make_tag(&name, kind);
                    self.lexer.read_token(token);
                    if token.kind != TokenKind::Comma {
                        break;
                    }
                    self.lexer.read_token(&mut name);
                    if name.kind != TokenKind::Identifier {
                        std::mem::swap(token, &mut name);
                        break;
                    }
                }
            } else {
                std::mem::swap(token, &mut name);
            }

            // Initializer expressions are not parsed, only skipped.
            self.skip_type(token);
            while !matches!(
                token.kind,
                TokenKind::Semicolon | TokenKind::CloseParen | TokenKind::Eof
            ) {
                if !self.skip_to_matched(token) {
                    self.lexer.read_token(token);
                }
            }

            if !uses_parens || token.kind != TokenKind::Semicolon {
                break;
            }
            self.lexer.read_token(&mut name);
            if matches!(name.kind, TokenKind::CloseParen | TokenKind::Eof) {
                break;
            }
        }
    }

    fn make_tag(&mut self, token: &Token, kind: TagKind) {
        if !self.options.is_enabled(kind) {
            return;
        }

        let qualified = self
            .scope
            .as_ref()
            .map(|scope| format!("{scope}.{}", token.text));

        let mut tag = Tag::new(
            token.text.clone(),
            kind,
            Language::Go,
            token.line,
            token.offset,
        );
        tag.qualified_name.clone_from(&qualified);
        self.sink.emit(tag);

        if let Some(qualified) = qualified {
            self.sink.emit(Tag::new(
                qualified,
                kind,
                Language::Go,
                token.line,
                token.offset,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_str(input: &str) -> Vec<Tag> {
        let mut sink = TagSink::new();
        scan(input.as_bytes(), &ScanOptions::new(), &mut sink);
        sink.into_tags()
    }

    fn names(tags: &[Tag]) -> Vec<(&str, TagKind)> {
        tags.iter().map(|t| (t.name.as_str(), t.kind)).collect()
    }

    fn with_parser<R>(input: &str, f: impl FnOnce(&mut Parser<'_, '_>, &mut Token) -> R) -> R {
        let options = ScanOptions::new();
        let mut sink = TagSink::new();
        let mut parser = Parser::new(input.as_bytes(), &options, &mut sink);
        let mut token = Token::new();
        parser.lexer.read_token(&mut token);
        f(&mut parser, &mut token)
    }

    #[test]
    fn skip_to_matched_lands_after_close() {
        with_parser("(a (b) [c] {d}) next", |parser, token| {
            assert!(parser.skip_to_matched(token));
            assert_eq!(token.kind, TokenKind::Identifier);
            assert_eq!(token.text, "next");
        });
    }

    #[test]
    fn skip_to_matched_ignores_other_delimiters() {
        with_parser("[ ( ] after", |parser, token| {
            assert!(parser.skip_to_matched(token));
            assert_eq!(token.text, "after");
        });
    }

    #[test]
    fn skip_to_matched_unterminated() {
        with_parser("{ { }", |parser, token| {
            assert!(!parser.skip_to_matched(token));
            assert_eq!(token.kind, TokenKind::Eof);
        });
    }

    #[test]
    fn skip_to_matched_on_non_group_is_noop() {
        with_parser("x y", |parser, token| {
            assert!(!parser.skip_to_matched(token));
            assert_eq!(token.text, "x");
        });
    }

    #[test]
    fn skip_type_variants() {
        let cases = [
            "int next",
            "pkg.Type next",
            "*[]map[string]chan<- int next",
            "struct { a int } next",
            "interface { M() } next",
            "func(int) (string, error) next",
            "[4]*T next",
            "<-chan T next",
            "(T) next",
        ];
        for case in cases {
            with_parser(case, |parser, token| {
                assert!(parser.skip_type(token), "case {case:?}");
                assert_eq!(token.text, "next", "case {case:?}");
            });
        }
    }

    #[test]
    fn skip_type_on_non_type_does_not_move() {
        for case in ["= 1", "{ }", "; x", ", y"] {
            with_parser(case, |parser, token| {
                let before = token.clone();
                assert!(!parser.skip_type(token), "case {case:?}");
                assert_eq!(*token, before, "case {case:?}");
            });
        }
    }

    #[test]
    fn package_and_function() {
        let tags = scan_str("package demo\n\nfunc Run() {\n\treturn\n}\n");
        assert_eq!(
            names(&tags),
            vec![("demo", TagKind::Package), ("Run", TagKind::Function)]
        );
        assert_eq!(tags[1].line, 3);
    }

    #[test]
    fn method_with_receiver() {
        let tags = scan_str("func (s *Server) Start(addr string) error {\n}\n");
        assert_eq!(names(&tags), vec![("Start", TagKind::Function)]);
    }

    #[test]
    fn function_literal_is_not_tagged() {
        let tags = scan_str("var f = func() {}\n");
        assert_eq!(names(&tags), vec![("f", TagKind::Variable)]);
    }

    #[test]
    fn generic_function() {
        let tags = scan_str("func Map[T, U any](xs []T, f func(T) U) []U {\n}\n");
        assert_eq!(names(&tags), vec![("Map", TagKind::Function)]);
    }

    #[test]
    fn unterminated_parameters_emit_nothing() {
        assert!(scan_str("func f(").is_empty());
    }

    #[test]
    fn unterminated_body_emits_nothing() {
        assert!(scan_str("func f() {\n\tx := 1\n").is_empty());
    }

    #[test]
    fn declaration_without_body() {
        let tags = scan_str("func asm(x int) int\nfunc g() {}\n");
        assert_eq!(
            names(&tags),
            vec![("asm", TagKind::Function), ("g", TagKind::Function)]
        );
    }

    #[test]
    fn const_group_with_identifier_lists() {
        let tags = scan_str("const (\n\tA, B = 1, 2\n\n\tC int = 3\n)\nvar D = 4\n");
        assert_eq!(
            names(&tags),
            vec![
                ("A", TagKind::Constant),
                ("B", TagKind::Constant),
                ("C", TagKind::Constant),
                ("D", TagKind::Variable),
            ]
        );
        assert_eq!(tags[2].line, 4);
    }

    #[test]
    fn type_declarations() {
        let tags = scan_str(
            "type Point struct {\n\tX, Y int\n}\n\ntype (\n\tID string\n\tHandler func(int) error\n)\n",
        );
        assert_eq!(
            names(&tags),
            vec![
                ("Point", TagKind::Type),
                ("ID", TagKind::Type),
                ("Handler", TagKind::Type),
            ]
        );
    }

    #[test]
    fn var_with_composite_initializer() {
        let tags = scan_str("var table = map[string][]int{\"a\": {1, 2}}\nvar next int\n");
        assert_eq!(
            names(&tags),
            vec![("table", TagKind::Variable), ("next", TagKind::Variable)]
        );
    }

    #[test]
    fn empty_group_does_not_swallow_next_declaration() {
        let tags = scan_str("const ()\nfunc after() {}\n");
        assert_eq!(names(&tags), vec![("after", TagKind::Function)]);
    }

    #[test]
    fn import_group_is_skipped() {
        let tags = scan_str("import (\n\t\"fmt\"\n\tos \"os\"\n)\n\nfunc main() {}\n");
        assert_eq!(names(&tags), vec![("main", TagKind::Function)]);
    }

    #[test]
    fn nested_declarations_in_bodies_are_skipped() {
        let tags = scan_str("func outer() {\n\tvar inner = 1\n\ttype local int\n}\n");
        assert_eq!(names(&tags), vec![("outer", TagKind::Function)]);
    }

    #[test]
    fn qualified_tags() {
        let options = ScanOptions::new().qualified_tags(true);
        let mut sink = TagSink::new();
        scan(
            b"package demo\n\nfunc Run() {}\n",
            &options,
            &mut sink,
        );
        let tags = sink.into_tags();
        assert_eq!(
            tags.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
            vec!["demo", "Run", "demo.Run"]
        );
        assert_eq!(tags[1].line, tags[2].line);
        assert_eq!(tags[1].qualified_name.as_deref(), Some("demo.Run"));
    }

    #[test]
    fn scope_is_set_once() {
        let options = ScanOptions::new().qualified_tags(true);
        let mut sink = TagSink::new();
        scan(b"package a\npackage b\nvar x int\n", &options, &mut sink);
        let names: Vec<_> = sink.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "a.b", "x", "a.x"]);
    }

    #[test]
    fn disabled_kind() {
        let options = ScanOptions::new().disable(TagKind::Variable);
        let mut sink = TagSink::new();
        scan(b"var x int\nconst y = 1\n", &options, &mut sink);
        assert_eq!(names(sink.tags()), vec![("y", TagKind::Constant)]);
    }
}
