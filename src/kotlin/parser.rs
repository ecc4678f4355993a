use crate::kotlin::lexer::Lexer;
use crate::kotlin::token::{Declaration, HARD_KEYWORDS, Token, TokenKind};
use crate::options::{Language, ScanOptions};
use crate::tag::{Tag, TagKind, TagSink};

/// Scan Kotlin source with the keyword walker and append its tags to
/// `sink`.
///
/// Never fails. Every token is inspected, so declarations nested in
/// bodies are tagged too. Tags carry no scope.
pub fn scan(input: &[u8], options: &ScanOptions, sink: &mut TagSink) {
    Walker::new(input, options, sink).run();
}

/// What the main loop does with the current token after a handler.
enum Flow {
    Next,
    /// The handler stopped on a token it did not use.
    Revisit,
}

struct Walker<'a, 's> {
    lexer: Lexer<'a>,
    options: &'s ScanOptions,
    sink: &'s mut TagSink,
    token: Token,
    /// The token before `token` was `:` or `.`, as in `Foo::class`.
    after_access: bool,
    /// The token before `token` was the `const` modifier.
    after_const: bool,
}

impl<'a, 's> Walker<'a, 's> {
    fn new(input: &'a [u8], options: &'s ScanOptions, sink: &'s mut TagSink) -> Self {
        Self {
            lexer: Lexer::new(input),
            options,
            sink,
            token: Token::new(),
            after_access: false,
            after_const: false,
        }
    }

    fn next(&mut self) {
        self.after_access = self.token.is_punct(b':') || self.token.is_punct(b'.');
        self.after_const = self.token.is_word("const");
        self.lexer.read_token(&mut self.token);
    }

    fn run(mut self) {
        self.next();
        while self.token.kind != TokenKind::Eof {
            let declaration = match self.token.kind {
                TokenKind::Word if !self.after_access => Declaration::from_word(&self.token.text),
                _ => None,
            };
            let flow = match declaration {
                Some(Declaration::Package) => self.package(),
                Some(
                    declaration @ (Declaration::Interface
                    | Declaration::Class
                    | Declaration::Object
                    | Declaration::TypeAlias),
                ) => self.named(declaration.kind()),
                Some(Declaration::Fun) => self.function(),
                Some(Declaration::Val | Declaration::Var) => {
                    let kind = if self.after_const {
                        TagKind::Constant
                    } else {
                        TagKind::Variable
                    };
                    self.property(kind)
                }
                None => Flow::Next,
            };
            if let Flow::Next = flow {
                self.next();
            }
        }
    }

    /// `package a.b.c` tags the whole dotted path.
    fn package(&mut self) -> Flow {
        self.next();
        if self.token.kind != TokenKind::Word || self.is_keyword() {
            return Flow::Revisit;
        }
        let path = self.token.text.trim_end_matches('.');
        if path.is_empty() || !self.options.is_enabled(TagKind::Package) {
            return Flow::Next;
        }
        let tag = Tag::new(
            path,
            TagKind::Package,
            Language::Kotlin,
            self.token.line,
            self.token.offset,
        );
        self.sink.emit(tag);
        Flow::Next
    }

    fn named(&mut self, kind: TagKind) -> Flow {
        self.next();
        self.emit_current(kind)
    }

    fn function(&mut self) -> Flow {
        self.next();
        if self.token.is_word("interface") {
            return self.named(TagKind::Interface);
        }
        self.skip_type_parameters();
        self.receiver_suffix();
        self.emit_current(TagKind::Method)
    }

    fn property(&mut self, kind: TagKind) -> Flow {
        self.next();
        self.skip_type_parameters();
        if self.token.is_punct(b'(') {
            self.destructuring(kind);
            return Flow::Next;
        }
        self.receiver_suffix();
        self.emit_current(kind)
    }

    /// `val (a, b: T, _) = ...` tags each name up to the closing paren.
    fn destructuring(&mut self, kind: TagKind) {
        let mut expect_name = true;
        loop {
            self.next();
            match self.token.kind {
                TokenKind::Eof | TokenKind::Punct(b')') => return,
                TokenKind::Punct(b',') => expect_name = true,
                TokenKind::Punct(b'<') => self.lexer.skip_pair(b'<', b'>'),
                TokenKind::Word | TokenKind::EscapedIdentifier if expect_name => {
                    if self.token.text != "_" {
                        self.emit_current(kind);
                    }
                    expect_name = false;
                }
                _ => {}
            }
        }
    }

    fn skip_type_parameters(&mut self) {
        if self.token.is_punct(b'<') {
            self.lexer.skip_pair(b'<', b'>');
            self.next();
        }
    }

    /// For a receiver such as `List<T>.name` or `String?.name`, move to the
    /// word holding the declared name. Otherwise leave the lexer where it
    /// was.
    fn receiver_suffix(&mut self) {
        if self.token.kind != TokenKind::Word {
            return;
        }
        let mark = self.lexer.mark();
        let mut look = Token::new();
        self.lexer.read_token(&mut look);
        if look.is_punct(b'<') {
            self.lexer.skip_pair(b'<', b'>');
            self.lexer.read_token(&mut look);
        }
        if look.is_punct(b'?') {
            self.lexer.read_token(&mut look);
        }
        let is_suffix = look.kind == TokenKind::Word
            && look.text.starts_with('.')
            && !look.newline_before
            && look.name().is_some();
        if is_suffix {
            self.token = look;
        } else {
            self.lexer.reset(mark);
        }
    }

    fn is_keyword(&self) -> bool {
        self.token.kind == TokenKind::Word && HARD_KEYWORDS.contains(&self.token.text.as_str())
    }

    /// Tag the current token if it can name a declaration.
    fn emit_current(&mut self, kind: TagKind) -> Flow {
        if self.is_keyword() {
            return Flow::Revisit;
        }
        let Some(name) = self.token.name() else {
            return Flow::Revisit;
        };
        if self.options.is_enabled(kind) {
            let tag = Tag::new(
                name,
                kind,
                Language::Kotlin,
                self.token.line,
                self.token.name_offset(),
            );
            self.sink.emit(tag);
        }
        Flow::Next
    }
}
