use crate::go::token::{Keyword, Token, TokenKind};
use crate::source::Source;

/// Tokenize Go source into a vector, ending with one [`TokenKind::Eof`].
///
/// The parser reads tokens lazily through [`Lexer::read_token`]; this is
/// a convenience for inspecting the token stream.
#[must_use]
pub fn tokenize(input: &[u8]) -> Vec<Token> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    loop {
        let mut token = Token::new();
        lexer.read_token(&mut token);
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return tokens;
        }
    }
}

const fn is_start_ident_char(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_' || c >= 0x80
}

const fn is_ident_char(c: u8) -> bool {
    is_start_ident_char(c) || c.is_ascii_digit()
}

/// Go lexer. Never fails: malformed input degrades to `Other` tokens
/// and unterminated literals end at end of input.
pub struct Lexer<'a> {
    src: Source<'a>,
    /// Kind of the previous token, for newline promotion.
    last_kind: Option<TokenKind>,
    buf: Vec<u8>,
}

impl<'a> Lexer<'a> {
    #[must_use]
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            src: Source::new(input),
            last_kind: None,
            buf: Vec::new(),
        }
    }

    /// Read the next token into `token`, reusing its buffer.
    pub fn read_token(&mut self, token: &mut Token) {
        token.reset();
        token.kind = self.classify(token);
        self.last_kind = Some(token.kind);
    }

    fn terminates_statement(&self) -> bool {
        self.last_kind.is_some_and(TokenKind::ends_statement)
    }

    fn classify(&mut self, token: &mut Token) -> TokenKind {
        let c = loop {
            token.line = self.src.line();
            token.offset = self.src.offset();
            match self.src.getc() {
                Some(b'\n') if self.terminates_statement() => return TokenKind::Semicolon,
                Some(b' ' | b'\t' | b'\r' | b'\n') => {}
                Some(b'/') if self.src.peek() == Some(b'/') => {
                    // A line comment acts like a newline.
                    self.src.skip_to(b'\n');
                    self.src.ungetc(b'\n');
                }
                Some(b'/') if self.src.peek() == Some(b'*') => {
                    self.src.getc();
                    let spans_lines = self.skip_block_comment();
                    self.src.ungetc(if spans_lines { b'\n' } else { b' ' });
                }
                other => break other,
            }
        };

        let Some(c) = c else {
            return TokenKind::Eof;
        };

        match c {
            b';' => TokenKind::Semicolon,
            b'"' | b'\'' | b'`' => {
                self.read_string(c, &mut token.text);
                TokenKind::String
            }
            b'<' if self.src.peek() == Some(b'-') => {
                self.src.getc();
                TokenKind::LeftArrow
            }
            b'(' => TokenKind::OpenParen,
            b')' => TokenKind::CloseParen,
            b'{' => TokenKind::OpenBrace,
            b'}' => TokenKind::CloseBrace,
            b'[' => TokenKind::OpenBracket,
            b']' => TokenKind::CloseBracket,
            b'*' => TokenKind::Star,
            b'.' => TokenKind::Dot,
            b',' => TokenKind::Comma,
            c if is_start_ident_char(c) => {
                self.read_identifier(c, &mut token.text);
                Keyword::lookup(&token.text).map_or(TokenKind::Identifier, TokenKind::Keyword)
            }
            c => {
                token.text.push(char::from(c));
                TokenKind::Other
            }
        }
    }

    /// Consume a block comment body after `/*`. Returns whether it
    /// contained a newline. The first `*/` closes it.
    fn skip_block_comment(&mut self) -> bool {
        let mut spans_lines = false;
        while let Some(c) = self.src.getc() {
            match c {
                b'\n' => spans_lines = true,
                b'*' if self.src.peek() == Some(b'/') => {
                    self.src.getc();
                    break;
                }
                _ => {}
            }
        }
        spans_lines
    }

    fn read_string(&mut self, delimiter: u8, text: &mut String) {
        self.buf.clear();
        while let Some(c) = self.src.getc() {
            if c == b'\\' && delimiter != b'`' {
                let Some(escaped) = self.src.getc() else {
                    self.buf.push(c);
                    break;
                };
                if escaped != b'\'' && escaped != b'"' {
                    self.buf.push(b'\\');
                }
                self.buf.push(escaped);
            } else if c == delimiter {
                break;
            } else {
                self.buf.push(c);
            }
        }
        text.push_str(&String::from_utf8_lossy(&self.buf));
    }

    /// Read an identifier. The byte that ends it is left unread: a
    /// following newline may still become a statement terminator.
    fn read_identifier(&mut self, first: u8, text: &mut String) {
        self.buf.clear();
        self.buf.push(first);
        while let Some(c) = self.src.peek().filter(|&c| is_ident_char(c)) {
            self.src.getc();
            self.buf.push(c);
        }
        text.push_str(&String::from_utf8_lossy(&self.buf));
    }
}
