use tracing::trace;

use crate::kotlin::token::{Token, TokenKind};
use crate::source::{Mark, Source};

/// Tokenize Kotlin source into a vector, ending with one
/// [`TokenKind::Eof`].
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

/// One level of the string/template skipping machine.
#[derive(Debug, Clone, Copy)]
enum Frame {
    /// Balanced `open`/`close` region such as `${ ... }` or `< ... >`.
    Group { open: u8, close: u8, depth: usize },
    /// `"..."` with escapes and templates.
    Text,
    /// `"""..."""` with templates and no escapes.
    RawText,
}

/// Kotlin lexer. Never fails: unterminated literals and comments end at
/// end of input.
pub struct Lexer<'a> {
    src: Source<'a>,
    buf: Vec<u8>,
}

impl<'a> Lexer<'a> {
    #[must_use]
    pub fn new(input: &'a [u8]) -> Self {
        let mut src = Source::new(input);
        if src.peek() == Some(b'#') && src.peek_at(1) == Some(b'!') {
            src.skip_to(b'\n');
        }
        Self {
            src,
            buf: Vec::new(),
        }
    }

    #[must_use]
    pub const fn mark(&self) -> Mark {
        self.src.mark()
    }

    pub const fn reset(&mut self, mark: Mark) {
        self.src.reset(mark);
    }

    /// Read the next token into `token`, reusing its buffer.
    pub fn read_token(&mut self, token: &mut Token) {
        token.reset();
        token.newline_before = self.skip_blanks();
        token.line = self.src.line();
        token.offset = self.src.offset();
        token.kind = self.classify(&mut token.text);
        token.end = self.src.offset();
    }

    /// Skip whitespace and comments. Returns whether a newline was crossed.
    fn skip_blanks(&mut self) -> bool {
        let mut newline = false;
        loop {
            match (self.src.peek(), self.src.peek_at(1)) {
                (Some(b'\n'), _) => {
                    self.src.getc();
                    newline = true;
                }
                (Some(c), _) if c <= 32 => {
                    self.src.getc();
                }
                (Some(b'/'), Some(b'/')) => {
                    self.src.skip_to(b'\n');
                    newline = true;
                }
                (Some(b'/'), Some(b'*')) => {
                    newline |= self.skip_block_comment();
                }
                _ => return newline,
            }
        }
    }

    /// Skip `/* ... */`. The first `*/` closes it; nesting is not tracked.
    fn skip_block_comment(&mut self) -> bool {
        self.src.getc();
        self.src.getc();
        let mut newline = false;
        while let Some(c) = self.src.getc() {
            match c {
                b'\n' => newline = true,
                b'*' if self.src.peek() == Some(b'/') => {
                    self.src.getc();
                    break;
                }
                _ => {}
            }
        }
        newline
    }

    fn classify(&mut self, text: &mut String) -> TokenKind {
        let Some(c) = self.src.getc() else {
            return TokenKind::Eof;
        };

        match c {
            b'"' => {
                let frame = self.open_string();
                text.push_str(if matches!(frame, Some(Frame::RawText)) {
                    "\"\"\""
                } else {
                    "\""
                });
                if let Some(frame) = frame {
                    self.skip_frames(frame);
                }
                TokenKind::String
            }
            b'\'' => {
                self.skip_char_literal();
                text.push('\'');
                TokenKind::Char
            }
            b'`' => {
                self.buf.clear();
                while let Some(c) = self.src.getc() {
                    if c == b'`' || c == b'\n' {
                        break;
                    }
                    self.buf.push(c);
                }
                text.push_str(&String::from_utf8_lossy(&self.buf));
                TokenKind::EscapedIdentifier
            }
            c if c.is_ascii_digit() => {
                self.read_number(c, text);
                TokenKind::Number
            }
            c if is_start_ident_char(c) => {
                self.read_word(c, text);
                TokenKind::Word
            }
            b'.' if self.src.peek().is_some_and(is_start_ident_char) => {
                self.read_word(c, text);
                TokenKind::Word
            }
            c => {
                text.push(char::from(c));
                TokenKind::Punct(c)
            }
        }
    }

    /// Read identifier characters and dots. A dot joins the word unless
    /// it starts a `..` range.
    fn read_word(&mut self, first: u8, text: &mut String) {
        self.buf.clear();
        self.buf.push(first);
        while let Some(c) = self.src.peek() {
            let joins = is_ident_char(c) || (c == b'.' && self.src.peek_at(1) != Some(b'.'));
            if !joins {
                break;
            }
            self.src.getc();
            self.buf.push(c);
        }
        text.push_str(&String::from_utf8_lossy(&self.buf));
    }

    fn read_number(&mut self, first: u8, text: &mut String) {
        self.buf.clear();
        self.buf.push(first);
        while let Some(c) = self.src.peek() {
            let fraction = c == b'.' && self.src.peek_at(1).is_some_and(|d| d.is_ascii_digit());
            if !(c.is_ascii_alphanumeric() || c == b'_' || fraction) {
                break;
            }
            self.src.getc();
            self.buf.push(c);
        }
        text.push_str(&String::from_utf8_lossy(&self.buf));
    }

    /// Called after an opening `"`. Decides between raw, empty, and plain
    /// strings, consuming the extra quotes of the first two.
    fn open_string(&mut self) -> Option<Frame> {
        match (self.src.peek(), self.src.peek_at(1)) {
            (Some(b'"'), Some(b'"')) => {
                self.src.getc();
                self.src.getc();
                Some(Frame::RawText)
            }
            (Some(b'"'), _) => {
                self.src.getc();
                None
            }
            _ => Some(Frame::Text),
        }
    }

    /// Called after an opening `'`.
    fn skip_char_literal(&mut self) {
        if let Some(c) = self.src.getc() {
            if c == b'\'' || c == b'\n' {
                return;
            }
            if c == b'\\' {
                self.src.getc();
            }
        }
        while let Some(c) = self.src.getc() {
            if c == b'\'' || c == b'\n' {
                break;
            }
        }
    }

    /// Skip a balanced `open`/`close` region. The opening byte has already
    /// been read. Strings, character literals, templates, and comments
    /// inside are skipped as units. In a `<`/`>` region a `->` arrow does
    /// not close anything.
    pub fn skip_pair(&mut self, open: u8, close: u8) {
        let line = self.src.line();
        self.skip_frames(Frame::Group {
            open,
            close,
            depth: 1,
        });
        trace!(line, open = %char::from(open), "skipped group");
    }

    fn skip_frames(&mut self, first: Frame) {
        let mut stack = vec![first];
        let mut prev = 0u8;
        while let Some(frame) = stack.last_mut() {
            let Some(c) = self.src.getc() else {
                return;
            };
            match frame {
                Frame::Group { open, close, depth } => match c {
                    c if c == *close && !(c == b'>' && prev == b'-') => {
                        *depth -= 1;
                        if *depth == 0 {
                            stack.pop();
                        }
                    }
                    c if c == *open => *depth += 1,
                    b'"' => {
                        if let Some(inner) = self.open_string() {
                            stack.push(inner);
                        }
                    }
                    b'\'' => self.skip_char_literal(),
                    b'/' if matches!(self.src.peek(), Some(b'/' | b'*')) => {
                        self.src.ungetc(c);
                        self.skip_blanks();
                    }
                    _ => {}
                },
                Frame::Text => match c {
                    b'\\' => {
                        self.src.getc();
                    }
                    b'"' | b'\n' => {
                        stack.pop();
                    }
                    b'$' if self.src.peek() == Some(b'{') => {
                        self.src.getc();
                        stack.push(Frame::Group {
                            open: b'{',
                            close: b'}',
                            depth: 1,
                        });
                    }
                    _ => {}
                },
                Frame::RawText => match c {
                    b'"' if self.src.peek() == Some(b'"') && self.src.peek_at(1) == Some(b'"') => {
                        self.src.getc();
                        self.src.getc();
                        while self.src.peek() == Some(b'"') {
                            self.src.getc();
                        }
                        stack.pop();
                    }
                    b'$' if self.src.peek() == Some(b'{') => {
                        self.src.getc();
                        stack.push(Frame::Group {
                            open: b'{',
                            close: b'}',
                            depth: 1,
                        });
                    }
                    _ => {}
                },
            }
            prev = c;
        }
    }
}
