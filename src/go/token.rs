/// Go keywords that matter for top-level declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Package,
    Import,
    Const,
    Type,
    Var,
    Func,
    Struct,
    Interface,
    Map,
    Chan,
}

impl Keyword {
    pub const ALL: [Self; 10] = [
        Self::Package,
        Self::Import,
        Self::Const,
        Self::Type,
        Self::Var,
        Self::Func,
        Self::Struct,
        Self::Interface,
        Self::Map,
        Self::Chan,
    ];

    /// Look a spelling up in the keyword table.
    #[must_use]
    pub fn lookup(word: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == word)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Package => "package",
            Self::Import => "import",
            Self::Const => "const",
            Self::Type => "type",
            Self::Var => "var",
            Self::Func => "func",
            Self::Struct => "struct",
            Self::Interface => "interface",
            Self::Map => "map",
            Self::Chan => "chan",
        }
    }
}

/// Token kinds produced by the Go lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenKind {
    /// End of input. Reading past it keeps returning it.
    #[default]
    Eof,
    Keyword(Keyword),
    Identifier,
    /// String, rune or raw string literal; text holds the contents.
    String,
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    OpenBracket,
    CloseBracket,
    /// Explicit `;` or a newline promoted to a statement terminator.
    Semicolon,
    Star,
    /// `<-`
    LeftArrow,
    Dot,
    Comma,
    /// Anything not important for top-level parsing.
    Other,
}

impl TokenKind {
    /// The closing kind for an opening delimiter.
    #[must_use]
    pub const fn closing(self) -> Option<Self> {
        match self {
            Self::OpenParen => Some(Self::CloseParen),
            Self::OpenBrace => Some(Self::CloseBrace),
            Self::OpenBracket => Some(Self::CloseBracket),
            _ => None,
        }
    }

    /// Whether a newline right after this kind ends the statement.
    #[must_use]
    pub const fn ends_statement(self) -> bool {
        matches!(
            self,
            Self::Identifier
                | Self::String
                | Self::Other
                | Self::CloseParen
                | Self::CloseBrace
                | Self::CloseBracket
        )
    }
}

/// A single token. One value is reused across reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Spelling for identifiers, keywords, strings and other tokens.
    pub text: String,
    pub line: usize,
    pub offset: usize,
}

impl Token {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the token for the next read, keeping its text buffer.
    pub fn reset(&mut self) {
        self.kind = TokenKind::Eof;
        self.text.clear();
    }
}
