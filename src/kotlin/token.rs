use crate::tag::TagKind;

/// Token kinds produced by the Kotlin lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenKind {
    /// Identifier characters, possibly dotted (`a.b.c`, `.let`).
    Word,
    /// `` `name with spaces` ``; text excludes the backticks.
    EscapedIdentifier,
    Number,
    /// String literal of any flavor. Contents are not kept.
    String,
    /// Character literal. Contents are not kept.
    Char,
    /// Any other single byte.
    Punct(u8),
    #[default]
    Eof,
}

/// A single token. One value is reused across reads by the walker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    /// Byte offset of the first byte.
    pub offset: usize,
    /// Byte offset just past the last byte.
    pub end: usize,
    /// A newline separates this token from the previous one.
    pub newline_before: bool,
}

impl Token {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.kind = TokenKind::Eof;
        self.text.clear();
        self.newline_before = false;
    }

    #[must_use]
    pub fn is_punct(&self, c: u8) -> bool {
        self.kind == TokenKind::Punct(c)
    }

    /// Exact match against an undotted word.
    #[must_use]
    pub fn is_word(&self, word: &str) -> bool {
        self.kind == TokenKind::Word && self.text == word
    }

    /// The identifier this token declares, if it can name anything.
    ///
    /// A dotted word names its last segment, so `String.trim` declares
    /// `trim`.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self.kind {
            TokenKind::EscapedIdentifier if !self.text.is_empty() => Some(&self.text),
            TokenKind::Word => {
                let last = self.text.rsplit('.').next().unwrap_or_default();
                let starts_ok = last
                    .bytes()
                    .next()
                    .is_some_and(|c| !c.is_ascii_digit());
                starts_ok.then_some(last)
            }
            _ => None,
        }
    }

    /// Byte offset of [`name`](Self::name) within the source.
    #[must_use]
    pub fn name_offset(&self) -> usize {
        match self.kind {
            // Counted back from the end: the text may hold replacement
            // characters wider than the source bytes.
            TokenKind::Word => self.text.rfind('.').map_or(self.offset, |dot| {
                let tail = self.text.len() - dot - 1;
                self.end.saturating_sub(tail).max(self.offset)
            }),
            TokenKind::EscapedIdentifier => self.offset + 1,
            _ => self.offset,
        }
    }
}

/// Declaration keywords that start a tag in the hand-written walker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Declaration {
    Package,
    Interface,
    Class,
    Object,
    Fun,
    TypeAlias,
    Val,
    Var,
}

impl Declaration {
    #[must_use]
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "package" => Some(Self::Package),
            "interface" => Some(Self::Interface),
            "class" => Some(Self::Class),
            "object" => Some(Self::Object),
            "fun" => Some(Self::Fun),
            "typealias" => Some(Self::TypeAlias),
            "val" => Some(Self::Val),
            "var" => Some(Self::Var),
            _ => None,
        }
    }

    /// Kind of the tag this declaration produces.
    #[must_use]
    pub const fn kind(self) -> TagKind {
        match self {
            Self::Package => TagKind::Package,
            Self::Interface => TagKind::Interface,
            Self::Class => TagKind::Class,
            Self::Object => TagKind::Object,
            Self::Fun => TagKind::Method,
            Self::TypeAlias => TagKind::TypeAlias,
            Self::Val | Self::Var => TagKind::Variable,
        }
    }
}

/// Words that can never name a declaration.
pub const HARD_KEYWORDS: &[&str] = &[
    "as", "break", "class", "continue", "do", "else", "false", "for", "fun", "if", "in",
    "interface", "is", "null", "object", "package", "return", "super", "this", "throw", "true",
    "try", "typealias", "typeof", "val", "var", "when", "while",
];
