//! Tag records and the append-only sink they are emitted into.

use serde::Serialize;

use crate::options::Language;

/// Kind of declaration a tag records.
///
/// Letters and long names are language-scoped, see [`TagKind::letter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TagKind {
    Package,
    Function,
    Constant,
    Type,
    Variable,
    Interface,
    Class,
    Object,
    Method,
    TypeAlias,
}

impl TagKind {
    /// One-letter kind used in tag files.
    #[must_use]
    pub const fn letter(self, language: Language) -> char {
        match (self, language) {
            (Self::Package, _) => 'p',
            (Self::Function, _) => 'f',
            (Self::Constant, Language::Go) | (Self::Class, _) => 'c',
            (Self::Constant, Language::Kotlin) => 'C',
            (Self::Type, _) => 't',
            (Self::Variable, _) => 'v',
            (Self::Interface, _) => 'i',
            (Self::Object, _) => 'o',
            (Self::Method, _) => 'm',
            (Self::TypeAlias, _) => 'T',
        }
    }

    /// Long kind name.
    #[must_use]
    pub const fn name(self, language: Language) -> &'static str {
        match (self, language) {
            (Self::Package, _) => "package",
            (Self::Function, _) => "func",
            (Self::Constant, Language::Go) => "const",
            (Self::Constant, Language::Kotlin) => "constant",
            (Self::Type, _) => "type",
            (Self::Variable, Language::Go) => "var",
            (Self::Variable, Language::Kotlin) => "variable",
            (Self::Interface, _) => "interface",
            (Self::Class, _) => "class",
            (Self::Object, _) => "object",
            (Self::Method, _) => "method",
            (Self::TypeAlias, _) => "typealias",
        }
    }
}

/// Index of an emitted tag inside its [`TagSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TagHandle(usize);

impl TagHandle {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A recorded declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub name: String,
    pub kind: TagKind,
    pub language: Language,
    /// 1-based line of the declared name.
    pub line: usize,
    /// Byte offset of the declared name.
    pub offset: usize,
    /// Enclosing declaration, if the scanner tracks nesting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<TagHandle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualified_name: Option<String>,
}

impl Tag {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        kind: TagKind,
        language: Language,
        line: usize,
        offset: usize,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            language,
            line,
            offset,
            scope: None,
            qualified_name: None,
        }
    }

    #[must_use]
    pub const fn letter(&self) -> char {
        self.kind.letter(self.language)
    }

    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        self.kind.name(self.language)
    }
}

/// Append-only, ordered store of the tags emitted for one file.
///
/// Handles stay valid for the life of the sink, so a scanner can keep
/// the handle of an enclosing declaration and look its parent up later.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSink {
    tags: Vec<Tag>,
}

impl TagSink {
    #[must_use]
    pub const fn new() -> Self {
        Self { tags: Vec::new() }
    }

    pub fn emit(&mut self, tag: Tag) -> TagHandle {
        tracing::debug!(
            name = %tag.name,
            kind = tag.kind_name(),
            line = tag.line,
            "tag"
        );
        self.tags.push(tag);
        TagHandle(self.tags.len() - 1)
    }

    #[must_use]
    pub fn get(&self, handle: TagHandle) -> Option<&Tag> {
        self.tags.get(handle.0)
    }

    /// Qualified name of a tag: its own qualified name if it has a scope,
    /// otherwise its plain name.
    #[must_use]
    pub fn qualified_name(&self, handle: TagHandle) -> Option<&str> {
        self.get(handle)
            .map(|tag| tag.qualified_name.as_deref().unwrap_or(&tag.name))
    }

    #[must_use]
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    #[must_use]
    pub fn into_tags(self) -> Vec<Tag> {
        self.tags
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.tags.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.tags.iter()
    }
}

impl<'a> IntoIterator for &'a TagSink {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.iter()
    }
}
