use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Serialize;

use crate::Error;
use crate::tag::TagKind;

/// Source languages with a tag scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Go,
    Kotlin,
}

impl Language {
    /// Display name used in diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Go => "Go",
            Self::Kotlin => "Kotlin",
        }
    }

    /// File extensions mapped to this language.
    #[must_use]
    pub const fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Go => &["go"],
            Self::Kotlin => &["kt", "kts"],
        }
    }

    /// Look up a language by file extension (without the dot).
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        [Self::Go, Self::Kotlin]
            .into_iter()
            .find(|lang| lang.extensions().contains(&ext))
    }

    /// Look up a language from a file path's extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "go" => Ok(Self::Go),
            "kotlin" | "kt" => Ok(Self::Kotlin),
            _ => Err(Error::UnknownLanguage(s.to_string())),
        }
    }
}

/// Which Kotlin scanner to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KotlinStrategy {
    /// Token-driven keyword walker. Never fails.
    #[default]
    HandWritten,
    /// Rule matcher with semantic actions. Stops at the first syntax error.
    Grammar,
}

/// Per-scan configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// Emit an extra entry named by the qualified name of each scoped tag.
    pub qualified_tags: bool,
    pub kotlin_strategy: KotlinStrategy,
    /// File name used in diagnostics.
    pub file_name: Option<String>,
    disabled_kinds: Vec<TagKind>,
}

impl ScanOptions {
    /// Options with every kind enabled and qualified tags off.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            qualified_tags: false,
            kotlin_strategy: KotlinStrategy::HandWritten,
            file_name: None,
            disabled_kinds: Vec::new(),
        }
    }

    #[must_use]
    pub const fn qualified_tags(mut self, enabled: bool) -> Self {
        self.qualified_tags = enabled;
        self
    }

    #[must_use]
    pub const fn kotlin_strategy(mut self, strategy: KotlinStrategy) -> Self {
        self.kotlin_strategy = strategy;
        self
    }

    #[must_use]
    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    /// Stop emitting tags of `kind`.
    #[must_use]
    pub fn disable(mut self, kind: TagKind) -> Self {
        if !self.disabled_kinds.contains(&kind) {
            self.disabled_kinds.push(kind);
        }
        self
    }

    #[must_use]
    pub fn is_enabled(&self, kind: TagKind) -> bool {
        !self.disabled_kinds.contains(&kind)
    }

    /// File name for diagnostics, or a placeholder for in-memory input.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.file_name.as_deref().unwrap_or("<input>")
    }
}
