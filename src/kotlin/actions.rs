use tracing::{debug, warn};

use crate::kotlin::grammar::{Action, Grammar, SyntaxError};
use crate::options::{Language, ScanOptions};
use crate::source::LineIndex;
use crate::tag::{Tag, TagHandle, TagKind, TagSink};

/// Scan Kotlin source with the rule matcher and append its tags to
/// `sink`.
///
/// # Errors
///
/// Stops at the first syntax error and returns it. Tags of the units
/// matched before the error stay in `sink`.
pub fn scan(input: &[u8], options: &ScanOptions, sink: &mut TagSink) -> Result<(), SyntaxError> {
    let mut grammar = Grammar::new(input);
    let mut ctx = ParserCtx::new(input, options, sink);
    let mut result = Ok(());
    while !ctx.found_syntax_error() {
        match grammar.parse() {
            Ok(more) => {
                for action in grammar.take_actions() {
                    ctx.apply(action);
                }
                if !more {
                    break;
                }
            }
            Err(err) => {
                ctx.report_error(&err);
                result = Err(err);
            }
        }
    }
    result
}

#[derive(Debug, Clone, Copy)]
struct KindFrame {
    kind: TagKind,
    /// Scope when the frame was pushed.
    saved_scope: Option<TagHandle>,
    /// A tag made in this frame became the current scope.
    scoped: bool,
}

/// State shared by the semantic actions of one file scan.
pub struct ParserCtx<'s> {
    kind_stack: Vec<KindFrame>,
    scope: Option<TagHandle>,
    found_syntax_error: bool,
    lines: LineIndex,
    options: &'s ScanOptions,
    sink: &'s mut TagSink,
}

impl<'s> ParserCtx<'s> {
    /// The kind stack starts with an implicit top-level package frame.
    #[must_use]
    pub fn new(input: &[u8], options: &'s ScanOptions, sink: &'s mut TagSink) -> Self {
        Self {
            kind_stack: vec![KindFrame {
                kind: TagKind::Package,
                saved_scope: None,
                scoped: false,
            }],
            scope: None,
            found_syntax_error: false,
            lines: LineIndex::new(input),
            options,
            sink,
        }
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::PushKind(kind) => self.push_kind(kind),
            Action::PopKind { pop_scope } => self.pop_kind(pop_scope),
            Action::MakeTag {
                name,
                offset,
                push_scope,
            } => {
                let handle = self.make_tag(&name, offset);
                if let (Some(handle), true) = (handle, push_scope) {
                    self.enter_scope(handle);
                }
            }
        }
    }

    pub fn push_kind(&mut self, kind: TagKind) {
        self.kind_stack.push(KindFrame {
            kind,
            saved_scope: self.scope,
            scoped: false,
        });
    }

    /// Leave the innermost declaration. With `pop_scope` the scope moves
    /// to the parent recorded on the current scope tag.
    pub fn pop_kind(&mut self, pop_scope: bool) {
        if self.kind_stack.len() <= 1 {
            return;
        }
        let Some(frame) = self.kind_stack.pop() else {
            return;
        };
        if !pop_scope {
            return;
        }
        self.scope = if frame.scoped {
            self.scope
                .and_then(|handle| self.sink.get(handle))
                .and_then(|tag| tag.scope)
        } else {
            frame.saved_scope
        };
        debug!(scope = ?self.scope.map(TagHandle::index), "scope popped");
    }

    #[must_use]
    pub fn peek_kind(&self) -> TagKind {
        self.kind_stack
            .last()
            .map_or(TagKind::Package, |frame| frame.kind)
    }

    fn enter_scope(&mut self, handle: TagHandle) {
        self.scope = Some(handle);
        if let Some(frame) = self.kind_stack.last_mut() {
            frame.scoped = true;
        }
        debug!(scope = handle.index(), "scope entered");
    }

    /// Tag `name` at byte `offset` with the innermost kind, parented to
    /// the current scope. Returns `None` when the kind is disabled.
    pub fn make_tag(&mut self, name: &str, offset: usize) -> Option<TagHandle> {
        let kind = self.peek_kind();
        if !self.options.is_enabled(kind) {
            return None;
        }
        let line = self.lines.line_of(offset);
        let qualified = self
            .scope
            .and_then(|scope| self.sink.qualified_name(scope))
            .map(|parent| format!("{parent}.{name}"));

        let mut tag = Tag::new(name, kind, Language::Kotlin, line, offset);
        tag.scope = self.scope;
        tag.qualified_name.clone_from(&qualified);
        let handle = self.sink.emit(tag);

        if let (true, Some(qualified)) = (self.options.qualified_tags, qualified) {
            self.sink
                .emit(Tag::new(qualified, kind, Language::Kotlin, line, offset));
        }
        Some(handle)
    }

    /// Record a syntax error and emit the one diagnostic line for it.
    /// Parsing must stop afterwards.
    pub fn report_error(&mut self, err: &SyntaxError) {
        self.found_syntax_error = true;
        warn!("{}: {err}", self.options.display_name());
    }

    #[must_use]
    pub const fn found_syntax_error(&self) -> bool {
        self.found_syntax_error
    }
}
