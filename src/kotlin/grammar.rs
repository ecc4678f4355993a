//! Predictive rule matcher for Kotlin declarations.
//!
//! The matcher recognizes one top-level unit per [`Grammar::parse`] call
//! and records the semantic actions its rules fire. Actions are only
//! handed out once the whole unit has matched, so a unit that fails
//! contributes nothing. Bodies and initializer expressions are skipped
//! as balanced token groups.
//!
//! Rule comments use the notation of the Kotlin grammar, trimmed to the
//! parts that matter for tagging.

use std::fmt;

use tracing::trace;

use crate::kotlin::lexer::tokenize;
use crate::kotlin::token::{HARD_KEYWORDS, Token, TokenKind};
use crate::tag::TagKind;

/// Class bodies nested deeper than this are rejected.
const MAX_DEPTH: usize = 256;

const MODIFIERS: &[&str] = &[
    "abstract",
    "actual",
    "annotation",
    "companion",
    "const",
    "crossinline",
    "data",
    "enum",
    "expect",
    "external",
    "final",
    "infix",
    "inline",
    "inner",
    "internal",
    "lateinit",
    "noinline",
    "open",
    "operator",
    "override",
    "private",
    "protected",
    "public",
    "sealed",
    "suspend",
    "tailrec",
    "value",
    "vararg",
];

static EOF: Token = Token {
    kind: TokenKind::Eof,
    text: String::new(),
    line: 0,
    offset: 0,
    end: 0,
    newline_before: false,
};

/// What went wrong in a [`SyntaxError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    UnexpectedToken(String),
    UnexpectedEof,
    /// Declarations nested beyond the supported depth.
    TooDeep,
}

impl fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedToken(text) => write!(f, "unexpected '{text}'"),
            Self::UnexpectedEof => write!(f, "unexpected end of input"),
            Self::TooDeep => write!(f, "declarations nested too deeply"),
        }
    }
}

/// The first point where the input stopped matching the grammar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("syntax error at line {line}, offset {offset}: {kind}")]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub line: usize,
    pub offset: usize,
}

/// A semantic action fired by a matched rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Entering a declaration of this kind.
    PushKind(TagKind),
    /// Leaving it. With `pop_scope` the current scope moves to the parent
    /// of the declaration's tag.
    PopKind { pop_scope: bool },
    /// Tag `name` with the innermost kind. With `push_scope` the new tag
    /// becomes the current scope.
    MakeTag {
        name: String,
        offset: usize,
        push_scope: bool,
    },
}

#[derive(Debug, Clone, Copy, Default)]
struct Modifiers {
    constant: bool,
    companion: bool,
    enumeration: bool,
}

/// Rule matcher over a Kotlin token stream.
pub struct Grammar {
    tokens: Vec<Token>,
    pos: usize,
    actions: Vec<Action>,
    header_done: bool,
    depth: usize,
}

impl Grammar {
    #[must_use]
    pub fn new(input: &[u8]) -> Self {
        Self {
            tokens: tokenize(input),
            pos: 0,
            actions: Vec::new(),
            header_done: false,
            depth: 0,
        }
    }

    /// Match the next top-level unit. The first call matches the file
    /// header (file annotations, package, imports).
    ///
    /// Returns whether input remains.
    ///
    /// # Errors
    ///
    /// Returns a [`SyntaxError`] at the first token no rule accepts. The
    /// actions of the failed unit are dropped.
    pub fn parse(&mut self) -> Result<bool, SyntaxError> {
        self.actions.clear();
        self.depth = 0;
        let result = if self.header_done {
            self.skip_semis();
            if self.at_eof() {
                Ok(())
            } else {
                self.declaration(false)
            }
        } else {
            self.header_done = true;
            self.file_header()
        };
        if let Err(err) = result {
            self.actions.clear();
            return Err(err);
        }
        self.skip_semis();
        Ok(!self.at_eof())
    }

    /// Actions of the unit matched by the last successful
    /// [`parse`](Self::parse).
    pub fn take_actions(&mut self) -> Vec<Action> {
        std::mem::take(&mut self.actions)
    }

    // kotlinFile: fileAnnotation* packageHeader importList topLevelObject*
    fn file_header(&mut self) -> Result<(), SyntaxError> {
        while self.at_punct(b'@') && self.peek_at(1).is_word("file") {
            self.annotation()?;
        }
        self.skip_semis();

        // packageHeader: "package" identifier ";"?
        if self.eat_word("package") {
            let token = self.peek();
            if token.kind != TokenKind::Word || token.name().is_none() {
                return Err(self.unexpected());
            }
            let (name, offset) = (token.text.clone(), token.offset);
            self.bump();
            self.make_leaf(TagKind::Package, name, offset);
            self.skip_semis();
        }

        // importHeader: "import" identifier ("." "*" | "as" simpleIdentifier)? ";"?
        while self.eat_word("import") {
            let token = self.peek();
            if token.kind != TokenKind::Word {
                return Err(self.unexpected());
            }
            let wildcard = token.text.ends_with('.');
            self.bump();
            if wildcard {
                self.expect_punct(b'*')?;
            } else if self.eat_word("as") {
                self.simple_name()?;
            }
            self.skip_semis();
        }
        Ok(())
    }

    // declaration: modifiers? (classDeclaration | objectDeclaration
    //   | functionDeclaration | propertyDeclaration | typeAlias)
    // classMemberDeclaration adds companionObject, anonymousInitializer,
    //   and secondaryConstructor.
    fn declaration(&mut self, member: bool) -> Result<(), SyntaxError> {
        let mods = self.modifiers()?;
        let token = self.peek();
        if token.kind != TokenKind::Word {
            return Err(self.unexpected());
        }
        match token.text.as_str() {
            "class" => self.class_declaration(TagKind::Class, mods),
            "interface" => self.class_declaration(TagKind::Interface, mods),
            "fun" if self.peek_at(1).is_word("interface") => {
                self.bump();
                self.class_declaration(TagKind::Interface, mods)
            }
            "fun" => self.function_declaration(),
            "object" => self.object_declaration(mods),
            "val" | "var" => self.property_declaration(mods),
            "typealias" => self.type_alias(),
            "init" if member => self.anonymous_initializer(),
            "constructor" if member => self.secondary_constructor(),
            _ => Err(self.unexpected()),
        }
    }

    // modifiers: (annotation | modifier)+
    //
    // A modifier word only counts when another modifier or a keyword
    // follows, so `value: Int` stays a parameter name.
    fn modifiers(&mut self) -> Result<Modifiers, SyntaxError> {
        let mut mods = Modifiers::default();
        loop {
            if self.at_punct(b'@') {
                self.annotation()?;
                continue;
            }
            let token = self.peek();
            let next = self.peek_at(1);
            let is_modifier = token.kind == TokenKind::Word
                && MODIFIERS.contains(&token.text.as_str())
                && (next.kind == TokenKind::Word || next.is_punct(b'@'));
            if !is_modifier {
                return Ok(mods);
            }
            match token.text.as_str() {
                "const" => mods.constant = true,
                "companion" => mods.companion = true,
                "enum" => mods.enumeration = true,
                _ => {}
            }
            self.bump();
        }
    }

    // annotation: "@" (useSiteTarget ":")?
    //   (unescapedAnnotation | "[" unescapedAnnotation+ "]")
    fn annotation(&mut self) -> Result<(), SyntaxError> {
        self.expect_punct(b'@')?;
        if self.peek().kind == TokenKind::Word
            && self.peek_at(1).is_punct(b':')
            && self.adjacent()
        {
            self.bump();
            self.bump();
        }
        if self.at_punct(b'[') {
            return self.skip_group();
        }
        if self.peek().kind != TokenKind::Word {
            return Err(self.unexpected());
        }
        self.bump();
        if self.at_punct(b'<') && !self.peek().newline_before {
            self.skip_angle()?;
        }
        if self.at_punct(b'(') && !self.peek().newline_before {
            self.skip_group()?;
        }
        Ok(())
    }

    // classDeclaration: ("class" | "fun"? "interface") simpleIdentifier
    //   typeParameters? primaryConstructor? (":" delegationSpecifiers)?
    //   typeConstraints? (classBody | enumClassBody)?
    fn class_declaration(&mut self, kind: TagKind, mods: Modifiers) -> Result<(), SyntaxError> {
        self.bump();
        let (name, offset) = self.simple_name()?;
        self.actions.push(Action::PushKind(kind));
        self.actions.push(Action::MakeTag {
            name,
            offset,
            push_scope: true,
        });
        if self.at_punct(b'<') {
            self.skip_angle()?;
        }
        self.primary_constructor()?;
        if self.eat_punct(b':') {
            self.delegation_specifiers()?;
        }
        self.type_constraints()?;
        if self.at_punct(b'{') {
            if mods.enumeration {
                self.enum_class_body()?;
            } else {
                self.class_body()?;
            }
        }
        self.actions.push(Action::PopKind { pop_scope: true });
        Ok(())
    }

    // primaryConstructor: (modifiers? "constructor")? classParameters
    fn primary_constructor(&mut self) -> Result<(), SyntaxError> {
        let start = self.pos;
        if self.modifiers().is_ok() && self.eat_word("constructor") {
            return self.class_parameters();
        }
        self.pos = start;
        if self.at_punct(b'(') {
            self.class_parameters()?;
        }
        Ok(())
    }

    // classParameters: "(" (classParameter ("," classParameter)* ","?)? ")"
    // classParameter: modifiers? ("val" | "var")? simpleIdentifier ":" type
    //   ("=" expression)?
    fn class_parameters(&mut self) -> Result<(), SyntaxError> {
        self.expect_punct(b'(')?;
        while !self.eat_punct(b')') {
            self.modifiers()?;
            let property = self.eat_word("val") || self.eat_word("var");
            let (name, offset) = self.simple_name()?;
            if property {
                self.make_leaf(TagKind::Variable, name, offset);
            }
            self.expect_punct(b':')?;
            self.skip_type()?;
            if self.eat_punct(b'=') {
                self.skip_expression(false)?;
            }
            if !self.eat_punct(b',') {
                self.expect_punct(b')')?;
                break;
            }
        }
        Ok(())
    }

    // delegationSpecifiers: delegationSpecifier ("," delegationSpecifier)*
    // delegationSpecifier: type valueArguments? ("by" expression)?
    fn delegation_specifiers(&mut self) -> Result<(), SyntaxError> {
        loop {
            self.skip_type()?;
            if self.at_punct(b'(') && !self.peek().newline_before {
                self.skip_group()?;
            }
            if self.eat_word("by") {
                self.skip_expression(true)?;
            }
            if !self.eat_punct(b',') {
                return Ok(());
            }
        }
    }

    // typeConstraints: "where" typeConstraint ("," typeConstraint)*
    // typeConstraint: annotation* simpleIdentifier ":" type
    fn type_constraints(&mut self) -> Result<(), SyntaxError> {
        if !self.eat_word("where") {
            return Ok(());
        }
        loop {
            while self.at_punct(b'@') {
                self.annotation()?;
            }
            self.simple_name()?;
            self.expect_punct(b':')?;
            self.skip_type()?;
            if !self.eat_punct(b',') {
                return Ok(());
            }
        }
    }

    // classBody: "{" classMemberDeclarations "}"
    fn class_body(&mut self) -> Result<(), SyntaxError> {
        self.expect_punct(b'{')?;
        self.nest()?;
        self.member_declarations()?;
        self.depth -= 1;
        Ok(())
    }

    // classMemberDeclarations: (classMemberDeclaration semis?)* "}"
    fn member_declarations(&mut self) -> Result<(), SyntaxError> {
        loop {
            self.skip_semis();
            if self.eat_punct(b'}') {
                return Ok(());
            }
            self.declaration(true)?;
        }
    }

    // enumClassBody: "{" enumEntries? (";" classMemberDeclarations)? "}"
    // enumEntry: annotation* simpleIdentifier valueArguments? classBody?
    fn enum_class_body(&mut self) -> Result<(), SyntaxError> {
        self.expect_punct(b'{')?;
        self.nest()?;
        loop {
            while self.at_punct(b'@') {
                self.annotation()?;
            }
            if self.at_punct(b'}') || self.at_punct(b';') {
                break;
            }
            self.simple_name()?;
            if self.at_punct(b'(') {
                self.skip_group()?;
            }
            if self.at_punct(b'{') {
                self.skip_group()?;
            }
            if !self.eat_punct(b',') {
                break;
            }
        }
        if self.eat_punct(b';') {
            self.member_declarations()?;
        } else {
            self.expect_punct(b'}')?;
        }
        self.depth -= 1;
        Ok(())
    }

    // objectDeclaration: "object" simpleIdentifier (":" delegationSpecifiers)?
    //   classBody?
    // companionObject: "companion" "object" simpleIdentifier?
    //   (":" delegationSpecifiers)? classBody?
    fn object_declaration(&mut self, mods: Modifiers) -> Result<(), SyntaxError> {
        self.bump();
        let named = !mods.companion || self.at_simple_name();
        self.actions.push(Action::PushKind(TagKind::Object));
        if named {
            let (name, offset) = self.simple_name()?;
            self.actions.push(Action::MakeTag {
                name,
                offset,
                push_scope: true,
            });
        }
        if self.eat_punct(b':') {
            self.delegation_specifiers()?;
        }
        if self.at_punct(b'{') {
            self.class_body()?;
        }
        self.actions.push(Action::PopKind { pop_scope: named });
        Ok(())
    }

    // functionDeclaration: "fun" typeParameters? (receiverType ".")?
    //   simpleIdentifier functionValueParameters (":" type)?
    //   typeConstraints? functionBody?
    // functionBody: block | "=" expression
    fn function_declaration(&mut self) -> Result<(), SyntaxError> {
        self.bump();
        if self.at_punct(b'<') {
            self.skip_angle()?;
        }
        let (name, offset) = self.receiver_and_name()?;
        self.make_leaf(TagKind::Method, name, offset);
        if !self.at_punct(b'(') {
            return Err(self.unexpected());
        }
        self.skip_group()?;
        if self.eat_punct(b':') {
            self.skip_type()?;
        }
        self.type_constraints()?;
        if self.at_punct(b'{') {
            self.skip_group()?;
        } else if self.eat_punct(b'=') {
            self.skip_expression(false)?;
        }
        Ok(())
    }

    // propertyDeclaration: ("val" | "var") typeParameters?
    //   (receiverType ".")? (multiVariableDeclaration | variableDeclaration)
    //   typeConstraints? ("=" expression | propertyDelegate)? ";"?
    //   getter? setter?
    fn property_declaration(&mut self, mods: Modifiers) -> Result<(), SyntaxError> {
        self.bump();
        let kind = if mods.constant {
            TagKind::Constant
        } else {
            TagKind::Variable
        };
        if self.at_punct(b'<') {
            self.skip_angle()?;
        }
        if self.at_punct(b'(') {
            self.multi_variable(kind)?;
        } else {
            let (name, offset) = self.receiver_and_name()?;
            self.make_leaf(kind, name, offset);
            if self.eat_punct(b':') {
                self.skip_type()?;
            }
        }
        self.type_constraints()?;
        if self.eat_punct(b'=') || self.eat_word("by") {
            self.skip_expression(false)?;
        }
        self.accessors()
    }

    // multiVariableDeclaration: "(" variableDeclaration
    //   ("," variableDeclaration)* ","? ")"
    fn multi_variable(&mut self, kind: TagKind) -> Result<(), SyntaxError> {
        self.expect_punct(b'(')?;
        loop {
            while self.at_punct(b'@') {
                self.annotation()?;
            }
            let (name, offset) = self.simple_name()?;
            if name != "_" {
                self.make_leaf(kind, name, offset);
            }
            if self.eat_punct(b':') {
                self.skip_type()?;
            }
            if !self.eat_punct(b',') || self.at_punct(b')') {
                break;
            }
        }
        self.expect_punct(b')')
    }

    // getter: modifiers? "get" ("(" ")" (":" type)? functionBody)?
    // setter: modifiers? "set" ("(" parameter ")" (":" type)? functionBody)?
    fn accessors(&mut self) -> Result<(), SyntaxError> {
        for _ in 0..2 {
            let start = self.pos;
            self.eat_punct(b';');
            let is_accessor = self.modifiers().is_ok() && (self.at_word("get") || self.at_word("set"));
            if !is_accessor {
                self.pos = start;
                return Ok(());
            }
            self.bump();
            if self.at_punct(b'(') && !self.peek().newline_before {
                self.skip_group()?;
            }
            if self.eat_punct(b':') {
                self.skip_type()?;
            }
            if self.at_punct(b'{') {
                self.skip_group()?;
            } else if self.eat_punct(b'=') {
                self.skip_expression(false)?;
            }
        }
        Ok(())
    }

    // typeAlias: "typealias" simpleIdentifier typeParameters? "=" type
    fn type_alias(&mut self) -> Result<(), SyntaxError> {
        self.bump();
        let (name, offset) = self.simple_name()?;
        self.make_leaf(TagKind::TypeAlias, name, offset);
        if self.at_punct(b'<') {
            self.skip_angle()?;
        }
        self.expect_punct(b'=')?;
        self.skip_type()
    }

    // anonymousInitializer: "init" block
    fn anonymous_initializer(&mut self) -> Result<(), SyntaxError> {
        self.bump();
        if !self.at_punct(b'{') {
            return Err(self.unexpected());
        }
        self.skip_group()
    }

    // secondaryConstructor: "constructor" functionValueParameters
    //   (":" ("this" | "super") valueArguments)? block?
    fn secondary_constructor(&mut self) -> Result<(), SyntaxError> {
        self.bump();
        if !self.at_punct(b'(') {
            return Err(self.unexpected());
        }
        self.skip_group()?;
        if self.eat_punct(b':') {
            if !(self.eat_word("this") || self.eat_word("super")) || !self.at_punct(b'(') {
                return Err(self.unexpected());
            }
            self.skip_group()?;
        }
        if self.at_punct(b'{') {
            self.skip_group()?;
        }
        Ok(())
    }

    /// Match `(receiverType ".")? simpleIdentifier` and return the name.
    ///
    /// The receiver may be dotted (`String.name`), generic
    /// (`List<T>.name`), nullable (`String?.name`), or a parenthesized
    /// function type.
    fn receiver_and_name(&mut self) -> Result<(String, usize), SyntaxError> {
        let mut last = None;
        if self.at_punct(b'(') {
            self.skip_group()?;
        } else if matches!(
            self.peek().kind,
            TokenKind::Word | TokenKind::EscapedIdentifier
        ) {
            last = Some(self.pos);
            self.bump();
        } else {
            return Err(self.unexpected());
        }

        loop {
            let token = self.peek();
            if token.newline_before {
                break;
            }
            let after_dot = last.is_none_or(|i| self.tokens[i].text.ends_with('.'));
            if token.is_punct(b'<') {
                self.skip_angle()?;
            } else if token.is_punct(b'?') {
                self.bump();
            } else if token.kind == TokenKind::Word && token.text.starts_with('.') {
                last = Some(self.pos);
                self.bump();
            } else if token.kind == TokenKind::EscapedIdentifier && after_dot && last.is_some() {
                last = Some(self.pos);
                self.bump();
            } else {
                break;
            }
        }

        let Some(last) = last else {
            return Err(self.unexpected());
        };
        let token = &self.tokens[last];
        let name = match token.kind {
            TokenKind::EscapedIdentifier => Some(token.text.as_str()),
            _ => token.name().filter(|name| !HARD_KEYWORDS.contains(name)),
        };
        match name {
            Some(name) if !name.is_empty() => Ok((name.to_string(), token.name_offset())),
            _ => Err(Self::error_at(token)),
        }
    }

    // type: typeModifiers? (functionType | parenthesizedType
    //   | nullableType | typeReference)
    // functionType: (receiverType ".")? functionTypeParameters "->" type
    fn skip_type(&mut self) -> Result<(), SyntaxError> {
        loop {
            while self.at_punct(b'@') || self.at_word("suspend") {
                if self.at_punct(b'@') {
                    self.annotation()?;
                } else {
                    self.bump();
                }
            }

            if self.at_punct(b'(') {
                self.skip_group()?;
            } else if self.at_type_name() {
                let mut receiver = self.peek().text.ends_with('.');
                self.bump();
                loop {
                    if self.at_punct(b'<') {
                        self.skip_angle()?;
                    }
                    let token = self.peek();
                    if token.newline_before {
                        break;
                    }
                    if token.kind == TokenKind::Word && token.text.starts_with('.') {
                        receiver = token.text.ends_with('.');
                        self.bump();
                    } else if token.is_punct(b'.') && self.peek_at(1).is_punct(b'(') {
                        receiver = true;
                        self.bump();
                    } else {
                        break;
                    }
                }
                if receiver {
                    if !self.at_punct(b'(') {
                        return Err(self.unexpected());
                    }
                    self.skip_group()?;
                }
            } else {
                return Err(self.unexpected());
            }

            while self.eat_punct(b'?') {}
            if !self.at_arrow() {
                return Ok(());
            }
            self.bump();
            self.bump();
        }
    }

    /// Skip type arguments or parameters starting at `<`.
    fn skip_angle(&mut self) -> Result<(), SyntaxError> {
        self.expect_punct(b'<')?;
        let mut depth = 1usize;
        while depth > 0 {
            let token = self.peek();
            match token.kind {
                TokenKind::Eof
                | TokenKind::Punct(b')' | b']' | b'{' | b'}' | b';' | b'=') => {
                    return Err(self.unexpected());
                }
                TokenKind::Punct(b'(' | b'[') => self.skip_group()?,
                TokenKind::Punct(b'-') if self.at_arrow() => {
                    self.bump();
                    self.bump();
                }
                TokenKind::Punct(b'<') => {
                    depth += 1;
                    self.bump();
                }
                TokenKind::Punct(b'>') => {
                    depth -= 1;
                    self.bump();
                }
                _ => self.bump(),
            }
        }
        Ok(())
    }

    /// Skip a balanced `(...)`, `[...]` or `{...}` group starting at the
    /// current token. Every closer must match its opener.
    fn skip_group(&mut self) -> Result<(), SyntaxError> {
        let line = self.peek().line;
        let mut expected = Vec::new();
        loop {
            match self.peek().kind {
                TokenKind::Eof => return Err(self.unexpected()),
                TokenKind::Punct(b'(') => expected.push(b')'),
                TokenKind::Punct(b'[') => expected.push(b']'),
                TokenKind::Punct(b'{') => expected.push(b'}'),
                TokenKind::Punct(c @ (b')' | b']' | b'}')) => {
                    if expected.pop() != Some(c) {
                        return Err(self.unexpected());
                    }
                }
                _ if expected.is_empty() => return Err(self.unexpected()),
                _ => {}
            }
            self.bump();
            if expected.is_empty() {
                trace!(line, "skipped group");
                return Ok(());
            }
        }
    }

    /// Skip an expression up to a separator, an unmatched closer, or a
    /// newline that ends the statement. With `stop_at_brace` a `{` also
    /// ends it, as in `: Base by impl { ... }`.
    fn skip_expression(&mut self, stop_at_brace: bool) -> Result<(), SyntaxError> {
        let start = self.pos;
        let mut continued = false;
        loop {
            let token = self.peek();
            match token.kind {
                TokenKind::Eof | TokenKind::Punct(b';' | b',' | b')' | b']' | b'}') => break,
                TokenKind::Punct(b'{') if stop_at_brace => break,
                _ => {}
            }
            if self.pos > start && token.newline_before && !continued && !self.continues() {
                break;
            }

            if matches!(token.kind, TokenKind::Punct(b'(' | b'[' | b'{')) {
                // `if (c)` and friends continue past a newline.
                let head = self.pos > start
                    && token.is_punct(b'(')
                    && ["if", "while", "for", "catch", "when"]
                        .iter()
                        .any(|word| self.tokens[self.pos - 1].is_word(word));
                self.skip_group()?;
                continued = head;
            } else {
                continued = false;
                self.bump();
            }
        }
        if self.pos == start {
            return Err(self.unexpected());
        }
        Ok(())
    }

    /// Whether the expression goes on across the newline before the
    /// current token.
    fn continues(&self) -> bool {
        let Some(prev) = self.pos.checked_sub(1).map(|i| &self.tokens[i]) else {
            return false;
        };
        let next = self.peek();
        let prev_continues = match prev.kind {
            TokenKind::Punct(c) => b"=+-*/%&|:.,(".contains(&c),
            TokenKind::Word => {
                prev.text.ends_with('.')
                    || ["else", "try", "finally", "do", "in", "is", "as"].contains(&prev.text.as_str())
            }
            _ => false,
        };
        let next_continues = match next.kind {
            TokenKind::Punct(c) => b".?:&|".contains(&c),
            TokenKind::Word => {
                next.text.starts_with('.')
                    || ["else", "catch", "finally", "as"].contains(&next.text.as_str())
            }
            _ => false,
        };
        prev_continues || next_continues
    }

    fn make_leaf(&mut self, kind: TagKind, name: String, offset: usize) {
        self.actions.push(Action::PushKind(kind));
        self.actions.push(Action::MakeTag {
            name,
            offset,
            push_scope: false,
        });
        self.actions.push(Action::PopKind { pop_scope: false });
    }

    // simpleIdentifier: an undotted word that is not a hard keyword, or
    // an escaped identifier.
    fn simple_name(&mut self) -> Result<(String, usize), SyntaxError> {
        if !self.at_simple_name() {
            return Err(self.unexpected());
        }
        let token = self.peek();
        let name = (token.text.clone(), token.name_offset());
        self.bump();
        Ok(name)
    }

    fn at_simple_name(&self) -> bool {
        let token = self.peek();
        match token.kind {
            TokenKind::EscapedIdentifier => !token.text.is_empty(),
            TokenKind::Word => {
                !token.text.contains('.') && !HARD_KEYWORDS.contains(&token.text.as_str())
            }
            _ => false,
        }
    }

    fn at_type_name(&self) -> bool {
        let token = self.peek();
        match token.kind {
            TokenKind::EscapedIdentifier => true,
            TokenKind::Word => {
                !token.text.starts_with('.') && !HARD_KEYWORDS.contains(&token.text.as_str())
            }
            _ => false,
        }
    }

    fn nest(&mut self) -> Result<(), SyntaxError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            let token = self.peek();
            return Err(SyntaxError {
                kind: SyntaxErrorKind::TooDeep,
                line: token.line,
                offset: token.offset,
            });
        }
        Ok(())
    }

    fn peek(&self) -> &Token {
        self.peek_at(0)
    }

    fn peek_at(&self, n: usize) -> &Token {
        self.tokens
            .get(self.pos + n)
            .or_else(|| self.tokens.last())
            .unwrap_or(&EOF)
    }

    /// The current token and the next one touch with no space between.
    fn adjacent(&self) -> bool {
        self.peek().end == self.peek_at(1).offset
    }

    /// `->` as two touching tokens.
    fn at_arrow(&self) -> bool {
        self.at_punct(b'-') && self.peek_at(1).is_punct(b'>') && self.adjacent()
    }

    fn at_eof(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn at_punct(&self, c: u8) -> bool {
        self.peek().is_punct(c)
    }

    fn at_word(&self, word: &str) -> bool {
        self.peek().is_word(word)
    }

    fn bump(&mut self) {
        if !self.at_eof() {
            self.pos += 1;
        }
    }

    fn eat_punct(&mut self, c: u8) -> bool {
        let matched = self.at_punct(c);
        if matched {
            self.bump();
        }
        matched
    }

    fn eat_word(&mut self, word: &str) -> bool {
        let matched = self.at_word(word);
        if matched {
            self.bump();
        }
        matched
    }

    fn expect_punct(&mut self, c: u8) -> Result<(), SyntaxError> {
        if self.eat_punct(c) {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn skip_semis(&mut self) {
        while self.eat_punct(b';') {}
    }

    fn unexpected(&self) -> SyntaxError {
        Self::error_at(self.peek())
    }

    fn error_at(token: &Token) -> SyntaxError {
        let kind = match token.kind {
            TokenKind::Eof => SyntaxErrorKind::UnexpectedEof,
            TokenKind::EscapedIdentifier => {
                SyntaxErrorKind::UnexpectedToken(format!("`{}`", token.text))
            }
            _ => SyntaxErrorKind::UnexpectedToken(token.text.clone()),
        };
        SyntaxError {
            kind,
            line: token.line,
            offset: token.offset,
        }
    }
}
