//! Textual tree notation for debugging and tests.
//!
//! This is not source code; it is a direct spelling of the role structure:
//!
//! ```text
//! (ExpressionStatement
//!   :expression (MethodInvocation
//!     :receiver (SimpleName a)
//!     :name (SimpleName foo)
//!     :arguments [(NumberLiteral 1) (StringLiteral "x")]))
//! ```
//!
//! - A kind with a single SIMPLE role takes its value as a bare atom:
//!   `(SimpleName a)`, `(Operator +)`, `(BooleanLiteral true)`.
//! - Other roles are spelled `:role value`, where value is a node, a
//!   `[...]` list of nodes, or an atom for SIMPLE roles.
//! - Omitted roles are empty. `Kind@3` or `Kind@3-5` sets the span lines.
//! - Quoted atoms keep their quotes for literal tokens and lose them
//!   elsewhere (`:modifiers "public static"`).
//!
//! [`dump`] writes the same notation on one line, without spans, so
//! `read(dump(t))` is `is_same` to `t`.

use std::fmt::Write;
use std::iter::Peekable;
use std::str::CharIndices;

use graft_stack::ensure_sufficient_stack;

use crate::{
    Modifiers, Name, NodeId, NodeKind, Operator, RoleDesc, RoleError, SharedInterner, Slot,
    SlotKind, Span, Tree, Value, ValueKind,
};

/// Error reading the tree notation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SexpError {
    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("unexpected `{found}` at offset {offset}")]
    Unexpected { found: String, offset: usize },

    #[error("unterminated string starting at offset {offset}")]
    UnterminatedString { offset: usize },

    #[error("unknown node kind `{0}`")]
    UnknownKind(String),

    #[error("{kind} has no role `{role}`")]
    UnknownRole { kind: NodeKind, role: String },

    #[error("`{text}` is not a valid {expected:?} value")]
    BadValue { text: String, expected: ValueKind },

    #[error("bad span `{0}`")]
    BadSpan(String),

    #[error(transparent)]
    Role(#[from] RoleError),
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Token {
    Open,
    Close,
    OpenList,
    CloseList,
    Keyword(String),
    Atom { text: String, quoted: bool },
}

struct Lexer<'a> {
    src: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Lexer {
            src,
            chars: src.char_indices().peekable(),
        }
    }

    fn offset(&mut self) -> usize {
        self.chars.peek().map_or(self.src.len(), |&(i, _)| i)
    }

    fn next_token(&mut self) -> Result<Option<(usize, Token)>, SexpError> {
        while self.chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
        let Some((start, c)) = self.chars.next() else {
            return Ok(None);
        };
        let token = match c {
            '(' => Token::Open,
            ')' => Token::Close,
            '[' => Token::OpenList,
            ']' => Token::CloseList,
            '"' => {
                let mut escaped = false;
                let end = loop {
                    let Some((i, c)) = self.chars.next() else {
                        return Err(SexpError::UnterminatedString { offset: start });
                    };
                    match c {
                        '\\' if !escaped => escaped = true,
                        '"' if !escaped => break i + 1,
                        _ => escaped = false,
                    }
                };
                Token::Atom {
                    text: self.src[start..end].to_owned(),
                    quoted: true,
                }
            }
            _ => {
                while self
                    .chars
                    .next_if(|&(_, c)| !c.is_whitespace() && !matches!(c, '(' | ')' | '[' | ']'))
                    .is_some()
                {}
                let text = &self.src[start..self.offset()];
                match text.strip_prefix(':') {
                    Some(role) if !role.is_empty() => Token::Keyword(role.to_owned()),
                    _ => Token::Atom {
                        text: text.to_owned(),
                        quoted: false,
                    },
                }
            }
        };
        Ok(Some((start, token)))
    }
}

struct Reader<'a, 't> {
    lexer: Lexer<'a>,
    peeked: Option<(usize, Token)>,
    tree: &'t mut Tree,
}

impl Reader<'_, '_> {
    fn peek(&mut self) -> Result<Option<&Token>, SexpError> {
        if self.peeked.is_none() {
            self.peeked = self.lexer.next_token()?;
        }
        Ok(self.peeked.as_ref().map(|(_, t)| t))
    }

    fn bump(&mut self) -> Result<(usize, Token), SexpError> {
        match self.peeked.take() {
            Some(t) => Ok(t),
            None => self.lexer.next_token()?.ok_or(SexpError::UnexpectedEof),
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<(), SexpError> {
        let (offset, token) = self.bump()?;
        if &token == expected {
            Ok(())
        } else {
            Err(unexpected(offset, &token))
        }
    }

    fn node(&mut self) -> Result<NodeId, SexpError> {
        self.expect(&Token::Open)?;
        let (offset, head) = self.bump()?;
        let Token::Atom {
            text: head,
            quoted: false,
        } = head
        else {
            return Err(unexpected(offset, &head));
        };
        let (kind_name, span) = match head.split_once('@') {
            Some((kind, lines)) => (kind, Some(parse_span(lines)?)),
            None => (head.as_str(), None),
        };
        let kind =
            NodeKind::from_str(kind_name).ok_or_else(|| SexpError::UnknownKind(kind_name.into()))?;
        let id = self.tree.alloc(kind, span.unwrap_or(Span::DUMMY));

        if let Some(desc) = kind.sole_simple_role() {
            let has_atom = matches!(self.peek()?, Some(Token::Atom { .. }));
            if has_atom {
                self.simple_value(id, &desc)?;
            }
        }

        loop {
            let (offset, token) = self.bump()?;
            match token {
                Token::Close => return Ok(id),
                Token::Keyword(role_name) => {
                    let desc = crate::Role::from_str(&role_name)
                        .and_then(|r| kind.role_desc(r))
                        .ok_or(SexpError::UnknownRole {
                            kind,
                            role: role_name,
                        })?;
                    match desc.slot {
                        SlotKind::Simple(_) => self.simple_value(id, &desc)?,
                        SlotKind::Child => {
                            let child = ensure_sufficient_stack(|| self.node())?;
                            self.tree.try_set_child(id, desc.role, Some(child))?;
                        }
                        SlotKind::List(_) => {
                            self.expect(&Token::OpenList)?;
                            while self.peek()? != Some(&Token::CloseList) {
                                let child = ensure_sufficient_stack(|| self.node())?;
                                let len = self.tree.list(id, desc.role).len();
                                self.tree.try_insert_child(id, desc.role, len, child)?;
                            }
                            self.bump()?;
                        }
                    }
                }
                other => return Err(unexpected(offset, &other)),
            }
        }
    }

    fn simple_value(&mut self, id: NodeId, desc: &RoleDesc) -> Result<(), SexpError> {
        let SlotKind::Simple(expected) = desc.slot else {
            return Ok(());
        };
        let (offset, token) = self.bump()?;
        let Token::Atom { text, quoted } = token else {
            return Err(unexpected(offset, &token));
        };
        let value = parse_value(self.tree, &text, quoted, expected)?;
        self.tree.try_set_simple(id, desc.role, Some(value))?;
        Ok(())
    }
}

fn unexpected(offset: usize, token: &Token) -> SexpError {
    let found = match token {
        Token::Open => "(".to_owned(),
        Token::Close => ")".to_owned(),
        Token::OpenList => "[".to_owned(),
        Token::CloseList => "]".to_owned(),
        Token::Keyword(k) => format!(":{k}"),
        Token::Atom { text, .. } => text.clone(),
    };
    SexpError::Unexpected { found, offset }
}

fn parse_span(lines: &str) -> Result<Span, SexpError> {
    let bad = || SexpError::BadSpan(lines.to_owned());
    let (start, end) = lines.split_once('-').unwrap_or((lines, lines));
    let start = start.parse().map_err(|_| bad())?;
    let end = end.parse().map_err(|_| bad())?;
    if end < start {
        return Err(bad());
    }
    Ok(Span::new(Name::EMPTY, start, end))
}

fn unquote(text: &str) -> &str {
    text.strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(text)
}

fn parse_value(tree: &Tree, text: &str, quoted: bool, expected: ValueKind) -> Result<Value, SexpError> {
    let bad = || SexpError::BadValue {
        text: text.to_owned(),
        expected,
    };
    let bare = if quoted { unquote(text) } else { text };
    match expected {
        ValueKind::Name => Ok(Value::Name(tree.intern(bare))),
        ValueKind::Literal => Ok(Value::Literal(tree.intern(text))),
        ValueKind::Bool => match bare {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(bad()),
        },
        ValueKind::Op => Operator::from_symbol(bare).map(Value::Op).ok_or_else(bad),
        ValueKind::Modifiers => Modifiers::from_keywords(bare)
            .map(Value::Modifiers)
            .ok_or_else(bad),
        ValueKind::Count => bare.parse().map(Value::Count).map_err(|_| bad()),
    }
}

/// Read one node expression into `tree`, returning its (detached) root.
pub fn read_into(tree: &mut Tree, text: &str) -> Result<NodeId, SexpError> {
    let mut reader = Reader {
        lexer: Lexer::new(text),
        peeked: None,
        tree,
    };
    let root = reader.node()?;
    if let Some((offset, token)) = reader.peeked.take() {
        return Err(unexpected(offset, &token));
    }
    if let Some((offset, token)) = reader.lexer.next_token()? {
        return Err(unexpected(offset, &token));
    }
    Ok(root)
}

/// Read a whole tree.
pub fn read(interner: &SharedInterner, text: &str) -> Result<Tree, SexpError> {
    let mut tree = Tree::new(SharedInterner::clone(interner));
    let root = read_into(&mut tree, text)?;
    tree.set_root(root);
    Ok(tree)
}

/// Spell the subtree at `root` on one line.
pub fn dump(tree: &Tree, root: NodeId) -> String {
    let mut out = String::new();
    dump_node(tree, root, &mut out);
    out
}

fn dump_node(tree: &Tree, id: NodeId, out: &mut String) {
    let kind = tree.kind(id);
    out.push('(');
    out.push_str(kind.as_str());
    let shorthand = kind.sole_simple_role().is_some();
    ensure_sufficient_stack(|| {
        for (desc, slot) in tree.roles_and_slots(id) {
            match slot {
                Slot::Simple(None) | Slot::Child(None) => {}
                Slot::List(items) if items.is_empty() => {}
                Slot::Simple(Some(value)) => {
                    if shorthand {
                        out.push(' ');
                    } else {
                        let _ = write!(out, " :{} ", desc.role);
                    }
                    dump_value(tree, *value, out);
                }
                Slot::Child(Some(child)) => {
                    let _ = write!(out, " :{} ", desc.role);
                    dump_node(tree, *child, out);
                }
                Slot::List(items) => {
                    let _ = write!(out, " :{} [", desc.role);
                    for (i, &child) in items.iter().enumerate() {
                        if i > 0 {
                            out.push(' ');
                        }
                        dump_node(tree, child, out);
                    }
                    out.push(']');
                }
            }
        }
    });
    out.push(')');
}

fn dump_value(tree: &Tree, value: Value, out: &mut String) {
    let text = tree.render_value(value);
    let needs_quotes = matches!(value, Value::Modifiers(_))
        || (matches!(value, Value::Name(_))
            && (text.is_empty() || text.contains(|c: char| c.is_whitespace() || "()[]\"".contains(c))));
    if needs_quotes {
        let _ = write!(out, "\"{text}\"");
    } else {
        out.push_str(&text);
    }
}
