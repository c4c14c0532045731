mod cursor;
mod emitter;
mod parser;
mod pretty;
mod reader;
mod replay;

pub use emitter::ROOT;
pub use pretty::FormattedLine;
pub use pretty::format_lines;
pub use pretty::pretty;
pub use reader::ReadError;
pub use replay::EvalError;

use parser::Parser;
use pattern::Argument;
use pattern::GroupKind;
use pattern::Pattern;
use pattern::TokenKind;
use reader::Reader;
use std::fmt;
use std::str::FromStr;

/// A builder operation as it appears in chain source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Token(TokenKind),
    Literal,
    QuantifiedString,
    Group(GroupKind),
    Set { negated: bool },
}

impl Operation {
    pub fn name(self) -> &'static str {
        match self {
            Operation::Token(kind) => kind.operation(),
            Operation::Literal => "literal",
            Operation::QuantifiedString => "quantifiedString",
            Operation::Group(kind) => kind.operation(),
            Operation::Set { negated: false } => "set",
            Operation::Set { negated: true } => "negatedSet",
        }
    }

    pub fn from_name(name: &str) -> Option<Operation> {
        if let Some(kind) = TokenKind::from_operation(name) {
            return Some(Operation::Token(kind));
        }
        if let Some(kind) = GroupKind::from_operation(name) {
            return Some(Operation::Group(kind));
        }
        match name {
            "literal" => Some(Operation::Literal),
            "quantifiedString" => Some(Operation::QuantifiedString),
            "set" => Some(Operation::Set { negated: false }),
            "negatedSet" => Some(Operation::Set { negated: true }),
            _ => None,
        }
    }

    /// Whether the operation accepts a callback body.
    pub fn takes_body(self) -> bool {
        matches!(self, Operation::Group(_) | Operation::Set { .. })
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One call in a chain. `body` holds the calls of a callback argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallNode {
    pub operation: Operation,
    pub arguments: Vec<Argument>,
    pub body: Option<Vec<CallNode>>,
}

impl CallNode {
    pub fn new(operation: Operation, arguments: Vec<Argument>) -> Self {
        Self {
            operation,
            arguments,
            body: None,
        }
    }

    pub fn with_body(operation: Operation, body: Vec<CallNode>) -> Self {
        Self {
            operation,
            arguments: Vec::new(),
            body: Some(body),
        }
    }
}

/// A call chain rooted at [`ROOT`]. `flags` is the argument of the final
/// `done`, or `None` when the chain does not end in one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chain {
    pub calls: Vec<CallNode>,
    pub flags: Option<String>,
}

impl Chain {
    /// Decompile pattern source. Never fails: input that cannot be
    /// classified is kept as literal text.
    pub fn decompile(source: &str, flags: &str) -> Chain {
        Chain {
            calls: Parser::new(source).parse(),
            flags: Some(flags.to_string()),
        }
    }

    /// The chain with one call per line.
    pub fn pretty(&self) -> String {
        pretty(&self.to_string())
    }
}

impl FromStr for Chain {
    type Err = ReadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Reader::new(s).read()
    }
}

/// Pretty-printed chain source for a pattern source and its flags.
pub fn decompile(source: &str, flags: &str) -> String {
    Chain::decompile(source, flags).pretty()
}

/// Single-line chain source for a pattern source and its flags.
pub fn to_chain_source(source: &str, flags: &str) -> String {
    Chain::decompile(source, flags).to_string()
}

pub fn describe(pattern: &Pattern) -> String {
    decompile(pattern.source(), &pattern.flags().to_string())
}

/// Read chain source and build the pattern it describes.
pub fn evaluate(chain: &str) -> Result<Pattern, EvalError> {
    Ok(chain.parse::<Chain>()?.to_pattern()?)
}
