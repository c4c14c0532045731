use crate::GroupKind;
use crate::Pattern;
use crate::Quantifier;
use crate::TokenKind;
use crate::escape::atom_count;
use crate::escape::escape_group_head;
use crate::escape::escape_literals;
use crate::escape::escape_set;
use crate::flags::FlagError;
use std::borrow::Cow;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("{context} expects {expected}, got {found}")]
    TypeMismatch {
        context: &'static str,
        expected: &'static str,
        found: String,
    },
    #[error("{0}")]
    InvalidArgument(String),
    #[error(transparent)]
    InvalidFlags(#[from] FlagError),
    #[error(transparent)]
    Syntax(#[from] fancy_regex::Error),
}

pub type Callback<'a> = Box<
    dyn for<'b> FnOnce(&'b mut PatternBuilder) -> Result<&'b mut PatternBuilder, BuildError> + 'a,
>;

/// The inside of a group, set or lookaround: literal text or a callback that
/// fills a fresh builder.
pub enum Body<'a> {
    Literal(Cow<'a, str>),
    Callback(Callback<'a>),
}

impl<'a> Body<'a> {
    pub fn callback<F>(f: F) -> Self
    where
        F: for<'b> FnOnce(&'b mut PatternBuilder) -> Result<&'b mut PatternBuilder, BuildError>
            + 'a,
    {
        Body::Callback(Box::new(f))
    }
}

impl<'a> From<&'a str> for Body<'a> {
    fn from(text: &'a str) -> Self {
        Body::Literal(Cow::Borrowed(text))
    }
}

impl From<String> for Body<'_> {
    fn from(text: String) -> Self {
        Body::Literal(Cow::Owned(text))
    }
}

impl fmt::Debug for Body<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Literal(text) => f.debug_tuple("Literal").field(text).finish(),
            Body::Callback(_) => f.write_str("Callback"),
        }
    }
}

/// Append-only assembler for pattern source text.
///
/// ```ignore
/// let pattern = PatternBuilder::new()
///     .string_begin()
///     .digit(4)
///     .literal("-", ())?
///     .digit((2, 3))
///     .done("g")?;
/// assert_eq!(pattern.source(), r"^\d{4}-\d{2,3}");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternBuilder {
    exp: String,
}

impl PatternBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The text accumulated so far.
    pub fn as_str(&self) -> &str {
        &self.exp
    }

    pub fn into_string(self) -> String {
        self.exp
    }

    /// Append `fragment` verbatim, followed by the quantifier suffix if any.
    pub fn quantified_string(
        &mut self,
        fragment: &str,
        quantifier: impl Into<Quantifier>,
    ) -> &mut Self {
        self.exp.push_str(fragment);
        quantifier.into().write_suffix(&mut self.exp);
        self
    }

    /// Append the meta-sequence of `kind`.
    pub fn token(&mut self, kind: TokenKind, quantifier: impl Into<Quantifier>) -> &mut Self {
        self.quantified_string(kind.sequence(), quantifier)
    }

    /// `\d`
    pub fn digit(&mut self, quantifier: impl Into<Quantifier>) -> &mut Self {
        self.token(TokenKind::Digit, quantifier)
    }

    /// `\D`
    pub fn not_digit(&mut self, quantifier: impl Into<Quantifier>) -> &mut Self {
        self.token(TokenKind::NotDigit, quantifier)
    }

    /// `.`, any character except line terminators unless the `s` flag is set.
    pub fn any(&mut self, quantifier: impl Into<Quantifier>) -> &mut Self {
        self.token(TokenKind::Any, quantifier)
    }

    /// `\s`
    pub fn whitespace(&mut self, quantifier: impl Into<Quantifier>) -> &mut Self {
        self.token(TokenKind::Whitespace, quantifier)
    }

    /// `\S`
    pub fn not_whitespace(&mut self, quantifier: impl Into<Quantifier>) -> &mut Self {
        self.token(TokenKind::NotWhitespace, quantifier)
    }

    /// `\w`
    pub fn word(&mut self, quantifier: impl Into<Quantifier>) -> &mut Self {
        self.token(TokenKind::Word, quantifier)
    }

    /// `\W`
    pub fn not_word(&mut self, quantifier: impl Into<Quantifier>) -> &mut Self {
        self.token(TokenKind::NotWord, quantifier)
    }

    pub fn tab(&mut self, quantifier: impl Into<Quantifier>) -> &mut Self {
        self.token(TokenKind::Tab, quantifier)
    }

    pub fn newline(&mut self, quantifier: impl Into<Quantifier>) -> &mut Self {
        self.token(TokenKind::Newline, quantifier)
    }

    /// `\b`
    pub fn word_boundary(&mut self, quantifier: impl Into<Quantifier>) -> &mut Self {
        self.token(TokenKind::WordBoundary, quantifier)
    }

    /// `\B`
    pub fn not_word_boundary(&mut self, quantifier: impl Into<Quantifier>) -> &mut Self {
        self.token(TokenKind::NotWordBoundary, quantifier)
    }

    pub fn string_begin(&mut self) -> &mut Self {
        self.token(TokenKind::StringBegin, ())
    }

    pub fn string_end(&mut self) -> &mut Self {
        self.token(TokenKind::StringEnd, ())
    }

    pub fn one_or_more(&mut self) -> &mut Self {
        self.token(TokenKind::OneOrMore, ())
    }

    pub fn any_number(&mut self) -> &mut Self {
        self.token(TokenKind::AnyNumber, ())
    }

    /// `?`, which makes the preceding atom optional or the preceding
    /// repetition lazy.
    pub fn lazy(&mut self) -> &mut Self {
        self.token(TokenKind::Lazy, ())
    }

    pub fn or(&mut self) -> &mut Self {
        self.token(TokenKind::Or, ())
    }

    /// Append `text` with its literal-significant characters escaped.
    ///
    /// A quantifier binds to a single atom, so it is rejected for longer
    /// text. Repeat longer text with a group instead.
    pub fn literal(
        &mut self,
        text: &str,
        quantifier: impl Into<Quantifier>,
    ) -> Result<&mut Self, BuildError> {
        let quantifier = quantifier.into();
        if !quantifier.is_empty() && atom_count(text) > 1 {
            return Err(BuildError::InvalidArgument(format!(
                "literal '{text}' has a quantifier but more than one character; \
                 use a group or set to repeat more than one character"
            )));
        }
        Ok(self.quantified_string(&escape_literals(text), quantifier))
    }

    /// Capturing group.
    pub fn group<'a>(&mut self, body: impl Into<Body<'a>>) -> Result<&mut Self, BuildError> {
        self.sub_expression(GroupKind::Capturing, body)
    }

    /// Wrap a body in the delimiters of `kind`.
    pub fn sub_expression<'a>(
        &mut self,
        kind: GroupKind,
        body: impl Into<Body<'a>>,
    ) -> Result<&mut Self, BuildError> {
        let inner = match body.into() {
            Body::Literal(text) => escape_literals(&text),
            Body::Callback(callback) => Self::nested(callback)?,
        };
        self.exp.push_str(kind.open());
        self.exp.push_str(&escape_group_head(&inner));
        self.exp.push_str(kind.close());
        Ok(self)
    }

    /// Match one character from the set. Bodies containing shorthand
    /// escapes such as `\s` or `\d` should be given as a callback.
    pub fn set<'a>(&mut self, body: impl Into<Body<'a>>) -> Result<&mut Self, BuildError> {
        self.char_set(body, false)
    }

    /// Match one character not in the set.
    pub fn negated_set<'a>(&mut self, body: impl Into<Body<'a>>) -> Result<&mut Self, BuildError> {
        self.char_set(body, true)
    }

    pub fn char_set<'a>(
        &mut self,
        body: impl Into<Body<'a>>,
        negated: bool,
    ) -> Result<&mut Self, BuildError> {
        let inner = match body.into() {
            Body::Literal(text) => escape_set(&text, false),
            Body::Callback(callback) => escape_set(&Self::nested(callback)?, true),
        };
        self.exp.push('[');
        if negated {
            self.exp.push('^');
        }
        self.exp.push_str(&inner);
        self.exp.push(']');
        Ok(self)
    }

    /// Positive lookarounds: `look().ahead(..)` and `look().behind(..)`.
    pub fn look(&mut self) -> Look<'_> {
        Look {
            builder: self,
            negative: false,
        }
    }

    /// Negative lookarounds: `negative_look().ahead(..)` and
    /// `negative_look().behind(..)`.
    pub fn negative_look(&mut self) -> Look<'_> {
        Look {
            builder: self,
            negative: true,
        }
    }

    /// Compile the accumulated text. Engine errors are returned as-is.
    pub fn done(&self, flags: &str) -> Result<Pattern, BuildError> {
        Pattern::new(&self.exp, flags)
    }

    fn nested(callback: Callback<'_>) -> Result<String, BuildError> {
        let mut child = PatternBuilder::new();
        callback(&mut child)?;
        Ok(child.exp)
    }
}

/// Direction selector returned by [`PatternBuilder::look`] and
/// [`PatternBuilder::negative_look`].
#[derive(Debug)]
pub struct Look<'b> {
    builder: &'b mut PatternBuilder,
    negative: bool,
}

impl<'b> Look<'b> {
    pub fn ahead<'a>(self, body: impl Into<Body<'a>>) -> Result<&'b mut PatternBuilder, BuildError> {
        let kind = if self.negative {
            GroupKind::NegativeLookahead
        } else {
            GroupKind::Lookahead
        };
        let builder = self.builder;
        builder.sub_expression(kind, body)
    }

    pub fn behind<'a>(
        self,
        body: impl Into<Body<'a>>,
    ) -> Result<&'b mut PatternBuilder, BuildError> {
        let kind = if self.negative {
            GroupKind::NegativeLookbehind
        } else {
            GroupKind::Lookbehind
        };
        let builder = self.builder;
        builder.sub_expression(kind, body)
    }
}
