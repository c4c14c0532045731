mod builder;
mod escape;
mod flags;
mod tokens;

pub use builder::Body;
pub use builder::BuildError;
pub use builder::Callback;
pub use builder::Look;
pub use builder::PatternBuilder;
pub use escape::escape_group_head;
pub use escape::escape_literals;
pub use escape::escape_set;
pub use escape::is_literal_significant;
pub use escape::is_range_hyphen;
pub use escape::is_set_significant;
pub use flags::FlagError;
pub use flags::Flags;
pub use tokens::TokenKind;

use std::fmt;
use std::str::FromStr;

/// A dynamically typed call argument, as found in chain source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    Number(u32),
    Text(String),
}

impl Argument {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Argument::Text(text) => Some(text),
            Argument::Number(_) => None,
        }
    }
}

/// Optional `{min}` / `{min,max}` suffix of the preceding fragment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Quantifier {
    pub min: Option<u32>,
    pub max: Option<u32>,
}

impl Quantifier {
    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Append the range suffix. A lone `max` gets `0` as its lower bound.
    pub fn write_suffix(&self, out: &mut String) {
        match (self.min, self.max) {
            (None, None) => {}
            (Some(min), None) => out.push_str(&format!("{{{min}}}")),
            (min, Some(max)) => out.push_str(&format!("{{{},{max}}}", min.unwrap_or(0))),
        }
    }

    /// The bounds as call arguments, in order.
    pub fn arguments(&self) -> Vec<Argument> {
        match (self.min, self.max) {
            (None, None) => Vec::new(),
            (Some(min), None) => vec![Argument::Number(min)],
            (min, Some(max)) => vec![Argument::Number(min.unwrap_or(0)), Argument::Number(max)],
        }
    }
}

impl From<()> for Quantifier {
    fn from(_: ()) -> Self {
        Quantifier::default()
    }
}

impl From<u32> for Quantifier {
    fn from(min: u32) -> Self {
        Quantifier {
            min: Some(min),
            max: None,
        }
    }
}

impl From<(u32, u32)> for Quantifier {
    fn from((min, max): (u32, u32)) -> Self {
        Quantifier {
            min: Some(min),
            max: Some(max),
        }
    }
}

impl From<(Option<u32>, Option<u32>)> for Quantifier {
    fn from((min, max): (Option<u32>, Option<u32>)) -> Self {
        Quantifier { min, max }
    }
}

impl TryFrom<&[Argument]> for Quantifier {
    type Error = BuildError;

    fn try_from(arguments: &[Argument]) -> Result<Self, Self::Error> {
        let bound = |argument: &Argument| match argument {
            Argument::Number(n) => Ok(*n),
            Argument::Text(text) => Err(BuildError::TypeMismatch {
                context: "quantifier",
                expected: "a number",
                found: format!("{text:?}"),
            }),
        };
        match arguments {
            [] => Ok(Quantifier::default()),
            [min] => Ok(bound(min)?.into()),
            [min, max] => Ok((bound(min)?, bound(max)?).into()),
            _ => Err(BuildError::InvalidArgument(format!(
                "a quantifier takes at most 2 bounds, got {}",
                arguments.len()
            ))),
        }
    }
}

/// Group and lookaround flavours with their delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    Capturing,
    Lookahead,
    NegativeLookahead,
    Lookbehind,
    NegativeLookbehind,
}

impl GroupKind {
    pub const ALL: [GroupKind; 5] = [
        GroupKind::Capturing,
        GroupKind::Lookahead,
        GroupKind::NegativeLookahead,
        GroupKind::Lookbehind,
        GroupKind::NegativeLookbehind,
    ];

    pub fn open(self) -> &'static str {
        match self {
            GroupKind::Capturing => "(",
            GroupKind::Lookahead => "(?=",
            GroupKind::NegativeLookahead => "(?!",
            GroupKind::Lookbehind => "(?<=",
            GroupKind::NegativeLookbehind => "(?<!",
        }
    }

    pub fn close(self) -> &'static str {
        ")"
    }

    pub fn operation(self) -> &'static str {
        match self {
            GroupKind::Capturing => "group",
            GroupKind::Lookahead => "look.ahead",
            GroupKind::NegativeLookahead => "negativeLook.ahead",
            GroupKind::Lookbehind => "look.behind",
            GroupKind::NegativeLookbehind => "negativeLook.behind",
        }
    }

    pub fn from_operation(name: &str) -> Option<GroupKind> {
        Self::ALL.into_iter().find(|kind| kind.operation() == name)
    }

    /// Classify the group starting at `source` by its longest matching
    /// opener.
    pub fn from_opener(source: &str) -> Option<GroupKind> {
        Self::ALL
            .into_iter()
            .filter(|kind| source.starts_with(kind.open()))
            .max_by_key(|kind| kind.open().len())
    }
}

/// A compiled pattern together with the source and flags it was built from.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    flags: Flags,
    regex: fancy_regex::Regex,
}

impl Pattern {
    pub fn new(source: &str, flags: &str) -> Result<Self, BuildError> {
        let flags: Flags = flags.parse()?;
        let regex = fancy_regex::Regex::new(&flags.compile_source(source))?;
        Ok(Pattern {
            source: source.to_string(),
            flags,
            regex,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    pub fn regex(&self) -> &fancy_regex::Regex {
        &self.regex
    }

    pub fn is_match(&self, text: &str) -> Result<bool, fancy_regex::Error> {
        self.regex.is_match(text)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.flags == other.flags
    }
}

impl Eq for Pattern {}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.source, self.flags)
    }
}

impl FromStr for Pattern {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (source, flags) = split_pattern_literal(s);
        Pattern::new(source, flags)
    }
}

/// Split `/source/flags` into its parts. Anything else is a bare source
/// without flags.
pub fn split_pattern_literal(text: &str) -> (&str, &str) {
    if let Some(body) = text.strip_prefix('/')
        && let Some(end) = body.rfind('/')
        && body[end + 1..].chars().all(|c| c.is_ascii_alphabetic())
    {
        return (&body[..end], &body[end + 1..]);
    }
    (text, "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(&[], ""; "no bounds")]
    #[test_case(&[Argument::Number(4)], "{4}"; "min")]
    #[test_case(&[Argument::Number(2), Argument::Number(3)], "{2,3}"; "min and max")]
    fn test_quantifier_from_arguments(arguments: &[Argument], suffix: &str) {
        let quantifier = Quantifier::try_from(arguments).unwrap();
        let mut out = String::new();
        quantifier.write_suffix(&mut out);
        assert_eq!(out, suffix);
        assert_eq!(quantifier.arguments(), arguments);
    }

    #[test]
    fn test_quantifier_type_mismatch() {
        let arguments = [Argument::Text("4".to_string())];
        let err = Quantifier::try_from(&arguments[..]).unwrap_err();
        assert!(matches!(
            err,
            BuildError::TypeMismatch {
                context: "quantifier",
                ..
            }
        ));
    }

    #[test]
    fn test_quantifier_too_many_bounds() {
        let arguments = [Argument::Number(1), Argument::Number(2), Argument::Number(3)];
        let err = Quantifier::try_from(&arguments[..]).unwrap_err();
        assert!(matches!(err, BuildError::InvalidArgument(_)));
    }

    #[test]
    fn test_quantifier_max_only() {
        let quantifier = Quantifier::from((None, Some(3)));
        let mut out = String::new();
        quantifier.write_suffix(&mut out);
        assert_eq!(out, "{0,3}");
        assert_eq!(
            quantifier.arguments(),
            [Argument::Number(0), Argument::Number(3)]
        );
    }

    #[test_case("(abc)", Some(GroupKind::Capturing); "capturing")]
    #[test_case("(?=abc)", Some(GroupKind::Lookahead); "lookahead")]
    #[test_case("(?!abc)", Some(GroupKind::NegativeLookahead); "negative lookahead")]
    #[test_case("(?<=abc)", Some(GroupKind::Lookbehind); "lookbehind")]
    #[test_case("(?<!abc)", Some(GroupKind::NegativeLookbehind); "negative lookbehind")]
    #[test_case("(?:abc)", Some(GroupKind::Capturing); "non capturing falls back")]
    #[test_case("abc", None; "not a group")]
    fn test_group_kind_from_opener(source: &str, expected: Option<GroupKind>) {
        assert_eq!(GroupKind::from_opener(source), expected);
    }

    #[test]
    fn test_group_kind_operations() {
        for kind in GroupKind::ALL {
            assert_eq!(GroupKind::from_operation(kind.operation()), Some(kind));
            assert_eq!(kind.close(), ")");
        }
    }

    #[test_case("/a+b/gi", "a+b", "gi"; "literal with flags")]
    #[test_case("/a\\/b/", "a\\/b", ""; "escaped slash")]
    #[test_case("a+b", "a+b", ""; "bare source")]
    #[test_case("/a+b", "/a+b", ""; "unterminated")]
    #[test_case("/a/b c", "/a/b c", ""; "non flag suffix")]
    fn test_split_pattern_literal(text: &str, source: &str, flags: &str) {
        assert_eq!(split_pattern_literal(text), (source, flags));
    }

    #[test]
    fn test_pattern_display_and_parse() {
        let pattern: Pattern = "/^[a-z]+$/ig".parse().unwrap();
        assert_eq!(pattern.source(), "^[a-z]+$");
        assert_eq!(pattern.to_string(), "/^[a-z]+$/gi");
        assert!(pattern.is_match("WordEx").unwrap());
        assert_eq!(pattern, Pattern::new("^[a-z]+$", "gi").unwrap());
        assert_ne!(pattern, Pattern::new("^[a-z]+$", "g").unwrap());
    }

    #[test]
    fn test_pattern_lookbehind() {
        let pattern = Pattern::new(r"(?<=\$)\d+", "").unwrap();
        assert!(pattern.is_match("$42").unwrap());
        assert!(!pattern.is_match("42").unwrap());
    }

    #[test]
    fn test_pattern_invalid() {
        assert!(matches!(
            Pattern::new("(a", ""),
            Err(BuildError::Syntax(_))
        ));
        assert!(matches!(
            Pattern::new("a", "gg"),
            Err(BuildError::InvalidFlags(FlagError::Duplicate('g')))
        ));
    }
}
