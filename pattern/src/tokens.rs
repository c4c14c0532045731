/// A fixed-meaning meta-sequence and the builder operation that produces it.
///
/// This table is the only place where sequences and operation names are
/// paired. The builder emits `sequence()`, the decompiler classifies with
/// `from_sequence()`, and the chain reader resolves names with
/// `from_operation()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Digit,
    NotDigit,
    Any,
    Whitespace,
    NotWhitespace,
    Newline,
    Tab,
    Word,
    NotWord,
    WordBoundary,
    NotWordBoundary,
    Lazy,
    AnyNumber,
    Or,
    OneOrMore,
    StringEnd,
    StringBegin,
}

impl TokenKind {
    pub const ALL: [TokenKind; 17] = [
        TokenKind::Digit,
        TokenKind::NotDigit,
        TokenKind::Any,
        TokenKind::Whitespace,
        TokenKind::NotWhitespace,
        TokenKind::Newline,
        TokenKind::Tab,
        TokenKind::Word,
        TokenKind::NotWord,
        TokenKind::WordBoundary,
        TokenKind::NotWordBoundary,
        TokenKind::Lazy,
        TokenKind::AnyNumber,
        TokenKind::Or,
        TokenKind::OneOrMore,
        TokenKind::StringEnd,
        TokenKind::StringBegin,
    ];

    pub fn sequence(self) -> &'static str {
        match self {
            TokenKind::Digit => r"\d",
            TokenKind::NotDigit => r"\D",
            TokenKind::Any => ".",
            TokenKind::Whitespace => r"\s",
            TokenKind::NotWhitespace => r"\S",
            TokenKind::Newline => r"\n",
            TokenKind::Tab => r"\t",
            TokenKind::Word => r"\w",
            TokenKind::NotWord => r"\W",
            TokenKind::WordBoundary => r"\b",
            TokenKind::NotWordBoundary => r"\B",
            TokenKind::Lazy => "?",
            TokenKind::AnyNumber => "*",
            TokenKind::Or => "|",
            TokenKind::OneOrMore => "+",
            TokenKind::StringEnd => "$",
            TokenKind::StringBegin => "^",
        }
    }

    pub fn operation(self) -> &'static str {
        match self {
            TokenKind::Digit => "digit",
            TokenKind::NotDigit => "notDigit",
            TokenKind::Any => "any",
            TokenKind::Whitespace => "whitespace",
            TokenKind::NotWhitespace => "notWhitespace",
            TokenKind::Newline => "newline",
            TokenKind::Tab => "tab",
            TokenKind::Word => "word",
            TokenKind::NotWord => "notWord",
            TokenKind::WordBoundary => "wordBoundary",
            TokenKind::NotWordBoundary => "notWordBoundary",
            TokenKind::Lazy => "lazy",
            TokenKind::AnyNumber => "anyNumber",
            TokenKind::Or => "or",
            TokenKind::OneOrMore => "oneOrMore",
            TokenKind::StringEnd => "stringEnd",
            TokenKind::StringBegin => "stringBegin",
        }
    }

    pub fn from_sequence(sequence: &str) -> Option<TokenKind> {
        Self::ALL.into_iter().find(|kind| kind.sequence() == sequence)
    }

    pub fn from_operation(name: &str) -> Option<TokenKind> {
        Self::ALL.into_iter().find(|kind| kind.operation() == name)
    }

    /// Whether the operation accepts a `{min,max}` quantifier.
    ///
    /// Anchors, alternation and the repetition operators themselves do not.
    pub fn is_quantifiable(self) -> bool {
        !matches!(
            self,
            TokenKind::Lazy
                | TokenKind::AnyNumber
                | TokenKind::Or
                | TokenKind::OneOrMore
                | TokenKind::StringEnd
                | TokenKind::StringBegin
        )
    }

    /// The shorthand escapes that force a character set into callback form.
    pub fn is_class_shorthand(self) -> bool {
        matches!(
            self,
            TokenKind::Digit
                | TokenKind::NotDigit
                | TokenKind::Whitespace
                | TokenKind::NotWhitespace
                | TokenKind::Newline
                | TokenKind::Tab
                | TokenKind::Word
                | TokenKind::NotWord
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use test_case::test_case;

    #[test_case(r"\d", TokenKind::Digit; "digit")]
    #[test_case(".", TokenKind::Any; "any")]
    #[test_case(r"\W", TokenKind::NotWord; "not word")]
    #[test_case(r"\b", TokenKind::WordBoundary; "word boundary")]
    #[test_case("|", TokenKind::Or; "or")]
    #[test_case("^", TokenKind::StringBegin; "string begin")]
    fn test_from_sequence(sequence: &str, expected: TokenKind) {
        assert_eq!(TokenKind::from_sequence(sequence), Some(expected));
    }

    #[test_case(r"\p"; "unknown escape")]
    #[test_case(r"\."; "escaped dot")]
    #[test_case("a"; "plain char")]
    #[test_case("("; "group opener")]
    #[test_case(""; "empty")]
    fn test_not_a_token(sequence: &str) {
        assert_eq!(TokenKind::from_sequence(sequence), None);
    }

    #[test]
    fn test_table_is_bijective() {
        let sequences: HashSet<_> = TokenKind::ALL.iter().map(|k| k.sequence()).collect();
        let operations: HashSet<_> = TokenKind::ALL.iter().map(|k| k.operation()).collect();
        assert_eq!(sequences.len(), TokenKind::ALL.len());
        assert_eq!(operations.len(), TokenKind::ALL.len());
        for kind in TokenKind::ALL {
            assert_eq!(TokenKind::from_sequence(kind.sequence()), Some(kind));
            assert_eq!(TokenKind::from_operation(kind.operation()), Some(kind));
        }
    }

    #[test]
    fn test_class_shorthands() {
        let shorthands: Vec<_> = TokenKind::ALL
            .into_iter()
            .filter(|k| k.is_class_shorthand())
            .map(|k| k.sequence())
            .collect();
        assert_eq!(
            shorthands,
            [r"\d", r"\D", r"\s", r"\S", r"\n", r"\t", r"\w", r"\W"]
        );
    }

    #[test]
    fn test_quantifiable() {
        assert!(TokenKind::Digit.is_quantifiable());
        assert!(TokenKind::Any.is_quantifiable());
        assert!(TokenKind::NotWordBoundary.is_quantifiable());
        assert!(!TokenKind::Lazy.is_quantifiable());
        assert!(!TokenKind::StringBegin.is_quantifiable());
        assert!(!TokenKind::Or.is_quantifiable());
    }
}
