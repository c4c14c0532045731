use pattern::Quantifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UnitKind {
    Plain(char),
    /// A `\` and the character after it.
    Escaped(char),
}

/// One indivisible piece of pattern source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Unit<'s> {
    pub origin: &'s str,
    pub offset: usize,
    pub kind: UnitKind,
}

#[derive(Debug, Clone)]
pub(crate) struct Cursor<'s> {
    whole: &'s str,
    rest: &'s str,
    byte: usize,
}

impl<'s> Cursor<'s> {
    pub fn new(input: &'s str) -> Self {
        Self {
            whole: input,
            rest: input,
            byte: 0,
        }
    }

    pub fn peek(&self) -> Option<Unit<'s>> {
        self.clone().next()
    }

    /// The unconsumed input.
    pub fn rest(&self) -> &'s str {
        self.rest
    }

    /// Skip `bytes` bytes of ASCII delimiter text.
    pub fn advance(&mut self, bytes: usize) {
        let bytes = bytes.min(self.rest.len());
        self.rest = &self.rest[bytes..];
        self.byte += bytes;
    }

    /// Consume the next unit if it is the unescaped character `c`.
    pub fn eat(&mut self, c: char) -> bool {
        if self.peek().is_some_and(|unit| unit.kind == UnitKind::Plain(c)) {
            self.next();
            return true;
        }
        false
    }

    /// A `{min}` or `{min,max}` range at the current position, and its
    /// length in bytes.
    pub fn range(&self) -> Option<(Quantifier, usize)> {
        let inner = self.rest.strip_prefix('{')?;
        let end = inner.find('}')?;
        let body = &inner[..end];
        let number = |digits: &str| {
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            digits.parse::<u32>().ok()
        };
        let quantifier = match body.split_once(',') {
            Some((min, max)) => Quantifier::from((number(min)?, number(max)?)),
            None => Quantifier::from(number(body)?),
        };
        Some((quantifier, end + 2))
    }

    pub fn eat_range(&mut self) -> Option<Quantifier> {
        let (quantifier, len) = self.range()?;
        self.advance(len);
        Some(quantifier)
    }

    /// Consume up to and including the `)` that closes an already opened
    /// group, returning the text in between. Parentheses inside character
    /// classes do not count. An unclosed group takes the rest of the input.
    pub fn take_group_body(&mut self) -> &'s str {
        let start = self.byte;
        let mut depth = 1usize;
        let mut in_class = false;
        while let Some(unit) = self.next() {
            match unit.kind {
                UnitKind::Plain('[') if !in_class => in_class = true,
                UnitKind::Plain(']') if in_class => in_class = false,
                UnitKind::Plain('(') if !in_class => depth += 1,
                UnitKind::Plain(')') if !in_class => {
                    depth -= 1;
                    if depth == 0 {
                        return &self.whole[start..unit.offset];
                    }
                }
                _ => {}
            }
        }
        &self.whole[start..]
    }

    /// Consume up to and including the first unescaped `]`.
    pub fn take_class_body(&mut self) -> &'s str {
        let start = self.byte;
        while let Some(unit) = self.next() {
            if unit.kind == UnitKind::Plain(']') {
                return &self.whole[start..unit.offset];
            }
        }
        &self.whole[start..]
    }
}

impl<'s> Iterator for Cursor<'s> {
    type Item = Unit<'s>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut chars = self.rest.chars();
        let c = chars.next()?;
        let offset = self.byte;
        let mut len = c.len_utf8();
        let kind = if c == '\\'
            && let Some(escaped) = chars.next()
        {
            len += escaped.len_utf8();
            UnitKind::Escaped(escaped)
        } else {
            UnitKind::Plain(c)
        };
        let origin = &self.rest[..len];
        self.rest = &self.rest[len..];
        self.byte += len;
        Some(Unit {
            origin,
            offset,
            kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_units() {
        let units: Vec<_> = Cursor::new(r"a\.ü\").collect();
        assert_eq!(
            units,
            [
                Unit {
                    origin: "a",
                    offset: 0,
                    kind: UnitKind::Plain('a')
                },
                Unit {
                    origin: r"\.",
                    offset: 1,
                    kind: UnitKind::Escaped('.')
                },
                Unit {
                    origin: "ü",
                    offset: 3,
                    kind: UnitKind::Plain('ü')
                },
                Unit {
                    origin: r"\",
                    offset: 5,
                    kind: UnitKind::Plain('\\')
                },
            ]
        );
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut cursor = Cursor::new(r"\dx");
        assert_eq!(cursor.peek().map(|u| u.origin), Some(r"\d"));
        assert_eq!(cursor.next().map(|u| u.origin), Some(r"\d"));
        assert_eq!(cursor.rest(), "x");
    }

    #[test]
    fn test_eat() {
        let mut cursor = Cursor::new(r"^\^");
        assert!(cursor.eat('^'));
        assert!(!cursor.eat('^'));
        assert_eq!(cursor.rest(), r"\^");
    }

    #[test_case("{4}x", Some((Some(4), None)), "x"; "min")]
    #[test_case("{4,5}x", Some((Some(4), Some(5))), "x"; "min and max")]
    #[test_case("{0,3}", Some((Some(0), Some(3))), ""; "zero lower bound")]
    #[test_case("{4,}x", None, "{4,}x"; "open upper bound")]
    #[test_case("{,4}x", None, "{,4}x"; "missing lower bound")]
    #[test_case("{a}x", None, "{a}x"; "not a number")]
    #[test_case("{4", None, "{4"; "unclosed")]
    #[test_case("{99999999999}", None, "{99999999999}"; "overflow")]
    fn test_eat_range(input: &str, expected: Option<(Option<u32>, Option<u32>)>, rest: &str) {
        let mut cursor = Cursor::new(input);
        assert_eq!(cursor.eat_range(), expected.map(Quantifier::from));
        assert_eq!(cursor.rest(), rest);
    }

    #[test_case("abc)d", "abc", "d"; "flat")]
    #[test_case("a(b)c)d", "a(b)c", "d"; "nested")]
    #[test_case(r"a\)b)c", r"a\)b", "c"; "escaped paren")]
    #[test_case("a[)]b)c", "a[)]b", "c"; "paren in class")]
    #[test_case("a(b", "a(b", ""; "unclosed")]
    fn test_take_group_body(input: &str, body: &str, rest: &str) {
        let mut cursor = Cursor::new(input);
        assert_eq!(cursor.take_group_body(), body);
        assert_eq!(cursor.rest(), rest);
    }

    #[test_case("a-z]x", "a-z", "x"; "plain")]
    #[test_case(r"\]a]x", r"\]a", "x"; "escaped bracket")]
    #[test_case("abc", "abc", ""; "unclosed")]
    fn test_take_class_body(input: &str, body: &str, rest: &str) {
        let mut cursor = Cursor::new(input);
        assert_eq!(cursor.take_class_body(), body);
        assert_eq!(cursor.rest(), rest);
    }
}
