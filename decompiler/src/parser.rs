use crate::CallNode;
use crate::Operation;
use crate::cursor::Cursor;
use crate::cursor::Unit;
use crate::cursor::UnitKind;
use pattern::Argument;
use pattern::GroupKind;
use pattern::Quantifier;
use pattern::TokenKind;
use pattern::escape_literals;
use pattern::is_literal_significant;
use pattern::is_range_hyphen;
use pattern::is_set_significant;

/// Recursive-descent decompiler over pattern source.
///
/// Parsing never fails: anything that is not a token, group or set is read
/// as literal text.
#[derive(Debug, Clone)]
pub(crate) struct Parser<'s> {
    cursor: Cursor<'s>,
    in_class: bool,
    calls: Vec<CallNode>,
    /// Builder output for `calls`, tracked inside class bodies only.
    rebuilt: String,
}

impl<'s> Parser<'s> {
    pub fn new(source: &'s str) -> Self {
        Self {
            cursor: Cursor::new(source),
            in_class: false,
            calls: Vec::new(),
            rebuilt: String::new(),
        }
    }

    /// Parser for the body of a character class given as a callback. Groups
    /// and nested classes are not recognised there.
    fn in_class(body: &'s str) -> Self {
        Self {
            in_class: true,
            ..Self::new(body)
        }
    }

    pub fn parse(mut self) -> Vec<CallNode> {
        while let Some(unit) = self.cursor.peek() {
            match unit.kind {
                UnitKind::Plain('(') if !self.in_class => self.parse_group(),
                UnitKind::Plain('[') if !self.in_class => self.parse_set(),
                _ => match TokenKind::from_sequence(unit.origin) {
                    Some(kind) => self.parse_token(kind),
                    None => self.parse_literal_run(),
                },
            }
        }
        self.calls
    }

    fn parse_token(&mut self, kind: TokenKind) {
        self.cursor.next();
        let quantifier = if kind.is_quantifiable() {
            self.cursor.eat_range().unwrap_or_default()
        } else {
            Quantifier::default()
        };
        if self.in_class {
            self.rebuilt.push_str(kind.sequence());
            quantifier.write_suffix(&mut self.rebuilt);
        }
        self.calls.push(CallNode::new(
            Operation::Token(kind),
            quantifier.arguments(),
        ));
    }

    fn parse_group(&mut self) {
        let Some(kind) = GroupKind::from_opener(self.cursor.rest()) else {
            return self.parse_literal_run();
        };
        self.cursor.advance(kind.open().len());
        let body = self.cursor.take_group_body();
        let children = Parser::new(body).parse();
        self.calls
            .push(CallNode::with_body(Operation::Group(kind), children));
        self.parse_trailing_range();
    }

    fn parse_set(&mut self) {
        self.cursor.next();
        let negated = self.cursor.eat('^');
        let body = self.cursor.take_class_body();
        let operation = Operation::Set { negated };
        let call = if has_class_shorthand(body) {
            CallNode::with_body(operation, Parser::in_class(body).parse())
        } else {
            CallNode::new(operation, vec![Argument::Text(class_text(body))])
        };
        self.calls.push(call);
        self.parse_trailing_range();
    }

    /// Groups and sets take no quantifier of their own, so a range after
    /// one is kept as a bare quantified fragment.
    fn parse_trailing_range(&mut self) {
        if let Some(quantifier) = self.cursor.eat_range() {
            let mut arguments = vec![Argument::Text(String::new())];
            arguments.extend(quantifier.arguments());
            self.calls
                .push(CallNode::new(Operation::QuantifiedString, arguments));
        }
    }

    fn parse_literal_run(&mut self) {
        let mut units: Vec<&'s str> = Vec::new();
        while let Some(unit) = self.cursor.next() {
            let text = if self.in_class && unit.kind == UnitKind::Escaped('-') {
                let before = self.rebuilt.clone() + &escape_literals(&units.concat());
                let after = self.cursor.peek().map_or("", |next| next.origin);
                class_hyphen(&unit, &before, after)
            } else {
                literal_text(&unit)
            };
            units.push(text);
            if let Some(quantifier) = self.cursor.eat_range() {
                return self.push_split_literal(&units, quantifier);
            }
            if self
                .cursor
                .peek()
                .is_some_and(|next| next.kind == UnitKind::Plain('?'))
            {
                return self.push_split_literal(&units, Quantifier::default());
            }
            match self.cursor.peek() {
                Some(next) if !self.ends_literal_run(&next) => {}
                _ => break,
            }
        }
        self.push_literal(units.concat(), Quantifier::default());
    }

    fn ends_literal_run(&self, next: &Unit<'_>) -> bool {
        TokenKind::from_sequence(next.origin).is_some()
            || (!self.in_class && matches!(next.kind, UnitKind::Plain('(' | '[')))
    }

    /// A quantifier or `?` after a run binds to its last unit only.
    fn push_split_literal(&mut self, units: &[&str], quantifier: Quantifier) {
        let Some((last, prefix)) = units.split_last() else {
            return;
        };
        if !prefix.is_empty() {
            self.push_literal(prefix.concat(), Quantifier::default());
        }
        self.push_literal(last.to_string(), quantifier);
    }

    fn push_literal(&mut self, text: String, quantifier: Quantifier) {
        if self.in_class {
            self.rebuilt.push_str(&escape_literals(&text));
            quantifier.write_suffix(&mut self.rebuilt);
        }
        let mut arguments = vec![Argument::Text(text)];
        arguments.extend(quantifier.arguments());
        self.calls
            .push(CallNode::new(Operation::Literal, arguments));
    }
}

/// Literal text for a unit. An escape pair is stripped only when the
/// builder escapes its character again.
fn literal_text<'s>(unit: &Unit<'s>) -> &'s str {
    match unit.kind {
        UnitKind::Escaped(c) if is_literal_significant(c) => &unit.origin[1..],
        _ => unit.origin,
    }
}

/// An escaped hyphen in a class body stays escaped where the builder would
/// leave a bare one as part of a range.
fn class_hyphen<'s>(unit: &Unit<'s>, before: &str, after: &str) -> &'s str {
    let mut chars: Vec<char> = before.chars().collect();
    let at = chars.len();
    chars.push('-');
    chars.extend(after.chars().next());
    if is_range_hyphen(&chars, at) {
        unit.origin
    } else {
        &unit.origin[1..]
    }
}

fn has_class_shorthand(body: &str) -> bool {
    Cursor::new(body).any(|unit| {
        matches!(unit.kind, UnitKind::Escaped(_))
            && TokenKind::from_sequence(unit.origin).is_some_and(TokenKind::is_class_shorthand)
    })
}

/// The text of a class body given as a string.
fn class_text(body: &str) -> String {
    let units: Vec<Unit<'_>> = Cursor::new(body).collect();
    let mut text = String::with_capacity(body.len());
    for (i, unit) in units.iter().enumerate() {
        let piece = match unit.kind {
            UnitKind::Escaped('-') => {
                let after = units.get(i + 1).map_or("", |next| next.origin);
                class_hyphen(unit, &text, after)
            }
            UnitKind::Escaped(c) if is_set_significant(c, false) => &unit.origin[1..],
            _ => unit.origin,
        };
        text.push_str(piece);
    }
    text
}
