//! Escaping passes applied by the builder to user-supplied text.
//!
//! Every pass treats `\` plus the following character as one unit, so text
//! that is already escaped passes through untouched.

const ESCAPE: char = '\\';

/// Characters that carry structure in a pattern and are escaped when they
/// appear in literal text.
const LITERAL_SIGNIFICANT: [char; 10] = ['|', '$', '[', ']', '(', ')', '{', '}', '.', '"'];

/// Escape `| $ [ ] ( ) { } . "` in literal text.
///
/// Operators such as `?`, `*`, `+` and `^` are left alone: they have their
/// own builder operations.
pub fn escape_literals(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == ESCAPE {
            escaped.push(c);
            if let Some(next) = chars.next() {
                escaped.push(next);
            }
            continue;
        }
        if is_literal_significant(c) {
            escaped.push(ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

/// Whether `escape_literals` escapes a bare `c`.
pub fn is_literal_significant(c: char) -> bool {
    LITERAL_SIGNIFICANT.contains(&c)
}

/// Whether `escape_set` escapes a bare `c` regardless of its neighbours.
pub fn is_set_significant(c: char, nested: bool) -> bool {
    matches!(c, '[' | ']') || (c == '?' && !nested)
}

/// Escape the body of a character set.
///
/// Brackets are always escaped. Hyphens are kept when they look like part
/// of an `A-Z`, `a-z` or `0-9` style range and escaped otherwise. A bare `?`
/// is escaped only in the string form; `nested` bodies come from a callback
/// and follow the opening bracket directly.
pub fn escape_set(body: &str, nested: bool) -> String {
    let chars: Vec<char> = body.chars().collect();
    let mut escaped = String::with_capacity(body.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            ESCAPE => {
                escaped.push(c);
                if let Some(&next) = chars.get(i + 1) {
                    escaped.push(next);
                    i += 1;
                }
            }
            c if is_set_significant(c, nested) => {
                escaped.push(ESCAPE);
                escaped.push(c);
            }
            '-' if !is_range_hyphen(&chars, i) => escaped.push_str(r"\-"),
            _ => escaped.push(c),
        }
        i += 1;
    }
    escaped
}

/// Whether the bare `-` at `chars[at]` reads as part of a range and is left
/// unescaped by `escape_set`.
pub fn is_range_hyphen(chars: &[char], at: usize) -> bool {
    let low = |c: char| matches!(c, 'A' | 'a' | '0');
    let high = |c: char| matches!(c, 'Z' | 'z' | '9');
    let before = at.checked_sub(1).map(|i| chars[i]);
    let after = chars.get(at + 1).copied();
    let after_range =
        at >= 3 && low(chars[at - 3]) && chars[at - 2] == '-' && high(chars[at - 1]);
    before.is_some_and(low) || after.is_some_and(high) || after_range
}

/// Escape a `?` at the very start of a group body so it cannot be read as
/// part of the group opener.
pub fn escape_group_head(body: &str) -> String {
    match body.strip_prefix('?') {
        Some(rest) => format!(r"\?{rest}"),
        None => body.to_string(),
    }
}

/// Number of atoms in literal text, counting an escape pair as one.
pub(crate) fn atom_count(text: &str) -> usize {
    let mut count = 0;
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == ESCAPE {
            chars.next();
        }
        count += 1;
    }
    count
}
