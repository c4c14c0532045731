use crate::emitter::ROOT;
use std::fmt;

const INDENT: &str = "  ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedLine {
    pub text: String,
    pub indent_depth: usize,
}

impl fmt::Display for FormattedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for _ in 0..self.indent_depth {
            f.write_str(INDENT)?;
        }
        f.write_str(&self.text)
    }
}

/// Reflow single-line chain source into one call per line.
pub fn pretty(chain: &str) -> String {
    format_lines(chain)
        .iter()
        .map(FormattedLine::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Split chain source at call boundaries, ignoring quoted text.
///
/// A boundary is a `.` after the root or a `)`, the space between `{` and a
/// nested root, or the space between `)` or a bare root and `}`. The
/// separator itself is dropped.
pub(crate) fn split_segments(chain: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, c) in chain.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        let before = &chain[..i];
        let after = &chain[i + c.len_utf8()..];
        let boundary = match c {
            '"' | '\'' | '`' => {
                quote = Some(c);
                false
            }
            '.' => before.ends_with(ROOT) || before.ends_with(')'),
            ' ' => {
                (before.ends_with('{') && after.starts_with(ROOT))
                    || ((before.ends_with(')') || before.ends_with(ROOT)) && after.starts_with('}'))
            }
            _ => false,
        };
        if boundary {
            segments.push(&chain[start..i]);
            start = i + c.len_utf8();
        }
    }
    segments.push(&chain[start..]);
    segments
}

/// One line per call, with the nesting depth of each.
pub fn format_lines(chain: &str) -> Vec<FormattedLine> {
    let segments = split_segments(chain);
    let mut lines = Vec::with_capacity(segments.len());
    let Some((first, rest)) = segments.split_first() else {
        return lines;
    };
    lines.push(FormattedLine {
        text: first.to_string(),
        indent_depth: 0,
    });
    let mut depth = 1usize;
    for &segment in rest {
        if segment == ROOT {
            depth += 1;
            lines.push(FormattedLine {
                text: segment.to_string(),
                indent_depth: depth,
            });
            depth += 1;
            continue;
        }
        let text = if segment == "})" {
            depth = depth.saturating_sub(2);
            segment.to_string()
        } else {
            format!(".{segment}")
        };
        lines.push(FormattedLine {
            text,
            indent_depth: depth,
        });
    }
    lines
}
