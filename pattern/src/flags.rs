use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Flag characters in canonical display order.
const FLAG_CHARS: [char; 8] = ['d', 'g', 'i', 'm', 's', 'u', 'v', 'y'];

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum FlagError {
    #[error("Invalid flag '{0}'")]
    Unknown(char),
    #[error("Duplicate flag '{0}'")]
    Duplicate(char),
    #[error("Flags 'u' and 'v' cannot be combined")]
    UnicodeConflict,
}

/// A validated set of pattern flags.
///
/// Only `i`, `m` and `s` change how the pattern compiles. The others are
/// matching modes and are carried along so they survive a round trip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Flags {
    bits: u8,
}

impl Flags {
    pub fn contains(&self, flag: char) -> bool {
        FLAG_CHARS
            .iter()
            .position(|&c| c == flag)
            .is_some_and(|i| self.bits & (1 << i) != 0)
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn global(&self) -> bool {
        self.contains('g')
    }

    pub fn ignore_case(&self) -> bool {
        self.contains('i')
    }

    pub fn multiline(&self) -> bool {
        self.contains('m')
    }

    pub fn dot_all(&self) -> bool {
        self.contains('s')
    }

    pub fn sticky(&self) -> bool {
        self.contains('y')
    }

    /// The source handed to the engine, with an inline group for the flags
    /// that affect compilation.
    pub(crate) fn compile_source(&self, source: &str) -> String {
        let inline: String = ['i', 'm', 's']
            .into_iter()
            .filter(|&c| self.contains(c))
            .collect();
        if inline.is_empty() {
            source.to_string()
        } else {
            format!("(?{inline}){source}")
        }
    }
}

impl FromStr for Flags {
    type Err = FlagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut flags = Flags::default();
        for c in s.chars() {
            let Some(i) = FLAG_CHARS.iter().position(|&f| f == c) else {
                return Err(FlagError::Unknown(c));
            };
            if flags.bits & (1 << i) != 0 {
                return Err(FlagError::Duplicate(c));
            }
            flags.bits |= 1 << i;
        }
        if flags.contains('u') && flags.contains('v') {
            return Err(FlagError::UnicodeConflict);
        }
        Ok(flags)
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in FLAG_CHARS {
            if self.contains(c) {
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("", ""; "empty")]
    #[test_case("g", "g"; "global")]
    #[test_case("ig", "gi"; "canonical order")]
    #[test_case("ysmigd", "dgimsy"; "many")]
    fn test_display(input: &str, expected: &str) {
        let flags: Flags = input.parse().unwrap();
        assert_eq!(flags.to_string(), expected);
    }

    #[test_case("z", FlagError::Unknown('z'); "unknown")]
    #[test_case("gg", FlagError::Duplicate('g'); "duplicate")]
    #[test_case("uv", FlagError::UnicodeConflict; "unicode conflict")]
    fn test_invalid(input: &str, expected: FlagError) {
        assert_eq!(input.parse::<Flags>(), Err(expected));
    }

    #[test]
    fn test_accessors() {
        let flags: Flags = "gim".parse().unwrap();
        assert!(flags.global());
        assert!(flags.ignore_case());
        assert!(flags.multiline());
        assert!(!flags.dot_all());
        assert!(!flags.sticky());
        assert!(!flags.is_empty());
        assert!(Flags::default().is_empty());
    }

    #[test]
    fn test_compile_source() {
        let flags: Flags = "gsi".parse().unwrap();
        assert_eq!(flags.compile_source("a.b"), "(?is)a.b");
        let flags: Flags = "gy".parse().unwrap();
        assert_eq!(flags.compile_source("a.b"), "a.b");
    }
}
