use crate::CallNode;
use crate::Chain;
use crate::Operation;
use pattern::Argument;
use thiserror::Error;

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ReadError {
    #[error("Expected {expected} at offset {offset}")]
    Expected {
        expected: &'static str,
        offset: usize,
    },
    #[error("Unexpected character '{found}' at offset {offset}")]
    Unexpected { found: char, offset: usize },
    #[error("Unknown operation '{name}' at offset {offset}")]
    UnknownOperation { name: String, offset: usize },
    #[error("Invalid number at offset {offset}")]
    InvalidNumber { offset: usize },
    #[error("Unterminated string starting at offset {offset}")]
    UnterminatedString { offset: usize },
    #[error("Unexpected input after the chain at offset {offset}")]
    Trailing { offset: usize },
    #[error("'done' cannot be called inside a callback (offset {offset})")]
    NestedDone { offset: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Lexeme<'s> {
    Ident(&'s str),
    Number(u32),
    Text(String),
    Dot,
    Comma,
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Arrow,
    Semicolon,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Token<'s> {
    lexeme: Lexeme<'s>,
    offset: usize,
}

#[derive(Debug, Clone)]
struct Lexer<'s> {
    rest: &'s str,
    byte: usize,
    peeked: Option<Result<Token<'s>, ReadError>>,
}

impl<'s> Lexer<'s> {
    fn new(input: &'s str) -> Self {
        Self {
            rest: input,
            byte: 0,
            peeked: None,
        }
    }

    fn peek(&mut self) -> Option<&Result<Token<'s>, ReadError>> {
        if self.peeked.is_some() {
            return self.peeked.as_ref();
        }
        self.peeked = self.next();
        self.peeked.as_ref()
    }

    fn bump(&mut self, bytes: usize) -> &'s str {
        let taken = &self.rest[..bytes];
        self.rest = &self.rest[bytes..];
        self.byte += bytes;
        taken
    }

    fn string(&mut self, quote: char, offset: usize) -> Result<Lexeme<'s>, ReadError> {
        let mut text = String::new();
        let mut chars = self.rest.char_indices();
        while let Some((i, c)) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some((_, 'n')) => text.push('\n'),
                    Some((_, 't')) => text.push('\t'),
                    Some((_, 'r')) => text.push('\r'),
                    Some((_, escaped)) => text.push(escaped),
                    None => break,
                },
                c if c == quote => {
                    self.bump(i + c.len_utf8());
                    return Ok(Lexeme::Text(text));
                }
                c => text.push(c),
            }
        }
        Err(ReadError::UnterminatedString { offset })
    }
}

impl<'s> Iterator for Lexer<'s> {
    type Item = Result<Token<'s>, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(next) = self.peeked.take() {
            return Some(next);
        }

        let trimmed = self.rest.trim_start();
        self.bump(self.rest.len() - trimmed.len());

        let c = self.rest.chars().next()?;
        let offset = self.byte;
        let make_token = |lexeme: Lexeme<'s>| Some(Ok(Token { lexeme, offset }));

        let simple = match c {
            '.' => Some(Lexeme::Dot),
            ',' => Some(Lexeme::Comma),
            '(' => Some(Lexeme::LeftParen),
            ')' => Some(Lexeme::RightParen),
            '{' => Some(Lexeme::LeftBrace),
            '}' => Some(Lexeme::RightBrace),
            ';' => Some(Lexeme::Semicolon),
            _ => None,
        };
        if let Some(lexeme) = simple {
            self.bump(1);
            return make_token(lexeme);
        }

        match c {
            '=' if self.rest.starts_with("=>") => {
                self.bump(2);
                make_token(Lexeme::Arrow)
            }
            '"' | '\'' | '`' => {
                self.bump(1);
                Some(self.string(c, offset).map(|lexeme| Token { lexeme, offset }))
            }
            c if c.is_ascii_digit() => {
                let len = self
                    .rest
                    .find(|c: char| !c.is_ascii_digit())
                    .unwrap_or(self.rest.len());
                let digits = self.bump(len);
                match digits.parse() {
                    Ok(n) => make_token(Lexeme::Number(n)),
                    Err(_) => Some(Err(ReadError::InvalidNumber { offset })),
                }
            }
            c if c.is_alphabetic() || c == '_' || c == '$' => {
                let len = self
                    .rest
                    .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '$'))
                    .unwrap_or(self.rest.len());
                make_token(Lexeme::Ident(self.bump(len)))
            }
            found => {
                self.bump(found.len_utf8());
                Some(Err(ReadError::Unexpected { found, offset }))
            }
        }
    }
}

/// Reads chain source such as `exp.digit(4).group((exp) => { exp.any() })`
/// back into a call tree.
#[derive(Debug, Clone)]
pub(crate) struct Reader<'s> {
    lexer: Lexer<'s>,
    end: usize,
}

impl<'s> Reader<'s> {
    pub fn new(input: &'s str) -> Self {
        Self {
            lexer: Lexer::new(input),
            end: input.len(),
        }
    }

    pub fn read(mut self) -> Result<Chain, ReadError> {
        self.expect_ident("a root identifier")?;
        let (calls, flags) = self.read_calls(true)?;
        self.eat(&Lexeme::Semicolon)?;
        if let Some(token) = self.lexer.next() {
            return Err(ReadError::Trailing {
                offset: token?.offset,
            });
        }
        Ok(Chain { calls, flags })
    }

    fn next_token(&mut self, expected: &'static str) -> Result<Token<'s>, ReadError> {
        match self.lexer.next() {
            Some(token) => token,
            None => Err(ReadError::Expected {
                expected,
                offset: self.end,
            }),
        }
    }

    fn peek_is(&mut self, lexeme: &Lexeme<'_>) -> Result<bool, ReadError> {
        match self.lexer.peek() {
            Some(Ok(token)) => Ok(token.lexeme == *lexeme),
            Some(Err(err)) => Err(err.clone()),
            None => Ok(false),
        }
    }

    fn eat(&mut self, lexeme: &Lexeme<'_>) -> Result<bool, ReadError> {
        if self.peek_is(lexeme)? {
            self.lexer.next();
            return Ok(true);
        }
        Ok(false)
    }

    fn expect(&mut self, lexeme: &Lexeme<'_>, expected: &'static str) -> Result<(), ReadError> {
        let token = self.next_token(expected)?;
        if token.lexeme != *lexeme {
            return Err(ReadError::Expected {
                expected,
                offset: token.offset,
            });
        }
        Ok(())
    }

    fn expect_ident(&mut self, expected: &'static str) -> Result<(&'s str, usize), ReadError> {
        let token = self.next_token(expected)?;
        match token.lexeme {
            Lexeme::Ident(name) => Ok((name, token.offset)),
            _ => Err(ReadError::Expected {
                expected,
                offset: token.offset,
            }),
        }
    }

    /// Calls following a root identifier, up to and including `done`.
    fn read_calls(&mut self, top: bool) -> Result<(Vec<CallNode>, Option<String>), ReadError> {
        let mut calls = Vec::new();
        while self.eat(&Lexeme::Dot)? {
            let (first, offset) = self.expect_ident("an operation name")?;
            let mut name = first.to_string();
            while self.eat(&Lexeme::Dot)? {
                let (part, _) = self.expect_ident("an operation name")?;
                name.push('.');
                name.push_str(part);
            }
            self.expect(&Lexeme::LeftParen, "'('")?;
            if name == "done" {
                if !top {
                    return Err(ReadError::NestedDone { offset });
                }
                return Ok((calls, Some(self.read_flags()?)));
            }
            let Some(operation) = Operation::from_name(&name) else {
                return Err(ReadError::UnknownOperation { name, offset });
            };
            let (arguments, body) = self.read_arguments()?;
            calls.push(CallNode {
                operation,
                arguments,
                body,
            });
        }
        Ok((calls, None))
    }

    fn read_flags(&mut self) -> Result<String, ReadError> {
        let token = self.next_token("flags or ')'")?;
        match token.lexeme {
            Lexeme::RightParen => Ok(String::new()),
            Lexeme::Text(flags) => {
                self.expect(&Lexeme::RightParen, "')'")?;
                Ok(flags)
            }
            _ => Err(ReadError::Expected {
                expected: "flags or ')'",
                offset: token.offset,
            }),
        }
    }

    /// Arguments after an opening `(`, up to and including the closing `)`.
    fn read_arguments(&mut self) -> Result<(Vec<Argument>, Option<Vec<CallNode>>), ReadError> {
        let mut arguments = Vec::new();
        let mut body = None;
        loop {
            let token = self.next_token("an argument or ')'")?;
            match token.lexeme {
                Lexeme::RightParen => break,
                Lexeme::Number(n) => arguments.push(Argument::Number(n)),
                Lexeme::Text(text) => arguments.push(Argument::Text(text)),
                Lexeme::LeftParen if body.is_none() => {
                    self.expect_ident("a callback parameter")?;
                    self.expect(&Lexeme::RightParen, "')'")?;
                    body = Some(self.read_callback()?);
                }
                Lexeme::Ident(_) if body.is_none() => body = Some(self.read_callback()?),
                _ => {
                    return Err(ReadError::Expected {
                        expected: "an argument",
                        offset: token.offset,
                    });
                }
            }
            let token = self.next_token("',' or ')'")?;
            match token.lexeme {
                Lexeme::Comma => {}
                Lexeme::RightParen => break,
                _ => {
                    return Err(ReadError::Expected {
                        expected: "',' or ')'",
                        offset: token.offset,
                    });
                }
            }
        }
        Ok((arguments, body))
    }

    /// `=> { exp... }` or `=> exp...` after a callback parameter.
    fn read_callback(&mut self) -> Result<Vec<CallNode>, ReadError> {
        self.expect(&Lexeme::Arrow, "'=>'")?;
        let braced = self.eat(&Lexeme::LeftBrace)?;
        let (root, _) = self.expect_ident("a root identifier")?;
        if braced && root == "return" {
            self.expect_ident("a root identifier")?;
        }
        let (calls, _) = self.read_calls(false)?;
        if braced {
            self.eat(&Lexeme::Semicolon)?;
            self.expect(&Lexeme::RightBrace, "'}'")?;
        }
        Ok(calls)
    }
}
