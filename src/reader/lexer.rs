use super::token::{SourceLoc, Token, TokenWithLoc};
use crate::error::ReadError;

#[inline]
fn is_delimiter(c: char) -> bool {
    matches!(c, '(' | ')' | '\'' | '"' | ';')
}

/// Parse a decimal or `0x` hexadecimal integer with an optional sign.
///
/// Decimal literals must fit an `i64`. Hex literals are 64-bit patterns:
/// anything up to `0xffffffffffffffff` is accepted and read as two's
/// complement, so `0xffffffffffffffff` is -1.
fn parse_integer(text: &str) -> Option<i64> {
    let (negative, digits) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };
    match digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        Some(hex) => {
            let bits = u64::from_str_radix(hex, 16).ok()? as i64;
            Some(if negative { bits.wrapping_neg() } else { bits })
        }
        None => text.parse::<i64>().ok(),
    }
}

pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
    col: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input,
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    fn loc(&self) -> SourceLoc {
        SourceLoc::new(self.line, self.col)
    }

    fn current(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.current()?;
        if c == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.current() {
            if c.is_whitespace() {
                self.advance();
            } else if c == ';' {
                while let Some(c) = self.advance() {
                    if c == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn read_string(&mut self, loc: SourceLoc) -> Result<String, ReadError> {
        self.advance(); // opening quote
        let mut s = String::new();
        loop {
            match self.advance() {
                None => return Err(ReadError::UnterminatedString { loc }),
                Some('"') => return Ok(s),
                Some('\\') => match self.advance() {
                    Some('n') => s.push('\n'),
                    Some('t') => s.push('\t'),
                    Some('r') => s.push('\r'),
                    Some('0') => s.push('\0'),
                    Some(c) => s.push(c),
                    None => return Err(ReadError::UnterminatedString { loc }),
                },
                Some(c) => s.push(c),
            }
        }
    }

    /// Consume a run of non-delimiter characters.
    fn read_atom(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.current() {
            if c.is_whitespace() || is_delimiter(c) {
                break;
            }
            self.advance();
        }
        &self.input[start..self.pos]
    }

    fn looks_numeric(&self, c: char) -> bool {
        c.is_ascii_digit()
            || ((c == '-' || c == '+') && self.peek(1).is_some_and(|n| n.is_ascii_digit()))
    }

    pub fn next_token_with_loc(&mut self) -> Result<Option<TokenWithLoc<'a>>, ReadError> {
        self.skip_whitespace();
        let loc = self.loc();

        let token = match self.current() {
            None => return Ok(None),
            Some('(') => {
                self.advance();
                Token::LeftParen
            }
            Some(')') => {
                self.advance();
                Token::RightParen
            }
            Some('\'') => {
                self.advance();
                Token::Quote
            }
            Some('"') => Token::String(self.read_string(loc)?),
            Some(c) if self.looks_numeric(c) => {
                let text = self.read_atom();
                match parse_integer(text) {
                    Some(n) => Token::Integer(n),
                    None => {
                        return Err(ReadError::InvalidInteger {
                            text: text.to_string(),
                            loc,
                        })
                    }
                }
            }
            Some(_) => match self.read_atom() {
                "nil" => Token::Nil,
                sym => Token::Symbol(sym),
            },
        };
        Ok(Some(TokenWithLoc { token, loc }))
    }

    pub fn next_token(&mut self) -> Result<Option<Token<'a>>, ReadError> {
        self.next_token_with_loc()
            .map(|opt| opt.map(|twl| twl.token))
    }
}
