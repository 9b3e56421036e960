use super::lexer::Lexer;
use super::token::{SourceLoc, Token, TokenWithLoc};
use crate::error::ReadError;
use crate::value::heap::{alloc_cons, alloc_int, alloc_nil, alloc_string, alloc_sym, list};
use crate::value::CellRef;

/// Streaming reader: pulls tokens from a [`Lexer`] and builds cells.
pub struct Reader<'a> {
    lexer: Lexer<'a>,
    peeked: Option<TokenWithLoc<'a>>,
}

impl<'a> Reader<'a> {
    pub fn new(input: &'a str) -> Self {
        Reader {
            lexer: Lexer::new(input),
            peeked: None,
        }
    }

    fn peek(&mut self) -> Result<Option<&TokenWithLoc<'a>>, ReadError> {
        if self.peeked.is_none() {
            self.peeked = self.lexer.next_token_with_loc()?;
        }
        Ok(self.peeked.as_ref())
    }

    fn advance(&mut self) -> Result<Option<TokenWithLoc<'a>>, ReadError> {
        match self.peeked.take() {
            Some(t) => Ok(Some(t)),
            None => self.lexer.next_token_with_loc(),
        }
    }

    /// Read the next expression, or `None` at end of input.
    pub fn try_read(&mut self) -> Result<Option<CellRef>, ReadError> {
        match self.advance()? {
            None => Ok(None),
            Some(twl) => self.read_from(twl).map(Some),
        }
    }

    fn read_from(&mut self, twl: TokenWithLoc<'a>) -> Result<CellRef, ReadError> {
        let TokenWithLoc { token, loc } = twl;
        match token {
            Token::LeftParen => self.read_list(loc),
            Token::RightParen => Err(ReadError::UnexpectedClose { loc }),
            Token::Quote => {
                let quoted = match self.advance()? {
                    Some(next) => self.read_from(next)?,
                    None => return Err(ReadError::DanglingQuote { loc }),
                };
                Ok(list(&[alloc_sym("quote"), quoted]))
            }
            Token::Symbol(name) => Ok(alloc_sym(name)),
            Token::Integer(n) => Ok(alloc_int(n)),
            Token::String(s) => Ok(alloc_string(&s)),
            Token::Nil => Ok(alloc_nil()),
        }
    }

    fn read_list(&mut self, open: SourceLoc) -> Result<CellRef, ReadError> {
        let mut elements = Vec::new();
        loop {
            let closing = match self.peek()? {
                None => return Err(ReadError::UnterminatedList { loc: open }),
                Some(twl) => twl.token == Token::RightParen,
            };
            let next = self
                .advance()?
                .ok_or(ReadError::UnterminatedList { loc: open })?;
            if closing {
                break;
            }
            elements.push(self.read_from(next)?);
        }
        Ok(elements
            .into_iter()
            .rev()
            .fold(None, |tail, head| Some(alloc_cons(Some(head), tail)))
            .unwrap_or_else(alloc_nil))
    }
}
