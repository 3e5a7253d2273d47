use std::iter::Peekable;
use std::str::Chars;
use thiserror::Error;

use crate::builtins;
use crate::condition::Expr;
use crate::mutator::Mutator;
use crate::pos::{Pos, Span, Spanning};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    #[error("{pos}: unexpected end of input")]
    Eof {pos: Pos},
    #[error("{pos}: unexpected character {c:?}")]
    UnexpectedChar {c: char, pos: Pos},
    #[error("{pos}: unterminated string literal")]
    UnterminatedString {pos: Pos},
    #[error("{pos}: integer literal out of range")]
    IntOverflow {pos: Pos},
    #[error("{pos}: invalid float literal {literal:?}")]
    BadFloat {literal: String, pos: Pos},
    #[error("{pos}: unknown name `{name}`")]
    UnknownName {name: String, pos: Pos},
    #[error("{pos}: expected {expected}")]
    Expected {expected: &'static str, pos: Pos}
}

type ReadResult<T> = Result<T, ReadError>;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Int(isize),
    Float(f64),
    Str(String),
    Name(String),
    Open(char),
    Close(char),
    Comma,
    Colon
}

struct Input<'a> {
    chars: Peekable<Chars<'a>>,
    pos: Pos
}

impl<'a> Input<'a> {
    fn new(chars: &'a str) -> Self {
        Input {
            chars: chars.chars().peekable(),
            pos: Pos::default()
        }
    }

    fn peek(&mut self) -> Option<char> { self.chars.peek().copied() }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.next();
            } else {
                break;
            }
        }
    }
}

impl<'a> Iterator for Input<'a> {
    type Item = char;

    fn next(&mut self) -> Option<Self::Item> {
        self.chars.next().map(|c| {
            self.pos = self.pos.advance(c);
            c
        })
    }
}

struct Lexer<'a> {
    input: Input<'a>
}

impl<'a> Lexer<'a> {
    fn pos(&self) -> Pos { self.input.pos }

    fn next(&mut self) -> ReadResult<Option<Spanning<Token>>> {
        self.input.skip_whitespace();

        let start = self.pos();
        let c = match self.input.peek() {
            Some(c) => c,
            None => return Ok(None)
        };

        let tok = match c {
            '(' | '[' | '{' => { self.input.next(); Token::Open(c) },
            ')' | ']' | '}' => { self.input.next(); Token::Close(c) },
            ',' => { self.input.next(); Token::Comma },
            ':' => { self.input.next(); Token::Colon },
            '\'' | '"' => self.read_str()?,
            '-' => {
                self.input.next();
                match self.input.peek() {
                    Some(d) if d.is_ascii_digit() => self.read_number(true, start)?,
                    Some(c) => return Err(ReadError::UnexpectedChar {c, pos: self.pos()}),
                    None => return Err(ReadError::Eof {pos: self.pos()})
                }
            },
            c if c.is_ascii_digit() => self.read_number(false, start)?,
            c if c.is_alphabetic() || c == '_' => self.read_name(),
            c => return Err(ReadError::UnexpectedChar {c, pos: start})
        };

        Ok(Some(Spanning {v: tok, span: Span {start, end: self.pos()}}))
    }

    fn read_digits(&mut self, literal: &mut String) {
        while let Some(d) = self.input.peek() {
            if d.is_ascii_digit() || d == '_' {
                self.input.next();
                if d != '_' {
                    literal.push(d);
                }
            } else {
                break;
            }
        }
    }

    fn read_number(&mut self, negative: bool, start: Pos) -> ReadResult<Token> {
        let mut literal = String::new();
        if negative {
            literal.push('-');
        }
        self.read_digits(&mut literal);

        let mut is_float = false;

        if self.input.peek() == Some('.') {
            self.input.next();
            is_float = true;
            literal.push('.');
            self.read_digits(&mut literal);
        }

        if let Some(e @ ('e' | 'E')) = self.input.peek() {
            self.input.next();
            is_float = true;
            literal.push(e);
            if let Some(sign @ ('+' | '-')) = self.input.peek() {
                self.input.next();
                literal.push(sign);
            }
            self.read_digits(&mut literal);
        }

        if is_float {
            literal.parse::<f64>()
                .map(Token::Float)
                .map_err(|_| ReadError::BadFloat {literal, pos: start})
        } else {
            literal.parse::<isize>()
                .map(Token::Int)
                .map_err(|_| ReadError::IntOverflow {pos: start})
        }
    }

    fn read_str(&mut self) -> ReadResult<Token> {
        let start = self.pos();
        let quote = self.input.next();
        let mut s = String::new();

        loop {
            match self.input.next() {
                Some(c) if Some(c) == quote => return Ok(Token::Str(s)),

                Some('\\') => match self.input.next() {
                    Some('n') => s.push('\n'),
                    Some('t') => s.push('\t'),
                    Some('r') => s.push('\r'),
                    Some('0') => s.push('\0'),
                    Some(c) => s.push(c),
                    None => return Err(ReadError::UnterminatedString {pos: start})
                },

                Some('\n') | None => return Err(ReadError::UnterminatedString {pos: start}),

                Some(c) => s.push(c)
            }
        }
    }

    fn read_name(&mut self) -> Token {
        let mut name = String::new();

        while let Some(c) = self.input.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.input.next();
                name.push(c);
            } else {
                break;
            }
        }

        Token::Name(name)
    }
}

/// Reads expressions from a string, allocating their constants in a `Mutator`.
///
/// ```text
/// expr := or ["if" or "else" expr]
/// or   := and ("or" and)*
/// and  := not ("and" not)*
/// not  := "not" not | atom
/// atom := None | True | False | object() | number | string
///       | "(" [expr ("," expr)* [","]] ")" | "[" ... "]" | "{" [expr ":" expr ("," ...)*] "}"
/// ```
pub struct Reader<'a> {
    lexer: Lexer<'a>,
    peeked: Option<Spanning<Token>>
}

impl<'a> Reader<'a> {
    pub fn new(chars: &'a str) -> Self {
        Reader {
            lexer: Lexer {input: Input::new(chars)},
            peeked: None
        }
    }

    fn peek(&mut self) -> ReadResult<Option<&Spanning<Token>>> {
        if self.peeked.is_none() {
            self.peeked = self.lexer.next()?;
        }

        Ok(self.peeked.as_ref())
    }

    fn pop(&mut self) -> ReadResult<Option<Spanning<Token>>> {
        match self.peeked.take() {
            Some(tok) => Ok(Some(tok)),
            None => self.lexer.next()
        }
    }

    fn pop_some(&mut self) -> ReadResult<Spanning<Token>> {
        self.pop()?.ok_or_else(|| ReadError::Eof {pos: self.lexer.pos()})
    }

    fn at_name(&mut self, keyword: &str) -> ReadResult<bool> {
        Ok(matches!(self.peek()?, Some(Spanning {v: Token::Name(name), ..}) if name == keyword))
    }

    fn at(&mut self, tok: &Token) -> ReadResult<bool> {
        Ok(matches!(self.peek()?, Some(Spanning {v, ..}) if v == tok))
    }

    fn expect(&mut self, tok: Token, expected: &'static str) -> ReadResult<Span> {
        let next = self.pop_some()?;

        if next.v == tok {
            Ok(next.span)
        } else {
            Err(ReadError::Expected {expected, pos: next.span.start})
        }
    }

    fn read_expr(&mut self, mt: &mut Mutator) -> ReadResult<Spanning<Expr>> {
        let yes = self.read_or(mt)?;

        if !self.at_name("if")? {
            return Ok(yes);
        }

        self.pop()?;
        let condition = self.read_or(mt)?;
        self.expect(Token::Name("else".into()), "'else'")?;
        let no = self.read_expr(mt)?;

        Ok(Spanning {
            span: yes.span.to(no.span),
            v: Expr::Conditional(Box::new(condition.v), Box::new(yes.v), Box::new(no.v))
        })
    }

    fn read_or(&mut self, mt: &mut Mutator) -> ReadResult<Spanning<Expr>> {
        let first = self.read_and(mt)?;
        let mut span = first.span;
        let mut rest = Vec::new();

        while self.at_name("or")? {
            self.pop()?;
            let operand = self.read_and(mt)?;
            span = span.to(operand.span);
            rest.push(operand.v);
        }

        if rest.is_empty() {
            Ok(first)
        } else {
            Ok(Spanning {v: Expr::Or(Box::new(first.v), rest), span})
        }
    }

    fn read_and(&mut self, mt: &mut Mutator) -> ReadResult<Spanning<Expr>> {
        let first = self.read_not(mt)?;
        let mut span = first.span;
        let mut rest = Vec::new();

        while self.at_name("and")? {
            self.pop()?;
            let operand = self.read_not(mt)?;
            span = span.to(operand.span);
            rest.push(operand.v);
        }

        if rest.is_empty() {
            Ok(first)
        } else {
            Ok(Spanning {v: Expr::And(Box::new(first.v), rest), span})
        }
    }

    fn read_not(&mut self, mt: &mut Mutator) -> ReadResult<Spanning<Expr>> {
        if self.at_name("not")? {
            let start = self.pop_some()?.span;
            let arg = self.read_not(mt)?;
            Ok(Spanning {span: start.to(arg.span), v: Expr::Not(Box::new(arg.v))})
        } else {
            self.read_atom(mt)
        }
    }

    /// Comma separated `read_expr`s up to `close`. Returns whether a comma was seen.
    fn read_items(&mut self, mt: &mut Mutator, close: char) -> ReadResult<(Vec<Expr>, bool, Span)> {
        let mut items = Vec::new();
        let mut comma = false;

        loop {
            if self.at(&Token::Close(close))? {
                break;
            }

            items.push(self.read_expr(mt)?.v);

            if self.at(&Token::Comma)? {
                self.pop()?;
                comma = true;
            } else {
                break;
            }
        }

        let end = self.expect(Token::Close(close), "closing delimiter")?;
        Ok((items, comma, end))
    }

    fn read_entries(&mut self, mt: &mut Mutator) -> ReadResult<(Vec<(Expr, Expr)>, Span)> {
        let mut entries = Vec::new();

        loop {
            if self.at(&Token::Close('}'))? {
                break;
            }

            let k = self.read_expr(mt)?.v;
            self.expect(Token::Colon, "':'")?;
            let v = self.read_expr(mt)?.v;
            entries.push((k, v));

            if self.at(&Token::Comma)? {
                self.pop()?;
            } else {
                break;
            }
        }

        let end = self.expect(Token::Close('}'), "'}'")?;
        Ok((entries, end))
    }

    fn read_atom(&mut self, mt: &mut Mutator) -> ReadResult<Spanning<Expr>> {
        let Spanning {v: tok, span} = self.pop_some()?;

        match tok {
            Token::Int(n) => Ok(Spanning {v: Expr::Const(builtins::int(mt, n)), span}),

            Token::Float(x) => Ok(Spanning {v: Expr::Const(builtins::float(mt, x)), span}),

            Token::Str(s) => Ok(Spanning {v: Expr::Const(builtins::str(mt, &s)), span}),

            Token::Name(name) => {
                let v = match name.as_str() {
                    "None" => builtins::none(mt),
                    "True" => mt.singletons().r#true,
                    "False" => mt.singletons().r#false,
                    "object" => {
                        self.expect(Token::Open('('), "'('")?;
                        let end = self.expect(Token::Close(')'), "')'")?;
                        let v = builtins::object(mt);
                        return Ok(Spanning {v: Expr::Const(v), span: span.to(end)});
                    },
                    _ => return Err(ReadError::UnknownName {name, pos: span.start})
                };
                Ok(Spanning {v: Expr::Const(v), span})
            },

            Token::Open('(') => {
                let (mut items, comma, end) = self.read_items(mt, ')')?;
                let span = span.to(end);

                if items.len() == 1 && !comma {
                    items.pop()
                        .map(|v| Spanning {v, span})
                        .ok_or(ReadError::Expected {expected: "expression", pos: span.start})
                } else {
                    Ok(Spanning {v: Expr::Tuple(items), span})
                }
            },

            Token::Open('[') => {
                let (items, _, end) = self.read_items(mt, ']')?;
                Ok(Spanning {v: Expr::List(items), span: span.to(end)})
            },

            Token::Open('{') => {
                let (entries, end) = self.read_entries(mt)?;
                Ok(Spanning {v: Expr::Dict(entries), span: span.to(end)})
            },

            _ => Err(ReadError::Expected {expected: "expression", pos: span.start})
        }
    }

    /// The next complete expression, or `None` at end of input.
    pub fn next(&mut self, mt: &mut Mutator) -> Option<ReadResult<Spanning<Expr>>> {
        match self.peek().map(|tok| tok.is_some()) {
            Ok(true) => Some(self.read_expr(mt)),
            Ok(false) => None,
            Err(err) => Some(Err(err))
        }
    }
}
