use std::fmt::{self, Display};

/// Source position; `line` and `col` are 1-based, `index` is a byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pos {
    pub index: usize,
    pub line: usize,
    pub col: usize
}

impl Default for Pos {
    fn default() -> Self { Pos {index: 0, line: 1, col: 1} }
}

impl Display for Pos {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{}:{}", self.line, self.col)
    }
}

impl Pos {
    pub fn advance(self, c: char) -> Self {
        let index = self.index + c.len_utf8();

        if c == '\n' {
            Pos {index, line: self.line + 1, col: 1}
        } else {
            Pos {index, line: self.line, col: self.col + 1}
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: Pos,
    pub end: Pos
}

impl Span {
    pub fn to(self, other: Span) -> Span { Span {start: self.start, end: other.end} }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Spanning<T> {
    pub v: T,
    pub span: Span
}
