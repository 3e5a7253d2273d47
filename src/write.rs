use std::fmt::{self, Display};

use crate::oref::{ORef, Gc};
use crate::object::Payload;
use crate::r#type::Type;
use crate::mutator::{Mutator, WithinMt};

// Wide enough that `Display` never breaks a container across lines:
const ONE_LINE: usize = 1 << 16;

pub trait DisplayWithin {
    fn fmt_within(&self, mt: &Mutator, fmt: &mut fmt::Formatter) -> fmt::Result;
}

impl<'a, T: DisplayWithin> Display for WithinMt<'a, T> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result { self.v.fmt_within(self.mt, fmt) }
}

fn write_str_literal(s: &str, fmt: &mut fmt::Formatter) -> fmt::Result {
    fmt.write_str("'")?;

    for c in s.chars() {
        match c {
            '\'' => fmt.write_str("\\'")?,
            '\\' => fmt.write_str("\\\\")?,
            '\n' => fmt.write_str("\\n")?,
            '\t' => fmt.write_str("\\t")?,
            '\r' => fmt.write_str("\\r")?,
            c => write!(fmt, "{}", c)?
        }
    }

    fmt.write_str("'")
}

fn write_float(x: f64, fmt: &mut fmt::Formatter) -> fmt::Result {
    if x.is_nan() {
        fmt.write_str("nan")
    } else if x.is_infinite() {
        fmt.write_str(if x > 0.0 { "inf" } else { "-inf" })
    } else {
        // `Debug` keeps the `.0` of integral floats:
        write!(fmt, "{:?}", x)
    }
}

impl DisplayWithin for ORef {
    fn fmt_within(&self, mt: &Mutator, fmt: &mut fmt::Formatter) -> fmt::Result {
        match mt.get(*self).payload() {
            Payload::Unit if *self == mt.singletons().none => fmt.write_str("None"),
            Payload::Unit => write!(fmt, "<{} object>", self.r#type().name()),
            Payload::Bool(true) => fmt.write_str("True"),
            Payload::Bool(false) => fmt.write_str("False"),
            Payload::Int(n) if self.r#type() == mt.types().int => write!(fmt, "{}", n),
            Payload::Int(n) => write!(fmt, "<{} object: {}>", self.r#type().name(), n),
            Payload::Float(x) => write_float(*x, fmt),
            Payload::Str(s) => write_str_literal(s, fmt),
            Payload::Tuple(_) | Payload::List(_) | Payload::Dict(_) =>
                write!(fmt, "{}", self.to_doc(mt).pretty(ONE_LINE))
        }
    }
}

impl DisplayWithin for Gc<Type> {
    fn fmt_within(&self, _: &Mutator, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "<class '{}'>", self.name())
    }
}
