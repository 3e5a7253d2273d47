//! Which truth-relevant protocols a value's type implements, and calling them.
//!
//! Raw slots report failure C-style, with a negative return after recording an exception on
//! the `Mutator`. [`Slot::invoke`] turns that into `Result<usize, Failed>` so callers never
//! look at signs.

use std::fmt::{self, Display};
use log::{debug, trace, warn};

use crate::mutator::Mutator;
use crate::oref::{Gc, ORef};
use crate::r#type::Type;
use crate::exception::ExceptionKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    NumericConversion,
    MappingLength,
    SequenceLength
}

impl Display for Protocol {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.write_str(match self {
            Protocol::NumericConversion => "numeric conversion",
            Protocol::MappingLength => "mapping length",
            Protocol::SequenceLength => "sequence length"
        })
    }
}

/// A slot returned a negative value. The cause is the `Mutator`'s pending exception.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Failed;

#[derive(Clone, Copy)]
pub struct Slot {
    protocol: Protocol,
    func: fn(&mut Mutator, ORef) -> isize
}

impl Slot {
    pub fn protocol(self) -> Protocol { self.protocol }

    pub fn invoke(self, mt: &mut Mutator, v: ORef) -> Result<usize, Failed> {
        let earlier = mt.exception_occurred().cloned();
        let res = (self.func)(mt, v);
        trace!("{} slot of '{}' returned {}", self.protocol, v.r#type().name(), res);

        usize::try_from(res).map_err(|_| {
            match mt.exception_occurred() {
                None => mt.raise(ExceptionKind::RuntimeError, format!(
                    "{} slot of '{}' object failed without setting an exception",
                    self.protocol, v.r#type().name())),

                // Cannot tell a re-raise of the same error from no raise at all:
                Some(exn) if earlier.as_ref() == Some(exn) =>
                    warn!("{} slot of '{}' failed with a cause pending since before the call: {}",
                        self.protocol, v.r#type().name(), exn),

                Some(_) => ()
            }
            debug!("{} slot of '{}' failed", self.protocol, v.r#type().name());
            Failed
        })
    }
}

#[derive(Clone, Copy)]
pub struct Capabilities(Gc<Type>);

impl Capabilities {
    pub fn of(v: ORef) -> Self { Self(v.r#type()) }

    pub fn r#type(self) -> Gc<Type> { self.0 }

    fn descriptor<'a>(self) -> &'a Type { unsafe { self.0.as_ref() } }

    pub fn numeric_conversion(self) -> Option<Slot> {
        self.descriptor().as_number()
            .and_then(|methods| methods.nonzero)
            .map(|func| Slot {protocol: Protocol::NumericConversion, func})
    }

    pub fn mapping_length(self) -> Option<Slot> {
        self.descriptor().as_mapping()
            .and_then(|methods| methods.length)
            .map(|func| Slot {protocol: Protocol::MappingLength, func})
    }

    pub fn sequence_length(self) -> Option<Slot> {
        self.descriptor().as_sequence()
            .and_then(|methods| methods.length)
            .map(|func| Slot {protocol: Protocol::SequenceLength, func})
    }

    pub fn has_numeric_conversion(self) -> bool { self.numeric_conversion().is_some() }

    pub fn has_mapping_length(self) -> bool { self.mapping_length().is_some() }

    pub fn has_sequence_length(self) -> bool { self.sequence_length().is_some() }

    /// `None` if the type lacks the protocol.
    pub fn invoke_numeric_conversion(self, mt: &mut Mutator, v: ORef)
        -> Option<Result<usize, Failed>>
    {
        self.numeric_conversion().map(|slot| slot.invoke(mt, v))
    }

    pub fn invoke_mapping_length(self, mt: &mut Mutator, v: ORef)
        -> Option<Result<usize, Failed>>
    {
        self.mapping_length().map(|slot| slot.invoke(mt, v))
    }

    pub fn invoke_sequence_length(self, mt: &mut Mutator, v: ORef)
        -> Option<Result<usize, Failed>>
    {
        self.sequence_length().map(|slot| slot.invoke(mt, v))
    }

    /// The single slot truth evaluation consults: number before mapping before sequence.
    pub fn select(self) -> Option<Slot> {
        self.numeric_conversion()
            .or_else(|| self.mapping_length())
            .or_else(|| self.sequence_length())
    }
}
