use log::trace;
use thiserror::Error;

use crate::bool::Bool;
use crate::capability::{Capabilities, Failed, Protocol};
use crate::mutator::Mutator;
use crate::oref::ORef;

/// The slot selected for a value reported failure. Its cause stays pending on the `Mutator`
/// (see `Mutator::take_exception`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{protocol} of '{type_name}' object failed")]
pub struct EvaluationError {
    pub protocol: Protocol,
    pub type_name: &'static str
}

/// Truth value of `v`.
///
/// `True` is true and `False` and `None` are false by identity. Any other value is decided by
/// exactly one slot of its type, tried in the order numeric conversion, mapping length,
/// sequence length: a positive result is true and zero is false. A type with none of those
/// is always true.
pub fn evaluate_truth(mt: &mut Mutator, v: ORef) -> Result<bool, EvaluationError> {
    let singletons = mt.singletons();

    if v == singletons.r#true {
        Ok(true)
    } else if v == singletons.r#false || v == singletons.none {
        Ok(false)
    } else {
        let caps = Capabilities::of(v);

        match caps.select() {
            Some(slot) => match slot.invoke(mt, v) {
                Ok(n) => Ok(n > 0),

                Err(Failed) => Err(EvaluationError {
                    protocol: slot.protocol(),
                    type_name: caps.r#type().name()
                })
            },

            None => {
                trace!("'{}' has no truth slot", caps.r#type().name());
                Ok(true)
            }
        }
    }
}

pub fn is_falsy(mt: &mut Mutator, v: ORef) -> Result<bool, EvaluationError> {
    evaluate_truth(mt, v).map(|b| !b)
}

pub fn logical_not(mt: &mut Mutator, v: ORef) -> Result<ORef, EvaluationError> {
    let falsy = is_falsy(mt, v)?;
    Ok(Bool::instance(mt, falsy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bool::{true_value, false_value};
    use crate::builtins;
    use crate::mutator::Cfg;

    #[test]
    fn singletons() {
        let mut mt = Mutator::new(Cfg::default());

        let t = true_value(&mt);
        let f = false_value(&mt);
        let none = builtins::none(&mt);

        assert_eq!(evaluate_truth(&mut mt, t), Ok(true));
        assert_eq!(evaluate_truth(&mut mt, f), Ok(false));
        assert_eq!(evaluate_truth(&mut mt, none), Ok(false));
    }

    #[test]
    fn builtin_values() {
        let mut mt = Mutator::new(Cfg::default());

        let cases = [
            (builtins::int(&mut mt, 0), false),
            (builtins::int(&mut mt, -7), true),
            (builtins::float(&mut mt, 0.0), false),
            (builtins::float(&mut mt, -0.0), false),
            (builtins::float(&mut mt, 0.5), true),
            (builtins::str(&mut mt, ""), false),
            (builtins::str(&mut mt, "x"), true),
            (builtins::tuple(&mut mt, &[]), false),
            (builtins::list(&mut mt, &[]), false),
            (builtins::dict(&mut mt, &[]), false),
            (builtins::object(&mut mt), true)
        ];

        for (v, expected) in cases {
            assert_eq!(evaluate_truth(&mut mt, v), Ok(expected), "{}", v.within(&mt));
        }
    }

    #[test]
    fn not_and_falsy() {
        let mut mt = Mutator::new(Cfg::default());

        let empty = builtins::str(&mut mt, "");
        assert_eq!(is_falsy(&mut mt, empty), Ok(true));
        assert_eq!(logical_not(&mut mt, empty), Ok(true_value(&mt)));

        let one = builtins::int(&mut mt, 1);
        let ls = builtins::list(&mut mt, &[one]);
        assert_eq!(logical_not(&mut mt, ls), Ok(false_value(&mt)));
    }
}
