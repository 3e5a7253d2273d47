use crate::mutator::Mutator;
use crate::oref::ORef;

/// The canonical truth values of a `Mutator`. Nothing here allocates.
pub struct Bool;

impl Bool {
    pub fn instance(mt: &Mutator, v: bool) -> ORef {
        if v { mt.singletons().r#true } else { mt.singletons().r#false }
    }
}

pub fn true_value(mt: &Mutator) -> ORef { mt.singletons().r#true }

pub fn false_value(mt: &Mutator) -> ORef { mt.singletons().r#false }

pub fn from_bool(mt: &Mutator, v: bool) -> ORef { Bool::instance(mt, v) }
