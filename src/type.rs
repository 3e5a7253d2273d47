use crate::mutator::Mutator;
use crate::oref::{Gc, ORef};

/// Number protocol truth slot. Returns `1` or `0`, or records an exception on the
/// `Mutator` and returns a negative value.
pub type Inquiry = fn(&mut Mutator, ORef) -> isize;

/// Length slot. Returns the element count, or records an exception on the `Mutator` and
/// returns a negative value.
pub type LenFunc = fn(&mut Mutator, ORef) -> isize;

#[derive(Clone, Copy, Default)]
pub struct NumberMethods {
    pub nonzero: Option<Inquiry>
}

#[derive(Clone, Copy, Default)]
pub struct MappingMethods {
    pub length: Option<LenFunc>
}

#[derive(Clone, Copy, Default)]
pub struct SequenceMethods {
    pub length: Option<LenFunc>
}

/// Runtime type descriptor. A protocol is implemented only when its table is present *and*
/// the relevant slot in it is filled.
pub struct Type {
    name: &'static str,
    as_number: Option<NumberMethods>,
    as_mapping: Option<MappingMethods>,
    as_sequence: Option<SequenceMethods>
}

impl Type {
    pub fn builder(name: &'static str) -> Builder {
        Builder {
            name,
            as_number: None,
            as_mapping: None,
            as_sequence: None
        }
    }

    pub fn name(&self) -> &'static str { self.name }

    pub fn as_number(&self) -> Option<&NumberMethods> { self.as_number.as_ref() }

    pub fn as_mapping(&self) -> Option<&MappingMethods> { self.as_mapping.as_ref() }

    pub fn as_sequence(&self) -> Option<&SequenceMethods> { self.as_sequence.as_ref() }
}

pub struct Builder {
    name: &'static str,
    as_number: Option<NumberMethods>,
    as_mapping: Option<MappingMethods>,
    as_sequence: Option<SequenceMethods>
}

impl Builder {
    pub fn number(mut self, methods: NumberMethods) -> Self {
        self.as_number = Some(methods);
        self
    }

    pub fn mapping(mut self, methods: MappingMethods) -> Self {
        self.as_mapping = Some(methods);
        self
    }

    pub fn sequence(mut self, methods: SequenceMethods) -> Self {
        self.as_sequence = Some(methods);
        self
    }

    pub fn nonzero(self, f: Inquiry) -> Self { self.number(NumberMethods {nonzero: Some(f)}) }

    pub fn mapping_length(self, f: LenFunc) -> Self {
        self.mapping(MappingMethods {length: Some(f)})
    }

    pub fn sequence_length(self, f: LenFunc) -> Self {
        self.sequence(SequenceMethods {length: Some(f)})
    }

    pub fn finish(self) -> Type {
        Type {
            name: self.name,
            as_number: self.as_number,
            as_mapping: self.as_mapping,
            as_sequence: self.as_sequence
        }
    }

    pub fn build(self, mt: &mut Mutator) -> Gc<Type> { mt.alloc_type(self.finish()) }
}
