use std::cell::RefCell;

use crate::heap::Heap;
use crate::mutator::{Mutator, Types};
use crate::object::Payload;
use crate::oref::ORef;
use crate::r#type::Type;
use crate::exception::ExceptionKind;

pub fn types(heap: &mut Heap) -> Types {
    Types {
        none_type: heap.alloc_type(Type::builder("NoneType").finish()),
        bool: heap.alloc_type(Type::builder("bool").nonzero(bool_nonzero).finish()),
        int: heap.alloc_type(Type::builder("int").nonzero(int_nonzero).finish()),
        float: heap.alloc_type(Type::builder("float").nonzero(float_nonzero).finish()),
        str: heap.alloc_type(Type::builder("str").sequence_length(str_length).finish()),
        tuple: heap.alloc_type(Type::builder("tuple").sequence_length(tuple_length).finish()),
        list: heap.alloc_type(Type::builder("list").sequence_length(list_length).finish()),
        dict: heap.alloc_type(Type::builder("dict").mapping_length(dict_length).finish()),
        object: heap.alloc_type(Type::builder("object").finish())
    }
}

// Slots
// -------------------------------------------------------------------------------------------

fn bad_receiver(mt: &mut Mutator, expected: &str, v: ORef) -> isize {
    let message = format!("descriptor for '{}' objects doesn't apply to a '{}' object",
        expected, v.r#type().name());
    mt.raise(ExceptionKind::TypeError, message);
    -1
}

fn checked_len(mt: &mut Mutator, len: usize) -> isize {
    match isize::try_from(len) {
        Ok(len) => len,
        Err(_) => {
            mt.raise(ExceptionKind::OverflowError, "length does not fit in a signed word");
            -1
        }
    }
}

fn bool_nonzero(mt: &mut Mutator, v: ORef) -> isize {
    match *mt.get(v).payload() {
        Payload::Bool(b) => b as isize,
        _ => bad_receiver(mt, "bool", v)
    }
}

fn int_nonzero(mt: &mut Mutator, v: ORef) -> isize {
    match *mt.get(v).payload() {
        Payload::Int(n) => (n != 0) as isize,
        _ => bad_receiver(mt, "int", v)
    }
}

// NaN is truthy:
fn float_nonzero(mt: &mut Mutator, v: ORef) -> isize {
    match *mt.get(v).payload() {
        Payload::Float(x) => (x != 0.0) as isize,
        _ => bad_receiver(mt, "float", v)
    }
}

fn str_length(mt: &mut Mutator, v: ORef) -> isize {
    let len = match mt.get(v).payload() {
        Payload::Str(s) => s.chars().count(),
        _ => return bad_receiver(mt, "str", v)
    };
    checked_len(mt, len)
}

fn tuple_length(mt: &mut Mutator, v: ORef) -> isize {
    let len = match mt.get(v).payload() {
        Payload::Tuple(items) => items.len(),
        _ => return bad_receiver(mt, "tuple", v)
    };
    checked_len(mt, len)
}

fn list_length(mt: &mut Mutator, v: ORef) -> isize {
    let len = match mt.get(v).payload() {
        Payload::List(items) => items.borrow().len(),
        _ => return bad_receiver(mt, "list", v)
    };
    checked_len(mt, len)
}

fn dict_length(mt: &mut Mutator, v: ORef) -> isize {
    let len = match mt.get(v).payload() {
        Payload::Dict(entries) => entries.borrow().len(),
        _ => return bad_receiver(mt, "dict", v)
    };
    checked_len(mt, len)
}

// Constructors
// -------------------------------------------------------------------------------------------

pub fn none(mt: &Mutator) -> ORef { mt.singletons().none }

pub fn int(mt: &mut Mutator, n: isize) -> ORef {
    let r#type = mt.types().int;
    mt.alloc(r#type, Payload::Int(n))
}

pub fn float(mt: &mut Mutator, x: f64) -> ORef {
    let r#type = mt.types().float;
    mt.alloc(r#type, Payload::Float(x))
}

pub fn str(mt: &mut Mutator, s: &str) -> ORef {
    let r#type = mt.types().str;
    mt.alloc(r#type, Payload::Str(s.into()))
}

pub fn tuple(mt: &mut Mutator, items: &[ORef]) -> ORef {
    let r#type = mt.types().tuple;
    mt.alloc(r#type, Payload::Tuple(items.into()))
}

pub fn list(mt: &mut Mutator, items: &[ORef]) -> ORef {
    let r#type = mt.types().list;
    mt.alloc(r#type, Payload::List(RefCell::new(items.to_vec())))
}

#[derive(Clone, Copy)]
enum Number {
    Int(isize),
    Float(f64)
}

impl Number {
    fn of(payload: &Payload) -> Option<Self> {
        match *payload {
            Payload::Bool(b) => Some(Number::Int(b as isize)),
            Payload::Int(n) => Some(Number::Int(n)),
            Payload::Float(x) => Some(Number::Float(x)),
            _ => None
        }
    }

    fn to_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Float(x) => x
        }
    }
}

/// Dict key equality: by value for `bool`, `int`, `float`, `str` and tuples of those, by
/// identity otherwise.
fn same_key(mt: &Mutator, a: ORef, b: ORef) -> bool {
    fn by_value(mt: &Mutator, v: ORef) -> bool {
        let types = mt.types();
        let r#type = v.r#type();
        r#type == types.bool || r#type == types.int || r#type == types.float
            || r#type == types.str || r#type == types.tuple
    }

    if a == b {
        return true;
    } else if !by_value(mt, a) || !by_value(mt, b) {
        return false;
    }

    match (mt.get(a).payload(), mt.get(b).payload()) {
        (Payload::Str(x), Payload::Str(y)) => x == y,

        (Payload::Tuple(xs), Payload::Tuple(ys)) =>
            xs.len() == ys.len() && xs.iter().zip(ys.iter()).all(|(&x, &y)| same_key(mt, x, y)),

        (x, y) => match (Number::of(x), Number::of(y)) {
            (Some(Number::Int(m)), Some(Number::Int(n))) => m == n,
            (Some(m), Some(n)) => m.to_f64() == n.to_f64(),
            _ => false
        }
    }
}

fn dedup_keys(mt: &Mutator, entries: &[(ORef, ORef)]) -> Vec<(ORef, ORef)> {
    let mut deduped: Vec<(ORef, ORef)> = Vec::with_capacity(entries.len());

    for &(k, v) in entries {
        match deduped.iter_mut().find(|(seen, _)| same_key(mt, *seen, k)) {
            Some(entry) => entry.1 = v, // first key, last value
            None => deduped.push((k, v))
        }
    }

    deduped
}

pub fn dict(mt: &mut Mutator, entries: &[(ORef, ORef)]) -> ORef {
    let entries = dedup_keys(mt, entries);
    let r#type = mt.types().dict;
    mt.alloc(r#type, Payload::Dict(RefCell::new(entries)))
}

pub fn object(mt: &mut Mutator) -> ORef {
    let r#type = mt.types().object;
    mt.alloc(r#type, Payload::Unit)
}
