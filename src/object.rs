use std::cell::RefCell;

use crate::oref::{Gc, ORef};
use crate::r#type::Type;

pub enum Payload {
    Unit,
    Bool(bool),
    Int(isize),
    Float(f64),
    Str(Box<str>),
    Tuple(Box<[ORef]>),
    List(RefCell<Vec<ORef>>),
    Dict(RefCell<Vec<(ORef, ORef)>>)
}

pub struct Object {
    r#type: Gc<Type>,
    payload: Payload
}

impl Object {
    pub fn new(r#type: Gc<Type>, payload: Payload) -> Self { Self {r#type, payload} }

    pub fn r#type(&self) -> Gc<Type> { self.r#type }

    pub fn payload(&self) -> &Payload { &self.payload }
}
