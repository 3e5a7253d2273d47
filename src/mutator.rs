use log::debug;

use crate::heap::Heap;
use crate::oref::{Gc, ORef};
use crate::object::{Object, Payload};
use crate::r#type::Type;
use crate::exception::{Exception, ExceptionKind};
use crate::builtins;

#[derive(Debug, Clone, Default)]
pub struct Cfg {
    pub debug: bool
}

pub struct Types {
    pub none_type: Gc<Type>,
    pub bool: Gc<Type>,
    pub int: Gc<Type>,
    pub float: Gc<Type>,
    pub str: Gc<Type>,
    pub tuple: Gc<Type>,
    pub list: Gc<Type>,
    pub dict: Gc<Type>,
    pub object: Gc<Type>
}

/// Well-known identities. Created once in `Mutator::new` and never replaced.
pub struct Singletons {
    pub none: ORef,
    pub r#true: ORef,
    pub r#false: ORef
}

pub struct WithinMt<'a, T> {
    pub v: T,
    pub mt: &'a Mutator
}

pub struct Mutator {
    heap: Heap,
    types: Types,
    singletons: Singletons,
    cfg: Cfg,
    exception: Option<Exception>
}

impl Mutator {
    pub fn new(cfg: Cfg) -> Self {
        let mut heap = Heap::new();

        let types = builtins::types(&mut heap);

        let singletons = Singletons {
            none: heap.alloc(Object::new(types.none_type, Payload::Unit)),
            r#true: heap.alloc(Object::new(types.bool, Payload::Bool(true))),
            r#false: heap.alloc(Object::new(types.bool, Payload::Bool(false)))
        };

        Self {
            heap,
            types,
            singletons,
            cfg,
            exception: None
        }
    }

    pub fn types(&self) -> &Types { &self.types }

    pub fn singletons(&self) -> &Singletons { &self.singletons }

    pub fn cfg(&self) -> &Cfg { &self.cfg }

    pub fn heap(&self) -> &Heap { &self.heap }

    pub fn alloc(&mut self, r#type: Gc<Type>, payload: Payload) -> ORef {
        self.heap.alloc(Object::new(r#type, payload))
    }

    pub fn alloc_type(&mut self, r#type: Type) -> Gc<Type> { self.heap.alloc_type(r#type) }

    /// `v` must have been allocated by `self`.
    pub fn get(&self, v: ORef) -> &Object { unsafe { v.as_ref() } }

    /// Record `kind` as the pending exception, replacing any earlier one.
    pub fn raise(&mut self, kind: ExceptionKind, message: impl Into<String>) {
        let exn = Exception::new(kind, message);
        debug!("raise {}", exn);
        self.exception = Some(exn);
    }

    pub fn exception_occurred(&self) -> Option<&Exception> { self.exception.as_ref() }

    pub fn take_exception(&mut self) -> Option<Exception> { self.exception.take() }
}
