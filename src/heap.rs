use std::ptr::NonNull;

use crate::oref::{Gc, ORef};
use crate::object::Object;
use crate::r#type::Type;

/// Owns every object and type of a `Mutator`. Nothing is freed before the heap itself is
/// dropped, so handles stay valid for the whole lifetime of their runtime.
pub struct Heap {
    objects: Vec<NonNull<Object>>,
    types: Vec<NonNull<Type>>
}

impl Heap {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            types: Vec::new()
        }
    }

    pub fn alloc(&mut self, obj: Object) -> ORef {
        let nptr = NonNull::from(Box::leak(Box::new(obj)));
        self.objects.push(nptr);
        unsafe { Gc::new_unchecked(nptr) }.into()
    }

    pub fn alloc_type(&mut self, r#type: Type) -> Gc<Type> {
        let nptr = NonNull::from(Box::leak(Box::new(r#type)));
        self.types.push(nptr);
        unsafe { Gc::new_unchecked(nptr) }
    }

    pub fn len(&self) -> usize { self.objects.len() }
}

impl Default for Heap {
    fn default() -> Self { Self::new() }
}

impl Drop for Heap {
    fn drop(&mut self) {
        unsafe {
            for obj in self.objects.drain(..) {
                drop(Box::from_raw(obj.as_ptr()));
            }

            for r#type in self.types.drain(..) {
                drop(Box::from_raw(r#type.as_ptr()));
            }
        }
    }
}
