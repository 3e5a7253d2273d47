use std::fmt::{self, Debug};
use std::ptr::NonNull;
use pretty::RcDoc;

use crate::r#type::Type;
use crate::object::{Object, Payload};
use crate::mutator::{Mutator, WithinMt};

pub struct Gc<T>(NonNull<T>);

impl<T> Debug for Gc<T> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_tuple("Gc")
            .field(&self.0)
            .finish()
    }
}

impl<T> Clone for Gc<T> {
    fn clone(&self) -> Self { Self(self.0) }
}

impl<T> Copy for Gc<T> {}

// Identity, never structural equality:
impl<T> PartialEq for Gc<T> {
    fn eq(&self, other: &Self) -> bool { self.0 == other.0 }
}

impl<T> Eq for Gc<T> {}

impl<T> Gc<T> {
    pub unsafe fn new_unchecked(ptr: NonNull<T>) -> Self { Self(ptr) }

    /// The pointee lives as long as the `Heap` that allocated it.
    pub unsafe fn as_ref<'a>(self) -> &'a T { &*self.0.as_ptr() }

    pub fn within(self, mt: &Mutator) -> WithinMt<Self> { WithinMt {v: self, mt} }
}

impl Gc<Type> {
    pub fn name(self) -> &'static str { unsafe { self.as_ref() }.name() }
}

/// Handle to a runtime value of any type. Copying an `ORef` neither allocates nor changes the
/// lifetime of the value; equality is object identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ORef(Gc<Object>);

impl From<Gc<Object>> for ORef {
    fn from(obj: Gc<Object>) -> Self { Self(obj) }
}

impl From<ORef> for Gc<Object> {
    fn from(oref: ORef) -> Self { oref.0 }
}

impl ORef {
    pub fn r#type(self) -> Gc<Type> { unsafe { self.0.as_ref() }.r#type() }

    /// `self` must have been allocated by a `Mutator` that is still alive.
    pub unsafe fn as_ref<'a>(self) -> &'a Object { self.0.as_ref() }

    pub fn within(self, mt: &Mutator) -> WithinMt<Self> {
        WithinMt {v: self, mt}
    }

    pub fn to_doc(self, mt: &Mutator) -> RcDoc<()> {
        fn delimited<'a>(open: &'static str, docs: Vec<RcDoc<'a, ()>>, close: &'static str)
            -> RcDoc<'a, ()>
        {
            RcDoc::text(open)
                .append(RcDoc::intersperse(docs, RcDoc::text(",").append(RcDoc::line()))
                    .nest(1))
                .append(RcDoc::text(close))
                .group()
        }

        match mt.get(self).payload() {
            Payload::Tuple(items) if items.len() == 1 =>
                RcDoc::text("(").append(items[0].to_doc(mt)).append(RcDoc::text(",)")),

            Payload::Tuple(items) =>
                delimited("(", items.iter().map(|item| item.to_doc(mt)).collect(), ")"),

            Payload::List(items) =>
                delimited("[", items.borrow().iter().map(|item| item.to_doc(mt)).collect(), "]"),

            Payload::Dict(entries) => {
                let docs = entries.borrow().iter()
                    .map(|(k, v)| k.to_doc(mt).append(RcDoc::text(": ")).append(v.to_doc(mt)))
                    .collect();
                delimited("{", docs, "}")
            },

            _ => RcDoc::as_string(self.within(mt))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins;
    use crate::mutator::Cfg;

    #[test]
    fn identity_not_equality() {
        let mut mt = Mutator::new(Cfg::default());

        let a = builtins::int(&mut mt, 5);
        let b = builtins::int(&mut mt, 5);

        assert_eq!(a, a);
        assert_ne!(a, b);
        assert_eq!(a.r#type(), b.r#type());
    }

    #[test]
    fn short_docs_stay_on_one_line() {
        let mut mt = Mutator::new(Cfg::default());

        let one = builtins::int(&mut mt, 1);
        let s = builtins::str(&mut mt, "a");
        let single = builtins::tuple(&mut mt, &[one]);
        let ls = builtins::list(&mut mt, &[one, s, single]);

        assert_eq!(ls.to_doc(&mt).pretty(80).to_string(), "[1, 'a', (1,)]");
    }

    #[test]
    fn long_docs_break() {
        let mut mt = Mutator::new(Cfg::default());

        let items = (0..4)
            .map(|n| builtins::int(&mut mt, n))
            .collect::<Vec<_>>();
        let ls = builtins::list(&mut mt, &items);

        assert_eq!(ls.to_doc(&mt).pretty(4).to_string(), "[0,\n 1,\n 2,\n 3]");
    }
}
