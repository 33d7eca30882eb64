//! Host state attached to a script context.
//!
//! The bridge stores exactly one [`Opaque`] handle per context and hands it to
//! the dispatch callback on every native call. It never looks inside.

use std::{any::Any, fmt, rc::Rc};

use boa_engine::{Context, JsResult};

use crate::slots::BridgeSlots;

/// A reference-counted, type-erased handle to host state.
#[derive(Clone)]
pub struct Opaque(Rc<dyn Any>);

impl Opaque {
    pub fn new<T: Any>(value: T) -> Self {
        Self(Rc::new(value))
    }

    pub fn from_rc<T: Any>(value: Rc<T>) -> Self {
        Self(value)
    }

    /// Recovers the host's concrete type, or `None` if `T` is not the type the
    /// handle was created with.
    pub fn downcast<T: Any>(&self) -> Option<Rc<T>> {
        self.0.clone().downcast::<T>().ok()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.0.is::<T>()
    }

    pub fn ptr_eq(&self, other: &Opaque) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Opaque")
            .field(&Rc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

/// Stores `opaque` as the host state of `context`, replacing any previous one.
pub fn set_context_opaque(context: &mut Context, opaque: Opaque) -> JsResult<()> {
    BridgeSlots::write(context, |slots| slots.opaque = Some(opaque));
    Ok(())
}

/// Returns the host state last stored with [`set_context_opaque`].
pub fn context_opaque(context: &Context) -> Option<Opaque> {
    BridgeSlots::read(context, |slots| slots.opaque.clone()).flatten()
}

pub fn context_opaque_as<T: Any>(context: &Context) -> Option<Rc<T>> {
    context_opaque(context)?.downcast::<T>()
}
