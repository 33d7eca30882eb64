use std::rc::Rc;

use boa_engine::{Context, JsData};
use boa_gc::{empty_trace, Finalize, Trace};

use crate::{dispatch::ContextDispatchFn, opaque::Opaque};

/// Per-context storage owned by the bridge.
///
/// Kept in the context's host-defined data, so it is shared by every realm the
/// context enters and is never visible to script.
#[derive(Default, Finalize, JsData)]
pub(crate) struct BridgeSlots {
    pub opaque: Option<Opaque>,
    pub dispatch: Option<Rc<ContextDispatchFn>>,
}

// Neither slot holds garbage-collected values.
unsafe impl Trace for BridgeSlots {
    empty_trace!();
}

impl BridgeSlots {
    /// Reads the slots of `context`, or returns `None` if nothing was ever
    /// stored in them.
    pub fn read<F, R>(context: &Context, f: F) -> Option<R>
    where
        F: FnOnce(&BridgeSlots) -> R,
    {
        context.get_data::<Self>().map(f)
    }

    /// Mutates the slots of `context`, creating them on first use.
    pub fn write<F, R>(context: &mut Context, f: F) -> R
    where
        F: FnOnce(&mut BridgeSlots) -> R,
    {
        let mut slots = context
            .remove_data::<Self>()
            .map(|slots| *slots)
            .unwrap_or_default();
        let result = f(&mut slots);
        context.insert_data(slots);
        result
    }
}

#[cfg(test)]
mod test {
    use boa_engine::{Context, Source};

    use super::*;

    #[test]
    fn slots_are_created_on_first_write() {
        let context = &mut Context::default();
        assert!(BridgeSlots::read(context, |_| ()).is_none());

        BridgeSlots::write(context, |slots| slots.opaque = Some(Opaque::new(1u8)));

        assert_eq!(BridgeSlots::read(context, |slots| slots.opaque.is_some()), Some(true));
    }

    #[test]
    fn slots_are_shared_across_realms() {
        let context = &mut Context::default();
        BridgeSlots::write(context, |slots| slots.opaque = Some(Opaque::new(7u32)));

        let realm = context.create_realm().unwrap();
        let previous = context.enter_realm(realm);
        assert_eq!(BridgeSlots::read(context, |slots| slots.opaque.is_some()), Some(true));

        context.enter_realm(previous);
        assert_eq!(BridgeSlots::read(context, |slots| slots.opaque.is_some()), Some(true));
    }

    #[test]
    fn slots_are_invisible_to_script() {
        let context = &mut Context::default();
        BridgeSlots::write(context, |slots| slots.opaque = Some(Opaque::new(())));

        let names = context
            .eval(Source::from_bytes(
                "Object.getOwnPropertyNames(globalThis).filter(n => n.includes('MQJS')).length",
            ))
            .unwrap();
        assert_eq!(names, 0.into());
    }
}
