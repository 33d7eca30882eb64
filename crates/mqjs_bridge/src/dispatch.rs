//! Dispatch callback registration.
//!
//! Every minted native function funnels into a single dispatch target. The
//! target is either scoped to one context ([`set_context_dispatch_callback`])
//! or shared by the whole process ([`set_dispatch_callback`]); a context-scoped
//! callback wins over the process-wide one for calls made in that context.

use std::{rc::Rc, sync::Arc};

use boa_engine::{Context, JsResult, JsValue};
use log::debug;
use parking_lot::{const_rwlock, RwLock};

use crate::{native::FunctionId, opaque::Opaque, slots::BridgeSlots};

/// The arguments of one script-to-host call.
///
/// `args` and `this` are owned by the engine's call frame and only borrowed for
/// the duration of the dispatch.
#[derive(Debug)]
pub struct NativeCall<'a> {
    pub opaque: Option<Opaque>,
    pub function_id: FunctionId,
    pub this: &'a JsValue,
    pub args: &'a [JsValue],
}

impl NativeCall<'_> {
    pub fn argc(&self) -> usize {
        self.args.len()
    }
}

pub type ContextDispatchFn = dyn Fn(&NativeCall<'_>, &mut Context) -> JsResult<JsValue>;

pub type ProcessDispatchFn =
    dyn Fn(&NativeCall<'_>, &mut Context) -> JsResult<JsValue> + Send + Sync;

static PROCESS_DISPATCH: RwLock<Option<Arc<ProcessDispatchFn>>> = const_rwlock(None);

/// Registers the process-wide dispatch callback. Last write wins.
pub fn set_dispatch_callback<F>(callback: F)
where
    F: Fn(&NativeCall<'_>, &mut Context) -> JsResult<JsValue> + Send + Sync + 'static,
{
    let previous = PROCESS_DISPATCH.write().replace(Arc::new(callback));
    debug!(
        "process dispatch callback {}",
        if previous.is_some() { "replaced" } else { "registered" }
    );
}

pub fn is_dispatch_callback_set() -> bool {
    PROCESS_DISPATCH.read().is_some()
}

/// Registers the dispatch callback of `context`. Last write wins.
pub fn set_context_dispatch_callback<F>(context: &mut Context, callback: F) -> JsResult<()>
where
    F: Fn(&NativeCall<'_>, &mut Context) -> JsResult<JsValue> + 'static,
{
    let previous =
        BridgeSlots::write(context, |slots| slots.dispatch.replace(Rc::new(callback)));
    debug!(
        "context dispatch callback {}",
        if previous.is_some() { "replaced" } else { "registered" }
    );
    Ok(())
}

pub fn is_context_dispatch_callback_set(context: &Context) -> bool {
    BridgeSlots::read(context, |slots| slots.dispatch.is_some()).unwrap_or(false)
}

/// The callback a native call resolves to.
pub(crate) enum DispatchTarget {
    Context(Rc<ContextDispatchFn>),
    Process(Arc<ProcessDispatchFn>),
}

impl DispatchTarget {
    /// Resolves the callback for a call made in `context`. No lock or borrow is
    /// held once this returns.
    pub fn resolve(context: &Context) -> Option<Self> {
        if let Some(callback) = BridgeSlots::read(context, |slots| slots.dispatch.clone())
            .flatten()
        {
            return Some(Self::Context(callback));
        }

        PROCESS_DISPATCH.read().clone().map(Self::Process)
    }

    pub fn dispatch(&self, call: &NativeCall<'_>, context: &mut Context) -> JsResult<JsValue> {
        match self {
            Self::Context(callback) => callback(call, context),
            Self::Process(callback) => callback(call, context),
        }
    }
}
