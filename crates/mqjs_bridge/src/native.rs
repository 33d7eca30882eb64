use boa_engine::{
    js_string,
    object::{builtins::JsFunction, FunctionObjectBuilder},
    Context, JsError, JsNativeError, JsResult, JsString, JsValue, NativeFunction,
};
use boa_gc::{empty_trace, Finalize, Trace};
use derive_more::{Display, From};
use log::trace;

use crate::dispatch::{DispatchTarget, NativeCall};
use crate::opaque::context_opaque;

pub const CALLBACK_NOT_INITIALIZED: &str = "Native callback not initialized";

/// Host-assigned identifier of one host callable.
///
/// Carried as a typed capture of the minted function, so the value seen at call
/// time is bit-exact the value given at mint time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From)]
pub struct FunctionId(pub i32);

impl FunctionId {
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl Finalize for FunctionId {}

unsafe impl Trace for FunctionId {
    empty_trace!();
}

/// Builds an `InternalError` exception carrying `message`.
pub fn throw_internal_error(context: &mut Context, message: &str) -> JsError {
    let error = JsNativeError::error()
        .with_message(message.to_string())
        .to_opaque(context);
    // The engine has no native `InternalError` kind; the name is what scripts
    // observe through `e.name` and `String(e)`.
    match error.create_data_property_or_throw(
        js_string!("name"),
        js_string!("InternalError"),
        context,
    ) {
        Ok(_) => JsError::from_opaque(error.into()),
        Err(err) => err,
    }
}

/// Entry point of every minted native function.
fn trampoline(
    this: &JsValue,
    args: &[JsValue],
    function_id: &FunctionId,
    context: &mut Context,
) -> JsResult<JsValue> {
    let function_id = *function_id;
    let opaque = context_opaque(context);

    let Some(target) = DispatchTarget::resolve(context) else {
        return Err(throw_internal_error(context, CALLBACK_NOT_INITIALIZED));
    };

    trace!("dispatching native call {function_id} with {} args", args.len());
    let call = NativeCall {
        opaque,
        function_id,
        this,
        args,
    };
    target.dispatch(&call, context)
}

/// Mints a script function that routes every call through the dispatch
/// callback with `function_id`.
///
/// Construction never invokes the callback.
pub fn make_native_function(context: &mut Context, function_id: FunctionId) -> JsFunction {
    make_named_native_function(context, function_id, "", 0)
}

/// Like [`make_native_function`], with a script-visible `name` and `length`.
pub fn make_named_native_function(
    context: &mut Context,
    function_id: FunctionId,
    name: &str,
    length: usize,
) -> JsFunction {
    trace!("minting native function {function_id} `{name}`");
    FunctionObjectBuilder::new(
        context.realm(),
        NativeFunction::from_copy_closure_with_captures(trampoline, function_id),
    )
    .name(JsString::from(name))
    .length(length)
    .constructor(false)
    .build()
}
