use bitflags::bitflags;
use boa_engine::{Context, JsNativeError, JsResult, JsValue, Source};
use log::trace;

bitflags! {
    /// Evaluation mode flags.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct EvalFlags: u32 {
        /// Return the completion value of the script.
        const RETVAL = 1 << 0;
        /// Evaluate as one step of a read-eval-print loop.
        const REPL = 1 << 1;
        /// Drop column numbers from debug information.
        const STRIP_COL = 1 << 2;
        /// Parse the source as JSON instead of script.
        const JSON = 1 << 3;
    }
}

pub fn eval_flag_retval() -> i32 {
    EvalFlags::RETVAL.bits() as i32
}

pub fn eval_flag_repl() -> i32 {
    EvalFlags::REPL.bits() as i32
}

pub fn eval_flag_strip_col() -> i32 {
    EvalFlags::STRIP_COL.bits() as i32
}

pub fn eval_flag_json() -> i32 {
    EvalFlags::JSON.bits() as i32
}

/// Evaluates `source` in `context` according to `flags`.
///
/// `REPL` and `STRIP_COL` are accepted for compatibility: bindings already
/// persist across evaluations of one context, and the engine keeps no column
/// tables to strip.
pub fn eval(context: &mut Context, source: &str, flags: EvalFlags) -> JsResult<JsValue> {
    trace!("eval {} bytes with {flags:?}", source.len());

    if flags.contains(EvalFlags::JSON) {
        let json: serde_json::Value = serde_json::from_str(source).map_err(|err| {
            JsNativeError::syntax().with_message(format!("invalid JSON: {err}"))
        })?;
        return JsValue::from_json(&json, context);
    }

    let value = context.eval(Source::from_bytes(source))?;
    if flags.contains(EvalFlags::RETVAL) {
        Ok(value)
    } else {
        Ok(JsValue::undefined())
    }
}
