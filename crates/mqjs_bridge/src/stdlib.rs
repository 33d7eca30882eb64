//! Host functions an embedded engine expects from its environment.
//!
//! `print`, `performance.now` and `gc` are provided; the timer and module
//! loading entry points exist but throw, since an embedded context has no
//! event loop or filesystem of its own.

use std::{
    io::{self, Write},
    rc::Rc,
};

use boa_engine::{
    js_string, object::ObjectInitializer, property::Attribute, Context, JsNativeError,
    JsResult, JsString, JsValue, NativeFunction,
};
use boa_gc::{empty_trace, Finalize, Trace};

/// The implementor of this trait controls where `print` output goes.
pub trait PrintSink {
    fn print(&self, line: &str);
}

/// Writes each line to stdout and flushes it.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl PrintSink for StdoutSink {
    fn print(&self, line: &str) {
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{line}");
        let _ = stdout.flush();
    }
}

#[derive(Clone, Finalize)]
struct Sink(Rc<dyn PrintSink>);

unsafe impl Trace for Sink {
    empty_trace!();
}

pub struct StdlibApi {
    sink: Rc<dyn PrintSink>,
}

impl Default for StdlibApi {
    fn default() -> Self {
        Self::new(Rc::new(StdoutSink))
    }
}

impl StdlibApi {
    pub const PERFORMANCE: &'static str = "performance";

    pub fn new(sink: Rc<dyn PrintSink>) -> Self {
        Self { sink }
    }

    fn print(
        _this: &JsValue,
        args: &[JsValue],
        sink: &Sink,
        context: &mut Context,
    ) -> JsResult<JsValue> {
        let mut line = String::new();
        for (i, arg) in args.iter().enumerate() {
            if i != 0 {
                line.push(' ');
            }
            line.push_str(&arg.to_string(context)?.to_std_string_escaped());
        }
        sink.0.print(&line);
        Ok(JsValue::undefined())
    }

    fn now(_this: &JsValue, _args: &[JsValue], _context: &mut Context) -> JsResult<JsValue> {
        let micros = chrono::Utc::now().timestamp_micros();
        Ok(JsValue::from(micros as f64 / 1000.0))
    }

    fn gc(_this: &JsValue, _args: &[JsValue], _context: &mut Context) -> JsResult<JsValue> {
        boa_gc::force_collect();
        Ok(JsValue::undefined())
    }

    fn load(_this: &JsValue, _args: &[JsValue], _context: &mut Context) -> JsResult<JsValue> {
        Err(JsNativeError::reference()
            .with_message("load() not supported")
            .into())
    }

    fn set_timeout(
        _this: &JsValue,
        _args: &[JsValue],
        _context: &mut Context,
    ) -> JsResult<JsValue> {
        Err(JsNativeError::reference()
            .with_message("setTimeout() not supported")
            .into())
    }

    fn clear_timeout(
        _this: &JsValue,
        _args: &[JsValue],
        _context: &mut Context,
    ) -> JsResult<JsValue> {
        Err(JsNativeError::reference()
            .with_message("clearTimeout() not supported")
            .into())
    }

    fn register(context: &mut Context, name: &str, length: usize, function: NativeFunction) {
        context
            .register_global_builtin_callable(JsString::from(name), length, function)
            .unwrap_or_else(|_| panic!("`{name}` should only be registered once"));
    }
}

impl crate::Api for StdlibApi {
    fn init(self, context: &mut Context) {
        Self::register(
            context,
            "print",
            1,
            NativeFunction::from_copy_closure_with_captures(Self::print, Sink(self.sink)),
        );
        Self::register(context, "gc", 0, NativeFunction::from_fn_ptr(Self::gc));
        Self::register(context, "load", 1, NativeFunction::from_fn_ptr(Self::load));
        Self::register(
            context,
            "setTimeout",
            2,
            NativeFunction::from_fn_ptr(Self::set_timeout),
        );
        Self::register(
            context,
            "clearTimeout",
            1,
            NativeFunction::from_fn_ptr(Self::clear_timeout),
        );

        let performance = ObjectInitializer::new(context)
            .function(NativeFunction::from_fn_ptr(Self::now), js_string!("now"), 0)
            .build();
        context
            .register_global_property(
                js_string!(Self::PERFORMANCE),
                performance,
                Attribute::all(),
            )
            .expect("performance api should only be registered once!");
    }
}
