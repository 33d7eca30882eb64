use boa_engine::{object::builtins::JsFunction, Context, JsError, JsObject, JsResult, JsString};

pub use boa_engine::value::*;

pub fn undefined() -> JsValue {
    JsValue::undefined()
}

pub fn null() -> JsValue {
    JsValue::null()
}

pub fn js_true() -> JsValue {
    JsValue::from(true)
}

pub fn js_false() -> JsValue {
    JsValue::from(false)
}

/// The exception completion: the engine unwinds with `value` as the thrown
/// value.
pub fn exception<T>(value: JsValue) -> JsResult<T> {
    Err(JsError::from_opaque(value))
}

pub trait IntoJs {
    /// This function converts a Rust value into a JavaScript value.
    fn into_js(self, context: &mut Context) -> JsValue;
}

#[macro_export]
macro_rules! impl_into_js_from_into {
    ($($T: ty), *) => {
        $(
            impl IntoJs for $T {
                #[inline]
                fn into_js(self, _context: &mut Context) -> JsValue {
                    self.into()
                }
            }
        )*
    };
}

impl_into_js_from_into!(
    JsValue, JsFunction, JsObject, JsString, (), bool, f64, i32, u32, i64, u64
);

impl IntoJs for String {
    fn into_js(self, _context: &mut Context) -> JsValue {
        JsString::from(self).into()
    }
}

impl IntoJs for &str {
    fn into_js(self, _context: &mut Context) -> JsValue {
        JsString::from(self).into()
    }
}

impl<T> IntoJs for Option<T>
where
    T: IntoJs,
{
    fn into_js(self, context: &mut Context) -> JsValue {
        match self {
            Some(value) => value.into_js(context),
            None => JsValue::null(),
        }
    }
}
