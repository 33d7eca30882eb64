//! The host side of the native call protocol.
//!
//! [`HostFunctions`] owns the Rust closures exposed to script, hands out their
//! [`FunctionId`]s, and serves as both the opaque state and the dispatch
//! callback of the context it is installed into.

use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    rc::Rc,
};

use boa_engine::{
    object::builtins::JsFunction, property::Attribute, Context, JsNativeError, JsResult,
    JsString, JsValue,
};
use log::debug;

use crate::{
    dispatch::{set_context_dispatch_callback, NativeCall},
    native::{make_named_native_function, throw_internal_error, FunctionId},
    opaque::{context_opaque_as, set_context_opaque, Opaque},
    value::IntoJs,
};

pub type HostFn = dyn Fn(&JsValue, &[JsValue], &mut Context) -> JsResult<JsValue>;

#[derive(Default)]
pub struct HostFunctions {
    next_id: Cell<i32>,
    functions: RefCell<HashMap<FunctionId, Rc<HostFn>>>,
}

impl HostFunctions {
    /// Creates a registry and makes it the opaque state and dispatch callback of
    /// `context`.
    ///
    /// The context keeps the registry alive. A registered closure that needs
    /// the registry must reach it through [`HostFunctions::from_context`]:
    /// capturing the returned `Rc` forms a cycle that is never freed.
    pub fn install(context: &mut Context) -> JsResult<Rc<Self>> {
        let registry = Rc::new(Self::default());
        set_context_opaque(context, Opaque::from_rc(registry.clone()))?;
        set_context_dispatch_callback(context, Self::dispatch)?;
        Ok(registry)
    }

    /// The registry installed into `context`, if any.
    pub fn from_context(context: &Context) -> Option<Rc<Self>> {
        context_opaque_as::<Self>(context)
    }

    fn allocate_id(&self) -> JsResult<FunctionId> {
        let id = self.next_id.get();
        let next = id.checked_add(1).ok_or_else(|| {
            JsNativeError::range().with_message("too many native functions")
        })?;
        self.next_id.set(next);
        Ok(FunctionId(id))
    }

    fn insert(&self, f: Rc<HostFn>) -> JsResult<FunctionId> {
        let id = self.allocate_id()?;
        self.functions.borrow_mut().insert(id, f);
        Ok(id)
    }

    /// Stores `f` and mints an anonymous script function for it.
    pub fn define<F, R>(&self, context: &mut Context, f: F) -> JsResult<(FunctionId, JsFunction)>
    where
        F: Fn(&JsValue, &[JsValue], &mut Context) -> JsResult<R> + 'static,
        R: IntoJs,
    {
        self.define_named(context, "", 0, f)
    }

    fn define_named<F, R>(
        &self,
        context: &mut Context,
        name: &str,
        length: usize,
        f: F,
    ) -> JsResult<(FunctionId, JsFunction)>
    where
        F: Fn(&JsValue, &[JsValue], &mut Context) -> JsResult<R> + 'static,
        R: IntoJs,
    {
        let id = self.insert(Rc::new(
            move |this: &JsValue, args: &[JsValue], context: &mut Context| {
                f(this, args, context).map(|result| result.into_js(context))
            },
        ))?;
        let function = make_named_native_function(context, id, name, length);
        Ok((id, function))
    }

    /// Stores `f`, mints a script function for it, and binds it as the global
    /// `name`.
    pub fn register<F, R>(
        &self,
        context: &mut Context,
        name: &str,
        length: usize,
        f: F,
    ) -> JsResult<JsFunction>
    where
        F: Fn(&JsValue, &[JsValue], &mut Context) -> JsResult<R> + 'static,
        R: IntoJs,
    {
        let (id, function) = self.define_named(context, name, length, f)?;
        context.register_global_property(
            JsString::from(name),
            function.clone(),
            Attribute::WRITABLE | Attribute::CONFIGURABLE,
        )?;
        debug!("registered host function `{name}` as {id}");
        Ok(function)
    }

    /// Forgets the closure behind `id`. Functions minted for it stay callable
    /// from script but raise an `InternalError`.
    pub fn remove(&self, id: FunctionId) -> bool {
        self.functions.borrow_mut().remove(&id).is_some()
    }

    pub fn contains(&self, id: FunctionId) -> bool {
        self.functions.borrow().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.functions.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, id: FunctionId) -> Option<Rc<HostFn>> {
        self.functions.borrow().get(&id).cloned()
    }

    /// Dispatch callback serving every function minted by a registry.
    pub fn dispatch(call: &NativeCall<'_>, context: &mut Context) -> JsResult<JsValue> {
        let Some(registry) = call.opaque.as_ref().and_then(Opaque::downcast::<Self>) else {
            return Err(throw_internal_error(
                context,
                "Context opaque is not a host function registry",
            ));
        };

        let Some(f) = registry.lookup(call.function_id) else {
            return Err(throw_internal_error(
                context,
                &format!("Unknown native function id {}", call.function_id),
            ));
        };
        drop(registry);

        f(call.this, call.args, context)
    }
}

#[cfg(test)]
mod test {
    use std::cell::Cell;

    use boa_engine::{js_string, Context, JsArgs, JsNativeError, JsValue, Source};

    use super::*;
    use crate::native::make_native_function;

    fn eval(context: &mut Context, src: &str) -> JsResult<JsValue> {
        context.eval(Source::from_bytes(src))
    }

    #[test]
    fn register_and_call() -> JsResult<()> {
        let context = &mut Context::default();
        let host = HostFunctions::install(context)?;

        host.register(context, "add", 2, |_, args, context| {
            let a = args.get_or_undefined(0).to_number(context)?;
            let b = args.get_or_undefined(1).to_number(context)?;
            Ok(a + b)
        })?;

        assert_eq!(eval(context, "add(40, 2)")?, JsValue::from(42));
        assert_eq!(
            eval(context, "add.name + add.length")?,
            js_string!("add2").into()
        );
        Ok(())
    }

    #[test]
    fn ids_are_sequential() -> JsResult<()> {
        let context = &mut Context::default();
        let host = HostFunctions::install(context)?;

        let (first, _) = host.define(context, |_, _, _| Ok(()))?;
        let (second, _) = host.define(context, |_, _, _| Ok(()))?;

        assert_eq!(first, FunctionId(0));
        assert_eq!(second, FunctionId(1));
        assert_eq!(host.len(), 2);
        Ok(())
    }

    #[test]
    fn closures_keep_state() -> JsResult<()> {
        let context = &mut Context::default();
        let host = HostFunctions::install(context)?;
        let counter = Rc::new(Cell::new(0));
        let seen = counter.clone();

        host.register(context, "tick", 0, move |_, _, _| {
            seen.set(seen.get() + 1);
            Ok(seen.get())
        })?;

        assert_eq!(eval(context, "tick(); tick(); tick()")?, JsValue::from(3));
        assert_eq!(counter.get(), 3);
        Ok(())
    }

    #[test]
    fn closures_may_register_more_functions() -> JsResult<()> {
        let context = &mut Context::default();
        let host = HostFunctions::install(context)?;

        host.register(context, "makeGreeter", 0, |_, _, context| {
            let host = HostFunctions::from_context(context)
                .ok_or_else(|| throw_internal_error(context, "no host functions"))?;
            host.register(context, "greet", 0, |_, _, _| Ok("hello"))
        })?;

        assert_eq!(
            eval(context, "makeGreeter(); greet()")?,
            js_string!("hello").into()
        );
        Ok(())
    }

    #[test]
    fn registry_is_freed_with_its_context() -> JsResult<()> {
        let mut context = Context::default();
        let host = HostFunctions::install(&mut context)?;
        host.register(&mut context, "count", 0, |_, _, context| {
            let host = HostFunctions::from_context(context)
                .ok_or_else(|| throw_internal_error(context, "no host functions"))?;
            Ok(host.len() as i32)
        })?;

        assert_eq!(eval(&mut context, "count()")?, JsValue::from(1));
        assert_eq!(Rc::strong_count(&host), 2);

        drop(context);
        assert_eq!(Rc::strong_count(&host), 1);
        Ok(())
    }

    #[test]
    fn host_errors_propagate() -> JsResult<()> {
        let context = &mut Context::default();
        let host = HostFunctions::install(context)?;

        host.register(context, "fail", 0, |_, _, _| -> JsResult<()> {
            Err(JsNativeError::typ().with_message("bad input").into())
        })?;

        assert_eq!(
            eval(context, "try { fail() } catch (e) { e.name + ': ' + e.message }")?,
            js_string!("TypeError: bad input").into()
        );
        Ok(())
    }

    #[test]
    fn removed_functions_raise_internal_error() -> JsResult<()> {
        let context = &mut Context::default();
        let host = HostFunctions::install(context)?;
        let function = host.register(context, "gone", 0, |_, _, _| Ok(1))?;

        let id = FunctionId(0);
        assert!(host.contains(id));
        assert!(host.remove(id));
        assert!(!host.remove(id));
        assert!(host.is_empty());

        assert_eq!(
            eval(context, "try { gone() } catch (e) { e.name + ': ' + e.message }")?,
            js_string!("InternalError: Unknown native function id 0").into()
        );
        drop(function);
        Ok(())
    }

    #[test]
    fn foreign_ids_are_rejected() -> JsResult<()> {
        let context = &mut Context::default();
        let _host = HostFunctions::install(context)?;
        let stray = make_native_function(context, FunctionId(99));

        let err = stray.call(&JsValue::undefined(), &[], context).unwrap_err();
        let message = err
            .to_opaque(context)
            .as_object()
            .unwrap()
            .get(js_string!("message"), context)?;
        assert_eq!(message, js_string!("Unknown native function id 99").into());
        Ok(())
    }
}
