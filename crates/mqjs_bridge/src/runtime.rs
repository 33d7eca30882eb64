use std::{
    cell::RefCell,
    collections::VecDeque,
    ops::{Deref, DerefMut},
    rc::Rc,
};

use boa_engine::{
    job::{FutureJob, NativeJob},
    object::builtins::JsFunction,
    Context, JsResult, JsValue,
};
use log::debug;

use crate::{
    config::RuntimeConfig,
    eval::{eval, EvalFlags},
    registry::HostFunctions,
    stdlib::{PrintSink, StdlibApi},
    value::IntoJs,
    Api, Result,
};

/// A 'pollable' job queue
#[derive(Default, Debug)]
struct JobQueue(RefCell<VecDeque<NativeJob>>);

impl JobQueue {
    fn next(&self) -> Option<NativeJob> {
        self.0.borrow_mut().pop_front()
    }

    fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

impl boa_engine::job::JobQueue for JobQueue {
    fn enqueue_promise_job(&self, job: NativeJob, _context: &mut Context) {
        self.0.borrow_mut().push_back(job);
    }

    fn enqueue_future_job(&self, future: FutureJob, context: &mut Context) {
        let job = futures::executor::block_on(future);
        self.enqueue_promise_job(job, context);
    }

    fn run_jobs(&self, context: &mut Context) {
        while let Some(job) = self.next() {
            // Jobs can fail, it is the final result that determines the value
            let _ = job.call(context);
        }
    }
}

/// A context with the bridge installed: host functions dispatch through an
/// owned [`HostFunctions`] registry.
pub struct Runtime {
    context: Context,
    host: Rc<HostFunctions>,
    // There will only ever be 2 references to the `job_queue`.
    // The context's internal reference and the runtime's reference.
    job_queue: Rc<JobQueue>,
}

impl Deref for Runtime {
    type Target = Context;

    fn deref(&self) -> &Self::Target {
        &self.context
    }
}

impl DerefMut for Runtime {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.context
    }
}

impl Runtime {
    pub fn new(config: &RuntimeConfig) -> Result<Self> {
        Self::with_stdlib(config, StdlibApi::default())
    }

    /// Like [`Runtime::new`], sending `print` output to `sink`.
    pub fn with_sink(config: &RuntimeConfig, sink: Rc<dyn PrintSink>) -> Result<Self> {
        Self::with_stdlib(config, StdlibApi::new(sink))
    }

    fn with_stdlib(config: &RuntimeConfig, stdlib: StdlibApi) -> Result<Self> {
        // 1. Initialize job queue
        let job_queue = Rc::new(JobQueue::default());

        // 2. Initialize context with job queue and limits
        let mut context = Context::builder().job_queue(job_queue.clone()).build()?;
        config.apply_limits(&mut context);

        // 3. Install the bridge
        let host = HostFunctions::install(&mut context)?;

        if config.stdlib {
            stdlib.init(&mut context);
        }
        debug!("runtime ready (stdlib: {})", config.stdlib);

        Ok(Self {
            context,
            host,
            job_queue,
        })
    }

    pub fn context(&mut self) -> &mut Context {
        self.deref_mut()
    }

    pub fn host(&self) -> &Rc<HostFunctions> {
        &self.host
    }

    /// Evaluates `source` and returns its completion value.
    pub fn eval(&mut self, source: &str) -> JsResult<JsValue> {
        self.eval_with_flags(source, EvalFlags::RETVAL)
    }

    pub fn eval_with_flags(&mut self, source: &str, flags: EvalFlags) -> JsResult<JsValue> {
        eval(&mut self.context, source, flags)
    }

    /// Exposes `f` to script as the global function `name`.
    pub fn register_fn<F, R>(&mut self, name: &str, length: usize, f: F) -> JsResult<JsFunction>
    where
        F: Fn(&JsValue, &[JsValue], &mut Context) -> JsResult<R> + 'static,
        R: IntoJs,
    {
        self.host.register(&mut self.context, name, length, f)
    }

    /// Runs queued promise jobs to completion
    pub fn run_jobs(&mut self) {
        self.context.run_jobs();
    }

    pub fn has_pending_jobs(&self) -> bool {
        !self.job_queue.is_empty()
    }
}

#[cfg(test)]
mod test {
    use std::cell::RefCell;

    use boa_engine::{js_string, JsArgs};

    use super::*;

    #[derive(Default)]
    struct Lines(RefCell<Vec<String>>);

    impl PrintSink for Lines {
        fn print(&self, line: &str) {
            self.0.borrow_mut().push(line.to_string());
        }
    }

    #[test]
    fn doubles_through_the_bridge() -> JsResult<()> {
        let mut rt = Runtime::new(&RuntimeConfig::default()).unwrap();

        rt.register_fn("double", 1, |_, args, context| {
            Ok(args.get_or_undefined(0).to_i32(context)? * 2)
        })?;

        assert_eq!(rt.eval("double(21)")?, JsValue::from(42));
        Ok(())
    }

    #[test]
    fn promise_jobs_run_on_demand() -> JsResult<()> {
        let lines = Rc::new(Lines::default());
        let mut rt = Runtime::with_sink(&RuntimeConfig::default(), lines.clone()).unwrap();

        rt.eval("Promise.resolve(7).then(v => print('resolved', v)); print('sync')")?;
        assert!(rt.has_pending_jobs());
        assert_eq!(*lines.0.borrow(), vec!["sync".to_string()]);

        rt.run_jobs();
        assert!(!rt.has_pending_jobs());
        assert_eq!(
            *lines.0.borrow(),
            vec!["sync".to_string(), "resolved 7".to_string()]
        );
        Ok(())
    }

    #[test]
    fn stdlib_can_be_disabled() -> JsResult<()> {
        let config = RuntimeConfig {
            stdlib: false,
            ..Default::default()
        };
        let mut rt = Runtime::new(&config).unwrap();

        assert_eq!(rt.eval("typeof print")?, js_string!("undefined").into());
        Ok(())
    }

    #[test]
    fn host_state_is_the_registry() {
        let mut rt = Runtime::new(&RuntimeConfig::default()).unwrap();
        let host = rt.host().clone();

        let registry = crate::opaque::context_opaque_as::<HostFunctions>(rt.context()).unwrap();
        assert!(Rc::ptr_eq(&registry, &host));
    }
}
