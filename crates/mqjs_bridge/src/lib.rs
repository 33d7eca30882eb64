pub mod config;
pub mod dispatch;
pub mod error;
pub mod eval;
pub mod native;
pub mod opaque;
pub mod registry;
pub mod runtime;
mod slots;
pub mod stdlib;
pub mod value;

use boa_engine::Context;
pub use error::{Error, Result};

/// A generic runtime API
pub trait Api {
    /// Initialize a runtime API
    fn init(self, context: &mut Context);
}

pub use config::RuntimeConfig;
pub use dispatch::{set_context_dispatch_callback, set_dispatch_callback, NativeCall};
pub use eval::EvalFlags;
pub use native::{make_native_function, make_named_native_function, FunctionId};
pub use opaque::{context_opaque, context_opaque_as, set_context_opaque, Opaque};
pub use registry::HostFunctions;
pub use runtime::Runtime;
pub use stdlib::{PrintSink, StdlibApi};
