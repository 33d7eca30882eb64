use std::path::Path;

use boa_engine::Context;
use figment::{
    providers::{Env, Format, Json},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::Result;

pub const ENV_PREFIX: &str = "MQJS_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Maximum iterations of a single loop before a `RuntimeLimit` error.
    pub loop_iteration_limit: Option<u64>,
    /// Maximum call depth.
    pub recursion_limit: Option<usize>,
    /// Maximum VM stack size.
    pub stack_size_limit: Option<usize>,
    /// Install `print`, `gc`, `performance` and friends.
    pub stdlib: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            loop_iteration_limit: None,
            recursion_limit: None,
            stack_size_limit: None,
            stdlib: true,
        }
    }
}

impl RuntimeConfig {
    /// Loads the config from an optional JSON file, overridden by `MQJS_*`
    /// environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new();
        if let Some(path) = path {
            figment = figment.merge(Json::file(path));
        }
        let config = figment.merge(Env::prefixed(ENV_PREFIX)).extract()?;
        Ok(config)
    }

    pub(crate) fn apply_limits(&self, context: &mut Context) {
        let limits = context.runtime_limits_mut();
        if let Some(limit) = self.loop_iteration_limit {
            limits.set_loop_iteration_limit(limit);
        }
        if let Some(limit) = self.recursion_limit {
            limits.set_recursion_limit(limit);
        }
        if let Some(limit) = self.stack_size_limit {
            limits.set_stack_size_limit(limit);
        }
    }
}
