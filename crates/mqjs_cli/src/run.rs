use std::{fs, path::Path};

use anyhow::{anyhow, Context as _, Result};
use boa_engine::{JsError, JsValue};
use log::debug;
use mqjs_bridge::{EvalFlags, Runtime};

fn uncaught(runtime: &mut Runtime, err: JsError) -> anyhow::Error {
    let thrown = err.to_opaque(runtime.context());
    match thrown.to_string(runtime.context()) {
        Ok(text) => anyhow!("Uncaught {}", text.to_std_string_escaped()),
        Err(_) => anyhow!("Uncaught {}", thrown.display()),
    }
}

/// Evaluates the script at `path`, then drains the job queue.
pub fn exec_file(runtime: &mut Runtime, path: &Path) -> Result<()> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read `{}`", path.display()))?;
    debug!("evaluating {}", path.display());

    runtime
        .eval_with_flags(&source, EvalFlags::empty())
        .map_err(|err| uncaught(runtime, err))?;
    runtime.run_jobs();
    Ok(())
}

/// Evaluates `source` and returns its display form, or `None` for `undefined`.
pub fn exec_expr(runtime: &mut Runtime, source: &str, json: bool) -> Result<Option<String>> {
    let flags = if json {
        EvalFlags::JSON
    } else {
        EvalFlags::RETVAL | EvalFlags::REPL
    };

    let value = runtime
        .eval_with_flags(source, flags)
        .map_err(|err| uncaught(runtime, err))?;
    runtime.run_jobs();

    Ok(display(&value))
}

fn display(value: &JsValue) -> Option<String> {
    if value.is_undefined() {
        return None;
    }
    match value.as_string() {
        Some(text) => Some(text.to_std_string_escaped()),
        None => Some(value.display().to_string()),
    }
}
