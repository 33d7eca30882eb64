use std::path::PathBuf;

use clap::Parser;
use log::{debug, error};
use mqjs_bridge::{Runtime, RuntimeConfig};

mod term;
mod run;

#[derive(Debug, Parser)]
#[command(name = "mqjs", version, about = "Run scripts on the mqjs native call bridge")]
struct Cli {
    /// JSON config file; `MQJS_*` environment variables override it.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Evaluate EXPR after the files and print its result.
    #[arg(short, long, value_name = "EXPR")]
    eval: Option<String>,
    /// Parse EXPR as JSON instead of script.
    #[arg(long, requires = "eval")]
    json: bool,
    /// Scripts to run, in order.
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,
}

fn exec(cli: Cli) -> anyhow::Result<()> {
    let config = RuntimeConfig::load(cli.config.as_deref())
        .map_err(|err| anyhow::anyhow!("invalid config: {err}"))?;
    debug!("config: {config:?}");

    let mut runtime =
        Runtime::new(&config).map_err(|err| anyhow::anyhow!("failed to start: {err}"))?;

    for file in &cli.files {
        run::exec_file(&mut runtime, file)?;
    }

    if let Some(expr) = &cli.eval {
        if let Some(output) = run::exec_expr(&mut runtime, expr, cli.json)? {
            println!("{output}");
        }
    }

    Ok(())
}

fn main() {
    term::init_logger();

    let cli = Cli::parse();
    if let Err(err) = exec(cli) {
        error!("{err:#}");
        std::process::exit(1);
    }
}
