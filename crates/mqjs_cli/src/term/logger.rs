use std::io::{self, Write};

use env_logger::{fmt, Builder, Env};

use crate::term::styles::{self, ErrorPrefix, WarningPrefix};

// Bridge diagnostics (callback registration, dispatch) are emitted at debug
// and trace; they carry their module path so the call site can be told apart.
fn format(fmt: &mut fmt::Formatter, record: &log::Record<'_>) -> io::Result<()> {
    match record.level() {
        log::Level::Error => write!(fmt, "{} ", ErrorPrefix)?,
        log::Level::Warn => write!(fmt, "{} ", WarningPrefix)?,
        log::Level::Info => (),
        log::Level::Debug | log::Level::Trace => {
            write!(fmt, "{} ", styles::target(record.target()))?
        }
    };

    writeln!(fmt, "{}", record.args())
}

pub fn init_logger() {
    let env = Env::default()
        .filter_or("MQJS_LOG", "info")
        .write_style_or("MQJS_LOG_STYLE", "auto");

    Builder::from_env(env).format(format).init();
}
