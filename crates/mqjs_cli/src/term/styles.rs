use std::fmt::{self, Display};

use console::{style, StyledObject};

pub struct ErrorPrefix;

impl Display for ErrorPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", style(" ERROR ").on_red().white())
    }
}

pub struct WarningPrefix;

impl Display for WarningPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", style(" WARNING ").black().on_yellow())
    }
}

/// Module path of a diagnostic record, e.g. `mqjs_bridge::dispatch`.
pub fn target<D>(msg: D) -> StyledObject<D> {
    style(msg).dim()
}
