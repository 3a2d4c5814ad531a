// src/resolve.rs

//! Resolution of a logical app name and caller arguments into a concrete
//! command line.

use crate::config::WormholeConfig;
use crate::errors::Result;
use crate::translate;

/// A fully resolved command line, ready to launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub executable: String,
    pub args: Vec<String>,
}

/// Resolve `name` against the given snapshot and merge `caller_args`.
///
/// Base arguments from the app spec come first, translated caller
/// arguments are appended after them; neither group is reordered.
/// Resolution is a pure function of the snapshot and its inputs: it has no
/// side effects and launches nothing.
pub fn resolve(
    config: &WormholeConfig,
    name: &str,
    caller_args: &[String],
) -> Result<Invocation> {
    let spec = config.app(name)?;

    let mut args = spec.args.clone();
    args.extend(translate::translate_all(&config.mapping, caller_args));

    Ok(Invocation {
        executable: spec.executable.clone(),
        args,
    })
}
