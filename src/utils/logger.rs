//! Process-wide logging setup
//!
//! Library code only uses the `log` macros; the binary installs an
//! `env_logger` backend writing `timestamp - module:line LEVEL - message`
//! lines to stderr.

use std::io::Write;

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Installs the global logger
///
/// `verbose` selects debug output; `RUST_LOG` overrides both levels.
/// Calling this more than once keeps the first logger.
pub fn init_global_logger(verbose: bool) {
    let default_level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };

    let _ = Builder::from_env(Env::default().default_filter_or(default_level.as_str()))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {}:{} {} - {}",
                buf.timestamp_millis(),
                record.module_path().unwrap_or("floodkit"),
                record.line().unwrap_or(0),
                record.level(),
                record.args()
            )
        })
        .try_init();
}
