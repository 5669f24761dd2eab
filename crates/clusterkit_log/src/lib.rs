//! `clusterkit_log` v1:
//! Process-wide logger setup shared by the clusterkit binaries.

use env_logger::Env;
use log::LevelFilter;

/// Resolve the default level used when `RUST_LOG` is unset.
pub fn derive_default_level(if_verbose: bool) -> LevelFilter {
    if if_verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Install `env_logger` honouring `RUST_LOG`, falling back to info (or debug).
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_logging(if_verbose: bool) {
    let default_level = derive_default_level(if_verbose);
    let mut builder =
        env_logger::Builder::from_env(Env::default().default_filter_or(default_level.as_str()));
    builder.format_timestamp_millis();
    let _ = builder.try_init();
}
