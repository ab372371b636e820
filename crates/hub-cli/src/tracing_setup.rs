use tracing_subscriber::{EnvFilter, fmt};

/// Install a stderr subscriber if none is set yet. Honors RUST_LOG; otherwise
/// the level follows `-v` (warn, info, debug).
/// Returns true if a subscriber was installed by this call.
pub fn init_tracing_once(verbosity: u8) -> bool {
    let default = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .without_time()
        .try_init()
        .is_ok()
}
