use tracing_subscriber::EnvFilter;

/// Initialize tracing on stderr.
///
/// Quiet unless `--debug` is given, which traces arrivals, navigation and
/// decode failures. `RUST_LOG` overrides both.
pub fn init_tracing(debug: bool) {
    let default = if debug { "hotfolder=debug,warn" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
