use tracing_subscriber::EnvFilter;

/// Environment variable overriding the log filter, e.g. `MODELWATCH_LOG=debug`
const LOG_ENV: &str = "MODELWATCH_LOG";

fn default_filter(debug: bool, quiet: bool) -> &'static str {
    if debug {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    }
}

/// Log to stderr so stdout stays clean for diff and JSON output
pub(crate) fn init(debug: bool, quiet: bool) {
    let default_level = default_filter(debug, quiet);
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV)
                .or_else(|_| EnvFilter::try_new(default_level))
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
