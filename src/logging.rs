use tracing_subscriber::EnvFilter;

/// All workspace crate targets that should receive log output.
const CRATE_TARGETS: &[&str] = &["hydat", "hydat_calendar", "hydat_grid", "hydat_io"];

/// Initialize tracing for a verbosity level.
///
/// Mapping:
/// - 0 -> warn
/// - 1 -> info (one line per year)
/// - 2 -> debug (per month and per variable)
/// - 3+ -> trace
///
/// `RUST_LOG` overrides the level if set. Calling this more than once, or
/// after another subscriber was installed, is a no-op.
pub fn init(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let default_filter: String = CRATE_TARGETS
        .iter()
        .map(|t| format!("{t}={level}"))
        .collect::<Vec<_>>()
        .join(",");

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
