use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

use crate::error::CliError;

/// Install the global subscriber. `log` records from the library are
/// bridged into it.
///
/// Log level is set from, in order of preference:
/// 1. `-d` / `-dd` on the command line
/// 2. RUST_LOG environment variable
/// 3. Level::Info
pub fn init(debug: u8) -> Result<(), CliError> {
    let mut env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    for noisy in ["hyper=info", "hyper_util=info", "rustls=warn", "reqwest=info"] {
        let directive = noisy
            .parse()
            .map_err(|e| CliError::Logging(format!("{noisy}: {e}")))?;
        env_filter = env_filter.add_directive(directive);
    }
    if debug != 0 {
        env_filter = env_filter.add_directive(
            match debug {
                1 => LevelFilter::DEBUG,
                _ => LevelFilter::TRACE,
            }
            .into(),
        );
    }

    #[cfg(feature = "logs-json")]
    let layer = fmt::Layer::default().json().with_writer(std::io::stderr);
    #[cfg(not(feature = "logs-json"))]
    let layer = fmt::Layer::default().compact().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(layer)
        .with(env_filter)
        .try_init()
        .map_err(|e| CliError::Logging(e.to_string()))
}
