//! Log level selection and subscriber setup

use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Crates whose output is capped at warn
const NOISY_TARGETS: &[&str] = &[
    "aws_config",
    "aws_sdk_lambda",
    "aws_smithy_runtime",
    "aws_smithy_runtime_api",
    "hyper",
];

/// Parse a level name, accepting the Python logging names as well
pub fn parse_level(name: &str) -> Option<Level> {
    match name.trim().to_ascii_uppercase().as_str() {
        "CRITICAL" | "FATAL" | "ERROR" => Some(Level::ERROR),
        "WARNING" | "WARN" => Some(Level::WARN),
        "INFO" => Some(Level::INFO),
        "DEBUG" => Some(Level::DEBUG),
        "NOTSET" | "TRACE" => Some(Level::TRACE),
        _ => None,
    }
}

/// Pick the level from an explicit name, then `verbose`, then info
pub fn resolve_level(name: Option<&str>, verbose: bool) -> Result<Level, String> {
    match name {
        Some(name) => parse_level(name).ok_or_else(|| format!("Unknown logging level: {}", name)),
        None if verbose => Ok(Level::DEBUG),
        None => Ok(Level::INFO),
    }
}

/// Filter directives for `level`, with SDK internals never louder than warn
pub fn directives(level: Level) -> String {
    let capped = level.min(Level::WARN);
    let mut directives = vec![level.to_string().to_lowercase()];
    directives.extend(
        NOISY_TARGETS
            .iter()
            .map(|target| format!("{}={}", target, capped.to_string().to_lowercase())),
    );
    directives.join(",")
}

/// Install the global subscriber. `RUST_LOG` wins when set.
pub fn init(level: Level) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| directives(level).into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
