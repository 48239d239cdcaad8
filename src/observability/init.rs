//! Tracing initialization and subscriber setup.

use super::file_writer::FileWriter;
use crate::infrastructure::paths;
use crate::Config;
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable overriding the configured log filter.
pub const LOG_ENV: &str = "PD_LOG";

/// Filter used when neither `PD_LOG` nor `log_level` is set.
const DEFAULT_LEVEL: &str = "warn";

/// Installs the global subscriber writing to the configured log file.
///
/// # Initialization Behavior
///
/// - Creates the log directory if it doesn't exist
/// - Silently does nothing if no log location can be determined or created
///   (observability is optional)
/// - Idempotent: only the first call takes effect
///
/// # Example
///
/// ```no_run
/// use pd::observability::init_tracing;
/// use pd::Config;
///
/// let config = Config::load(None)?;
/// init_tracing(&config);
///
/// tracing::debug!("tracing is now active");
/// # Ok::<(), pd::PdError>(())
/// ```
pub fn init_tracing(config: &Config) {
    let Some(log_file) = config.log_file.clone().or_else(paths::default_log_file) else {
        return;
    };

    if let Some(parent) = log_file.parent() {
        if std::fs::create_dir_all(parent).is_err() {
            return;
        }
    }

    let filter = resolve_filter(std::env::var(LOG_ENV).ok(), config.log_level.as_deref());

    let layer = fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(Arc::new(FileWriter::new(log_file)));

    let _ = tracing_subscriber::registry().with(filter).with(layer).try_init();
}

/// Builds the filter from the environment value, then the configured level,
/// then the default. Unparsable directives fall through to the next source.
fn resolve_filter(env: Option<String>, configured: Option<&str>) -> EnvFilter {
    env.as_deref()
        .into_iter()
        .chain(configured)
        .filter(|directive| !directive.trim().is_empty())
        .find_map(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LEVEL))
}
