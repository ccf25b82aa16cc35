use std::io::Write;

use env_logger::Builder;
use serde_json::json;

use crate::config::{LogConfig, LogFormat};

/// Installs the global `env_logger` backend for the `log` facade.
///
/// `LOG_LEVEL` holds env_logger filter directives (`info`, `debug,sqlx=warn`, ...).
/// With [`LogFormat::Json`] every record is written as a single JSON object per line.
pub fn init(config: &LogConfig) {
    let mut builder = Builder::new();
    builder.parse_filters(&config.level);

    if config.format == LogFormat::Json {
        builder.format(|buf, record| {
            let line = json!({
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "level": record.level().as_str(),
                "target": record.target(),
                "message": record.args().to_string(),
            });
            writeln!(buf, "{}", line)
        });
    }

    // A second init (tests, embedding) keeps the first logger.
    if builder.try_init().is_err() {
        log::debug!("logger already initialised");
    }
}
