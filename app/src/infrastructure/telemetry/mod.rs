mod config;

pub use self::config::*;

use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{Layer, Registry};

/// `directives` plus whatever the `env` variable holds, over `max_level`.
fn filter(max_level: LoggingLevel, directives: &str, env: &str) -> EnvFilter {
    let mut directives = directives.to_owned();
    if let Ok(extra) = std::env::var(env) {
        directives.push(',');
        directives.push_str(&extra);
    }
    EnvFilter::builder()
        .with_default_directive(max_level.into())
        .parse_lossy(directives)
}

pub fn init_telemetry(config: &TelemetryConfig) -> anyhow::Result<()> {
    if !config.enable {
        return Ok(());
    }
    let global = filter(
        config.max_level,
        &config.level_filter,
        &config.level_filter_env,
    );

    let console = config.console.enable.then(|| {
        let config = &config.console;
        let debug = config.enable_debug_logging;
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_file(debug)
            .with_line_number(debug)
            .with_thread_ids(debug)
            .with_target(debug)
            .with_filter(filter(
                config.max_level,
                &config.level_filter,
                &config.level_filter_env,
            ))
    });

    let file = config.file.enable.then(|| {
        let config = &config.file;
        let debug = config.enable_debug_logging;
        let appender =
            RollingFileAppender::new(config.rolling_time.into(), &config.path, &config.prefix);
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(appender)
            .with_file(debug)
            .with_line_number(debug)
            .with_thread_ids(debug)
            .with_target(debug)
            .with_filter(filter(
                config.max_level,
                &config.level_filter,
                &config.level_filter_env,
            ))
    });

    Registry::default()
        .with(global)
        .with(console)
        .with(file)
        .try_init()?;
    Ok(())
}
