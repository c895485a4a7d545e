//! Tracing setup shared by the ivr binaries.
//!
//! Events go to stderr through a non-blocking writer so a slow terminal or
//! pipe never stalls a generation run. The filter starts from the level given
//! by the caller and is refined by `RUST_LOG` when it is set.

use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global subscriber.
///
/// The returned guard flushes buffered lines when dropped, so binaries keep it
/// alive for the whole of `main`.
pub fn init(level: &str) -> WorkerGuard {
    let (non_blocking, guard) = tracing_appender::non_blocking(std::io::stderr());
    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking)
                .compact(),
        )
        .init();
    guard
}

fn env_filter(level: &str) -> EnvFilter {
    let default = level.parse::<LevelFilter>().unwrap_or(LevelFilter::INFO);
    EnvFilter::builder()
        .with_default_directive(default.into())
        .from_env_lossy()
}
