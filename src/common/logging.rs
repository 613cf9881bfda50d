use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber.
///
/// Every run is logged to a daily file under `log_dir`; `--verbose` adds a
/// stderr layer. `DEVSWEEP_LOG` overrides the filter. The returned guard must
/// live until the process exits or buffered file lines are lost.
pub fn init(verbose: bool, log_dir: &Path) -> Option<WorkerGuard> {
    let default_filter = if verbose { "devsweep=debug" } else { "devsweep=info" };
    let filter = EnvFilter::try_from_env("DEVSWEEP_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let stderr_layer = verbose.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
    });

    // A read-only or missing home only loses the file log
    let (file_layer, guard) = match open_log_file(log_dir) {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init();

    guard
}

fn open_log_file(log_dir: &Path) -> Option<RollingFileAppender> {
    std::fs::create_dir_all(log_dir).ok()?;
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("devsweep")
        .filename_suffix("log")
        .max_log_files(14)
        .build(log_dir)
        .ok()
}
