use crate::branding::LOG_FILE_PREFIX;
use crate::context::AppPaths;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "custom_taskbar=info";

/// Sends `log` records to a daily file under the config directory. The
/// returned guard flushes pending lines when dropped, so keep it alive in
/// `main`.
pub fn init(paths: &AppPaths) -> Option<WorkerGuard> {
    let appender = match RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .build(&paths.log_dir)
    {
        Ok(appender) => appender,
        Err(err) => {
            eprintln!("logging disabled: {err}");
            return None;
        }
    };
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    match tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
    {
        Ok(()) => Some(guard),
        Err(err) => {
            eprintln!("logging disabled: {err}");
            None
        }
    }
}
