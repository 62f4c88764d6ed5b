use std::any::Any;
use std::io;
use std::panic;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Output options for the process-wide subscriber.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogSettings {
    /// Daily-rotated `<dir>/<app>.log`; stdout when unset.
    pub dir: Option<PathBuf>,
    /// Also run the default panic hook (message + backtrace on stderr).
    pub include_backtrace: bool,
}

fn daily_file_writer(app_name: &str, dir: &Path) -> io::Result<(BoxMakeWriter, WorkerGuard)> {
    std::fs::create_dir_all(dir)?;
    let appender = tracing_appender::rolling::daily(dir, format!("{app_name}.log"));
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);
    Ok((BoxMakeWriter::new(non_blocking), guard))
}

/// Install the global subscriber (`RUST_LOG`, default `info`).
///
/// The returned guard flushes the file writer on drop, so the caller keeps it
/// alive until shutdown. Once a subscriber is installed, later calls only
/// build (and return) a writer.
pub fn init_tracing_subscriber(app_name: &str, settings: &LogSettings) -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let file = settings.dir.as_deref().and_then(|dir| {
        daily_file_writer(app_name, dir)
            .map_err(|err| eprintln!("cannot log to {} ({err}); using stdout", dir.display()))
            .ok()
    });

    let (writer, guard) = match file {
        Some((writer, guard)) => (writer, Some(guard)),
        None => (BoxMakeWriter::new(io::stdout), None),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .try_init();

    guard
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

/// Report panics as `error!` events so they reach the log file too.
pub fn install_tracing_panic_hook(app_name: &'static str, include_backtrace: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        let thread = std::thread::current();
        let location = info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()));

        tracing::error!(
            app = app_name,
            thread = thread.name().unwrap_or("unnamed"),
            location = location.as_deref().unwrap_or("unknown"),
            reason = panic_message(info.payload()),
            "thread panicked"
        );

        if include_backtrace {
            default_hook(info);
        }
    }));
}
