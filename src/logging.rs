use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Level filter for [`init`]. With `debug` the default level is `debug` and `RUST_LOG`
/// may override it; without it the level is forced to `info`.
pub fn filter_for(debug: bool) -> EnvFilter {
    if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        // Ignore `RUST_LOG` so a stray variable in the environment cannot turn on
        // verbose output.
        EnvFilter::new("info")
    }
}

/// Splits a log file path into the directory and file name the appender needs.
/// A bare file name resolves against the working directory.
pub fn file_target(path: &Path) -> Option<(PathBuf, OsString)> {
    let name = path.file_name()?.to_os_string();
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Some((dir, name))
}

/// Initialise logging to stderr, or to `file` when given.
///
/// Only the first call installs a subscriber; later calls are ignored.
pub fn init(debug: bool, file: Option<PathBuf>) {
    let filter = filter_for(debug);

    match file.as_deref().map(|path| (path, file_target(path))) {
        Some((_, Some((dir, name)))) => {
            let appender = tracing_appender::rolling::never(dir, name);
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(appender)
                .try_init();
        }
        unusable => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init();
            if let Some((path, _)) = unusable {
                tracing::warn!(path = %path.display(), "log file path has no file name; logging to stderr");
            }
        }
    }
}
