//! User-facing progress and error output.

use std::error::Error;
use std::io::Write;

/// Write one line to `stderr`, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}

/// Render an error followed by each of its sources, separated by `: `.
///
/// # Examples
///
/// ```
/// use verification_updater::error::UpdaterError;
/// use verification_updater::output::error_chain;
///
/// let err = UpdaterError::TempHome {
///     source: std::io::Error::other("disk full"),
/// };
/// assert_eq!(
///     error_chain(&err),
///     "failed to create temporary Gradle home: disk full"
/// );
/// ```
#[must_use]
pub fn error_chain(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
