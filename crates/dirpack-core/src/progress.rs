//! Progress notifications for archiving operations.
//!
//! The archiver reports what it is doing as short human-readable messages
//! through a [`ProgressSink`]. The sink is a one-way channel: it cannot
//! influence the operation, and its own failures are not the archiver's
//! concern.

/// Priority of a progress message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Operation start and completion.
    Normal,
    /// Per-file notifications and archive creation details.
    Verbose,
}

/// Receiver of progress messages.
///
/// Any `FnMut(&str, Verbosity)` closure is a sink; error messages are then
/// delivered with [`Verbosity::Normal`].
///
/// # Examples
///
/// ```
/// use dirpack_core::ProgressSink;
/// use dirpack_core::Verbosity;
///
/// let mut lines = Vec::new();
/// {
///     let mut sink = |message: &str, level: Verbosity| {
///         if level == Verbosity::Normal {
///             lines.push(message.to_string());
///         }
///     };
///     sink.write("started", Verbosity::Normal);
///     sink.write("adding a.txt", Verbosity::Verbose);
/// }
/// assert_eq!(lines, vec!["started"]);
/// ```
pub trait ProgressSink {
    /// Receives a status message.
    fn write(&mut self, message: &str, verbosity: Verbosity);

    /// Receives an error message. Called once per failure, before the error
    /// is returned to the caller.
    fn write_error(&mut self, message: &str) {
        self.write(message, Verbosity::Normal);
    }
}

impl<F> ProgressSink for F
where
    F: FnMut(&str, Verbosity),
{
    fn write(&mut self, message: &str, verbosity: Verbosity) {
        self(message, verbosity);
    }
}

/// Sink that discards every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl ProgressSink for NoopSink {
    fn write(&mut self, _message: &str, _verbosity: Verbosity) {}

    fn write_error(&mut self, _message: &str) {}
}

/// Sink that forwards messages to `tracing` events.
///
/// Normal messages become `info` events, verbose ones `debug`, errors
/// `error`.
#[cfg(feature = "tracing")]
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

#[cfg(feature = "tracing")]
impl ProgressSink for TracingSink {
    fn write(&mut self, message: &str, verbosity: Verbosity) {
        match verbosity {
            Verbosity::Normal => tracing::info!(target: "dirpack", "{message}"),
            Verbosity::Verbose => tracing::debug!(target: "dirpack", "{message}"),
        }
    }

    fn write_error(&mut self, message: &str) {
        tracing::error!(target: "dirpack", "{message}");
    }
}
