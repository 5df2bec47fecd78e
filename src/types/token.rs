/// A cancellation token used to signal server shutdown.
///
/// This is a type alias for [`tokio_util::sync::CancellationToken`]. The
/// serve loop cancels it once the listener has stopped so that auxiliary
/// tasks (the signal watcher) exit instead of waiting on a dead handle.
pub type ShutdownToken = tokio_util::sync::CancellationToken;

/// Create a new [`ShutdownToken`].
pub fn create_shutdown_token() -> ShutdownToken {
    tokio_util::sync::CancellationToken::new()
}
