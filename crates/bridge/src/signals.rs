//! Shutdown signal handling.

/// Waits for the process to be asked to stop.
///
/// # Returns
///
/// The name of the signal that arrived: `"SIGINT"` or `"SIGTERM"` on Unix,
/// `"Ctrl+C"` elsewhere.
///
/// # Errors
///
/// Fails if a signal listener cannot be installed.
pub async fn wait_for_shutdown() -> anyhow::Result<&'static str> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate = signal(SignalKind::terminate())?;
        return tokio::select! {
            interrupted = tokio::signal::ctrl_c() => {
                interrupted?;
                Ok("SIGINT")
            }
            _ = terminate.recv() => Ok("SIGTERM"),
        };
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        return Ok("Ctrl+C");
    }
}
