use tokio_util::sync::CancellationToken;

#[cfg(target_family = "unix")]
async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate()).unwrap();

    tokio::select! {
        _ = tokio::signal::ctrl_c() => (),
        _ = sigterm.recv() => (),
    }
}

#[cfg(not(target_family = "unix"))]
async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

/// Token that fires once the process receives SIGINT or SIGTERM
///
/// The watch loop owns its teardown through this token instead of relying on
/// process exit to stop the polling task.
#[must_use]
pub fn shutdown() -> CancellationToken {
    let token = CancellationToken::new();

    {
        let token = token.clone();

        tokio::spawn(async move {
            shutdown_signal().await;
            token.cancel();
        });
    }

    token
}
