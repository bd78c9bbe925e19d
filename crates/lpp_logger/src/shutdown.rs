use tokio_util::sync::CancellationToken;

/// Cancel `token` on SIGINT (Ctrl-C) or, on Unix, SIGTERM.
pub fn spawn_signal_handlers(token: CancellationToken) {
    let ctrl_c_token = token.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Received shutdown signal");
                ctrl_c_token.cancel();
            }
            Err(err) => {
                tracing::error!("Error setting up signal handler: {}", err);
            }
        }
    });

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let sigterm_token = token;
        tokio::spawn(async move {
            match signal(SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    sigterm.recv().await;
                    tracing::info!("Received SIGTERM signal");
                    sigterm_token.cancel();
                }
                Err(err) => {
                    tracing::error!("Error setting up SIGTERM handler: {}", err);
                }
            }
        });
    }
}
