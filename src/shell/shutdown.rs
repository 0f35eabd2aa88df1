use tokio::select;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Cancels the token on Ctrl-C. Cancelling it from elsewhere ends the wait as well.
pub async fn detect_shutdown(cancelation: CancellationToken) {
    select! {
        result = tokio::signal::ctrl_c() => match result {
            Ok(()) => {
                info!("Received Ctrl-C");
                cancelation.cancel();
            }
            Err(e) => {
                warn!("Can't listen for Ctrl-C {e:?}");
                cancelation.cancelled().await;
            }
        },
        _ = cancelation.cancelled() => (),
    };
}
