//! Axum HTTP server for the gateway.

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::routes::create_router;
use crate::state::AppState;

/// Run the gateway with a pre-bound listener until the cancellation token
/// fires.
///
/// # Errors
///
/// Returns an error if the server fails to start or crashes while serving.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    let app = create_router(state);

    info!("chatgate listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await?;

    info!("chatgate shut down");
    Ok(())
}
