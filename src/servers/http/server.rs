use crate::configs::MLConfig;
use crate::error::MLError;
use axum::Router;
use tokio::net::TcpListener;

pub async fn serve(config: &MLConfig, router: Router) -> Result<(), MLError> {
    let listener = TcpListener::bind(config.listen.as_str()).await?;

    log::info!("listening on {:?}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("shut down");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("could not listen for shutdown signal: {}", err);
    }
}
