use log::{error, info};
use service::{config::Config, logging::Logger};

#[tokio::main]
async fn main() {
    let config = Config::new();
    Logger::init_logger(&config);

    let listen_addr = format!("{}:{}", config.interface(), config.port);

    let app_state = service::AppState::new(config);
    let router = web::router::define_routes(app_state);

    info!("Starting SSE streaming server on http://{listen_addr}");

    let listener = match tokio::net::TcpListener::bind(&listen_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {listen_addr}: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Resolves on Ctrl+C so in-flight SSE connections get a clean close
/// instead of a reset.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to install Ctrl+C handler: {e}");
        return;
    }
    info!("Shutdown signal received, closing open streams");
}
