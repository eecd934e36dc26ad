use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let cold_start = std::env::var("COLD_START_REQUESTS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, cold_start, "mock backend listening");
    mock_server::run_with_cold_start(listener, cold_start).await
}
