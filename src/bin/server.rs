use std::sync::Arc;

use log::{error, info, warn};

use gridmatch::config::ServerConfig;
use gridmatch::core::coordinator::create_coordinator;
use gridmatch::core::rate_limiter::ConnectionLimiter;
use gridmatch::handlers::build_routes;

#[tokio::main]
async fn main() {
    // Initialize env
    match dotenvy::dotenv() {
        Ok(_) => info!("Environment variables loaded from .env file"),
        Err(e) => warn!("Failed to load .env file: {}", e),
    };

    // Initialize logging
    env_logger::init();

    // Load config from the environment
    let config = ServerConfig::from_env();

    info!(
        "Configuration: host={}, port={}, production={}",
        config.host, config.port, config.production_mode
    );

    let addr = match config.socket_addr() {
        Ok(addr) => addr,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    // Create the shared coordinator and the admission limiter
    let coordinator = create_coordinator(config.search_timeout());
    let limiter = Arc::new(ConnectionLimiter::new(
        config.rate_limit_burst,
        config.rate_limit_window,
    ));
    limiter.clone().start_cleanup_task();

    let routes = build_routes(coordinator, limiter);

    // Start the server
    info!("Starting gridmatch server on {}", addr);

    warp::serve(routes).run(addr).await;
}
