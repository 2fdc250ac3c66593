//! Request handlers and route assembly

use std::convert::Infallible;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use log::warn;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use crate::constants::WS_PATH;
use crate::core::coordinator::SharedCoordinator;
use crate::core::rate_limiter::ConnectionLimiter;

pub mod dispatcher;
pub mod websocket;

// Re-export the websocket handler
pub use websocket::handle_ws_client;

/// Rejection marker for connections denied by the rate limiter
#[derive(Debug)]
struct AdmissionDenied;

impl warp::reject::Reject for AdmissionDenied {}

/// Assemble the full route tree: the socket upgrade behind admission
/// control, plus the health probe
pub fn build_routes(
    coordinator: SharedCoordinator,
    limiter: Arc<ConnectionLimiter>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let ws_route = warp::path(WS_PATH)
        .and(warp::ws())
        .and(warp::addr::remote())
        .and(with_limiter(limiter))
        .and(with_coordinator(coordinator))
        .and_then(admit_and_upgrade);

    let health_route = warp::path("health").map(|| "OK");

    ws_route.or(health_route).recover(handle_rejection)
}

/// Run admission control, then upgrade. A denied address never reaches
/// the registry.
async fn admit_and_upgrade(
    ws: warp::ws::Ws,
    addr: Option<SocketAddr>,
    limiter: Arc<ConnectionLimiter>,
    coordinator: SharedCoordinator,
) -> Result<impl Reply, Rejection> {
    let ip = addr
        .map(|a| a.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));

    if let Err(e) = limiter.admit(ip).await {
        warn!("Connection from {} rejected: {}", ip, e);
        return Err(warp::reject::custom(AdmissionDenied));
    }

    Ok(ws.on_upgrade(move |socket| handle_ws_client(socket, coordinator)))
}

async fn handle_rejection(err: Rejection) -> Result<impl Reply, Rejection> {
    if err.find::<AdmissionDenied>().is_some() {
        Ok(warp::reply::with_status(
            "Too Many Requests",
            StatusCode::TOO_MANY_REQUESTS,
        ))
    } else {
        Err(err)
    }
}

// Helper functions to include shared state in requests
fn with_coordinator(
    coordinator: SharedCoordinator,
) -> impl Filter<Extract = (SharedCoordinator,), Error = Infallible> + Clone {
    warp::any().map(move || coordinator.clone())
}

fn with_limiter(
    limiter: Arc<ConnectionLimiter>,
) -> impl Filter<Extract = (Arc<ConnectionLimiter>,), Error = Infallible> + Clone {
    warp::any().map(move || limiter.clone())
}
