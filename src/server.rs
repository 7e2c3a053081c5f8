//! HTTP API server for redirect tracing.
//!
//! Provides two endpoints:
//! - `POST /api/check-redirects` - trace the redirect chain of a URL
//! - `GET /status` - JSON counters with uptime and per-type error breakdown
//!
//! CORS is fully permissive so browser-based consumers on any origin can call
//! the API directly.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::rejection::JsonRejection,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};

use crate::error_handling::{ErrorType, InfoType, TraceStats, WarningType};
use crate::models::TraceRequest;
use crate::trace::RedirectTracer;

/// Shared state for the API server.
#[derive(Clone)]
pub struct AppState {
    /// Tracer shared by all requests; clones reuse one connection pool.
    pub tracer: RedirectTracer,
    /// Statistics tracker behind the `/status` breakdowns.
    pub stats: Arc<TraceStats>,
    /// Traces accepted (valid request body, trace attempted).
    pub total_traces: Arc<AtomicUsize>,
    /// Traces that reached a 2xx terminal response.
    pub successful_traces: Arc<AtomicUsize>,
    /// Traces rejected or finished without a 2xx terminal response.
    pub failed_traces: Arc<AtomicUsize>,
    /// Server start time, for uptime reporting.
    pub start_time: Arc<Instant>,
}

impl AppState {
    /// Creates fresh server state around a tracer.
    pub fn new(tracer: RedirectTracer) -> Self {
        AppState {
            stats: Arc::clone(tracer.stats()),
            tracer,
            total_traces: Arc::new(AtomicUsize::new(0)),
            successful_traces: Arc::new(AtomicUsize::new(0)),
            failed_traces: Arc::new(AtomicUsize::new(0)),
            start_time: Arc::new(Instant::now()),
        }
    }
}

/// JSON body for non-2xx responses.
#[derive(Serialize)]
struct ApiError {
    error: String,
}

/// JSON response for the `/status` endpoint.
#[derive(Serialize)]
pub struct StatusResponse {
    /// Traces accepted since startup.
    pub total_traces: usize,
    /// Traces that ended at a 2xx terminal response.
    pub successful_traces: usize,
    /// Traces rejected or ended without a 2xx terminal response.
    pub failed_traces: usize,
    /// Seconds since the server started.
    pub uptime_seconds: f64,
    /// Traces served per minute since startup.
    pub rate_per_minute: f64,
    /// Error counters, grouped by kind.
    pub errors: ErrorCounts,
    /// Warning counters.
    pub warnings: WarningCounts,
    /// Informational counters.
    pub info: InfoCounts,
}

/// Error counters reported by `/status`.
#[derive(Serialize)]
pub struct ErrorCounts {
    /// Sum of all error counters.
    pub total: usize,
    /// Inputs rejected before any request was sent.
    pub invalid_url: usize,
    /// Traces cut off because the chain revisited a URL.
    pub redirect_loop: usize,
    /// Traces cut off at the hop limit.
    pub hop_limit_exceeded: usize,
    /// Hops that hit the per-hop timeout.
    pub timeout: usize,
    /// Hops that failed to connect.
    pub connection_error: usize,
    /// Remaining transport failures (request building, body, decode, other).
    pub other_transport: usize,
}

/// Warning counters reported by `/status`.
#[derive(Serialize)]
pub struct WarningCounts {
    /// Sum of all warning counters.
    pub total: usize,
    /// Redirect statuses that carried no Location header.
    pub redirect_without_location: usize,
    /// Captured header values dropped for not being UTF-8.
    pub non_utf8_header: usize,
}

/// Informational counters reported by `/status`.
#[derive(Serialize)]
pub struct InfoCounts {
    /// Sum of all info counters.
    pub total: usize,
    /// Redirect hops followed to the next URL.
    pub redirects_followed: usize,
    /// Hops that upgraded from http to https.
    pub https_upgrades: usize,
    /// Relative Location values resolved against their hop URL.
    pub relative_locations_resolved: usize,
}

/// Builds the API router.
///
/// Kept separate from [`start_api_server`] so tests can serve the same router
/// on an ephemeral listener.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/check-redirects", post(check_redirects_handler))
        .route("/status", get(status_handler))
        .with_state(state)
        .layer(cors)
}

/// Creates and starts the API server, running until a shutdown signal.
pub async fn start_api_server(
    listen: &str,
    port: u16,
    state: AppState,
) -> Result<(), anyhow::Error> {
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(format!("{listen}:{port}"))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind API server to {listen}:{port}: {e}"))?;

    log::info!("API server listening on http://{listen}:{port}/");
    log::info!("  - Trace: POST http://{listen}:{port}/api/check-redirects");
    log::info!("  - Status: http://{listen}:{port}/status");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("API server error: {e}"))?;

    Ok(())
}

/// Waits for Ctrl+C.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => log::info!("Shutdown signal received"),
        Err(e) => {
            // Without a signal handler there is no shutdown to wait for
            log::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    }
}

/// Trace endpoint: binds the JSON body, runs the trace, returns the result.
///
/// Malformed bodies and invalid URLs answer 400 with an `error` body; soft
/// trace failures (loops, hop limits, transport errors) still answer 200 with
/// the partial chain and an `error` field inside the result.
async fn check_redirects_handler(
    State(state): State<AppState>,
    payload: Result<Json<TraceRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(request)) = payload else {
        return error_response(StatusCode::BAD_REQUEST, "Invalid request format");
    };

    state.total_traces.fetch_add(1, Ordering::SeqCst);

    match state.tracer.trace(&request.url).await {
        Ok(result) => {
            if result.success {
                state.successful_traces.fetch_add(1, Ordering::SeqCst);
            } else {
                state.failed_traces.fetch_add(1, Ordering::SeqCst);
            }
            log::info!(
                "Traced {} -> {} ({} steps, success: {}) in {}",
                request.url,
                result.final_url,
                result.total_steps,
                result.success,
                result.total_duration
            );
            (StatusCode::OK, Json(result)).into_response()
        }
        Err(e) => {
            state.failed_traces.fetch_add(1, Ordering::SeqCst);
            log::warn!("Rejected trace request for {}: {e}", request.url);
            error_response(StatusCode::BAD_REQUEST, &e.to_string())
        }
    }
}

/// JSON status endpoint with counters and uptime.
async fn status_handler(State(state): State<AppState>) -> Response {
    let total = state.total_traces.load(Ordering::SeqCst);
    let successful = state.successful_traces.load(Ordering::SeqCst);
    let failed = state.failed_traces.load(Ordering::SeqCst);
    let uptime = state.start_time.elapsed().as_secs_f64();
    let rate = if uptime > 0.0 {
        total as f64 / (uptime / 60.0)
    } else {
        0.0
    };

    let stats = &state.stats;
    let response = StatusResponse {
        total_traces: total,
        successful_traces: successful,
        failed_traces: failed,
        uptime_seconds: uptime,
        rate_per_minute: rate,
        errors: ErrorCounts {
            total: stats.total_errors(),
            invalid_url: stats.get_error_count(ErrorType::InvalidUrlError),
            redirect_loop: stats.get_error_count(ErrorType::RedirectLoopError),
            hop_limit_exceeded: stats.get_error_count(ErrorType::HopLimitExceededError),
            timeout: stats.get_error_count(ErrorType::HttpRequestTimeoutError),
            connection_error: stats.get_error_count(ErrorType::HttpRequestConnectError),
            other_transport: stats.get_error_count(ErrorType::HttpRequestBuilderError)
                + stats.get_error_count(ErrorType::HttpRequestRequestError)
                + stats.get_error_count(ErrorType::HttpRequestBodyError)
                + stats.get_error_count(ErrorType::HttpRequestDecodeError)
                + stats.get_error_count(ErrorType::HttpRequestOtherError),
        },
        warnings: WarningCounts {
            total: stats.total_warnings(),
            redirect_without_location: stats
                .get_warning_count(WarningType::RedirectWithoutLocation),
            non_utf8_header: stats.get_warning_count(WarningType::NonUtf8HeaderValue),
        },
        info: InfoCounts {
            total: stats.total_info(),
            redirects_followed: stats.get_info_count(InfoType::RedirectFollowed),
            https_upgrades: stats.get_info_count(InfoType::HttpsUpgradeRedirect),
            relative_locations_resolved: stats
                .get_info_count(InfoType::RelativeLocationResolved),
        },
    };

    let json = match serde_json::to_string_pretty(&response) {
        Ok(json) => json,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to serialize status: {e}"),
            )
                .into_response();
        }
    };

    (StatusCode::OK, [("content-type", "application/json")], json).into_response()
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ApiError {
            error: message.to_string(),
        }),
    )
        .into_response()
}
