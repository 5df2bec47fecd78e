use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum_server::Handle;
use axum_server::tls_rustls::RustlsConfig;
use base64::Engine;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::metrics::{self, EXPOSITION_CONTENT_TYPE, HTTP_REQUESTS};
use crate::probe::{ProbeQuery, run_probe};
use crate::storage::StoreFactory;
use crate::types::error::ProbeError;
use crate::types::{AccessKeys, S3Credentials};

/// Shared router state: the store factory injected once at startup.
///
/// Everything else a request needs is derived from the request itself.
pub struct AppState {
    pub factory: Arc<dyn StoreFactory + Send + Sync>,
}

/// Build the exporter's HTTP surface.
pub fn router(factory: Arc<dyn StoreFactory + Send + Sync>) -> Router {
    Router::new()
        .route("/probe", get(probe_handler))
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(AppState { factory }))
}

/// Serve the router until the handle shuts it down.
///
/// HTTPS is selected when the config carries both TLS file paths (validated
/// at argument parsing); otherwise plain HTTP. The handle is driven by the
/// signal watcher in the binary.
pub async fn serve(
    config: &Config,
    factory: Arc<dyn StoreFactory + Send + Sync>,
    handle: Handle,
) -> Result<()> {
    let app = router(factory);
    let addr: SocketAddr = config
        .listen_address
        .parse()
        .with_context(|| format!("invalid listen address: {}", config.listen_address))?;

    match (&config.tls_cert_file, &config.tls_key_file) {
        (Some(cert_file), Some(key_file)) => {
            let tls_config = RustlsConfig::from_pem_file(cert_file, key_file)
                .await
                .context("failed to load TLS certificate/key files")?;

            info!(proto = "https", listen_addr = %addr, "Starting server...");
            axum_server::bind_rustls(addr, tls_config)
                .handle(handle)
                .serve(app.into_make_service())
                .await
                .context("HTTPS server error")?;
        }
        _ => {
            info!(proto = "http", listen_addr = %addr, "Starting server...");
            axum_server::bind(addr)
                .handle(handle)
                .serve(app.into_make_service())
                .await
                .context("HTTP server error")?;
        }
    }

    info!("Server stopped.");
    Ok(())
}

/// Extract pass-through storage credentials from the request's basic auth.
///
/// Absent, non-Basic, or undecodable headers all degrade to anonymous
/// access. Credentials here are forwarded to the provider, not an
/// authentication layer of the exporter itself.
fn credentials_from_headers(headers: &HeaderMap) -> S3Credentials {
    let Some(value) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    else {
        return S3Credentials::Anonymous;
    };

    let Some(encoded) = value.strip_prefix("Basic ") else {
        return S3Credentials::Anonymous;
    };

    let Ok(decoded) = base64::engine::general_purpose::STANDARD.decode(encoded.trim()) else {
        return S3Credentials::Anonymous;
    };

    let Ok(decoded) = String::from_utf8(decoded) else {
        return S3Credentials::Anonymous;
    };

    match decoded.split_once(':') {
        Some((access_key, secret_key)) => S3Credentials::Static(AccessKeys {
            access_key: access_key.to_string(),
            secret_access_key: secret_key.to_string(),
        }),
        None => S3Credentials::Anonymous,
    }
}

fn error_response(err: &ProbeError) -> Response {
    let status = err.status_code();
    if status.is_server_error() {
        error!(status = status.as_u16(), "probe failed: {err}");
    } else {
        warn!(status = status.as_u16(), "probe rejected: {err}");
    }
    (status, format!("{err}\n")).into_response()
}

/// `GET /probe`: run one probe and answer with its exposition body.
async fn probe_handler(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
    headers: HeaderMap,
) -> Response {
    HTTP_REQUESTS.with_label_values(&["/probe"]).inc();

    let credentials = credentials_from_headers(&headers);
    let query = match ProbeQuery::from_pairs(
        pairs.iter().map(|(name, value)| (name.as_str(), value.as_str())),
        credentials,
    ) {
        Ok(query) => query,
        Err(err) => return error_response(&err),
    };

    let store = match state.factory.create(&query.target()).await {
        Ok(store) => store,
        Err(err) => {
            error!("failed to create storage client: {err:#}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error creating storage client: {err}\n"),
            )
                .into_response();
        }
    };

    match run_probe(store.as_ref(), &query).await {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, EXPOSITION_CONTENT_TYPE)],
            body,
        )
            .into_response(),
        Err(err) => error_response(&err),
    }
}

/// `GET /metrics`: process self-metrics.
async fn metrics_handler() -> Response {
    HTTP_REQUESTS.with_label_values(&["/metrics"]).inc();

    match metrics::render() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, EXPOSITION_CONTENT_TYPE)],
            body,
        )
            .into_response(),
        Err(err) => {
            error!("failed to render process metrics: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error rendering metrics: {err}\n"),
            )
                .into_response()
        }
    }
}
