use axum::http::{HeaderValue, Method, header};
use std::io;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

/// Comma-separated list of allowed origins.
pub const CORS_ENV_VAR: &str = "CORS_ALLOWED_ORIGIN";

/// Parse a comma-separated origin list, ignoring blank entries.
pub fn parse_allowed_origins(raw: &str) -> io::Result<Vec<HeaderValue>> {
    let origins = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(HeaderValue::from_str)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid {CORS_ENV_VAR} value: {e}"),
            )
        })?;

    if origins.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{CORS_ENV_VAR} cannot be empty"),
        ));
    }

    Ok(origins)
}

/// CORS layer restricted to `origins`: the API's methods, JSON headers, 1 hour max age.
pub fn create_cors_layer(origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600))
}

/// Build the CORS layer from `CORS_ALLOWED_ORIGIN`.
///
/// Unset means any origin is allowed. A set but empty or malformed value is an error.
pub fn cors_layer_from_env() -> io::Result<CorsLayer> {
    match std::env::var(CORS_ENV_VAR) {
        Ok(raw) => {
            let origins = parse_allowed_origins(&raw)?;
            info!(origins = %raw, "CORS restricted to configured origins");
            Ok(create_cors_layer(origins))
        }
        Err(_) => {
            warn!("{CORS_ENV_VAR} not set, allowing any origin");
            Ok(CorsLayer::permissive())
        }
    }
}
