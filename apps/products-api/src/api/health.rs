//! Welcome and readiness endpoints

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use axum_helpers::{run_health_checks, HealthCheckFuture};
use database::mongodb::check_health_detailed;
use mongodb::Client;

pub const WELCOME_MESSAGE: &str =
    "Welcome to the Product API! Go to /api/products to see all products.";

async fn welcome() -> &'static str {
    WELCOME_MESSAGE
}

/// 200 when MongoDB answers a ping, 503 otherwise.
async fn ready(State(client): State<Client>) -> impl IntoResponse {
    let database: HealthCheckFuture = Box::pin(async {
        let status = check_health_detailed(&client).await;
        if status.healthy {
            Ok::<(), String>(())
        } else {
            Err(status.message.unwrap_or_default())
        }
    });

    run_health_checks(vec![("database", database)]).await
}

/// `GET /` and `GET /ready`; `/health` comes from `axum_helpers::health_router`.
pub fn router(client: Client) -> Router {
    Router::new()
        .route("/", get(welcome))
        .route("/ready", get(ready))
        .with_state(client)
}
