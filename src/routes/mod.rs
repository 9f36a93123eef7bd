pub mod trips;
pub mod users;

use std::time::Duration;

use axum::{
    error_handling::HandleErrorLayer,
    extract::{FromRequest, State},
    routing::get,
    Router,
};
use serde::Serialize;
use tower::{
    timeout::{error::Elapsed, TimeoutLayer},
    BoxError, ServiceBuilder,
};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::{error::AppError, state::AppState};

pub fn create_router(state: AppState) -> Router {
    let timeout = state.config.request_timeout;
    let routes = Router::new()
        .route("/health", get(health))
        .nest("/api/v1/trips", trips::router())
        .nest("/api/v1/users", users::router());

    with_middleware(routes, timeout).with_state(state)
}

fn with_middleware<S>(router: Router<S>, timeout: Duration) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(HandleErrorLayer::new(handle_middleware_error))
            .layer(TimeoutLayer::new(timeout)),
    )
}

/// Renders middleware failures with the same error body as handler failures.
async fn handle_middleware_error(err: BoxError) -> AppError {
    if err.is::<Elapsed>() {
        warn!("request timed out");
        AppError::Timeout("request timed out".into())
    } else {
        AppError::internal(format!("unhandled middleware error: {err}"))
    }
}

async fn health(State(state): State<AppState>) -> Result<&'static str, AppError> {
    sqlx::query("SELECT 1").execute(&state.db).await?;
    Ok("ok")
}

/// JSON body extractor whose rejections surface as `BadRequest`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Success envelope shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct Data<T> {
    pub data: T,
}

impl<T> Data<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

fn require_present(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::bad_request(format!("{field} is required")));
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{
        http::{Method, StatusCode},
        routing::get,
        Router,
    };

    use super::{
        test_support::{router_over, send, test_router},
        with_middleware,
    };
    use crate::db::memory_pool;

    #[tokio::test]
    async fn health_answers_ok() {
        let router = test_router().await;
        let (status, body) = send(&router, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn health_reports_unreachable_database() {
        let db = memory_pool().await;
        let router = router_over(db.clone());
        db.close().await;

        let (status, body) = send(&router, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["message"], "internal server error");
    }

    #[tokio::test]
    async fn slow_request_times_out_with_error_body() {
        let slow = Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_millis(200)).await;
                "late"
            }),
        );
        let router = with_middleware(slow, Duration::from_millis(10));

        let (status, body) = send(&router, Method::GET, "/slow", None).await;
        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
        assert_eq!(body["error"]["code"], 408);
        assert_eq!(body["error"]["kind"], "timeout");
        assert_eq!(body["error"]["message"], "request timed out");
    }
}
