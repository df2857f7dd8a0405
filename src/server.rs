//! HTTP trigger - one GET runs one full cycle

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::bot::MarketBot;
use crate::core::{Error, Result};

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::Network(_) | Error::MalformedBook(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}

/// Router with a single trigger route; any other path or method is 404.
pub fn create_router(bot: Arc<MarketBot>, trigger_path: &str) -> Router {
    Router::new()
        .route(trigger_path, get(trigger_cycle).fallback(not_found))
        .fallback(not_found)
        .with_state(bot)
}

/// GET <trigger_path>
async fn trigger_cycle(State(bot): State<Arc<MarketBot>>) -> Result<impl IntoResponse> {
    let report = bot.run_cycle().await.inspect_err(|e| warn!("Requested cycle failed: {}", e))?;
    bot.ledger().report().await?;
    Ok(Json(report))
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

/// Serve `router` on `addr` until `shutdown` resolves.
pub async fn serve(
    addr: &str,
    router: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Service listening on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::tests::{StubObserver, sample_book};
    use crate::core::Balance;
    use crate::execution::BalanceLedger;
    use crate::strategies::OrderGenerator;
    use axum::body::Body;
    use axum::http::{Method, Request};
    use std::sync::atomic::Ordering;
    use tower::ServiceExt;

    fn router(observer: Arc<StubObserver>, path: &str) -> Router {
        let bot = MarketBot::new(
            observer,
            OrderGenerator::default(),
            BalanceLedger::spawn(Balance::default()),
        );
        create_router(Arc::new(bot), path)
    }

    fn request(method: Method, uri: &str) -> Request<Body> {
        Request::builder().method(method).uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_trigger_runs_one_cycle() {
        let observer = Arc::new(StubObserver::with_book(sample_book()));
        let resp = router(observer.clone(), "/")
            .oneshot(request(Method::GET, "/"))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(observer.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_other_path_is_404() {
        let observer = Arc::new(StubObserver::with_book(sample_book()));
        let resp = router(observer.clone(), "/")
            .oneshot(request(Method::GET, "/favicon.ico"))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(observer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_other_method_is_404() {
        let observer = Arc::new(StubObserver::with_book(sample_book()));
        let resp = router(observer.clone(), "/run")
            .oneshot(request(Method::POST, "/run"))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(observer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_cycle_is_bad_gateway() {
        let observer = Arc::new(StubObserver::failing());
        let resp = router(observer, "/")
            .oneshot(request(Method::GET, "/"))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }
}
