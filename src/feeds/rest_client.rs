//! REST client for order-book snapshots

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use crate::core::{Error, MarketObserver, OrderBookEntry, Result};
use crate::core::config::FeedConfig;
use crate::orderbook::parse_snapshot;

/// REST order-book feed client
pub struct RestOrderBookFeed {
    name: String,
    url: String,
    client: reqwest::Client,
}

impl RestOrderBookFeed {
    pub fn new(name: impl Into<String>, url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            name: name.into(),
            url: url.into(),
            client,
        })
    }

    pub fn from_config(config: &FeedConfig) -> Result<Self> {
        Self::new("rest", &config.url, Duration::from_millis(config.timeout_ms))
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl MarketObserver for RestOrderBookFeed {
    /// Transport failures are `Network`; a non-2xx status or an undecodable
    /// body is `MalformedBook`.
    async fn fetch_snapshot(&self) -> Result<Vec<OrderBookEntry>> {
        let resp = self.client.get(&self.url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::malformed(format!("HTTP {} from {}", status, self.url)));
        }

        let body = resp.bytes().await?;
        let book = parse_snapshot(&body)?;
        debug!("Fetched {} order-book rows from {}", book.len(), self.name);
        Ok(book)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, http::StatusCode, routing::get};
    use rust_decimal_macros::dec;
    use tokio::net::TcpListener;

    async fn serve(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn feed(url: String) -> RestOrderBookFeed {
        RestOrderBookFeed::new("test", url, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_snapshot() {
        let base = serve(Router::new().route(
            "/book",
            get(|| async { r#"[[1, 1840.2, 4.47517146], [2, 1840.5, -3.24489485]]"# }),
        ))
        .await;

        let book = feed(format!("{}/book", base)).fetch_snapshot().await.unwrap();
        assert_eq!(book.len(), 2);
        assert_eq!(book[0], OrderBookEntry::new(1, dec!(1840.2), dec!(4.47517146)));
        assert_eq!(book[1].signed_size, dec!(-3.24489485));
    }

    #[tokio::test]
    async fn test_non_success_status_is_malformed() {
        let base = serve(Router::new().route(
            "/book",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }),
        ))
        .await;

        let err = feed(format!("{}/book", base)).fetch_snapshot().await.unwrap_err();
        assert!(matches!(err, Error::MalformedBook(_)), "{:?}", err);
    }

    #[tokio::test]
    async fn test_garbage_body_is_malformed() {
        let base = serve(Router::new().route("/book", get(|| async { "<html>oops</html>" }))).await;

        let err = feed(format!("{}/book", base)).fetch_snapshot().await.unwrap_err();
        assert!(matches!(err, Error::MalformedBook(_)), "{:?}", err);
    }

    #[tokio::test]
    async fn test_unreachable_is_network() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = feed(format!("http://{}/book", addr)).fetch_snapshot().await.unwrap_err();
        assert!(matches!(err, Error::Network(_)), "{:?}", err);
    }
}
