//! Market data feeds - REST order-book snapshots

pub mod rest_client;

pub use rest_client::RestOrderBookFeed;
