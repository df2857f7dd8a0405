//! Trading strategies - candidate order generation

pub mod random_quotes;

pub use random_quotes::{GeneratorParams, OrderGenerator, TickBand};
