//! Core business logic abstractions

pub mod cache;
pub mod config;
pub mod error;
pub mod log;
pub mod rates;
pub mod store;

// Re-export main types for cleaner imports
pub use cache::RateCache;
pub use error::{BotError, CommandKind};
pub use rates::{RateHistory, RateProvider, RateSnapshot};
pub use store::RateStore;
