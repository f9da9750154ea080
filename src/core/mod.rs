//! Core business logic abstractions

pub mod cache;
pub mod config;
pub mod currency;
pub mod log;
pub mod symbol;

// Re-export main types for cleaner imports
pub use cache::CurrencyListCache;
pub use currency::{
    ConversionRequest, ConversionResult, Currency, CurrencyCode, ExchangeRateProvider,
    FailureKind,
};
