//! Core business logic abstractions

pub mod config;
pub mod conversion;
pub mod currency;
pub mod error;
pub mod history;
pub mod log;
pub mod service;

// Re-export main types for cleaner imports
pub use conversion::ConversionResult;
pub use currency::{CurrencyRateProvider, RateTable};
pub use error::RateError;
pub use history::SyntheticSeries;
pub use service::RateConversionService;
