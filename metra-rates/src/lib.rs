//! Metra Rates - Rate-backed conversion
//!
//! Currency and cryptocurrency converters. Each resolves a rate table
//! (cache hit, live fetch or fallback) before pivoting through the
//! currency its rates are denominated in.
//!
//! The two converters deliberately handle fetch failures differently:
//! - Currency reports `RateFetch` and keeps its previous cache
//! - Crypto serves and caches a fixed fallback table

mod cache;
mod crypto;
mod currency;
mod error;
mod http;
mod source;

pub use cache::RateCache;
pub use crypto::{crypto_units, fallback_rate, fallback_rates, CryptoConverter, CRYPTO_QUOTE, CRYPTO_TTL};
pub use currency::{currency_units, CurrencyConverter, CURRENCY_BASE, CURRENCY_TTL};
pub use error::RateSourceError;
pub use http::{HttpRateSource, DEFAULT_RATE_SOURCE_URL, DEFAULT_REQUEST_TIMEOUT};
pub use source::{is_usable_rate, parse_rate_payload, FixedRateSource, RateSource, RateTable};

use std::sync::Arc;
use std::time::Duration;

use metra_plugin::ConverterRegistry;

/// Load both rate-backed converters into a registry
pub fn load_rate_converters(
    registry: ConverterRegistry,
    currency_source: Arc<dyn RateSource>,
    crypto_source: Arc<dyn RateSource>,
) -> ConverterRegistry {
    load_rate_converters_with_ttl(registry, currency_source, crypto_source, CURRENCY_TTL, CRYPTO_TTL)
}

/// Same as [`load_rate_converters`] with explicit cache lifetimes
pub fn load_rate_converters_with_ttl(
    registry: ConverterRegistry,
    currency_source: Arc<dyn RateSource>,
    crypto_source: Arc<dyn RateSource>,
    currency_ttl: Duration,
    crypto_ttl: Duration,
) -> ConverterRegistry {
    registry
        .with_converter(CurrencyConverter::new(currency_source).with_ttl(currency_ttl))
        .with_converter(CryptoConverter::new(crypto_source).with_ttl(crypto_ttl))
}
