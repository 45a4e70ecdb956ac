//! Metra - Unit, currency and cryptocurrency conversion
//!
//! The engine wires the six converters into one registry:
//! - Static: length, weight, temperature, volume
//! - Rate-backed: currency (euro rates), crypto (dollar rates)

mod config;

pub use config::MetraConfig;
pub use metra_core::{
    codes, ConversionKind, ConversionRecord, ConvertError, RecordDraft, UnitOption,
};
pub use metra_rates::{RateSource, RateTable};

use std::sync::Arc;

use metra_plugin::ConverterRegistry;
use metra_rates::{CryptoConverter, CurrencyConverter, FixedRateSource, HttpRateSource};
use serde_json::Value as JsonValue;
use tracing::info;

/// Main Metra engine
pub struct Metra {
    registry: ConverterRegistry,
    currency: Arc<CurrencyConverter>,
    crypto: Arc<CryptoConverter>,
}

impl Metra {
    /// Engine fetching live rates over HTTP, or none at all when offline
    pub fn new(config: &MetraConfig) -> Result<Self, ConvertError> {
        let source: Arc<dyn RateSource> = if config.offline {
            info!("offline mode, live rates disabled");
            Arc::new(FixedRateSource::failing("offline mode"))
        } else {
            let http = HttpRateSource::new(&config.rate_source_url, config.request_timeout())
                .map_err(|e| ConvertError::rate_fetch(ConversionKind::Currency, e.to_string()))?;
            Arc::new(http)
        };
        Ok(Self::with_sources(config, source.clone(), source))
    }

    /// Engine reading rates from the given sources
    pub fn with_sources(
        config: &MetraConfig,
        currency_source: Arc<dyn RateSource>,
        crypto_source: Arc<dyn RateSource>,
    ) -> Self {
        let currency =
            Arc::new(CurrencyConverter::new(currency_source).with_ttl(config.currency_ttl()));
        let crypto = Arc::new(CryptoConverter::new(crypto_source).with_ttl(config.crypto_ttl()));

        let registry = metra_units::load_static_converters(ConverterRegistry::new())
            .with_shared(currency.clone())
            .with_shared(crypto.clone());

        Self {
            registry,
            currency,
            crypto,
        }
    }

    /// Conversion kinds, in UI order
    pub fn kinds(&self) -> Vec<ConversionKind> {
        self.registry.kinds()
    }

    pub fn unit_options(&self, kind: ConversionKind) -> Result<Vec<UnitOption>, ConvertError> {
        self.registry.unit_options(kind)
    }

    /// Every kind with its metadata and units
    pub fn describe(&self) -> JsonValue {
        self.registry.describe()
    }

    /// Convert `value` and describe the result as a record stamped now
    pub async fn convert(
        &self,
        kind: ConversionKind,
        value: f64,
        from: &str,
        to: &str,
    ) -> Result<ConversionRecord, ConvertError> {
        let result = self.registry.convert(kind, value, from, to).await?;
        Ok(ConversionRecord::new(kind, from, value, to, result))
    }

    /// The rate table a rate-backed kind would convert with now.
    ///
    /// Served from cache while it is valid.
    pub async fn fetch_exchange_rates(&self, kind: ConversionKind) -> Result<RateTable, ConvertError> {
        match kind {
            ConversionKind::Currency => self.currency.fetch_exchange_rates().await,
            ConversionKind::Crypto => Ok(self.crypto.fetch_exchange_rates().await),
            _ => Err(ConvertError::UnsupportedKind(kind)),
        }
    }
}
