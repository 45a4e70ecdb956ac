//! Fiat currency converter
//!
//! Rates are denominated in the euro. A failed fetch is reported to the
//! caller and leaves the cache as it was.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_lock::Mutex;
use async_trait::async_trait;
use metra_core::{round_to, ConversionKind, ConvertError, Precision, UnitDefinition, UnitOption};
use metra_plugin::{Converter, ConverterMeta};
use tracing::{debug, error, info};

use crate::source::{is_usable_rate, RateSource, RateTable};
use crate::RateCache;

/// One hour
pub const CURRENCY_TTL: Duration = Duration::from_millis(3_600_000);

/// Currency every rate table is denominated in
pub const CURRENCY_BASE: &str = "EUR";

/// Currencies offered, in display order
pub fn currency_units() -> Vec<UnitDefinition> {
    vec![
        UnitDefinition::new("EUR", "Euro", "€"),
        UnitDefinition::new("USD", "US Dollar", "$"),
        UnitDefinition::new("GBP", "Pound Sterling", "£"),
        UnitDefinition::new("JPY", "Japanese Yen", "¥"),
        UnitDefinition::new("CHF", "Swiss Franc", "CHF"),
        UnitDefinition::new("CAD", "Canadian Dollar", "C$"),
        UnitDefinition::new("AUD", "Australian Dollar", "A$"),
    ]
}

pub struct CurrencyConverter {
    units: Vec<UnitDefinition>,
    source: Arc<dyn RateSource>,
    cache: Mutex<RateCache>,
}

impl CurrencyConverter {
    pub fn new(source: Arc<dyn RateSource>) -> Self {
        Self {
            units: currency_units(),
            source,
            cache: Mutex::new(RateCache::new(CURRENCY_TTL)),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.cache = Mutex::new(RateCache::new(ttl));
        self
    }

    fn validate(&self, from: &str, to: &str) -> Result<(), ConvertError> {
        let mut invalid = Vec::new();
        for id in [from, to] {
            if !self.units.iter().any(|u| u.id == id) && !invalid.iter().any(|i| i == id) {
                invalid.push(id.to_string());
            }
        }
        if invalid.is_empty() {
            Ok(())
        } else {
            Err(ConvertError::invalid_unit(ConversionKind::Currency, invalid))
        }
    }

    /// Resolve the rate table: the cached one while valid, a live one otherwise.
    ///
    /// The cache lock is held across the fetch, so callers arriving during
    /// a fetch wait for it instead of issuing their own.
    pub async fn fetch_exchange_rates(&self) -> Result<RateTable, ConvertError> {
        let mut cache = self.cache.lock().await;
        let now = Instant::now();

        if let Some(rates) = cache.valid_rates(now) {
            debug!("currency rate cache hit");
            return Ok(rates.clone());
        }

        debug!("currency rate cache stale or empty, fetching");
        match self.source.fetch_rates(CURRENCY_BASE).await {
            Ok(rates) => {
                info!(count = rates.len(), "fetched currency rates");
                cache.store(rates.clone(), now);
                Ok(rates)
            }
            Err(e) => {
                error!(error = %e, "failed to fetch currency rates");
                Err(ConvertError::rate_fetch(ConversionKind::Currency, e.to_string()))
            }
        }
    }

    fn rate(rates: &RateTable, unit: &str) -> Result<f64, ConvertError> {
        rates
            .rate(unit)
            .filter(|r| is_usable_rate(*r))
            .ok_or_else(|| ConvertError::missing_rate(ConversionKind::Currency, unit))
    }

    /// Convert between two currencies, pivoting through the euro.
    ///
    /// Same-currency conversions return `value` without touching the network.
    pub async fn convert(&self, value: f64, from: &str, to: &str) -> Result<f64, ConvertError> {
        self.validate(from, to)?;

        if from == to {
            return ConvertError::finite(ConversionKind::Currency, from, to, value);
        }

        let rates = self.fetch_exchange_rates().await?;

        let in_base = if from == CURRENCY_BASE {
            value
        } else {
            value / Self::rate(&rates, from)?
        };

        let result = if to == CURRENCY_BASE {
            in_base
        } else {
            in_base * Self::rate(&rates, to)?
        };

        ConvertError::finite(ConversionKind::Currency, from, to, round_to(result, Precision::CURRENCY))
    }
}

#[async_trait]
impl Converter for CurrencyConverter {
    fn meta(&self) -> ConverterMeta {
        ConverterMeta {
            kind: ConversionKind::Currency,
            description: "Fiat currency conversions from live euro rates",
            base_unit: CURRENCY_BASE,
            precision: Precision::CURRENCY,
            rate_backed: true,
        }
    }

    fn unit_options(&self) -> Vec<UnitOption> {
        self.units.iter().map(|u| u.option()).collect()
    }

    async fn convert(&self, value: f64, from: &str, to: &str) -> Result<f64, ConvertError> {
        CurrencyConverter::convert(self, value, from, to).await
    }
}
