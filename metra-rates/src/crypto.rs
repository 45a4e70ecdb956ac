//! Cryptocurrency converter
//!
//! Rates are denominated in the US dollar, which is never itself a
//! convertible unit. Fetch failures never reach the caller: missing rates
//! are filled from a fixed fallback table, per unit or wholesale.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_lock::Mutex;
use async_trait::async_trait;
use metra_core::{round_to, ConversionKind, ConvertError, Precision, UnitDefinition, UnitOption};
use metra_plugin::{Converter, ConverterMeta};
use tracing::{debug, error, info, warn};

use crate::source::{is_usable_rate, RateSource, RateTable};
use crate::RateCache;

/// Ten minutes
pub const CRYPTO_TTL: Duration = Duration::from_millis(600_000);

/// Fiat currency the crypto rates are fetched against
pub const CRYPTO_QUOTE: &str = "usd";

/// Rate used for a configured unit with no fallback entry
const DEFAULT_FALLBACK_RATE: f64 = 1.0;

const FALLBACK_RATES: &[(&str, f64)] = &[
    ("btc", 0.000033),
    ("eth", 0.00045),
    ("sol", 0.012),
    ("ada", 0.32),
    ("usdt", 1.0),
    ("xrp", 1.7),
];

/// Cryptocurrencies offered, in display order
pub fn crypto_units() -> Vec<UnitDefinition> {
    vec![
        UnitDefinition::new("BTC", "Bitcoin", "₿"),
        UnitDefinition::new("ETH", "Ethereum", "Ξ"),
        UnitDefinition::new("SOL", "Solana", "◎"),
        UnitDefinition::new("ADA", "Cardano", "₳"),
        UnitDefinition::new("USDT", "Tether", "₮"),
        UnitDefinition::new("XRP", "Ripple", "XRP"),
    ]
}

/// Fixed rate served in place of a live one for `code` (any casing)
pub fn fallback_rate(code: &str) -> f64 {
    let code = code.to_lowercase();
    FALLBACK_RATES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, r)| *r)
        .unwrap_or(DEFAULT_FALLBACK_RATE)
}

/// The whole fallback table
pub fn fallback_rates() -> RateTable {
    FALLBACK_RATES.iter().copied().collect()
}

pub struct CryptoConverter {
    units: Vec<UnitDefinition>,
    source: Arc<dyn RateSource>,
    cache: Mutex<RateCache>,
}

impl CryptoConverter {
    pub fn new(source: Arc<dyn RateSource>) -> Self {
        Self {
            units: crypto_units(),
            source,
            cache: Mutex::new(RateCache::new(CRYPTO_TTL)),
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
            Err(ConvertError::invalid_unit(ConversionKind::Crypto, invalid))
        }
    }

    /// Keep the configured units only, filling gaps from the fallback table
    fn select_rates(&self, fetched: &RateTable) -> RateTable {
        let mut rates = RateTable::new();
        for unit in &self.units {
            match fetched.rate(&unit.id).filter(|r| is_usable_rate(*r)) {
                Some(rate) => rates.insert(&unit.id, rate),
                None => {
                    let fallback = fallback_rate(&unit.id);
                    warn!(unit = %unit.id, fallback, "no live rate, using fallback");
                    rates.insert(&unit.id, fallback);
                }
            }
        }
        rates
    }

    /// Resolve the rate table. Always succeeds: a failed fetch yields the
    /// fallback table, which is cached like a live one.
    pub async fn fetch_exchange_rates(&self) -> RateTable {
        let mut cache = self.cache.lock().await;
        let now = Instant::now();

        if let Some(rates) = cache.valid_rates(now) {
            debug!("crypto rate cache hit");
            return rates.clone();
        }

        debug!("crypto rate cache stale or empty, fetching");
        let rates = match self.source.fetch_rates(CRYPTO_QUOTE).await {
            Ok(fetched) => {
                info!(count = fetched.len(), "fetched crypto rates");
                self.select_rates(&fetched)
            }
            Err(e) => {
                error!(error = %e, "failed to fetch crypto rates");
                warn!("serving fallback crypto rates");
                fallback_rates()
            }
        };

        cache.store(rates.clone(), now);
        rates
    }

    fn rate(rates: &RateTable, unit: &str) -> Result<f64, ConvertError> {
        rates
            .rate(unit)
            .filter(|r| is_usable_rate(*r))
            .ok_or_else(|| ConvertError::missing_rate(ConversionKind::Crypto, unit))
    }

    /// Convert between two cryptocurrencies through the dollar.
    ///
    /// Rates are resolved even when `from == to`.
    pub async fn convert(&self, value: f64, from: &str, to: &str) -> Result<f64, ConvertError> {
        self.validate(from, to)?;

        let rates = self.fetch_exchange_rates().await;
        let in_quote = value / Self::rate(&rates, from)?;
        let result = in_quote * Self::rate(&rates, to)?;

        ConvertError::finite(ConversionKind::Crypto, from, to, round_to(result, Precision::CRYPTO))
    }
}

#[async_trait]
impl Converter for CryptoConverter {
    fn meta(&self) -> ConverterMeta {
        ConverterMeta {
            kind: ConversionKind::Crypto,
            description: "Cryptocurrency conversions from live dollar rates, with fallback rates",
            base_unit: "USD",
            precision: Precision::CRYPTO,
            rate_backed: true,
        }
    }

    fn unit_options(&self) -> Vec<UnitOption> {
        self.units.iter().map(|u| u.option()).collect()
    }

    async fn convert(&self, value: f64, from: &str, to: &str) -> Result<f64, ConvertError> {
        CryptoConverter::convert(self, value, from, to).await
    }
}
