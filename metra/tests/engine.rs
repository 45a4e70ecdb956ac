use std::sync::Arc;

use metra::{codes, ConversionKind, Metra, MetraConfig, RateTable};
use metra_rates::FixedRateSource;

fn engine(currency: &Arc<FixedRateSource>, crypto: &Arc<FixedRateSource>) -> Metra {
    Metra::with_sources(&MetraConfig::default(), currency.clone(), crypto.clone())
}

fn euro_rates() -> RateTable {
    [("usd", 1.1), ("gbp", 0.85), ("jpy", 130.0), ("chf", 0.95)]
        .into_iter()
        .collect()
}

#[tokio::test]
async fn static_conversions_match_reference_values() {
    let currency = Arc::new(FixedRateSource::failing("unused"));
    let crypto = Arc::new(FixedRateSource::failing("unused"));
    let metra = engine(&currency, &crypto);

    let cases = [
        (ConversionKind::Length, 1.0, "meter", "foot", 3.28084),
        (ConversionKind::Length, 1.0, "mile", "kilometer", 1.609344),
        (ConversionKind::Weight, 1.0, "pound", "kilogram", 0.45359237),
        (ConversionKind::Temperature, 100.0, "celsius", "fahrenheit", 212.0),
        (ConversionKind::Volume, 1.0, "gallon", "liter", 3.785412),
    ];

    for (kind, value, from, to, expected) in cases {
        let record = metra.convert(kind, value, from, to).await.unwrap();
        assert!(
            (record.to_value - expected).abs() < 1e-6,
            "{} {} -> {}: got {}",
            kind,
            from,
            to,
            record.to_value
        );
    }

    assert_eq!(currency.calls() + crypto.calls(), 0);
}

#[tokio::test]
async fn currency_uses_one_fetch_per_ttl_window() {
    let currency = Arc::new(FixedRateSource::new(euro_rates()));
    let crypto = Arc::new(FixedRateSource::failing("unused"));
    let metra = engine(&currency, &crypto);

    let usd = metra
        .convert(ConversionKind::Currency, 100.0, "EUR", "USD")
        .await
        .unwrap();
    let chf = metra
        .convert(ConversionKind::Currency, 100.0, "USD", "CHF")
        .await
        .unwrap();
    metra.fetch_exchange_rates(ConversionKind::Currency).await.unwrap();

    assert!((usd.to_value - 110.0).abs() < 1e-4);
    assert!((chf.to_value - 86.3636).abs() < 1e-4);
    assert_eq!(currency.calls(), 1);
}

#[tokio::test]
async fn currency_failure_surfaces_and_crypto_degrades() {
    let currency = Arc::new(FixedRateSource::failing("network down"));
    let crypto = Arc::new(FixedRateSource::failing("network down"));
    let metra = engine(&currency, &crypto);

    let err = metra
        .convert(ConversionKind::Currency, 1.0, "EUR", "GBP")
        .await
        .unwrap_err();
    assert_eq!(err.code(), codes::RATE_FETCH);
    assert!(err.is_recoverable());

    let record = metra
        .convert(ConversionKind::Crypto, 1.0, "BTC", "ETH")
        .await
        .unwrap();
    assert!(record.to_value.is_finite() && record.to_value > 0.0);
}

#[tokio::test]
async fn recovery_after_currency_outage() {
    let currency = Arc::new(FixedRateSource::failing("network down"));
    let crypto = Arc::new(FixedRateSource::failing("unused"));
    let metra = engine(&currency, &crypto);

    assert!(metra
        .convert(ConversionKind::Currency, 1.0, "EUR", "USD")
        .await
        .is_err());

    // Failures are not cached, so the next call tries again
    currency.set_table(euro_rates());
    let record = metra
        .convert(ConversionKind::Currency, 1.0, "EUR", "USD")
        .await
        .unwrap();
    assert_eq!(record.to_value, 1.1);
    assert_eq!(currency.calls(), 2);
}

#[tokio::test]
async fn invalid_units_never_reach_the_network() {
    let currency = Arc::new(FixedRateSource::new(euro_rates()));
    let crypto = Arc::new(FixedRateSource::new(RateTable::new()));
    let metra = engine(&currency, &crypto);

    for kind in ConversionKind::ALL {
        let err = metra.convert(kind, 1.0, "bogus", "bogus").await.unwrap_err();
        assert_eq!(err.code(), codes::INVALID_UNIT, "{}", kind);
    }
    assert_eq!(currency.calls() + crypto.calls(), 0);
}

#[tokio::test]
async fn records_serialize_in_storage_format() {
    let currency = Arc::new(FixedRateSource::failing("unused"));
    let crypto = Arc::new(FixedRateSource::failing("unused"));
    let metra = engine(&currency, &crypto);

    let record = metra
        .convert(ConversionKind::Temperature, 0.0, "kelvin", "celsius")
        .await
        .unwrap();
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["type"], "temperature");
    assert_eq!(json["fromUnit"], "kelvin");
    assert_eq!(json["toValue"], -273.15);
    assert!(json["timestamp"].is_string());
}
