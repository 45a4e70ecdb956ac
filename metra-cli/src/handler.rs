//! Request handling for the JSON-lines protocol

use std::sync::Arc;

use metra::{ConversionKind, ConvertError, Metra, RecordDraft};
use metra_store::{Favorite, Favorites, History, KeyValueStore};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use tracing::warn;

pub const PARSE_ERROR: &str = "PARSE_ERROR";
pub const METHOD_NOT_FOUND: &str = "METHOD_NOT_FOUND";
pub const INVALID_PARAMS: &str = "INVALID_PARAMS";

#[derive(Debug, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub id: Option<JsonValue>,
    pub method: String,
    #[serde(default)]
    pub params: Option<JsonValue>,
}

#[derive(Debug, Serialize)]
pub struct Response {
    pub id: JsonValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl Response {
    pub fn parse_error(message: String) -> Self {
        Response {
            id: JsonValue::Null,
            result: None,
            error: Some(RpcError::new(PARSE_ERROR, message)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl RpcError {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        RpcError {
            code: code.to_string(),
            message: message.into(),
            suggestion: None,
        }
    }

    fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(INVALID_PARAMS, message)
    }
}

impl From<ConvertError> for RpcError {
    fn from(err: ConvertError) -> Self {
        RpcError {
            code: err.code().to_string(),
            message: err.to_string(),
            suggestion: err.suggestion(),
        }
    }
}

#[derive(Deserialize)]
struct KindParams {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Deserialize)]
struct ConvertParams {
    #[serde(rename = "type")]
    kind: String,
    value: JsonValue,
    from: String,
    to: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FavoriteParams {
    #[serde(rename = "type")]
    kind: String,
    from_unit: String,
    to_unit: String,
}

#[derive(Deserialize)]
struct IndexParams {
    index: i64,
}

fn params<T: DeserializeOwned>(params: &Option<JsonValue>) -> Result<T, RpcError> {
    let value = params.clone().unwrap_or_else(|| json!({}));
    serde_json::from_value(value).map_err(|e| RpcError::invalid_params(e.to_string()))
}

fn parse_kind(name: &str) -> Result<ConversionKind, RpcError> {
    name.parse::<ConversionKind>().map_err(RpcError::from)
}

/// Accept a JSON number or a numeric string; anything else never reaches a converter
fn parse_value(value: &JsonValue) -> Result<f64, RpcError> {
    let parsed = match value {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|v| v.is_finite())
        .ok_or_else(|| RpcError::invalid_params(format!("value must be a finite number, got {}", value)))
}

fn to_json<T: Serialize>(value: &T) -> Result<JsonValue, RpcError> {
    serde_json::to_value(value).map_err(|e| RpcError::new("INTERNAL", e.to_string()))
}

/// The engine plus its storage collaborators
pub struct App {
    metra: Metra,
    favorites: Favorites,
    history: History,
}

impl App {
    pub fn new(metra: Metra, store: Arc<dyn KeyValueStore>, history_limit: usize) -> Self {
        Self {
            metra,
            favorites: Favorites::new(store.clone()),
            history: History::new(store).with_limit(history_limit),
        }
    }

    pub async fn handle(&self, request: &Request) -> Response {
        let result = match request.method.as_str() {
            "ping" => Ok(json!({})),
            "kinds" => Ok(self.metra.describe()),
            "units" => self.units(&request.params),
            "convert" => self.convert(&request.params).await,
            "rates" => self.rates(&request.params).await,

            "favorites/list" => self.favorites.list().map_err(RpcError::from).and_then(|f| to_json(&f)),
            "favorites/add" => self.add_favorite(&request.params),
            "favorites/remove" => self.remove_favorite(&request.params),
            "favorites/clear" => self.favorites.clear().map(|_| json!({})).map_err(RpcError::from),

            "history/list" => self.history.list().map_err(RpcError::from).and_then(|h| to_json(&h)),
            "history/clear" => self.history.clear().map_err(RpcError::from).and_then(|h| to_json(&h)),

            _ => Err(RpcError::new(
                METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            )),
        };

        let id = request.id.clone().unwrap_or(JsonValue::Null);
        match result {
            Ok(r) => Response {
                id,
                result: Some(r),
                error: None,
            },
            Err(e) => Response {
                id,
                result: None,
                error: Some(e),
            },
        }
    }

    fn units(&self, raw: &Option<JsonValue>) -> Result<JsonValue, RpcError> {
        let p: KindParams = params(raw)?;
        let kind = parse_kind(&p.kind)?;
        let units: Vec<JsonValue> = self
            .metra
            .unit_options(kind)?
            .into_iter()
            .map(|u| {
                json!({
                    "id": u.id,
                    "name": u.label(),
                    "displayName": u.display_name,
                    "symbol": u.symbol,
                })
            })
            .collect();
        Ok(json!({ "type": kind, "units": units }))
    }

    async fn convert(&self, raw: &Option<JsonValue>) -> Result<JsonValue, RpcError> {
        let p: ConvertParams = params(raw)?;
        let kind = parse_kind(&p.kind)?;
        let value = parse_value(&p.value)?;

        let record = self.metra.convert(kind, value, &p.from, &p.to).await?;

        if let Err(e) = self.history.add(RecordDraft::from(record.clone())) {
            warn!(error = %e, "conversion not recorded in history");
        }
        to_json(&record)
    }

    async fn rates(&self, raw: &Option<JsonValue>) -> Result<JsonValue, RpcError> {
        let p: KindParams = params(raw)?;
        let kind = parse_kind(&p.kind)?;
        let rates = self.metra.fetch_exchange_rates(kind).await?;
        Ok(json!({ "type": kind, "rates": rates }))
    }

    fn add_favorite(&self, raw: &Option<JsonValue>) -> Result<JsonValue, RpcError> {
        let p: FavoriteParams = params(raw)?;
        let kind = parse_kind(&p.kind)?;
        let added = self.favorites.add(Favorite::new(kind, &p.from_unit, &p.to_unit))?;
        Ok(json!({ "added": added }))
    }

    fn remove_favorite(&self, raw: &Option<JsonValue>) -> Result<JsonValue, RpcError> {
        let p: IndexParams = params(raw)?;
        // Negative indexes are out of range like any other
        let removed = match usize::try_from(p.index) {
            Ok(index) => self.favorites.remove(index)?,
            Err(_) => false,
        };
        Ok(json!({ "removed": removed }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metra::MetraConfig;
    use metra_rates::FixedRateSource;
    use metra_store::MemoryStore;

    fn app() -> App {
        let currency = Arc::new(FixedRateSource::new(
            [("usd", 1.1), ("gbp", 0.85)].into_iter().collect(),
        ));
        let crypto = Arc::new(FixedRateSource::failing("offline"));
        let metra = Metra::with_sources(&MetraConfig::default(), currency, crypto);
        App::new(metra, Arc::new(MemoryStore::new()), 20)
    }

    fn request(line: &str) -> Request {
        serde_json::from_str(line).unwrap()
    }

    async fn call(app: &App, line: &str) -> Response {
        app.handle(&request(line)).await
    }

    #[tokio::test]
    async fn test_ping() {
        let response = call(&app(), r#"{"id":1,"method":"ping"}"#).await;
        assert_eq!(response.id, json!(1));
        assert_eq!(response.result, Some(json!({})));
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let response = call(&app(), r#"{"id":"a","method":"explode"}"#).await;
        assert_eq!(response.error.unwrap().code, METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_units() {
        let response = call(&app(), r#"{"id":1,"method":"units","params":{"type":"Crypto"}}"#).await;
        let result = response.result.unwrap();
        assert_eq!(result["type"], "crypto");
        assert_eq!(result["units"][0]["name"], "Bitcoin (₿)");
    }

    #[tokio::test]
    async fn test_convert_records_history() {
        let app = app();
        let response = call(
            &app,
            r#"{"id":1,"method":"convert","params":{"type":"currency","value":"100","from":"EUR","to":"USD"}}"#,
        )
        .await;
        let result = response.result.unwrap();
        assert_eq!(result["toValue"], 110.0);
        assert_eq!(result["fromUnit"], "EUR");

        let history = call(&app, r#"{"id":2,"method":"history/list"}"#).await.result.unwrap();
        assert_eq!(history.as_array().unwrap().len(), 1);
        assert_eq!(history[0]["toUnit"], "USD");

        let cleared = call(&app, r#"{"id":3,"method":"history/clear"}"#).await.result.unwrap();
        assert_eq!(cleared, json!([]));
    }

    #[tokio::test]
    async fn test_non_numeric_value_rejected() {
        let app = app();
        for value in [r#""abc""#, "null", "[1]", r#""NaN""#] {
            let line = format!(
                r#"{{"id":1,"method":"convert","params":{{"type":"length","value":{},"from":"meter","to":"foot"}}}}"#,
                value
            );
            let response = call(&app, &line).await;
            assert_eq!(response.error.unwrap().code, INVALID_PARAMS, "value {}", value);
        }
        let history = call(&app, r#"{"id":2,"method":"history/list"}"#).await.result.unwrap();
        assert_eq!(history, json!([]));
    }

    #[tokio::test]
    async fn test_conversion_errors_carry_codes() {
        let app = app();
        let response = call(
            &app,
            r#"{"id":1,"method":"convert","params":{"type":"length","value":1,"from":"parsec","to":"foot"}}"#,
        )
        .await;
        assert_eq!(response.error.unwrap().code, "INVALID_UNIT");

        let response = call(&app, r#"{"id":2,"method":"units","params":{"type":"lenght"}}"#).await;
        let error = response.error.unwrap();
        assert_eq!(error.code, "UNKNOWN_KIND");
        assert!(error.suggestion.is_some());
    }

    #[tokio::test]
    async fn test_rates() {
        let app = app();
        let response = call(&app, r#"{"id":1,"method":"rates","params":{"type":"currency"}}"#).await;
        assert_eq!(response.result.unwrap()["rates"]["usd"], 1.1);

        let response = call(&app, r#"{"id":2,"method":"rates","params":{"type":"crypto"}}"#).await;
        assert_eq!(response.result.unwrap()["rates"]["btc"], 0.000033);

        let response = call(&app, r#"{"id":3,"method":"rates","params":{"type":"weight"}}"#).await;
        assert_eq!(response.error.unwrap().code, "UNSUPPORTED_KIND");
    }

    #[tokio::test]
    async fn test_favorites() {
        let app = app();
        let add = r#"{"id":1,"method":"favorites/add","params":{"type":"length","fromUnit":"meter","toUnit":"foot"}}"#;
        assert_eq!(call(&app, add).await.result, Some(json!({ "added": true })));
        assert_eq!(call(&app, add).await.result, Some(json!({ "added": false })));

        let list = call(&app, r#"{"id":2,"method":"favorites/list"}"#).await.result.unwrap();
        assert_eq!(list[0]["fromUnit"], "meter");

        let remove = call(&app, r#"{"id":3,"method":"favorites/remove","params":{"index":4}}"#).await;
        assert_eq!(remove.result, Some(json!({ "removed": false })));
        let remove = call(&app, r#"{"id":3,"method":"favorites/remove","params":{"index":-1}}"#).await;
        assert_eq!(remove.result, Some(json!({ "removed": false })));
        let list = call(&app, r#"{"id":3,"method":"favorites/list"}"#).await.result.unwrap();
        assert_eq!(list.as_array().unwrap().len(), 1);

        call(&app, r#"{"id":4,"method":"favorites/clear"}"#).await;
        let list = call(&app, r#"{"id":5,"method":"favorites/list"}"#).await.result.unwrap();
        assert_eq!(list, json!([]));
    }

    #[tokio::test]
    async fn test_overflow_leaves_history_intact() {
        let app = app();
        for value in ["1", "2", "3"] {
            let line = format!(
                r#"{{"id":1,"method":"convert","params":{{"type":"length","value":{},"from":"mile","to":"meter"}}}}"#,
                value
            );
            assert!(call(&app, &line).await.result.is_some());
        }

        let response = call(
            &app,
            r#"{"id":2,"method":"convert","params":{"type":"length","value":1e308,"from":"mile","to":"meter"}}"#,
        )
        .await;
        assert!(response.result.is_none());
        assert_eq!(response.error.unwrap().code, "NON_FINITE");

        let history = call(&app, r#"{"id":3,"method":"history/list"}"#).await.result.unwrap();
        assert_eq!(history.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_missing_params() {
        let response = call(&app(), r#"{"id":1,"method":"convert"}"#).await;
        assert_eq!(response.error.unwrap().code, INVALID_PARAMS);
    }
}
