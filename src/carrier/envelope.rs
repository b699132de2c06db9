//! Envelope construction for the carrier API.
//!
//! Every carrier call is a POST of `{apiKey, modelName, calledMethod,
//! methodProperties}`. Callers either send that envelope themselves
//! (pass-through) or use a legacy short form that is wrapped here with the
//! server-held key. One function per legacy shape picks the strategy; all of
//! them feed the same forwarding primitive in `client.rs`.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::carrier::types::{CarrierError, CarrierResult};
use crate::config::Secret;

const REDACTED: &str = "[redacted]";

/// Read-only lookup models the server key may be lent to on pass-through.
pub const KEYED_MODELS: &[&str] = &["Address", "AddressGeneral"];

/// The carrier API request wrapper.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub api_key: String,
    pub model_name: String,
    pub called_method: String,
    pub method_properties: Map<String, Value>,
}

/// Short request shapes kept for older clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LegacyLookup {
    /// Free-text city search.
    CitySearch { query: String },
    /// Warehouses of one city.
    Warehouses { city_ref: String },
}

impl LegacyLookup {
    pub fn model_name(&self) -> &'static str {
        match self {
            LegacyLookup::CitySearch { .. } => "Address",
            LegacyLookup::Warehouses { .. } => "AddressGeneral",
        }
    }

    pub fn called_method(&self) -> &'static str {
        match self {
            LegacyLookup::CitySearch { .. } => "getCities",
            LegacyLookup::Warehouses { .. } => "getWarehouses",
        }
    }

    /// Wrap into a full envelope carrying `api_key`.
    pub fn into_envelope(self, api_key: &Secret) -> Envelope {
        let model_name = self.model_name().to_string();
        let called_method = self.called_method().to_string();
        let mut method_properties = Map::new();
        match self {
            LegacyLookup::CitySearch { query } => {
                method_properties.insert("FindByString".into(), Value::String(query));
            }
            LegacyLookup::Warehouses { city_ref } => {
                method_properties.insert("CityRef".into(), Value::String(city_ref));
            }
        }

        Envelope {
            api_key: api_key.expose().to_string(),
            model_name,
            called_method,
            method_properties,
        }
    }
}

/// How a lookup body reaches the carrier.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupRequest {
    /// Caller supplied the whole envelope.
    PassThrough(Value),
    /// Caller supplied a legacy short form.
    Legacy(LegacyLookup),
}

/// Strategy for `/api/getCities`: `{query}` or a full envelope.
pub fn city_search(body: Value) -> CarrierResult<LookupRequest> {
    if is_envelope(&body) {
        return Ok(LookupRequest::PassThrough(body));
    }
    let query = string_field(&body, &["query"])
        .ok_or_else(|| CarrierError::InvalidRequest("query is required".into()))?;
    Ok(LookupRequest::Legacy(LegacyLookup::CitySearch { query }))
}

/// Strategy for `/api/getWarehouses`: `{cityRef}`, `{CityRef}` or a full envelope.
pub fn warehouse_listing(body: Value) -> CarrierResult<LookupRequest> {
    if is_envelope(&body) {
        return Ok(LookupRequest::PassThrough(body));
    }
    let city_ref = string_field(&body, &["cityRef", "CityRef"])
        .ok_or_else(|| CarrierError::InvalidRequest("cityRef is required".into()))?;
    Ok(LookupRequest::Legacy(LegacyLookup::Warehouses { city_ref }))
}

fn is_envelope(body: &Value) -> bool {
    body.get("calledMethod").is_some()
}

fn string_field(body: &Value, names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| body.get(*name).and_then(Value::as_str))
        .find(|v| !v.trim().is_empty())
        .map(str::to_string)
}

/// Put the server key into a pass-through envelope that has none.
///
/// A key supplied by the caller is never replaced, and the server key is only
/// lent to the lookup models in [`KEYED_MODELS`]. Other envelopes go out
/// unchanged and the carrier answers them on the caller's own credentials.
pub fn fill_api_key(payload: &mut Value, key: Option<&Secret>) {
    let (Some(key), Some(object)) = (key, payload.as_object_mut()) else {
        return;
    };
    let keyed = object
        .get("modelName")
        .and_then(Value::as_str)
        .is_some_and(|model| KEYED_MODELS.contains(&model));
    if !keyed {
        return;
    }
    let missing = match object.get("apiKey") {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    };
    if missing {
        object.insert("apiKey".into(), Value::String(key.expose().to_string()));
    }
}

/// Replace every occurrence of `secret` inside string values (and object keys)
/// of `value`.
pub fn redact_secret(value: &mut Value, secret: &str) {
    if secret.is_empty() {
        return;
    }
    match value {
        Value::String(s) if s.contains(secret) => *s = s.replace(secret, REDACTED),
        Value::Array(items) => items.iter_mut().for_each(|v| redact_secret(v, secret)),
        Value::Object(map) => {
            if map.keys().any(|k| k.contains(secret)) {
                let entries = std::mem::take(map);
                *map = entries
                    .into_iter()
                    .map(|(k, v)| (k.replace(secret, REDACTED), v))
                    .collect();
            }
            map.values_mut().for_each(|v| redact_secret(v, secret));
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_city_search_builds_get_cities_envelope() {
        let request = city_search(json!({"query": "Kyiv"})).unwrap();
        let LookupRequest::Legacy(lookup) = request else {
            panic!("expected legacy lookup");
        };
        let envelope = serde_json::to_value(lookup.into_envelope(&Secret::new("k"))).unwrap();

        assert_eq!(
            envelope,
            json!({
                "apiKey": "k",
                "modelName": "Address",
                "calledMethod": "getCities",
                "methodProperties": {"FindByString": "Kyiv"}
            })
        );
    }

    #[test]
    fn test_warehouse_listing_accepts_both_spellings() {
        for body in [json!({"cityRef": "X"}), json!({"CityRef": "X"})] {
            let request = warehouse_listing(body).unwrap();
            assert_eq!(
                request,
                LookupRequest::Legacy(LegacyLookup::Warehouses { city_ref: "X".into() })
            );
        }

        let envelope = LegacyLookup::Warehouses { city_ref: "X".into() }
            .into_envelope(&Secret::new("k"));
        assert_eq!(envelope.called_method, "getWarehouses");
        assert_eq!(envelope.model_name, "AddressGeneral");
        assert_eq!(envelope.method_properties["CityRef"], "X");
    }

    #[test]
    fn test_full_envelope_on_legacy_route_is_passed_through() {
        let body = json!({
            "apiKey": "client",
            "modelName": "Address",
            "calledMethod": "getCities",
            "methodProperties": {}
        });
        assert_eq!(
            city_search(body.clone()).unwrap(),
            LookupRequest::PassThrough(body)
        );
    }

    #[test]
    fn test_missing_legacy_parameter_is_rejected() {
        assert!(matches!(
            city_search(json!({"query": "   "})),
            Err(CarrierError::InvalidRequest(_))
        ));
        assert!(matches!(
            warehouse_listing(json!({})),
            Err(CarrierError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_fill_api_key_only_when_absent() {
        let key = Secret::new("server");

        let mut payload = json!({"modelName": "Address", "calledMethod": "getCities", "apiKey": ""});
        fill_api_key(&mut payload, Some(&key));
        assert_eq!(payload["apiKey"], "server");

        let mut payload = json!({"modelName": "Address", "calledMethod": "getCities", "apiKey": "client"});
        fill_api_key(&mut payload, Some(&key));
        assert_eq!(payload["apiKey"], "client");

        let mut payload = json!({"modelName": "Address", "calledMethod": "getCities"});
        fill_api_key(&mut payload, None);
        assert!(payload.get("apiKey").is_none());
    }

    #[test]
    fn test_server_key_is_not_lent_to_other_models() {
        let key = Secret::new("server");

        let mut payload = json!({"modelName": "AddressGeneral", "calledMethod": "getWarehouses"});
        fill_api_key(&mut payload, Some(&key));
        assert_eq!(payload["apiKey"], "server");

        for model in [json!("InternetDocument"), json!("Counterparty"), Value::Null] {
            let mut payload = json!({"modelName": model, "calledMethod": "save"});
            fill_api_key(&mut payload, Some(&key));
            assert!(payload.get("apiKey").is_none(), "key lent to {}", payload);
        }
    }

    #[test]
    fn test_redact_secret_walks_nested_values() {
        let mut value = json!({
            "success": false,
            "errors": ["API key secret-1 is invalid"],
            "echo": {"apiKey": "secret-1", "secret-1": 1},
            "count": 3
        });
        redact_secret(&mut value, "secret-1");

        let text = value.to_string();
        assert!(!text.contains("secret-1"));
        assert_eq!(value["echo"]["apiKey"], REDACTED);
        assert_eq!(value["count"], 3);
    }
}
