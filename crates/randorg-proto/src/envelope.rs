//! Request and response envelopes.
//!
//! Requests are always `{"jsonrpc":"2.0","method":..,"params":{..},"id":..}`.
//! Responses are decoded into the [`RpcResponse`] tagged union; anything that
//! is neither a success nor a well-formed error is a [`ProtoError::Format`]
//! carrying the raw payload.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::{ProtoError, Result};
use crate::result::RpcResult;

/// JSON-RPC protocol version sent with every request.
pub const JSONRPC_VERSION: &str = "2.0";

/// Name of the parameter carrying the API key.
const API_KEY_PARAM: &str = "apiKey";

/// An outgoing request envelope.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    /// Always [`JSONRPC_VERSION`].
    pub jsonrpc: String,
    /// Method name.
    pub method: String,
    /// Named parameters, including `apiKey`.
    pub params: Map<String, Value>,
    /// Per-request identifier.
    pub id: String,
}

impl RpcRequest {
    /// Builds a request with a fresh id, injecting the API key into `params`.
    ///
    /// # Errors
    ///
    /// Returns [`ProtoError::Encoding`] if `params` cannot be serialized or does
    /// not serialize to a JSON object.
    pub fn new<P>(method: impl Into<String>, params: &P, api_key: &str) -> Result<Self>
    where
        P: Serialize + ?Sized,
    {
        let mut params = match serde_json::to_value(params)
            .map_err(|e| ProtoError::Encoding(e.to_string()))?
        {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                return Err(ProtoError::Encoding(format!(
                    "params must serialize to an object, got {}",
                    json_kind(&other)
                )));
            }
        };
        params.insert(API_KEY_PARAM.to_string(), Value::String(api_key.to_string()));

        Ok(Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
            id: Uuid::new_v4().to_string(),
        })
    }

    /// Serializes the envelope.
    ///
    /// # Errors
    ///
    /// Returns [`ProtoError::Encoding`] if serialization fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| ProtoError::Encoding(e.to_string()))
    }
}

impl fmt::Debug for RpcRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<&str> = self
            .params
            .keys()
            .map(String::as_str)
            .filter(|k| *k != API_KEY_PARAM)
            .collect();
        f.debug_struct("RpcRequest")
            .field("method", &self.method)
            .field("params", &params)
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// An error object returned by the service. Code and message are kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    /// Service error code.
    pub code: i64,
    /// Service error message.
    pub message: String,
    /// Optional extra data attached by the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "API Error Code {}: {:?}.", self.code, self.message)
    }
}

/// A decoded response.
#[derive(Debug, Clone, PartialEq)]
pub enum RpcResponse {
    /// The service returned a `result` object.
    Success(RpcResult),
    /// The service returned an `error` object.
    Failure(RpcError),
}

impl RpcResponse {
    /// Converts into a `Result`, with the service error as the error side.
    ///
    /// # Errors
    ///
    /// Returns the [`RpcError`] for a failure response.
    pub fn into_result(self) -> std::result::Result<RpcResult, RpcError> {
        match self {
            Self::Success(result) => Ok(result),
            Self::Failure(error) => Err(error),
        }
    }
}

#[derive(Deserialize)]
struct RawResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
}

/// Encodes a request envelope for `method` with the API key injected.
///
/// # Errors
///
/// Returns [`ProtoError::Encoding`] if `params` cannot be serialized.
pub fn encode<P>(method: &str, params: &P, api_key: &str) -> Result<Vec<u8>>
where
    P: Serialize + ?Sized,
{
    RpcRequest::new(method, params, api_key)?.to_bytes()
}

/// Decodes a response body.
///
/// A `result` that is a JSON object wins. Otherwise the `error` object must
/// carry an integer `code` and a string `message`.
///
/// # Errors
///
/// Returns [`ProtoError::Format`] with the raw payload if the body is not
/// JSON, or matches neither envelope.
pub fn decode(bytes: &[u8]) -> Result<RpcResponse> {
    let raw: RawResponse = serde_json::from_slice(bytes)
        .map_err(|e| ProtoError::format(format!("invalid response document: {e}"), bytes))?;

    if let Some(result @ Value::Object(_)) = raw.result {
        let result = serde_json::from_value::<RpcResult>(result)
            .map_err(|e| ProtoError::format(format!("malformed result object: {e}"), bytes))?;
        return Ok(RpcResponse::Success(result));
    }

    match raw.error {
        Some(error) => serde_json::from_value::<RpcError>(error)
            .map(RpcResponse::Failure)
            .map_err(|e| ProtoError::format(format!("malformed error object: {e}"), bytes)),
        None => Err(ProtoError::format(
            "response has neither a result object nor an error object",
            bytes,
        )),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{BlobParams, IntegerParams, UsageParams};
    use serde_json::json;
    use test_case::test_case;

    fn parse(bytes: &[u8]) -> Value {
        serde_json::from_slice(bytes).expect("valid json")
    }

    #[test]
    fn encode_wraps_params_and_injects_key() {
        let params = IntegerParams {
            n: 5,
            min: 1,
            max: 6,
        };
        let bytes = encode("generateIntegers", &params, "00000000-key").expect("encode");
        let doc = parse(&bytes);

        assert_eq!(doc["jsonrpc"], "2.0");
        assert_eq!(doc["method"], "generateIntegers");
        assert_eq!(doc["params"], json!({"n": 5, "min": 1, "max": 6, "apiKey": "00000000-key"}));
        let id = doc["id"].as_str().expect("string id");
        assert!(Uuid::parse_str(id).is_ok());
    }

    #[test]
    fn encode_empty_params() {
        let doc = parse(&encode("getUsage", &UsageParams {}, "k").expect("encode"));
        assert_eq!(doc["params"], json!({"apiKey": "k"}));
    }

    #[test]
    fn encode_unit_params_become_empty_object() {
        let doc = parse(&encode("getUsage", &(), "k").expect("encode"));
        assert_eq!(doc["params"], json!({"apiKey": "k"}));
    }

    #[test]
    fn encode_rejects_non_object_params() {
        let err = encode("generateIntegers", &[1, 2, 3], "k").expect_err("should fail");
        assert!(matches!(err, ProtoError::Encoding(ref msg) if msg.contains("array")));
    }

    #[test]
    fn encode_rejects_unserializable_params() {
        let mut params = std::collections::BTreeMap::new();
        params.insert(vec![1u8], 1);
        let err = encode("generateIntegers", &params, "k").expect_err("should fail");
        assert!(matches!(err, ProtoError::Encoding(_)));
    }

    #[test]
    fn each_request_gets_fresh_id() {
        let a = RpcRequest::new("getUsage", &UsageParams {}, "k").expect("request");
        let b = RpcRequest::new("getUsage", &UsageParams {}, "k").expect("request");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn request_debug_redacts_api_key() {
        let request =
            RpcRequest::new("generateBlobs", &BlobParams { n: 1, size: 8 }, "secret-key")
                .expect("request");
        let debug = format!("{request:?}");
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("generateBlobs"));
    }

    #[test]
    fn decode_success() {
        let body =
            br#"{"jsonrpc":"2.0","result":{"random":{"data":[4,2]},"bitsLeft":100},"id":"abc"}"#;
        let RpcResponse::Success(result) = decode(body).expect("decode") else {
            panic!("expected success");
        };
        assert_eq!(result.usage.bits_left, Some(100));
        assert_eq!(result.into_data().expect("data"), vec![json!(4), json!(2)]);
    }

    #[test]
    fn decode_api_error_verbatim() {
        let body =
            br#"{"jsonrpc":"2.0","error":{"code":202,"message":"Invalid API key."},"id":"abc"}"#;
        let response = decode(body).expect("decode");
        let error = response.into_result().expect_err("failure");
        assert_eq!(error.code, 202);
        assert_eq!(error.message, "Invalid API key.");
        assert_eq!(error.to_string(), "API Error Code 202: \"Invalid API key.\".");
    }

    #[test]
    fn decode_error_keeps_data() {
        let body = br#"{"error":{"code":300,"message":"bad range","data":[1,10]}}"#;
        let RpcResponse::Failure(error) = decode(body).expect("decode") else {
            panic!("expected failure");
        };
        assert_eq!(error.data, Some(json!([1, 10])));
    }

    #[test]
    fn result_object_wins_over_error() {
        let body = br#"{"result":{"random":{"data":[]}},"error":{"code":1,"message":"x"}}"#;
        assert!(matches!(decode(body), Ok(RpcResponse::Success(_))));
    }

    #[test]
    fn non_object_result_falls_back_to_error() {
        let body = br#"{"result":null,"error":{"code":500,"message":"down"}}"#;
        assert!(matches!(decode(body), Ok(RpcResponse::Failure(RpcError { code: 500, .. }))));
    }

    #[test_case(b"not json at all" ; "not json")]
    #[test_case(b"{\"result\":" ; "truncated")]
    #[test_case(b"[1,2,3]" ; "array document")]
    #[test_case(b"{}" ; "empty object")]
    #[test_case(b"{\"result\":42}" ; "scalar result no error")]
    #[test_case(b"{\"error\":{\"code\":\"x\",\"message\":\"m\"}}" ; "string code")]
    #[test_case(b"{\"error\":{\"code\":1}}" ; "missing message")]
    #[test_case(b"{\"error\":\"boom\"}" ; "error not an object")]
    fn decode_format_errors_keep_payload(body: &[u8]) {
        match decode(body) {
            Err(ProtoError::Format { payload, .. }) => {
                assert_eq!(payload.as_bytes(), body);
            }
            other => panic!("expected format error, got {other:?}"),
        }
    }

    #[test_case(json!({"bitsLeft": 199_984.0}), Some(199_984) ; "float counter")]
    #[test_case(json!({"bitsLeft": "lots"}), None ; "string counter")]
    #[test_case(json!({"creationTime": 7}), None ; "numeric timestamp")]
    fn decode_tolerates_mistyped_usage_fields(usage: Value, bits_left: Option<i64>) {
        let Value::Object(mut result) = usage else {
            panic!("usage must be an object");
        };
        result.insert("random".into(), json!({"data": [1, 2]}));
        let body = serde_json::to_vec(&json!({"jsonrpc": "2.0", "result": result, "id": "1"}))
            .expect("response");

        let result = decode(&body).expect("decode").into_result().expect("success");
        assert_eq!(result.usage.bits_left, bits_left);
        assert_eq!(result.usage.creation_time, None);
        assert_eq!(result.into_data().expect("data"), vec![json!(1), json!(2)]);
    }

    #[test]
    fn encode_then_decode_keeps_data_order() {
        let params = IntegerParams {
            n: 4,
            min: -5,
            max: 5,
        };
        let request = RpcRequest::new("generateIntegers", &params, "k").expect("request");
        let data = json!([3, -5, 0, 5]);
        let body = serde_json::to_vec(&json!({
            "jsonrpc": JSONRPC_VERSION,
            "result": {"random": {"data": data.clone()}},
            "id": request.id,
        }))
        .expect("response");

        let result = decode(&body).expect("decode").into_result().expect("success");
        assert_eq!(Value::Array(result.into_data().expect("data")), data);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn decode_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
                let _ = decode(&bytes);
            }

            #[test]
            fn string_data_survives_round_trip(
                data in prop::collection::vec("[a-zA-Z0-9]{1,20}", 1..50)
            ) {
                let body = serde_json::to_vec(&json!({
                    "jsonrpc": "2.0",
                    "result": {"random": {"data": data.clone()}},
                    "id": "1",
                })).expect("response");
                let result = decode(&body).expect("decode").into_result().expect("success");
                let decoded: Vec<String> = result
                    .into_data()
                    .expect("data")
                    .into_iter()
                    .map(|v| v.as_str().map(ToOwned::to_owned).expect("string"))
                    .collect();
                prop_assert_eq!(decoded, data);
            }
        }
    }
}
