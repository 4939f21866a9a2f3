//! Blocking JSON-RPC 2.0 client.
//!
//! Every call is a single HTTP POST. Whatever happens on the wire is folded
//! into an [`RpcOutcome`]; callers never see a Rust error from [`invoke`] or
//! [`RpcClient::invoke`].

use log::{debug, warn};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error as StdError;
use std::time::Duration;
use thiserror::Error;

pub const JSONRPC_VERSION: &str = "2.0";

/// Id placed in every envelope sent by [`RpcClient::invoke`].
pub const DEFAULT_REQUEST_ID: u64 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub id: u64,
    pub method: String,
    /// `None` keeps the field off the wire entirely, `Some(vec![])` sends `[]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Vec<Value>>,
}

impl RpcRequest {
    pub fn new(
        id: u64,
        method: impl Into<String>,
        params: Option<Vec<Value>>,
    ) -> Result<Self, InvokeError> {
        let method = method.into();
        if method.is_empty() {
            return Err(InvokeError::EmptyMethod);
        }

        Ok(Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            method,
            params,
        })
    }

    pub fn to_json(&self) -> Result<String, InvokeError> {
        serde_json::to_string(self).map_err(InvokeError::Serialize)
    }
}

/// JSON-RPC error member, as a server may embed it in an HTTP 200 payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Result of one invocation. Exactly one variant is produced per call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RpcOutcome {
    /// HTTP 200 with a JSON body. The body may still carry a JSON-RPC `error`.
    Success { payload: Value },
    /// The server answered with a non-200 status. `body` is the raw text.
    HttpError { status: u16, body: String },
    /// No interpretable HTTP response was obtained.
    TransportError { message: String },
}

impl RpcOutcome {
    pub fn kind(&self) -> &'static str {
        match self {
            RpcOutcome::Success { .. } => "success",
            RpcOutcome::HttpError { .. } => "http_error",
            RpcOutcome::TransportError { .. } => "transport_error",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RpcOutcome::Success { .. })
    }

    pub fn payload(&self) -> Option<&Value> {
        match self {
            RpcOutcome::Success { payload } => Some(payload),
            _ => None,
        }
    }

    /// The `result` member of a successful payload.
    pub fn result(&self) -> Option<&Value> {
        self.payload().and_then(|payload| payload.get("result"))
    }

    /// The JSON-RPC `error` member of a successful payload, if it is well formed.
    pub fn rpc_error(&self) -> Option<RpcErrorObject> {
        let error = self.payload()?.get("error")?;
        serde_json::from_value(error.clone()).ok()
    }
}

impl From<InvokeError> for RpcOutcome {
    fn from(err: InvokeError) -> Self {
        let mut message = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        RpcOutcome::TransportError { message }
    }
}

/// Failures that end up as [`RpcOutcome::TransportError`].
#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("method name must not be empty")]
    EmptyMethod,

    #[error("timeout must be a positive number of seconds, got {0}")]
    InvalidTimeout(f64),

    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("failed to serialize request")]
    Serialize(#[source] serde_json::Error),

    #[error("request timed out after {after:?}")]
    Timeout {
        after: Duration,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to connect to {url}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to read response body")]
    Body(#[source] reqwest::Error),

    #[error("failed to parse response body as JSON")]
    Parse(#[source] serde_json::Error),
}

/// Converts a timeout in seconds, rejecting zero, negative and non-finite values.
pub fn timeout_from_secs(secs: f64) -> Result<Duration, InvokeError> {
    if secs.is_nan() || secs <= 0.0 {
        return Err(InvokeError::InvalidTimeout(secs));
    }
    Duration::try_from_secs_f64(secs).map_err(|_| InvokeError::InvalidTimeout(secs))
}

#[derive(Debug, Clone)]
pub struct RpcClient {
    client: Client,
    url: String,
    timeout: Duration,
}

impl RpcClient {
    pub fn new(url: impl Into<String>, timeout_secs: f64) -> Result<Self, InvokeError> {
        let timeout = timeout_from_secs(timeout_secs)?;
        // 3xx responses come back as HttpError and are never followed.
        let client = Client::builder()
            .timeout(timeout)
            .redirect(Policy::none())
            .build()
            .map_err(InvokeError::Client)?;

        Ok(Self {
            client,
            url: url.into(),
            timeout,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Sends `method` once and classifies what came back.
    pub fn invoke(&self, method: &str, params: Option<Vec<Value>>) -> RpcOutcome {
        match self.try_invoke(method, params) {
            Ok(outcome) => outcome,
            Err(err) => {
                let outcome = RpcOutcome::from(err);
                if let RpcOutcome::TransportError { message } = &outcome {
                    warn!("{} {}: {}", self.url, method, message);
                }
                outcome
            }
        }
    }

    fn try_invoke(
        &self,
        method: &str,
        params: Option<Vec<Value>>,
    ) -> Result<RpcOutcome, InvokeError> {
        let request = RpcRequest::new(DEFAULT_REQUEST_ID, method, params)?;
        let body = request.to_json()?;
        debug!("POST {} {}", self.url, body);

        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .map_err(|err| self.classify_send_error(err))?;

        let status = response.status();
        debug!("{} {} -> HTTP {}", self.url, method, status);

        let text = response.text().map_err(|err| {
            if err.is_timeout() {
                InvokeError::Timeout {
                    after: self.timeout,
                    source: err,
                }
            } else {
                InvokeError::Body(err)
            }
        })?;

        if status != StatusCode::OK {
            return Ok(RpcOutcome::HttpError {
                status: status.as_u16(),
                body: text,
            });
        }

        let payload = serde_json::from_str(&text).map_err(InvokeError::Parse)?;
        Ok(RpcOutcome::Success { payload })
    }

    fn classify_send_error(&self, err: reqwest::Error) -> InvokeError {
        if err.is_timeout() {
            InvokeError::Timeout {
                after: self.timeout,
                source: err,
            }
        } else if err.is_connect() {
            InvokeError::Connect {
                url: self.url.clone(),
                source: err,
            }
        } else {
            InvokeError::Request {
                url: self.url.clone(),
                source: err,
            }
        }
    }
}

/// One-shot call with a freshly built client.
pub fn invoke(
    endpoint: &str,
    method: &str,
    params: Option<Vec<Value>>,
    timeout_secs: f64,
) -> RpcOutcome {
    match RpcClient::new(endpoint, timeout_secs) {
        Ok(client) => client.invoke(method, params),
        Err(err) => err.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn omitted_params_leave_no_params_key() {
        let request = RpcRequest::new(1, "getHealth", None).unwrap();
        let body: Value = serde_json::from_str(&request.to_json().unwrap()).unwrap();

        assert_eq!(body, json!({"jsonrpc": "2.0", "id": 1, "method": "getHealth"}));
        assert!(body.get("params").is_none());
    }

    #[test]
    fn empty_params_are_sent_as_empty_array() {
        let request = RpcRequest::new(1, "getHealth", Some(vec![])).unwrap();
        let text = request.to_json().unwrap();

        assert!(text.contains(r#""params":[]"#));
    }

    #[test]
    fn envelope_fields_are_in_wire_order() {
        let request = RpcRequest::new(
            7,
            "getAccountInfo",
            Some(vec![json!("11111111111111111111111111111111")]),
        )
        .unwrap();

        assert_eq!(
            request.to_json().unwrap(),
            concat!(
                r#"{"jsonrpc":"2.0","id":7,"method":"getAccountInfo","#,
                r#""params":["11111111111111111111111111111111"]}"#
            )
        );
    }

    #[test]
    fn empty_method_is_rejected() {
        assert!(matches!(
            RpcRequest::new(1, "", None),
            Err(InvokeError::EmptyMethod)
        ));
    }

    #[test]
    fn invalid_timeouts_are_rejected() {
        for secs in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(timeout_from_secs(secs).is_err(), "{secs} should be rejected");
        }
        assert_eq!(timeout_from_secs(0.5).unwrap(), Duration::from_millis(500));
    }

    #[test]
    fn invalid_arguments_become_transport_errors_without_network() {
        let outcome = invoke("http://127.0.0.1:9", "", None, 1.0);
        match outcome {
            RpcOutcome::TransportError { message } => {
                assert_eq!(message, "method name must not be empty")
            }
            other => panic!("unexpected outcome: {other:?}"),
        }

        let outcome = invoke("http://127.0.0.1:9", "getHealth", None, 0.0);
        assert_eq!(outcome.kind(), "transport_error");
    }

    #[test]
    fn malformed_url_is_a_transport_error() {
        let outcome = invoke("not a url", "getHealth", None, 1.0);
        match outcome {
            RpcOutcome::TransportError { message } => assert!(!message.is_empty()),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn rpc_error_is_read_from_success_payload() {
        let outcome = RpcOutcome::Success {
            payload: json!({
                "jsonrpc": "2.0",
                "id": 1,
                "error": {"code": -32601, "message": "Method not found"}
            }),
        };

        assert!(outcome.is_success());
        assert!(outcome.result().is_none());
        let error = outcome.rpc_error().unwrap();
        assert_eq!(error.code, -32601);
        assert_eq!(error.message, "Method not found");
    }

    #[test]
    fn outcomes_serialize_with_kind_tag() {
        let outcome = RpcOutcome::HttpError {
            status: 500,
            body: "internal error".to_string(),
        };

        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"kind": "http_error", "status": 500, "body": "internal error"})
        );
    }
}
