//! Minimal JSON-RPC 2.0 transport over HTTP.

use log::debug;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::errors::RpcClientError;

#[derive(Deserialize)]
struct RpcResponse {
    /// Absent and `null` results both end up as `Value::Null`.
    #[serde(default)]
    result: Value,
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// JSON-RPC client bound to one endpoint.
#[derive(Clone)]
pub struct RpcClient {
    http: reqwest::Client,
    endpoint: String,
}

impl RpcClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    async fn call_raw(&self, method: &str, params: Value) -> Result<Value, RpcClientError> {
        let request = json!({
            "jsonrpc": "2.0",
            "id": Uuid::new_v4().to_string(),
            "method": method,
            "params": params,
        });
        debug!("RPC call {method}");

        let response: RpcResponse = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(error) = response.error {
            return Err(RpcClientError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        Ok(response.result)
    }

    /// Issues a single JSON-RPC call and deserializes its `result`.
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, RpcClientError> {
        let result = self.call_raw(method, params).await?;
        if result.is_null() {
            return Err(RpcClientError::MalformedResponse(format!(
                "{method} returned neither result nor error"
            )));
        }
        serde_json::from_value(result).map_err(|e| {
            RpcClientError::MalformedResponse(format!("{method} result did not parse: {e}"))
        })
    }

    /// Like [`call`](Self::call), but a `null` result is `None` (e.g. a
    /// receipt that does not exist yet).
    pub async fn call_nullable<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<Option<T>, RpcClientError> {
        let result = self.call_raw(method, params).await?;
        if result.is_null() {
            return Ok(None);
        }
        serde_json::from_value(result).map(Some).map_err(|e| {
            RpcClientError::MalformedResponse(format!("{method} result did not parse: {e}"))
        })
    }
}
