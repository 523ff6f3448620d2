//! JSON-RPC 2.0 envelopes as they appear on the server's stdin/stdout.

use serde_json::{Value, json};

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;
pub const RESOURCE_NOT_FOUND: i64 = -32002;
pub const ACCESS_DENIED: i64 = -32003;

/// One decoded line.
#[derive(Debug, Clone, PartialEq)]
pub enum Incoming {
    Request {
        id: Value,
        method: String,
        params: Value,
    },
    Notification {
        method: String,
    },
    /// A reply to something we sent; this server never sends requests.
    Response {
        id: Value,
    },
    Invalid {
        id: Value,
    },
}

impl Incoming {
    pub fn parse(line: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(line)?;
        Ok(Self::classify(value))
    }

    fn classify(value: Value) -> Self {
        let Value::Object(mut obj) = value else {
            return Incoming::Invalid { id: Value::Null };
        };
        let id = obj.remove("id");
        if obj.get("jsonrpc").and_then(Value::as_str) != Some("2.0") {
            return Incoming::Invalid {
                id: id.unwrap_or(Value::Null),
            };
        }
        match (obj.remove("method"), id) {
            (Some(Value::String(method)), Some(id)) => Incoming::Request {
                id,
                method,
                params: obj.remove("params").unwrap_or(Value::Null),
            },
            (Some(Value::String(method)), None) => Incoming::Notification { method },
            (None, Some(id)) if obj.contains_key("result") || obj.contains_key("error") => {
                Incoming::Response { id }
            }
            (_, id) => Incoming::Invalid {
                id: id.unwrap_or(Value::Null),
            },
        }
    }
}

pub fn success(id: Value, result: Value) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "result": result })
}

pub fn failure(id: Value, code: i64, message: impl Into<String>) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": { "code": code, "message": message.into() }
    })
}
