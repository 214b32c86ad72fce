//! Extraction and validation of the `todo` request parameter.
//!
//! The parameter travels as a JSON-encoded string, either as a form field
//! (`todo=%7B%7D`) or as a member of a JSON body (`{"todo":"{}"}`). Checks run
//! in a fixed order: presence, then type, then JSON syntax.

use serde_json::Value;

use super::error::TodoError;
use crate::request::Request;

const PARAM: &str = "todo";

/// Decodes the body and returns the parsed list contents carried by `todo`.
pub fn todo_contents(req: &Request) -> Result<Value, TodoError> {
    let raw = raw_param(req)?;
    validate(raw)
}

/// The `todo` member of the body as the client sent it, before validation.
fn raw_param(req: &Request) -> Result<Option<Value>, TodoError> {
    let Some(content_type) = req.content_type() else {
        return Ok(None);
    };

    if content_type == "application/json" || content_type.ends_with("+json") {
        if req.body().iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        let body: Value = serde_json::from_slice(req.body()).map_err(TodoError::InvalidJson)?;
        return Ok(match body {
            Value::Object(mut fields) => fields.remove(PARAM),
            _ => None,
        });
    }

    if content_type == "application/x-www-form-urlencoded" {
        let mut values: Vec<Value> = form_urlencoded::parse(req.body())
            .filter(|(key, _)| key == PARAM)
            .map(|(_, value)| Value::String(value.into_owned()))
            .collect();
        // A repeated field decodes to an array, as a urlencoded parser would.
        return Ok(match values.len() {
            0 => None,
            1 => values.pop(),
            _ => Some(Value::Array(values)),
        });
    }

    Ok(None)
}

fn validate(raw: Option<Value>) -> Result<Value, TodoError> {
    let raw = match raw {
        None => return Err(TodoError::EmptyParam),
        Some(value) if is_falsy(&value) => return Err(TodoError::EmptyParam),
        Some(value) => value,
    };
    let Value::String(text) = raw else {
        return Err(TodoError::WrongParamType);
    };
    serde_json::from_str(&text).map_err(TodoError::InvalidJson)
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}
