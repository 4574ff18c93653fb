// Serialization stage: blueprint document <-> UTF-8 JSON bytes.
use serde::Deserialize;
use serde_json::Value;

use crate::core::error::{Error, ErrorKind};

/// The only structural rule the codec enforces: a blueprint is a JSON object.
pub fn ensure_object(document: &Value) -> Result<(), Error> {
    if document.is_object() {
        return Ok(());
    }
    Err(Error::new(ErrorKind::InvalidDocument)
        .with_message(format!(
            "blueprint must be a JSON object, got {}",
            value_kind(document)
        ))
        .with_hint("Wrap the value in an object, e.g. {\"blueprint\": ...}."))
}

pub fn to_json_bytes(document: &Value) -> Result<Vec<u8>, Error> {
    serde_json::to_vec(document).map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("failed to serialize blueprint")
            .with_source(err)
    })
}

pub fn from_json_bytes(bytes: &[u8]) -> Result<Value, Error> {
    parse_value(bytes).map_err(|err| {
        Error::new(ErrorKind::Parse)
            .with_message(format!("blueprint payload is not valid JSON: {err}"))
            .with_source(err)
    })
}

/// Parse one JSON value with no nesting limit. Numbers keep their literal text
/// and the stack grows on the heap for deep documents.
pub(crate) fn parse_value(bytes: &[u8]) -> Result<Value, serde_json::Error> {
    let mut de = serde_json::Deserializer::from_slice(bytes);
    de.disable_recursion_limit();
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(value)
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
