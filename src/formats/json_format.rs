use crate::domain::model::Record;
use crate::domain::ports::Codec;
use crate::utils::error::{ConvertError, Result};
use serde_json::Value;

const FORMAT: &str = "json";

/// A JSON array of objects, written compactly.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl JsonCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Codec for JsonCodec {
    fn name(&self) -> &'static str {
        FORMAT
    }

    fn deserialise(&self, text: &str) -> Result<Record> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| ConvertError::decode(FORMAT, e.to_string()))?;

        let items = match value {
            Value::Array(items) => items,
            other => {
                return Err(ConvertError::decode(
                    FORMAT,
                    format!("expected an array of objects, found {}", kind(&other)),
                ))
            }
        };

        let mut rows = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            match item {
                Value::Object(row) => rows.push(row),
                other => {
                    return Err(ConvertError::decode(
                        FORMAT,
                        format!("element {} is {}, expected an object", index, kind(&other)),
                    ))
                }
            }
        }

        Ok(Record::new(rows))
    }

    fn serialise(&self, record: &Record) -> Result<String> {
        serde_json::to_string(record).map_err(|e| ConvertError::encode(FORMAT, e.to_string()))
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
