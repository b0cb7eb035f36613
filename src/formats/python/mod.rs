//! Python literal text (`repr` of a list of dicts), as read by `ast.literal_eval`.

mod parser;
mod repr;

pub use parser::{parse, Literal, ParseError};

use crate::domain::model::{Record, Row};
use crate::domain::ports::Codec;
use crate::utils::error::{ConvertError, Result};
use serde_json::{Number, Value};

const FORMAT: &str = "python";

#[derive(Debug, Clone, Copy, Default)]
pub struct PythonLiteralCodec;

impl PythonLiteralCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Codec for PythonLiteralCodec {
    fn name(&self) -> &'static str {
        FORMAT
    }

    fn deserialise(&self, text: &str) -> Result<Record> {
        let literal = parse(text).map_err(|e| ConvertError::decode(FORMAT, e.to_string()))?;

        let items = match literal {
            Literal::List(items) | Literal::Tuple(items) => items,
            other => {
                return Err(ConvertError::decode(
                    FORMAT,
                    format!("expected a list of dicts, found a {}", other.type_name()),
                ))
            }
        };

        let mut rows = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            let entries = match item {
                Literal::Dict(entries) => entries,
                other => {
                    return Err(ConvertError::decode(
                        FORMAT,
                        format!("element {} is a {}, expected a dict", index, other.type_name()),
                    ))
                }
            };
            let row = to_object(entries)
                .map_err(|e| ConvertError::decode(FORMAT, format!("element {}: {}", index, e)))?;
            rows.push(row);
        }

        Ok(Record::new(rows))
    }

    fn serialise(&self, record: &Record) -> Result<String> {
        let mut out = String::from("[");
        for (i, row) in record.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            repr::write_dict(row, &mut out);
        }
        out.push(']');
        Ok(out)
    }
}

fn to_object(entries: Vec<(Literal, Literal)>) -> std::result::Result<Row, String> {
    let mut row = Row::new();
    for (key, value) in entries {
        let key = match key {
            Literal::Str(key) => key,
            other => {
                return Err(format!(
                    "dict keys must be strings, found a {} key",
                    other.type_name()
                ))
            }
        };
        // 重複的 key 與 Python 相同：保留第一次出現的位置，值以最後一次為準
        row.insert(key, to_value(value)?);
    }
    Ok(row)
}

fn to_value(literal: Literal) -> std::result::Result<Value, String> {
    match literal {
        Literal::Str(s) => Ok(Value::String(s)),
        Literal::Bool(b) => Ok(Value::Bool(b)),
        Literal::None => Ok(Value::Null),
        Literal::Int(n) => {
            if let Ok(n) = i64::try_from(n) {
                Ok(Value::Number(n.into()))
            } else if let Ok(n) = u64::try_from(n) {
                Ok(Value::Number(n.into()))
            } else {
                Err(format!("integer {} does not fit in 64 bits", n))
            }
        }
        Literal::Float(f) => Number::from_f64(f)
            .map(Value::Number)
            .ok_or_else(|| format!("float {} cannot be represented", f)),
        Literal::List(items) | Literal::Tuple(items) => items
            .into_iter()
            .map(to_value)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map(Value::Array),
        Literal::Set(items) => {
            let mut values: Vec<Value> = Vec::with_capacity(items.len());
            for item in items {
                if matches!(item, Literal::List(_) | Literal::Dict(_) | Literal::Set(_)) {
                    return Err(format!("unhashable type in set: '{}'", item.type_name()));
                }
                let value = to_value(item)?;
                if !values.contains(&value) {
                    values.push(value);
                }
            }
            Ok(Value::Array(values))
        }
        Literal::Dict(entries) => to_object(entries).map(Value::Object),
    }
}
