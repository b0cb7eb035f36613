use crate::domain::model::{Record, Row};
use crate::domain::ports::Codec;
use crate::utils::error::{ConvertError, Result};
use serde_json::Value;
use std::collections::HashSet;

const FORMAT: &str = "csv";

/// Header-first CSV. Every value read is text; the first row's keys become the header on write.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvCodec;

impl CsvCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Codec for CsvCodec {
    fn name(&self) -> &'static str {
        FORMAT
    }

    fn deserialise(&self, text: &str) -> Result<Record> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| ConvertError::decode(FORMAT, e.to_string()))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut seen = HashSet::new();
        for name in &headers {
            if !seen.insert(name.as_str()) {
                return Err(ConvertError::decode(
                    FORMAT,
                    format!("duplicate header field '{}'", name),
                ));
            }
        }

        let mut rows = Vec::new();
        for result in reader.records() {
            let fields = result.map_err(|e| ConvertError::decode(FORMAT, e.to_string()))?;
            let row: Row = headers
                .iter()
                .zip(fields.iter())
                .map(|(name, field)| (name.clone(), Value::String(field.to_string())))
                .collect();
            rows.push(row);
        }

        tracing::debug!("Read {} CSV rows with {} columns", rows.len(), headers.len());
        Ok(Record::new(rows))
    }

    fn serialise(&self, record: &Record) -> Result<String> {
        let first = record.first().ok_or_else(|| {
            ConvertError::encode(FORMAT, "cannot derive a header from an empty record")
        })?;
        let header: Vec<&str> = first.keys().map(String::as_str).collect();
        if header.is_empty() {
            return Err(ConvertError::encode(
                FORMAT,
                "cannot derive a header from a row with no fields",
            ));
        }

        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::CRLF)
            .quote_style(csv::QuoteStyle::Necessary)
            .from_writer(Vec::new());

        writer
            .write_record(&header)
            .map_err(|e| ConvertError::encode(FORMAT, e.to_string()))?;

        for (index, row) in record.iter().enumerate() {
            check_same_keys(&header, row, index)?;
            let mut fields = Vec::with_capacity(header.len());
            for name in &header {
                fields.push(field_text(name, &row[*name], index)?);
            }
            writer
                .write_record(&fields)
                .map_err(|e| ConvertError::encode(FORMAT, e.to_string()))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| ConvertError::encode(FORMAT, e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| ConvertError::encode(FORMAT, e.to_string()))
    }
}

// 所有列必須與第一列的欄位集合相同，順序可以不同
fn check_same_keys(header: &[&str], row: &Row, index: usize) -> Result<()> {
    let missing: Vec<&str> = header
        .iter()
        .copied()
        .filter(|name| !row.contains_key(*name))
        .collect();
    let extra: Vec<&str> = row
        .keys()
        .map(String::as_str)
        .filter(|name| !header.contains(name))
        .collect();

    if missing.is_empty() && extra.is_empty() {
        return Ok(());
    }

    Err(ConvertError::encode(
        FORMAT,
        format!(
            "row {} has different fields from the header (missing: [{}], extra: [{}])",
            index,
            missing.join(", "),
            extra.join(", ")
        ),
    ))
}

fn field_text(name: &str, value: &Value, index: usize) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        Value::Array(_) | Value::Object(_) => Err(ConvertError::encode(
            FORMAT,
            format!(
                "field '{}' in row {} holds a nested value, which CSV cannot represent",
                name, index
            ),
        )),
    }
}
