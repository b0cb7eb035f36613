use crate::domain::model::Record;
use crate::domain::ports::Codec;
use crate::utils::error::{ConvertError, Result};

/// Placeholder for a format that is recognised but has no codec yet.
///
/// Registering it is always fine; using it fails with `NotImplemented`.
#[derive(Debug, Clone, Copy)]
pub struct UnimplementedCodec {
    format: &'static str,
}

impl UnimplementedCodec {
    pub fn new(format: &'static str) -> Self {
        Self { format }
    }

    fn not_implemented(&self) -> ConvertError {
        ConvertError::NotImplemented {
            format: self.format.to_string(),
        }
    }
}

impl Codec for UnimplementedCodec {
    fn name(&self) -> &'static str {
        self.format
    }

    fn deserialise(&self, _text: &str) -> Result<Record> {
        Err(self.not_implemented())
    }

    fn serialise(&self, _record: &Record) -> Result<String> {
        Err(self.not_implemented())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fails_at_call_time() {
        let codec = UnimplementedCodec::new("yaml");
        assert_eq!(codec.name(), "yaml");
        assert!(matches!(
            codec.deserialise("a: 1"),
            Err(ConvertError::NotImplemented { ref format }) if format == "yaml"
        ));
        assert!(matches!(
            codec.serialise(&Record::default()),
            Err(ConvertError::NotImplemented { .. })
        ));
    }
}
