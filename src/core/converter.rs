use crate::core::registry::Registry;
use crate::core::{Codec, Conversion, Record, Storage};
use crate::utils::error::{ConvertError, Result};

/// Runs one conversion: resolve both codecs, read, decode, encode, write.
///
/// Every step is a checkpoint. Nothing is written unless all the earlier steps succeeded.
pub struct Converter<S: Storage> {
    registry: Registry,
    storage: S,
}

impl<S: Storage> Converter<S> {
    pub fn new(registry: Registry, storage: S) -> Self {
        Self { registry, storage }
    }

    pub fn with_defaults(storage: S) -> Self {
        Self::new(Registry::with_defaults(), storage)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Converts `input_path` into `output_path` and returns the decoded record.
    pub fn convert(&self, input_path: &str, output_path: &str) -> Result<Record> {
        let conversion = self.preview(input_path, output_path)?;

        tracing::debug!(
            "Writing {} bytes to {}",
            conversion.output.len(),
            output_path
        );
        self.storage
            .write_file(output_path, conversion.output.as_bytes())?;

        tracing::debug!(
            "Converted {} rows from {} to {}",
            conversion.record.len(),
            input_path,
            output_path
        );
        Ok(conversion.record)
    }

    /// Everything `convert` does except the final write.
    pub fn preview(&self, input_path: &str, output_path: &str) -> Result<Conversion> {
        // 先確認兩端格式，避免白讀一次檔案
        let input = self.registry.resolve(input_path)?;
        let output = self.registry.resolve(output_path)?;

        tracing::debug!("Reading {}", input_path);
        let bytes = self.storage.read_file(input_path)?;
        let text = String::from_utf8(bytes).map_err(|e| {
            ConvertError::io(
                input_path,
                std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            )
        })?;

        Self::run_codecs(input.as_ref(), output.as_ref(), input_path, &text)
    }

    /// Pure conversion of `text`: codecs are chosen from the two names, no I/O happens.
    pub fn transcode(&self, input_name: &str, output_name: &str, text: &str) -> Result<Conversion> {
        let input = self.registry.resolve(input_name)?;
        let output = self.registry.resolve(output_name)?;

        Self::run_codecs(input.as_ref(), output.as_ref(), input_name, text)
    }

    fn run_codecs(
        input: &dyn Codec,
        output: &dyn Codec,
        input_name: &str,
        text: &str,
    ) -> Result<Conversion> {
        tracing::debug!("Decoding {} as {}", input_name, input.name());
        let record = input.deserialise(text)?;
        tracing::debug!("Decoded {} rows", record.len());

        tracing::debug!("Encoding {} rows as {}", record.len(), output.name());
        let output = output.serialise(&record)?;

        Ok(Conversion { record, output })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
        reads: Arc<Mutex<Vec<String>>>,
    }

    impl MockStorage {
        fn with_file(path: &str, contents: &str) -> Self {
            let storage = Self::default();
            storage
                .files
                .lock()
                .unwrap()
                .insert(path.to_string(), contents.as_bytes().to_vec());
            storage
        }

        fn get_file(&self, path: &str) -> Option<String> {
            let files = self.files.lock().unwrap();
            files
                .get(path)
                .map(|data| String::from_utf8(data.clone()).unwrap())
        }

        fn read_count(&self) -> usize {
            self.reads.lock().unwrap().len()
        }
    }

    impl Storage for MockStorage {
        fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            self.reads.lock().unwrap().push(path.to_string());
            let files = self.files.lock().unwrap();
            files.get(path).cloned().ok_or_else(|| {
                ConvertError::io(
                    path,
                    std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        format!("File not found: {}", path),
                    ),
                )
            })
        }

        fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().unwrap();
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    #[test]
    fn test_convert_json_to_csv() {
        let storage = MockStorage::with_file("in.json", r#"[{"name":"Joe","age":"21"}]"#);
        let converter = Converter::with_defaults(storage.clone());

        let record = converter.convert("in.json", "out.csv").unwrap();

        assert_eq!(record.len(), 1);
        assert_eq!(record.rows[0]["name"], "Joe");
        assert_eq!(
            storage.get_file("out.csv").as_deref(),
            Some("name,age\r\nJoe,21\r\n")
        );
    }

    #[test]
    fn test_convert_csv_to_python() {
        let storage = MockStorage::with_file("in.csv", "name,age\r\nJoe,21\r\n");
        let converter = Converter::with_defaults(storage.clone());

        converter.convert("in.csv", "out.py").unwrap();

        assert_eq!(
            storage.get_file("out.py").as_deref(),
            Some("[{'name': 'Joe', 'age': '21'}]")
        );
    }

    #[test]
    fn test_bad_output_extension_is_reported_before_reading() {
        let storage = MockStorage::with_file("in.csv", "name\r\nJoe\r\n");
        let converter = Converter::with_defaults(storage.clone());

        let err = converter.convert("in.csv", "out.xyz").unwrap_err();

        assert!(matches!(err, ConvertError::UnsupportedFormat { ref filename, .. } if filename == "out.xyz"));
        assert_eq!(storage.read_count(), 0);
        assert!(storage.get_file("out.xyz").is_none());
    }

    #[test]
    fn test_bad_input_extension() {
        let storage = MockStorage::with_file("in.txt", "hello");
        let converter = Converter::with_defaults(storage.clone());

        let err = converter.convert("in.txt", "out.json").unwrap_err();

        assert!(err.to_string().contains("in.txt"));
        assert_eq!(storage.read_count(), 0);
    }

    #[test]
    fn test_decode_failure_writes_nothing() {
        let storage = MockStorage::with_file("in.json", r#"[{"name": "Joe""#);
        let converter = Converter::with_defaults(storage.clone());

        let err = converter.convert("in.json", "out.csv").unwrap_err();

        assert!(matches!(err, ConvertError::Decode { .. }));
        assert!(storage.get_file("out.csv").is_none());
    }

    #[test]
    fn test_encode_failure_writes_nothing() {
        let storage = MockStorage::with_file("in.json", "[]");
        let converter = Converter::with_defaults(storage.clone());

        let err = converter.convert("in.json", "out.csv").unwrap_err();

        assert!(matches!(err, ConvertError::Encode { .. }));
        assert!(storage.get_file("out.csv").is_none());
    }

    #[test]
    fn test_not_implemented_output() {
        let storage = MockStorage::with_file("in.csv", "a\r\n1\r\n");
        let converter = Converter::with_defaults(storage.clone());

        let err = converter.convert("in.csv", "out.yaml").unwrap_err();

        assert!(matches!(err, ConvertError::NotImplemented { .. }));
        assert!(storage.get_file("out.yaml").is_none());
    }

    #[test]
    fn test_missing_input_is_io_error() {
        let converter = Converter::with_defaults(MockStorage::default());
        let err = converter.convert("missing.csv", "out.json").unwrap_err();
        assert!(matches!(err, ConvertError::Io { ref path, .. } if path == "missing.csv"));
    }

    #[test]
    fn test_invalid_utf8_is_io_error() {
        let storage = MockStorage::default();
        storage
            .files
            .lock()
            .unwrap()
            .insert("in.csv".to_string(), vec![0x61, 0xff, 0x0d, 0x0a]);
        let converter = Converter::with_defaults(storage);

        let err = converter.convert("in.csv", "out.json").unwrap_err();

        match err {
            ConvertError::Io { source, .. } => {
                assert_eq!(source.kind(), std::io::ErrorKind::InvalidData)
            }
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn test_preview_does_not_write() {
        let storage = MockStorage::with_file("in.csv", "name\r\nJoe\r\n");
        let converter = Converter::with_defaults(storage.clone());

        let conversion = converter.preview("in.csv", "out.json").unwrap();

        assert_eq!(conversion.output, r#"[{"name":"Joe"}]"#);
        assert!(storage.get_file("out.json").is_none());
    }

    #[test]
    fn test_preview_matches_transcode_and_reads_once() {
        let storage = MockStorage::with_file("in.py", "[{'a': 1, 'b': 'x'}]");
        let converter = Converter::with_defaults(storage.clone());

        let previewed = converter.preview("in.py", "out.csv").unwrap();
        let transcoded = converter
            .transcode("in.py", "out.csv", "[{'a': 1, 'b': 'x'}]")
            .unwrap();

        assert_eq!(previewed, transcoded);
        assert_eq!(previewed.output, "a,b\r\n1,x\r\n");
        assert_eq!(storage.read_count(), 1);
    }

    #[test]
    fn test_transcode_without_storage() {
        let converter = Converter::with_defaults(MockStorage::default());

        let conversion = converter
            .transcode("a.py", "b.json", "[{'k': 1.0, 'ok': True}]")
            .unwrap();

        assert_eq!(conversion.output, r#"[{"k":1.0,"ok":true}]"#);
        assert_eq!(conversion.record.len(), 1);
    }
}
