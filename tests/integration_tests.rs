use anyhow::Result;
use record_convert::{ConvertError, Converter, LocalStorage, Record};
use serde_json::json;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const FIXTURES: [&str; 3] = ["file00.py", "file00.csv", "file00.json"];

fn input_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("files_input")
}

fn input_path(name: &str) -> String {
    input_dir().join(name).to_str().unwrap().to_string()
}

fn test_data() -> Record {
    serde_json::from_value(json!([
        {"name": "Joe Bloggs", "age": "21", "phone": "0412345678", "address": "1 Somewhere Street, Sydney"},
        {"name": "Jim Bloggs", "age": "42", "phone": "0423456789", "address": "1 Somewhere Street, Sydney"}
    ]))
    .unwrap()
}

fn converter() -> Converter<LocalStorage> {
    Converter::with_defaults(LocalStorage::default())
}

#[test]
fn test_fixtures_decode_to_the_same_record() -> Result<()> {
    let converter = converter();
    for name in FIXTURES {
        let conversion = converter.preview(&input_path(name), "unused.json")?;
        assert_eq!(conversion.record, test_data(), "{name}");
    }
    Ok(())
}

#[test]
fn test_identity_conversions_reproduce_the_input() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let converter = converter();

    for name in FIXTURES {
        let output = temp_dir.path().join(name);
        let output = output.to_str().unwrap();

        let record = converter.convert(&input_path(name), output)?;

        assert_eq!(record, test_data());
        let expected = std::fs::read_to_string(input_dir().join(name))?;
        let actual = std::fs::read_to_string(output)?;
        assert_eq!(actual, expected, "{name}");
    }
    Ok(())
}

#[test]
fn test_every_format_pair() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let converter = converter();

    for from in FIXTURES {
        for to in FIXTURES {
            let output = temp_dir.path().join(format!("{}-{}", from.replace('.', "_"), to));
            let output = output.to_str().unwrap();

            converter.convert(&input_path(from), output)?;

            let expected = std::fs::read_to_string(input_dir().join(to))?;
            assert_eq!(std::fs::read_to_string(output)?, expected, "{from} -> {to}");
        }
    }
    Ok(())
}

#[test]
fn test_malformed_input_leaves_existing_output_untouched() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = temp_dir.path().join("broken.json");
    let output = temp_dir.path().join("existing.csv");
    std::fs::write(&input, r#"[{"name": "Joe", "age": "21"}"#)?;
    std::fs::write(&output, "keep,me\r\n1,2\r\n")?;

    let err = converter()
        .convert(input.to_str().unwrap(), output.to_str().unwrap())
        .unwrap_err();

    assert!(matches!(err, ConvertError::Decode { .. }));
    assert_eq!(std::fs::read_to_string(&output)?, "keep,me\r\n1,2\r\n");
    Ok(())
}

#[test]
fn test_malformed_input_creates_no_output() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = temp_dir.path().join("broken.json");
    let output = temp_dir.path().join("new.csv");
    std::fs::write(&input, "{not json")?;

    let result = converter().convert(input.to_str().unwrap(), output.to_str().unwrap());

    assert!(result.is_err());
    assert!(!output.exists());
    Ok(())
}

#[test]
fn test_empty_record_to_csv_writes_nothing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = temp_dir.path().join("empty.json");
    let output = temp_dir.path().join("empty.csv");
    std::fs::write(&input, "[]")?;

    let err = converter()
        .convert(input.to_str().unwrap(), output.to_str().unwrap())
        .unwrap_err();

    assert!(matches!(err, ConvertError::Encode { .. }));
    assert!(!output.exists());
    Ok(())
}

#[test]
fn test_unsupported_extension_is_reported_with_filename() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output = temp_dir.path().join("data.xyz");

    let err = converter()
        .convert(&input_path("file00.csv"), output.to_str().unwrap())
        .unwrap_err();

    assert!(err.to_string().contains("data.xyz"));
    assert_eq!(err.exit_code(), 2);
    assert!(!output.exists());
    Ok(())
}

#[test]
fn test_missing_input_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = temp_dir.path().join("missing.csv");
    let output = temp_dir.path().join("out.json");

    let err = converter()
        .convert(input.to_str().unwrap(), output.to_str().unwrap())
        .unwrap_err();

    assert!(matches!(err, ConvertError::Io { .. }));
    assert!(!output.exists());
    Ok(())
}

#[test]
fn test_output_is_fully_replaced() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output = temp_dir.path().join("out.json");
    std::fs::write(&output, "x".repeat(4096))?;

    converter().convert(&input_path("file00.csv"), output.to_str().unwrap())?;

    let expected = std::fs::read_to_string(input_dir().join("file00.json"))?;
    assert_eq!(std::fs::read_to_string(&output)?, expected);
    Ok(())
}
