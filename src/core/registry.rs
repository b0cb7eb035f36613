use crate::domain::ports::Codec;
use crate::formats::{CsvCodec, JsonCodec, PythonLiteralCodec, UnimplementedCodec};
use crate::utils::error::{ConvertError, Result};
use std::sync::Arc;

/// Maps file extensions (leading dot included) to the codec that handles them.
///
/// Lookup is case-sensitive: `data.CSV` is not a `.csv` file.
#[derive(Clone, Default)]
pub struct Registry {
    entries: Vec<(String, Arc<dyn Codec>)>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// `.py`, `.csv` and `.json`, plus `.yaml`/`.yml` reserved as not implemented.
    pub fn with_defaults() -> Self {
        Self::new()
            .register(".py", Arc::new(PythonLiteralCodec))
            .register(".csv", Arc::new(CsvCodec))
            .register(".json", Arc::new(JsonCodec))
            .register(".yaml", Arc::new(UnimplementedCodec::new("yaml")))
            .register(".yml", Arc::new(UnimplementedCodec::new("yaml")))
    }

    /// Adds a codec, replacing any previous one for the same extension in place.
    pub fn register(mut self, extension: impl Into<String>, codec: Arc<dyn Codec>) -> Self {
        let extension = extension.into();
        match self.entries.iter_mut().find(|(ext, _)| *ext == extension) {
            Some(entry) => entry.1 = codec,
            None => self.entries.push((extension, codec)),
        }
        self
    }

    pub fn resolve(&self, filename: &str) -> Result<Arc<dyn Codec>> {
        let extension = extension_of(filename);
        self.entries
            .iter()
            .find(|(ext, _)| ext == extension)
            .map(|(_, codec)| Arc::clone(codec))
            .ok_or_else(|| ConvertError::UnsupportedFormat {
                filename: filename.to_string(),
                extension: extension.to_string(),
                supported: self.supported_extensions().join(", "),
            })
    }

    /// Registered extensions, in registration order.
    pub fn supported_extensions(&self) -> Vec<&str> {
        self.entries.iter().map(|(ext, _)| ext.as_str()).collect()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(ext, codec)| (ext, codec.name())))
            .finish()
    }
}

/// The final path component's extension, from its last '.' to the end.
///
/// Leading dots of the component do not start an extension (`.bashrc` has none);
/// a name without one yields "".
pub fn extension_of(filename: &str) -> &str {
    let base_start = filename.rfind('/').map(|i| i + 1).unwrap_or(0);
    let base = &filename[base_start..];
    let stem_start = base.len() - base.trim_start_matches('.').len();
    match base[stem_start..].rfind('.') {
        Some(dot) => &base[stem_start + dot..],
        None => "",
    }
}
