use crate::domain::model::Record;
use crate::utils::error::Result;

/// A stateless codec for one textual format.
///
/// Both operations are pure: no I/O, and on failure nothing partial is returned.
pub trait Codec: Send + Sync {
    /// Short format name used in log lines and error messages.
    fn name(&self) -> &'static str;

    fn deserialise(&self, text: &str) -> Result<Record>;

    fn serialise(&self, record: &Record) -> Result<String>;
}

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;

    /// Replaces the whole content of `path`. Must not leave a truncated file behind on failure.
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}
