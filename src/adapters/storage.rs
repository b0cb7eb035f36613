use crate::core::Storage;
use crate::utils::error::{ConvertError, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Files on the local disk, relative to `base_path` (empty means the working directory).
#[derive(Debug, Clone, Default)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }

    fn full_path(&self, path: &str) -> PathBuf {
        Path::new(&self.base_path).join(path)
    }

    /// Temp file created with the mode a plain `fs::write` would give a new file (0o666 less umask).
    fn temp_file_in(dir: &Path) -> std::io::Result<NamedTempFile> {
        let mut builder = tempfile::Builder::new();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(fs::Permissions::from_mode(0o666));
        }
        builder.tempfile_in(dir)
    }
}

impl Storage for LocalStorage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.full_path(path);
        let data = fs::read(full_path).map_err(|e| ConvertError::io(path, e))?;
        Ok(data)
    }

    /// Writes into a temporary file next to the target, then renames it over the target.
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.full_path(path);

        let parent = match full_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent).map_err(|e| ConvertError::io(path, e))?;

        let mut temp = Self::temp_file_in(&parent).map_err(|e| ConvertError::io(path, e))?;
        // 覆寫時沿用原檔權限
        if let Ok(existing) = fs::metadata(&full_path) {
            temp.as_file()
                .set_permissions(existing.permissions())
                .map_err(|e| ConvertError::io(path, e))?;
        }
        temp.write_all(data).map_err(|e| ConvertError::io(path, e))?;
        temp.as_file().sync_all().map_err(|e| ConvertError::io(path, e))?;
        temp.persist(&full_path)
            .map_err(|e| ConvertError::io(path, e.error))?;

        tracing::debug!("Wrote {} bytes to {}", data.len(), full_path.display());
        Ok(())
    }
}
