use std::path::Path;

use tasky_core::TaskyResult;
use tokio::fs;

/// Write-to-temp-then-rename file writer, so readers never see a torn file.
pub struct AtomicWriter;

impl AtomicWriter {
    /// Replace `path` with `data`. The temp file lives in the same directory
    /// so the rename stays on one filesystem.
    pub async fn write_atomic(path: &Path, data: &[u8]) -> TaskyResult<()> {
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).await?;
        let temp_file = tempfile::NamedTempFile::new_in(parent)?;
        let temp_path = temp_file.into_temp_path();

        fs::write(&temp_path, data).await?;
        fs::rename(&temp_path, path).await?;

        tracing::debug!("Atomically wrote {} bytes to {}", data.len(), path.display());
        Ok(())
    }

    /// Read the whole file, `None` when it does not exist yet.
    pub async fn read_if_exists(path: &Path) -> TaskyResult<Option<Vec<u8>>> {
        match fs::read(path).await {
            Ok(data) => {
                tracing::debug!("Read {} bytes from {}", data.len(), path.display());
                Ok(Some(data))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
