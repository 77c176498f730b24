use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::error::{MigrateError, MigrateResult};

/// A file read fully into memory, with the hash of what was read
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub content: String,
    hash: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WriteOptions {
    /// Copy the original to `<path>.bak` before overwriting
    pub backup: bool,
}

/// Read a file's contents as string
pub fn read_source(path: impl AsRef<Path>) -> MigrateResult<SourceFile> {
    let path = path.as_ref();
    debug!("Reading file: {}", path.display());

    let bytes = fs::read(path).map_err(|e| MigrateError::io_error(e, path))?;
    let hash = hash_bytes(&bytes);
    let content = String::from_utf8(bytes).map_err(|e| {
        MigrateError::io_error(
            std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            path,
        )
    })?;

    Ok(SourceFile {
        path: path.to_path_buf(),
        content,
        hash,
    })
}

/// Overwrite the file read into `source` with `content`.
///
/// The write is refused if the file on disk no longer matches what was read.
pub fn write_source(source: &SourceFile, content: &str, options: WriteOptions) -> MigrateResult<()> {
    let path = source.path.as_path();

    let current = fs::read(path).map_err(|e| MigrateError::io_error(e, path))?;
    if hash_bytes(&current) != source.hash {
        warn!("File changed on disk since it was read: {}", path.display());
        return Err(MigrateError::ConcurrentModification {
            path: path.to_path_buf(),
        });
    }

    if options.backup {
        let backup = backup_path(path);
        fs::write(&backup, &current).map_err(|e| MigrateError::io_error(e, &backup))?;
        info!("Backup written to {}", backup.display());
    }

    write_atomic(path, content)?;
    debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

/// `App.tsx` -> `App.tsx.bak`
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".bak");
    path.with_file_name(name)
}

fn write_atomic(path: &Path, content: &str) -> MigrateResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir).map_err(|e| MigrateError::io_error(e, dir))?;
    temp.write_all(content.as_bytes())
        .map_err(|e| MigrateError::io_error(e, path))?;
    temp.flush().map_err(|e| MigrateError::io_error(e, path))?;

    // Keep the original file mode
    if let Ok(metadata) = fs::metadata(path) {
        temp.as_file()
            .set_permissions(metadata.permissions())
            .map_err(|e| MigrateError::io_error(e, path))?;
    }

    temp.persist(path)
        .map_err(|e| MigrateError::io_error(e.error, path))?;
    Ok(())
}

/// Calculate a hash for file content
fn hash_bytes(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}
