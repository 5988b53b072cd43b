//! Directory-backed store: one `<key>.json` file per key.
//!
//! ```text
//! <path>/
//! ├── bookings.json
//! ├── currentUser.json
//! └── registeredUsers.json
//! ```

use nomad_core::{CoreError, CoreResult, KeyValueStore};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

const EXTENSION: &str = "json";

#[derive(Clone, Debug)]
pub struct FileStore {
    base: PathBuf,
}

impl FileStore {
    /// Uses `base` as the data directory, creating it if needed.
    pub fn open(base: impl AsRef<Path>) -> CoreResult<Self> {
        let base = base.as_ref().to_path_buf();
        fs::create_dir_all(&base).map_err(|e| io_error(&base, e))?;
        Ok(Self { base })
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.base.join(format!("{}.{}", sanitize(key), EXTENSION))
    }
}

/// Keeps keys usable as file names on every platform.
fn sanitize(key: &str) -> String {
    key.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

fn io_error(path: &Path, err: std::io::Error) -> CoreError {
    CoreError::StorageError(format!("{}: {}", path.display(), err))
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> CoreResult<Option<String>> {
        let path = self.key_path(key);
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&path, e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        let path = self.key_path(key);
        // Write then rename so readers never see a half-written document
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, value).map_err(|e| io_error(&tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| io_error(&path, e))?;
        debug!("Wrote {} ({} bytes)", path.display(), value.len());
        Ok(())
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        let path = self.key_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(&path, e)),
        }
    }

    fn keys(&self) -> CoreResult<Vec<String>> {
        let entries = fs::read_dir(&self.base).map_err(|e| io_error(&self.base, e))?;
        let mut keys = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| io_error(&self.base, e))?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }
}
