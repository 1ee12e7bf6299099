//! Key/value persistence behind the session store. Only `SessionStore` calls
//! these; every other component goes through `load`/`save`/`clear`.

use std::{
    collections::HashMap,
    fs,
    io::{self, ErrorKind},
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing::debug;

pub trait SessionBackend: Send + Sync {
    /// Returns `Ok(None)` when the key has never been written or was removed.
    ///
    /// # Errors
    /// Returns an error if the underlying storage cannot be read.
    fn read(&self, key: &str) -> io::Result<Option<String>>;

    /// # Errors
    /// Returns an error if the value cannot be persisted.
    fn write(&self, key: &str, value: &str) -> io::Result<()>;

    /// Removing a missing key is not an error.
    ///
    /// # Errors
    /// Returns an error if an existing value cannot be removed.
    fn remove(&self, key: &str) -> io::Result<()>;
}

/// One file per key inside a private directory.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    fn ensure_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.dir, fs::Permissions::from_mode(0o700))?;
        }
        Ok(())
    }
}

impl SessionBackend for FileBackend {
    fn read(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn write(&self, key: &str, value: &str) -> io::Result<()> {
        self.ensure_dir()?;

        // Write then rename so a crash never leaves a truncated entry behind.
        let tmp = self.dir.join(format!(".{key}.tmp"));
        fs::write(&tmp, value)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp, fs::Permissions::from_mode(0o600))?;
        }
        fs::rename(&tmp, self.path(key))?;

        debug!(key, dir = %self.dir.display(), "session entry written");
        Ok(())
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err),
        }
    }
}

/// Process-local storage, used by tests and embedders that persist elsewhere.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> io::Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| io::Error::other("session map lock poisoned"))
    }
}

impl SessionBackend for MemoryBackend {
    fn read(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> io::Result<()> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        self.entries()?.remove(key);
        Ok(())
    }
}
