//! Durable storage for the session token.
//!
//! The store keeps a single value: the token as a plain string.  Absence of
//! the value means the user is anonymous.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{Error, Result};

/// Name of the file that holds the token inside the qapal home directory.
pub const TOKEN_FILE_NAME: &str = "token";

/// A place to persist the session token across restarts.
pub trait TokenStorage: Send + Sync {
    /// Read the stored token.  `Ok(None)` means nothing is stored.
    fn load(&self) -> Result<Option<String>>;

    /// Replace the stored token.
    fn store(&self, token: &str) -> Result<()>;

    /// Remove the stored token.  Removing an absent token is not an error.
    fn clear(&self) -> Result<()>;
}

/// Token storage backed by a single file.
#[derive(Debug, Clone)]
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    /// Store the token at `path`.  Parent directories are created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this storage reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| TOKEN_FILE_NAME.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl TokenStorage for FileTokenStorage {
    fn load(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(token.to_string()))
                }
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(Error::io(
                format!("cannot read {}: {err}", self.path.display()),
                err,
            )),
        }
    }

    fn store(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|err| {
                Error::io(format!("cannot create {}: {err}", parent.display()), err)
            })?;
        }
        let temp = self.temp_path();
        write_private(&temp, token)
            .map_err(|err| Error::io(format!("cannot write {}: {err}", temp.display()), err))?;
        fs::rename(&temp, &self.path).map_err(|err| {
            Error::io(
                format!("cannot move token into {}: {err}", self.path.display()),
                err,
            )
        })
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(Error::io(
                format!("cannot remove {}: {err}", self.path.display()),
                err,
            )),
        }
    }
}

#[cfg(unix)]
fn write_private(path: &Path, contents: &str) -> io::Result<()> {
    use std::os::unix::fs::OpenOptionsExt;

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &str) -> io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()
}

/// Token storage that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryTokenStorage {
    slot: Mutex<Option<String>>,
}

impl MemoryTokenStorage {
    /// Empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that already holds `token`, as if written by a previous run.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(token.into())),
        }
    }

    /// The currently stored token.
    pub fn peek(&self) -> Option<String> {
        self.slot.lock().map(|slot| slot.clone()).unwrap_or_default()
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.peek())
    }

    fn store(&self, token: &str) -> Result<()> {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(token.to_string());
        }
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = None;
        }
        Ok(())
    }
}

impl<T: TokenStorage + ?Sized> TokenStorage for std::sync::Arc<T> {
    fn load(&self) -> Result<Option<String>> {
        (**self).load()
    }

    fn store(&self, token: &str) -> Result<()> {
        (**self).store(token)
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }
}
