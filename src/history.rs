use crate::error::HistoryError;
use crate::sampler::Passphrase;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const HISTORY_FILE: &str = "password_history.txt";

/// Append-only plaintext log of generated passphrases.
///
/// Each entry is one line: an RFC 3339 timestamp, a tab, the passphrase.
/// Nothing here is encrypted.
#[derive(Debug, Clone)]
pub struct HistoryLog {
    path: PathBuf,
}

impl HistoryLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Log in the per-user location.
    pub fn open_default() -> Result<Self, HistoryError> {
        Ok(Self::new(Self::default_path()?))
    }

    /// - Windows: `%APPDATA%\RavenfootPassword\password_history.txt`
    /// - Elsewhere: `~/.ravenfoot_password/password_history.txt`
    pub fn default_path() -> Result<PathBuf, HistoryError> {
        let base = if cfg!(windows) {
            dirs::config_dir()
                .or_else(dirs::home_dir)
                .map(|dir| dir.join("RavenfootPassword"))
        } else {
            dirs::home_dir().map(|dir| dir.join(".ravenfoot_password"))
        };

        base.map(|dir| dir.join(HISTORY_FILE))
            .ok_or(HistoryError::NoHomeDirectory)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format_entry(passphrase: &Passphrase) -> String {
        format!("{}\t{}", passphrase.created_at().to_rfc3339(), passphrase.as_str())
    }

    /// Appends one line per passphrase, creating the file and its parent
    /// directory when needed.
    pub fn append(&self, passphrases: &[Passphrase]) -> Result<(), HistoryError> {
        if passphrases.is_empty() {
            return Ok(());
        }

        self.write_lines(passphrases).map_err(|source| HistoryError::Io {
            path: self.path.clone(),
            source,
        })?;

        log::debug!(
            "Appended {} entries to {}",
            passphrases.len(),
            self.path.display()
        );
        Ok(())
    }

    fn write_lines(&self, passphrases: &[Passphrase]) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut buffer = zeroize::Zeroizing::new(String::new());
        for passphrase in passphrases {
            buffer.push_str(&Self::format_entry(passphrase));
            buffer.push('\n');
        }
        file.write_all(buffer.as_bytes())?;
        file.flush()
    }

    /// Deletes the log. Returns `false` if there was nothing to delete.
    ///
    /// This only unlinks the file; it does not scrub the storage.
    pub fn clear(&self) -> Result<bool, HistoryError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(HistoryError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }
}
