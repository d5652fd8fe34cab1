//! Loading and saving the SSH config file
//!
//! The previous contents are copied to a backup file before every save.
//! Nothing coordinates concurrent invocations: two processes racing on
//! load and save can lose an update or overwrite each other's backup.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::error::{Result, SshConfigError};

/// Mode applied to both the config file and its backup
pub const DEFAULT_FILE_MODE: u32 = 0o644;

/// Asks the operator a yes/no question
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> io::Result<bool>;
}

/// Reads the answer from stdin. Only `y` (any case) counts as yes.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> io::Result<bool> {
        print!("{} (y/n): ", prompt);
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().lock().read_line(&mut input)?;
        Ok(input.trim().eq_ignore_ascii_case("y"))
    }
}

/// Fixed answer, for non-interactive use
impl Confirm for bool {
    fn confirm(&self, _prompt: &str) -> io::Result<bool> {
        Ok(*self)
    }
}

/// Config file location, its backup, and the mode both are written with
#[derive(Debug, Clone)]
pub struct ConfigStore {
    config_path: PathBuf,
    backup_path: PathBuf,
    file_mode: u32,
}

impl ConfigStore {
    pub fn new(config_path: PathBuf, backup_path: PathBuf, file_mode: u32) -> Self {
        Self {
            config_path,
            backup_path,
            file_mode,
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }

    /// Read the config file, offering to create it when it does not exist
    pub fn load(&self, confirm: &dyn Confirm) -> Result<String> {
        if !self.config_path.exists() {
            println!("The file {} does not exist.", self.config_path.display());
            let create = confirm
                .confirm("Do you want to create it?")
                .map_err(|e| SshConfigError::io("read answer for", &self.config_path, e))?;
            if !create {
                return Err(SshConfigError::Aborted);
            }
            self.create_empty()?;
            println!("File {} created successfully.", self.config_path.display());
        }

        debug!("Loading {}", self.config_path.display());
        fs::read_to_string(&self.config_path)
            .map_err(|e| SshConfigError::io("read", &self.config_path, e))
    }

    /// Copy the current file to the backup path, then replace it with `new_text`.
    ///
    /// A failed backup stops before the config is touched. A failed save
    /// leaves the new backup in place.
    pub fn backup_and_save(&self, new_text: &str) -> Result<()> {
        let existing = match fs::read(&self.config_path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(SshConfigError::io("read", &self.config_path, e)),
        };

        fs::write(&self.backup_path, &existing)
            .map_err(|e| SshConfigError::io("write backup", &self.backup_path, e))?;
        set_mode(&self.backup_path, self.file_mode)
            .map_err(|e| SshConfigError::io("set permissions on", &self.backup_path, e))?;
        debug!("Backed up to {}", self.backup_path.display());

        self.write_atomic(new_text)
            .map_err(|e| SshConfigError::io("write", &self.config_path, e))?;
        info!("Saved {}", self.config_path.display());
        Ok(())
    }

    fn create_empty(&self) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| SshConfigError::io("create directory", parent, e))?;
        }
        fs::write(&self.config_path, b"")
            .map_err(|e| SshConfigError::io("create", &self.config_path, e))?;
        set_mode(&self.config_path, self.file_mode)
            .map_err(|e| SshConfigError::io("set permissions on", &self.config_path, e))
    }

    /// Write through a sibling temp file renamed over the target.
    ///
    /// A symlinked config is resolved first so the link stays a link and
    /// the file it points at gets the new contents.
    fn write_atomic(&self, text: &str) -> io::Result<()> {
        let target = match fs::canonicalize(&self.config_path) {
            Ok(resolved) => resolved,
            Err(e) if e.kind() == io::ErrorKind::NotFound => self.config_path.clone(),
            Err(e) => return Err(e),
        };
        let dir = target
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(text.as_bytes())?;
        tmp.flush()?;
        set_mode(tmp.path(), self.file_mode)?;
        tmp.persist(&target).map_err(|e| e.error)?;
        Ok(())
    }
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn store_in(dir: &Path) -> ConfigStore {
        ConfigStore::new(
            dir.join("config"),
            dir.join(".config.backup"),
            DEFAULT_FILE_MODE,
        )
    }

    #[test]
    fn test_load_existing() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("config"), "Host a\n").unwrap();

        let text = store_in(dir.path()).load(&false).unwrap();
        assert_eq!(text, "Host a\n");
    }

    #[test]
    fn test_load_missing_declined() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());

        let err = store.load(&false).unwrap_err();
        assert!(matches!(err, SshConfigError::Aborted));
        assert!(!store.config_path().exists());
    }

    #[test]
    fn test_load_missing_creates_file() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::new(
            dir.path().join(".ssh").join("config"),
            dir.path().join(".ssh").join(".config.backup"),
            DEFAULT_FILE_MODE,
        );

        let text = store.load(&true).unwrap();
        assert_eq!(text, "");
        assert!(store.config_path().exists());
    }

    #[test]
    fn test_backup_and_save() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        fs::write(store.config_path(), "old contents\n").unwrap();

        store.backup_and_save("new contents\n").unwrap();

        assert_eq!(
            fs::read_to_string(store.backup_path()).unwrap(),
            "old contents\n"
        );
        assert_eq!(
            fs::read_to_string(store.config_path()).unwrap(),
            "new contents\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_backup_and_save_sets_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let store = ConfigStore::new(
            dir.path().join("config"),
            dir.path().join(".config.backup"),
            0o600,
        );
        fs::write(store.config_path(), "old\n").unwrap();

        store.backup_and_save("new\n").unwrap();

        for path in [store.config_path(), store.backup_path()] {
            let mode = fs::metadata(path).unwrap().permissions().mode() & 0o777;
            assert_eq!(mode, 0o600, "{}", path.display());
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_save_writes_through_symlink() {
        let dir = tempdir().unwrap();
        let real = dir.path().join("real_config");
        fs::write(&real, "Host a\n\tHostName a.com\n").unwrap();
        std::os::unix::fs::symlink(&real, dir.path().join("config")).unwrap();
        let store = store_in(dir.path());

        store.backup_and_save("Host b\n").unwrap();

        let meta = fs::symlink_metadata(store.config_path()).unwrap();
        assert!(meta.file_type().is_symlink());
        assert_eq!(fs::read_to_string(&real).unwrap(), "Host b\n");
        assert_eq!(
            fs::read_to_string(store.backup_path()).unwrap(),
            "Host a\n\tHostName a.com\n"
        );
    }

    #[test]
    fn test_save_failure_keeps_new_backup() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::new(
            dir.path().join("missing-dir").join("config"),
            dir.path().join(".config.backup"),
            DEFAULT_FILE_MODE,
        );
        fs::write(store.backup_path(), "stale backup\n").unwrap();

        let err = store.backup_and_save("new\n").unwrap_err();
        assert!(matches!(err, SshConfigError::Io { action: "write", .. }));

        // The backup step ran before the failed write and is not rolled back
        assert_eq!(fs::read_to_string(store.backup_path()).unwrap(), "");
        assert!(!store.config_path().exists());
    }

    #[test]
    fn test_backup_failure_skips_save() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::new(
            dir.path().join("config"),
            dir.path().join("missing-dir").join("backup"),
            DEFAULT_FILE_MODE,
        );
        fs::write(store.config_path(), "old\n").unwrap();

        let err = store.backup_and_save("new\n").unwrap_err();
        assert!(matches!(err, SshConfigError::Io { .. }));
        assert_eq!(fs::read_to_string(store.config_path()).unwrap(), "old\n");
    }
}
