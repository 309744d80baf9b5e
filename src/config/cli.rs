use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// 本機檔案存取，寫入時先寫暫存檔再取代目標檔
#[derive(Debug, Clone, Default)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Relative paths are resolved against `base_path`; absolute paths are used as-is.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.base_path.join(path)
    }

    fn write_via_temp(full_path: &Path, data: &[u8]) -> std::io::Result<()> {
        let dir = match full_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(data)?;
        temp.as_file().sync_all()?;
        temp.persist(full_path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl Storage for LocalStorage {
    fn exists(&self, path: &Path) -> bool {
        self.resolve(path).is_file()
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        let data = fs::read_to_string(self.resolve(path))?;
        Ok(data)
    }

    fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
        self.write_with(path, data, Self::write_via_temp)
    }
}

impl LocalStorage {
    /// Creates parent directories, tries `primary` and falls back to a plain
    /// `fs::write` of the target when it fails.
    fn write_with<F>(&self, path: &Path, data: &[u8], primary: F) -> Result<()>
    where
        F: FnOnce(&Path, &[u8]) -> std::io::Result<()>,
    {
        let full_path = self.resolve(path);

        if let Some(parent) = full_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        if let Err(e) = primary(&full_path, data) {
            tracing::warn!(
                "Atomic replace of {} failed ({}), writing directly",
                full_path.display(),
                e
            );
            fs::write(&full_path, data)?;
        }

        tracing::debug!("Wrote {} bytes to {}", data.len(), full_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        let path = Path::new("nested/deeper/students.json");
        storage.write_file(path, b"[]").unwrap();

        assert!(storage.exists(path));
        assert_eq!(storage.read_to_string(path).unwrap(), "[]");
    }

    #[test]
    fn test_write_replaces_existing_file_without_leftovers() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::default();
        let target = temp_dir.path().join("out.csv");

        storage.write_file(&target, b"first version, longer").unwrap();
        storage.write_file(&target, b"second").unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "second");
        let entries: Vec<_> = fs::read_dir(temp_dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_direct_write_when_atomic_replace_fails() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());
        let path = Path::new("sub/students.json");

        let result = storage.write_with(path, b"[]", |_, _| {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "rename not supported"))
        });

        assert!(result.is_ok());
        assert_eq!(storage.read_to_string(path).unwrap(), "[]");
    }

    #[test]
    fn test_direct_write_overwrites_existing_target() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::default();
        let target = temp_dir.path().join("out.csv");
        fs::write(&target, "old contents that are longer").unwrap();

        storage
            .write_with(&target, b"new", |_, _| {
                Err(std::io::Error::from(std::io::ErrorKind::PermissionDenied))
            })
            .unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "new");
    }

    #[test]
    fn test_exists_is_false_for_directories_and_missing_files() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());
        assert!(!storage.exists(Path::new("missing.json")));
        assert!(!storage.exists(temp_dir.path()));
    }

    #[test]
    fn test_write_into_directory_target_fails() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::default();
        // 目標是目錄：暫存檔取代失敗，直接寫入也失敗
        assert!(storage.write_file(temp_dir.path(), b"data").is_err());
    }
}
