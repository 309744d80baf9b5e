use crate::utils::error::Result;
use std::path::Path;

/// 檔案存取介面，RosterManager 透過它讀寫 JSON/CSV
pub trait Storage {
    fn exists(&self, path: &Path) -> bool;

    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Replaces the whole file. Implementations must not leave a partially
    /// written target behind when a replace-style write is possible.
    fn write_file(&self, path: &Path, data: &[u8]) -> Result<()>;
}
