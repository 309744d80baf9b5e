use crate::config::cli::LocalStorage;
use crate::core::csv_codec;
use crate::domain::model::StudentRecord;
use crate::domain::ports::Storage;
use crate::utils::error::{RosterError, Result};
use crate::utils::validation::Validate;
use std::path::{Path, PathBuf};

/// 篩選條件；未設定或空白的條件不參與篩選
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterFilter {
    pub course: Option<i32>,
    pub group: Option<String>,
    pub last_name: Option<String>,
}

impl RosterFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn course(mut self, course: i32) -> Self {
        self.course = Some(course);
        self
    }

    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    pub fn matches(&self, record: &StudentRecord) -> bool {
        if let Some(course) = self.course {
            if record.course != course {
                return false;
            }
        }
        if let Some(group) = active(&self.group) {
            if !record.group.contains(group) {
                return false;
            }
        }
        if let Some(last_name) = active(&self.last_name) {
            if !record.last_name.contains(last_name) {
                return false;
            }
        }
        true
    }
}

fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Owns the roster for one session: the ordered records, the unsaved-changes
/// flag and the file last saved to or loaded from.
///
/// Records are addressed by position. Out-of-range indices passed to
/// `update` and `remove` are ignored.
#[derive(Debug)]
pub struct RosterManager<S: Storage = LocalStorage> {
    students: Vec<StudentRecord>,
    current_file_path: Option<PathBuf>,
    has_unsaved_changes: bool,
    storage: S,
}

impl RosterManager<LocalStorage> {
    pub fn new() -> Self {
        Self::with_storage(LocalStorage::default())
    }
}

impl Default for RosterManager<LocalStorage> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Storage> RosterManager<S> {
    pub fn with_storage(storage: S) -> Self {
        Self {
            students: Vec::new(),
            current_file_path: None,
            has_unsaved_changes: false,
            storage,
        }
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.has_unsaved_changes
    }

    pub fn current_file_path(&self) -> Option<&Path> {
        self.current_file_path.as_deref()
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&StudentRecord> {
        self.students.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StudentRecord> {
        self.students.iter()
    }

    /// Snapshot of all records; changing it does not touch the roster.
    pub fn get_all(&self) -> Vec<StudentRecord> {
        self.students.clone()
    }

    pub fn add(&mut self, record: impl Into<Option<StudentRecord>>) -> Result<()> {
        let record = checked(record.into())?;
        tracing::debug!("Adding student {} {}", record.last_name, record.first_name);
        self.students.push(record);
        self.has_unsaved_changes = true;
        Ok(())
    }

    /// Replaces the record at `index`. The record is validated first, so an
    /// invalid record fails even when `index` is out of range.
    pub fn update(&mut self, index: usize, record: impl Into<Option<StudentRecord>>) -> Result<()> {
        let record = checked(record.into())?;
        match self.students.get_mut(index) {
            Some(slot) => {
                tracing::debug!("Updating student at index {}", index);
                *slot = record;
                self.has_unsaved_changes = true;
            }
            None => {
                tracing::debug!(
                    "Ignoring update at index {} (roster has {} records)",
                    index,
                    self.students.len()
                );
            }
        }
        Ok(())
    }

    pub fn remove(&mut self, index: usize) {
        if index < self.students.len() {
            let removed = self.students.remove(index);
            tracing::debug!(
                "Removed student {} {} at index {}",
                removed.last_name,
                removed.first_name,
                index
            );
            self.has_unsaved_changes = true;
        } else {
            tracing::debug!("Ignoring remove at index {}", index);
        }
    }

    pub fn filter(
        &self,
        course: Option<i32>,
        group: Option<&str>,
        last_name: Option<&str>,
    ) -> Vec<StudentRecord> {
        self.filter_by(&RosterFilter {
            course,
            group: group.map(str::to_string),
            last_name: last_name.map(str::to_string),
        })
    }

    /// Matching records paired with their positions in the roster.
    pub fn indexed_matches<'a>(
        &'a self,
        filter: &'a RosterFilter,
    ) -> impl Iterator<Item = (usize, &'a StudentRecord)> + 'a {
        self.students
            .iter()
            .enumerate()
            .filter(move |(_, record)| filter.matches(record))
    }

    pub fn filter_by(&self, filter: &RosterFilter) -> Vec<StudentRecord> {
        self.students
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect()
    }

    pub fn save_to_json(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(&self.students)?;
        self.storage.write_file(path, json.as_bytes())?;

        tracing::info!("Saved {} students to {}", self.students.len(), path.display());
        self.current_file_path = Some(path.to_path_buf());
        self.has_unsaved_changes = false;
        Ok(())
    }

    /// Replaces the roster with the file's contents. A missing file is not an
    /// error and leaves everything unchanged. Loaded records are not validated.
    pub fn load_from_json(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if !self.storage.exists(path) {
            tracing::debug!("No roster file at {}, nothing to load", path.display());
            return Ok(());
        }

        let json = self.storage.read_to_string(path)?;
        let students: Vec<StudentRecord> = serde_json::from_str(&json)?;

        tracing::info!("Loaded {} students from {}", students.len(), path.display());
        self.students = students;
        self.current_file_path = Some(path.to_path_buf());
        self.has_unsaved_changes = false;
        Ok(())
    }

    /// Appends every data row of a CSV file through `add`. Stops at the first
    /// row that fails to parse or validate; rows before it stay added.
    pub fn import_from_csv(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let content = self.storage.read_to_string(path)?;
        let rows = csv_codec::read_rows(&content)?;

        let mut imported = 0;
        for row in &rows {
            let record = csv_codec::parse_row(row).inspect_err(|e| {
                tracing::warn!("Import of {} stopped at line {}: {}", path.display(), row.line, e);
            })?;
            self.add(record)?;
            imported += 1;
        }

        tracing::info!("Imported {} students from {}", imported, path.display());
        Ok(imported)
    }

    pub fn export_to_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let data = csv_codec::render(&self.students)?;
        self.storage.write_file(path, &data)?;

        tracing::info!("Exported {} students to {}", self.students.len(), path.display());
        Ok(())
    }
}

fn checked(record: Option<StudentRecord>) -> Result<StudentRecord> {
    let record = record.ok_or_else(|| RosterError::missing("student"))?;
    record.validate().map_err(|e| RosterError::InvalidRecord {
        message: format!("student data is invalid: {}", e),
    })?;
    Ok(record)
}
