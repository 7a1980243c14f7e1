use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use core_roster::{MappingSet, MemberId, Result, RosterError, UserMapping};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

pub const DEFAULT_FILE: &str = "user_mappings.json";
const CORRUPT_SUFFIX: &str = ".corrupt";

/// Whole-file JSON store for the mapping set. Every write replaces the file
/// through a sibling temp file and a rename, so readers only ever see a
/// complete snapshot.
pub struct MappingStore {
    path: PathBuf,
}

impl MappingStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(root: impl AsRef<Path>) -> Self {
        Self::new(root.as_ref().join(DEFAULT_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored set. A missing file is an empty set; an unreadable
    /// payload is moved aside to `<file>.corrupt` and replaced by an empty set.
    pub fn load(&self) -> Result<MappingSet> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("no mapping file at {}", self.path.display());
                return Ok(MappingSet::new());
            }
            Err(err) => {
                return Err(RosterError::transport(
                    format!("failed to read {}", self.path.display()),
                    err,
                ))
            }
        };

        if raw.trim().is_empty() {
            return Ok(MappingSet::new());
        }

        let records: Vec<UserMapping> = match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(err) => {
                let aside = self.corrupt_path();
                warn!(
                    "mapping file {} is corrupt ({}); moving it to {} and resetting to empty",
                    self.path.display(),
                    err,
                    aside.display()
                );
                fs::rename(&self.path, &aside).map_err(|err| {
                    RosterError::transport(
                        format!("failed to move corrupt file to {}", aside.display()),
                        err,
                    )
                })?;
                let empty = MappingSet::new();
                self.save(&empty)?;
                return Ok(empty);
            }
        };

        let total = records.len();
        let set: MappingSet = records.into_iter().collect();
        if set.len() != total {
            warn!(
                "mapping file {} held {} duplicate records; keeping first of each",
                self.path.display(),
                total - set.len()
            );
        }
        Ok(set)
    }

    /// Replaces the stored set and returns the number of records written.
    pub fn save(&self, mappings: &MappingSet) -> Result<usize> {
        self.replace_with(|writer| {
            serde_json::to_writer_pretty(&mut *writer, mappings)?;
            Ok(())
        })?;

        info!(
            "saved {} mappings to {}",
            mappings.len(),
            self.path.display()
        );
        Ok(mappings.len())
    }

    pub fn corrupt_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from(DEFAULT_FILE));
        name.push(CORRUPT_SUFFIX);
        self.path.with_file_name(name)
    }

    /// Writes a fresh snapshot next to the target and renames it into place.
    /// When `write` fails the previous file is left as it was.
    fn replace_with<F>(&self, write: F) -> Result<()>
    where
        F: FnOnce(&mut BufWriter<&File>) -> io::Result<()>,
    {
        let dir = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => parent,
            None => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|err| {
            RosterError::transport(format!("failed to create {}", dir.display()), err)
        })?;

        let staged = NamedTempFile::new_in(dir).map_err(|err| {
            RosterError::transport(format!("failed to stage write in {}", dir.display()), err)
        })?;
        {
            let mut writer = BufWriter::new(staged.as_file());
            write(&mut writer)
                .and_then(|()| writer.flush())
                .map_err(|err| {
                    RosterError::transport(
                        format!("failed to write {}", self.path.display()),
                        err,
                    )
                })?;
        }
        staged.as_file().sync_all().map_err(|err| {
            RosterError::transport(format!("failed to sync {}", self.path.display()), err)
        })?;
        staged.persist(&self.path).map_err(|err| {
            RosterError::transport(format!("failed to replace {}", self.path.display()), err.error)
        })?;
        Ok(())
    }

    /// Deletes one record. Returns whether it was present.
    pub fn remove(&self, id: &MemberId) -> Result<bool> {
        let mut mappings = self.load()?;
        if mappings.remove(id).is_none() {
            return Ok(false);
        }
        self.save(&mappings)?;
        Ok(true)
    }
}
