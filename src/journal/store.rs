// Journal persistence — three JSON collections under one directory

use crate::journal::types::{Entry, EntryPatch, Reflection, User};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const USER_FILE: &str = "user.json";
pub const ENTRIES_FILE: &str = "entries.json";
pub const REFLECTIONS_FILE: &str = "reflections.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid journal data in {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An entry keeps at most one reflection.
    #[error("entry {entry_id} already has a reflection")]
    DuplicateReflection { entry_id: String },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Owns the journal directory and every read and write against it.
///
/// Collections are small (one person's journal), so each operation reads the
/// whole file and each mutation rewrites it. Writes go through a temp file
/// and a rename so an interrupted write never truncates a collection.
pub struct JournalStore {
    dir: PathBuf,
}

impl JournalStore {
    /// Opens a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| StoreError::Io {
            path: dir.clone(),
            source: e,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    // ── user ──────────────────────────────────────────────────────────────────

    /// The signed-in user, or `None` when nobody has signed in yet.
    pub fn read_user(&self) -> StoreResult<Option<User>> {
        self.read_collection(USER_FILE)
    }

    pub fn write_user(&self, user: &User) -> StoreResult<()> {
        self.write_collection(USER_FILE, user)
    }

    /// Signs the user out. Entries and reflections stay on disk.
    pub fn clear_user(&self) -> StoreResult<()> {
        let path = self.dir.join(USER_FILE);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io { path, source: e }),
        }
    }

    // ── entries ───────────────────────────────────────────────────────────────

    /// All entries in the order they were written.
    pub fn list_entries(&self) -> StoreResult<Vec<Entry>> {
        Ok(self
            .read_collection::<Vec<Entry>>(ENTRIES_FILE)?
            .unwrap_or_default())
    }

    pub fn append_entry(&self, entry: &Entry) -> StoreResult<()> {
        let mut entries = self.list_entries()?;
        entries.push(entry.clone());
        self.write_collection(ENTRIES_FILE, &entries)
    }

    /// Applies `patch` to the entry with the given id and persists.
    /// An unknown id is ignored.
    pub fn update_entry(&self, id: &str, patch: &EntryPatch) -> StoreResult<()> {
        let mut entries = self.list_entries()?;
        if let Some(entry) = entries.iter_mut().find(|e| e.id == id) {
            if let Some(status) = patch.status {
                entry.status = status;
            }
        }
        self.write_collection(ENTRIES_FILE, &entries)
    }

    // ── reflections ───────────────────────────────────────────────────────────

    /// All reflections in the order they were written.
    pub fn list_reflections(&self) -> StoreResult<Vec<Reflection>> {
        Ok(self
            .read_collection::<Vec<Reflection>>(REFLECTIONS_FILE)?
            .unwrap_or_default())
    }

    /// Appends a reflection, refusing a second one for the same entry.
    pub fn append_reflection(&self, reflection: &Reflection) -> StoreResult<()> {
        let mut reflections = self.list_reflections()?;
        if reflections.iter().any(|r| r.entry_id == reflection.entry_id) {
            return Err(StoreError::DuplicateReflection {
                entry_id: reflection.entry_id.clone(),
            });
        }
        reflections.push(reflection.clone());
        self.write_collection(REFLECTIONS_FILE, &reflections)
    }

    pub fn has_reflection(&self, entry_id: &str) -> StoreResult<bool> {
        Ok(self
            .list_reflections()?
            .iter()
            .any(|r| r.entry_id == entry_id))
    }

    /// The reflection recorded for an entry, if one exists.
    pub fn reflection_for(&self, entry_id: &str) -> StoreResult<Option<Reflection>> {
        Ok(self
            .list_reflections()?
            .into_iter()
            .find(|r| r.entry_id == entry_id))
    }

    // ── plumbing ──────────────────────────────────────────────────────────────

    fn read_collection<T: DeserializeOwned>(&self, file: &str) -> StoreResult<Option<T>> {
        let path = self.dir.join(file);
        let contents = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Io { path, source: e }),
        };
        let value =
            serde_json::from_str(&contents).map_err(|e| StoreError::Corrupt { path, source: e })?;
        Ok(Some(value))
    }

    fn write_collection<T: Serialize>(&self, file: &str, value: &T) -> StoreResult<()> {
        let path = self.dir.join(file);
        let contents = serde_json::to_string_pretty(value).map_err(|e| StoreError::Corrupt {
            path: path.clone(),
            source: e,
        })?;
        let tmp = self.dir.join(format!("{file}.tmp"));
        fs::write(&tmp, contents).map_err(|e| StoreError::Io {
            path: tmp.clone(),
            source: e,
        })?;
        fs::rename(&tmp, &path).map_err(|e| StoreError::Io { path, source: e })
    }
}
