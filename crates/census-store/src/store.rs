//! The person repository.
//!
//! One JSON document per record, named by the record's hex id. Writes go
//! through a temp file and an atomic rename so a crash never leaves a
//! half-written document behind.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use census_model::{Person, PersonId};

use crate::error::{Result, StoreError};

/// File-backed CRUD store for validated person records.
///
/// The store assumes its inputs already passed validation; it never re-runs
/// the rule set.
#[derive(Debug, Clone)]
pub struct PersonStore {
    root: PathBuf,
}

impl PersonStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| StoreError::Io {
            operation: "create directory",
            path: root.clone(),
            source,
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Insert a new record under its canonical id.
    pub fn create(&self, person: &Person) -> Result<PersonId> {
        let id = person.canonical_id();
        let path = self.path_for(&id);
        if path.exists() {
            return Err(StoreError::AlreadyExists { id });
        }
        let record = person.clone().with_canonical_id();
        self.write_record(&id, &record)?;
        tracing::info!(%id, "created person record");
        Ok(id)
    }

    /// Fetch a record by id.
    pub fn find_by_id(&self, id: &PersonId) -> Result<Person> {
        let path = self.path_for(id);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound { id: *id });
            }
            Err(source) => {
                return Err(StoreError::Io {
                    operation: "read",
                    path,
                    source,
                });
            }
        };
        serde_json::from_slice(&bytes)
            .map_err(|source| StoreError::Deserialization { path, source })
    }

    /// Replace an existing record.
    pub fn update(&self, id: &PersonId, person: Person) -> Result<Person> {
        if !self.path_for(id).exists() {
            return Err(StoreError::NotFound { id: *id });
        }
        let mut record = person;
        record.id = Some(*id);
        self.write_record(id, &record)?;
        tracing::info!(%id, "updated person record");
        Ok(record)
    }

    /// Delete a record by id.
    pub fn delete(&self, id: &PersonId) -> Result<()> {
        let path = self.path_for(id);
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::info!(%id, "deleted person record");
                Ok(())
            }
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound { id: *id })
            }
            Err(source) => Err(StoreError::Io {
                operation: "delete",
                path,
                source,
            }),
        }
    }

    /// All records, ordered by id for deterministic listings.
    pub fn list(&self) -> Result<Vec<Person>> {
        let entries = fs::read_dir(&self.root).map_err(|source| StoreError::Io {
            operation: "read directory",
            path: self.root.clone(),
            source,
        })?;
        let mut people = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Io {
                operation: "read directory",
                path: self.root.clone(),
                source,
            })?;
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            let bytes = fs::read(&path).map_err(|source| StoreError::Io {
                operation: "read",
                path: path.clone(),
                source,
            })?;
            let person: Person = serde_json::from_slice(&bytes)
                .map_err(|source| StoreError::Deserialization { path, source })?;
            people.push(person);
        }
        people.sort_by_key(|person| person.id);
        Ok(people)
    }

    /// Insert a new record on the blocking pool.
    pub async fn create_async(&self, person: Person) -> Result<PersonId> {
        let store = self.clone();
        spawn_blocking(move || store.create(&person)).await
    }

    /// Fetch a record on the blocking pool.
    pub async fn find_by_id_async(&self, id: PersonId) -> Result<Person> {
        let store = self.clone();
        spawn_blocking(move || store.find_by_id(&id)).await
    }

    /// Replace a record on the blocking pool.
    pub async fn update_async(&self, id: PersonId, person: Person) -> Result<Person> {
        let store = self.clone();
        spawn_blocking(move || store.update(&id, person)).await
    }

    /// Delete a record on the blocking pool.
    pub async fn delete_async(&self, id: PersonId) -> Result<()> {
        let store = self.clone();
        spawn_blocking(move || store.delete(&id)).await
    }

    /// List all records on the blocking pool.
    pub async fn list_async(&self) -> Result<Vec<Person>> {
        let store = self.clone();
        spawn_blocking(move || store.list()).await
    }

    fn path_for(&self, id: &PersonId) -> PathBuf {
        self.root.join(format!("{id}.json"))
    }

    fn write_record(&self, id: &PersonId, person: &Person) -> Result<()> {
        let path = self.path_for(id);
        let temp_path = self.root.join(format!("{id}.json.tmp"));

        let json = serde_json::to_string_pretty(person)
            .map_err(|source| StoreError::Serialization { source })?;

        let mut file = File::create(&temp_path).map_err(|source| StoreError::Io {
            operation: "create",
            path: temp_path.clone(),
            source,
        })?;
        file.write_all(json.as_bytes())
            .map_err(|source| StoreError::Io {
                operation: "write",
                path: temp_path.clone(),
                source,
            })?;
        file.sync_all().map_err(|source| StoreError::Io {
            operation: "sync",
            path: temp_path.clone(),
            source,
        })?;

        fs::rename(&temp_path, &path).map_err(|source| StoreError::AtomicWriteFailed {
            temp_path,
            target_path: path,
            source,
        })
    }
}

async fn spawn_blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|source| StoreError::TaskJoin { source })?
}
