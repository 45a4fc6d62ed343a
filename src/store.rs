//! Artifact storage: the data and upload directories.
//!
//! Both directories are process-wide state with lifecycle "created at
//! startup, never cleaned". The store only writes whole files; nothing in the
//! validation core ever reads them back.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{LineageError, Result};
use crate::person::Person;

/// File name for saved person batches inside the data directory.
const PERSONS_FILE: &str = "personas.json";

pub struct Store {
    data_dir: PathBuf,
    upload_dir: PathBuf,
}

impl Store {
    /// Create both directories if needed and return the store.
    pub fn new(config: &Config) -> Result<Self> {
        std::fs::create_dir_all(&config.storage.data_dir)?;
        std::fs::create_dir_all(&config.storage.upload_dir)?;
        Ok(Self {
            data_dir: config.storage.data_dir.clone(),
            upload_dir: config.storage.upload_dir.clone(),
        })
    }

    /// Directory that the HTTP layer serves under `/uploads`.
    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Persist a person batch as pretty-printed JSON, returning the path
    /// written. Always overwrites the previous batch.
    pub fn save_persons(&self, persons: &[Person]) -> Result<PathBuf> {
        let path = self.data_dir.join(PERSONS_FILE);
        let json = serde_json::to_string_pretty(persons)
            .map_err(|e| LineageError::Parse(format!("failed to encode persons: {}", e)))?;
        std::fs::write(&path, json)?;
        Ok(path)
    }

    /// Store an uploaded avatar under `{person_id}{ext}` and return the
    /// public URL path it will be served from.
    ///
    /// The person id becomes part of a file name, so ids that would escape
    /// the upload directory are rejected.
    pub fn save_avatar(&self, person_id: &str, original_name: &str, content: &[u8]) -> Result<String> {
        if person_id.is_empty()
            || person_id.contains(['/', '\\'])
            || person_id.contains("..")
        {
            return Err(LineageError::InvalidInput(format!(
                "person id not usable as a file name: {}",
                person_id
            )));
        }

        let extension = Path::new(original_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{}", ext))
            .unwrap_or_default();
        let filename = format!("{}{}", person_id, extension);
        std::fs::write(self.upload_dir.join(&filename), content)?;
        Ok(format!("/uploads/{}", filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store() -> (Store, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            storage: crate::config::StorageConfig {
                data_dir: temp_dir.path().join("data"),
                upload_dir: temp_dir.path().join("uploads"),
            },
            ..Config::default()
        };
        (Store::new(&config).unwrap(), temp_dir)
    }

    #[test]
    fn test_new_creates_directories() {
        let (store, _temp) = test_store();
        assert!(store.upload_dir().is_dir());
    }

    #[test]
    fn test_save_persons_roundtrip() {
        let (store, _temp) = test_store();
        let persons = vec![Person::with_parents("A", &[]), Person::with_parents("B", &["A"])];
        let path = store.save_persons(&persons).unwrap();
        assert!(path.ends_with("personas.json"));

        let saved: Vec<Person> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved, persons);
    }

    #[test]
    fn test_save_avatar_keeps_extension() {
        let (store, _temp) = test_store();
        let url = store.save_avatar("p1", "photo.png", b"fake png").unwrap();
        assert_eq!(url, "/uploads/p1.png");
        assert_eq!(
            std::fs::read(store.upload_dir().join("p1.png")).unwrap(),
            b"fake png"
        );
    }

    #[test]
    fn test_save_avatar_without_extension() {
        let (store, _temp) = test_store();
        let url = store.save_avatar("p2", "photo", b"bytes").unwrap();
        assert_eq!(url, "/uploads/p2");
    }

    #[test]
    fn test_save_avatar_rejects_path_escapes() {
        let (store, _temp) = test_store();
        for bad in ["../p1", "a/b", "a\\b", ""] {
            let result = store.save_avatar(bad, "photo.png", b"x");
            assert!(
                matches!(result, Err(LineageError::InvalidInput(_))),
                "id {:?} should be rejected",
                bad
            );
        }
    }
}
