use super::crypto::FileCipher;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;
use tokio::sync::RwLock;

/// Errors from the flat-file record store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("File IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error on {path}: {source}")]
    Serde {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Crypto error on {path}: {message}")]
    Crypto { path: String, message: String },
}

/// One JSON file holding a whole entity collection
///
/// The makeshift database of the storefront: `load_all` reads and
/// memoizes the entire file, `save_all` rewrites it and replaces the
/// cache. There is no cross-process locking and no transaction; callers
/// that mutate two collections do so as two unguarded saves.
pub struct JsonStore<T> {
    path: PathBuf,
    cipher: Option<FileCipher>,
    cache: RwLock<Option<Vec<T>>>,
}

impl<T> JsonStore<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync,
{
    /// Creates a store over the given file
    ///
    /// # Arguments
    /// * `path` - The collection file, e.g. `data/users.json`
    /// * `cipher` - Whole-file codec; `None` stores plain JSON
    pub fn new(path: PathBuf, cipher: Option<FileCipher>) -> Self {
        Self {
            path,
            cipher,
            cache: RwLock::new(None),
        }
    }

    fn path_str(&self) -> String {
        self.path.display().to_string()
    }

    /// Returns the whole collection, reading the file at most once
    ///
    /// A missing file reads as an empty collection.
    pub async fn load_all(&self) -> Result<Vec<T>, StoreError> {
        {
            let cache = self.cache.read().await;
            if let Some(records) = cache.as_ref() {
                return Ok(records.clone());
            }
        }

        let records = self.read_file().await?;

        let mut cache = self.cache.write().await;
        *cache = Some(records.clone());
        Ok(records)
    }

    /// Rewrites the whole collection file and refreshes the cache
    pub async fn save_all(&self, records: Vec<T>) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(&records).map_err(|e| StoreError::Serde {
            path: self.path_str(),
            source: e,
        })?;

        let body = match &self.cipher {
            Some(cipher) => cipher.seal(&json),
            None => json,
        };

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::Io {
                    path: self.path_str(),
                    source: e,
                })?;
        }

        tokio::fs::write(&self.path, body)
            .await
            .map_err(|e| StoreError::Io {
                path: self.path_str(),
                source: e,
            })?;

        let mut cache = self.cache.write().await;
        *cache = Some(records);
        Ok(())
    }

    /// Inserts or replaces one record, matching on the key extractor
    pub async fn upsert<K, F>(&self, record: T, key_of: F) -> Result<(), StoreError>
    where
        K: PartialEq,
        F: Fn(&T) -> K,
    {
        let mut records = self.load_all().await?;
        let key = key_of(&record);
        match records.iter_mut().find(|r| key_of(&**r) == key) {
            Some(slot) => *slot = record,
            None => records.push(record),
        }
        self.save_all(records).await
    }

    /// Removes records matching the predicate
    pub async fn remove<F>(&self, matches: F) -> Result<(), StoreError>
    where
        F: Fn(&T) -> bool,
    {
        let mut records = self.load_all().await?;
        records.retain(|r| !matches(r));
        self.save_all(records).await
    }

    async fn read_file(&self) -> Result<Vec<T>, StoreError> {
        let body = match tokio::fs::read(&self.path).await {
            Ok(body) => body,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StoreError::Io {
                    path: self.path_str(),
                    source: e,
                })
            }
        };

        let json = match &self.cipher {
            Some(cipher) => cipher.open(&body).map_err(|message| StoreError::Crypto {
                path: self.path_str(),
                message,
            })?,
            None => body,
        };

        serde_json::from_slice(&json).map_err(|e| StoreError::Serde {
            path: self.path_str(),
            source: e,
        })
    }
}
