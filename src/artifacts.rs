use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use failure::ResultExt;
use log::{info, warn};

use crate::errors::*;
use crate::models::TrainingArtifacts;

/// Outcome of looking up a persisted artifact.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup<T> {
    Hit(T),
    Miss,
}

impl<T> CacheLookup<T> {
    pub fn is_hit(&self) -> bool {
        match self {
            CacheLookup::Hit(_) => true,
            CacheLookup::Miss => false,
        }
    }

    /// Returns the cached value, or builds it when missing.
    pub fn or_build<F>(self, build: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        match self {
            CacheLookup::Hit(value) => Ok(value),
            CacheLookup::Miss => build(),
        }
    }
}

/// Binary file cache for [`TrainingArtifacts`].
///
/// Once written, the cache is never invalidated: a later change of the corpus
/// is not detected and the stored artifacts keep being served.
pub struct ArtifactCache {
    path: PathBuf,
}

impl ArtifactCache {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Absent, unreadable or undecodable files are a miss.
    pub fn load(&self) -> Result<CacheLookup<TrainingArtifacts>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(ref e) if e.kind() == io::ErrorKind::NotFound => {
                info!("No cached training data found at {:?}", self.path);
                return Ok(CacheLookup::Miss);
            }
            Err(e) => {
                warn!(
                    "Cannot read cached training data {:?}, rebuilding it: {}",
                    self.path, e
                );
                return Ok(CacheLookup::Miss);
            }
        };
        match bincode::deserialize::<TrainingArtifacts>(&bytes) {
            Ok(artifacts) => {
                info!("Cached training data loaded from {:?}", self.path);
                Ok(CacheLookup::Hit(artifacts))
            }
            Err(e) => {
                warn!(
                    "Cannot decode cached training data {:?}, rebuilding it: {}",
                    self.path, e
                );
                Ok(CacheLookup::Miss)
            }
        }
    }

    pub fn store(&self, artifacts: &TrainingArtifacts) -> Result<()> {
        let bytes = bincode::serialize(artifacts)
            .with_context(|_| "Cannot serialize training data".to_string())?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|_| format!("Cannot create directory {:?}", parent))?;
            }
        }
        fs::write(&self.path, bytes)
            .with_context(|_| format!("Cannot write cached training data {:?}", self.path))?;
        info!("Training data cached to {:?}", self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent_classifier::build_training_artifacts;
    use crate::resources::stemmer::LancasterStemmer;
    use crate::testutils::sample_corpus;

    #[test]
    fn load_misses_when_file_is_absent() {
        // Given
        let temp_dir = tempfile::tempdir().unwrap();
        let cache = ArtifactCache::new(temp_dir.path().join("training_data.bin"));

        // When
        let lookup = cache.load().unwrap();

        // Then
        assert_eq!(CacheLookup::Miss, lookup);
    }

    #[test]
    fn store_then_load_round_trips() {
        // Given
        let temp_dir = tempfile::tempdir().unwrap();
        let cache = ArtifactCache::new(temp_dir.path().join("cache").join("training_data.bin"));
        let artifacts = build_training_artifacts(&sample_corpus(), &LancasterStemmer).unwrap();

        // When
        cache.store(&artifacts).unwrap();
        let lookup = cache.load().unwrap();

        // Then
        assert_eq!(CacheLookup::Hit(artifacts), lookup);
    }

    #[test]
    fn load_misses_when_file_is_corrupt() {
        // Given
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("training_data.bin");
        fs::write(&path, b"\x01\x02not a cache").unwrap();
        let cache = ArtifactCache::new(&path);

        // When
        let lookup = cache.load().unwrap();

        // Then
        assert!(!lookup.is_hit());
    }

    #[test]
    fn load_misses_when_file_is_unreadable() {
        // Given
        let temp_dir = tempfile::tempdir().unwrap();
        let cache = ArtifactCache::new(temp_dir.path());

        // When
        let lookup = cache.load().unwrap();

        // Then
        assert_eq!(CacheLookup::Miss, lookup);
    }

    #[test]
    fn store_fails_when_path_is_not_writable() {
        // Given
        let temp_dir = tempfile::tempdir().unwrap();
        let cache = ArtifactCache::new(temp_dir.path());
        let artifacts = build_training_artifacts(&sample_corpus(), &LancasterStemmer).unwrap();

        // When
        let result = cache.store(&artifacts);

        // Then
        assert!(result.is_err());
    }

    #[test]
    fn or_build_only_builds_on_miss() {
        let hit: CacheLookup<u32> = CacheLookup::Hit(3);
        assert_eq!(3, hit.or_build(|| panic!("should not build")).unwrap());

        let miss: CacheLookup<u32> = CacheLookup::Miss;
        assert_eq!(7, miss.or_build(|| Ok(7)).unwrap());
    }
}
