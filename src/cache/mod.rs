//! Content-addressed cache of rendered utterances
//!
//! Each entry maps the fingerprint of a request text to a flat file of raw
//! PCM at the target rate. Entries are written once and never mutated or
//! deleted; disk growth is left to external policy. Concurrent identical
//! requests may both miss and both write the same entry; the content is
//! identical, so the last writer winning is harmless and no locking is used.

use crate::config::Config;
use crate::{Result, TelespeakError};
use md5::{Digest, Md5};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Longest cache path we will compose; longer paths skip caching silently
pub const MAX_CACHE_PATH: usize = 2048;

/// 128-bit content digest of a request text, used as the cache key
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextFingerprint([u8; 16]);

impl TextFingerprint {
    /// Fingerprint the exact text payload
    pub fn of(text: &str) -> Self {
        let digest = Md5::digest(text.as_bytes());
        Self(digest.into())
    }

    /// Lowercase hex rendering, the on-disk entry name
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for TextFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for TextFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TextFingerprint({})", self.to_hex())
    }
}

/// Maps fingerprints to files in the configured cache directory
pub struct CacheManager {
    enabled: bool,
    dir: PathBuf,
}

impl CacheManager {
    /// Create a cache manager over the given directory
    pub fn new(enabled: bool, dir: impl Into<PathBuf>) -> Self {
        Self {
            enabled,
            dir: dir.into(),
        }
    }

    /// Build from the configuration snapshot
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.general.usecache, config.general.cachedir.clone())
    }

    /// Whether caching is enabled at all
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Path an entry for this fingerprint would live at
    ///
    /// Returns None when caching is disabled or the composed path exceeds
    /// [`MAX_CACHE_PATH`]; in both cases caching is skipped for the request.
    pub fn entry_path(&self, fingerprint: &TextFingerprint) -> Option<PathBuf> {
        if !self.enabled {
            return None;
        }

        let path = self.dir.join(fingerprint.to_hex());
        if path.as_os_str().len() > MAX_CACHE_PATH {
            debug!("Cache path too long, skipping cache for this request");
            return None;
        }
        Some(path)
    }

    /// Look for an existing entry
    pub fn lookup(&self, fingerprint: &TextFingerprint) -> Option<PathBuf> {
        let path = self.entry_path(fingerprint)?;
        if path.is_file() {
            debug!("Cache hit: {}", path.display());
            Some(path)
        } else {
            debug!("Cache entry does not yet exist: {}", path.display());
            None
        }
    }

    /// Copy a freshly rendered file into the cache under the fingerprint name
    ///
    /// Called only when the lookup at request start found nothing. Always
    /// targets a fresh path; existing entries are never edited or truncated.
    pub fn commit(&self, source: &Path, fingerprint: &TextFingerprint) -> Result<()> {
        let Some(dest) = self.entry_path(fingerprint) else {
            return Ok(());
        };

        debug!("Saving cache entry {}", dest.display());
        fs::copy(source, &dest).map_err(|e| {
            TelespeakError::CacheWrite(format!(
                "Failed to save cache entry {}: {}",
                dest.display(),
                e
            ))
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_deterministic() {
        assert_eq!(
            TextFingerprint::of("hello world"),
            TextFingerprint::of("hello world")
        );
    }

    #[test]
    fn test_fingerprint_known_digest() {
        // md5("hello world")
        assert_eq!(
            TextFingerprint::of("hello world").to_hex(),
            "5eb63bbbe01eeed093cb22bb8f5acdc3"
        );
    }

    #[test]
    fn test_fingerprint_distinct_texts() {
        assert_ne!(
            TextFingerprint::of("hello world"),
            TextFingerprint::of("hello World")
        );
    }

    #[test]
    fn test_lookup_disabled() {
        let cache = CacheManager::new(false, "/tmp");
        assert!(cache.lookup(&TextFingerprint::of("hello")).is_none());
        assert!(cache.entry_path(&TextFingerprint::of("hello")).is_none());
    }

    #[test]
    fn test_path_length_bound() {
        let long_dir = "/tmp/".to_string() + &"x".repeat(MAX_CACHE_PATH);
        let cache = CacheManager::new(true, long_dir);
        assert!(cache.entry_path(&TextFingerprint::of("hello")).is_none());
    }

    #[test]
    fn test_commit_then_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheManager::new(true, dir.path());
        let fingerprint = TextFingerprint::of("hello world");

        assert!(cache.lookup(&fingerprint).is_none());

        let source = dir.path().join("rendered.sln");
        fs::write(&source, [0u8, 1, 2, 3]).unwrap();
        cache.commit(&source, &fingerprint).unwrap();

        let entry = cache.lookup(&fingerprint).expect("entry should exist");
        assert_eq!(
            entry.file_name().unwrap().to_string_lossy(),
            fingerprint.to_hex()
        );
        assert_eq!(fs::read(&entry).unwrap(), vec![0u8, 1, 2, 3]);
    }

    #[test]
    fn test_commit_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheManager::new(true, dir.path().join("does-not-exist"));
        let source = dir.path().join("rendered.sln");
        fs::write(&source, [0u8]).unwrap();

        let err = cache
            .commit(&source, &TextFingerprint::of("hello"))
            .unwrap_err();
        assert!(err.is_recoverable());
    }
}
