use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::github::client::GitHubApi;
use crate::github::error::RequestError;

/// Get the platform-appropriate cache directory for orko
pub fn get_cache_path() -> PathBuf {
    dirs::cache_dir()
        .map(|p| p.join("orko/http-cache"))
        .unwrap_or_else(|| {
            PathBuf::from(format!(
                "{}/.cache/orko/http-cache",
                std::env::var("HOME").unwrap_or_default()
            ))
        })
}

/// Remove a cache directory and everything in it
pub fn clear_cache(cache_path: &Path) -> Result<()> {
    match fs::remove_dir_all(cache_path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).context("Failed to remove cache directory"),
    }
}

/// Cache key for a request: MD5 of the path followed by every parameter
/// value (keys are not part of the key), hex encoded.
///
/// Parameter order matters, so callers must always pass them in the same order.
pub fn cache_key(path: &str, params: &[(&str, String)]) -> String {
    let mut material = String::from(path);
    for (_, value) in params {
        material.push_str(value);
    }
    format!("{:x}", md5::compute(material.as_bytes()))
}

/// Memoizes responses of the wrapped client on disk, one file per request.
///
/// Entries never expire; use `clear_cache` to start over.
pub struct DiskCacheClient<C> {
    inner: C,
    cache_dir: PathBuf,
}

impl<C> DiskCacheClient<C> {
    pub fn new(inner: C, cache_dir: PathBuf) -> Self {
        Self { inner, cache_dir }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    fn entry_path(&self, path: &str, params: &[(&str, String)]) -> PathBuf {
        self.cache_dir.join(cache_key(path, params))
    }

    fn load(&self, entry: &Path) -> Result<Option<String>, RequestError> {
        match fs::read_to_string(entry) {
            Ok(body) => Ok(Some(body)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(RequestError::Cache {
                path: entry.to_path_buf(),
                source,
            }),
        }
    }

    fn store(&self, entry: &Path, body: &str) -> Result<(), RequestError> {
        let cache_err = |source: std::io::Error| RequestError::Cache {
            path: entry.to_path_buf(),
            source,
        };

        fs::create_dir_all(&self.cache_dir).map_err(cache_err)?;

        // Never leave a half-written entry behind
        let mut file = AtomicWriteFile::open(entry).map_err(cache_err)?;
        file.write_all(body.as_bytes()).map_err(cache_err)?;
        file.commit().map_err(cache_err)?;
        Ok(())
    }
}

impl<C: GitHubApi> GitHubApi for DiskCacheClient<C> {
    async fn get_raw(&self, path: &str, params: &[(&str, String)]) -> Result<String, RequestError> {
        let entry = self.entry_path(path, params);

        if let Some(body) = self.load(&entry)? {
            debug!(path, entry = %entry.display(), "cache hit");
            return Ok(body);
        }

        debug!(path, entry = %entry.display(), "cache miss");
        let body = self.inner.get_raw(path, params).await?;
        self.store(&entry, &body)?;
        Ok(body)
    }
}
