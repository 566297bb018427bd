//! Fixture-directory report source
//!
//! Reads `<dir>/<endpoint name>.json` for each endpoint, e.g.
//! `comments.json` or `co_occurrence.json`. Query parameters are ignored:
//! one directory holds one conversation's documents.

use super::{Endpoint, FetchError, ReportSource};
use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};

pub struct FixtureSource {
    dir: PathBuf,
}

impl FixtureSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File backing `endpoint`
    pub fn file_for(&self, endpoint: Endpoint) -> PathBuf {
        self.dir.join(format!("{}.json", endpoint.name()))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl ReportSource for FixtureSource {
    async fn fetch(
        &self,
        endpoint: Endpoint,
        _params: &[(&'static str, String)],
    ) -> Result<Value, FetchError> {
        let path = self.file_for(endpoint);

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(FetchError::NotFound(path.display().to_string()));
            }
            Err(e) => return Err(FetchError::Io(format!("{}: {}", path.display(), e))),
        };

        serde_json::from_str(&content)
            .map_err(|e| FetchError::Parse(format!("{}: {}", path.display(), e)))
    }
}
