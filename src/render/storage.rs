use std::path::{Path, PathBuf};

use crate::config::MediaConfig;
use crate::error::RenderError;

/// Somewhere rendered files can be written and later served from.
pub trait MediaStorage {
    /// Write `bytes` to `relative` under the media root, creating parent
    /// directories. Returns the full path written.
    fn save(&self, relative: &Path, bytes: &[u8]) -> Result<PathBuf, RenderError>;

    /// Public URL for a file stored at `relative`.
    fn url(&self, relative: &Path) -> String;
}

/// Local-filesystem storage rooted at [`MediaConfig::media_root`].
#[derive(Debug, Clone)]
pub struct FsStorage {
    config: MediaConfig,
}

impl FsStorage {
    pub fn new(config: MediaConfig) -> Self {
        Self { config }
    }
}

impl MediaStorage for FsStorage {
    fn save(&self, relative: &Path, bytes: &[u8]) -> Result<PathBuf, RenderError> {
        let path = self.config.media_root.join(relative);
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|source| RenderError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(&path, bytes).map_err(|source| RenderError::Io {
            path: path.clone(),
            source,
        })?;
        log::debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(path)
    }

    fn url(&self, relative: &Path) -> String {
        let parts: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        format!("{}{}", self.config.media_url, parts.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::new(MediaConfig::new(dir.path(), "/media/"));
        let written = storage
            .save(Path::new("graphs/dist_df_abc.png"), b"png")
            .unwrap();
        assert_eq!(written, dir.path().join("graphs/dist_df_abc.png"));
        assert_eq!(std::fs::read(written).unwrap(), b"png");
    }

    #[test]
    fn url_joins_prefix_and_relative_path() {
        let storage = FsStorage::new(MediaConfig::new("unused", "/media"));
        assert_eq!(
            storage.url(Path::new("graphs/dist_df_abc.png")),
            "/media/graphs/dist_df_abc.png"
        );
    }

    #[test]
    fn save_reports_unwritable_root() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"").unwrap();
        let storage = FsStorage::new(MediaConfig::new(&blocker, "/media/"));
        let err = storage.save(Path::new("graphs/x.png"), b"png").unwrap_err();
        assert!(matches!(err, RenderError::Io { .. }));
    }
}
