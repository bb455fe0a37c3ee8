use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where rendered charts are written and how they are addressed publicly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Directory that receives `graphs/…` files.
    pub media_root: PathBuf,
    /// Public URL prefix for `media_root`, always ending in `/`.
    pub media_url: String,
}

impl MediaConfig {
    pub fn new(media_root: impl Into<PathBuf>, media_url: impl Into<String>) -> Self {
        let mut media_url = media_url.into();
        if !media_url.ends_with('/') {
            media_url.push('/');
        }
        Self {
            media_root: media_root.into(),
            media_url,
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self::new("media", "/media/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_prefix_gets_trailing_slash() {
        let config = MediaConfig::new("/srv/media", "https://cdn.example.com/media");
        assert_eq!(config.media_url, "https://cdn.example.com/media/");
    }

    #[test]
    fn default_matches_conventional_layout() {
        let config = MediaConfig::default();
        assert_eq!(config.media_root, PathBuf::from("media"));
        assert_eq!(config.media_url, "/media/");
    }
}
