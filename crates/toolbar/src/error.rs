use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolbarError {
    #[error("invalid toolbar config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("failed to read {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unsupported media type for {0}")]
    UnsupportedMedia(String),
}
