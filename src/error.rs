use std::path::PathBuf;

use thiserror::Error;

/// Failure to obtain the raw slider record. Shown to the user once; never
/// affects a running carousel.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read content from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed content in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to run ffprobe: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("ffprobe exited with {status} for {url}")]
    Failed { url: String, status: std::process::ExitStatus },
    #[error("ffprobe reported no usable duration for {url}: {output:?}")]
    NoDuration { url: String, output: String },
}
