use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::error::Result;

/// A reply written to the uploads directory
#[derive(Debug, Clone)]
pub struct StoredReply {
    pub file_name: String,
    pub path: PathBuf,
    /// Public URL, e.g. `/uploads/output_1700000000000.wav`
    pub url: String,
}

/// Persists reply audio so it can be served back for playback
pub struct ReplyStore {
    dir: PathBuf,
    url_prefix: String,
}

impl ReplyStore {
    pub fn new(dir: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            url_prefix: url_prefix.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn url_prefix(&self) -> &str {
        &self.url_prefix
    }

    /// Write `bytes` as `output_<unix-millis>.wav`
    ///
    /// Never overwrites: a name already taken gets a `-<n>` suffix.
    pub async fn save(&self, bytes: &[u8]) -> Result<StoredReply> {
        fs::create_dir_all(&self.dir).await?;

        let stem = format!("output_{}", chrono::Utc::now().timestamp_millis());
        let mut attempt = 0u32;

        loop {
            let file_name = if attempt == 0 {
                format!("{}.wav", stem)
            } else {
                format!("{}-{}.wav", stem, attempt)
            };
            let path = self.dir.join(&file_name);

            match OpenOptions::new().write(true).create_new(true).open(&path).await {
                Ok(mut file) => {
                    file.write_all(bytes).await?;
                    file.flush().await?;

                    info!("Saved reply audio: {} ({} bytes)", path.display(), bytes.len());

                    return Ok(StoredReply {
                        url: format!("{}/{}", self.url_prefix, file_name),
                        file_name,
                        path,
                    });
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => return Err(e.into()),
            }
        }
    }
}
