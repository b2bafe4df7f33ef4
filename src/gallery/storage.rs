use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::{PUBLIC_URL_PREFIX, StoredImage, is_image_file_name};

/// Flat directory of uploaded images. The directory is created lazily on first write.
#[derive(Clone, Debug)]
pub struct PhotoStorage {
    base_dir: PathBuf,
}

impl PhotoStorage {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn resolve_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name.trim_start_matches('/'))
    }

    pub fn public_url(&self, name: &str) -> String {
        format!("{PUBLIC_URL_PREFIX}/{}", name.trim_start_matches('/'))
    }

    /// Writes `data` under a name that must not exist yet.
    ///
    /// A partially written file is removed before the error is returned.
    pub async fn put_new(&self, name: &str, data: &[u8]) -> Result<PathBuf> {
        fs::create_dir_all(&self.base_dir)
            .await
            .with_context(|| format!("create upload dir {}", self.base_dir.display()))?;
        let path = self.resolve_path(name);
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .with_context(|| format!("create {}", path.display()))?;
        if let Err(err) = write_synced(&mut file, data).await {
            drop(file);
            let _ = fs::remove_file(&path).await;
            return Err(err).with_context(|| format!("write {}", path.display()));
        }
        Ok(path)
    }

    /// Images in the directory, newest first. A missing directory lists as empty.
    pub async fn list(&self) -> Result<Vec<StoredImage>> {
        let mut dir = match fs::read_dir(&self.base_dir).await {
            Ok(dir) => dir,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("read upload dir {}", self.base_dir.display()));
            }
        };

        let mut images = Vec::new();
        while let Some(entry) = dir.next_entry().await? {
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if !is_image_file_name(&name) {
                continue;
            }
            let metadata = match fs::metadata(entry.path()).await {
                Ok(metadata) => metadata,
                // Removed between read_dir and stat.
                Err(err) if err.kind() == ErrorKind::NotFound => continue,
                Err(err) => return Err(err).with_context(|| format!("stat {name}")),
            };
            if !metadata.is_file() {
                continue;
            }
            let uploaded: DateTime<Utc> = metadata.modified()?.into();
            images.push(StoredImage {
                url: self.public_url(&name),
                name,
                uploaded,
            });
        }
        images.sort_by(|a, b| {
            b.uploaded
                .cmp(&a.uploaded)
                .then_with(|| b.name.cmp(&a.name))
        });
        Ok(images)
    }
}

async fn write_synced(file: &mut fs::File, data: &[u8]) -> std::io::Result<()> {
    file.write_all(data).await?;
    file.flush().await?;
    file.sync_all().await
}
