use axum::body::Bytes;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

/// Object store for recipe images: saves uploads under a unique name and
/// hands back the public URL they are served from.
#[derive(Clone)]
pub struct ImageStorage {
    pub upload_dir: PathBuf,
    pub base_url: String,
}

impl ImageStorage {
    pub fn new(upload_dir: String, base_url: String) -> Self {
        Self {
            upload_dir: PathBuf::from(upload_dir),
            base_url,
        }
    }

    /// Writes the bytes under a fresh UUID name (keeping the original
    /// extension) and returns the public URL path.
    pub async fn save_image(
        &self,
        file_bytes: Bytes,
        original_filename: Option<String>,
    ) -> Result<String, std::io::Error> {
        let extension = original_filename
            .and_then(|name| {
                Path::new(&name)
                    .extension()
                    .and_then(|os_str| os_str.to_str())
                    .map(|s| s.to_owned())
            })
            .map(|ext| format!(".{}", ext))
            .unwrap_or_default();

        let unique_filename = format!("{}{}", Uuid::new_v4(), extension);
        let file_path = self.upload_dir.join(&unique_filename);

        fs::create_dir_all(&self.upload_dir).await?;
        fs::write(&file_path, file_bytes).await?;

        Ok(format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            unique_filename
        ))
    }

    /// Removes the file a previously returned public URL points at. A file
    /// already gone counts as deleted.
    pub async fn delete_image(&self, image_url: &str) -> Result<(), std::io::Error> {
        let relative = image_url
            .strip_prefix(self.base_url.trim_end_matches('/'))
            .unwrap_or(image_url)
            .trim_start_matches('/');
        let file_path = self.upload_dir.join(relative);

        match fs::remove_file(&file_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}
