use crate::core::Storage;
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

/// Files relative to a base directory on local disk.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }

    /// Splits a file path into a storage rooted at its parent directory and
    /// the file name.
    pub fn for_file(path: &str) -> (Self, String) {
        let path = Path::new(path);
        let base = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        (Self::new(base.to_string_lossy().into_owned()), name)
    }

    fn resolve(&self, path: &str) -> PathBuf {
        Path::new(&self.base_path).join(path)
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let data = tokio::fs::read(self.resolve(path)).await?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.resolve(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(full_path, data).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_creates_directories() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path().to_string_lossy().into_owned());

        storage.write_file("nested/model.json", b"{}").await.unwrap();
        assert_eq!(storage.read_file("nested/model.json").await.unwrap(), b"{}");
    }

    #[test]
    fn test_for_file_splits_path() {
        let (storage, name) = LocalStorage::for_file("model/heart.json");
        assert_eq!(storage.base_path, "model");
        assert_eq!(name, "heart.json");

        let (storage, name) = LocalStorage::for_file("heart.json");
        assert_eq!(storage.base_path, ".");
        assert_eq!(name, "heart.json");
    }
}
