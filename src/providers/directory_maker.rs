use std::path::Path;

pub trait DirectoryMaker {
    /// Create `path` and any missing parents.
    fn create_dir_all(
        &self,
        path: &Path,
    ) -> impl std::future::Future<Output = std::io::Result<()>> + Send;
}

pub struct TokioDirectoryMaker {}

impl DirectoryMaker for TokioDirectoryMaker {
    async fn create_dir_all(&self, path: &Path) -> std::io::Result<()> {
        tokio::fs::create_dir_all(path).await
    }
}
