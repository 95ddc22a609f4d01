use std::path::Path;

use crate::error::DownloadError;

pub trait Downloader {
    /// Fetch `url` once and write the body to `destination`.
    fn download(
        &self,
        url: &str,
        destination: &Path,
    ) -> impl std::future::Future<Output = Result<(), DownloadError>> + Send;
}
