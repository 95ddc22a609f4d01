use std::{io, path::PathBuf};

use thiserror::Error;

/// Failures reading one of the YAML files the installer consumes.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {}, {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to parse {}, {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Error)]
pub enum LocatorError {
    #[error("Unsupported platform {os}/{arch}")]
    UnsupportedPlatform { os: String, arch: String },
    #[error("Binary not found at {}", .path.display())]
    NotFound { path: PathBuf },
    #[error("Binary at {} is not usable: {reason}", .path.display())]
    Invalid { path: PathBuf, reason: String },
}

/// Outcome of a single failed download attempt.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The request could not be built or issued (bad proxy URL, bad header).
    #[error("Cannot download \"{url}\": {message}")]
    Request { url: String, message: String },
    #[error("Cannot download \"{url}\": {message}")]
    Transport { url: String, message: String },
    #[error("Cannot download \"{url}\": HTTP error {status} {reason}")]
    HttpStatus {
        url: String,
        status: u16,
        reason: String,
    },
    #[error("Failed to write {}, {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("Failed to load package manifest: {0}")]
    Manifest(#[source] ConfigError),
    #[error(transparent)]
    Locate(#[from] LocatorError),
    #[error("Failed to create directory {}, {source}", .path.display())]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Download(#[from] DownloadError),
}

/// Flatten an error and its sources into a single line.
pub fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let cause_message = cause.to_string();
        if !message.contains(&cause_message) {
            message.push_str(": ");
            message.push_str(&cause_message);
        }
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_message_mentions_url_and_status() {
        // Arrange
        let error = DownloadError::HttpStatus {
            url: "https://example.com/binding.node".to_string(),
            status: 404,
            reason: "Not Found".to_string(),
        };

        // Act
        let message = error.to_string();

        // Assert
        assert_eq!(
            message,
            "Cannot download \"https://example.com/binding.node\": HTTP error 404 Not Found"
        );
    }

    #[test]
    fn test_error_chain_appends_sources() {
        // Arrange
        let error = InstallError::DirectoryCreate {
            path: PathBuf::from("/vendor/linux-x64-108"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };

        // Act
        let message = error_chain(&error);

        // Assert
        assert_eq!(
            message,
            "Failed to create directory /vendor/linux-x64-108, denied"
        );
    }
}
