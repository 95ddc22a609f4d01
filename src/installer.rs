use std::path::PathBuf;

use crate::{
    error::{InstallError, error_chain},
    providers::{
        binary_locator::BinaryLocator, directory_maker::DirectoryMaker, downloader::Downloader,
        environment::Environment,
    },
};

pub const SKIP_DOWNLOAD_VAR: &str = "SKIP_SASS_BINARY_DOWNLOAD_FOR_CI";

/// Terminal state of an install run. The caller decides whether `Failed`
/// should turn into a non-zero exit code.
#[derive(Debug)]
pub enum InstallStatus {
    Skipped,
    AlreadyInstalled(PathBuf),
    Installed(PathBuf),
    Failed(InstallError),
}

/// A non-empty skip variable suppresses the whole install.
pub fn skip_requested<E: Environment>(environment: &E) -> bool {
    environment.non_empty_var(SKIP_DOWNLOAD_VAR).is_some()
}

pub struct Installer<L, D, M, E> {
    locator: L,
    downloader: D,
    directory_maker: M,
    environment: E,
}

impl<L, D, M, E> Installer<L, D, M, E>
where
    L: BinaryLocator,
    D: Downloader,
    M: DirectoryMaker,
    E: Environment,
{
    pub fn new(locator: L, downloader: D, directory_maker: M, environment: E) -> Self {
        Installer {
            locator,
            downloader,
            directory_maker,
            environment,
        }
    }

    pub async fn run(&self) -> InstallStatus {
        if skip_requested(&self.environment) {
            tracing::info!("{} is set, skipping binary download", SKIP_DOWNLOAD_VAR);
            return InstallStatus::Skipped;
        }

        tracing::info!("Checking for binary path");
        match self.locator.get_binary_path(true) {
            Ok(path) => {
                tracing::info!("Binary already present at {}", path.display());
                return InstallStatus::AlreadyInstalled(path);
            }
            Err(e) => tracing::debug!("{}", e),
        }

        let descriptor = self.locator.descriptor();
        if let Some(directory) = descriptor.directory() {
            tracing::info!(
                "Binary not found, creating vendor directory {}",
                directory.display()
            );
            if let Err(source) = self.directory_maker.create_dir_all(directory).await {
                return failed(InstallError::DirectoryCreate {
                    path: directory.to_path_buf(),
                    source,
                });
            }
        }

        if let Err(e) = self
            .downloader
            .download(&descriptor.url, &descriptor.path)
            .await
        {
            return failed(e.into());
        }

        tracing::info!(
            "Binary downloaded and installed at {}",
            descriptor.path.display()
        );
        InstallStatus::Installed(descriptor.path.clone())
    }
}

fn failed(error: InstallError) -> InstallStatus {
    tracing::error!("{}", error_chain(&error));
    InstallStatus::Failed(error)
}
