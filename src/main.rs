use std::{path::PathBuf, process::ExitCode, time::Duration};

use clap::Parser;

pub mod error;
pub mod installer;
pub mod logging;
pub mod models;
pub mod providers;

use crate::{
    error::{InstallError, error_chain},
    installer::{InstallStatus, Installer, skip_requested},
    models::configuration::PackageManifest,
    providers::{
        directory_maker::TokioDirectoryMaker, environment::ProcessEnvironment,
        http_downloader::HttpDownloader, proxy_resolver::ProxyResolver,
        vendor_binary_locator::VendorBinaryLocator, yaml_config_store::YamlConfigStore,
    },
};

static DEFAULT_CONFIG_LOCATION: &str = "~/.sass-installer/config.yml";

/// Post-install hook that downloads the native Sass binding when it is missing.
#[derive(Debug, Parser)]
#[command(name = "sass-binary-installer", version)]
struct Cli {
    /// Package manifest describing the binding.
    #[arg(long, value_name = "PATH", default_value = "package.yml")]
    manifest: PathBuf,
    /// Package root the vendor directory lives under.
    #[arg(long, value_name = "PATH", default_value = ".")]
    root: PathBuf,
    /// Package manager configuration holding proxy settings.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_LOCATION)]
    config: String,
    /// Give up on the download after this many seconds.
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,
    /// Exit with a non-zero code when the binding could not be installed.
    #[arg(long)]
    strict: bool,
}

async fn install(cli: &Cli) -> InstallStatus {
    // Checked here as well so CI runs do not need a readable manifest.
    if skip_requested(&ProcessEnvironment {}) {
        tracing::info!("Skipping downloading binaries on CI builds");
        return InstallStatus::Skipped;
    }

    let manifest = match PackageManifest::load(&cli.manifest).await {
        Ok(manifest) => manifest,
        Err(e) => return setup_failed(InstallError::Manifest(e)),
    };
    tracing::info!(
        runtime = %format!("{} {}", manifest.runtime.name, manifest.runtime.version),
        abi = %manifest.runtime.abi,
        package = %format!("{} {}", manifest.name, manifest.version),
        "Versions"
    );

    let locator = match VendorBinaryLocator::for_current_platform(&manifest, &cli.root) {
        Ok(locator) => locator,
        Err(e) => return setup_failed(e.into()),
    };

    let config_path = shellexpand::tilde(&cli.config);
    let proxy_resolver = ProxyResolver::new(
        YamlConfigStore::new(PathBuf::from(config_path.into_owned())),
        ProcessEnvironment {},
        manifest.user_agent(),
    );
    let downloader = HttpDownloader::new(proxy_resolver, cli.timeout.map(Duration::from_secs));

    Installer::new(
        locator,
        downloader,
        TokioDirectoryMaker {},
        ProcessEnvironment {},
    )
    .run()
    .await
}

fn setup_failed(error: InstallError) -> InstallStatus {
    tracing::error!("{}", error_chain(&error));
    InstallStatus::Failed(error)
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init_logging();
    let cli = Cli::parse();

    match install(&cli).await {
        InstallStatus::Skipped => ExitCode::SUCCESS,
        InstallStatus::AlreadyInstalled(path) | InstallStatus::Installed(path) => {
            tracing::debug!("Binding ready at {}", path.display());
            ExitCode::SUCCESS
        }
        InstallStatus::Failed(_) if cli.strict => ExitCode::FAILURE,
        InstallStatus::Failed(_) => {
            tracing::warn!("Binary install failed; continuing without it");
            ExitCode::SUCCESS
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_defaults() {
        // Act
        let cli = Cli::try_parse_from(["sass-binary-installer"]).unwrap();

        // Assert
        assert_eq!(cli.manifest, PathBuf::from("package.yml"));
        assert_eq!(cli.root, PathBuf::from("."));
        assert_eq!(cli.config, DEFAULT_CONFIG_LOCATION);
        assert_eq!(cli.timeout, None);
        assert!(!cli.strict);
    }

    #[test]
    fn test_cli_overrides() {
        // Act
        let cli = Cli::try_parse_from([
            "sass-binary-installer",
            "--manifest",
            "/pkg/package.yml",
            "--root",
            "/pkg",
            "--timeout",
            "120",
            "--strict",
        ])
        .unwrap();

        // Assert
        assert_eq!(cli.manifest, PathBuf::from("/pkg/package.yml"));
        assert_eq!(cli.root, PathBuf::from("/pkg"));
        assert_eq!(cli.timeout, Some(120));
        assert!(cli.strict);
    }
}
