use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::error::ConfigError;

/// Package metadata describing the native binding this installer fetches.
#[derive(Debug, serde::Deserialize, Clone)]
pub struct PackageManifest {
    pub name: String,
    pub version: String,
    #[serde(rename = "urlPattern")]
    pub url_pattern: String,
    #[serde(default = "default_binary_name", rename = "binaryName")]
    pub binary_name: String,
    #[serde(default = "default_vendor_dir", rename = "vendorDir")]
    pub vendor_dir: PathBuf,
    pub runtime: Runtime,
}

#[derive(Debug, serde::Deserialize, Clone)]
pub struct Runtime {
    pub name: String,
    pub version: String,
    pub abi: String,
}

fn default_binary_name() -> String {
    "binding.node".to_string()
}

fn default_vendor_dir() -> PathBuf {
    PathBuf::from("vendor")
}

impl PackageManifest {
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        read_yaml_file(path).await
    }

    /// `<runtime>/<runtime version> <package>-installer/<package version>`
    pub fn user_agent(&self) -> String {
        format!(
            "{}/{} {}-installer/{}",
            self.runtime.name, self.runtime.version, self.name, self.version
        )
    }
}

/// Proxy keys read from the package manager's configuration.
#[derive(Debug, Default, serde::Deserialize, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct PackageManagerConfig {
    pub https_proxy: Option<String>,
    pub proxy: Option<String>,
    pub http_proxy: Option<String>,
}

pub async fn read_yaml_file<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
