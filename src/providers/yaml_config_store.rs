use std::path::PathBuf;

use crate::{
    error::ConfigError,
    models::configuration::{PackageManagerConfig, read_yaml_file},
};

use super::config_store::ConfigStore;

pub struct YamlConfigStore {
    path: PathBuf,
}

impl YamlConfigStore {
    pub fn new(path: PathBuf) -> Self {
        YamlConfigStore { path }
    }
}

impl ConfigStore for YamlConfigStore {
    async fn load(&self) -> Result<PackageManagerConfig, ConfigError> {
        read_yaml_file(&self.path).await
    }
}
