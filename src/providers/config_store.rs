use crate::{error::ConfigError, models::configuration::PackageManagerConfig};

/// Source of the package manager's proxy settings.
pub trait ConfigStore: Send + Sync {
    fn load(
        &self,
    ) -> impl std::future::Future<Output = Result<PackageManagerConfig, ConfigError>> + Send;
}
