use crate::{
    error::error_chain,
    models::{configuration::PackageManagerConfig, proxy_config::ProxyConfig},
};

use super::{config_store::ConfigStore, environment::Environment};

static PROXY_ENV_VARS: [&str; 4] = ["HTTPS_PROXY", "https_proxy", "HTTP_PROXY", "http_proxy"];

pub struct ProxyResolver<C, E> {
    config_store: C,
    environment: E,
    user_agent: String,
}

impl<C: ConfigStore, E: Environment> ProxyResolver<C, E> {
    pub fn new(config_store: C, environment: E, user_agent: String) -> Self {
        ProxyResolver {
            config_store,
            environment,
            user_agent,
        }
    }

    /// Never fails: an unreadable package manager configuration falls back
    /// to the environment, and no proxy at all is a valid result.
    pub async fn resolve(&self) -> ProxyConfig {
        let configured = match self.config_store.load().await {
            Ok(config) => from_package_manager(config),
            Err(e) => {
                tracing::debug!(
                    "Package manager configuration unavailable, using environment: {}",
                    error_chain(&e)
                );
                None
            }
        };

        let proxy = configured.or_else(|| {
            PROXY_ENV_VARS
                .iter()
                .find_map(|key| self.environment.non_empty_var(key))
        });

        ProxyConfig::new(proxy, &self.user_agent)
    }
}

fn from_package_manager(config: PackageManagerConfig) -> Option<String> {
    [config.https_proxy, config.proxy, config.http_proxy]
        .into_iter()
        .flatten()
        .find(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::PathBuf;

    use super::*;
    use crate::error::ConfigError;

    const USER_AGENT: &str = "node/v18.17.0 node-sass-installer/3.4.2";

    struct StaticConfigStore {
        config: Option<PackageManagerConfig>,
    }

    impl ConfigStore for StaticConfigStore {
        async fn load(&self) -> Result<PackageManagerConfig, ConfigError> {
            self.config.clone().ok_or_else(|| ConfigError::Read {
                path: PathBuf::from("/nonexistent/config.yml"),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            })
        }
    }

    fn store(config: PackageManagerConfig) -> StaticConfigStore {
        StaticConfigStore {
            config: Some(config),
        }
    }

    fn broken_store() -> StaticConfigStore {
        StaticConfigStore { config: None }
    }

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_resolve_without_any_proxy() {
        // Arrange
        let resolver = ProxyResolver::new(
            store(PackageManagerConfig::default()),
            env(&[]),
            USER_AGENT.to_string(),
        );

        // Act
        let config = resolver.resolve().await;

        // Assert
        assert_eq!(config.proxy, None);
        assert!(config.accept_invalid_certs);
        assert_eq!(config.user_agent(), Some(USER_AGENT));
    }

    #[tokio::test]
    async fn test_resolve_environment_only_follows_priority() {
        // Arrange
        let resolver = ProxyResolver::new(
            store(PackageManagerConfig::default()),
            env(&[
                ("http_proxy", "http://lower.http:1"),
                ("HTTP_PROXY", "http://upper.http:2"),
                ("https_proxy", "http://lower.https:3"),
            ]),
            USER_AGENT.to_string(),
        );

        // Act
        let config = resolver.resolve().await;

        // Assert
        assert_eq!(config.proxy.as_deref(), Some("http://lower.https:3"));
    }

    #[tokio::test]
    async fn test_resolve_environment_falls_through_to_http_proxy() {
        // Arrange
        let resolver = ProxyResolver::new(
            store(PackageManagerConfig::default()),
            env(&[("HTTPS_PROXY", ""), ("http_proxy", "http://lower.http:1")]),
            USER_AGENT.to_string(),
        );

        // Act
        let config = resolver.resolve().await;

        // Assert
        assert_eq!(config.proxy.as_deref(), Some("http://lower.http:1"));
    }

    #[tokio::test]
    async fn test_resolve_package_manager_only_follows_priority() {
        // Arrange
        let resolver = ProxyResolver::new(
            store(PackageManagerConfig {
                https_proxy: None,
                proxy: Some("http://plain.proxy:3128".to_string()),
                http_proxy: Some("http://http.proxy:8080".to_string()),
            }),
            env(&[]),
            USER_AGENT.to_string(),
        );

        // Act
        let config = resolver.resolve().await;

        // Assert
        assert_eq!(config.proxy.as_deref(), Some("http://plain.proxy:3128"));
    }

    #[tokio::test]
    async fn test_resolve_package_manager_wins_over_environment() {
        // Arrange
        let resolver = ProxyResolver::new(
            store(PackageManagerConfig {
                https_proxy: Some("http://secure.proxy:8443".to_string()),
                proxy: Some("http://plain.proxy:3128".to_string()),
                http_proxy: None,
            }),
            env(&[("HTTPS_PROXY", "http://env.proxy:9000")]),
            USER_AGENT.to_string(),
        );

        // Act
        let config = resolver.resolve().await;

        // Assert
        assert_eq!(config.proxy.as_deref(), Some("http://secure.proxy:8443"));
    }

    #[tokio::test]
    async fn test_resolve_empty_package_manager_values_fall_through() {
        // Arrange
        let resolver = ProxyResolver::new(
            store(PackageManagerConfig {
                https_proxy: Some(String::new()),
                proxy: None,
                http_proxy: None,
            }),
            env(&[("HTTP_PROXY", "http://env.proxy:9000")]),
            USER_AGENT.to_string(),
        );

        // Act
        let config = resolver.resolve().await;

        // Assert
        assert_eq!(config.proxy.as_deref(), Some("http://env.proxy:9000"));
    }

    #[tokio::test]
    async fn test_resolve_survives_broken_config_store() {
        // Arrange
        let resolver = ProxyResolver::new(
            broken_store(),
            env(&[("https_proxy", "http://env.proxy:9000")]),
            USER_AGENT.to_string(),
        );

        // Act
        let config = resolver.resolve().await;

        // Assert
        assert_eq!(config.proxy.as_deref(), Some("http://env.proxy:9000"));
        assert!(config.accept_invalid_certs);
        assert_eq!(config.user_agent(), Some(USER_AGENT));
    }

    #[tokio::test]
    async fn test_resolve_broken_config_store_and_empty_environment() {
        // Arrange
        let resolver = ProxyResolver::new(broken_store(), env(&[]), USER_AGENT.to_string());

        // Act
        let config = resolver.resolve().await;

        // Assert
        assert_eq!(config.proxy, None);
    }
}
