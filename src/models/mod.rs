pub mod binary_descriptor;
pub mod configuration;
pub mod proxy_config;
