pub mod environment;

pub mod config_store;
pub mod yaml_config_store;
pub mod proxy_resolver;

pub mod downloader;
pub mod http_downloader;

pub mod binary_locator;
pub mod vendor_binary_locator;

pub mod directory_maker;
