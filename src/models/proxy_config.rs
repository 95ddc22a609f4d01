use std::collections::BTreeMap;

pub const USER_AGENT: &str = "User-Agent";

/// Connection settings for a single download attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    pub proxy: Option<String>,
    /// Self-signed corporate proxies are common, so certificates are not verified.
    pub accept_invalid_certs: bool,
    pub headers: BTreeMap<String, String>,
}

impl ProxyConfig {
    pub fn new(proxy: Option<String>, user_agent: &str) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert(USER_AGENT.to_string(), user_agent.to_string());
        ProxyConfig {
            proxy,
            accept_invalid_certs: true,
            headers,
        }
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.headers.get(USER_AGENT).map(String::as_str)
    }
}
