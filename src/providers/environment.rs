use std::collections::HashMap;

/// Read-only access to environment variables.
pub trait Environment: Send + Sync {
    fn var(&self, key: &str) -> Option<String>;

    /// Like `var`, but an empty value counts as unset.
    fn non_empty_var(&self, key: &str) -> Option<String> {
        self.var(key).filter(|value| !value.is_empty())
    }
}

pub struct ProcessEnvironment {}

impl Environment for ProcessEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl Environment for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}
