use std::collections::HashMap;

use crate::error::{Result, SceneMirrorError};

/// Read access to named environment variables.
pub trait Environment {
    fn var(&self, name: &str) -> Option<String>;

    /// Like [`Environment::var`], but absence (or an empty value) is a
    /// configuration error.
    fn required(&self, name: &str) -> Result<String> {
        match self.var(name) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(SceneMirrorError::Configuration(format!(
                "The {name} environment variable is not defined"
            ))),
        }
    }
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Fixed variable set, for embedding and tests.
impl Environment for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}
