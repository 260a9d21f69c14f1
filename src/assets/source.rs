//! Model URL resolution.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Where model files are fetched from.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Files served next to the application.
    #[default]
    Local,
    /// Files served from a remote CDN.
    Remote,
}

/// Resolves model paths to fetchable URLs.
///
/// The environment is decided by the caller up front instead of being
/// sniffed from the host at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSource {
    environment: Environment,
    local_base: String,
    remote_base: String,
}

impl ModelSource {
    /// A source with explicit bases for both environments.
    #[must_use]
    pub fn new(
        environment: Environment,
        local_base: impl Into<String>,
        remote_base: impl Into<String>,
    ) -> Self {
        Self {
            environment,
            local_base: local_base.into(),
            remote_base: remote_base.into(),
        }
    }

    /// Active environment.
    #[must_use]
    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Base URL or directory for the active environment.
    #[must_use]
    pub fn base(&self) -> &str {
        match self.environment {
            Environment::Local => &self.local_base,
            Environment::Remote => &self.remote_base,
        }
    }

    /// URL for `path` (relative to the model root).
    #[must_use]
    pub fn resolve(&self, path: &str) -> String {
        let base = self.base().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        if base.is_empty() {
            path.to_owned()
        } else {
            format!("{base}/{path}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_against_the_active_base() {
        let local = ModelSource::new(
            Environment::Local,
            "models/",
            "https://cdn.example.com/models",
        );
        assert_eq!(local.resolve("sponza/scene.gltf"), "models/sponza/scene.gltf");

        let remote = ModelSource::new(
            Environment::Remote,
            "models",
            "https://cdn.example.com/models/",
        );
        assert_eq!(
            remote.resolve("/sponza/scene.gltf"),
            "https://cdn.example.com/models/sponza/scene.gltf"
        );
    }

    #[test]
    fn empty_base_yields_the_bare_path() {
        let source = ModelSource::new(Environment::Local, "", "unused");
        assert_eq!(source.resolve("a.gltf"), "a.gltf");
    }
}
