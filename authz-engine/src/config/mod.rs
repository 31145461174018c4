use crate::error::AuthzError;
use config::{Config as Cfg, File};
use serde::Deserialize;

/// Engine-wide settings.
///
/// `require_active_warrant` mirrors the deployment toggle that lets an
/// installation run without warrant enforcement during rollout; it
/// defaults to on, which is the secure setting.
#[derive(Debug, Deserialize, Clone)]
pub struct EngineConfig {
    #[serde(default = "default_require_active_warrant")]
    pub require_active_warrant: bool,
    #[serde(default)]
    pub debug_authorization: bool,
    #[serde(default = "default_max_log_entries")]
    pub max_log_entries: usize,
}

fn default_require_active_warrant() -> bool {
    true
}

fn default_max_log_entries() -> usize {
    1000
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            require_active_warrant: default_require_active_warrant(),
            debug_authorization: false,
            max_log_entries: default_max_log_entries(),
        }
    }
}

impl EngineConfig {
    pub fn load() -> Result<Self, AuthzError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("authz").required(false))
            .add_source(config::Environment::with_prefix("AUTHZ").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
