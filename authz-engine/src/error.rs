use thiserror::Error;

use crate::models::{BranchId, PolicyKey};

/// Engine error taxonomy.
///
/// A denied check is never an error: `check_can` reports denial as
/// `Ok(false)`. Errors mean the engine could not determine an answer
/// (corrupt reference data, a failed collaborator, a dead clock) and must
/// stay distinguishable from denial.
#[derive(Debug, Error)]
pub enum AuthzError {
    #[error("branch hierarchy cycle detected at branch {0}")]
    HierarchyCycle(BranchId),

    #[error("branch {branch} references missing parent {parent}")]
    MissingBranch { branch: BranchId, parent: BranchId },

    #[error("no policy handler registered for {0}")]
    UnboundPolicy(PolicyKey),

    #[error("clock unavailable: {0}")]
    ClockUnavailable(String),

    #[error("store error: {0}")]
    Store(anyhow::Error),

    #[error("configuration error: {0}")]
    Config(anyhow::Error),
}

impl From<config::ConfigError> for AuthzError {
    fn from(err: config::ConfigError) -> Self {
        AuthzError::Config(anyhow::Error::new(err))
    }
}
