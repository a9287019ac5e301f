//! Error types for pool construction and viewpoint validation

use glam::Vec3;

#[derive(Debug, thiserror::Error)]
pub enum FlybyError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("invalid viewpoint {index}: {position} is not finite")]
    InvalidInput { index: usize, position: Vec3 },
    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

pub type FlybyResult<T> = Result<T, FlybyError>;

impl FlybyError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        FlybyError::InvalidConfiguration(msg.into())
    }
}
