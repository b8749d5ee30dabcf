//! Errors parsing persisted vocabulary back into model enums.

use super::error_code::{self, UrbanfluxErrorCode};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("unknown {kind}: {value:?}")]
    UnknownVariant { kind: &'static str, value: String },
}

impl ModelError {
    pub(crate) fn unknown(kind: &'static str, value: &str) -> Self {
        Self::UnknownVariant {
            kind,
            value: value.to_string(),
        }
    }
}

impl UrbanfluxErrorCode for ModelError {
    fn error_code(&self) -> &'static str {
        error_code::UNKNOWN_VARIANT
    }
}
