// ─────────────────────────────────────────────────────────────────────
// SCPN Vlasov Core — Error
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VlasovError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unknown {option}: '{value}'")]
    UnknownOption { option: &'static str, value: String },

    #[error("Shape mismatch in {context}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        context: &'static str,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("Physics constraint violated: {0}")]
    PhysicsViolation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl VlasovError {
    pub fn unknown(option: &'static str, value: impl Into<String>) -> Self {
        VlasovError::UnknownOption {
            option,
            value: value.into(),
        }
    }

    pub fn shape(context: &'static str, expected: &[usize], actual: &[usize]) -> Self {
        VlasovError::ShapeMismatch {
            context,
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        }
    }
}

pub type VlasovResult<T> = Result<T, VlasovError>;
