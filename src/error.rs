//! Pipeline error types.

use thiserror::Error;

use crate::config::ConfigError;

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, SimError>;

/// Errors that abort a simulation run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// Configuration failed validation
    #[error("invalid configuration: {}", join(.0))]
    InvalidConfig(Vec<ConfigError>),

    /// A model produced NaN or infinity
    #[error("non-finite {quantity} at timestep {timestep}")]
    NonFinite {
        timestep: usize,
        quantity: &'static str,
    },
}

fn join(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_config_lists_fields() {
        let err = SimError::InvalidConfig(vec![
            ConfigError {
                field: "array.pitch".into(),
                message: "must be > 0".into(),
            },
            ConfigError {
                field: "module.n_modules".into(),
                message: "must be > 0".into(),
            },
        ]);
        assert_eq!(
            err.to_string(),
            "invalid configuration: array.pitch: must be > 0; module.n_modules: must be > 0"
        );
    }

    #[test]
    fn non_finite_names_step() {
        let err = SimError::NonFinite {
            timestep: 42,
            quantity: "poa_global",
        };
        assert_eq!(err.to_string(), "non-finite poa_global at timestep 42");
    }
}
