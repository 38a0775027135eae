//! Error taxonomy for scene geometry operations.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SceneError {
    /// A caller-supplied parameter is invalid. Raised immediately and
    /// never substituted with a fallback.
    #[error("invalid {parameter}: {reason}")]
    Config {
        parameter: &'static str,
        reason: String,
    },

    /// An attempt-budgeted search ran out of attempts.
    #[error("could not place {target} after {attempts} attempts")]
    PlacementExhausted { target: String, attempts: u32 },

    #[error("invalid plan JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl SceneError {
    pub fn config(parameter: &'static str, reason: impl Into<String>) -> Self {
        SceneError::Config {
            parameter,
            reason: reason.into(),
        }
    }
}

pub type SceneResult<T> = Result<T, SceneError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_message_names_parameter() {
        let err =
            SceneError::config("tool_type", "unknown shape tool_rect_9_x_9");
        assert_eq!(
            err.to_string(),
            "invalid tool_type: unknown shape tool_rect_9_x_9"
        );
    }

    #[test]
    fn exhausted_message() {
        let err = SceneError::PlacementExhausted {
            target: "occluder".into(),
            attempts: 100,
        };
        assert_eq!(
            err.to_string(),
            "could not place occluder after 100 attempts"
        );
    }
}
