//! Deploy error taxonomy.

/// Fatal failure modes of the deploy workflow.
///
/// Authentication-required and name-taken conditions are recovered inside
/// their steps (interactive re-login, fallback remote linking) and only
/// surface as [`DeployError::Remote`] when the recovery path itself fails.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// A required external tool could not be invoked.
    #[error("required tool '{tool}' is not available")]
    MissingTool { tool: String },

    /// Operator-supplied input failed format validation.
    #[error("invalid input: {0}")]
    Validation(String),

    /// An external tool invocation failed with no recovery path.
    #[error("{step} failed: {detail}")]
    Remote {
        step: &'static str,
        detail: String,
    },

    /// The operator abandoned the run at an interactive prompt.
    #[error("cancelled by operator")]
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = DeployError::MissingTool {
            tool: "git".to_string(),
        };
        assert_eq!(err.to_string(), "required tool 'git' is not available");

        let err = DeployError::Remote {
            step: "deploy",
            detail: "push rejected".to_string(),
        };
        assert_eq!(err.to_string(), "deploy failed: push rejected");
    }
}
