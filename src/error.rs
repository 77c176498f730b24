use std::path::PathBuf;
use thiserror::Error;

/// Main error type for notify-migrate
#[derive(Error, Debug)]
pub enum MigrateError {
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid pattern for rule '{rule}': {source}")]
    InvalidPattern {
        rule: String,
        source: regex::Error,
    },

    #[error("File {} was modified by another process since it was read", .path.display())]
    ConcurrentModification { path: PathBuf },

    #[error("Required rules did not apply: {}", .rules.join(", "))]
    RequiredRuleMissed { rules: Vec<String> },
}

impl MigrateError {
    /// Create a new IO error with path context
    pub fn io_error(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            source: err,
            path: path.into(),
        }
    }

    /// Create a new configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn invalid_pattern(rule: impl Into<String>, source: regex::Error) -> Self {
        Self::InvalidPattern {
            rule: rule.into(),
            source,
        }
    }
}

pub type MigrateResult<T> = Result<T, MigrateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_mentions_path() {
        let err = MigrateError::io_error(
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
            "/tmp/App.tsx",
        );
        let message = err.to_string();
        assert!(message.contains("/tmp/App.tsx"));
        assert!(message.contains("missing"));
        assert!(matches!(err, MigrateError::Io { ref path, .. } if path == &PathBuf::from("/tmp/App.tsx")));
    }

    #[test]
    fn test_required_rules_are_listed() {
        let err = MigrateError::RequiredRuleMissed {
            rules: vec!["add-hook-import".to_string(), "remove-show-notification".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Required rules did not apply: add-hook-import, remove-show-notification"
        );
    }
}
