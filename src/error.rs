//! Error types for container operations.
//!
//! Every variant signals a programmer or configuration mistake, not a
//! runtime failure; there is no recovery path and each propagates
//! straight to the caller.

/// Main error type for all container operations.
#[derive(Debug, thiserror::Error)]
pub enum SanduqError {
    /// The requested key was never bound.
    #[error(
        "the key {key:?} has not been bound in the container\n  \
         Hint: Did you forget to call bind_value or bind_factory for {key:?}?"
    )]
    NotFound { key: String },

    /// Tried to extend an entry that was bound as a plain literal.
    #[error("{key:?} has to be invocable in order to extend it")]
    NotInvocable { key: String },

    /// A typed resolution found a value of a different type.
    #[error("type mismatch resolving {key:?}: expected {expected}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
    },
}

/// Convenient Result type for container operations.
pub type Result<T> = std::result::Result<T, SanduqError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display_names_the_key() {
        let err = SanduqError::NotFound {
            key: "database".into(),
        };

        let msg = format!("{err}");
        assert!(msg.contains("\"database\""));
        assert!(msg.contains("has not been bound"));
        assert!(msg.contains("Hint"));
    }

    #[test]
    fn not_invocable_display() {
        let err = SanduqError::NotInvocable {
            key: "config".into(),
        };

        let msg = format!("{err}");
        assert!(msg.contains("\"config\""));
        assert!(msg.contains("invocable"));
    }

    #[test]
    fn type_mismatch_display_names_expected_type() {
        let err = SanduqError::TypeMismatch {
            key: "n".into(),
            expected: "alloc::string::String",
        };

        let msg = format!("{err}");
        assert!(msg.contains("\"n\""));
        assert!(msg.contains("String"));
    }
}
