//! Unified error type for effect operations
//!
//! Every failure in the effect core is an ordinary rejection carried by this
//! one enum. There are no retries and no abort paths; callers of [`handle`]
//! and handlers observing a [`Completion`] decide what to do with each error.
//!
//! [`handle`]: crate::handle
//! [`Completion`]: crate::Completion

use serde::{Deserialize, Serialize};

/// Unified error type for all effect operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum EffectError {
    /// Perform was called outside any computation wrapped by `handle`
    #[error("perform must be called inside a computation wrapped by handle")]
    NoActiveScope,

    /// The handler chain finished without resuming the effect
    #[error("effect handler must call resume; unhandled effect {effect}")]
    Unhandled {
        /// Name of the effect no handler resumed
        effect: String,
    },

    /// The wrapped computation or one of its handlers failed
    #[error("{message}")]
    Failure {
        /// Description of the failure
        message: String,
    },

    /// The scope was dropped before its outcome settled
    #[error("effect scope closed before completion")]
    ScopeClosed,
}

impl EffectError {
    /// Create an unhandled-effect error
    pub fn unhandled(effect: impl Into<String>) -> Self {
        Self::Unhandled {
            effect: effect.into(),
        }
    }

    /// Create a failure error
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unhandled_names_the_effect() {
        let error = EffectError::unhandled("ask_name");
        assert_eq!(
            error.to_string(),
            "effect handler must call resume; unhandled effect ask_name"
        );
    }

    #[test]
    fn failure_carries_the_message() {
        let error = EffectError::failure("connection reset");
        assert_eq!(error.to_string(), "connection reset");
    }

    #[test]
    fn errors_round_trip_through_serde() {
        let error = EffectError::unhandled("x");
        let json = serde_json::to_string(&error).expect("serialize");
        let back: EffectError = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, error);
    }
}
