//! Error taxonomy for the forno API

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Requested entity id does not exist. Carries the entity name so the
    /// response body can say which one ("Restaurant not found").
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Malformed or out-of-domain input, one message per violation.
    /// Always rejected before anything is persisted.
    #[error("validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    /// Persistence unreachable or timed out. The detail is for logs only
    /// and must never be leaked into a response body.
    #[error("service unavailable: {0}")]
    Unavailable(String),
}

impl Error {
    /// Single-message validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(vec![msg.into()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_entity() {
        assert_eq!(Error::NotFound("Restaurant").to_string(), "Restaurant not found");
    }

    #[test]
    fn validation_joins_messages() {
        let err = Error::Validation(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "validation failed: a, b");
    }
}
