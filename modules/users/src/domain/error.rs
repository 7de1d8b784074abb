use thiserror::Error;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("user not found: {id}")]
    UserNotFound { id: String },

    #[error("name is required")]
    MissingName,

    #[error("name cannot be empty")]
    EmptyName,

    #[error("age is required")]
    MissingAge,

    #[error("age must be a number, got '{value}'")]
    InvalidAge { value: String },

    #[error("no fields to update")]
    EmptyPatch,
}

impl DomainError {
    pub fn user_not_found(id: impl Into<String>) -> Self {
        Self::UserNotFound { id: id.into() }
    }

    pub fn invalid_age(value: impl Into<String>) -> Self {
        Self::InvalidAge {
            value: value.into(),
        }
    }
}
