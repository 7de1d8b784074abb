use std::sync::Arc;

use serde_json::Number;

use crate::contract::model::{NewUser, User, UserPatch};
use crate::domain::error::DomainError;
use crate::infra::storage::UserStore;

/// Age value as it arrives over the wire: a JSON number, or a numeric
/// string that is coerced on write.
#[derive(Debug, Clone, PartialEq)]
pub enum AgeValue {
    Number(Number),
    Text(String),
}

/// Create request after deserialization, before validation.
#[derive(Debug, Clone, Default)]
pub struct CreateUser {
    pub name: Option<String>,
    pub age: Option<AgeValue>,
}

/// Partial update request before validation.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub age: Option<AgeValue>,
}

/// Domain service: validation and coercion in front of the store.
pub struct Service {
    store: Arc<UserStore>,
}

impl Service {
    pub fn new(store: Arc<UserStore>) -> Self {
        Self { store }
    }

    /// Create a user. The name must be non-empty after trimming and the age
    /// must be present and numeric; the store assigns the id.
    pub fn create_user(&self, input: CreateUser) -> Result<User, DomainError> {
        let name = match input.name {
            Some(name) => normalize_name(name)?,
            None => return Err(DomainError::MissingName),
        };
        let age = match input.age {
            Some(age) => coerce_age(age)?,
            None => return Err(DomainError::MissingAge),
        };

        Ok(self.store.insert(NewUser { name, age }))
    }

    pub fn get_user(&self, id: &str) -> Result<User, DomainError> {
        self.store
            .find(id)
            .ok_or_else(|| DomainError::user_not_found(id))
    }

    /// All users in creation order.
    pub fn list_users(&self) -> Vec<User> {
        self.store.list()
    }

    /// Apply a partial update. Only provided fields change; a patch carrying
    /// neither field is rejected.
    pub fn update_user(&self, id: &str, input: UpdateUser) -> Result<User, DomainError> {
        if input.name.is_none() && input.age.is_none() {
            return Err(DomainError::EmptyPatch);
        }

        let name = input.name.map(normalize_name).transpose()?;
        let age = input.age.map(coerce_age).transpose()?;

        self.store
            .update(id, UserPatch { name, age })
            .ok_or_else(|| DomainError::user_not_found(id))
    }

    pub fn delete_user(&self, id: &str) -> Result<(), DomainError> {
        if self.store.remove(id) {
            Ok(())
        } else {
            Err(DomainError::user_not_found(id))
        }
    }
}

/// Trim surrounding whitespace; an empty result is invalid.
fn normalize_name(name: String) -> Result<String, DomainError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::EmptyName);
    }
    Ok(trimmed.to_string())
}

/// Coerce a wire-level age into a JSON number. Numbers pass through
/// unchanged; strings are parsed as an integer first so whole-number input
/// stays integral, falling back to a float.
fn coerce_age(age: AgeValue) -> Result<Number, DomainError> {
    match age {
        AgeValue::Number(n) => Ok(n),
        AgeValue::Text(s) => {
            let trimmed = s.trim();
            if let Ok(i) = trimmed.parse::<i64>() {
                return Ok(Number::from(i));
            }
            if let Ok(f) = trimmed.parse::<f64>() {
                if let Some(n) = Number::from_f64(f) {
                    return Ok(n);
                }
            }
            Err(DomainError::invalid_age(s))
        }
    }
}
