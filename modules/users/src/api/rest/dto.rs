use serde::{Deserialize, Serialize};
use serde_json::Number;
use utoipa::ToSchema;

use crate::contract::model::User;
use crate::domain::service::{AgeValue, CreateUser, UpdateUser};

/// REST DTO for user representation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    /// Short opaque id assigned by the store on creation.
    pub id: String,
    pub name: String,
    #[schema(value_type = f64)]
    pub age: Number,
}

/// Age as accepted on the wire: a JSON number, or a numeric string that is
/// coerced on write.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AgeField {
    Number(Number),
    Text(String),
}

/// REST DTO for creating a new user. Fields are optional so their absence
/// is reported as a validation error rather than a deserialization failure.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateUserReq {
    pub name: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub age: Option<AgeField>,
}

/// REST DTO for updating a user (partial)
#[derive(Debug, Clone, Deserialize, ToSchema, Default)]
pub struct UpdateUserReq {
    pub name: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub age: Option<AgeField>,
}

// Conversion implementations between REST DTOs and domain inputs

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            age: user.age,
        }
    }
}

impl From<AgeField> for AgeValue {
    fn from(age: AgeField) -> Self {
        match age {
            AgeField::Number(n) => AgeValue::Number(n),
            AgeField::Text(s) => AgeValue::Text(s),
        }
    }
}

impl From<CreateUserReq> for CreateUser {
    fn from(req: CreateUserReq) -> Self {
        Self {
            name: req.name,
            age: req.age.map(AgeValue::from),
        }
    }
}

impl From<UpdateUserReq> for UpdateUser {
    fn from(req: UpdateUserReq) -> Self {
        Self {
            name: req.name,
            age: req.age.map(AgeValue::from),
        }
    }
}
