use serde_json::Number;

/// Pure user model for inter-module communication (no serde)
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub age: Number,
}

/// Data for creating a new user, already validated and coerced
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub age: Number,
}

/// Partial update data for a user
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub age: Option<Number>,
}
