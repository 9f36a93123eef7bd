use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

impl User {
    /// Unsaved user; storage assigns the id.
    pub fn new(name: impl Into<String>, email: impl Into<String>, password_hash: String) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            email: email.into(),
            password_hash,
        }
    }
}

/// A freshly created user together with the one-time password issued to them.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedUser {
    #[serde(flatten)]
    pub user: User,
    pub temporary_password: String,
}
