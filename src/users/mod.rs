use serde::Serialize;
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, sqlx::Type, Serialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub(crate) struct UserId(pub(crate) i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for UserId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(UserId)
    }
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub(crate) struct User {
    pub(crate) id: UserId,
    pub(crate) email: String,
    #[sqlx(skip)]
    pub(crate) roles: Vec<Role>,
}

impl User {
    pub(crate) fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub(crate) fn is_organizer(&self) -> bool {
        self.has_role(Role::Organizer)
    }
}

/// An account that has not been stored yet.
#[derive(Debug, Clone)]
pub(crate) struct NewUser {
    pub(crate) email: String,
    pub(crate) password_hash: String,
}

/// What is needed to check a login attempt.
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct Credentials {
    #[sqlx(rename = "id")]
    pub(crate) user_id: UserId,
    pub(crate) password_hash: String,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, sqlx::Type, Serialize)]
pub(crate) enum Role {
    Organizer,
    Participant,
}

impl Role {
    pub(crate) const ALL: [Role; 2] = [Role::Organizer, Role::Participant];

    pub(crate) fn name(self) -> &'static str {
        match self {
            Role::Organizer => "Organizer",
            Role::Participant => "Participant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
