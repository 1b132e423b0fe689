//! Who the data belongs to. The user id only selects a storage partition.

use std::fmt;

/// Partition used when nobody is configured.
pub const LOCAL_USER: &str = "local";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub trait SessionProvider {
    /// The signed-in user, if any.
    fn current_user(&self) -> Option<UserId>;
}

/// Single-user session read from configuration.
#[derive(Debug, Clone, Default)]
pub struct LocalSession {
    user: Option<UserId>,
}

impl LocalSession {
    pub fn new(user: Option<&str>) -> Self {
        let user = user
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(UserId::new);
        Self { user }
    }
}

impl SessionProvider for LocalSession {
    fn current_user(&self) -> Option<UserId> {
        Some(self.user.clone().unwrap_or_else(|| UserId::new(LOCAL_USER)))
    }
}

/// Storage partition for whoever `session` reports, or [`LOCAL_USER`].
pub fn partition_key(session: &dyn SessionProvider) -> String {
    session
        .current_user()
        .map_or_else(|| LOCAL_USER.to_string(), |u| u.0)
}
