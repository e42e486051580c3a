use notekeep_core::UserId;

/// Identity context for a request (authenticated user).
///
/// Inserted by the auth middleware; must be present for all note routes.
/// "Anonymous" never reaches a handler: requests without a valid identity are
/// redirected to the login collaborator before routing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityContext {
    user_id: UserId,
    username: String,
}

impl IdentityContext {
    pub fn new(user_id: UserId, username: String) -> Self {
        Self { user_id, username }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}
