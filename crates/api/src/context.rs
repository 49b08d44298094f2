use dealerdesk_auth::{PrincipalId, Role};

/// Principal context for a request (authenticated identity + role).
///
/// This is immutable and must be present for all protected routes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    principal_id: PrincipalId,
    role: Role,
}

impl PrincipalContext {
    pub fn new(principal_id: PrincipalId, role: Role) -> Self {
        Self { principal_id, role }
    }

    pub fn principal_id(&self) -> PrincipalId {
        self.principal_id
    }

    pub fn role(&self) -> Role {
        self.role
    }
}
