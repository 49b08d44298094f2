//! The fixed role set.

use serde::{Deserialize, Serialize};

/// Back-office role, in descending privilege order for write operations.
///
/// The set is closed by design: roles are defined at compile time and user →
/// role assignment is an external concern. Administrator access can never be
/// suppressed by data; the resolution engine hard-codes its bypass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access to everything, including permission customization.
    Administrator,
    /// Catalog maintainer ("Cadastrador").
    Registrar,
    /// Read-mostly consumer ("Usuário").
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Administrator => "administrator",
            Role::Registrar => "registrar",
            Role::User => "user",
        }
    }

    /// Parse a role name. Accepts the legacy Portuguese labels the original
    /// data set used alongside the canonical names.
    pub fn parse(s: &str) -> Option<Role> {
        match s.trim().to_lowercase().as_str() {
            "administrator" | "admin" | "administrador" => Some(Role::Administrator),
            "registrar" | "cadastrador" => Some(Role::Registrar),
            "user" | "usuario" | "usuário" => Some(Role::User),
            _ => None,
        }
    }

    pub fn is_administrator(&self) -> bool {
        matches!(self, Role::Administrator)
    }

    /// Roles whose grants an administrator may customize.
    ///
    /// Administrator itself is excluded: its access is immutable.
    pub fn customizable() -> [Role; 2] {
        [Role::Registrar, Role::User]
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_and_legacy_names() {
        assert_eq!(Role::parse("administrator"), Some(Role::Administrator));
        assert_eq!(Role::parse("Cadastrador"), Some(Role::Registrar));
        assert_eq!(Role::parse("usuário"), Some(Role::User));
        assert_eq!(Role::parse("manager"), None);
    }

    #[test]
    fn customizable_excludes_administrator() {
        assert!(!Role::customizable().contains(&Role::Administrator));
    }
}
