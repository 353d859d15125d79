//! Authenticated user and session model.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::Branch;

/// Branch code used for users who are not bound to a single branch.
pub const ALL_BRANCHES: &str = "ALL";

/// User identifier as issued by the backend (numeric or textual).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Number(i64),
    Text(String),
}

impl Default for UserId {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// User role.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    Manager,
    #[default]
    Staff,
    /// Role name not known to this client.
    Other(String),
}

impl Role {
    /// Wire name of the role.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Staff => "staff",
            Self::Other(name) => name,
        }
    }

    /// Staff users are denied the sales module.
    #[must_use]
    pub const fn can_access_sales(&self) -> bool {
        !matches!(self, Self::Staff)
    }

    /// Only admins and managers manage salaries and payslips.
    #[must_use]
    pub const fn can_manage_payroll(&self) -> bool {
        matches!(self, Self::Admin | Self::Manager)
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.as_str() {
            "admin" => Self::Admin,
            "manager" => Self::Manager,
            "staff" => Self::Staff,
            _ => Self::Other(value),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Profile of the logged-in user.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: UserId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: Role,
    /// Branch code (`BR001`..) or `ALL`.
    #[serde(default)]
    pub branch: String,
    /// Fields the backend sends that this client does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// Display label for the user's branch.
    ///
    /// `"<name> - <location>"` for known branches, `"All Branches"` for
    /// `ALL`, `None` otherwise.
    #[must_use]
    pub fn branch_label(&self) -> Option<String> {
        if let Some(branch) = Branch::lookup(&self.branch) {
            return Some(branch.label());
        }
        (self.branch == ALL_BRANCHES).then(|| "All Branches".to_string())
    }
}

/// Token plus user profile. The two always exist together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

impl Session {
    /// Create a session.
    #[must_use]
    pub fn new(token: impl Into<String>, user: User) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_from_partial_profile() {
        let user: User = serde_json::from_value(json!({"id": 1, "role": "staff"})).unwrap();
        assert_eq!(user.id, UserId::Number(1));
        assert_eq!(user.role, Role::Staff);
        assert!(user.name.is_empty());
    }

    #[test]
    fn test_user_keeps_unknown_fields() {
        let raw = json!({
            "id": "E-7",
            "name": "Mina",
            "role": "manager",
            "branch": "BR002",
            "email": "mina@bada.ae"
        });
        let user: User = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(user.extra.get("email"), Some(&json!("mina@bada.ae")));
        assert_eq!(serde_json::to_value(&user).unwrap(), raw);
    }

    #[test]
    fn test_unknown_role_passthrough() {
        let role = Role::from("auditor".to_string());
        assert_eq!(role, Role::Other("auditor".into()));
        assert_eq!(role.to_string(), "auditor");
    }

    #[test]
    fn test_role_permissions() {
        assert!(!Role::Staff.can_access_sales());
        assert!(Role::Manager.can_access_sales());
        assert!(Role::Admin.can_manage_payroll());
        assert!(!Role::Staff.can_manage_payroll());
    }

    #[test]
    fn test_branch_label() {
        let mut user = User {
            branch: "BR001".into(),
            ..User::default()
        };
        assert_eq!(
            user.branch_label().as_deref(),
            Some("BADA Restaurant - Al Barsha")
        );

        user.branch = ALL_BRANCHES.into();
        assert_eq!(user.branch_label().as_deref(), Some("All Branches"));

        user.branch = "BR999".into();
        assert_eq!(user.branch_label(), None);
    }
}
