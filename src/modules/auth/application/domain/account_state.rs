use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================ Role =============================

/// Privilege ladder, ordered `User < Admin < Superadmin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
    Superadmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::Superadmin => "superadmin",
        }
    }

    /// Roles allowed through the administrative gate.
    pub fn is_administrator(&self) -> bool {
        matches!(self, Role::Admin | Role::Superadmin)
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown role '{0}'")]
pub struct ParseRoleError(pub String);

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            "superadmin" => Ok(Role::Superadmin),
            other => Err(ParseRoleError(other.to_string())),
        }
    }
}

// ============================ Account Status =============================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Suspended,
    Deleted,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Suspended => "suspended",
            AccountStatus::Deleted => "deleted",
        }
    }
}

impl Default for AccountStatus {
    fn default() -> Self {
        AccountStatus::Active
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown account status '{0}'")]
pub struct ParseAccountStatusError(pub String);

impl FromStr for AccountStatus {
    type Err = ParseAccountStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(AccountStatus::Active),
            "suspended" => Ok(AccountStatus::Suspended),
            "deleted" => Ok(AccountStatus::Deleted),
            other => Err(ParseAccountStatusError(other.to_string())),
        }
    }
}

// ============================ Account State =============================

/// The (role, status) pair a transition is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccountState {
    pub role: Role,
    pub status: AccountStatus,
}

impl AccountState {
    pub fn new(role: Role, status: AccountStatus) -> Self {
        Self { role, status }
    }
}

impl fmt::Display for AccountState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "role={}, status={}", self.role, self.status)
    }
}

// ============================ Transitions =============================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountTransition {
    PromoteToAdmin,
    PromoteToSuperadmin,
    DemoteSuperadminToAdmin,
    DemoteSuperadminToUser,
    DemoteAdminToUser,
    Suspend,
    Recover,
    Delete,
}

/// The single field a successful transition writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionEffect {
    SetRole(Role),
    SetStatus(AccountStatus),
}

impl AccountTransition {
    pub const ALL: [AccountTransition; 8] = [
        AccountTransition::PromoteToAdmin,
        AccountTransition::PromoteToSuperadmin,
        AccountTransition::DemoteSuperadminToAdmin,
        AccountTransition::DemoteSuperadminToUser,
        AccountTransition::DemoteAdminToUser,
        AccountTransition::Suspend,
        AccountTransition::Recover,
        AccountTransition::Delete,
    ];

    pub fn effect(&self) -> TransitionEffect {
        match self {
            AccountTransition::PromoteToAdmin => TransitionEffect::SetRole(Role::Admin),
            AccountTransition::PromoteToSuperadmin => TransitionEffect::SetRole(Role::Superadmin),
            AccountTransition::DemoteSuperadminToAdmin => TransitionEffect::SetRole(Role::Admin),
            AccountTransition::DemoteSuperadminToUser => TransitionEffect::SetRole(Role::User),
            AccountTransition::DemoteAdminToUser => TransitionEffect::SetRole(Role::User),
            AccountTransition::Suspend => TransitionEffect::SetStatus(AccountStatus::Suspended),
            AccountTransition::Recover => TransitionEffect::SetStatus(AccountStatus::Active),
            AccountTransition::Delete => TransitionEffect::SetStatus(AccountStatus::Deleted),
        }
    }

    fn precondition_holds(&self, current: AccountState) -> bool {
        match self {
            AccountTransition::PromoteToAdmin => current.role != Role::Admin,
            AccountTransition::PromoteToSuperadmin => current.role != Role::Superadmin,
            AccountTransition::DemoteSuperadminToAdmin
            | AccountTransition::DemoteSuperadminToUser => current.role == Role::Superadmin,
            AccountTransition::DemoteAdminToUser => current.role == Role::Admin,
            AccountTransition::Suspend => current.status != AccountStatus::Suspended,
            AccountTransition::Recover => current.status != AccountStatus::Active,
            AccountTransition::Delete => current.status != AccountStatus::Deleted,
        }
    }

    /// Checks the transition against `current` and returns the field to write.
    ///
    /// A deleted account is terminal: every transition out of it fails.
    pub fn apply(self, current: AccountState) -> Result<TransitionEffect, InvalidTransition> {
        if current.status == AccountStatus::Deleted || !self.precondition_holds(current) {
            return Err(InvalidTransition {
                attempted: self,
                current,
            });
        }

        Ok(self.effect())
    }
}

impl fmt::Display for AccountTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AccountTransition::PromoteToAdmin => "promote to admin",
            AccountTransition::PromoteToSuperadmin => "promote to superadmin",
            AccountTransition::DemoteSuperadminToAdmin => "demote superadmin to admin",
            AccountTransition::DemoteSuperadminToUser => "demote superadmin to user",
            AccountTransition::DemoteAdminToUser => "demote admin to user",
            AccountTransition::Suspend => "suspend",
            AccountTransition::Recover => "recover",
            AccountTransition::Delete => "delete",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Cannot {attempted} account with {current}")]
pub struct InvalidTransition {
    pub attempted: AccountTransition,
    pub current: AccountState,
}

impl InvalidTransition {
    /// Client-facing reason for the rejected transition.
    pub fn reason(&self) -> &'static str {
        if self.current.status == AccountStatus::Deleted {
            return "User account has been deleted";
        }

        match self.attempted {
            AccountTransition::PromoteToAdmin => "User is already an admin",
            AccountTransition::PromoteToSuperadmin => "User is already a super admin",
            AccountTransition::DemoteSuperadminToAdmin
            | AccountTransition::DemoteSuperadminToUser => "User is not a super admin",
            AccountTransition::DemoteAdminToUser => "User is not an admin",
            AccountTransition::Suspend => "User is already suspended",
            AccountTransition::Recover => "User is already active",
            AccountTransition::Delete => "User is already deleted",
        }
    }
}
