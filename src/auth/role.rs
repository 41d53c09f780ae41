use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// User role. Variants are declared from least to most privileged, so the derived
/// ordering is the privilege hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    User,
    TeamManager,
    LeagueManager,
    Admin,
}

impl Role {
    /// Whether this role is at least as privileged as `required`.
    #[must_use]
    pub fn satisfies(self, required: Self) -> bool {
        self >= required
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::TeamManager => "team_manager",
            Self::LeagueManager => "league_manager",
            Self::Admin => "admin",
        }
    }

    /// Roles anyone may request at registration.
    #[must_use]
    pub const fn is_self_assignable(&self) -> bool {
        matches!(self, Self::User | Self::TeamManager)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "team_manager" => Ok(Self::TeamManager),
            "league_manager" => Ok(Self::LeagueManager),
            "admin" => Ok(Self::Admin),
            other => Err(format!(
                "Invalid role '{other}'. Expected one of: user, team_manager, league_manager, admin."
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hierarchy() {
        assert!(Role::Admin.satisfies(Role::LeagueManager));
        assert!(Role::Admin.satisfies(Role::User));
        assert!(Role::LeagueManager.satisfies(Role::TeamManager));
        assert!(Role::TeamManager.satisfies(Role::TeamManager));
        assert!(!Role::TeamManager.satisfies(Role::LeagueManager));
        assert!(!Role::User.satisfies(Role::TeamManager));
    }

    #[test]
    fn test_parse() {
        assert_eq!("league_manager".parse(), Ok(Role::LeagueManager));
        assert_eq!("admin".parse(), Ok(Role::Admin));
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn test_self_assignable() {
        assert!(Role::User.is_self_assignable());
        assert!(Role::TeamManager.is_self_assignable());
        assert!(!Role::LeagueManager.is_self_assignable());
        assert!(!Role::Admin.is_self_assignable());
    }

    #[test]
    fn test_default_is_least_privileged() {
        assert_eq!(Role::default(), Role::User);
    }
}
