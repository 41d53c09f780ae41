//! Ownership checks shared by the resource routes.
//!
//! Every write on a league's resources is allowed for the league owner, or for any
//! user whose role satisfies the threshold for that kind of resource.

use crate::auth::Role;
use crate::entities::{league, user};
use crate::error::AppError;

/// Role that may update, delete or configure any league.
pub const LEAGUE_ADMIN: Role = Role::Admin;
/// Role that may write teams and matches of any league.
pub const TEAM_AND_MATCH_WRITER: Role = Role::LeagueManager;
/// Role that may write players of any league.
pub const PLAYER_WRITER: Role = Role::TeamManager;

/// Allow the league owner or any user whose role satisfies `required`.
///
/// # Errors
///
/// Returns `Forbidden` otherwise.
pub fn ensure_owner_or(
    user: &user::Model,
    league: &league::Model,
    required: Role,
) -> Result<(), AppError> {
    if user.id == league.user_id || user.role().satisfies(required) {
        return Ok(());
    }
    Err(AppError::Forbidden(
        "You are not allowed to modify this league.".to_string(),
    ))
}

/// Public leagues are visible to everyone; private ones to the owner and admins.
#[must_use]
pub fn can_view_league(user: &user::Model, league: &league::Model) -> bool {
    league.is_public || user.id == league.user_id || user.role().satisfies(Role::Admin)
}

/// # Errors
///
/// Returns `Forbidden` when [`can_view_league`] is false.
pub fn ensure_can_view_league(user: &user::Model, league: &league::Model) -> Result<(), AppError> {
    if can_view_league(user, league) {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "You do not have access to this league.".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn user_with(role: Role) -> user::Model {
        let now = Utc::now().fixed_offset();
        user::Model {
            id: Uuid::new_v4(),
            name: "Pat".to_string(),
            email: "pat@example.com".to_string(),
            password_hash: String::new(),
            role: role.as_str().to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn league_owned_by(owner: Uuid, is_public: bool) -> league::Model {
        let now = Utc::now().fixed_offset();
        let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap_or_default();
        league::Model {
            id: Uuid::new_v4(),
            user_id: owner,
            name: "Premier".to_string(),
            slug: "premier".to_string(),
            country: "England".to_string(),
            league_type: "professional".to_string(),
            sport_type: "football".to_string(),
            season_name: "2026".to_string(),
            season_start_date: date,
            season_end_date: date,
            website_url: None,
            logo_path: None,
            description: None,
            is_public,
            is_active: true,
            settings: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_owner_may_write_regardless_of_role() {
        let owner = user_with(Role::User);
        let league = league_owned_by(owner.id, true);
        assert!(ensure_owner_or(&owner, &league, LEAGUE_ADMIN).is_ok());
    }

    #[test]
    fn test_non_owner_needs_threshold_role() {
        let league = league_owned_by(Uuid::new_v4(), true);
        assert!(ensure_owner_or(&user_with(Role::LeagueManager), &league, TEAM_AND_MATCH_WRITER).is_ok());
        assert!(ensure_owner_or(&user_with(Role::TeamManager), &league, TEAM_AND_MATCH_WRITER).is_err());
        assert!(ensure_owner_or(&user_with(Role::TeamManager), &league, PLAYER_WRITER).is_ok());
        assert!(ensure_owner_or(&user_with(Role::LeagueManager), &league, LEAGUE_ADMIN).is_err());
    }

    #[test]
    fn test_private_league_visibility() {
        let owner = user_with(Role::User);
        let league = league_owned_by(owner.id, false);
        assert!(can_view_league(&owner, &league));
        assert!(can_view_league(&user_with(Role::Admin), &league));
        assert!(!can_view_league(&user_with(Role::LeagueManager), &league));
        assert!(can_view_league(&user_with(Role::User), &league_owned_by(owner.id, true)));
    }
}
