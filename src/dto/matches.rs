use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dto::PaginationQuery;
use crate::entities::{game_match, team};
use crate::utils::Attributes;

// ============ Request DTOs ============

/// POST /matches and POST /leagues/{id}/matches
#[derive(Debug, Deserialize)]
pub struct CreateMatchRequest {
    /// Required on `/matches`; taken from the path on `/leagues/{id}/matches`
    pub league_id: Option<Uuid>,
    pub home_team_id: Uuid,
    pub away_team_id: Uuid,
    pub match_date: String,
    /// Defaults to the home team's venue
    pub venue: Option<String>,
    /// Defaults to `scheduled`
    pub status: Option<String>,
    pub home_team_score: Option<i32>,
    pub away_team_score: Option<i32>,
    pub referee: Option<String>,
    pub match_notes: Option<String>,
    pub statistics: Option<Attributes>,
    pub is_featured: Option<bool>,
    pub weather_conditions: Option<String>,
    pub broadcast_channel: Option<String>,
}

/// PUT /matches/{id}. Absent fields keep their stored value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateMatchRequest {
    pub home_team_id: Option<Uuid>,
    pub away_team_id: Option<Uuid>,
    pub match_date: Option<String>,
    pub venue: Option<String>,
    pub status: Option<String>,
    pub home_team_score: Option<i32>,
    pub away_team_score: Option<i32>,
    pub referee: Option<String>,
    pub match_notes: Option<String>,
    pub statistics: Option<Attributes>,
    pub is_featured: Option<bool>,
    pub weather_conditions: Option<String>,
    pub broadcast_channel: Option<String>,
}

/// PUT /matches/{id}/score
#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub home_team_score: i32,
    pub away_team_score: i32,
}

/// GET /matches query string.
#[derive(Debug, Default, Deserialize)]
pub struct MatchListQuery {
    pub league_id: Option<Uuid>,
    pub team_id: Option<Uuid>,
    pub status: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    /// `asc` or `desc` by match date (default `asc`)
    pub direction: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl MatchListQuery {
    #[must_use]
    pub const fn pagination(&self) -> PaginationQuery {
        PaginationQuery {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

// ============ Response DTOs ============

/// A match with both teams embedded.
#[derive(Debug, Serialize)]
pub struct MatchDetail {
    #[serde(flatten)]
    pub game_match: game_match::Model,
    pub home_team: team::Model,
    pub away_team: team::Model,
}
