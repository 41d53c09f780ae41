//! Best-effort audit trail. A failed write is logged and never fails the caller.

use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, DatabaseConnection};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::entities::{activity_log, user};

/// What happened to the entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Registered,
    LoggedIn,
    LoggedOut,
    Created,
    Updated,
    Deleted,
}

impl Action {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::LoggedIn => "logged-in",
            Self::LoggedOut => "logged-out",
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
        }
    }
}

/// Kind of entity an entry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    User,
    League,
    LeagueSettings,
    Team,
    Player,
    Match,
}

impl EntityKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::League => "league",
            Self::LeagueSettings => "league_settings",
            Self::Team => "team",
            Self::Player => "player",
            Self::Match => "match",
        }
    }
}

/// One audit entry waiting to be written.
#[derive(Debug)]
pub struct Activity {
    user_id: Option<Uuid>,
    action: Action,
    entity: EntityKind,
    entity_id: Uuid,
    description: String,
    old_values: Option<Value>,
    new_values: Option<Value>,
}

impl Activity {
    pub fn new(
        actor: &user::Model,
        action: Action,
        entity: EntityKind,
        entity_id: Uuid,
        description: impl Into<String>,
    ) -> Self {
        Self {
            user_id: Some(actor.id),
            action,
            entity,
            entity_id,
            description: description.into(),
            old_values: None,
            new_values: None,
        }
    }

    /// Attach the entity's state before the change.
    #[must_use]
    pub fn before(mut self, model: &impl Serialize) -> Self {
        self.old_values = snapshot(model);
        self
    }

    /// Attach the entity's state after the change.
    #[must_use]
    pub fn after(mut self, model: &impl Serialize) -> Self {
        self.new_values = snapshot(model);
        self
    }

    /// Attach an explicit after-state.
    #[must_use]
    pub fn after_values(mut self, values: Value) -> Self {
        self.new_values = Some(values);
        self
    }

    /// Write the entry. Called after the primary change has committed.
    pub async fn record(self, db: &DatabaseConnection) {
        let entry = activity_log::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(self.user_id),
            action: Set(self.action.as_str().to_string()),
            entity_type: Set(self.entity.as_str().to_string()),
            entity_id: Set(self.entity_id),
            description: Set(self.description),
            old_values: Set(self.old_values),
            new_values: Set(self.new_values),
            created_at: Set(Utc::now().fixed_offset()),
        };

        if let Err(e) = entry.insert(db).await {
            tracing::warn!(
                action = self.action.as_str(),
                entity_type = self.entity.as_str(),
                entity_id = %self.entity_id,
                "Failed to record activity: {e}"
            );
        }
    }
}

/// JSON snapshot of a model, or `None` if it cannot be serialized.
#[must_use]
pub fn snapshot(model: &impl Serialize) -> Option<Value> {
    serde_json::to_value(model).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_names() {
        assert_eq!(Action::LoggedIn.as_str(), "logged-in");
        assert_eq!(Action::Created.as_str(), "created");
    }

    #[test]
    fn test_entity_names() {
        assert_eq!(EntityKind::LeagueSettings.as_str(), "league_settings");
        assert_eq!(EntityKind::Match.as_str(), "match");
    }

    #[test]
    fn test_snapshot_serializes_fields() {
        #[derive(Serialize)]
        struct Sample {
            name: &'static str,
            wins: i32,
        }
        assert_eq!(
            snapshot(&Sample { name: "Rovers", wins: 2 }),
            Some(json!({ "name": "Rovers", "wins": 2 }))
        );
    }
}
