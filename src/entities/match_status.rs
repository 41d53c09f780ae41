use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Match lifecycle status.
///
/// Any status may follow any other. Only entering or leaving `Completed` affects the
/// standings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
    Postponed,
}

impl MatchStatus {
    pub const ALL: [Self; 5] = [
        Self::Scheduled,
        Self::InProgress,
        Self::Completed,
        Self::Cancelled,
        Self::Postponed,
    ];

    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Postponed => "postponed",
        }
    }

    /// Only completed matches carry scores.
    #[must_use]
    pub const fn has_scores(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "Invalid status '{s}'. Expected one of: scheduled, in_progress, completed, cancelled, postponed."
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("scheduled".parse(), Ok(MatchStatus::Scheduled));
        assert_eq!("in_progress".parse(), Ok(MatchStatus::InProgress));
        assert_eq!("completed".parse(), Ok(MatchStatus::Completed));
        assert_eq!("cancelled".parse(), Ok(MatchStatus::Cancelled));
        assert_eq!("postponed".parse(), Ok(MatchStatus::Postponed));
        assert!("live".parse::<MatchStatus>().is_err());
        assert!("Completed".parse::<MatchStatus>().is_err());
    }

    #[test]
    fn test_as_str_round_trips_through_display() {
        for status in MatchStatus::ALL {
            assert_eq!(status.to_string(), status.as_str());
        }
    }

    #[test]
    fn test_only_completed_has_scores() {
        assert!(MatchStatus::Completed.has_scores());
        assert!(!MatchStatus::Scheduled.has_scores());
        assert!(!MatchStatus::Cancelled.has_scores());
    }

    #[test]
    fn test_default() {
        assert_eq!(MatchStatus::default(), MatchStatus::Scheduled);
    }
}
