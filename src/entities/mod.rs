pub mod activity_log;
pub mod api_token;
pub mod game_match;
pub mod league;
pub mod league_setting;
pub mod match_status;
pub mod player;
pub mod team;
pub mod user;

pub use match_status::MatchStatus;
