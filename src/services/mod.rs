pub mod activity;
pub mod matches;
pub mod standings;

pub use matches::MatchService;
