pub mod matches;
pub mod pagination;

pub use matches::{CreateMatchRequest, MatchDetail, MatchListQuery, ScoreRequest, UpdateMatchRequest};
pub use pagination::{PaginatedResponse, PaginationQuery};
