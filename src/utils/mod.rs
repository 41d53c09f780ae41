pub mod attributes;
pub mod datetime;
pub mod slug;
pub mod validate;

pub use attributes::Attributes;
pub use datetime::{parse_date, parse_datetime};
pub use slug::{slugify, unique_slug};
