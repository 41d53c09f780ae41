pub mod access;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod role;

pub use role::Role;
