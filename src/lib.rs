//! League API - Backend for sports league management
//!
//! This crate provides the REST API for running sports leagues:
//! - Leagues, teams, players and match scheduling
//! - Match results feeding transactionally maintained standings
//! - Role-based access control and an audit trail of every mutation

pub mod auth;
pub mod config;
pub mod db;
pub mod dto;
pub mod entities;
pub mod error;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
