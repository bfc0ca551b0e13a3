//! Request-scoped and configuration models of the web application.

pub mod auth;
pub mod config;
