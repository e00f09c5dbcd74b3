//! Middleware for the Flour Mill Management Platform

mod auth;

pub use auth::{auth_middleware, AuthUser, CurrentUser};
