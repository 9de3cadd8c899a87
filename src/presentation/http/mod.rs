pub mod auth;
pub mod files;
pub mod health;
pub mod route_guard;
