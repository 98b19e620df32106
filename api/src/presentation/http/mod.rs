pub mod auth;
pub mod documents;
pub mod error;
pub mod events;
pub mod health;
pub mod workflow;
