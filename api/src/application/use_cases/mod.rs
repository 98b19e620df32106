pub(crate) mod announce;
pub mod auth;
pub mod documents;
pub mod error;
pub mod workflow;

#[cfg(test)]
pub mod testing;
