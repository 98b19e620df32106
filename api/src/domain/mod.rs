pub mod documents;
pub mod users;
pub mod workflow;
