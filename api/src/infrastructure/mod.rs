pub mod edms;
pub mod events;
