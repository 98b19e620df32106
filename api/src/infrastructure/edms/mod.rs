pub mod client_reqwest;
pub mod wire;
