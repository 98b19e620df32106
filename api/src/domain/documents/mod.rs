pub mod dependency;
pub mod document;
pub mod number;
pub mod status;
