pub mod dependency_graph;
pub mod dto;
pub mod ports;
pub mod use_cases;
pub mod validation;
pub mod versions;
pub mod workflow;
