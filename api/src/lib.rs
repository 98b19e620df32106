// Module layout (Clean Architecture style)
// - bootstrap: configuration and startup
// - infrastructure: EDMS REST client and UI event bus adapters
// - presentation: HTTP handlers and routing
// - application: workflow resolution, dependency graphs, validation, use cases
// - domain: core models

pub mod application;
pub mod bootstrap;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
