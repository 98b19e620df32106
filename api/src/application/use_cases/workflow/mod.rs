pub mod complete_periodic_review;
pub mod create_new_version;
pub mod mark_obsolete;
pub mod route_for_approval;
pub mod submit_for_review;
pub mod terminate_document;
