pub mod create_document;
pub mod download_document;
pub mod get_dependency_graph;
pub mod get_document_view;
pub mod list_documents;
pub mod list_version_groups;
pub mod update_document;
