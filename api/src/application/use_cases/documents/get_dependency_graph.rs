use uuid::Uuid;

use crate::application::dependency_graph::{self, DependencyGraph, GraphRoot, MAX_DEPTH};
use crate::application::ports::edms_client::EdmsClient;
use crate::application::use_cases::error::UseCaseError;

pub struct GetDependencyGraph<'a, C: EdmsClient + ?Sized> {
    pub client: &'a C,
}

impl<'a, C: EdmsClient + ?Sized> GetDependencyGraph<'a, C> {
    pub async fn execute(&self, token: &str, uuid: Uuid) -> Result<DependencyGraph, UseCaseError> {
        let (document, chain) = tokio::try_join!(
            self.client.get_document(token, uuid),
            self.client.dependency_chain(token, uuid, MAX_DEPTH),
        )?;
        let root = GraphRoot {
            id: document.id,
            document_number: &document.document_number,
            title: &document.title,
        };
        Ok(dependency_graph::build_dependency_graph(root, &chain))
    }
}
