use crate::application::dto::documents::DocumentQuery;
use crate::application::ports::edms_client::EdmsClient;
use crate::application::use_cases::error::UseCaseError;
use crate::domain::documents::document::Document;

pub struct ListDocuments<'a, C: EdmsClient + ?Sized> {
    pub client: &'a C,
}

impl<'a, C: EdmsClient + ?Sized> ListDocuments<'a, C> {
    pub async fn execute(
        &self,
        token: &str,
        query: &DocumentQuery,
    ) -> Result<Vec<Document>, UseCaseError> {
        Ok(self.client.list_documents(token, query).await?)
    }
}
