use crate::application::dto::documents::DocumentQuery;
use crate::application::ports::edms_client::EdmsClient;
use crate::application::use_cases::error::UseCaseError;
use crate::application::versions::{self, VersionGroup};

pub struct ListVersionGroups<'a, C: EdmsClient + ?Sized> {
    pub client: &'a C,
}

impl<'a, C: EdmsClient + ?Sized> ListVersionGroups<'a, C> {
    pub async fn execute(
        &self,
        token: &str,
        query: &DocumentQuery,
    ) -> Result<Vec<VersionGroup>, UseCaseError> {
        let documents = self.client.list_documents(token, query).await?;
        Ok(versions::group_by_base(documents))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::testing::{FakeEdms, author, document_with};

    #[tokio::test]
    async fn groups_listed_documents() {
        let mut v2 = document_with("EFFECTIVE", None);
        v2.document_number = "SOP-002-v2.0".into();
        let v1 = document_with("SUPERSEDED", None);
        let fake = FakeEdms::new(author(), v1.clone()).with_documents(vec![v1, v2]);
        let query = DocumentQuery {
            search: Some("SOP-002".into()),
            ..DocumentQuery::default()
        };
        let groups = ListVersionGroups { client: &fake }
            .execute("tok", &query)
            .await
            .unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].base, "SOP-002");
        assert_eq!(groups[0].versions[0].document_number, "SOP-002-v2.0");
        assert_eq!(fake.calls(), vec![r#"list:[("search", "SOP-002")]"#.to_string()]);
    }
}
