use uuid::Uuid;

use crate::application::dto::documents::{DocumentDownload, DownloadVariant};
use crate::application::ports::edms_client::EdmsClient;
use crate::application::use_cases::error::UseCaseError;
use crate::domain::documents::document::Document;

pub struct DownloadDocument<'a, C: EdmsClient + ?Sized> {
    pub client: &'a C,
}

impl<'a, C: EdmsClient + ?Sized> DownloadDocument<'a, C> {
    pub async fn execute(
        &self,
        token: &str,
        uuid: Uuid,
        variant: DownloadVariant,
    ) -> Result<DocumentDownload, UseCaseError> {
        let document = self.client.get_document(token, uuid).await?;
        let fetched = self.client.download(token, document.id, variant).await?;
        let filename = fetched
            .filename
            .map(|f| sanitize_filename(&f))
            .filter(|f| !f.is_empty())
            .unwrap_or_else(|| fallback_filename(&document, variant));
        let content_type = fetched.content_type.unwrap_or_else(|| {
            mime_guess::from_path(&filename)
                .first_or_octet_stream()
                .to_string()
        });
        Ok(DocumentDownload {
            filename,
            content_type,
            bytes: fetched.bytes,
        })
    }
}

/// Used when the EDMS API sends no `Content-Disposition` filename.
pub fn fallback_filename(document: &Document, variant: DownloadVariant) -> String {
    let ext = match variant {
        DownloadVariant::Original => document
            .file_extension()
            .map(|e| format!(".{e}"))
            .unwrap_or_default(),
        DownloadVariant::Annotated | DownloadVariant::Official => ".pdf".to_string(),
    };
    let stem = sanitize_filename(&document.document_number);
    let stem = if stem.is_empty() { "document".to_string() } else { stem };
    format!("{}_{}{}", stem, variant.as_str(), ext)
}

fn sanitize_filename(name: &str) -> String {
    let invalid = ['/', '\\', ':', '*', '?', '"', '<', '>', '|', '\0'];
    let mut s: String = name
        .trim()
        .chars()
        .map(|c| if invalid.contains(&c) { '-' } else { c })
        .collect();
    if s.len() > 150 {
        let mut cut = 150;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        s.truncate(cut);
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dto::documents::FetchedFile;
    use crate::application::use_cases::testing::{FakeEdms, author, effective_document};

    #[test]
    fn fallback_names_follow_variant() {
        let doc = effective_document();
        assert_eq!(
            fallback_filename(&doc, DownloadVariant::Original),
            "SOP-002-v1.0_original.docx"
        );
        assert_eq!(
            fallback_filename(&doc, DownloadVariant::Official),
            "SOP-002-v1.0_official.pdf"
        );
    }

    #[tokio::test]
    async fn server_filename_wins_and_type_is_guessed() {
        let fake = FakeEdms::new(author(), effective_document()).with_download(FetchedFile {
            filename: Some("SOP-002 annotated.pdf".into()),
            content_type: None,
            bytes: b"%PDF-1.7".to_vec(),
        });
        let download = DownloadDocument { client: &fake }
            .execute("tok", fake.document_uuid(), DownloadVariant::Annotated)
            .await
            .unwrap();
        assert_eq!(download.filename, "SOP-002 annotated.pdf");
        assert_eq!(download.content_type, "application/pdf");
        assert_eq!(fake.calls(), vec!["download:10:annotated".to_string()]);
    }

    #[tokio::test]
    async fn missing_server_filename_is_constructed() {
        let fake = FakeEdms::new(author(), effective_document()).with_download(FetchedFile {
            filename: None,
            content_type: Some("application/octet-stream".into()),
            bytes: vec![0u8; 4],
        });
        let download = DownloadDocument { client: &fake }
            .execute("tok", fake.document_uuid(), DownloadVariant::Original)
            .await
            .unwrap();
        assert_eq!(download.filename, "SOP-002-v1.0_original.docx");
        assert_eq!(download.content_type, "application/octet-stream");
    }
}
