use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::documents::document::Document;
use crate::domain::documents::number::DocumentNumber;
use crate::domain::documents::status::DocumentStatus;

/// Every known version of one conceptual document.
#[derive(Debug, Clone, Serialize)]
pub struct VersionGroup {
    pub base: String,
    /// Newest first.
    pub versions: Vec<Document>,
    pub current: Option<String>,
    /// `v2.0` style label of `current`.
    pub current_version: Option<String>,
}

/// Newest-first ordering by `(major, minor)`; numbers without a version
/// suffix sort after versioned ones, in reverse lexical order.
pub fn compare_newest_first(a: &DocumentNumber, b: &DocumentNumber) -> Ordering {
    match (&a.version, &b.version) {
        (Some(va), Some(vb)) => vb.cmp(va).then_with(|| b.raw.cmp(&a.raw)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.raw.cmp(&a.raw),
    }
}

pub fn group_by_base(documents: Vec<Document>) -> Vec<VersionGroup> {
    let mut groups: BTreeMap<String, Vec<(DocumentNumber, Document)>> = BTreeMap::new();
    for doc in documents {
        let number = doc.number();
        groups
            .entry(number.base.clone())
            .or_default()
            .push((number, doc));
    }

    groups
        .into_iter()
        .map(|(base, mut entries)| {
            entries.sort_by(|(a, _), (b, _)| compare_newest_first(a, b));
            let versions: Vec<Document> = entries.into_iter().map(|(_, d)| d).collect();
            let current_doc = versions
                .iter()
                .find(|d| d.status == DocumentStatus::Effective)
                .or_else(|| versions.first());
            let current = current_doc.map(|d| d.document_number.clone());
            let current_version = current_doc.and_then(|d| d.number().version_label());
            VersionGroup {
                base,
                versions,
                current,
                current_version,
            }
        })
        .collect()
}
