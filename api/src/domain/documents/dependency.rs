use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DependencyType {
    References,
    Template,
    Supersedes,
    Incorporates,
    Supports,
    Implements,
    Other(String),
}

impl DependencyType {
    pub fn as_str(&self) -> &str {
        match self {
            DependencyType::References => "REFERENCES",
            DependencyType::Template => "TEMPLATE",
            DependencyType::Supersedes => "SUPERSEDES",
            DependencyType::Incorporates => "INCORPORATES",
            DependencyType::Supports => "SUPPORTS",
            DependencyType::Implements => "IMPLEMENTS",
            DependencyType::Other(s) => s.as_str(),
        }
    }
}

impl From<String> for DependencyType {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "REFERENCES" | "REFERENCE" => DependencyType::References,
            "TEMPLATE" => DependencyType::Template,
            "SUPERSEDES" => DependencyType::Supersedes,
            "INCORPORATES" => DependencyType::Incorporates,
            "SUPPORTS" => DependencyType::Supports,
            "IMPLEMENTS" => DependencyType::Implements,
            other => DependencyType::Other(other.to_string()),
        }
    }
}

impl From<DependencyType> for String {
    fn from(value: DependencyType) -> Self {
        value.as_str().to_string()
    }
}

/// The document on the other end of a dependency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "DocumentRefRepr")]
pub struct DocumentRef {
    pub id: i64,
    pub document_number: Option<String>,
    pub title: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DocumentRefRepr {
    Detailed {
        id: i64,
        #[serde(default)]
        document_number: Option<String>,
        #[serde(default)]
        title: Option<String>,
    },
    Id(i64),
}

impl From<DocumentRefRepr> for DocumentRef {
    fn from(value: DocumentRefRepr) -> Self {
        match value {
            DocumentRefRepr::Detailed {
                id,
                document_number,
                title,
            } => DocumentRef {
                id,
                document_number,
                title,
            },
            DocumentRefRepr::Id(id) => DocumentRef {
                id,
                document_number: None,
                title: None,
            },
        }
    }
}

/// Relation between a document and one it depends on (or that depends on it).
/// Critical dependencies trigger change notifications server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentDependency {
    #[serde(default)]
    pub id: Option<i64>,
    pub depends_on: DocumentRef,
    #[serde(default)]
    pub depends_on_document_number: Option<String>,
    pub dependency_type: DependencyType,
    #[serde(default)]
    pub is_critical: bool,
    #[serde(default)]
    pub description: Option<String>,
}

/// One entry of a server-computed dependency chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyNode {
    pub id: i64,
    pub document_number: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, alias = "type")]
    pub dependency_type: Option<DependencyType>,
    #[serde(default)]
    pub is_critical: bool,
    #[serde(default)]
    pub depth: u32,
    #[serde(default)]
    pub parent_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DependencyChain {
    #[serde(default)]
    pub dependencies: Vec<DependencyNode>,
    #[serde(default)]
    pub dependents: Vec<DependencyNode>,
}
