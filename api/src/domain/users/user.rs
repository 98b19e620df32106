use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Numeric user identifier as issued by the EDMS API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl UserId {
    /// Accepts a number, a numeric string, or an object carrying an `id`.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(UserId),
            Value::String(s) => s.trim().parse::<i64>().ok().map(UserId),
            Value::Object(map) => map.get("id").and_then(Self::from_json),
            _ => None,
        }
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        UserId::from_json(&value)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid user id: {value}")))
    }
}

/// Lenient reader for author/reviewer/approver references. Anything that
/// does not carry a numeric id (null, a display name, garbage) maps to `None`.
pub fn lenient_user_ref<'de, D>(deserializer: D) -> Result<Option<UserId>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(UserId::from_json))
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PermissionLevel {
    Read,
    Write,
    Review,
    Approve,
    Admin,
    Other(String),
}

impl PermissionLevel {
    pub fn as_str(&self) -> &str {
        match self {
            PermissionLevel::Read => "read",
            PermissionLevel::Write => "write",
            PermissionLevel::Review => "review",
            PermissionLevel::Approve => "approve",
            PermissionLevel::Admin => "admin",
            PermissionLevel::Other(s) => s.as_str(),
        }
    }
}

impl From<String> for PermissionLevel {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "read" => PermissionLevel::Read,
            "write" => PermissionLevel::Write,
            "review" => PermissionLevel::Review,
            "approve" => PermissionLevel::Approve,
            "admin" => PermissionLevel::Admin,
            other => PermissionLevel::Other(other.to_string()),
        }
    }
}

impl From<PermissionLevel> for String {
    fn from(value: PermissionLevel) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RoleRepr")]
pub struct Role {
    pub name: Option<String>,
    pub module: Option<String>,
    pub permission_level: PermissionLevel,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RoleRepr {
    Detailed {
        permission_level: PermissionLevel,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        module: Option<String>,
    },
    Bare(PermissionLevel),
}

impl From<RoleRepr> for Role {
    fn from(value: RoleRepr) -> Self {
        match value {
            RoleRepr::Detailed {
                permission_level,
                name,
                module,
            } => Role {
                name,
                module,
                permission_level,
            },
            RoleRepr::Bare(permission_level) => Role {
                name: None,
                module: None,
                permission_level,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub is_superuser: bool,
}

impl User {
    pub fn has_permission_level(&self, level: &PermissionLevel) -> bool {
        self.roles.iter().any(|r| &r.permission_level == level)
    }

    pub fn display_name(&self) -> String {
        if let Some(full) = self.full_name.as_deref().filter(|s| !s.trim().is_empty()) {
            return full.trim().to_string();
        }
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if parts.is_empty() {
            self.username.clone()
        } else {
            parts.join(" ")
        }
    }
}
