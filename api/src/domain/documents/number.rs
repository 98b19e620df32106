use once_cell::sync::Lazy;
use regex::Regex;
use semver::Version;

static VERSION_SUFFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+)-[vV](\d+)\.(\d+)$").expect("valid regex"));

/// A document number split into its base (shared by every version of the
/// same conceptual document) and its `-v<major>.<minor>` suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentNumber {
    pub raw: String,
    pub base: String,
    pub version: Option<Version>,
}

impl DocumentNumber {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Some(caps) = VERSION_SUFFIX_RE.captures(trimmed) {
            let major = caps[2].parse::<u64>().ok();
            let minor = caps[3].parse::<u64>().ok();
            if let (Some(major), Some(minor)) = (major, minor) {
                return Self {
                    raw: trimmed.to_string(),
                    base: caps[1].to_string(),
                    version: Some(Version::new(major, minor, 0)),
                };
            }
        }
        Self {
            raw: trimmed.to_string(),
            base: trimmed.to_string(),
            version: None,
        }
    }

    /// `v1.0` style label, when the number carries a version suffix.
    pub fn version_label(&self) -> Option<String> {
        self.version
            .as_ref()
            .map(|v| format!("v{}.{}", v.major, v.minor))
    }
}
