use std::env;

pub const DEFAULT_EDMS_API_URL: &str = "http://localhost:8000/api/v1";

#[derive(Clone, Debug)]
pub struct Config {
    pub api_port: u16,
    pub frontend_url: Option<String>,
    pub edms_api_url: String,
    pub upload_max_bytes: usize,
    pub sse_keepalive_secs: u64,
    pub event_bus_capacity: usize,
    pub is_production: bool,
}

fn parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|s| s.trim().parse().ok())
}

/// Trims trailing slashes and rejects anything that is not an http(s) URL.
pub fn normalize_base_url(raw: &str) -> anyhow::Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        anyhow::bail!("EDMS_API_URL must be an http(s) URL, got `{raw}`");
    }
    Ok(trimmed.to_string())
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let api_port = parsed("API_PORT").unwrap_or(8890);
        let frontend_url = env::var("FRONTEND_URL")
            .ok()
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty());
        let edms_api_url = normalize_base_url(
            &env::var("EDMS_API_URL").unwrap_or_else(|_| DEFAULT_EDMS_API_URL.into()),
        )?;
        let upload_max_bytes = parsed("UPLOAD_MAX_BYTES").unwrap_or(50 * 1024 * 1024);
        let sse_keepalive_secs = parsed("SSE_KEEPALIVE_SECS")
            .filter(|s: &u64| *s > 0)
            .unwrap_or(25);
        let event_bus_capacity = parsed("EVENT_BUS_CAPACITY")
            .filter(|c: &usize| *c > 0)
            .unwrap_or(256);
        let is_production = matches!(
            env::var("RUST_ENV").ok().as_deref(),
            Some("production") | Some("prod")
        );

        if is_production
            && !frontend_url
                .as_deref()
                .map(|u| u.starts_with("http"))
                .unwrap_or(false)
        {
            anyhow::bail!(
                "FRONTEND_URL must be set to a full origin in production (e.g., https://edms.example.com)"
            );
        }

        Ok(Self {
            api_port,
            frontend_url,
            edms_api_url,
            upload_max_bytes,
            sse_keepalive_secs,
            event_bus_capacity,
            is_production,
        })
    }
}
