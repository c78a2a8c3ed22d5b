use anyhow::Result;
use axum::http::HeaderMap;
use serde::de::DeserializeOwned;

use backend_domain::RuntimeConfig;

pub const ACTING_ADMIN_HEADER: &str = "X-Acting-Admin";

pub fn authorize(config: &RuntimeConfig, headers: &HeaderMap) -> bool {
    if let Some(api_token) = &config.api_token {
        return extract_bearer(headers)
            .map(|v| v == *api_token)
            .unwrap_or(false);
    }
    true
}

pub fn acting_admin(headers: &HeaderMap) -> Option<String> {
    headers
        .get(ACTING_ADMIN_HEADER)?
        .to_str()
        .ok()
        .map(|value| value.to_string())
}

pub fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    Ok(serde_json::from_slice(body)?)
}

fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("Authorization")?.to_str().ok()?.trim();
    let prefix = "Bearer ";
    if !value.starts_with(prefix) {
        return None;
    }
    let token = value[prefix.len()..].trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn config(token: Option<&str>) -> RuntimeConfig {
        RuntimeConfig {
            api_token: token.map(str::to_string),
            ..RuntimeConfig::default()
        }
    }

    #[test]
    fn open_when_no_token_configured() {
        assert!(authorize(&config(None), &HeaderMap::new()));
    }

    #[test]
    fn requires_matching_bearer() {
        let mut headers = HeaderMap::new();
        assert!(!authorize(&config(Some("s3cret")), &headers));
        headers.insert("Authorization", HeaderValue::from_static("Bearer wrong"));
        assert!(!authorize(&config(Some("s3cret")), &headers));
        headers.insert("Authorization", HeaderValue::from_static("Bearer s3cret"));
        assert!(authorize(&config(Some("s3cret")), &headers));
    }

    #[test]
    fn reads_acting_admin_header() {
        let mut headers = HeaderMap::new();
        assert!(acting_admin(&headers).is_none());
        headers.insert(ACTING_ADMIN_HEADER, HeaderValue::from_static("bendahara"));
        assert_eq!(acting_admin(&headers).as_deref(), Some("bendahara"));
    }
}
