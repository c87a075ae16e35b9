use axum::http::HeaderMap;

use backend_domain::RuntimeConfig;

/// Without a configured token every request is allowed.
pub fn authorize(config: &RuntimeConfig, headers: &HeaderMap) -> bool {
    if let Some(api_token) = &config.api_token {
        return extract_bearer(headers)
            .map(|v| v == *api_token)
            .unwrap_or(false);
    }
    true
}

fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("Authorization")?.to_str().ok()?.trim();
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use backend_domain::{ScoringConfig, ZoneLocation};

    use super::*;

    fn config(api_token: Option<&str>) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: "127.0.0.1:0".to_string(),
            api_token: api_token.map(ToString::to_string),
            data_path: "unused.csv".to_string(),
            report_dir: "./reports".to_string(),
            live_injection: false,
            live_seed: None,
            request_timeout_seconds: 5,
            scoring: ScoringConfig::default(),
            zones: ZoneLocation::defaults(),
        }
    }

    fn bearer(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn open_when_no_token_is_configured() {
        assert!(authorize(&config(None), &HeaderMap::new()));
    }

    #[test]
    fn token_must_match_exactly() {
        let config = config(Some("s3cret"));
        assert!(authorize(&config, &bearer("Bearer s3cret")));
        assert!(!authorize(&config, &bearer("Bearer other")));
        assert!(!authorize(&config, &bearer("Basic s3cret")));
        assert!(!authorize(&config, &bearer("Bearer ")));
        assert!(!authorize(&config, &HeaderMap::new()));
    }
}
