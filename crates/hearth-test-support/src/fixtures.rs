//! Session token and clock fixtures.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use serde_json::{Value, json};

/// Header segment of every fixture token (`{"alg":"none","typ":"JWT"}`).
const HEADER: &str = r#"{"alg":"none","typ":"JWT"}"#;

/// Build an unsigned JWT carrying `claims` as its payload.
#[must_use]
pub fn unsigned_jwt(claims: &Value) -> String {
    format!(
        "{}.{}.signature",
        URL_SAFE_NO_PAD.encode(HEADER),
        URL_SAFE_NO_PAD.encode(claims.to_string())
    )
}

/// Token embedding `user`, expiring at `exp` (seconds since the epoch) and
/// issued one hour earlier.
#[must_use]
pub fn session_token(user: &Value, exp: i64) -> String {
    unsigned_jwt(&json!({
        "user": user,
        "iat": exp.saturating_sub(3600),
        "exp": exp,
    }))
}

/// Persisted form of `token`.
#[must_use]
pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Wall-clock seconds since the epoch.
#[must_use]
pub fn now_secs() -> i64 {
    Utc::now().timestamp()
}

/// Wall-clock milliseconds since the epoch.
#[must_use]
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_payload_decodes_back_to_claims() -> Result<(), Box<dyn std::error::Error>> {
        let token = session_token(&json!({ "id": 1 }), 7200);
        let payload = token.split('.').nth(1).ok_or("missing payload")?;
        let claims: Value = serde_json::from_slice(&URL_SAFE_NO_PAD.decode(payload)?)?;
        assert_eq!(claims, json!({ "user": { "id": 1 }, "iat": 3600, "exp": 7200 }));
        Ok(())
    }

    #[test]
    fn bearer_prefixes_token() {
        assert_eq!(bearer("abc"), "Bearer abc");
    }

    #[test]
    fn clock_helpers_agree() {
        let secs = now_secs();
        assert!((now_ms() / 1000 - secs).abs() <= 1);
    }
}
