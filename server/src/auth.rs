//! Basic-authentication gate.
//!
//! Runs before the handlers; a missing, malformed, or mismatched
//! `Authorization` header answers 401 without the store ever being touched.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine};

const SCHEME: &str = "Basic ";

/// The accepted credential. Both observed policies are supported: one
/// combined `"username:password"` secret, or a separate pair compared
/// component-wise after splitting on the first `:`.
#[derive(Debug, Clone)]
pub enum Credential {
    Single(String),
    Pair { username: String, password: String },
}

impl Credential {
    fn matches(&self, decoded: &str) -> bool {
        match self {
            Credential::Single(secret) => decoded == secret,
            Credential::Pair { username, password } => decoded
                .split_once(':')
                .is_some_and(|(user, pass)| user == username && pass == password),
        }
    }
}

pub async fn require_basic(
    State(credential): State<Credential>,
    request: Request,
    next: Next,
) -> Response {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(decode_credential)
        .is_some_and(|decoded| credential.matches(&decoded));

    if authorized {
        next.run(request).await
    } else {
        StatusCode::UNAUTHORIZED.into_response()
    }
}

/// Basic auth is byte-oriented: the base64 payload decodes as ISO-8859-1,
/// where every byte maps to the code point of the same value.
fn decode_credential(header: &str) -> Option<String> {
    let encoded = header.strip_prefix(SCHEME)?;
    let bytes = STANDARD.decode(encoded.trim()).ok()?;
    Some(bytes.into_iter().map(char::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic(credential: &str) -> String {
        format!("Basic {}", STANDARD.encode(credential))
    }

    #[test]
    fn decodes_well_formed_header() {
        let decoded = decode_credential(&basic("admin:hunter2")).unwrap();
        assert_eq!(decoded, "admin:hunter2");
    }

    #[test]
    fn rejects_other_schemes() {
        assert!(decode_credential("Bearer abc123").is_none());
        assert!(decode_credential("basic YWRtaW46eA==").is_none());
    }

    #[test]
    fn rejects_invalid_base64() {
        assert!(decode_credential("Basic not/base64!!!").is_none());
    }

    #[test]
    fn decodes_high_bytes_as_latin1() {
        // 0xFC is 'ü' in ISO-8859-1.
        let encoded = format!("Basic {}", STANDARD.encode([b'u', 0xFC, b':', b'x']));
        assert_eq!(decode_credential(&encoded).unwrap(), "u\u{fc}:x");
    }

    #[test]
    fn single_policy_compares_whole_string() {
        let credential = Credential::Single("admin:hunter2".to_string());
        assert!(credential.matches("admin:hunter2"));
        assert!(!credential.matches("admin:wrong"));
        assert!(!credential.matches("admin"));
    }

    #[test]
    fn pair_policy_compares_components() {
        let credential = Credential::Pair {
            username: "admin".to_string(),
            password: "hunter2".to_string(),
        };
        assert!(credential.matches("admin:hunter2"));
        assert!(!credential.matches("admin:wrong"));
        assert!(!credential.matches("wrong:hunter2"));
        assert!(!credential.matches("adminhunter2"));
    }

    #[test]
    fn pair_policy_splits_on_first_colon_only() {
        let credential = Credential::Pair {
            username: "admin".to_string(),
            password: "pa:ss".to_string(),
        };
        assert!(credential.matches("admin:pa:ss"));
    }
}
