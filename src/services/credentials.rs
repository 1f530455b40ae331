//! Bearer tokens for staff and one-time tokens for candidates.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::SecurityConfig;
use crate::domain::{Caller, Role};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Claims {
    user_id: i32,
    role: Role,
    iat: i64,
    exp: i64,
}

/// Signs and verifies HS256 session tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: chrono::Duration,
}

impl TokenIssuer {
    #[must_use]
    pub fn new(secret: &[u8], ttl: chrono::Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    #[must_use]
    pub fn from_config(config: &SecurityConfig) -> Self {
        Self::new(
            config.jwt_secret.as_bytes(),
            chrono::Duration::minutes(i64::from(config.token_ttl_minutes)),
        )
    }

    pub fn issue(&self, user_id: i32, role: Role) -> anyhow::Result<String> {
        let now = chrono::Utc::now();
        let claims = Claims {
            user_id,
            role,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| anyhow::anyhow!("Failed to sign token: {e}"))
    }

    /// Returns `None` for a token that is malformed, badly signed or expired.
    #[must_use]
    pub fn verify(&self, token: &str) -> Option<Caller> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .ok()
            .map(|data| Caller::new(data.claims.user_id, data.claims.role))
    }
}

/// 256 bits from the OS-seeded thread RNG, hex encoded.
#[must_use]
pub fn generate_request_token() -> String {
    use rand::Rng;

    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();

    bytes.iter().fold(String::with_capacity(64), |mut acc, b| {
        use std::fmt::Write;
        let _ = write!(acc, "{b:02x}");
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_round_trips_to_caller() {
        let issuer = TokenIssuer::new(b"secret", chrono::Duration::minutes(5));
        let token = issuer.issue(42, Role::Reviewer).unwrap();

        assert_eq!(issuer.verify(&token), Some(Caller::new(42, Role::Reviewer)));
    }

    #[test]
    fn rejects_foreign_and_expired_tokens() {
        let issuer = TokenIssuer::new(b"secret", chrono::Duration::minutes(5));
        let other = TokenIssuer::new(b"other", chrono::Duration::minutes(5));
        let token = other.issue(1, Role::Admin).unwrap();
        assert!(issuer.verify(&token).is_none());
        assert!(issuer.verify("garbage").is_none());

        // Beyond the default validation leeway.
        let stale = TokenIssuer::new(b"secret", chrono::Duration::minutes(-10));
        let token = stale.issue(1, Role::Admin).unwrap();
        assert!(issuer.verify(&token).is_none());
    }

    #[test]
    fn request_tokens_are_unique_hex() {
        let a = generate_request_token();
        let b = generate_request_token();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}
