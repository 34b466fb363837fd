//! session.rs
//!
//! Доступ оператора. Код доступа сверяется по SHA-256, после чего выдаётся
//! подписанный токен сессии (HS256) с ограниченным сроком жизни.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::config::SessionConfig;
use crate::error::{ServiceError, ServiceResult};

const OPERATOR_SUBJECT: &str = "operator";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionToken {
    pub token: String,
    pub expires_at: i64,
}

/// SHA-256 в виде hex-строки.
pub fn access_code_digest(code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(code.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[derive(Clone)]
pub struct SessionService {
    expected_digest: String,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_hours: i64,
}

impl SessionService {
    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            expected_digest: config.access_code_sha256.to_lowercase(),
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            ttl_hours: config.ttl_hours,
        }
    }

    /// Проверяет код доступа и выдаёт токен сессии.
    pub fn open(&self, access_code: &str) -> ServiceResult<SessionToken> {
        if self.expected_digest.is_empty() || access_code_digest(access_code) != self.expected_digest {
            warn!("session refused: wrong access code");
            return Err(ServiceError::Unauthorized);
        }

        let now = Utc::now();
        let expires_at = Duration::try_hours(self.ttl_hours)
            .filter(|ttl| *ttl > Duration::zero())
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or(ServiceError::SessionLifetime(self.ttl_hours))?;
        let claims = SessionClaims {
            sub: OPERATOR_SUBJECT.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding_key)?;
        info!("operator session opened, expires at {}", claims.exp);

        Ok(SessionToken { token, expires_at: claims.exp })
    }

    /// Проверяет подпись и срок действия токена.
    pub fn verify(&self, token: &str) -> ServiceResult<SessionClaims> {
        let data = decode::<SessionClaims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| {
                tracing::debug!("session token rejected: {}", e);
                ServiceError::Unauthorized
            })?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(code: &str) -> SessionService {
        SessionService::from_config(&SessionConfig {
            access_code_sha256: access_code_digest(code),
            secret: "unit-test-secret".to_string(),
            ttl_hours: 1,
        })
    }

    #[test]
    fn right_code_opens_a_verifiable_session() {
        let sessions = service("open-sesame");
        let token = sessions.open("open-sesame").unwrap();
        let claims = sessions.verify(&token.token).unwrap();
        assert_eq!(claims.sub, "operator");
        assert_eq!(claims.exp, token.expires_at);
    }

    #[test]
    fn wrong_code_is_refused() {
        assert!(matches!(service("open-sesame").open("guess"), Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn tokens_from_another_secret_are_rejected() {
        let token = service("a").open("a").unwrap();
        let other = SessionService::from_config(&SessionConfig {
            access_code_sha256: access_code_digest("a"),
            secret: "different".to_string(),
            ttl_hours: 1,
        });
        assert!(other.verify(&token.token).is_err());
    }

    #[test]
    fn unusable_lifetime_is_an_error() {
        for ttl_hours in [0, -1, 10_000_000_000, i64::MAX] {
            let sessions = SessionService::from_config(&SessionConfig {
                access_code_sha256: access_code_digest("a"),
                secret: "unit-test-secret".to_string(),
                ttl_hours,
            });
            assert!(
                matches!(sessions.open("a"), Err(ServiceError::SessionLifetime(h)) if h == ttl_hours),
                "ttl_hours {ttl_hours}"
            );
        }
    }

    #[test]
    fn digest_is_lowercase_hex() {
        assert_eq!(
            access_code_digest("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
