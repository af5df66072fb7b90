//! Compact HS256 tokens (`header.claims.signature`, base64url without
//! padding), compatible with standard JWT decoders.

use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

pub const ADMIN_TOKEN_TTL_HOURS: i64 = 1;
pub const STUDENT_TOKEN_TTL_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Student,
}

impl Role {
    pub fn ttl(self) -> Duration {
        match self {
            Role::Admin => Duration::hours(ADMIN_TOKEN_TTL_HOURS),
            Role::Student => Duration::days(STUDENT_TOKEN_TTL_DAYS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Row id of the admin or student.
    pub sub: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    typ: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,
    #[error("unsupported token algorithm")]
    Algorithm,
    #[error("signature mismatch")]
    Signature,
    #[error("token expired")]
    Expired,
    #[error("signing key rejected")]
    Key,
}

#[derive(Clone)]
pub struct TokenSigner {
    secret: Arc<[u8]>,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner").finish_non_exhaustive()
    }
}

impl TokenSigner {
    pub fn new(secret: &str) -> Self {
        Self {
            secret: Arc::from(secret.as_bytes()),
        }
    }

    pub fn issue(&self, sub: &str, role: Role) -> Result<String, TokenError> {
        let now = Utc::now();
        self.issue_at(sub, role, now.timestamp(), (now + role.ttl()).timestamp())
    }

    fn issue_at(&self, sub: &str, role: Role, iat: i64, exp: i64) -> Result<String, TokenError> {
        let header = Header {
            alg: "HS256".to_string(),
            typ: "JWT".to_string(),
        };
        let claims = Claims {
            sub: sub.to_string(),
            role,
            iat,
            exp,
        };

        let header = serde_json::to_vec(&header).map_err(|_| TokenError::Malformed)?;
        let claims = serde_json::to_vec(&claims).map_err(|_| TokenError::Malformed)?;
        let signing_input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(header),
            URL_SAFE_NO_PAD.encode(claims)
        );
        let signature = self.sign(signing_input.as_bytes())?;

        Ok(format!("{}.{}", signing_input, URL_SAFE_NO_PAD.encode(signature)))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    pub fn verify_at(&self, token: &str, now: i64) -> Result<Claims, TokenError> {
        let (signing_input, signature) = token.rsplit_once('.').ok_or(TokenError::Malformed)?;
        let (header, claims) = signing_input
            .split_once('.')
            .filter(|(_, claims)| !claims.contains('.'))
            .ok_or(TokenError::Malformed)?;

        let header: Header = decode_segment(header)?;
        if header.alg != "HS256" {
            return Err(TokenError::Algorithm);
        }

        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| TokenError::Malformed)?;
        let mut mac = self.mac()?;
        mac.update(signing_input.as_bytes());
        mac.verify_slice(&signature).map_err(|_| TokenError::Signature)?;

        let claims: Claims = decode_segment(claims)?;
        if claims.exp <= now {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    fn mac(&self) -> Result<HmacSha256, TokenError> {
        HmacSha256::new_from_slice(&self.secret).map_err(|_| TokenError::Key)
    }

    fn sign(&self, input: &[u8]) -> Result<Vec<u8>, TokenError> {
        let mut mac = self.mac()?;
        mac.update(input);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

fn decode_segment<T: for<'de> Deserialize<'de>>(segment: &str) -> Result<T, TokenError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| TokenError::Malformed)?;
    serde_json::from_slice(&bytes).map_err(|_| TokenError::Malformed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_verifies() {
        let signer = TokenSigner::new("secret");
        let token = signer.issue("admin-1", Role::Admin).unwrap();

        let claims = signer.verify(&token).unwrap();
        assert_eq!(claims.sub, "admin-1");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn student_tokens_last_a_week() {
        let signer = TokenSigner::new("secret");
        let claims = signer
            .verify(&signer.issue("s-1", Role::Student).unwrap())
            .unwrap();
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 3600);
    }

    #[test]
    fn expired_token_is_rejected() {
        let signer = TokenSigner::new("secret");
        let token = signer.issue_at("admin-1", Role::Admin, 100, 200).unwrap();

        assert_eq!(signer.verify_at(&token, 199).map(|c| c.exp), Ok(200));
        assert_eq!(signer.verify_at(&token, 200), Err(TokenError::Expired));
    }

    #[test]
    fn token_from_another_key_is_rejected() {
        let forged = TokenSigner::new("other").issue("admin-1", Role::Admin).unwrap();
        assert_eq!(
            TokenSigner::new("secret").verify(&forged),
            Err(TokenError::Signature)
        );
    }

    #[test]
    fn tampered_claims_are_rejected() {
        let signer = TokenSigner::new("secret");
        let token = signer.issue("s-1", Role::Student).unwrap();
        let parts: Vec<&str> = token.split('.').collect();

        let elevated = Claims {
            sub: "s-1".to_string(),
            role: Role::Admin,
            iat: 0,
            exp: i64::MAX,
        };
        let body = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&elevated).unwrap());
        let tampered = format!("{}.{}.{}", parts[0], body, parts[2]);

        assert_eq!(signer.verify(&tampered), Err(TokenError::Signature));
    }

    #[test]
    fn garbage_is_malformed() {
        let signer = TokenSigner::new("secret");
        assert_eq!(signer.verify("not-a-token"), Err(TokenError::Malformed));
        assert_eq!(signer.verify("a.b.c.d"), Err(TokenError::Malformed));
        assert_eq!(signer.verify(""), Err(TokenError::Malformed));
    }
}
