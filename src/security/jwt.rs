//! Bearer-token issuance and validation.
//!
//! Tokens carry the user's email as subject and expire a configurable number
//! of hours after issuance. Only symmetric HMAC algorithms are supported; the
//! secret and algorithm come from the environment.

use anyhow::{anyhow, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JwtAlgorithm {
    HS256,
    HS384,
    HS512,
}

impl JwtAlgorithm {
    pub fn to_jsonwebtoken(&self) -> Algorithm {
        match self {
            Self::HS256 => Algorithm::HS256,
            Self::HS384 => Algorithm::HS384,
            Self::HS512 => Algorithm::HS512,
        }
    }
}

impl FromStr for JwtAlgorithm {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "HS256" => Ok(Self::HS256),
            "HS384" => Ok(Self::HS384),
            "HS512" => Ok(Self::HS512),
            other => Err(anyhow!("Unsupported JWT algorithm: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

pub struct TokenService {
    algorithm: JwtAlgorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiration_hours: i64,
}

impl TokenService {
    pub fn new(secret: &str, algorithm: JwtAlgorithm, expiration_hours: i64) -> Result<Self> {
        if secret.len() < 32 {
            return Err(anyhow!("JWT secret must be at least 32 characters"));
        }
        Ok(Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiration_hours,
        })
    }

    /// Issues a signed token whose subject is the user's email.
    pub fn issue(&self, email: &str) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: email.to_string(),
            exp: (now + Duration::hours(self.expiration_hours)).timestamp(),
            iat: now.timestamp(),
        };
        let header = Header::new(self.algorithm.to_jsonwebtoken());
        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| anyhow!("Failed to encode token: {e}"))
    }

    /// Verifies signature and expiration; any failure is a single opaque error
    /// so callers can map it straight to Unauthorized.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let validation = Validation::new(self.algorithm.to_jsonwebtoken());
        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| anyhow!("Token validation failed: {e}"))
    }
}

pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .or_else(|| auth_header.strip_prefix("bearer "))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "this-is-a-very-long-secret-key-for-testing-purposes-only";

    fn service(hours: i64) -> TokenService {
        TokenService::new(SECRET, JwtAlgorithm::HS256, hours).expect("Failed to create service")
    }

    #[test]
    fn subject_round_trips() {
        let service = service(24);
        let token = service.issue("agent@example.com").expect("issue");
        let claims = service.verify(&token).expect("verify");
        assert_eq!(claims.sub, "agent@example.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn foreign_secret_rejected() {
        let token = service(24).issue("agent@example.com").expect("issue");
        let other = TokenService::new(
            "a-completely-different-signing-secret-of-ample-length",
            JwtAlgorithm::HS256,
            24,
        )
        .expect("service");
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn expired_token_rejected() {
        let token = service(-2).issue("agent@example.com").expect("issue");
        assert!(service(24).verify(&token).is_err());
    }

    #[test]
    fn garbage_token_rejected() {
        assert!(service(24).verify("not.a.token").is_err());
    }

    #[test]
    fn short_secret_rejected() {
        assert!(TokenService::new("short", JwtAlgorithm::HS256, 24).is_err());
    }

    #[test]
    fn bearer_extraction() {
        assert_eq!(extract_bearer_token("Bearer abc123"), Some("abc123"));
        assert_eq!(extract_bearer_token("bearer abc123"), Some("abc123"));
        assert_eq!(extract_bearer_token("Basic abc123"), None);
    }

    #[test]
    fn algorithm_parsing() {
        assert_eq!("HS256".parse::<JwtAlgorithm>().unwrap(), JwtAlgorithm::HS256);
        assert_eq!("HS512".parse::<JwtAlgorithm>().unwrap(), JwtAlgorithm::HS512);
        assert!("RS256".parse::<JwtAlgorithm>().is_err());
    }
}
