//! Session token handling

use crate::config::JwtConfig;
use crate::domain::{Principal, SessionKind};
use crate::error::{AppError, Result};
use anyhow::Context;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Audience stamped on, and required of, every session token.
pub const SESSION_AUDIENCE: &str = "voss";

/// Session token claims
///
/// `role` and `kind` are informational. The resolver always reloads the
/// principal and trusts the stored role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (principal ID)
    pub sub: String,
    pub role: String,
    pub email: String,
    /// Pool the token was issued from ("user" or "admin")
    pub kind: SessionKind,
    pub iss: String,
    pub aud: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// JWT token manager
#[derive(Clone)]
pub struct JwtManager {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl JwtManager {
    /// Build from config. RS256 when a private key is configured, HS256 otherwise.
    pub fn new(config: JwtConfig) -> Result<Self> {
        let algorithm = if config.private_key_pem.is_some() {
            Algorithm::RS256
        } else {
            Algorithm::HS256
        };
        let encoding_key = match config.private_key_pem.as_ref() {
            Some(private_key) => EncodingKey::from_rsa_pem(private_key.as_bytes())
                .context("Failed to load JWT private key")?,
            None => EncodingKey::from_secret(config.secret.as_bytes()),
        };
        let decoding_key = match (config.public_key_pem.as_ref(), config.private_key_pem.as_ref()) {
            (Some(public_key), _) => DecodingKey::from_rsa_pem(public_key.as_bytes())
                .context("Failed to load JWT public key")?,
            (None, Some(_)) => {
                return Err(AppError::Internal(anyhow::anyhow!(
                    "JWT_PUBLIC_KEY is required when JWT_PRIVATE_KEY is set"
                )))
            }
            (None, None) => DecodingKey::from_secret(config.secret.as_bytes()),
        };
        Ok(Self {
            config,
            encoding_key,
            decoding_key,
            algorithm,
        })
    }

    /// 5 seconds of leeway instead of the library default of 60.
    fn strict_validation(&self) -> Validation {
        let mut v = Validation::new(self.algorithm);
        v.leeway = 5;
        v.set_audience(&[SESSION_AUDIENCE]);
        v.set_issuer(&[&self.config.issuer]);
        v
    }

    /// Issue a session token for a resolved principal.
    pub fn create_session_token(&self, principal: &Principal) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.config.token_ttl_secs);

        let claims = SessionClaims {
            sub: principal.id.to_string(),
            role: principal.role.to_string(),
            email: principal.email.clone(),
            kind: principal.pool,
            iss: self.config.issuer.clone(),
            aud: SESSION_AUDIENCE.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };
        let header = Header::new(self.algorithm);
        encode(&header, &claims, &self.encoding_key).map_err(|e| AppError::Internal(e.into()))
    }

    /// Verify signature, issuer, audience and expiry.
    pub fn verify_session_token(&self, token: &str) -> Result<SessionClaims> {
        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &self.strict_validation())?;
        Ok(token_data.claims)
    }

    pub fn token_ttl_secs(&self) -> i64 {
        self.config.token_ttl_secs
    }

    pub fn uses_rsa(&self) -> bool {
        matches!(self.algorithm, Algorithm::RS256)
    }
}
