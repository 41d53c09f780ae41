use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;

/// JWT claims embedded in bearer tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: user ID as a UUID string.
    pub sub: String,
    /// User role at issue time. Authorization always re-reads the role from the user row.
    pub role: String,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
    /// Issued-at time (Unix timestamp).
    pub iat: i64,
    /// Unique token identifier; also the primary key of the matching `api_token` row.
    pub jti: String,
}

/// A freshly signed bearer token together with the data needed to persist it.
#[derive(Debug)]
pub struct IssuedToken {
    pub token: String,
    pub jti: Uuid,
    pub expires_at: DateTime<Utc>,
}

/// Sign a new bearer token for the given user.
///
/// # Errors
///
/// Returns an error if JWT encoding fails.
pub fn issue_token(user_id: Uuid, role: &str, config: &Config) -> anyhow::Result<IssuedToken> {
    let now = Utc::now();
    let jti = Uuid::new_v4();

    #[allow(clippy::cast_possible_wrap)]
    let exp = now.timestamp() + config.jwt_expiration_secs as i64;

    let claims = Claims {
        sub: user_id.to_string(),
        role: role.to_string(),
        exp,
        iat: now.timestamp(),
        jti: jti.to_string(),
    };

    let key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
    let token = encode(&Header::default(), &claims, &key)
        .map_err(|e| anyhow::anyhow!("Failed to encode access token: {e}"))?;

    let expires_at = DateTime::from_timestamp(exp, 0).unwrap_or_else(Utc::now);

    Ok(IssuedToken {
        token,
        jti,
        expires_at,
    })
}

/// Validate a bearer token's signature and expiry and return its claims.
///
/// # Errors
///
/// Returns an error if the token is malformed, badly signed or expired.
pub fn validate_token(token: &str, secret: &str) -> anyhow::Result<Claims> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &key, &validation)
        .map_err(|e| anyhow::anyhow!("Invalid access token: {e}"))?;

    Ok(token_data.claims)
}
