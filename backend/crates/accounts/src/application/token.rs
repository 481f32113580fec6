//! Session Token Issuer
//!
//! Mints the signed, time-bounded bearer token a successful login returns.
//! Format: standard JWT, three dot-separated base64url segments signed
//! with HMAC-SHA256 over header+payload. The token is self-contained (no
//! server-side session row) and opaque to this subsystem's callers.
//!
//! Issuance only. Verification belongs to the request-authorization layer;
//! any HS256 verifier holding the shared secret can validate these tokens,
//! rejecting bad signatures, expired `exp`, or a foreign algorithm.

use std::fmt;
use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::domain::value_object::{
    account_id::AccountId, role_name::RoleName, user_name::UserName,
};
use crate::error::{AccountError, AccountResult};

/// Validated token signing secret.
///
/// Constructed once at startup; a blank value is a configuration fault
/// that must prevent the subsystem from serving logins at all.
#[derive(Clone)]
pub struct SigningSecret(String);

impl SigningSecret {
    /// Validate a raw secret. Blank or whitespace-only input is a
    /// `Configuration` error.
    pub fn new(raw: impl Into<String>) -> AccountResult<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(AccountError::Configuration(
                "token signing secret is not set".to_string(),
            ));
        }
        Ok(Self(raw))
    }

    /// Key bytes (UTF-8) for the HMAC
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SigningSecret").field(&"[REDACTED]").finish()
    }
}

/// Claims carried by a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject: the account ID
    pub sub: String,
    /// Canonical user name
    pub username: String,
    /// First assigned role, or empty string for a role-less account
    pub role: String,
    /// Issued-at, seconds since epoch
    pub iat: i64,
    /// Absolute expiry, seconds since epoch
    pub exp: i64,
}

impl SessionClaims {
    /// Build claims for an account, stamping `iat` now and `exp` at
    /// now + `ttl`.
    pub fn new(
        account_id: &AccountId,
        user_name: &UserName,
        role: Option<&RoleName>,
        ttl: Duration,
    ) -> Self {
        let now = Utc::now().timestamp();

        Self {
            sub: account_id.to_string(),
            username: user_name.canonical().to_string(),
            role: role.map(|r| r.as_str().to_string()).unwrap_or_default(),
            iat: now,
            exp: now + ttl.as_secs() as i64,
        }
    }
}

/// Session token issuer (JWT, HS256)
///
/// Stateless; safe to share behind an `Arc`.
pub struct TokenIssuer {
    header: Header,
    key: EncodingKey,
}

impl TokenIssuer {
    /// Build an issuer from an injected, already-validated secret
    pub fn new(secret: &SigningSecret) -> Self {
        Self {
            header: Header::new(Algorithm::HS256),
            key: EncodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Encode and sign the claims
    pub fn issue(&self, claims: &SessionClaims) -> AccountResult<String> {
        jsonwebtoken::encode(&self.header, claims, &self.key)
            .map_err(|e| AccountError::Internal(format!("token encoding failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{DecodingKey, Validation, decode};

    fn issuer(secret: &str) -> TokenIssuer {
        TokenIssuer::new(&SigningSecret::new(secret).unwrap())
    }

    fn claims(ttl_secs: u64) -> SessionClaims {
        SessionClaims::new(
            &AccountId::new(),
            &UserName::new("Alice").unwrap(),
            Some(&RoleName::default()),
            Duration::from_secs(ttl_secs),
        )
    }

    #[test]
    fn test_blank_secret_is_configuration_error() {
        assert!(matches!(
            SigningSecret::new(""),
            Err(AccountError::Configuration(_))
        ));
        assert!(matches!(
            SigningSecret::new("   "),
            Err(AccountError::Configuration(_))
        ));
    }

    #[test]
    fn test_token_has_three_segments() {
        let token = issuer("test-secret").issue(&claims(3600)).unwrap();
        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn test_token_verifies_with_same_secret() {
        let token = issuer("test-secret").issue(&claims(3600)).unwrap();

        let decoded = decode::<SessionClaims>(
            &token,
            &DecodingKey::from_secret(b"test-secret"),
            &Validation::new(Algorithm::HS256),
        )
        .unwrap();

        assert_eq!(decoded.claims.username, "alice");
        assert_eq!(decoded.claims.role, "User");
        assert!(decoded.claims.exp > decoded.claims.iat);
    }

    #[test]
    fn test_token_rejected_with_other_secret() {
        let token = issuer("test-secret").issue(&claims(3600)).unwrap();

        let result = decode::<SessionClaims>(
            &token,
            &DecodingKey::from_secret(b"other-secret"),
            &Validation::new(Algorithm::HS256),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let mut expired = claims(3600);
        expired.exp = expired.iat - 60;
        let token = issuer("test-secret").issue(&expired).unwrap();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let result = decode::<SessionClaims>(
            &token,
            &DecodingKey::from_secret(b"test-secret"),
            &validation,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_secret_debug_redacted() {
        let secret = SigningSecret::new("very-secret").unwrap();
        let debug_output = format!("{:?}", secret);
        assert!(!debug_output.contains("very-secret"));
    }
}
