use std::collections::HashSet;
use std::sync::Arc;

use axum::http::{HeaderMap, header};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, errors::ErrorKind};
use serde::Deserialize;
use thiserror::Error;

use crate::config::{JwtSecret, MAX_JWT_LEEWAY_SECONDS};
use crate::services::auth::bearer::extract_token;
use crate::services::auth::reporter::AuthFailureReporter;

/// Why a request was not authenticated.
///
/// Every variant maps to the same `401 Unauthorized` response; the variant
/// only reaches the failure reporter.
#[derive(Debug, Error)]
pub enum AuthRejection {
    #[error("missing bearer credential")]
    MissingCredential,

    #[error("expired token")]
    ExpiredToken(#[source] jsonwebtoken::errors::Error),

    #[error("invalid token")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),

    #[error("verified token has no usable 'userID' claim")]
    MissingIdentity,
}

impl AuthRejection {
    /// Stable label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingCredential => "missing_credential",
            Self::ExpiredToken(_) => "expired_token",
            Self::InvalidToken(_) => "invalid_token",
            Self::MissingIdentity => "missing_identity",
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AuthRejection {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        if matches!(e.kind(), ErrorKind::ExpiredSignature) {
            Self::ExpiredToken(e)
        } else {
            Self::InvalidToken(e)
        }
    }
}

/// Application claims carried by the token.
///
/// Registered claims (`exp`, `nbf`, `iss`, `aud`) are checked by
/// `jsonwebtoken::Validation`, so only `userID` is read here.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessTokenClaims {
    // Kept as Value: issuers put either strings or numbers here.
    #[serde(rename = "userID", default)]
    pub user_id: Option<serde_json::Value>,
}

/// 検証済みトークンから取り出した、アプリ側で使う型
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedAccessToken {
    pub user_id: String,
}

/// HMAC (HS256/HS384/HS512) access-token verifier.
///
/// Built once at startup from `Config` and shared read-only across requests.
/// Key material is not printable via Debug.
#[derive(Clone)]
pub struct AuthService {
    decoding_key: DecodingKey,
    validation: Validation,
    reporter: Arc<dyn AuthFailureReporter>,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("AuthService")
            .field("validation", &self.validation)
            .finish()
    }
}

impl AuthService {
    pub fn new(
        secret: &JwtSecret,
        issuer: Option<&str>,
        audience: Option<&str>,
        leeway_seconds: u64,
        reporter: Arc<dyn AuthFailureReporter>,
    ) -> Self {
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());

        // The token header picks the algorithm; only the HMAC family fits a shared secret.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        // jsonwebtoken computes `now - leeway`; an epoch-sized leeway overflows.
        validation.leeway = leeway_seconds.min(MAX_JWT_LEEWAY_SECONDS);
        validation.validate_exp = true;
        validation.validate_nbf = true;

        // exp/nbf are checked when present but not required.
        let mut required = HashSet::new();

        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
            required.insert("iss".to_string());
        }

        match audience {
            Some(audience) => {
                validation.set_audience(&[audience]);
                required.insert("aud".to_string());
            }
            None => validation.validate_aud = false,
        }

        validation.required_spec_claims = required;

        Self {
            decoding_key,
            validation,
            reporter,
        }
    }

    /// Verify and decode a raw JWT.
    pub fn verify(&self, token: &str) -> Result<VerifiedAccessToken, AuthRejection> {
        let data =
            jsonwebtoken::decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation)?;

        let user_id = match data.claims.user_id {
            Some(serde_json::Value::String(s)) if !s.trim().is_empty() => s,
            Some(serde_json::Value::Number(n)) => n.to_string(),
            _ => return Err(AuthRejection::MissingIdentity),
        };

        Ok(VerifiedAccessToken { user_id })
    }

    /// Header map → verified identity.
    ///
    /// This is the entry-point for middleware. A header that is absent, empty
    /// or not visible ASCII is a `MissingCredential`.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<VerifiedAccessToken, AuthRejection> {
        let token = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(extract_token)
            .ok_or(AuthRejection::MissingCredential)?;

        self.verify(token)
    }

    pub fn reporter(&self) -> &dyn AuthFailureReporter {
        self.reporter.as_ref()
    }
}
