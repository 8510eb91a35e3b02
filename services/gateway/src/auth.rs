use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::FromRequestParts, http::request::Parts};
use headers::{Authorization, HeaderMapExt, authorization::Bearer};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Role claim value granting the elevated capability
pub const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// The two capability levels callers can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Capability {
    Authenticated,
    Elevated,
}

impl Claims {
    pub fn capability(&self) -> Capability {
        match self.role.as_deref() {
            Some(ADMIN_ROLE) => Capability::Elevated,
            _ => Capability::Authenticated,
        }
    }
}

/// HS256 bearer token verification
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    encoding_key: EncodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret),
            encoding_key: EncodingKey::from_secret(secret),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
    }

    /// Sign claims with the same secret. Used by operators and tests to mint tokens.
    pub fn issue(&self, claims: &Claims) -> Result<String, AppError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AppError::InternalError(e.into()))
    }
}

/// Any caller holding a valid token
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub subject: String,
    pub capability: Capability,
}

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let bearer = parts
            .headers
            .typed_get::<Authorization<Bearer>>()
            .ok_or_else(|| AppError::Unauthorized("Missing authentication credentials".to_string()))?;

        let claims = state.tokens.verify(bearer.token())?;

        Ok(AuthenticatedUser {
            capability: claims.capability(),
            subject: claims.sub,
        })
    }
}

/// Caller holding the elevated capability
#[derive(Debug, Clone)]
pub struct ElevatedUser(pub AuthenticatedUser);

impl FromRequestParts<AppState> for ElevatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;
        if user.capability < Capability::Elevated {
            tracing::warn!(subject = %user.subject, "elevated operation refused");
            return Err(AppError::Forbidden(
                "You do not have permission to perform this action".to_string(),
            ));
        }
        Ok(ElevatedUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: Option<&str>, exp: usize) -> Claims {
        Claims {
            sub: "analyst".to_string(),
            exp,
            role: role.map(String::from),
        }
    }

    fn far_future() -> usize {
        (chrono::Utc::now().timestamp() + 3600) as usize
    }

    #[test]
    fn test_admin_role_is_elevated() {
        assert_eq!(claims(Some("admin"), 0).capability(), Capability::Elevated);
        assert_eq!(claims(Some("viewer"), 0).capability(), Capability::Authenticated);
        assert_eq!(claims(None, 0).capability(), Capability::Authenticated);
    }

    #[test]
    fn test_issued_token_verifies() {
        let verifier = TokenVerifier::new(b"test-secret-test-secret");
        let token = verifier.issue(&claims(Some("admin"), far_future())).unwrap();
        let decoded = verifier.verify(&token).unwrap();
        assert_eq!(decoded.sub, "analyst");
        assert_eq!(decoded.capability(), Capability::Elevated);
    }

    #[test]
    fn test_foreign_secret_is_rejected() {
        let ours = TokenVerifier::new(b"test-secret-test-secret");
        let theirs = TokenVerifier::new(b"another-secret-entirely");
        let token = theirs.issue(&claims(None, far_future())).unwrap();
        assert!(matches!(ours.verify(&token), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let verifier = TokenVerifier::new(b"test-secret-test-secret");
        let token = verifier.issue(&claims(None, 1_000)).unwrap();
        assert!(matches!(verifier.verify(&token), Err(AppError::Unauthorized(_))));
    }
}
