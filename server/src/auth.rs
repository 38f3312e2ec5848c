use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

/// Claims carried by the identity provider's bearer tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// The authenticated caller, extracted from the Authorization header.
///
/// No session state is kept server-side; every request authenticates on
/// its own.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub uid: String,
}

/// Verifies a `Bearer <jwt>` header value against the shared secret.
pub fn authenticate(header: Option<&str>, key: &DecodingKey) -> Result<AuthUser, ApiError> {
    let header = header.ok_or(ApiError::Unauthorized)?;
    let token = header.strip_prefix("Bearer ").ok_or(ApiError::Unauthorized)?;

    let data =
        decode::<Claims>(token, key, &Validation::default()).map_err(|_| ApiError::Unauthorized)?;

    if data.claims.sub.is_empty() {
        return Err(ApiError::Unauthorized);
    }
    Ok(AuthUser {
        uid: data.claims.sub,
    })
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        authenticate(header, &state.decoding_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &[u8] = b"test-secret";

    fn token_for(sub: &str) -> String {
        let claims = Claims {
            sub: sub.to_string(),
            exp: 4_000_000_000, // far future
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap()
    }

    fn key() -> DecodingKey {
        DecodingKey::from_secret(SECRET)
    }

    #[test]
    fn valid_token_yields_the_uid() {
        let header = format!("Bearer {}", token_for("user-1"));
        let user = authenticate(Some(&header), &key()).unwrap();
        assert_eq!(user.uid, "user-1");
    }

    #[test]
    fn missing_header_is_unauthorized() {
        assert!(matches!(
            authenticate(None, &key()),
            Err(ApiError::Unauthorized)
        ));
    }

    #[test]
    fn malformed_header_is_unauthorized() {
        assert!(matches!(
            authenticate(Some("Token abc"), &key()),
            Err(ApiError::Unauthorized)
        ));
        assert!(matches!(
            authenticate(Some("Bearer not.a.jwt"), &key()),
            Err(ApiError::Unauthorized)
        ));
    }

    #[test]
    fn wrong_secret_is_unauthorized() {
        let header = format!("Bearer {}", token_for("user-1"));
        let other_key = DecodingKey::from_secret(b"other-secret");
        assert!(matches!(
            authenticate(Some(&header), &other_key),
            Err(ApiError::Unauthorized)
        ));
    }
}
