use jsonwebtoken::{decode, Algorithm, DecodingKey, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// Claims carried by access tokens from the hosted auth provider.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    pub exp: i64,
    #[serde(default)]
    pub iat: Option<i64>,
    pub aud: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// Role attached to the public anon key; never a user session.
pub const ANON_ROLE: &str = "anon";

pub fn verify_token(token: &str, config: &Config) -> AppResult<TokenData<Claims>> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.set_audience(&[config.jwt_audience.as_str()]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!(error = %e, "Bearer token rejected");
        AppError::Unauthorized
    })?;

    if token_data.claims.role.as_deref() == Some(ANON_ROLE) {
        return Err(AppError::Unauthorized);
    }

    Ok(token_data)
}

#[cfg(test)]
pub fn issue_token(user_id: Uuid, config: &Config) -> String {
    use jsonwebtoken::{encode, EncodingKey, Header};

    let now = chrono::Utc::now();
    let claims = Claims {
        sub: user_id,
        email: Some("coachee@example.com".into()),
        exp: (now + chrono::Duration::hours(1)).timestamp(),
        iat: Some(now.timestamp()),
        aud: config.jwt_audience.clone(),
        role: Some("authenticated".into()),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn sign(claims: &serde_json::Value, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn future_exp() -> i64 {
        (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp()
    }

    #[test]
    fn test_valid_token_round_trip() {
        let config = Config::for_tests();
        let user = Uuid::new_v4();
        let data = verify_token(&issue_token(user, &config), &config).unwrap();
        assert_eq!(data.claims.sub, user);
        assert_eq!(data.claims.email.as_deref(), Some("coachee@example.com"));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let config = Config::for_tests();
        let token = sign(
            &serde_json::json!({
                "sub": Uuid::new_v4(),
                "exp": future_exp(),
                "aud": "authenticated",
            }),
            "some-other-secret",
        );
        assert!(matches!(
            verify_token(&token, &config),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_wrong_audience_rejected() {
        let config = Config::for_tests();
        let token = sign(
            &serde_json::json!({
                "sub": Uuid::new_v4(),
                "exp": future_exp(),
                "aud": "service",
            }),
            &config.jwt_secret,
        );
        assert!(verify_token(&token, &config).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let config = Config::for_tests();
        let token = sign(
            &serde_json::json!({
                "sub": Uuid::new_v4(),
                "exp": (chrono::Utc::now() - chrono::Duration::hours(2)).timestamp(),
                "aud": "authenticated",
            }),
            &config.jwt_secret,
        );
        assert!(verify_token(&token, &config).is_err());
    }

    #[test]
    fn test_anon_role_rejected() {
        let config = Config::for_tests();
        let token = sign(
            &serde_json::json!({
                "sub": Uuid::new_v4(),
                "exp": future_exp(),
                "aud": "authenticated",
                "role": "anon",
            }),
            &config.jwt_secret,
        );
        assert!(matches!(
            verify_token(&token, &config),
            Err(AppError::Unauthorized)
        ));
    }
}
