use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::jwt::verify_token;
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
    pub role: String,
}

pub async fn require_auth(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(AppError::Unauthorized)?;

    let token_data = verify_token(bearer.token(), &state.config)?;

    let auth_user = AuthUser {
        id: token_data.claims.sub,
        email: token_data.claims.email.filter(|e| !e.is_empty()),
        role: token_data
            .claims
            .role
            .unwrap_or_else(|| "authenticated".to_string()),
    };

    req.extensions_mut().insert(auth_user);
    Ok(next.run(req).await)
}
