use axum::{Extension, Json};

use crate::auth::middleware::AuthUser;

pub async fn me(Extension(auth_user): Extension<AuthUser>) -> Json<AuthUser> {
    Json(auth_user)
}
