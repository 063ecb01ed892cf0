use axum::{Extension, Json};
use chrono::{NaiveDate, Utc};
use serde::Serialize;

use crate::auth::middleware::AuthUser;
use crate::services::affirmations::affirmation_for;

#[derive(Debug, Serialize)]
pub struct AffirmationResponse {
    pub date: NaiveDate,
    pub text: &'static str,
}

pub async fn today(Extension(auth_user): Extension<AuthUser>) -> Json<AffirmationResponse> {
    let date = Utc::now().date_naive();
    Json(AffirmationResponse {
        date,
        text: affirmation_for(auth_user.id, date),
    })
}
