/*
 * Responsibility
 * - GET /api/v1/me
 * - 認証ゲートを通過したリクエストの userID をそのまま返す
 */
use axum::Json;
use serde::Serialize;

use crate::api::v1::extractors::AuthCtxExtractor;

#[derive(Debug, Serialize)]
pub struct MeResponse {
    #[serde(rename = "userID")]
    pub user_id: String,
}

pub async fn me(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<MeResponse> {
    Json(MeResponse {
        user_id: ctx.user_id,
    })
}
