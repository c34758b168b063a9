/*
 * Responsibility
 * - GET /health (疎通用)
 * - 認証ゲートの外側に置く (トークンなしで叩ける)
 */
use axum::{Json, http::StatusCode};
use serde_json::{Value, json};

pub async fn health() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}
