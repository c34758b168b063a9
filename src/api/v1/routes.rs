/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - v1 配下はすべて Bearer 認証が必要 (middleware::auth::access を適用)
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::me::me;
use crate::middleware;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let router = Router::new().route("/me", get(me));

    middleware::auth::access::apply(router, state)
}
