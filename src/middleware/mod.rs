/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth: Bearer 検証 (v1 配下のみ)
 * - http / cors / security_headers: Router 全体に掛ける横断的関心事
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
