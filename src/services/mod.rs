/*
 * Responsibility
 * - ドメインサービス (HTTP に依存しない検証ロジック) の公開
 */
pub mod auth;
