/*
 * Responsibility
 * - 環境変数や設定の読み込み (PORT, CORS 許可、JWT 検証設定など)
 * - 設定値のバリデーション (不足なら起動失敗)
 * - 起動時に一度だけ解決し、以降は AppState 経由で注入する
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use thiserror::Error;

/// Used as the HMAC key when `JWT_SECRET` is not configured.
/// Anyone who reads this file can mint tokens against it.
pub const PLACEHOLDER_JWT_SECRET: &str = "replace-with-env-secret";

/// Upper bound for `JWT_LEEWAY_SECONDS`.
pub const MAX_JWT_LEEWAY_SECONDS: u64 = 3600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw
            .unwrap_or("development")
            .trim()
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// HMAC verification key.
///
/// Key material is never printed via Debug.
#[derive(Clone, PartialEq, Eq)]
pub struct JwtSecret {
    value: String,
    placeholder: bool,
}

impl JwtSecret {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            placeholder: false,
        }
    }

    pub fn placeholder() -> Self {
        Self {
            value: PLACEHOLDER_JWT_SECRET.to_string(),
            placeholder: true,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.value.as_bytes()
    }

    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }
}

impl fmt::Debug for JwtSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtSecret")
            .field("value", &"<redacted>")
            .field("placeholder", &self.placeholder)
            .finish()
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    pub jwt_secret: JwtSecret,
    // iss / aud are only checked when configured
    pub jwt_issuer: Option<String>,
    pub jwt_audience: Option<String>,
    pub jwt_leeway_seconds: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a `Config` from an arbitrary key lookup.
    ///
    /// `from_env` wraps this with the process environment; tests feed a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match non_empty(&lookup, "PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV").as_deref());

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        // 本番で placeholder を使うと誰でもトークンを作れてしまうため、起動を止める
        let jwt_secret = match non_empty(&lookup, "JWT_SECRET") {
            Some(secret) => JwtSecret::new(secret),
            None if app_env.is_production() => return Err(ConfigError::Missing("JWT_SECRET")),
            None => JwtSecret::placeholder(),
        };

        let jwt_issuer = non_empty(&lookup, "JWT_ISSUER");
        let jwt_audience = non_empty(&lookup, "JWT_AUDIENCE");

        let jwt_leeway_seconds = match non_empty(&lookup, "JWT_LEEWAY_SECONDS") {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs <= MAX_JWT_LEEWAY_SECONDS)
                .ok_or(ConfigError::Invalid("JWT_LEEWAY_SECONDS"))?,
            None => 0,
        };

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            jwt_secret,
            jwt_issuer,
            jwt_audience,
            jwt_leeway_seconds,
        })
    }
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_in_development() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.addr.port(), 3000);
        assert_eq!(config.app_env, AppEnv::Development);
        assert!(config.cors_allowed_origins.is_empty());
        assert!(config.jwt_secret.is_placeholder());
        assert_eq!(config.jwt_secret.as_bytes(), PLACEHOLDER_JWT_SECRET.as_bytes());
        assert_eq!(config.jwt_issuer, None);
        assert_eq!(config.jwt_audience, None);
        assert_eq!(config.jwt_leeway_seconds, 0);
    }

    #[test]
    fn reads_configured_secret() {
        let config = config_from(&[("JWT_SECRET", "s3cr3t")]).unwrap();

        assert!(!config.jwt_secret.is_placeholder());
        assert_eq!(config.jwt_secret.as_bytes(), b"s3cr3t");
    }

    #[test]
    fn blank_secret_counts_as_unset() {
        let config = config_from(&[("JWT_SECRET", "   ")]).unwrap();
        assert!(config.jwt_secret.is_placeholder());
    }

    #[test]
    fn production_requires_secret() {
        let err = config_from(&[("APP_ENV", "production")]).unwrap_err();
        assert_eq!(err, ConfigError::Missing("JWT_SECRET"));

        let config = config_from(&[("APP_ENV", "prod"), ("JWT_SECRET", "s3cr3t")]).unwrap();
        assert!(config.app_env.is_production());
    }

    #[test]
    fn rejects_invalid_numbers() {
        assert_eq!(
            config_from(&[("PORT", "http")]).unwrap_err(),
            ConfigError::Invalid("PORT")
        );
        assert_eq!(
            config_from(&[("JWT_LEEWAY_SECONDS", "-5")]).unwrap_err(),
            ConfigError::Invalid("JWT_LEEWAY_SECONDS")
        );
        assert_eq!(
            config_from(&[("JWT_LEEWAY_SECONDS", "3601")]).unwrap_err(),
            ConfigError::Invalid("JWT_LEEWAY_SECONDS")
        );
        assert_eq!(
            config_from(&[("JWT_LEEWAY_SECONDS", "18446744073709551615")]).unwrap_err(),
            ConfigError::Invalid("JWT_LEEWAY_SECONDS")
        );

        let config = config_from(&[("JWT_LEEWAY_SECONDS", "3600")]).unwrap();
        assert_eq!(config.jwt_leeway_seconds, MAX_JWT_LEEWAY_SECONDS);
    }

    #[test]
    fn parses_optional_claim_checks_and_origins() {
        let config = config_from(&[
            ("PORT", "8080"),
            ("JWT_ISSUER", "https://issuer.example"),
            ("JWT_AUDIENCE", "api"),
            ("JWT_LEEWAY_SECONDS", "30"),
            ("CORS_ALLOWED_ORIGINS", "https://a.example, ,https://b.example"),
        ])
        .unwrap();

        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.jwt_issuer.as_deref(), Some("https://issuer.example"));
        assert_eq!(config.jwt_audience.as_deref(), Some("api"));
        assert_eq!(config.jwt_leeway_seconds, 30);
        assert_eq!(
            config.cors_allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
    }

    #[test]
    fn secret_debug_is_redacted() {
        let rendered = format!("{:?}", JwtSecret::new("do-not-print"));
        assert!(!rendered.contains("do-not-print"));
    }
}
