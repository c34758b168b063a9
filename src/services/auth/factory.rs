//! Factory: build `AuthService` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::AuthService;
use crate::services::auth::reporter::TracingReporter;

pub fn build_auth_service(config: &Config) -> Arc<AuthService> {
    if config.jwt_secret.is_placeholder() {
        tracing::warn!(
            "JWT_SECRET is not set; verifying tokens with the built-in placeholder secret. \
             Anyone can forge tokens for this server. Set JWT_SECRET before exposing it."
        );
    }

    let auth = AuthService::new(
        &config.jwt_secret,
        config.jwt_issuer.as_deref(),
        config.jwt_audience.as_deref(),
        config.jwt_leeway_seconds,
        Arc::new(TracingReporter),
    );

    Arc::new(auth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::testing::capture_logs;

    fn config_with_secret(secret: Option<&str>) -> Config {
        Config::from_lookup(|key| match key {
            "JWT_SECRET" => secret.map(str::to_string),
            _ => None,
        })
        .unwrap()
    }

    #[test]
    fn placeholder_secret_warns_at_startup() {
        let config = config_with_secret(None);

        let logs = capture_logs(|| {
            build_auth_service(&config);
        });

        assert!(logs.contains("WARN"), "{logs}");
        assert!(logs.contains("JWT_SECRET is not set"), "{logs}");
    }

    #[test]
    fn configured_secret_starts_quietly() {
        let config = config_with_secret(Some("s3cr3t"));

        let logs = capture_logs(|| {
            build_auth_service(&config);
        });

        assert!(!logs.contains("JWT_SECRET"), "{logs}");
    }
}
