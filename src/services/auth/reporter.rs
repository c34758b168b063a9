use std::error::Error as _;

use super::access_jwt::AuthRejection;

/// Sink for authentication failures.
///
/// The gate never tells the caller why it rejected a request; the detail
/// goes here instead. Production wires `TracingReporter`.
pub trait AuthFailureReporter: Send + Sync {
    fn report(&self, rejection: &AuthRejection);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl AuthFailureReporter for TracingReporter {
    fn report(&self, rejection: &AuthRejection) {
        match rejection {
            // Anonymous traffic is routine, keep it out of warn
            AuthRejection::MissingCredential => {
                tracing::debug!(kind = rejection.kind(), "request without bearer credential");
            }
            _ => {
                let cause = rejection
                    .source()
                    .map(|e| e.to_string())
                    .unwrap_or_default();

                tracing::warn!(
                    kind = rejection.kind(),
                    error = %rejection,
                    cause = %cause,
                    "access token verification failed"
                );
            }
        }
    }
}
