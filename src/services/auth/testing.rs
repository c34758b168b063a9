//! Shared helpers for auth tests: token minting + a reporter that remembers.

use std::sync::{Arc, Mutex};

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{Value, json};

use super::access_jwt::{AuthRejection, AuthService};
use super::reporter::AuthFailureReporter;
use crate::config::JwtSecret;

pub const TEST_SECRET: &str = "test-secret-for-unit-tests";

#[derive(Debug, Default)]
pub struct RecordingReporter {
    kinds: Mutex<Vec<&'static str>>,
}

impl RecordingReporter {
    pub fn kinds(&self) -> Vec<&'static str> {
        self.kinds.lock().unwrap().clone()
    }
}

impl AuthFailureReporter for RecordingReporter {
    fn report(&self, rejection: &AuthRejection) {
        self.kinds.lock().unwrap().push(rejection.kind());
    }
}

pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

pub fn sign_with(secret: &str, alg: Algorithm, claims: &Value) -> String {
    jsonwebtoken::encode(
        &Header::new(alg),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

/// HS256 token for `user_id`, valid for the next hour.
pub fn token_for(user_id: &str) -> String {
    sign_with(
        TEST_SECRET,
        Algorithm::HS256,
        &json!({ "userID": user_id, "exp": now() + 3600 }),
    )
}

/// `AuthService` over `TEST_SECRET` with no iss/aud checks, plus its reporter.
pub fn service() -> (AuthService, Arc<RecordingReporter>) {
    let reporter = Arc::new(RecordingReporter::default());
    let auth = AuthService::new(
        &JwtSecret::new(TEST_SECRET),
        None,
        None,
        0,
        reporter.clone(),
    );
    (auth, reporter)
}

/// In-memory sink for `tracing_subscriber::fmt`.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run `f` with a DEBUG-level subscriber scoped to this thread; return what it logged.
pub fn capture_logs(f: impl FnOnce()) -> String {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .without_time()
        .finish();

    tracing::subscriber::with_default(subscriber, f);
    buffer.contents()
}
