//! Application state shared across handlers.

use std::sync::Arc;

use jsonwebtoken::{DecodingKey, EncodingKey};
use secrecy::ExposeSecret;
use sqlx::PgPool;

use crate::config::ApiConfig;
use crate::services::payment::{MockPaymentGateway, PaymentGateway};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the database pool and token keys.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    pool: PgPool,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    payment: Arc<dyn PaymentGateway>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The token keys are derived once from the configured JWT secret.
    #[must_use]
    pub fn new(config: ApiConfig, pool: PgPool) -> Self {
        let secret = config.jwt_secret.expose_secret().as_bytes();
        let encoding_key = EncodingKey::from_secret(secret);
        let decoding_key = DecodingKey::from_secret(secret);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                encoding_key,
                decoding_key,
                payment: Arc::new(MockPaymentGateway),
            }),
        }
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Key for signing bearer tokens.
    #[must_use]
    pub fn encoding_key(&self) -> &EncodingKey {
        &self.inner.encoding_key
    }

    /// Key for verifying bearer tokens.
    #[must_use]
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.inner.decoding_key
    }

    /// The configured payment gateway (a mock in this build).
    #[must_use]
    pub fn payment(&self) -> &dyn PaymentGateway {
        self.inner.payment.as_ref()
    }
}
