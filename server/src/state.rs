use std::sync::Arc;

use jsonwebtoken::DecodingKey;
use tracing::warn;

use studymate_flows::FlowGateway;
use studymate_store::{ProfileStoreRef, TaskStoreRef};

use crate::config::AppConfig;

/// Fallback token secret for local development only.
const DEV_AUTH_SECRET: &str = "studymate-dev-secret";

/// Application state shared with all routes.
///
/// Everything a handler needs travels in here explicitly; there are no
/// ambient singletons.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub gateway: Arc<FlowGateway>,
    pub tasks: TaskStoreRef,
    pub profiles: ProfileStoreRef,
    pub decoding_key: Arc<DecodingKey>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        gateway: FlowGateway,
        tasks: TaskStoreRef,
        profiles: ProfileStoreRef,
    ) -> Self {
        let secret = match &config.auth_secret {
            Some(secret) => secret.clone(),
            None => {
                warn!("No auth_secret configured, using the development secret");
                DEV_AUTH_SECRET.to_string()
            }
        };

        Self {
            config: Arc::new(config),
            gateway: Arc::new(gateway),
            tasks,
            profiles,
            decoding_key: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }
}
