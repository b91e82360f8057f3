use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::settings::AppConfig;
use crate::infrastructure::providers::Providers;
use crate::infrastructure::storage::MediaStore;
use crate::jobs::poller::JobPoller;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub storage: Arc<dyn MediaStore>,
    pub providers: Providers,
    pub poller: JobPoller,
    shutdown: CancellationToken,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        storage: Arc<dyn MediaStore>,
        providers: Providers,
        shutdown: CancellationToken,
    ) -> Self {
        let poller = JobPoller::new(config.poll.clone());
        Self {
            config,
            storage,
            providers,
            poller,
            shutdown,
        }
    }

    /// Token for one request; cancelled together with the server.
    pub fn request_token(&self) -> CancellationToken {
        self.shutdown.child_token()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::infrastructure::providers::tts::GoogleCredentials;
    use crate::infrastructure::storage::memory::MemoryStore;

    /// State wired to a single mock server and an in-memory store.
    pub(crate) fn state(base_url: &str, store: Arc<MemoryStore>) -> AppState {
        state_with_shutdown(base_url, store, CancellationToken::new())
    }

    pub(crate) fn state_with_shutdown(
        base_url: &str,
        store: Arc<MemoryStore>,
        shutdown: CancellationToken,
    ) -> AppState {
        let config = AppConfig::for_tests(base_url);
        let providers = Providers::from_config(&config, GoogleCredentials::Static("ya29.test".into()))
            .expect("http client");
        AppState::new(config, store, providers, shutdown)
    }
}
