use crate::client::ApiClient;
use crate::clock::{Clock, FixedClock, SystemClock};
use crate::config::Config;
use crate::streak::{StreakEngine, StreakPolicy};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub api: ApiClient,
    pub clock: Arc<dyn Clock>,
    pub streak_policy: StreakPolicy,
}

impl AppState {
    pub fn new(api: ApiClient, clock: Arc<dyn Clock>, streak_policy: StreakPolicy) -> Self {
        Self {
            api,
            clock,
            streak_policy,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let clock: Arc<dyn Clock> = match config.today {
            Some(today) => Arc::new(FixedClock(today)),
            None => Arc::new(SystemClock),
        };
        Self::new(ApiClient::new(config.api_url.clone()), clock, config.streak_policy)
    }

    pub fn streak_engine(&self) -> StreakEngine {
        StreakEngine::new(self.streak_policy).with_clock(Arc::clone(&self.clock))
    }
}
