//! Application state for the HR/payroll API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::auth::TokenService;
use crate::config::ConfigLoader;
use crate::models::Schedule;
use crate::store::Store;

/// Shared application state.
///
/// Contains resources that are shared across all request handlers: the
/// loaded configuration, the record store and the token service.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
    store: Arc<Store>,
    tokens: Arc<TokenService>,
    default_schedule: Arc<Schedule>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(config: ConfigLoader, store: Store) -> Self {
        let tokens = TokenService::new(&config.app().session);
        let default_schedule = config.app().attendance.default_schedule.to_schedule();
        Self {
            config: Arc::new(config),
            store: Arc::new(store),
            tokens: Arc::new(tokens),
            default_schedule: Arc::new(default_schedule),
        }
    }

    /// Returns the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the record store.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Returns the token service.
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Schedule applied to employees without one.
    pub fn default_schedule(&self) -> &Schedule {
        &self.default_schedule
    }

    /// Current local time in the configured offset.
    pub fn now(&self) -> NaiveDateTime {
        self.config.now_local()
    }
}
