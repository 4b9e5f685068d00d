//! Application state shared across handlers.

use std::sync::{Arc, RwLock};

use thiserror::Error;

use crate::config::RaincheckConfig;
use crate::db::{RepositoryError, StoreClient};
use crate::services::demand::DemandModel;
use crate::services::weather::{WeatherClient, WeatherError};

/// Error building the application state.
#[derive(Debug, Error)]
pub enum StateInitError {
    #[error("data store client: {0}")]
    Store(#[from] RepositoryError),
    #[error("weather client: {0}")]
    Weather(#[from] WeatherError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources: configuration, upstream clients, and the current
/// demand model.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: RaincheckConfig,
    store: StoreClient,
    weather: WeatherClient,
    model: ModelHandle,
}

impl AppState {
    /// Create a new application state from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if either upstream client fails to build.
    pub fn new(config: RaincheckConfig) -> Result<Self, StateInitError> {
        let store = StoreClient::new(&config.store, config.http_timeout)?;
        let weather = WeatherClient::new(&config.weather, config.http_timeout)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                weather,
                model: ModelHandle::default(),
            }),
        })
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &RaincheckConfig {
        &self.inner.config
    }

    /// Get a reference to the data store client.
    #[must_use]
    pub fn store(&self) -> &StoreClient {
        &self.inner.store
    }

    /// Get a reference to the weather API client.
    #[must_use]
    pub fn weather(&self) -> &WeatherClient {
        &self.inner.weather
    }

    /// Get a reference to the demand model handle.
    #[must_use]
    pub fn model(&self) -> &ModelHandle {
        &self.inner.model
    }
}

/// The process-wide demand model slot.
///
/// At most one model is current at a time. Readers take an `Arc` clone of
/// the current model and keep using it even if a retrain swaps the slot
/// mid-request; the swap itself happens under a single-writer lock, so a
/// reader sees either the old or the new model, never a partial one.
#[derive(Default)]
pub struct ModelHandle {
    current: RwLock<Option<Arc<DemandModel>>>,
}

impl ModelHandle {
    /// The currently active model, if any has been trained.
    #[must_use]
    pub fn current(&self) -> Option<Arc<DemandModel>> {
        match self.current.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Replace the active model wholesale.
    ///
    /// Called only after training has succeeded, so a failed retrain
    /// leaves the previous model active.
    pub fn replace(&self, model: DemandModel) {
        let model = Arc::new(model);
        match self.current.write() {
            Ok(mut guard) => *guard = Some(model),
            Err(poisoned) => *poisoned.into_inner() = Some(model),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use raincheck_core::{ProductId, WeatherCategory};

    use crate::services::demand::SaleSample;

    fn model_with_constant(quantity: f64) -> DemandModel {
        DemandModel::fit(&[SaleSample {
            product_id: 1,
            weather_code: 0,
            quantity,
        }])
        .unwrap()
    }

    #[test]
    fn test_handle_starts_empty() {
        let handle = ModelHandle::default();
        assert!(handle.current().is_none());
    }

    #[test]
    fn test_replace_swaps_wholesale() {
        let handle = ModelHandle::default();
        handle.replace(model_with_constant(20.0));

        // A reader holding the old Arc keeps it across a swap.
        let before = handle.current().unwrap();
        handle.replace(model_with_constant(30.0));
        let after = handle.current().unwrap();

        assert_eq!(
            before.predict(ProductId::new(1), WeatherCategory::Clear),
            20
        );
        assert_eq!(
            after.predict(ProductId::new(1), WeatherCategory::Clear),
            30
        );
    }
}
