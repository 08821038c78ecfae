//! Query lifecycle for the single weather screen.
//!
//! Every [`WeatherQueryController::submit_query`] moves the observable result to
//! `Loading` and spawns one fetch. Only the most recent query may settle the
//! result: the previous fetch is aborted, and a completion whose generation is
//! no longer current is dropped.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::{sync::watch, task::AbortHandle};

use crate::{
    Config,
    model::{FAILED_TO_LOAD, WeatherResult},
    provider::{WeatherClient, client_from_config},
};

/// Value published to observers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryState {
    /// Bumped by every submitted query; 0 before the first one.
    pub generation: u64,
    /// `None` until the first query is submitted.
    pub result: Option<WeatherResult>,
}

impl QueryState {
    /// True once the current query has a terminal result.
    pub fn is_settled(&self) -> bool {
        matches!(self.result, Some(WeatherResult::Success(_) | WeatherResult::Error(_)))
    }
}

#[derive(Debug)]
pub struct WeatherQueryController {
    shared: Arc<Shared>,
    in_flight: Mutex<Option<AbortHandle>>,
}

#[derive(Debug)]
struct Shared {
    client: Arc<dyn WeatherClient>,
    api_key: String,
    state: watch::Sender<QueryState>,
}

impl WeatherQueryController {
    pub fn new(client: Arc<dyn WeatherClient>, api_key: impl Into<String>) -> Self {
        let (state, _) = watch::channel(QueryState::default());

        Self {
            shared: Arc::new(Shared { client, api_key: api_key.into(), state }),
            in_flight: Mutex::new(None),
        }
    }

    /// Controller backed by the WeatherAPI.com client described by `config`.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = config.require_api_key()?.to_owned();
        let client = client_from_config(config)?;

        Ok(Self::new(Arc::new(client), api_key))
    }

    pub fn subscribe(&self) -> watch::Receiver<QueryState> {
        self.shared.state.subscribe()
    }

    pub fn current(&self) -> Option<WeatherResult> {
        self.shared.state.borrow().result.clone()
    }

    pub fn generation(&self) -> u64 {
        self.shared.state.borrow().generation
    }

    /// Start a query for `city` and return its generation.
    ///
    /// The result is `Loading` when this returns. `city` is passed to the
    /// client as is, empty strings included.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn submit_query(&self, city: impl Into<String>) -> u64 {
        let city = city.into();
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(previous) = in_flight.take() {
            previous.abort();
        }

        let mut generation = 0;
        self.shared.state.send_modify(|state| {
            state.generation += 1;
            state.result = Some(WeatherResult::Loading);
            generation = state.generation;
        });
        tracing::debug!(generation, city = %city, "weather query submitted");

        let shared = Arc::clone(&self.shared);
        let task = tokio::spawn(async move {
            let result = match shared.client.fetch(&shared.api_key, &city).await {
                Ok(snapshot) => WeatherResult::Success(snapshot),
                Err(err) => {
                    tracing::warn!(
                        generation,
                        city = %city,
                        kind = ?err.kind(),
                        error = %err,
                        "weather fetch failed"
                    );
                    WeatherResult::Error(FAILED_TO_LOAD.to_string())
                }
            };

            shared.complete(generation, result);
        });

        *in_flight = Some(task.abort_handle());
        generation
    }
}

impl Drop for WeatherQueryController {
    fn drop(&mut self) {
        let in_flight = self.in_flight.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(task) = in_flight.take() {
            task.abort();
        }
    }
}

impl Shared {
    /// Settle `generation` with `result` unless a newer query has started.
    fn complete(&self, generation: u64, result: WeatherResult) -> bool {
        let applied = self.state.send_if_modified(|state| {
            if state.generation != generation {
                return false;
            }
            state.result = Some(result);
            true
        });

        if !applied {
            tracing::debug!(generation, "discarding result of superseded query");
        }
        applied
    }
}
