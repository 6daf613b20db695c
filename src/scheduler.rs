//! # Scheduler Module
//!
//! Drives the poll cycle: fetch, store the snapshot, ask the renderer to
//! refresh, wait, repeat. Until the first successful load, failures are
//! retried after `retryDelay`; afterwards every poll waits `updateInterval`.
//! A 401 stops the scheduler for good.
//!
//! Only one fetch is ever in flight: the next one is issued after the previous
//! one resolved and its wait elapsed. The scheduler is the only writer of the
//! current snapshot and swaps it whole; the renderer only ever borrows a
//! complete snapshot.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::departure_board::DepartureSnapshot;
use crate::service::FetchError;

/// Where departure snapshots come from.
pub trait DepartureSource {
    fn fetch(&self) -> impl Future<Output = Result<DepartureSnapshot, FetchError>> + Send;
}

/// The display side. Receives a refresh request with the current snapshot.
pub trait Renderer {
    fn refresh(&mut self, snapshot: &DepartureSnapshot);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Fetching,
    Waiting(Duration),
    /// Terminal: the API rejected the request as unauthorized.
    Halted,
}

pub struct Scheduler<S, R> {
    source: S,
    renderer: R,
    update_interval: Duration,
    retry_delay: Duration,
    show_app: bool,
    state: SchedulerState,
    loaded: bool,
    snapshot: Arc<DepartureSnapshot>,
}

impl<S: DepartureSource, R: Renderer> Scheduler<S, R> {
    pub fn new(source: S, renderer: R, config: &Config) -> Self {
        Self {
            source,
            renderer,
            update_interval: config.update_interval(),
            retry_delay: config.retry_delay(),
            show_app: config.show_app,
            state: SchedulerState::Idle,
            loaded: false,
            snapshot: Arc::new(DepartureSnapshot::default()),
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Whether at least one poll has succeeded.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// The latest successfully fetched snapshot, empty before the first load.
    pub fn snapshot(&self) -> Arc<DepartureSnapshot> {
        Arc::clone(&self.snapshot)
    }

    /// Runs one fetch and settles its outcome.
    ///
    /// Returns the delay before the next fetch.
    ///
    /// # Errors
    ///
    /// Returns the fatal error if the API answered 401. The scheduler is
    /// `Halted` afterwards and must not be polled again.
    pub async fn poll_once(&mut self) -> Result<Duration, FetchError> {
        self.state = SchedulerState::Fetching;

        let delay = match self.source.fetch().await {
            Ok(snapshot) => {
                let first_load = !self.loaded;
                info!(departures = snapshot.len(), "departure board updated");
                self.snapshot = Arc::new(snapshot);
                self.loaded = true;
                if first_load || !self.show_app {
                    self.request_render();
                }
                self.update_interval
            }
            Err(err) if err.is_fatal() => {
                self.request_render();
                error!(error = %err, "departure board rejected the request, polling stopped");
                self.state = SchedulerState::Halted;
                return Err(err);
            }
            Err(err) => {
                warn!(error = %err, loaded = self.loaded, "could not load departures");
                if !self.show_app {
                    self.request_render();
                }
                if self.loaded {
                    self.update_interval
                } else {
                    self.retry_delay
                }
            }
        };

        debug!(?delay, "next poll scheduled");
        self.state = SchedulerState::Waiting(delay);
        Ok(delay)
    }

    /// Polls until the API answers 401, returning that error.
    pub async fn run(&mut self) -> FetchError {
        loop {
            match self.poll_once().await {
                Ok(delay) => tokio::time::sleep(delay).await,
                Err(err) => return err,
            }
        }
    }

    fn request_render(&mut self) {
        let snapshot = self.snapshot();
        self.renderer.refresh(&snapshot);
    }
}
