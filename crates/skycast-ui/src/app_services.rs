//! Shared services for the UI: tokio runtime, clients, result channel and
//! request sequencing.
//!
//! Every user-triggered request takes a [`RequestTicket`]. Taking a new ticket
//! cancels the previous one and bumps the generation, so only the most
//! recently started request can change the screen.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use parking_lot::{Mutex, RwLock};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use skycast_core::WeatherConfig;
use skycast_weather::{LocationResolver, WeatherProvider};

use crate::services::ServiceMessage;

/// Identity of one in-flight request.
#[derive(Debug, Clone)]
pub struct RequestTicket {
    pub generation: u64,
    pub token: CancellationToken,
}

pub struct AppServices {
    /// Tokio runtime for async operations
    runtime: tokio::runtime::Runtime,

    /// Shutdown signal broadcaster
    shutdown_tx: broadcast::Sender<()>,

    weather_provider: RwLock<Option<Arc<WeatherProvider>>>,

    location_resolver: RwLock<Option<Arc<LocationResolver>>>,

    /// Completion messages from background tasks
    service_tx: Sender<ServiceMessage>,
    service_rx: Mutex<Receiver<ServiceMessage>>,

    /// Generation of the most recently started request
    generation: AtomicU64,

    /// Cancellation token of the most recently started request
    active_request: Mutex<Option<CancellationToken>>,
}

impl AppServices {
    /// Create the runtime and the result channel.
    pub fn new() -> Result<Arc<Self>> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("skycast-tokio")
            .build()
            .context("Failed to create tokio runtime")?;

        let (shutdown_tx, _) = broadcast::channel(16);
        let (service_tx, service_rx) = mpsc::channel();

        Ok(Arc::new(Self {
            runtime,
            shutdown_tx,
            weather_provider: RwLock::new(None),
            location_resolver: RwLock::new(None),
            service_tx,
            service_rx: Mutex::new(service_rx),
            generation: AtomicU64::new(0),
            active_request: Mutex::new(None),
        }))
    }

    /// Get the tokio runtime handle.
    pub fn runtime(&self) -> tokio::runtime::Handle {
        self.runtime.handle().clone()
    }

    /// Subscribe to shutdown notifications.
    pub(crate) fn subscribe_shutdown(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Signal shutdown: cancel the active request and drop the clients.
    pub fn shutdown(&self) {
        tracing::info!("AppServices shutdown initiated");

        let _ = self.shutdown_tx.send(());

        if let Some(token) = self.active_request.lock().take() {
            token.cancel();
        }
        *self.weather_provider.write() = None;
        *self.location_resolver.write() = None;

        tracing::info!("AppServices shutdown complete");
    }

    // =========== Clients ===========

    pub fn weather_provider(&self) -> Option<Arc<WeatherProvider>> {
        self.weather_provider.read().clone()
    }

    pub fn set_weather_provider(&self, provider: Option<Arc<WeatherProvider>>) {
        *self.weather_provider.write() = provider;
    }

    /// Initialize the weather provider from configuration.
    pub fn init_weather_provider(&self, config: &WeatherConfig) -> bool {
        let timeout = Duration::from_secs(config.request_timeout_secs);
        match WeatherProvider::new(config.api_key.clone(), config.language.clone(), timeout) {
            Ok(provider) => {
                let provider = provider.with_base_url(config.api_base_url.clone());
                self.set_weather_provider(Some(Arc::new(provider)));
                tracing::info!(
                    "Weather provider initialized (base: {}, lang: {})",
                    config.api_base_url,
                    config.language
                );
                true
            }
            Err(e) => {
                tracing::error!("Failed to create weather provider: {}", e);
                false
            }
        }
    }

    pub fn location_resolver(&self) -> Option<Arc<LocationResolver>> {
        self.location_resolver.read().clone()
    }

    pub fn set_location_resolver(&self, resolver: Option<Arc<LocationResolver>>) {
        *self.location_resolver.write() = resolver;
    }

    /// Initialize the IP geolocation client from configuration.
    pub fn init_location_resolver(&self, config: &WeatherConfig) -> bool {
        let timeout = Duration::from_secs(config.request_timeout_secs);
        match LocationResolver::new(config.geolocation_url.clone(), timeout) {
            Ok(resolver) => {
                self.set_location_resolver(Some(Arc::new(resolver)));
                tracing::info!("Location resolver initialized ({})", config.geolocation_url);
                true
            }
            Err(e) => {
                tracing::error!("Failed to create location resolver: {}", e);
                false
            }
        }
    }

    // =========== Channel ===========

    pub fn sender(&self) -> Sender<ServiceMessage> {
        self.service_tx.clone()
    }

    /// Take every message posted since the last call, without blocking.
    pub fn drain_messages(&self) -> Vec<ServiceMessage> {
        self.service_rx.lock().try_iter().collect()
    }

    /// Block until a message arrives or `timeout` elapses.
    pub fn wait_message(&self, timeout: Duration) -> Option<ServiceMessage> {
        self.service_rx.lock().recv_timeout(timeout).ok()
    }

    // =========== Request sequencing ===========

    /// Start a new request, superseding (and cancelling) the previous one.
    pub fn begin_request(&self) -> RequestTicket {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let token = CancellationToken::new();

        if let Some(previous) = self.active_request.lock().replace(token.clone()) {
            previous.cancel();
        }

        tracing::debug!("Started request generation {}", generation);
        RequestTicket { generation, token }
    }

    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generations_increase() {
        let services = AppServices::new().unwrap();
        assert_eq!(services.current_generation(), 0);

        let first = services.begin_request();
        let second = services.begin_request();
        assert_eq!(first.generation, 1);
        assert_eq!(second.generation, 2);
        assert_eq!(services.current_generation(), 2);
    }

    #[test]
    fn test_new_request_cancels_previous() {
        let services = AppServices::new().unwrap();
        let first = services.begin_request();
        assert!(!first.token.is_cancelled());

        let second = services.begin_request();
        assert!(first.token.is_cancelled());
        assert!(!second.token.is_cancelled());
    }

    #[test]
    fn test_shutdown_cancels_and_clears() {
        let services = AppServices::new().unwrap();
        let config = WeatherConfig::default();
        assert!(services.init_weather_provider(&config));
        assert!(services.init_location_resolver(&config));

        let ticket = services.begin_request();
        let mut shutdown_rx = services.subscribe_shutdown();
        services.shutdown();

        assert!(ticket.token.is_cancelled());
        assert!(shutdown_rx.try_recv().is_ok());
        assert!(services.weather_provider().is_none());
        assert!(services.location_resolver().is_none());
    }

    #[test]
    fn test_drain_is_empty_initially() {
        let services = AppServices::new().unwrap();
        assert!(services.drain_messages().is_empty());
        assert!(services.wait_message(Duration::from_millis(10)).is_none());
    }
}
