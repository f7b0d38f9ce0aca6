//! Location backend: IP geolocation off the UI thread.

use skycast_weather::LocationError as ResolverError;

use super::ServiceMessage;
use crate::app_services::{AppServices, RequestTicket};

/// Error type for location operations
#[derive(Debug, Clone)]
pub enum LocationError {
    /// The service answered without a city
    NotFound,
    Service(String),
    NotInitialized,
}

impl std::fmt::Display for LocationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationError::NotFound => write!(f, "Location error: no city in response"),
            LocationError::Service(s) => write!(f, "Location error: {}", s),
            LocationError::NotInitialized => write!(f, "Location service not initialized"),
        }
    }
}

impl std::error::Error for LocationError {}

impl From<ResolverError> for LocationError {
    fn from(e: ResolverError) -> Self {
        match e {
            ResolverError::NotFound => LocationError::NotFound,
            ResolverError::ServiceUnavailable(s) => LocationError::Service(s),
        }
    }
}

/// Request the caller's city asynchronously.
/// Sends `LocateDone` on the channel when complete; nothing if cancelled.
pub fn request_locate(services: &AppServices, ticket: RequestTicket) {
    let tx = services.sender();
    let generation = ticket.generation;

    let resolver = match services.location_resolver() {
        Some(r) => r,
        None => {
            let _ = tx.send(ServiceMessage::LocateDone {
                generation,
                result: Err(LocationError::NotInitialized),
            });
            return;
        }
    };

    let mut shutdown = services.subscribe_shutdown();
    services.runtime().spawn(async move {
        tokio::select! {
            _ = ticket.token.cancelled() => {
                tracing::debug!("Location detection cancelled");
            }
            _ = shutdown.recv() => {
                tracing::debug!("Location detection stopped by shutdown");
            }
            result = resolver.resolve_city() => {
                let result = result.map_err(LocationError::from);
                match &result {
                    Ok(city) => tracing::info!("Got location: {}", city),
                    Err(e) => tracing::warn!("Location detection failed: {}", e),
                }
                let _ = tx.send(ServiceMessage::LocateDone { generation, result });
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use skycast_weather::LocationResolver;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn locate_with(body: ResponseTemplate) -> Option<ServiceMessage> {
        let services = AppServices::new().unwrap();
        let server = services.runtime().block_on(async {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .respond_with(body)
                .mount(&server)
                .await;
            server
        });
        let resolver = LocationResolver::new(server.uri(), Duration::from_secs(5)).unwrap();
        services.set_location_resolver(Some(Arc::new(resolver)));

        let ticket = services.begin_request();
        request_locate(&services, ticket);
        services.wait_message(Duration::from_secs(5))
    }

    #[test]
    fn location_error_display() {
        assert!(format!("{}", LocationError::Service("dns".into())).contains("dns"));
        assert!(format!("{}", LocationError::NotInitialized).contains("not initialized"));
    }

    #[test]
    fn locate_posts_city() {
        let msg = locate_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"city": "Porto"})),
        );
        match msg {
            Some(ServiceMessage::LocateDone {
                generation,
                result: Ok(city),
            }) => {
                assert_eq!(generation, 1);
                assert_eq!(city, "Porto");
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn locate_without_city_is_not_found() {
        let msg = locate_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})));
        assert!(matches!(
            msg,
            Some(ServiceMessage::LocateDone {
                result: Err(LocationError::NotFound),
                ..
            })
        ));
    }

    #[test]
    fn locate_server_error_is_service_failure() {
        let msg = locate_with(ResponseTemplate::new(500));
        assert!(matches!(
            msg,
            Some(ServiceMessage::LocateDone {
                result: Err(LocationError::Service(_)),
                ..
            })
        ));
    }

    #[test]
    fn locate_without_resolver_reports_not_initialized() {
        let services = AppServices::new().unwrap();
        let ticket = services.begin_request();
        request_locate(&services, ticket);
        assert!(matches!(
            services.wait_message(Duration::from_secs(1)),
            Some(ServiceMessage::LocateDone {
                result: Err(LocationError::NotInitialized),
                ..
            })
        ));
    }
}
