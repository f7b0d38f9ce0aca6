use crate::services::location_service::LocationError as UiLocationError;
use skycast_core::{AppError, LocationError};

impl From<UiLocationError> for AppError {
    fn from(e: UiLocationError) -> Self {
        match e {
            UiLocationError::NotFound => AppError::Location(LocationError::NotFound),
            UiLocationError::Service(s) => AppError::Location(LocationError::ServiceFailed(s)),
            UiLocationError::NotInitialized => AppError::Location(LocationError::ServiceFailed(
                "location service not initialized".into(),
            )),
        }
    }
}
