use crate::icons::IconError;
use skycast_core::{AppError, DataError};

impl From<IconError> for AppError {
    fn from(e: IconError) -> Self {
        AppError::Data(DataError::Icon(e.to_string()))
    }
}
