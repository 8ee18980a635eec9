//! 服务错误定义

use fittrack_errors::AppError;

use crate::domain::value_objects::{BioMetricsError, DisplayNameError};

impl From<DisplayNameError> for AppError {
    fn from(error: DisplayNameError) -> Self {
        AppError::validation(error.to_string())
    }
}

impl From<BioMetricsError> for AppError {
    fn from(error: BioMetricsError) -> Self {
        AppError::validation(error.to_string())
    }
}
