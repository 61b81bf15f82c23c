use axum::http::Method;

use crate::infra::errors::AppError;

pub async fn not_found_handler() -> AppError {
    AppError::not_found()
}

pub async fn method_not_allowed_handler(method: Method) -> AppError {
    AppError::method_not_allowed(&method)
}
