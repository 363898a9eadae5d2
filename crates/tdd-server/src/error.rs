use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tdd_core::error::TddError;

// ---------------------------------------------------------------------------
// AppError
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses. Rendered as
/// `{"ok": false, "error": "..."}`.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    fn status(&self) -> StatusCode {
        match self.0.downcast_ref::<TddError>() {
            Some(e) => match e {
                TddError::ChecklistNotFound
                | TddError::ProgressNotFound
                | TddError::AggregatorNotFound => StatusCode::NOT_FOUND,
                TddError::NoInterpreter => StatusCode::SERVICE_UNAVAILABLE,
                TddError::InvalidConfig(_) => StatusCode::UNPROCESSABLE_ENTITY,
                TddError::Io(_) | TddError::Yaml(_) | TddError::Json(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            None => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        let body = serde_json::json!({ "ok": false, "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checklist_not_found_maps_to_404() {
        let response = AppError(TddError::ChecklistNotFound.into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn progress_not_found_maps_to_404() {
        let response = AppError(TddError::ProgressNotFound.into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn aggregator_not_found_maps_to_404() {
        let response = AppError(TddError::AggregatorNotFound.into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn no_interpreter_maps_to_503() {
        let response = AppError(TddError::NoInterpreter.into()).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn invalid_config_maps_to_422() {
        let response = AppError(TddError::InvalidConfig("zero".into()).into()).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn io_error_maps_to_500() {
        let err = std::io::Error::new(std::io::ErrorKind::Other, "disk");
        let response = AppError(TddError::Io(err).into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn unknown_error_maps_to_500() {
        let response = AppError(anyhow::anyhow!("boom")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
