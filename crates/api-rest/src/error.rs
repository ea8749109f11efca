use api_shared::ErrorRes;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};

/// Request-level failures, answered before any file is touched.
///
/// Failures of the file operations themselves are not `ApiError`s: they are reported in a 200
/// response with `success = false`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{}", required_message(.0))]
    MissingParameters(Vec<&'static str>),
    #[error("Invalid JSON")]
    InvalidJson,
    #[error("Invalid parameter {field}: {reason}")]
    InvalidParameter { field: &'static str, reason: String },
    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::warn!("Rejected request: {}", self);
        let body = ErrorRes {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// `steamid is required`, `steamid and slot_id are required`, `a, b and c are required`
fn required_message(fields: &[&str]) -> String {
    match fields {
        [] => "missing parameters".into(),
        [one] => format!("{one} is required"),
        [init @ .., last] => format!("{} and {last} are required", init.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_message_lists_fields() {
        assert_eq!(required_message(&["steamid"]), "steamid is required");
        assert_eq!(
            required_message(&["steamid", "slot_id"]),
            "steamid and slot_id are required"
        );
        assert_eq!(
            required_message(&["a", "b", "c"]),
            "a, b and c are required"
        );
    }

    #[test]
    fn status_codes() {
        assert_eq!(ApiError::InvalidJson.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::MissingParameters(vec!["steamid"]).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::MethodNotAllowed.status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
    }
}
