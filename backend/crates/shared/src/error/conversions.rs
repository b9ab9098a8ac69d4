//! [`AppError`] from identifier parse failures, and its HTTP rendering

use super::app_error::AppError;
use crate::id::IdParseError;

impl From<IdParseError> for AppError {
    fn from(err: IdParseError) -> Self {
        AppError::bad_request("Invalid identifier").with_source(err)
    }
}

/// Build the JSON error body: `{"error": <message>}`, plus `"action"` when set
pub fn error_body(err: &AppError) -> serde_json::Value {
    let mut body = serde_json::json!({ "error": err.message() });
    if let Some(action) = err.action() {
        body["action"] = serde_json::Value::from(action);
    }
    body
}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status, Json(error_body(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::kind::ErrorKind;
    use crate::id::Id;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    struct Thing;

    #[test]
    fn test_id_parse_error_conversion() {
        let err: AppError = Id::<Thing>::parse("nope").unwrap_err().into();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert_eq!(err.message(), "Invalid identifier");
    }

    #[test]
    fn test_error_body_shape() {
        let body = error_body(&AppError::new(ErrorKind::Unauthorized, "Token expired"));
        assert_eq!(body, serde_json::json!({ "error": "Token expired" }));

        let body = error_body(&AppError::bad_request("bad").with_action("fix it"));
        assert_eq!(body["action"], "fix it");
    }

    #[cfg(feature = "axum")]
    #[test]
    fn test_into_response_status() {
        use axum::response::IntoResponse;

        let response = AppError::new(ErrorKind::Conflict, "user already exists").into_response();
        assert_eq!(response.status(), axum::http::StatusCode::CONFLICT);
    }
}
