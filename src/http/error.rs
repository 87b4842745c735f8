use crate::http::dto::ErrorResponse;
use crate::utils::error::ShippingError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

impl ShippingError {
    pub fn status_code(&self) -> StatusCode {
        if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<JsonRejection> for ShippingError {
    fn from(rejection: JsonRejection) -> Self {
        ShippingError::validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl IntoResponse for ShippingError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("Shipping quote failed ({:?}): {}", self.category(), self);
        } else {
            tracing::warn!("Shipping quote rejected ({:?}): {}", self.category(), self);
        }

        let body = ErrorResponse {
            error: self.user_friendly_message(),
        };
        (status, Json(body)).into_response()
    }
}
