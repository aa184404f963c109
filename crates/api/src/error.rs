//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use reservation::{ErrorKind, ReservationError};

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request from the client, rejected before reaching the engine.
    BadRequest(String),
    /// Reservation engine error.
    Reservation(ReservationError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Reservation(err) => reservation_error_to_response(err),
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn reservation_error_to_response(err: ReservationError) -> (StatusCode, String) {
    let status = match err.kind() {
        ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::FailedPrecondition | ErrorKind::CapacityExhausted => StatusCode::CONFLICT,
    };
    (status, err.to_string())
}

impl From<ReservationError> for ApiError {
    fn from(err: ReservationError) -> Self {
        ApiError::Reservation(err)
    }
}

#[cfg(test)]
mod tests {
    use reservation::TicketId;

    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_bad_request_body() {
        let response = ApiError::BadRequest("Invalid ticket ID".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Invalid ticket ID");
    }

    #[test]
    fn test_reservation_error_status_mapping() {
        let cases = [
            (ReservationError::NoPassengers, StatusCode::BAD_REQUEST),
            (
                ReservationError::SeatOutOfRange { index: 21, max: 20 },
                StatusCode::BAD_REQUEST,
            ),
            (
                ReservationError::TicketNotFound(TicketId::new(7)),
                StatusCode::NOT_FOUND,
            ),
            (
                ReservationError::TicketCancelled(TicketId::new(7)),
                StatusCode::CONFLICT,
            ),
            (
                ReservationError::CapacityExhausted {
                    requested: 2,
                    available: 1,
                },
                StatusCode::CONFLICT,
            ),
        ];

        for (err, expected) in cases {
            let response = ApiError::from(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[tokio::test]
    async fn test_not_found_carries_engine_message() {
        let response = ApiError::from(ReservationError::TicketNotFound(TicketId::new(9)))
            .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "Ticket not found: 9");
    }
}
