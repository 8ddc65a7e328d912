use crate::domain::model::{DecodeRequest, DecodeResult, ErrorBody};
use crate::server::AppState;
use crate::utils::error::MorseError;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

impl IntoResponse for MorseError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!("Error decoding morse: {}", self);
        } else {
            tracing::debug!("Rejected decode request: {}", self);
        }

        let body = ErrorBody {
            error: match self {
                MorseError::ProcessingError { message } => message,
                other => other.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}

pub async fn decode_morse(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<DecodeResult>, MorseError> {
    let request = DecodeRequest::from_body(&body)?;

    let result = state.engine.process(&request.message);
    tracing::info!("Decoded message: {}", result.decoded);
    if result.flag_found {
        tracing::info!("Potential flag found: {}", result.decoded);
    }

    Ok(Json(result))
}

pub async fn decode_usage() -> impl IntoResponse {
    Json(json!({
        "endpoint": "/decode-morse",
        "method": "POST",
        "content_type": "application/json",
        "body": {
            "message": "Morse code string; letters separated by spaces, words by '/'"
        },
        "example": {
            "request": {"message": ".... . .-.. .-.. --- / .-- --- .-. .-.. -.."},
            "response": {"decoded": "HELLO WORLD", "original": ".... . .-.. .-.. --- / .-- --- .-. .-.. -.."}
        },
        "notes": [
            "Unknown symbols decode to '?'",
            "flag_found is included and true when the decoded text contains FLAG, CTF, KEY or CODE"
        ]
    }))
}

pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
