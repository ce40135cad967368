use rouille::Response;
use serde::Serialize;

#[derive(Debug)]
pub enum ApiError {
    /// A required identifying parameter is absent or unusable.
    /// Surfaced immediately as a client error; no cascade is attempted.
    MissingParameter(String),
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn into_response(self) -> Response {
        match self {
            ApiError::MissingParameter(msg) => {
                Response::json(&ErrorBody { error: msg }).with_status_code(400)
            }

            ApiError::Internal(msg) => {
                Response::json(&ErrorBody { error: msg }).with_status_code(500)
            }
        }
    }
}
