use rocket::{Request, catch, serde::json::Json};
use shared::{ErrorCode, ErrorResponse};

fn body(code: ErrorCode, error: &str) -> Json<ErrorResponse> {
    Json(ErrorResponse { code, error: error.into() })
}

#[catch(400)]
pub fn bad_request(_req: &Request) -> Json<ErrorResponse> {
    body(ErrorCode::ValidationFailed, "Invalid request parameters.")
}

#[catch(404)]
pub fn not_found(_req: &Request) -> Json<ErrorResponse> {
    body(ErrorCode::NotFound, "The requested resource was not found.")
}

#[catch(415)]
pub fn unsupported_media_type(_req: &Request) -> Json<ErrorResponse> {
    body(ErrorCode::ValidationFailed, "Request body must be sent as application/json.")
}

#[catch(422)]
pub fn unprocessable(req: &Request) -> Json<ErrorResponse> {
    let error = match req.uri().path().as_str() {
        "/api/polls/vote" => "Expected a body of the form {\"pollId\": number, \"optionIndex\": number}.",
        _ => "Malformed request body.",
    };
    body(ErrorCode::ValidationFailed, error)
}

#[catch(500)]
pub fn internal_error(_req: &Request) -> Json<ErrorResponse> {
    body(ErrorCode::SystemError, "An internal server error occurred.")
}
