use rocket::http::Status;
use rocket::response::Responder;
use rocket::serde::json::Json;
use shared::{ErrorResponse, PollError};
use thiserror::Error;

#[derive(Error, Debug)]
#[error(transparent)]
pub struct ApiError(#[from] pub PollError);

impl ApiError {
    pub fn status(&self) -> Status {
        match self.0 {
            PollError::Validation(_) => Status::BadRequest,
            PollError::NotFound(_) => Status::NotFound,
            PollError::OutOfRange { .. } => Status::BadRequest,
            PollError::Storage(_) => Status::InternalServerError,
        }
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for ApiError {
    fn respond_to(self, req: &'r rocket::Request<'_>) -> rocket::response::Result<'o> {
        let status = self.status();
        rocket::Response::build_from(Json(ErrorResponse::from(&self.0)).respond_to(req)?)
            .status(status)
            .ok()
    }
}
