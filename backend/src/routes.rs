use rocket::{State, Build, Rocket, get, post, http::Status, serde::json::Json, routes, catchers};
use tracing::{debug, instrument};
use shared::models::*;
use crate::{
   catchers::{bad_request, internal_error, not_found, unprocessable, unsupported_media_type},
   cors::CORS,
   error::ApiError,
   processor::PollProcessor,
   store::PollStore,
};

pub struct AppState {
    pub store: Box<dyn PollStore>,
}

impl AppState {
    pub fn new(store: impl PollStore + 'static) -> Self {
        Self { store: Box::new(store) }
    }
}

#[get("/polls")]
pub async fn list_polls(state: &State<AppState>) -> Result<Json<Vec<Poll>>, ApiError> {
    Ok(Json(PollProcessor::list_polls(state.store.as_ref()).await?))
}

#[instrument(skip(state, request))]
#[post("/polls", format = "json", data = "<request>")]
pub async fn create_poll(
    state: &State<AppState>,
    request: Json<CreatePollRequest>,
) -> Result<Json<Poll>, ApiError> {
    let request = request.into_inner();
    debug!("Creating poll with {} options", request.options.len());
    let poll = PollProcessor::create_poll(state.store.as_ref(), &request.question, &request.labels()).await?;
    Ok(Json(poll))
}

#[instrument(skip(state))]
#[get("/polls/<id>")]
pub async fn get_poll(state: &State<AppState>, id: PollId) -> Result<Json<Poll>, ApiError> {
    Ok(Json(PollProcessor::get_poll(state.store.as_ref(), id).await?))
}

#[instrument(skip(state))]
#[get("/polls/<id>/tally")]
pub async fn get_tally(state: &State<AppState>, id: PollId) -> Result<Json<PollTally>, ApiError> {
    Ok(Json(PollProcessor::get_tally(state.store.as_ref(), id).await?))
}

#[instrument(skip(state, vote), fields(poll_id = vote.poll_id, option_index = vote.option_index))]
#[post("/polls/vote", format = "json", data = "<vote>")]
pub async fn cast_vote(state: &State<AppState>, vote: Json<VoteRequest>) -> Result<(), ApiError> {
    let VoteRequest { poll_id, option_index } = vote.into_inner();
    PollProcessor::vote(state.store.as_ref(), poll_id, option_index).await?;
    Ok(())
}

/// Reached only when a create or vote request does not declare a JSON body.
#[post("/polls", rank = 2)]
pub async fn create_poll_unsupported() -> Status {
    Status::UnsupportedMediaType
}

#[post("/polls/vote", rank = 2)]
pub async fn cast_vote_unsupported() -> Status {
    Status::UnsupportedMediaType
}

#[rocket::options("/<_..>")]
pub async fn all_options() -> Status {
    Status::Ok
}

pub fn build_rocket(state: AppState, cors: CORS) -> Rocket<Build> {
    rocket::build()
        .attach(cors)
        .manage(state)
        .mount(
            "/api",
            routes![
                list_polls,
                create_poll,
                get_poll,
                get_tally,
                cast_vote,
                create_poll_unsupported,
                cast_vote_unsupported,
                all_options
            ],
        )
        .register(
            "/",
            catchers![
                bad_request,
                not_found,
                unsupported_media_type,
                unprocessable,
                internal_error
            ],
        )
}
