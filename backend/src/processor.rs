use shared::{models::*, poll_tally, NewPoll, PollError};
use tracing::{debug, error, info, warn};

use crate::store::PollStore;

pub struct PollProcessor;

impl PollProcessor {
    pub async fn create_poll<L: AsRef<str>>(
        store: &dyn PollStore,
        question: &str,
        labels: &[L],
    ) -> Result<Poll, PollError> {
        let new_poll = NewPoll::new(question, labels).map_err(|e| Self::log_failure(e.into()))?;

        let poll = store.create(new_poll).await.map_err(Self::log_failure)?;
        info!(poll_id = poll.id, options = poll.options.len(), "Created poll");
        Ok(poll)
    }

    pub async fn list_polls(store: &dyn PollStore) -> Result<Vec<Poll>, PollError> {
        store.get_all().await.map_err(Self::log_failure)
    }

    pub async fn get_poll(store: &dyn PollStore, id: PollId) -> Result<Poll, PollError> {
        store.get_by_id(id).await.map_err(Self::log_failure)
    }

    pub async fn vote(store: &dyn PollStore, id: PollId, option_index: i64) -> Result<(), PollError> {
        store.record_vote(id, option_index).await.map_err(Self::log_failure)
    }

    pub async fn get_tally(store: &dyn PollStore, id: PollId) -> Result<PollTally, PollError> {
        Self::get_poll(store, id).await.map(|poll| poll_tally(&poll))
    }

    fn log_failure(err: PollError) -> PollError {
        match &err {
            PollError::Validation(e) => debug!("Rejected poll: {}", e),
            PollError::NotFound(id) => debug!(poll_id = id, "Poll not found"),
            PollError::OutOfRange { poll_id, index, options } => warn!(
                poll_id, index, options,
                "Client sent an option index outside the poll"
            ),
            PollError::Storage(e) => error!("Poll storage failure: {}", e),
        }
        err
    }
}
