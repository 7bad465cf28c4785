use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, RwLock};
use shared::{models::*, option_position, NewPoll, PollError};
use tracing::debug;

/// Durable home of polls and their counts.
///
/// `record_vote` must be linearized per poll: N concurrent calls against the
/// same option leave that option's count exactly N higher. A vote that has
/// returned `Ok` is visible to the next `get_by_id`.
#[rocket::async_trait]
pub trait PollStore: Send + Sync {
    async fn create(&self, poll: NewPoll) -> Result<Poll, PollError>;

    /// Every poll, in creation order.
    async fn get_all(&self) -> Result<Vec<Poll>, PollError>;

    async fn get_by_id(&self, id: PollId) -> Result<Poll, PollError>;

    async fn record_vote(&self, id: PollId, option_index: i64) -> Result<(), PollError>;
}

#[derive(Debug)]
struct PollRecord {
    id: PollId,
    question: String,
    labels: Vec<String>,
    counts: Mutex<Vec<u64>>,
}

impl PollRecord {
    fn snapshot(&self) -> Result<Poll, PollError> {
        let counts = self.counts.lock().map_err(|_| PollError::storage("poll lock poisoned"))?;
        Ok(Poll {
            id: self.id,
            question: self.question.clone(),
            options: self.labels.iter()
                .zip(counts.iter())
                .map(|(label, &count)| PollOption { vote_option: label.clone(), vote_count: count })
                .collect(),
        })
    }

    fn increment(&self, option_index: i64) -> Result<u64, PollError> {
        let mut counts = self.counts.lock().map_err(|_| PollError::storage("poll lock poisoned"))?;
        let pos = option_position(option_index, counts.len()).ok_or(PollError::OutOfRange {
            poll_id: self.id,
            index: option_index,
            options: counts.len(),
        })?;
        counts[pos] += 1;
        Ok(counts[pos])
    }
}

/// Process-local store. The map lock is only held to insert or look up a
/// record; each record's counts sit behind their own mutex, so votes on
/// different polls never wait on each other.
#[derive(Debug, Default)]
pub struct MemoryPollStore {
    polls: RwLock<BTreeMap<PollId, Arc<PollRecord>>>,
}

impl MemoryPollStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, id: PollId) -> Result<Arc<PollRecord>, PollError> {
        let polls = self.polls.read().map_err(|_| PollError::storage("store lock poisoned"))?;
        polls.get(&id).cloned().ok_or(PollError::NotFound(id))
    }
}

#[rocket::async_trait]
impl PollStore for MemoryPollStore {
    async fn create(&self, poll: NewPoll) -> Result<Poll, PollError> {
        let (question, labels) = poll.into_parts();
        let mut polls = self.polls.write().map_err(|_| PollError::storage("store lock poisoned"))?;
        let id = polls.last_key_value().map_or(1, |(last, _)| last + 1);
        let record = Arc::new(PollRecord {
            id,
            question,
            counts: Mutex::new(vec![0; labels.len()]),
            labels,
        });
        polls.insert(id, Arc::clone(&record));
        drop(polls);

        debug!(poll_id = id, "Stored new poll");
        record.snapshot()
    }

    async fn get_all(&self) -> Result<Vec<Poll>, PollError> {
        let records: Vec<_> = self.polls.read()
            .map_err(|_| PollError::storage("store lock poisoned"))?
            .values()
            .cloned()
            .collect();
        records.iter().map(|record| record.snapshot()).collect()
    }

    async fn get_by_id(&self, id: PollId) -> Result<Poll, PollError> {
        self.record(id)?.snapshot()
    }

    async fn record_vote(&self, id: PollId, option_index: i64) -> Result<(), PollError> {
        let count = self.record(id)?.increment(option_index)?;
        debug!(poll_id = id, option_index, count, "Recorded vote");
        Ok(())
    }
}
