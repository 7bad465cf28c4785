use sqlx::PgPool;
use shared::{models::*, option_position, NewPoll, PollError};
use tracing::debug;

use crate::store::PollStore;

type OptionRow = (PollId, String, i32, String, i64);

const SELECT_ALL_POLLS: &str =
    "SELECT p.id, p.question, o.position, o.vote_option, o.vote_count
     FROM polls p JOIN poll_options o ON o.poll_id = p.id
     ORDER BY p.id, o.position";

const SELECT_POLL: &str =
    "SELECT p.id, p.question, o.position, o.vote_option, o.vote_count
     FROM polls p JOIN poll_options o ON o.poll_id = p.id
     WHERE p.id = $1
     ORDER BY o.position";

/// PostgreSQL-backed store. Each vote is a single `UPDATE` on one option row,
/// so the row lock is the per-poll serialization point and concurrent votes
/// are never lost.
#[derive(Debug, Clone)]
pub struct PgPollStore {
    pool: PgPool,
}

impl PgPollStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<(), PollError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(PollError::storage)
    }

    async fn option_count(&self, id: PollId) -> Result<Option<i64>, PollError> {
        let row: Option<(i64,)> = sqlx::query_as(
            "SELECT COUNT(o.position) FROM polls p
             LEFT JOIN poll_options o ON o.poll_id = p.id
             WHERE p.id = $1 GROUP BY p.id",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(PollError::storage)?;
        Ok(row.map(|(count,)| count))
    }
}

/// Folds rows ordered by (poll id, position) into polls.
fn assemble_polls(rows: Vec<OptionRow>) -> Result<Vec<Poll>, PollError> {
    let mut polls: Vec<Poll> = Vec::new();
    for (id, question, position, vote_option, vote_count) in rows {
        let vote_count = u64::try_from(vote_count)
            .map_err(|_| PollError::Storage(format!("negative vote count on poll {id}")))?;
        let option = PollOption { vote_option, vote_count };

        let current = polls.last_mut().filter(|poll| poll.id == id);
        let expected = current.as_ref().map_or(0, |poll| poll.options.len());
        if usize::try_from(position).ok() != Some(expected) {
            return Err(PollError::Storage(format!("gap in option positions on poll {id}")));
        }

        match current {
            Some(poll) => poll.options.push(option),
            None => polls.push(Poll { id, question, options: vec![option] }),
        }
    }
    Ok(polls)
}

/// Explains a vote `UPDATE` that did not touch exactly one row, given the
/// poll's option count (`None` when the poll does not exist).
fn missed_vote_error(id: PollId, option_index: i64, options: Option<i64>, updated: u64) -> PollError {
    let Some(options) = options else { return PollError::NotFound(id) };
    let options = match usize::try_from(options) {
        Ok(options) => options,
        Err(e) => return PollError::storage(e),
    };
    match option_position(option_index, options) {
        Some(_) => PollError::Storage(format!("vote on poll {id} matched {updated} rows")),
        None => PollError::OutOfRange { poll_id: id, index: option_index, options },
    }
}

#[rocket::async_trait]
impl PollStore for PgPollStore {
    async fn create(&self, poll: NewPoll) -> Result<Poll, PollError> {
        let mut tx = self.pool.begin().await.map_err(PollError::storage)?;

        let (id,): (PollId,) = sqlx::query_as("INSERT INTO polls (question) VALUES ($1) RETURNING id")
            .bind(poll.question())
            .fetch_one(&mut *tx)
            .await
            .map_err(PollError::storage)?;

        for (position, label) in poll.labels().iter().enumerate() {
            let position = i32::try_from(position).map_err(PollError::storage)?;
            sqlx::query(
                "INSERT INTO poll_options (poll_id, position, vote_option, vote_count)
                 VALUES ($1, $2, $3, 0)",
            )
            .bind(id)
            .bind(position)
            .bind(label)
            .execute(&mut *tx)
            .await
            .map_err(PollError::storage)?;
        }

        tx.commit().await.map_err(PollError::storage)?;
        debug!(poll_id = id, "Stored new poll");

        let (question, labels) = poll.into_parts();
        Ok(Poll {
            id,
            question,
            options: labels.into_iter()
                .map(|vote_option| PollOption { vote_option, vote_count: 0 })
                .collect(),
        })
    }

    async fn get_all(&self) -> Result<Vec<Poll>, PollError> {
        let rows: Vec<OptionRow> = sqlx::query_as(SELECT_ALL_POLLS)
            .fetch_all(&self.pool)
            .await
            .map_err(PollError::storage)?;
        assemble_polls(rows)
    }

    async fn get_by_id(&self, id: PollId) -> Result<Poll, PollError> {
        let rows: Vec<OptionRow> = sqlx::query_as(SELECT_POLL)
            .bind(id)
            .fetch_all(&self.pool)
            .await
            .map_err(PollError::storage)?;
        assemble_polls(rows)?.pop().ok_or(PollError::NotFound(id))
    }

    async fn record_vote(&self, id: PollId, option_index: i64) -> Result<(), PollError> {
        let updated = match i32::try_from(option_index) {
            Ok(position) if position >= 0 => sqlx::query(
                "UPDATE poll_options SET vote_count = vote_count + 1
                 WHERE poll_id = $1 AND position = $2",
            )
            .bind(id)
            .bind(position)
            .execute(&self.pool)
            .await
            .map_err(PollError::storage)?
            .rows_affected(),
            _ => 0,
        };

        if updated == 1 {
            debug!(poll_id = id, option_index, "Recorded vote");
            return Ok(());
        }

        let options = self.option_count(id).await?;
        Err(missed_vote_error(id, option_index, options, updated))
    }
}
