use serde::{Serialize, Deserialize};
use serde::de::IgnoredAny;

pub type PollId = i64;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Poll {
    pub id: PollId,
    pub question: String,
    pub options: Vec<PollOption>,
}

/// One choice within a poll. Its position in `Poll::options` is the only
/// handle a voter has on it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PollOption {
    pub vote_option: String,
    #[serde(default)]
    pub vote_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePollRequest {
    pub question: String,
    pub options: Vec<NewPollOption>,
}

/// Option as submitted on creation. Callers may send a `voteCount` of any
/// shape (including `null`); it is never read, since counts start at zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPollOption {
    pub vote_option: String,
    #[serde(default, rename = "voteCount", skip_serializing)]
    pub submitted_count: Option<IgnoredAny>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub poll_id: PollId,
    pub option_index: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tally {
    pub label: String,
    pub count: u64,
    pub percent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PollTally {
    pub poll_id: PollId,
    pub question: String,
    pub total_votes: u64,
    pub tallies: Vec<Tally>,
}

impl Poll {
    pub fn total_votes(&self) -> u64 {
        self.options.iter().map(|opt| opt.vote_count).sum()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.options.iter().map(|opt| opt.vote_option.as_str())
    }
}

impl CreatePollRequest {
    /// Labels as submitted; any `voteCount` sent by the client is dropped.
    pub fn labels(&self) -> Vec<String> {
        self.options.iter().map(|opt| opt.vote_option.clone()).collect()
    }
}
