//! Display figures derived from raw vote counts.
//!
//! Nothing here is cached: totals and percentages are recomputed from the
//! counts on every call so they can never drift from them.

use crate::models::{Poll, PollTally, Tally};

/// Share of `total` held by `count`, as an unrounded percentage.
/// A zero total yields exactly `0.0`.
pub fn percent_of(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 / total as f64 * 100.0
}

/// One entry per option, in option order.
pub fn compute_tallies(poll: &Poll) -> Vec<Tally> {
    let total = poll.total_votes();
    poll.options.iter()
        .map(|opt| Tally {
            label: opt.vote_option.clone(),
            count: opt.vote_count,
            percent: percent_of(opt.vote_count, total),
        })
        .collect()
}

pub fn poll_tally(poll: &Poll) -> PollTally {
    PollTally {
        poll_id: poll.id,
        question: poll.question.clone(),
        total_votes: poll.total_votes(),
        tallies: compute_tallies(poll),
    }
}
