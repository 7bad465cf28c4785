pub mod error;
pub mod models;
pub mod validation;
pub mod tally;

pub use error::{ErrorCode, ErrorResponse, PollError, Result};
pub use models::*;
pub use validation::*;
pub use tally::{compute_tallies, percent_of, poll_tally};
