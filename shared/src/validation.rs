pub const MIN_OPTIONS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Question must not be empty")]
    EmptyQuestion,
    #[error("Empty option text at position {0}")]
    EmptyOption(usize),
    #[error("Too few options (minimum {MIN_OPTIONS})")]
    TooFewOptions,
}

/// Creation input that has already passed validation.
///
/// Fields are private so a `PollStore` can only ever be handed a trimmed,
/// non-empty question and at least `MIN_OPTIONS` trimmed, non-empty labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPoll {
    question: String,
    labels: Vec<String>,
}

impl NewPoll {
    pub fn new<Q, L>(question: Q, labels: &[L]) -> Result<Self, ValidationError>
    where
        Q: AsRef<str>,
        L: AsRef<str>,
    {
        let question = question.as_ref().trim();
        if question.is_empty() { return Err(ValidationError::EmptyQuestion); }

        let labels = labels.iter()
            .enumerate()
            .map(|(pos, label)| match label.as_ref().trim() {
                "" => Err(ValidationError::EmptyOption(pos)),
                trimmed => Ok(trimmed.to_string()),
            })
            .collect::<Result<Vec<_>, _>>()?;

        if labels.len() < MIN_OPTIONS { return Err(ValidationError::TooFewOptions); }

        Ok(Self { question: question.to_string(), labels })
    }

    pub fn question(&self) -> &str { &self.question }

    pub fn labels(&self) -> &[String] { &self.labels }

    pub fn into_parts(self) -> (String, Vec<String>) {
        (self.question, self.labels)
    }
}

/// Maps a wire-level option index onto a position in a poll with
/// `option_count` options.
pub fn option_position(option_index: i64, option_count: usize) -> Option<usize> {
    usize::try_from(option_index).ok().filter(|&pos| pos < option_count)
}
