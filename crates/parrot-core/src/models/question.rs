use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::message::now_secs;

/// The batch of follow-up questions derived from one user submission.
/// Created exactly once per accepted input, never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionSet {
    pub id: Uuid,
    /// Monotonic counter value at the time of submission (one per accepted
    /// input across the whole app)
    pub input_number: u64,
    pub original_input: String,
    /// Always `constants::QUESTIONS_PER_INPUT` entries, in template order
    pub questions: Vec<String>,
    pub created_at: u64,
}

impl QuestionSet {
    pub fn new(input_number: u64, original_input: impl Into<String>, questions: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            input_number,
            original_input: original_input.into(),
            questions,
            created_at: now_secs(),
        }
    }
}
