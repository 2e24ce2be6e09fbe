//! Core data model types for quizclock.
//!
//! Questions and pools are immutable once loaded; everything that changes
//! during an attempt lives in [`crate::session::ExamSession`].

use serde::{Deserialize, Serialize};

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Unique, stable identifier within the pool.
    pub id: u32,
    /// The question text.
    pub prompt: String,
    /// Choices in display order.
    pub choices: Vec<String>,
    /// Index into `choices` of the correct answer.
    pub answer: usize,
}

impl Question {
    /// Text of the correct choice, if the answer index is in range.
    pub fn correct_choice(&self) -> Option<&str> {
        self.choices.get(self.answer).map(String::as_str)
    }
}

/// A fixed, ordered collection of questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionPool {
    /// Unique identifier for this pool.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Description of this pool.
    #[serde(default)]
    pub description: String,
    /// The questions, in definition order.
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl QuestionPool {
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Look up a question by id.
    pub fn get(&self, id: u32) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }
}

/// Per-attempt exam settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamConfig {
    /// Countdown length in seconds.
    pub total_time_secs: u64,
    /// How many questions to draw from the pool.
    pub question_count: usize,
}

impl Default for ExamConfig {
    fn default() -> Self {
        Self {
            total_time_secs: 120,
            question_count: 5,
        }
    }
}
